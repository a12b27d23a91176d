/// Strip the module path from a type name so component names stay short
/// in log lines.
///
/// `"mediapick_pipeline::components::engagement_scorer::EngagementScorer"`
/// becomes `"EngagementScorer"`. Generic parameters are left in place.
pub fn short_type_name(full: &str) -> &str {
    let head = full.split('<').next().unwrap_or(full);
    head.rsplit("::").next().unwrap_or(head)
}
