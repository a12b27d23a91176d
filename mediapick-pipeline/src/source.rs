use async_trait::async_trait;

use crate::error::MediaResult;
use crate::util;

/// One fetch worth of candidates plus the provider's total match count.
#[derive(Clone, Debug)]
pub struct CandidateBatch<C> {
    pub candidates: Vec<C>,
    pub total_hits: u64,
}

impl<C> CandidateBatch<C> {
    pub fn new(candidates: Vec<C>, total_hits: u64) -> Self {
        Self {
            candidates,
            total_hits,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }
}

#[async_trait]
pub trait Source<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Decide if this source should run for the given query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Fetch candidates for the given query.
    ///
    /// An empty batch is a valid answer. Errors are reserved for the
    /// provider being unreachable or answering with something unusable.
    async fn get_candidates(&self, query: &Q) -> MediaResult<CandidateBatch<C>>;

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
