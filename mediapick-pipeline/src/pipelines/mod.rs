pub mod random_media;
