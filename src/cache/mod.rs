pub mod clock;
pub mod response_cache;
