mod token_cache_redis;

pub use token_cache_redis::*;
