//! Redis connection pool built on deadpool-redis

mod redis_pool;

pub use redis_pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};
