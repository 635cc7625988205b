//! Session cache adapters (Redis)

pub mod redis_session_store;

pub use redis_session_store::RedisSessionStore;
