//! Application-wide constants

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;
pub const DEFAULT_SESSION_COOKIE_NAME: &str = "portal.sid";
pub const DEFAULT_BCRYPT_COST: u32 = 12;
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;
pub const SESSION_ID_BYTES: usize = 32;
pub const STORE_RETRY_AFTER_SECONDS: u64 = 5;
