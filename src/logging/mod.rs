pub mod logger;
pub mod round_log;
