mod config;
pub use self::config::{Config, Host};

pub mod actions;

mod start;
pub use self::start::{get_config_path, parse_meta, start};

mod commands;

mod dispatch;
pub use self::dispatch::dispatch;
