pub mod app;
pub mod config;
pub mod countdown;
pub mod notification;
pub mod persistence;
pub mod phrases;
pub mod scheduler;
pub mod settings;
pub mod theme;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
