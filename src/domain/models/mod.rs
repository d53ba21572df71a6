pub mod config;
pub mod group;
pub mod settings;

pub use config::Config;
pub use group::{ConfigForGroup, Group};
pub use settings::{BackendKind, BackendSettings, LoggingSettings, Settings};
