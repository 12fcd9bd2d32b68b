/// Contains the logger
pub mod log;
/// Contains the build type and the settings files
pub mod configs;

pub use configs::{BuildType, Platform, Settings, PROJECT_CONFIG};
pub use log::{log, LogLevel};
