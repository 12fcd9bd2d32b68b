use colored::Colorize;

/// Environment variable holding the minimum level that gets printed
pub const LOG_LEVEL_ENV: &str = "KBASE_GEN_LOG_LEVEL";

//Log utils
#[derive(PartialEq, PartialOrd, Debug, Clone, Copy)]
/// This enum is used to represent the different log levels
pub enum LogLevel {
    Debug,
    Info,
    Log,
    Warn,
    Error,
}

impl LogLevel {
    /// Parses a level name, ignoring case
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "log" => Some(LogLevel::Log),
            "warn" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }

    /// Reads the threshold from `KBASE_GEN_LOG_LEVEL`, defaulting to `Log`
    pub fn threshold() -> Self {
        std::env::var(LOG_LEVEL_ENV)
            .ok()
            .and_then(|val| LogLevel::parse(&val))
            .unwrap_or(LogLevel::Log)
    }
}

/// This function is used to log messages to the console
/// # Arguments
/// * `level` - The log level of the message
/// * `message` - The message to log
/// # Example
/// ```
/// use kbase_gen::utils::{log, LogLevel};
/// log(LogLevel::Log, "Build in Debug mode");
/// ```
///
/// # Level setting
/// The log level can be set by setting the environment variable `KBASE_GEN_LOG_LEVEL`
/// to one of `Debug`, `Info`, `Log`, `Warn` or `Error`.
/// If the environment variable is not set, the default log level is `Log`
pub fn log(level: LogLevel, message: &str) {
    if level < LogLevel::threshold() {
        return;
    }
    let level_str = match level {
        LogLevel::Debug => "[DEBUG]".purple(),
        LogLevel::Info => "[INFO]".blue(),
        LogLevel::Log => "[LOG]".green(),
        LogLevel::Warn => "[WARN]".yellow(),
        LogLevel::Error => "[ERROR]".red(),
    };
    println!("{} {}", level_str, message);
}
