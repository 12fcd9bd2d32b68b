use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Everything that can stop a generation run
#[derive(Debug, Error)]
pub enum Error {
    #[error("unrecognized build mode {0}")]
    UnrecognizedBuildType(String),

    #[error("invalid project root {path}: {source}")]
    ProjectRoot {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no lib kbase found at {0}, please build libkbase first")]
    MissingLibrary(PathBuf),

    #[error("could not create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not read config file {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse config file {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("could not write config file {path}: {source}")]
    WriteConfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not serialize config: {0}")]
    SerializeConfig(#[from] toml::ser::Error),

    #[error("invalid parameter {0}, see `kbase_gen config --help`")]
    UnknownParameter(String),

    #[error("value for {0} must not be empty")]
    EmptyValue(String),

    #[error("could not locate a config directory for this user")]
    NoConfigDir,

    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("`{command}` failed with {status}")]
    CommandFailed { command: String, status: ExitStatus },
}

pub type Result<T> = std::result::Result<T, Error>;
