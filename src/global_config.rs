use crate::error::{Error, Result};
use crate::utils::{log, LogLevel, Settings};

use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Parameters accepted by `kbase_gen config`
pub const PARAMETERS: &[&str] = &["cmake", "generator", "msvc_generator", "tests_option"];

enum ConfigParam {
    CMake(String),
    Generator(String),
    MsvcGenerator(String),
    TestsOption(String),
}

/// Per-user settings stored in the platform config directory
pub struct GlobalConfig;

impl GlobalConfig {
    /// `<config dir>/kbase_gen/config.toml`, if the platform has a config dir
    pub fn path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "kbase_gen").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Validates and stores one parameter in the config file at `config`
    pub fn set_default(config: &Path, parameter: &str, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(Error::EmptyValue(parameter.to_string()));
        }
        let value = value.to_string();
        let param = match parameter {
            "cmake" => ConfigParam::CMake(value),
            "generator" => ConfigParam::Generator(value),
            "msvc_generator" => ConfigParam::MsvcGenerator(value),
            "tests_option" => ConfigParam::TestsOption(value),
            _ => return Err(Error::UnknownParameter(parameter.to_string())),
        };
        set_config_param(param, config)?;
        log(
            LogLevel::Log,
            &format!("Set {} in {}", parameter, config.display()),
        );
        Ok(())
    }

    /// Prints every parameter that has a value in the config file at `config`
    pub fn list(config: &Path) -> Result<()> {
        let settings = Settings::from_file(config)?;
        let values = [
            ("cmake", &settings.cmake),
            ("generator", &settings.generator),
            ("msvc_generator", &settings.msvc_generator),
            ("tests_option", &settings.tests_option),
        ];
        for (name, value) in values {
            if let Some(value) = value {
                println!("{} = {}", name, value);
            }
        }
        Ok(())
    }
}

fn set_config_param(param: ConfigParam, config_file: &Path) -> Result<()> {
    let mut global_conf = Settings::from_file(config_file)?;
    match param {
        ConfigParam::CMake(value) => global_conf.cmake = Some(value),
        ConfigParam::Generator(value) => global_conf.generator = Some(value),
        ConfigParam::MsvcGenerator(value) => global_conf.msvc_generator = Some(value),
        ConfigParam::TestsOption(value) => global_conf.tests_option = Some(value),
    }

    if let Some(parent) = config_file.parent() {
        std::fs::create_dir_all(parent).map_err(|source| Error::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(config_file, toml::to_string(&global_conf)?).map_err(|source| {
        Error::WriteConfig {
            path: config_file.to_path_buf(),
            source,
        }
    })
}
