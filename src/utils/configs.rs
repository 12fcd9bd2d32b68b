use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Name of the per-project settings file, looked up in the project root
pub const PROJECT_CONFIG: &str = "kbase_gen.toml";

const DEFAULT_CMAKE: &str = "cmake";
const DEFAULT_TESTS_OPTION: &str = "KBASE_BUILD_UNITTESTS";

/// Build type with its first letter upper-cased and the rest lower-cased.
///
/// Any spelling is accepted; only `Debug` and `Release` are recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildType(String);

impl BuildType {
    pub fn new(raw: &str) -> Self {
        let mut chars = raw.chars();
        let canonical = match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        };
        BuildType(canonical)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self.0.as_str(), "Debug" | "Release")
    }

    /// Fails with `UnrecognizedBuildType` unless this is `Debug` or `Release`
    pub fn ensure_recognized(&self) -> Result<&Self> {
        if self.is_recognized() {
            Ok(self)
        } else {
            Err(Error::UnrecognizedBuildType(self.0.clone()))
        }
    }
}

impl Default for BuildType {
    fn default() -> Self {
        BuildType::new("Debug")
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Host family deciding which generation path is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Posix,
    Windows,
}

impl Platform {
    pub fn host() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Posix
        }
    }
}

/// Optional defaults read from the user and project config files.
///
/// Every key is optional; command line flags take precedence over them.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Program used for both the configure and the build step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmake: Option<String>,
    /// Generator used on posix hosts instead of auto-detection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    /// Generator used on windows hosts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msvc_generator: Option<String>,
    /// Cache variable toggled by `--no-test`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tests_option: Option<String>,
}

impl Settings {
    /// Reads settings from a toml file. A missing file yields the defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Settings::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| Error::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| Error::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the user settings, then lets the project file override them
    pub fn load(project_root: &Path, user_config: Option<&Path>) -> Result<Self> {
        let user = match user_config {
            Some(path) => Settings::from_file(path)?,
            None => Settings::default(),
        };
        let project = Settings::from_file(&project_root.join(PROJECT_CONFIG))?;
        Ok(user.overridden_by(project))
    }

    /// Values set in `other` win over the ones in `self`
    pub fn overridden_by(self, other: Settings) -> Settings {
        Settings {
            cmake: other.cmake.or(self.cmake),
            generator: other.generator.or(self.generator),
            msvc_generator: other.msvc_generator.or(self.msvc_generator),
            tests_option: other.tests_option.or(self.tests_option),
        }
    }

    pub fn cmake(&self) -> &str {
        self.cmake.as_deref().unwrap_or(DEFAULT_CMAKE)
    }

    pub fn tests_option(&self) -> &str {
        self.tests_option.as_deref().unwrap_or(DEFAULT_TESTS_OPTION)
    }
}
