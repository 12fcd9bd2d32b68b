use crate::error::{Error, Result};
use crate::utils::{log, LogLevel};
use itertools::Itertools;
use std::path::{Path, PathBuf};
use std::process::Command;

//Represents one external command
//Runs inside `current_dir` without touching the process working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: PathBuf,
}

impl Invocation {
    /// The command line as it would be typed in a shell
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .join(" ")
    }
}

/// Executes invocations one at a time
pub trait Runner {
    fn run(&mut self, invocation: &Invocation) -> Result<()>;
}

/// Spawns real processes with inherited stdio and waits for them
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<()> {
        let command_line = invocation.command_line();
        log(LogLevel::Info, &format!("  Command: {}", command_line));
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.current_dir)
            .status()
            .map_err(|source| Error::Spawn {
                program: invocation.program.clone(),
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::CommandFailed {
                command: command_line,
                status,
            })
        }
    }
}

/// CMake's boolean vocabulary
pub fn on_off(value: bool) -> &'static str {
    if value {
        "ON"
    } else {
        "OFF"
    }
}

/// Builds configure and build invocations for one cmake program
pub struct CMake {
    program: String,
}

impl CMake {
    pub fn new(program: &str) -> Self {
        CMake {
            program: program.to_string(),
        }
    }

    /// Generates build files for `source_dir` inside `build_dir`
    pub fn configure(&self, build_dir: &Path, source_dir: &Path) -> Configure {
        Configure {
            program: self.program.clone(),
            build_dir: build_dir.to_path_buf(),
            source_dir: source_dir.to_path_buf(),
            defines: Vec::new(),
            generator: None,
        }
    }

    /// Drives the build of an already configured `build_dir`
    pub fn build(&self, build_dir: &Path) -> Build {
        Build {
            program: self.program.clone(),
            build_dir: build_dir.to_path_buf(),
            target: None,
            config: None,
            jobs: None,
        }
    }
}

pub struct Configure {
    program: String,
    build_dir: PathBuf,
    source_dir: PathBuf,
    defines: Vec<(String, String)>,
    generator: Option<String>,
}

impl Configure {
    pub fn define(mut self, name: &str, value: &str) -> Self {
        self.defines.push((name.to_string(), value.to_string()));
        self
    }

    /// Without a generator `-G` is left out and cmake picks its own default
    pub fn generator(mut self, generator: Option<&str>) -> Self {
        self.generator = generator.map(str::to_string);
        self
    }

    pub fn invocation(self) -> Invocation {
        let mut args: Vec<String> = self
            .defines
            .into_iter()
            .map(|(name, value)| format!("-D{}={}", name, value))
            .collect();
        if let Some(generator) = self.generator {
            args.push("-G".to_string());
            args.push(generator);
        }
        args.push(self.source_dir.display().to_string());
        Invocation {
            program: self.program,
            args,
            current_dir: self.build_dir,
        }
    }
}

pub struct Build {
    program: String,
    build_dir: PathBuf,
    target: Option<String>,
    config: Option<String>,
    jobs: Option<usize>,
}

impl Build {
    pub fn target(mut self, target: &str) -> Self {
        self.target = Some(target.to_string());
        self
    }

    /// Configuration for multi-config generators such as Visual Studio
    pub fn config(mut self, config: &str) -> Self {
        self.config = Some(config.to_string());
        self
    }

    /// Forwarded to the native build tool as `-j`
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    pub fn invocation(self) -> Invocation {
        let mut args = vec!["--build".to_string(), self.build_dir.display().to_string()];
        if let Some(target) = self.target {
            args.push("--target".to_string());
            args.push(target);
        }
        if let Some(config) = self.config {
            args.push("--config".to_string());
            args.push(config);
        }
        if let Some(jobs) = self.jobs {
            args.push("--".to_string());
            args.push("-j".to_string());
            args.push(jobs.to_string());
        }
        Invocation {
            program: self.program,
            args,
            current_dir: self.build_dir,
        }
    }
}
