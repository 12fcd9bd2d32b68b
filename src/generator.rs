//! Picks the CMake generator when none was asked for.
use crate::utils::{log, LogLevel};

/// Build tools in order of precedence, paired with the generator CMake knows them by.
/// `make` is assumed to exist on any *nix system.
pub const BUILD_SYSTEMS: &[(&str, &str)] = &[("ninja", "Ninja"), ("make", "Unix Makefiles")];

/// Default generator on windows hosts, where nothing is probed
pub const MSVC_2017_X64: &str = "Visual Studio 15 2017 Win64";

/// Answers whether a program can be run on this host
pub trait Probe {
    fn is_available(&self, program: &str) -> bool;
}

/// Looks programs up on `PATH`
pub struct PathProbe;

impl Probe for PathProbe {
    fn is_available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Returns `explicit` unchanged when given and non-empty, otherwise the
/// generator of the first build tool in `BUILD_SYSTEMS` that the probe finds.
/// Returns `None` when none of them is present.
pub fn select_generator(explicit: Option<&str>, probe: &dyn Probe) -> Option<String> {
    if let Some(generator) = explicit.filter(|g| !g.is_empty()) {
        return Some(generator.to_string());
    }

    log(LogLevel::Log, "Auto-search building system...");
    let (tool, generator) = BUILD_SYSTEMS
        .iter()
        .find(|(tool, _)| probe.is_available(tool))?;
    log(LogLevel::Log, &format!("{} found and would be used", tool));
    Some(generator.to_string())
}
