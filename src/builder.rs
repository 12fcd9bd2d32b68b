use crate::error::{Error, Result};
use crate::utils::{log, BuildType, LogLevel};
use std::fs;
use std::path::{Path, PathBuf};

/// CMake command construction and execution
pub mod cmake;

/// Directory under the project root holding every generated tree
pub const BUILD_ROOT: &str = "build";

/// Absolute form of `path` without the `\\?\` prefix windows canonicalization adds,
/// so cmake receives a plain drive path
pub fn project_root(path: &Path) -> Result<PathBuf> {
    dunce::canonicalize(path).map_err(|source| Error::ProjectRoot {
        path: path.to_path_buf(),
        source,
    })
}

/// Returns `<project_root>/build/<name>`, where `name` is `name_override` if given.
/// An empty override counts as absent.
pub fn output_dir_path(
    project_root: &Path,
    default_name: &str,
    name_override: Option<&str>,
) -> PathBuf {
    project_root
        .join(BUILD_ROOT)
        .join(name_override.filter(|name| !name.is_empty()).unwrap_or(default_name))
}

/// Computes the output directory for `build_type` and makes sure it exists.
/// # Arguments
/// * `project_root` - The root of the CMake project
/// * `build_type` - Names the directory unless `name_override` is given
/// * `name_override` - Directory name to use instead of the build type
/// * `rebuild` - Whether an existing directory is removed first
pub fn resolve_output_dir(
    project_root: &Path,
    build_type: &BuildType,
    name_override: Option<&str>,
    rebuild: bool,
) -> Result<PathBuf> {
    let out_dir = output_dir_path(project_root, build_type.as_str(), name_override);
    prepare_dir(&out_dir, rebuild)?;
    Ok(out_dir)
}

/// Creates `dir` with its parents if missing.
/// With `rebuild` an existing tree is removed first; failing to remove it only warns.
pub fn prepare_dir(dir: &Path, rebuild: bool) -> Result<()> {
    if rebuild {
        log(LogLevel::Log, "Rebuild mode, clean first...");
        if dir.exists() {
            if let Err(why) = fs::remove_dir_all(dir) {
                log(
                    LogLevel::Warn,
                    &format!("Could not remove {}: {}", dir.display(), why),
                );
            } else {
                log(LogLevel::Info, &format!("Cleaning: {}", dir.display()));
            }
        }
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| Error::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
        log(LogLevel::Info, &format!("Created {}", dir.display()));
    }
    Ok(())
}

/// Parallel jobs handed to the build driver for `cpus` logical processors
pub fn job_count(cpus: usize) -> usize {
    cpus + 2
}

/// Logical processors of this host, 1 when unknown
pub fn logical_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
