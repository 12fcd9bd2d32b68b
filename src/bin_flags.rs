use crate::builder::cmake::{on_off, CMake, Runner};
use crate::builder::{self, job_count, logical_cpus};
use crate::error::{Error, Result};
use crate::generator::{select_generator, Probe, MSVC_2017_X64};
use crate::utils::{log, BuildType, LogLevel, Platform, Settings};
use std::path::{Path, PathBuf};

static WINDOWS_DIR: &str = "Windows";
static WINDOWS_TARGET: &str = "ALL_BUILD";
static LIB_TARGET: &str = "kbase";
static LIB_ARTIFACT: &str = "libkbase.a";
static GTEST_TARGET: &str = "gtest";
static TEST_TARGET: &str = "kbase_test";

/// The project being generated and the settings that apply to it
pub struct Project {
    pub root: PathBuf,
    pub settings: Settings,
}

impl Project {
    pub fn new(root: PathBuf, settings: Settings) -> Self {
        Self { root, settings }
    }

    fn cmake(&self) -> CMake {
        CMake::new(self.settings.cmake())
    }

    /// `<root>/build/<build type>`, the parent of the component trees
    fn type_dir(&self, build_type: &BuildType) -> PathBuf {
        builder::output_dir_path(&self.root, build_type.as_str(), None)
    }
}

/// Options of the general generation run
#[derive(Debug, Clone)]
pub struct GenOptions {
    pub build_type: BuildType,
    pub out_dir: Option<String>,
    pub generator: Option<String>,
    pub rebuild: bool,
    pub no_test: bool,
    /// Only honored on windows
    pub no_build: bool,
    pub platform: Platform,
}

impl Default for GenOptions {
    fn default() -> Self {
        Self {
            build_type: BuildType::default(),
            out_dir: None,
            generator: None,
            rebuild: false,
            no_test: false,
            no_build: false,
            platform: Platform::host(),
        }
    }
}

///Configures and builds the whole project
/// # Arguments
/// * `project` - The project to generate
/// * `options` - Options from the command line
/// * `runner` - Executes the cmake invocations
/// * `probe` - Used to auto-detect the generator
pub fn gen(
    project: &Project,
    options: &GenOptions,
    runner: &mut dyn Runner,
    probe: &dyn Probe,
) -> Result<()> {
    match options.platform {
        Platform::Posix => gen_posix(project, options, runner, probe),
        Platform::Windows => gen_windows(project, options, runner),
    }
}

fn gen_posix(
    project: &Project,
    options: &GenOptions,
    runner: &mut dyn Runner,
    probe: &dyn Probe,
) -> Result<()> {
    let out_dir = builder::resolve_output_dir(
        &project.root,
        &options.build_type,
        options.out_dir.as_deref(),
        options.rebuild,
    )?;

    let explicit = non_empty(options.generator.as_deref())
        .or(non_empty(project.settings.generator.as_deref()));
    let generator = select_generator(explicit, probe);
    if generator.is_none() {
        log(
            LogLevel::Warn,
            "No known build system found, leaving the choice to cmake",
        );
    }

    let cmake = project.cmake();
    let configure = cmake
        .configure(&out_dir, &project.root)
        .define("CMAKE_BUILD_TYPE", options.build_type.as_str())
        .define(project.settings.tests_option(), on_off(!options.no_test))
        .generator(generator.as_deref())
        .invocation();
    log(LogLevel::Log, &format!("Configuring: {}", out_dir.display()));
    runner.run(&configure)?;

    let build = cmake
        .build(&out_dir)
        .jobs(job_count(logical_cpus()))
        .invocation();
    log(LogLevel::Log, &format!("Building: {}", out_dir.display()));
    runner.run(&build)?;

    log(LogLevel::Log, "Build complete");
    Ok(())
}

fn gen_windows(project: &Project, options: &GenOptions, runner: &mut dyn Runner) -> Result<()> {
    let out_dir = builder::output_dir_path(&project.root, WINDOWS_DIR, options.out_dir.as_deref());
    builder::prepare_dir(&out_dir, options.rebuild)?;

    let generator = non_empty(options.generator.as_deref())
        .or(non_empty(project.settings.msvc_generator.as_deref()))
        .unwrap_or(MSVC_2017_X64);

    let cmake = project.cmake();
    let configure = cmake
        .configure(&out_dir, &project.root)
        .define(project.settings.tests_option(), on_off(!options.no_test))
        .generator(Some(generator))
        .invocation();
    log(LogLevel::Log, &format!("Configuring: {}", out_dir.display()));
    runner.run(&configure)?;

    if options.no_build {
        log(
            LogLevel::Log,
            "Run configuration and generation only, skip building",
        );
        return Ok(());
    }

    let build = cmake
        .build(&out_dir)
        .target(WINDOWS_TARGET)
        .config(options.build_type.as_str())
        .invocation();
    log(LogLevel::Log, &format!("Building: {}", out_dir.display()));
    runner.run(&build)?;

    log(LogLevel::Log, "Build complete");
    Ok(())
}

//an empty value on the command line or in a settings file means "not set"
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

///Builds only the kbase library into `build/<type>/kbase`
pub fn gen_lib(
    project: &Project,
    build_type: &BuildType,
    runner: &mut dyn Runner,
    probe: &dyn Probe,
) -> Result<()> {
    build_type.ensure_recognized()?;
    log(LogLevel::Log, &format!("Build in {} mode", build_type));

    let build_dir = project.type_dir(build_type).join(LIB_TARGET);
    build_component(
        project,
        build_type,
        &build_dir,
        &project.root.join("src"),
        LIB_TARGET,
        runner,
        probe,
    )
}

///Builds gtest and then the unit tests against an already built kbase library
/// # Arguments
/// * `gtest_only` - Stop after gtest is built
pub fn gen_test(
    project: &Project,
    build_type: &BuildType,
    gtest_only: bool,
    runner: &mut dyn Runner,
    probe: &dyn Probe,
) -> Result<()> {
    build_type.ensure_recognized()?;
    log(LogLevel::Log, &format!("Build in {} mode", build_type));

    let type_dir = project.type_dir(build_type);
    let test_root = project.root.join("test");
    build_component(
        project,
        build_type,
        &type_dir.join(GTEST_TARGET),
        &test_root.join("third-party"),
        GTEST_TARGET,
        runner,
        probe,
    )?;

    if gtest_only {
        return Ok(());
    }

    let lib = type_dir.join(LIB_ARTIFACT);
    if !lib.exists() {
        return Err(Error::MissingLibrary(lib));
    }

    build_component(
        project,
        build_type,
        &type_dir.join("test"),
        &test_root,
        TEST_TARGET,
        runner,
        probe,
    )
}

//configures `source_dir` into `build_dir` and builds a single target there
fn build_component(
    project: &Project,
    build_type: &BuildType,
    build_dir: &Path,
    source_dir: &Path,
    target: &str,
    runner: &mut dyn Runner,
    probe: &dyn Probe,
) -> Result<()> {
    builder::prepare_dir(build_dir, false)?;
    let generator = select_generator(project.settings.generator.as_deref(), probe);

    let cmake = project.cmake();
    let configure = cmake
        .configure(build_dir, source_dir)
        .define("CMAKE_BUILD_TYPE", build_type.as_str())
        .generator(generator.as_deref())
        .invocation();
    log(LogLevel::Log, &format!("Configuring target: {}", target));
    runner.run(&configure)?;

    let build = cmake
        .build(build_dir)
        .target(target)
        .jobs(job_count(logical_cpus()))
        .invocation();
    log(LogLevel::Log, &format!("Building target: {}", target));
    runner.run(&build)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::cmake::tests::RecordingRunner;
    use crate::builder::cmake::Invocation;
    use crate::generator::tests::FixedProbe;
    use std::fs;
    use tempfile::TempDir;

    fn project(root: &TempDir) -> Project {
        Project::new(root.path().to_path_buf(), Settings::default())
    }

    fn jobs() -> String {
        job_count(logical_cpus()).to_string()
    }

    fn path_arg(path: &Path) -> String {
        path.display().to_string()
    }

    fn posix(build_type: &str) -> GenOptions {
        GenOptions {
            build_type: BuildType::new(build_type),
            platform: Platform::Posix,
            ..GenOptions::default()
        }
    }

    #[test]
    fn posix_configure_then_build() {
        let root = TempDir::new().unwrap();
        let project = project(&root);
        let mut runner = RecordingRunner::default();
        let probe = FixedProbe::new(&["ninja", "make"]);

        gen(&project, &posix("debug"), &mut runner, &probe).unwrap();

        let out = root.path().join("build").join("Debug");
        assert_eq!(
            runner.seen,
            vec![
                Invocation {
                    program: "cmake".to_string(),
                    args: vec![
                        "-DCMAKE_BUILD_TYPE=Debug".to_string(),
                        "-DKBASE_BUILD_UNITTESTS=ON".to_string(),
                        "-G".to_string(),
                        "Ninja".to_string(),
                        path_arg(root.path()),
                    ],
                    current_dir: out.clone(),
                },
                Invocation {
                    program: "cmake".to_string(),
                    args: vec![
                        "--build".to_string(),
                        path_arg(&out),
                        "--".to_string(),
                        "-j".to_string(),
                        jobs(),
                    ],
                    current_dir: out.clone(),
                },
            ]
        );
    }

    #[test]
    fn no_test_turns_unittests_off() {
        let root = TempDir::new().unwrap();
        let mut runner = RecordingRunner::default();
        let options = GenOptions {
            no_test: true,
            ..posix("Debug")
        };
        gen(&project(&root), &options, &mut runner, &FixedProbe::new(&["make"])).unwrap();

        let args = &runner.seen[0].args;
        assert!(args.contains(&"-DKBASE_BUILD_UNITTESTS=OFF".to_string()));
        assert!(args.contains(&"Unix Makefiles".to_string()));
    }

    #[test]
    fn general_variant_forwards_unknown_build_type() {
        let root = TempDir::new().unwrap();
        let mut runner = RecordingRunner::default();
        gen(&project(&root), &posix("minsizerel"), &mut runner, &FixedProbe::new(&[])).unwrap();

        assert_eq!(runner.seen.len(), 2);
        assert_eq!(runner.seen[0].args[0], "-DCMAKE_BUILD_TYPE=Minsizerel");
        assert!(!runner.seen[0].args.contains(&"-G".to_string()));
        assert!(root.path().join("build").join("Minsizerel").is_dir());
    }

    #[test]
    fn generator_precedence_flag_then_settings() {
        let root = TempDir::new().unwrap();
        let settings = Settings {
            generator: Some("Unix Makefiles".to_string()),
            cmake: Some("cmake3".to_string()),
            ..Settings::default()
        };
        let project = Project::new(root.path().to_path_buf(), settings);
        let probe = FixedProbe::new(&["ninja"]);

        let mut runner = RecordingRunner::default();
        gen(&project, &posix("Debug"), &mut runner, &probe).unwrap();
        assert_eq!(runner.seen[0].program, "cmake3");
        assert!(runner.seen[0].args.contains(&"Unix Makefiles".to_string()));

        let mut runner = RecordingRunner::default();
        let options = GenOptions {
            generator: Some("Ninja Multi-Config".to_string()),
            ..posix("Debug")
        };
        gen(&project, &options, &mut runner, &probe).unwrap();
        assert!(runner.seen[0].args.contains(&"Ninja Multi-Config".to_string()));
    }

    #[test]
    fn empty_generator_flag_falls_through() {
        let root = TempDir::new().unwrap();
        let options = GenOptions {
            generator: Some(String::new()),
            ..posix("Debug")
        };

        let mut runner = RecordingRunner::default();
        gen(&project(&root), &options, &mut runner, &FixedProbe::new(&["ninja"])).unwrap();
        assert!(runner.seen[0].args.contains(&"Ninja".to_string()));
        assert!(!runner.seen[0].args.contains(&String::new()));

        let settings = Settings {
            generator: Some("Unix Makefiles".to_string()),
            ..Settings::default()
        };
        let project = Project::new(root.path().to_path_buf(), settings);
        let mut runner = RecordingRunner::default();
        gen(&project, &options, &mut runner, &FixedProbe::new(&["ninja"])).unwrap();
        assert!(runner.seen[0].args.contains(&"Unix Makefiles".to_string()));
    }

    #[test]
    fn empty_out_dir_rebuild_keeps_other_trees() {
        let root = TempDir::new().unwrap();
        let release = root.path().join("build").join("Release");
        fs::create_dir_all(&release).unwrap();
        fs::write(release.join("libkbase.a"), "").unwrap();

        let options = GenOptions {
            out_dir: Some(String::new()),
            rebuild: true,
            ..posix("Debug")
        };
        let mut runner = RecordingRunner::default();
        gen(&project(&root), &options, &mut runner, &FixedProbe::new(&["make"])).unwrap();

        assert!(release.join("libkbase.a").exists());
        assert_eq!(runner.seen[0].current_dir, root.path().join("build").join("Debug"));
    }

    #[test]
    fn windows_empty_generator_uses_msvc_default() {
        let root = TempDir::new().unwrap();
        let options = GenOptions {
            generator: Some(String::new()),
            platform: Platform::Windows,
            ..GenOptions::default()
        };
        let mut runner = RecordingRunner::default();
        gen(&project(&root), &options, &mut runner, &FixedProbe::new(&[])).unwrap();
        assert!(runner.seen[0].args.contains(&MSVC_2017_X64.to_string()));
    }

    #[test]
    fn release_rebuild_recreates_stale_tree() {
        let root = TempDir::new().unwrap();
        let out = root.path().join("build").join("Release");
        fs::create_dir_all(out.join("CMakeFiles")).unwrap();
        fs::write(out.join("CMakeCache.txt"), "stale").unwrap();

        struct CheckingRunner {
            stale: PathBuf,
            inner: RecordingRunner,
        }
        impl Runner for CheckingRunner {
            fn run(&mut self, invocation: &Invocation) -> Result<()> {
                assert!(invocation.current_dir.is_dir());
                assert!(!self.stale.exists());
                self.inner.run(invocation)
            }
        }

        let mut runner = CheckingRunner {
            stale: out.join("CMakeCache.txt"),
            inner: RecordingRunner::default(),
        };
        let options = GenOptions {
            rebuild: true,
            ..posix("release")
        };
        gen(&project(&root), &options, &mut runner, &FixedProbe::new(&["make"])).unwrap();

        assert!(!out.join("CMakeFiles").exists());
        assert_eq!(runner.inner.seen[0].args[0], "-DCMAKE_BUILD_TYPE=Release");
        assert_eq!(runner.inner.seen[0].current_dir, out);
    }

    #[test]
    fn failed_configure_stops_the_run() {
        let root = TempDir::new().unwrap();
        let mut runner = RecordingRunner {
            fail_at: Some(0),
            ..RecordingRunner::default()
        };
        let result = gen(&project(&root), &posix("Debug"), &mut runner, &FixedProbe::new(&["make"]));
        assert!(result.is_err());
        assert_eq!(runner.seen.len(), 1);
    }

    #[test]
    fn windows_uses_msvc_and_all_build() {
        let root = TempDir::new().unwrap();
        let mut runner = RecordingRunner::default();
        let options = GenOptions {
            build_type: BuildType::new("release"),
            platform: Platform::Windows,
            ..GenOptions::default()
        };
        let probe = FixedProbe::new(&["ninja"]);
        gen(&project(&root), &options, &mut runner, &probe).unwrap();

        let out = root.path().join("build").join("Windows");
        assert_eq!(
            runner.seen[0].args,
            vec![
                "-DKBASE_BUILD_UNITTESTS=ON".to_string(),
                "-G".to_string(),
                MSVC_2017_X64.to_string(),
                path_arg(root.path()),
            ]
        );
        assert_eq!(
            runner.seen[1].args,
            vec![
                "--build".to_string(),
                path_arg(&out),
                "--target".to_string(),
                "ALL_BUILD".to_string(),
                "--config".to_string(),
                "Release".to_string(),
            ]
        );
    }

    #[test]
    fn windows_no_build_stops_after_configure() {
        let root = TempDir::new().unwrap();
        let mut runner = RecordingRunner::default();
        let options = GenOptions {
            no_build: true,
            platform: Platform::Windows,
            ..GenOptions::default()
        };
        gen(&project(&root), &options, &mut runner, &FixedProbe::new(&[])).unwrap();
        assert_eq!(runner.seen.len(), 1);
    }

    #[test]
    fn lib_and_test_reject_unknown_build_type() {
        let root = TempDir::new().unwrap();
        let project = project(&root);
        let probe = FixedProbe::new(&["make"]);
        let bad = BuildType::new("profile");

        let mut runner = RecordingRunner::default();
        let err = gen_lib(&project, &bad, &mut runner, &probe).unwrap_err();
        assert!(matches!(err, Error::UnrecognizedBuildType(_)));

        let err = gen_test(&project, &bad, false, &mut runner, &probe).unwrap_err();
        assert!(matches!(err, Error::UnrecognizedBuildType(_)));

        assert!(runner.seen.is_empty());
        assert!(!root.path().join("build").exists());
    }

    #[test]
    fn lib_builds_kbase_target() {
        let root = TempDir::new().unwrap();
        let mut runner = RecordingRunner::default();
        gen_lib(
            &project(&root),
            &BuildType::new("RELEASE"),
            &mut runner,
            &FixedProbe::new(&["make"]),
        )
        .unwrap();

        let dir = root.path().join("build").join("Release").join("kbase");
        assert!(dir.is_dir());
        assert_eq!(
            runner.seen[0].args,
            vec![
                "-DCMAKE_BUILD_TYPE=Release".to_string(),
                "-G".to_string(),
                "Unix Makefiles".to_string(),
                path_arg(&root.path().join("src")),
            ]
        );
        assert_eq!(runner.seen[0].current_dir, dir);
        assert_eq!(
            runner.seen[1].args,
            vec![
                "--build".to_string(),
                path_arg(&dir),
                "--target".to_string(),
                "kbase".to_string(),
                "--".to_string(),
                "-j".to_string(),
                jobs(),
            ]
        );
    }

    #[test]
    fn test_variant_gtest_only() {
        let root = TempDir::new().unwrap();
        let mut runner = RecordingRunner::default();
        gen_test(
            &project(&root),
            &BuildType::new("debug"),
            true,
            &mut runner,
            &FixedProbe::new(&["make"]),
        )
        .unwrap();

        assert_eq!(runner.seen.len(), 2);
        let gtest_dir = root.path().join("build").join("Debug").join("gtest");
        assert_eq!(runner.seen[0].current_dir, gtest_dir);
        assert_eq!(
            runner.seen[0].args.last(),
            Some(&path_arg(&root.path().join("test").join("third-party")))
        );
        assert!(runner.seen[1].args.contains(&"gtest".to_string()));
    }

    #[test]
    fn test_variant_requires_library() {
        let root = TempDir::new().unwrap();
        let mut runner = RecordingRunner::default();
        let err = gen_test(
            &project(&root),
            &BuildType::new("debug"),
            false,
            &mut runner,
            &FixedProbe::new(&["make"]),
        )
        .unwrap_err();

        let lib = root.path().join("build").join("Debug").join("libkbase.a");
        assert!(matches!(err, Error::MissingLibrary(ref p) if *p == lib));
        assert_eq!(runner.seen.len(), 2);
        assert!(!root.path().join("build").join("Debug").join("test").exists());
    }

    #[test]
    fn test_variant_builds_tests_after_gtest() {
        let root = TempDir::new().unwrap();
        let type_dir = root.path().join("build").join("Debug");
        fs::create_dir_all(&type_dir).unwrap();
        fs::write(type_dir.join("libkbase.a"), "").unwrap();

        let mut runner = RecordingRunner::default();
        gen_test(
            &project(&root),
            &BuildType::new("Debug"),
            false,
            &mut runner,
            &FixedProbe::new(&["ninja"]),
        )
        .unwrap();

        assert_eq!(runner.seen.len(), 4);
        assert_eq!(runner.seen[2].current_dir, type_dir.join("test"));
        assert_eq!(
            runner.seen[2].args.last(),
            Some(&path_arg(&root.path().join("test")))
        );
        assert!(runner.seen[3].args.contains(&"kbase_test".to_string()));
    }
}
