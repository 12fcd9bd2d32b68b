use clap::{ArgAction, Args, Parser, Subcommand};
use kbase_gen::bin_flags::{self, GenOptions, Project};
use kbase_gen::builder::{self, cmake::SystemRunner};
use kbase_gen::error::{Error, Result};
use kbase_gen::generator::PathProbe;
use kbase_gen::global_config::GlobalConfig;
use kbase_gen::utils::{log, BuildType, LogLevel, Platform, Settings};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kbase_gen", version, about = "Generates and builds the KBase CMake project")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Root of the CMake project
    #[arg(long, global = true, default_value = ".")]
    project_root: PathBuf,

    #[command(flatten)]
    gen: GenArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct GenArgs {
    /// Debug or Release, any case
    #[arg(long, default_value = "Debug")]
    build_type: String,
    /// Name of the directory under build/ instead of the build type
    #[arg(long)]
    out_dir: Option<String>,
    /// CMake generator, auto-detected when omitted
    #[arg(long)]
    generator: Option<String>,
    /// Remove the output directory before configuring
    #[arg(long)]
    rebuild: bool,
    /// Do not build the unit tests
    #[arg(long)]
    no_test: bool,
    /// Do not build target after generation
    #[cfg(windows)]
    #[arg(long)]
    no_build: bool,
}

impl GenArgs {
    #[cfg(windows)]
    fn no_build(&self) -> bool {
        self.no_build
    }

    #[cfg(not(windows))]
    fn no_build(&self) -> bool {
        false
    }

    fn options(&self) -> GenOptions {
        GenOptions {
            build_type: BuildType::new(&self.build_type),
            out_dir: self.out_dir.clone(),
            generator: self.generator.clone(),
            rebuild: self.rebuild,
            no_test: self.no_test,
            no_build: self.no_build(),
            platform: Platform::host(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build only the kbase library
    Lib {
        /// Debug or Release, any case
        #[arg(long, default_value = "Debug")]
        build_type: String,
    },
    /// Build gtest and the kbase unit tests
    Test {
        /// Debug or Release, any case
        #[arg(long, default_value = "Debug")]
        build_type: String,
        /// Stop once gtest is built
        #[arg(long, action = ArgAction::Set, default_value_t = false)]
        build_gtest_only: bool,
    },
    /// Set or list user defaults
    #[command(arg_required_else_help = true)]
    Config {
        /// One of: cmake, generator, msvc_generator, tests_option
        #[arg(requires = "value")]
        parameter: Option<String>,
        /// Value to store
        value: Option<String>,
        /// Print the stored defaults
        #[arg(long, conflicts_with = "parameter")]
        list: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(why) = run(cli) {
        log(LogLevel::Error, &why.to_string());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let user_config = GlobalConfig::path();

    if let Some(Commands::Config {
        parameter,
        value,
        list,
    }) = &cli.command
    {
        let config = user_config.clone().ok_or(Error::NoConfigDir)?;
        if *list {
            return GlobalConfig::list(&config);
        }
        if let (Some(parameter), Some(value)) = (parameter, value) {
            return GlobalConfig::set_default(&config, parameter, value);
        }
        return Ok(());
    }

    let root = builder::project_root(&cli.project_root)?;
    let settings = Settings::load(&root, user_config.as_deref())?;
    let project = Project::new(root, settings);
    log(LogLevel::Debug, &format!("Settings: {:#?}", project.settings));

    let mut runner = SystemRunner;
    let probe = PathProbe;
    match &cli.command {
        None => bin_flags::gen(&project, &cli.gen.options(), &mut runner, &probe),
        Some(Commands::Lib { build_type }) => {
            bin_flags::gen_lib(&project, &BuildType::new(build_type), &mut runner, &probe)
        }
        Some(Commands::Test {
            build_type,
            build_gtest_only,
        }) => bin_flags::gen_test(
            &project,
            &BuildType::new(build_type),
            *build_gtest_only,
            &mut runner,
            &probe,
        ),
        Some(Commands::Config { .. }) => Ok(()),
    }
}
