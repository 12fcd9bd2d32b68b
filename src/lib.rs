//! A library for generating and building the KBase CMake project.
//!
//! It picks a generator (Ninja when available, Unix Makefiles otherwise),
//! runs the cmake configure step into `build/<Debug|Release>` and then drives
//! the build with the logical processor count plus two as job count.
//!
//! # Installation
//! ```sh
//! cargo install kbase_gen
//! ```
//!
//! # Examples
//! Configure and build everything in release mode from scratch
//! ```sh
//! kbase_gen --build-type release --rebuild
//! ```
//! Build only the library, then the unit tests
//! ```sh
//! kbase_gen lib --build-type release
//! kbase_gen test --build-type release
//! ```
//!
//! # Sample toml file
//! All keys are optional. The same keys may be stored per user with
//! `kbase_gen config <parameter> <value>`; the project file wins.
//! ```toml
//! # kbase_gen.toml
//!cmake = "/opt/cmake/bin/cmake"
//!generator = "Ninja"
//!msvc_generator = "Visual Studio 17 2022"
//!tests_option = "KBASE_BUILD_UNITTESTS"
//!```

/// Contains the generation runs behind each command
pub mod bin_flags;
/// Contains output directory handling and cmake invocations
pub mod builder;
/// Contains the error type
pub mod error;
/// Contains generator auto-detection
pub mod generator;
/// Handles global config
pub mod global_config;
/// Contains logger and config parser
pub mod utils;
