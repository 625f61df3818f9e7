//! srcsel-core: platform-conditional source selection
//!
//! This crate models a build environment record, computes the
//! platform-conditional source filter, and resolves which source files
//! enter the build.

mod discover;
mod env;
mod error;
mod filter;
mod platform;
mod project;
mod select;

pub use discover::discover_sources;
pub use env::{BuildEnv, EnvValue};
pub use error::CoreError;
pub use filter::{SrcFilter, SrcPattern};
pub use platform::TargetFamily;
pub use project::{DEFAULT_CONFIG, EnvSection, ProjectConfig, ProjectSection};
pub use select::{PLATFORM_VAR, SRC_FILTER_VAR, select_sources};

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
