//! Staging area for derived artifacts.
//!
//! ```text
//! distribution_dir/
//!   <source>_src/      one zip per subdirectory of source_code_dir
//!   <code>_code/       one zip per subdirectory of include_code_dir
//!   <assets>_assets/   one zip per subdirectory of include_assets_dir
//! libraries_dir/       wheels downloaded from the requirements file
//! ```
//!
//! Both roots are wiped at the start of every run. Concurrent runs against
//! the same directories are not supported.

mod archive;
mod error;
mod listing;
mod planner;
mod resolver;

pub use archive::archive_top_level_dirs;
pub use error::StagingError;
pub use listing::{read_manifest, top_level_dirs, top_level_files};
pub use planner::{distribution_path, refresh_distribution, reset_dir, StagingKind};
pub use resolver::{PackageResolver, PipWheel, ResolveError};
