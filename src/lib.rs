//! Stage Python dependencies for `spark-submit` and rewrite its command line.
//!
//! ```text
//! ssp.toml → Settings → refresh staging → collect → compose → spark-submit
//! ```

pub mod args;
pub mod collect;
pub mod config;
pub mod logging;
pub mod staging;
pub mod submit;
