//! Command-line rewriting for spark-submit.
//!
//! ```text
//! raw args → take existing dependency flags → merge with collected lists
//!          → slot 0 = spark-submit → insert --py-files / --files / --archives
//! ```

mod composer;
mod registry;

pub use composer::compose;
pub use registry::{flag_registry, merged_flags_help, Channel, FlagDef, SUBMIT_PROGRAM};
