//! Targets: named output platforms with their own templates and output
//! declarations.
//!
//! A target lives in `<targets root>/<name>/` and contains a `params` file,
//! a `partials/` directory and an `outputs/` directory of (possibly nested)
//! output templates.

pub mod dir;
pub mod filters;
pub mod loader;

pub use dir::{TargetDir, TargetsDir, TARGETS_DIR_ENV};
pub use loader::{CompiledOutput, Target};
