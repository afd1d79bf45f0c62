//! Result reporting
//!
//! - [`csv`]: one row per snapshot, written while the run progresses
//! - [`json`]: machine-readable summary written at the end
//! - [`text`]: human-readable report on stdout

pub mod csv;
pub mod json;
pub mod text;
