//! Output module for run reporting
//!
//! Each pipeline returns a [`RunReport`]; the binaries print it with
//! [`print_report`] when the run is over.

mod report;

pub use report::{print_report, Pipeline, RunReport, SkippedPage};
