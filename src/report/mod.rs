//! Report assembly

mod builder;

pub use builder::build_report;
