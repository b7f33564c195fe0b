//! Candidate assembly and filtering

mod assembler;
mod filter;

pub use assembler::assemble_candidates;
pub use filter::{filter_by_dep, filter_by_risk};
