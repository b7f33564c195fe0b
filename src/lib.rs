//! depwhy - Outdated Node.js dependency report library
//!
//! This library provides the core functionality for explaining upgrades:
//! - Lockfile indexes for npm, pnpm, yarn (classic and berry) and bun
//! - Candidate assembly from upgrade suggestions and manifests
//! - Semantic-version risk classification and filtering
//! - Evidence collection from the npm registry and GitHub
//! - Grouped Markdown and JSON reports

pub mod candidates;
pub mod cli;
pub mod domain;
pub mod error;
pub mod evidence;
pub mod lockfile;
pub mod manifest;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod report;
pub mod suggestion;
