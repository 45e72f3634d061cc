//! Generate a conda `environment.yml` from a project's `requirements.txt`.
//!
//! The pipeline lives in [`workflow::run`]; repository lookups go through the
//! [`git::Vcs`] trait so callers can supply their own implementation.
pub mod cli;
pub mod environment;
pub mod git;
pub mod logging;
pub mod paths;
pub mod requirements;
pub mod workflow;
