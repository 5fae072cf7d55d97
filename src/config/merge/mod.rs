//! Source composition for compiler config.

pub mod merge_policy;
pub mod service;
