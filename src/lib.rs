//! agentc: Agent and Skill Prompt Compiler
//!
//! Compiles a registry of agents and skills, per-profile configuration, and
//! technology stacks into generated agent documents, skill directories, command
//! files, and a root document. Output is deterministic for unchanged inputs and
//! is committed all at once or not at all.

pub mod compiler;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod profile;
pub mod registry;
pub mod render;
pub mod resolve;
pub mod stack;
pub mod tooling;
pub mod types;
pub mod validation;
