//! Integration tests driving the compiler and CLI context against fixture trees

pub mod support;

mod cli_contracts;
mod compile_pipeline;
