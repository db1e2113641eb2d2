//! Prompt tree compilation.
//!
//! # Responsibility
//! - Serialize active topics into the positive and undesired prompt strings.
//!
//! # Invariants
//! - Compilation is pure and deterministic; topic and item order is kept.
//! - Topic boundaries are not visible in the output.

pub mod prompt_compiler;

pub use prompt_compiler::{clean_fragment, compile_prompt, CompiledPrompt, MAX_WRAP_DEPTH};
