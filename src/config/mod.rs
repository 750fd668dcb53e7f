// src/config/mod.rs
//! Runtime configuration that lives outside the lexicon and roster documents.

pub mod ai;

pub use ai::AiConfig;
