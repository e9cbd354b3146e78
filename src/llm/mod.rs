//! Qualitative (LLM) analysis integration

pub mod analysis;
