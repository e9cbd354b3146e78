//! Keyword matching and scoring engine

pub mod vocabulary;
pub mod keyword_extractor;
pub mod alternatives;
pub mod match_scorer;
pub mod similarity;
pub mod analyzer;
