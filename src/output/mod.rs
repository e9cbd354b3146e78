//! Report assembly and rendering

pub mod formatter;
pub mod report;
