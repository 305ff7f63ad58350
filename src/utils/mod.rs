//! Utility modules for rulebridge

pub mod command;
pub mod timing;
pub mod xml;

pub use timing::{format_duration, Timer};
