//! rulebridge library
//!
//! Classifies analyzer rules by scope, synthesizes scope-restricted engine
//! rulesets from an active-rule selection, drives the external engine per
//! language and file type, and maps its violations back to source ranges.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod languages;
pub mod location;
pub mod orchestrator;
pub mod recorder;
pub mod rules;
pub mod ruleset;
pub mod scanner;
pub mod utils;

pub use error::BridgeError;
