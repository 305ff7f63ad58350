//! Error types for rulebridge
//!
//! This module defines custom error types using `thiserror`. Configuration
//! problems are fatal and abort the current analysis; rule-definition load
//! failures are logged and degrade to "no rules from this resource".

use thiserror::Error;

/// Main error type for rulebridge
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors raised while invoking the analysis engine
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Ruleset serialization or parsing errors
    #[error("Ruleset error: {0}")]
    RuleSet(#[from] RuleSetError),

    /// Generic I/O failure outside of a more specific context
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML serialization failure
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// JSON serialization failure
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Fatal configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        /// Path to the configuration file
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Failed to parse the configuration file
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        /// Path to the configuration file
        path: String,
        /// The underlying TOML error
        source: toml::de::Error,
    },

    /// A classpath dependency could not be resolved to an absolute path
    #[error("Failed to create the isolated execution context. Dependency is invalid: '{path}': {source}")]
    UnresolvableDependency {
        /// The dependency as configured
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// An expression rule lacks one of its mandatory properties
    #[error("Property '{property}' should be set for expression rule '{rule}'")]
    MissingExpressionProperty {
        /// Rule key of the offending active rule
        rule: String,
        /// Name of the missing property
        property: &'static str,
    },

    /// The synthesized ruleset could not be written to the working directory
    #[error("Failed to save the ruleset to '{path}': {source}")]
    RuleSetWrite {
        /// Target path
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The XML report dump could not be written
    #[error("Failed to save the report to '{path}': {source}")]
    ReportWrite {
        /// Target path
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// A language key that is not known to rulebridge
    #[error("Unknown language '{0}' (expected one of: java, kotlin, apex)")]
    UnknownLanguage(String),

    /// A severity string that does not name a severity
    #[error("Invalid severity '{0}' (expected one of: info, minor, major, critical, blocker)")]
    InvalidSeverity(String),

    /// A Java source version that is not a number
    #[error("Invalid Java source version '{0}'")]
    InvalidJavaVersion(String),

    /// An invalid glob in the scanner configuration
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The pattern as configured
        pattern: String,
        /// Description of the problem
        message: String,
    },
}

/// Errors raised while running the external analysis engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine executable could not be located
    #[error("Engine executable '{0}' was not found on PATH")]
    NotFound(String),

    /// The engine process could not be started
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The engine exited with a status that signals an aborted run
    #[error("'{program}' failed with exit code {code}: {stderr}")]
    Failed {
        /// Program that failed
        program: String,
        /// Exit code reported by the process
        code: i32,
        /// Captured standard error
        stderr: String,
    },

    /// The engine's XML report could not be read
    #[error("Failed to read engine report '{path}': {message}")]
    Report {
        /// Path to the report file
        path: String,
        /// Description of the problem
        message: String,
    },

    /// Scratch files needed by the engine could not be prepared
    #[error("Failed to prepare engine input '{path}': {source}")]
    Input {
        /// Path that could not be written
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },
}

/// Errors produced while reading or writing ruleset documents
#[derive(Error, Debug)]
pub enum RuleSetError {
    /// Failed to serialize a ruleset
    #[error("An error occurred while serializing the ruleset: {0}")]
    Serialize(String),

    /// Failed to parse a ruleset document
    #[error("The ruleset document is not valid: {0}")]
    Parse(String),
}

/// Non-fatal errors encountered while loading a rule-definition resource
#[derive(Error, Debug)]
pub enum DefinitionError {
    /// The resource could not be read
    #[error("Cannot read rule definitions '{path}': {source}")]
    Read {
        /// Resource identity
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The resource is not well-formed XML
    #[error("Failed to parse rule definitions '{path}': {message}")]
    Xml {
        /// Resource identity
        path: String,
        /// Description of the problem
        message: String,
    },
}
