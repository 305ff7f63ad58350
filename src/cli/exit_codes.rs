//! Exit codes for the CLI
//!
//! | Code | Constant | Meaning |
//! |------|----------|---------|
//! | 0 | `SUCCESS` | Analysis completed without issues |
//! | 2 | `ISSUES` | Issues were recorded |
//! | 3 | `ERROR` | Configuration or engine error |
//! | 4 | `INVALID_ARGS` | Invalid arguments |

/// Success - no issues found or operation completed successfully.
pub const SUCCESS: i32 = 0;

/// Issues were recorded by `analyze`.
pub const ISSUES: i32 = 2;

/// Runtime error.
///
/// Used when:
/// - Configuration file not found or invalid
/// - A dependency or ruleset artifact cannot be resolved or written
/// - The engine is missing or aborted
pub const ERROR: i32 = 3;

/// Invalid arguments (unknown language, unreadable input file).
pub const INVALID_ARGS: i32 = 4;
