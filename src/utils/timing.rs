//! Timing utilities for analysis passes
//!
//! Measures elapsed time and formats durations for logs and summaries.

use std::time::{Duration, Instant};

use crate::languages::Language;
use crate::rules::Scope;

/// A simple timer for measuring elapsed time
#[derive(Debug, Clone)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Create a new timer that starts immediately
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Elapsed whole milliseconds, as logged at the end of a run
    pub fn elapsed_millis(&self) -> u128 {
        self.elapsed().as_millis()
    }

    pub fn elapsed_formatted(&self) -> String {
        format_duration(self.elapsed())
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::start()
    }
}

/// Format a duration into a human-readable string
///
/// - Durations >= 1 second: "1.23s"
/// - Durations >= 1 millisecond: "456ms"
/// - Durations < 1 millisecond: "< 1ms"
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();

    if millis == 0 {
        "< 1ms".to_string()
    } else if millis >= 1000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        format!("{}ms", millis)
    }
}

/// Timing of one engine pass over a language and file type
#[derive(Debug, Clone)]
pub struct PassTiming {
    pub language: Language,
    pub scope: Scope,
    pub rule_count: usize,
    pub violation_count: usize,
    pub duration: Duration,
}

impl PassTiming {
    pub fn duration_formatted(&self) -> String {
        format_duration(self.duration)
    }
}

/// Timing of a whole analysis run
#[derive(Debug, Clone, Default)]
pub struct ExecutionTiming {
    pub passes: Vec<PassTiming>,
    pub total_duration: Duration,
}

impl ExecutionTiming {
    pub fn add_pass(&mut self, timing: PassTiming) {
        self.passes.push(timing);
    }

    pub fn total_duration_formatted(&self) -> String {
        format_duration(self.total_duration)
    }
}
