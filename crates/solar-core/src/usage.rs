//! # Usage Module
//!
//! Running token totals for the lifetime of the process.
//!
//! The tracker is mutated only after a completion succeeded, and can be
//! shared between concurrent tool calls: every update happens under one lock.
//! Counters use saturating arithmetic to prevent overflow.

use crate::types::Usage;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};

/// Snapshot of the accumulated usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    pub total_prompt_tokens: u64,
    pub total_completion_tokens: u64,
    pub total_tokens: u64,
    pub request_count: u64,
}

#[derive(Debug, Default)]
struct Counters {
    prompt_tokens: u64,
    completion_tokens: u64,
    requests: u64,
}

/// Thread-safe accumulator of token usage.
#[derive(Debug, Default)]
pub struct UsageTracker {
    counters: Mutex<Counters>,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Counters> {
        // Poisoning is ignored: counters are plain integers.
        self.counters.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record the usage of one completed request.
    ///
    /// `usage.total_tokens` is not read: totals are always derived from the
    /// prompt and completion counts.
    pub fn add_usage(&self, usage: &Usage) {
        let mut counters = self.lock();
        counters.prompt_tokens = counters.prompt_tokens.saturating_add(usage.prompt_tokens);
        counters.completion_tokens = counters
            .completion_tokens
            .saturating_add(usage.completion_tokens);
        counters.requests = counters.requests.saturating_add(1);
    }

    /// Current totals.
    pub fn stats(&self) -> UsageStats {
        let counters = self.lock();
        UsageStats {
            total_prompt_tokens: counters.prompt_tokens,
            total_completion_tokens: counters.completion_tokens,
            total_tokens: counters
                .prompt_tokens
                .saturating_add(counters.completion_tokens),
            request_count: counters.requests,
        }
    }

    /// Zero every counter.
    pub fn reset(&self) {
        *self.lock() = Counters::default();
    }
}

// =============================================================================
// TESTS
// =============================================================================
