//! Engine tuning: scoring constants and wait durations.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Scores for each option-matching rule and the acceptance threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    #[serde(default = "default_exact")]
    pub exact_score: u32,

    /// Candidate appears as a whole word inside the option.
    #[serde(default = "default_whole_word")]
    pub whole_word_score: u32,

    /// Candidate is a word-aligned prefix of the option.
    #[serde(default = "default_prefix")]
    pub prefix_score: u32,

    /// Option is a word-aligned prefix of the candidate.
    #[serde(default = "default_reverse_prefix")]
    pub reverse_prefix_score: u32,

    /// Candidate and option are both ways of declining to answer.
    #[serde(default = "default_decline")]
    pub decline_score: u32,

    /// Option contains the candidate as a plain substring.
    #[serde(default = "default_contains")]
    pub contains_score: u32,

    /// Candidate contains the option as a plain substring.
    #[serde(default = "default_reverse_contains")]
    pub reverse_contains_score: u32,

    /// Minimum length of the contained string for loose substring matches.
    #[serde(default = "default_loose_min_len")]
    pub loose_min_len: usize,

    #[serde(default = "default_overlap_base")]
    pub overlap_base: u32,

    #[serde(default = "default_overlap_step")]
    pub overlap_step: u32,

    #[serde(default = "default_overlap_min_tokens")]
    pub overlap_min_tokens: usize,

    #[serde(default = "default_acceptance_threshold")]
    pub acceptance_threshold: u32,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            exact_score: default_exact(),
            whole_word_score: default_whole_word(),
            prefix_score: default_prefix(),
            reverse_prefix_score: default_reverse_prefix(),
            decline_score: default_decline(),
            contains_score: default_contains(),
            reverse_contains_score: default_reverse_contains(),
            loose_min_len: default_loose_min_len(),
            overlap_base: default_overlap_base(),
            overlap_step: default_overlap_step(),
            overlap_min_tokens: default_overlap_min_tokens(),
            acceptance_threshold: default_acceptance_threshold(),
        }
    }
}

fn default_exact() -> u32 {
    100
}

fn default_whole_word() -> u32 {
    90
}

fn default_prefix() -> u32 {
    80
}

fn default_reverse_prefix() -> u32 {
    85
}

fn default_decline() -> u32 {
    85
}

fn default_contains() -> u32 {
    70
}

fn default_reverse_contains() -> u32 {
    50
}

fn default_loose_min_len() -> usize {
    5
}

fn default_overlap_base() -> u32 {
    40
}

fn default_overlap_step() -> u32 {
    10
}

fn default_overlap_min_tokens() -> usize {
    2
}

fn default_acceptance_threshold() -> u32 {
    40
}

/// Wait and pacing durations, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Polls for a form signal before giving up.
    pub readiness_tries: u32,
    pub readiness_delay: u64,
    pub hydration_timeout: u64,
    pub hydration_stable: u64,
    /// Extra delay after hydration settles.
    pub hydration_buffer: u64,
    pub settle_timeout: u64,
    pub settle_stable: u64,
    /// Poll interval while waiting for DOM quiescence.
    pub quiet_poll: u64,
    /// Bound on waiting for a freshly opened option list.
    pub probe_timeout: u64,
    pub probe_poll: u64,
    /// Options captured per widget during a scan.
    pub probe_max_options: usize,
    /// Wait after typing into a statically filtered list.
    pub static_list_wait: u64,
    /// Wait after typing into a network-backed search list.
    pub network_list_wait: u64,
    /// Delay between widget interactions.
    pub pacing: u64,
    /// Delay before the one post-hydration retry.
    pub retry_delay: u64,
    pub url_poll: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            readiness_tries: 30,
            readiness_delay: 400,
            hydration_timeout: 20_000,
            hydration_stable: 1_000,
            hydration_buffer: 400,
            settle_timeout: 3_000,
            settle_stable: 500,
            quiet_poll: 200,
            probe_timeout: 1_500,
            probe_poll: 80,
            probe_max_options: 30,
            static_list_wait: 300,
            network_list_wait: 1_000,
            pacing: 300,
            retry_delay: 1_800,
            url_poll: 800,
        }
    }
}

impl TimingConfig {
    /// Convert a millisecond setting.
    pub fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }
}
