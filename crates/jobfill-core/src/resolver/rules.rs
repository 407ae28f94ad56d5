//! Option scoring rules.
//!
//! Rules run in order against one (option, candidate) pair; the first rule
//! with an opinion decides that pair's score. Both inputs are normalized.

use jobfill_config::MatchingConfig;

use crate::text::{contains_whole_word, is_word_prefix, tokens};

/// A rule's opinion on one option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Score(u32),
    /// Hard exclusion: the option must score zero.
    Veto,
    NoOpinion,
}

pub trait ScoringRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn score(&self, option: &str, candidate: &str) -> Verdict;
}

/// The standard rule chain for a matching configuration.
pub fn default_rules(config: &MatchingConfig) -> Vec<Box<dyn ScoringRule>> {
    vec![
        Box::new(Exact {
            score: config.exact_score,
        }),
        Box::new(GenderExclusion),
        Box::new(DeclineEquivalence {
            score: config.decline_score,
        }),
        Box::new(WholeWord {
            score: config.whole_word_score,
        }),
        Box::new(Prefix {
            score: config.prefix_score,
            reverse_score: config.reverse_prefix_score,
            loose_min_len: config.loose_min_len,
        }),
        Box::new(LooseSubstring {
            score: config.contains_score,
            reverse_score: config.reverse_contains_score,
            min_len: config.loose_min_len,
        }),
        Box::new(WordOverlap {
            base: config.overlap_base,
            step: config.overlap_step,
            min_tokens: config.overlap_min_tokens,
        }),
    ]
}

pub struct Exact {
    pub score: u32,
}

impl ScoringRule for Exact {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn score(&self, option: &str, candidate: &str) -> Verdict {
        if option == candidate {
            Verdict::Score(self.score)
        } else {
            Verdict::NoOpinion
        }
    }
}

const MALE_TERMS: &[&str] = &["male", "man", "men"];
const FEMALE_TERMS: &[&str] = &["female", "woman", "women"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sex {
    Male,
    Female,
}

fn sex_of(text: &str) -> Option<Sex> {
    let male = MALE_TERMS.iter().any(|t| contains_whole_word(text, t));
    let female = FEMALE_TERMS.iter().any(|t| contains_whole_word(text, t));
    match (male, female) {
        (true, false) => Some(Sex::Male),
        (false, true) => Some(Sex::Female),
        _ => None,
    }
}

/// A gendered candidate never matches an option naming the other gender.
pub struct GenderExclusion;

impl ScoringRule for GenderExclusion {
    fn name(&self) -> &'static str {
        "gender_exclusion"
    }

    fn score(&self, option: &str, candidate: &str) -> Verdict {
        let opposite = match sex_of(candidate) {
            Some(Sex::Male) => FEMALE_TERMS,
            Some(Sex::Female) => MALE_TERMS,
            None => return Verdict::NoOpinion,
        };
        if opposite.iter().any(|t| contains_whole_word(option, t)) {
            Verdict::Veto
        } else {
            Verdict::NoOpinion
        }
    }
}

const DECLINE_ANSWERS: &[&str] = &["decline", "prefer not", "don't wish", "do not wish"];
const DECLINE_OPTIONS: &[&str] = &[
    "decline",
    "prefer not",
    "don't wish",
    "do not wish",
    "do not want",
    "not to disclose",
];

/// Any way of declining matches any other: "prefer not to say" picks
/// "Decline To Self Identify".
pub struct DeclineEquivalence {
    pub score: u32,
}

impl ScoringRule for DeclineEquivalence {
    fn name(&self) -> &'static str {
        "decline_equivalence"
    }

    fn score(&self, option: &str, candidate: &str) -> Verdict {
        let declines = DECLINE_ANSWERS.iter().any(|t| candidate.contains(t));
        if declines && DECLINE_OPTIONS.iter().any(|t| option.contains(t)) {
            Verdict::Score(self.score)
        } else {
            Verdict::NoOpinion
        }
    }
}

pub struct WholeWord {
    pub score: u32,
}

impl ScoringRule for WholeWord {
    fn name(&self) -> &'static str {
        "whole_word"
    }

    fn score(&self, option: &str, candidate: &str) -> Verdict {
        if contains_whole_word(option, candidate) {
            Verdict::Score(self.score)
        } else {
            Verdict::NoOpinion
        }
    }
}

/// One side starts the other. Short prefixes must end on a word boundary so
/// "no" does not claim "none of the above".
pub struct Prefix {
    pub score: u32,
    pub reverse_score: u32,
    pub loose_min_len: usize,
}

impl Prefix {
    fn accepts(&self, whole: &str, prefix: &str) -> bool {
        if prefix.is_empty() || whole.len() <= prefix.len() || !whole.starts_with(prefix) {
            return false;
        }
        is_word_prefix(whole, prefix) || prefix.chars().count() >= self.loose_min_len
    }
}

impl ScoringRule for Prefix {
    fn name(&self) -> &'static str {
        "prefix"
    }

    fn score(&self, option: &str, candidate: &str) -> Verdict {
        if self.accepts(candidate, option) {
            Verdict::Score(self.reverse_score)
        } else if self.accepts(option, candidate) {
            Verdict::Score(self.score)
        } else {
            Verdict::NoOpinion
        }
    }
}

pub struct LooseSubstring {
    pub score: u32,
    pub reverse_score: u32,
    pub min_len: usize,
}

impl ScoringRule for LooseSubstring {
    fn name(&self) -> &'static str {
        "loose_substring"
    }

    fn score(&self, option: &str, candidate: &str) -> Verdict {
        if candidate.chars().count() >= self.min_len && option.contains(candidate) {
            Verdict::Score(self.score)
        } else if option.chars().count() >= self.min_len && candidate.contains(option) {
            Verdict::Score(self.reverse_score)
        } else {
            Verdict::NoOpinion
        }
    }
}

pub struct WordOverlap {
    pub base: u32,
    pub step: u32,
    pub min_tokens: usize,
}

impl ScoringRule for WordOverlap {
    fn name(&self) -> &'static str {
        "word_overlap"
    }

    fn score(&self, option: &str, candidate: &str) -> Verdict {
        let option_tokens = tokens(option);
        let overlap = tokens(candidate)
            .iter()
            .filter(|t| option_tokens.contains(t))
            .count();
        if overlap >= self.min_tokens {
            Verdict::Score(self.base + self.step * overlap as u32)
        } else {
            Verdict::NoOpinion
        }
    }
}
