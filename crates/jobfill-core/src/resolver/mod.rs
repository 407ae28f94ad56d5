//! Answer resolution: deciding what to write into a field.

pub mod candidates;
pub mod location;
pub mod phone;
pub mod rules;

use jobfill_config::MatchingConfig;
use jobfill_protocols::{Field, FieldError, FieldKind};
use tracing::debug;

pub use candidates::AnswerCandidate;
use rules::{ScoringRule, Verdict, default_rules};

use crate::text::normalize;

/// The chosen option for one candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    pub option_index: usize,
    pub score: u32,
    /// Which candidate string produced the match.
    pub candidate_index: usize,
}

/// What the injector should write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Text(String),
    Choice {
        index: usize,
        text: String,
        score: u32,
    },
    /// Options are not known until the widget is opened.
    Deferred,
}

/// Scores candidate strings against option sets.
pub struct Resolver {
    rules: Vec<Box<dyn ScoringRule>>,
    threshold: u32,
}

impl Resolver {
    pub fn new(config: &MatchingConfig) -> Self {
        Self {
            rules: default_rules(config),
            threshold: config.acceptance_threshold,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Score one option against one candidate. The first rule with an
    /// opinion decides; a veto scores zero.
    pub fn score(&self, option: &str, candidate: &str) -> u32 {
        let option = normalize(option);
        let candidate = normalize(candidate);
        if option.is_empty() || candidate.is_empty() {
            return 0;
        }
        for rule in &self.rules {
            match rule.score(&option, &candidate) {
                Verdict::Score(score) => return score,
                Verdict::Veto => return 0,
                Verdict::NoOpinion => {}
            }
        }
        0
    }

    /// Best option for the first candidate that clears the threshold.
    ///
    /// Within one candidate the highest score wins; ties go to the shorter option text.
    pub fn best_match(&self, options: &[String], candidates: &AnswerCandidate) -> Option<MatchResult> {
        for (candidate_index, candidate) in candidates.iter().enumerate() {
            let mut best: Option<(usize, u32)> = None;
            for (index, option) in options.iter().enumerate() {
                let score = self.score(option, candidate);
                if score == 0 {
                    continue;
                }
                let better = match best {
                    None => true,
                    Some((best_index, best_score)) => {
                        score > best_score
                            || (score == best_score
                                && option.trim().chars().count()
                                    < options[best_index].trim().chars().count())
                    }
                };
                if better {
                    best = Some((index, score));
                }
            }
            match best {
                Some((option_index, score)) if score >= self.threshold => {
                    debug!(
                        "Matched '{}' to option '{}' ({})",
                        candidate, options[option_index], score
                    );
                    return Some(MatchResult {
                        option_index,
                        score,
                        candidate_index,
                    });
                }
                Some((_, score)) => {
                    debug!("Best score for '{}' is {}, below threshold", candidate, score);
                }
                None => {}
            }
        }
        None
    }

    /// Resolve a field against a candidate list using its scanned state.
    pub fn resolve(&self, field: &Field, candidates: &AnswerCandidate) -> Result<Resolution, FieldError> {
        if field.answered.is_answered() {
            return Err(FieldError::AlreadyAnswered);
        }
        match field.kind {
            FieldKind::FreeText => candidates
                .first()
                .map(|v| Resolution::Text(v.to_string()))
                .ok_or(FieldError::NoMatch),
            FieldKind::File => Err(FieldError::NoMatch),
            FieldKind::Binary if field.options.len() == 1 => {
                if candidates.iter().any(candidates::is_affirmative) {
                    Ok(Resolution::Choice {
                        index: 0,
                        text: field.options[0].clone(),
                        score: self.threshold,
                    })
                } else {
                    Err(FieldError::NoMatch)
                }
            }
            _ if field.options.is_empty() => Ok(Resolution::Deferred),
            _ => self
                .best_match(&field.options, candidates)
                .map(|m| Resolution::Choice {
                    index: m.option_index,
                    text: field.options[m.option_index].clone(),
                    score: m.score,
                })
                .ok_or(FieldError::NoMatch),
        }
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
