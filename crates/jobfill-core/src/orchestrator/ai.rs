//! AI augmentation: required questions no profile attribute covered.

use jobfill_protocols::{AiAnswer, AnswerProvider, ControlFamily, Field, Page, Question, RunError};
use tracing::{info, warn};

use super::{Orchestrator, RunState, classification_error};
use crate::injector::Answer;
use crate::resolver::AnswerCandidate;
use crate::text::{contains_whole_word, normalize};

/// Document uploads are never answered by text.
const DOCUMENT_WORDS: [&str; 3] = ["resume", "cv", "cover letter"];

fn mentions_document(label: &str) -> bool {
    let label = normalize(label);
    DOCUMENT_WORDS.iter().any(|w| contains_whole_word(&label, w))
}

/// Exact normalized label first, then containment either way.
fn find_answer<'a>(field: &Field, answers: &'a [AiAnswer]) -> Option<&'a AiAnswer> {
    let label = normalize(&field.label);
    answers
        .iter()
        .find(|a| normalize(&a.label) == label)
        .or_else(|| {
            answers.iter().find(|a| {
                let other = normalize(&a.label);
                !other.is_empty() && (label.contains(&other) || other.contains(&label))
            })
        })
}

impl Orchestrator {
    pub(super) async fn augment(
        &self,
        page: &dyn Page,
        provider: &dyn AnswerProvider,
        run: &mut RunState,
    ) -> Result<(), RunError> {
        let mut eligible: Vec<Field> = self
            .classifier
            .scan_static(page)
            .await
            .map_err(classification_error)?
            .into_iter()
            .filter(|f| f.required && !f.answered.is_answered())
            .filter(|f| f.family != ControlFamily::File && !mentions_document(&f.label))
            .filter(|f| !run.is_attempted(f))
            .collect();
        if eligible.is_empty() {
            return Ok(());
        }
        for field in eligible.iter_mut() {
            self.classifier
                .populate_options(page, field)
                .await
                .map_err(classification_error)?;
        }

        let questions: Vec<Question> = eligible.iter().map(Question::from).collect();
        run.ai_submitted += questions.len();
        info!("Asking {} for {} answers", provider.id(), questions.len());

        let answers = match provider.answer_questions(&questions).await {
            Ok(answers) => answers,
            Err(e) => {
                if e.is_transient() {
                    warn!("AI provider {} temporarily unavailable: {}", provider.id(), e);
                } else {
                    warn!("AI provider {} failed: {}", provider.id(), e);
                }
                for field in &eligible {
                    run.claim(field);
                    run.outcome.record_failed(&field.label, format!("AI provider error: {e}"));
                }
                return Ok(());
            }
        };

        for answer in &answers {
            if !eligible.iter().any(|f| find_answer(f, std::slice::from_ref(answer)).is_some()) {
                warn!("AI answered an unknown question '{}'", answer.label);
            }
        }

        for field in &eligible {
            let Some(ai) = find_answer(field, &answers) else {
                run.claim(field);
                run.outcome.record_failed(&field.label, "no AI answer returned");
                continue;
            };
            let text = ai.answer.trim();
            if text.is_empty() {
                run.claim(field);
                run.outcome.record_failed(&field.label, "AI answer was blank");
                continue;
            }
            let answer = if field.kind.is_choice() {
                Answer::choice(AnswerCandidate::single(text).with_short_retry())
            } else {
                Answer::Text(text.to_string())
            };
            if self.apply(page, field, &answer, run).await? {
                run.ai_filled += 1;
            }
        }
        Ok(())
    }
}
