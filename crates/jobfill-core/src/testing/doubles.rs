//! Recording stand-ins for the AI provider and the host shell.

use async_trait::async_trait;
use jobfill_protocols::{AiAnswer, AnswerProvider, FillStatus, ProviderError, Question, ShellNotifier};
use parking_lot::Mutex;

/// Answers from a fixed script and remembers every batch it was asked.
pub(crate) struct ScriptedProvider {
    answers: Vec<AiAnswer>,
    fail: bool,
    asked: Mutex<Vec<Vec<Question>>>,
}

impl ScriptedProvider {
    pub(crate) fn answering(pairs: &[(&str, &str)]) -> Self {
        Self {
            answers: pairs
                .iter()
                .map(|(label, answer)| AiAnswer {
                    label: label.to_string(),
                    answer: answer.to_string(),
                })
                .collect(),
            fail: false,
            asked: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::answering(&[])
        }
    }

    pub(crate) fn asked(&self) -> Vec<Vec<Question>> {
        self.asked.lock().clone()
    }
}

#[async_trait]
impl AnswerProvider for ScriptedProvider {
    fn id(&self) -> &str {
        "scripted"
    }

    async fn answer_questions(&self, questions: &[Question]) -> Result<Vec<AiAnswer>, ProviderError> {
        self.asked.lock().push(questions.to_vec());
        if self.fail {
            return Err(ProviderError::Network("connection refused".to_string()));
        }
        Ok(self.answers.clone())
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    statuses: Mutex<Vec<(String, FillStatus)>>,
    configuration_requests: Mutex<usize>,
}

impl RecordingNotifier {
    pub(crate) fn statuses(&self) -> Vec<FillStatus> {
        self.statuses.lock().iter().map(|(_, s)| s.clone()).collect()
    }

    pub(crate) fn configuration_requests(&self) -> usize {
        *self.configuration_requests.lock()
    }
}

impl ShellNotifier for RecordingNotifier {
    fn status(&self, url: &str, status: FillStatus) {
        self.statuses.lock().push((url.to_string(), status));
    }

    fn open_configuration(&self) {
        *self.configuration_requests.lock() += 1;
    }
}
