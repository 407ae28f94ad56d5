//! AI answer collaborator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::field::{Field, FieldKind};

/// A question submitted to the AI collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl From<&Field> for Question {
    fn from(field: &Field) -> Self {
        Self {
            label: field.label.clone(),
            kind: field.kind,
            required: field.required,
            options: (!field.options.is_empty()).then(|| field.options.clone()),
            placeholder: field.placeholder.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiAnswer {
    pub label: String,
    pub answer: String,
}

/// Generates answers for questions no profile attribute covers.
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    /// Provider identifier, used in logs.
    fn id(&self) -> &str;

    async fn answer_questions(&self, questions: &[Question]) -> Result<Vec<AiAnswer>, ProviderError>;
}
