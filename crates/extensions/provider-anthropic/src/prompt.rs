//! Prompt construction and answer extraction.

use jobfill_protocols::{AiAnswer, ProviderError, Question};
use serde_json::Value;

pub const SYSTEM_PROMPT: &str = "You fill in job application forms on behalf of an applicant. \
Answer every question you are given, truthfully and concisely, in the applicant's voice. \
When a question lists options, answer with the exact text of one option. \
Reply with a JSON array only, one object per question: [{\"label\": \"<question label>\", \"answer\": \"<answer>\"}].";

/// User message listing the questions, with optional applicant background.
pub fn user_message(questions: &[Question], applicant: Option<&str>) -> Result<String, ProviderError> {
    let questions = serde_json::to_string_pretty(questions)
        .map_err(|e| ProviderError::InvalidRequest(e.to_string()))?;
    let mut message = String::new();
    if let Some(applicant) = applicant {
        message.push_str("Applicant background:\n");
        message.push_str(applicant);
        message.push_str("\n\n");
    }
    message.push_str("Questions:\n");
    message.push_str(&questions);
    Ok(message)
}

/// Pull the answer array out of the model's reply. Surrounding prose and
/// code fences are tolerated; entries without a label or answer are dropped.
pub fn parse_answers(text: &str) -> Result<Vec<AiAnswer>, ProviderError> {
    let start = text.find('[');
    let end = text.rfind(']');
    let (Some(start), Some(end)) = (start, end) else {
        return Err(ProviderError::MalformedResponse(format!(
            "no JSON array in reply: {}",
            truncate(text)
        )));
    };
    if end < start {
        return Err(ProviderError::MalformedResponse(truncate(text)));
    }

    let items: Vec<Value> = serde_json::from_str(&text[start..=end])
        .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;
    Ok(items
        .into_iter()
        .filter_map(|item| {
            let label = item.get("label")?.as_str()?.trim().to_string();
            let answer = match item.get("answer")? {
                Value::String(s) => s.clone(),
                Value::Null => return None,
                other => other.to_string(),
            };
            (!label.is_empty()).then_some(AiAnswer { label, answer })
        })
        .collect())
}

fn truncate(text: &str) -> String {
    text.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobfill_protocols::FieldKind;

    fn question(label: &str) -> Question {
        Question {
            label: label.to_string(),
            kind: FieldKind::SingleChoice,
            required: true,
            options: Some(vec!["Yes".to_string(), "No".to_string()]),
            placeholder: None,
        }
    }

    #[test]
    fn test_user_message_lists_questions() {
        let message = user_message(&[question("Are you over 18?")], Some("Name: Ana Silva")).unwrap();
        assert!(message.starts_with("Applicant background:\nName: Ana Silva"));
        assert!(message.contains("\"label\": \"Are you over 18?\""));
        assert!(message.contains("\"kind\": \"single_choice\""));
    }

    #[test]
    fn test_parse_plain_array() {
        let answers = parse_answers(r#"[{"label": "Why us?", "answer": "Mission"}]"#).unwrap();
        assert_eq!(answers, vec![AiAnswer {
            label: "Why us?".to_string(),
            answer: "Mission".to_string(),
        }]);
    }

    #[test]
    fn test_parse_fenced_reply() {
        let text = "Here you go:\n```json\n[{\"label\": \"Years\", \"answer\": 5}, {\"label\": \"\", \"answer\": \"x\"}]\n```";
        let answers = parse_answers(text).unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].answer, "5");
    }

    #[test]
    fn test_parse_without_array_is_malformed() {
        let err = parse_answers("I cannot help with that.").unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_null_answer_dropped() {
        let answers = parse_answers(r#"[{"label": "Salary", "answer": null}]"#).unwrap();
        assert!(answers.is_empty());
    }
}
