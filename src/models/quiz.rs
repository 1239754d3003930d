// src/models/quiz.rs

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::{Validate, ValidationError};

/// Represents the 'quizzes' table in the database.
///
/// The ordered question list is stored as one JSONB document, so a quiz is
/// always read and written as a single row. Question order is significant:
/// it defines the index alignment used when scoring a submission.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    #[serde(rename = "_id")]
    pub id: i64,

    pub title: String,

    pub questions: Json<Vec<QuizQuestion>>,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A single multiple-choice question. Owned by its quiz; it has no identity
/// or lifecycle of its own.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    #[validate(length(
        min = 5,
        max = 200,
        message = "Question text must be between 5 and 200 characters."
    ))]
    pub question: String,

    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,

    /// Index into `options`; always within [0, 3] once validated.
    #[validate(range(min = 0, max = 3, message = "Correct index must be between 0 and 3."))]
    pub correct_index: i64,
}

/// Listing DTO: id, title and creation time only.
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    #[serde(rename = "_id")]
    pub id: i64,
    pub title: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating a new quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(min = 3, max = 100, message = "Title must be between 3 and 100 characters."))]
    pub title: String,

    #[validate(length(min = 1, message = "A quiz must have at least one question."), nested)]
    pub questions: Vec<QuizQuestion>,
}

impl CreateQuizRequest {
    /// Strips surrounding whitespace from every text field before
    /// validation, so the length bounds apply to what actually gets stored.
    pub fn normalize(&mut self) {
        self.title = self.title.trim().to_string();
        for question in &mut self.questions {
            question.question = question.question.trim().to_string();
            for option in &mut question.options {
                *option = option.trim().to_string();
            }
        }
    }
}

/// DTO for submitting answers to a quiz.
/// `answers` is optional at the serde level so its absence maps to a
/// validation message instead of a deserialization failure. The elements
/// themselves are never rejected: null means unanswered, and an
/// out-of-range index simply scores as wrong.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubmitQuizRequest {
    pub answers: Option<Vec<Option<i64>>>,
}

/// Server-computed result of one submission. Never persisted; recomputed
/// from scratch on every submit.
#[derive(Debug, Serialize)]
pub struct SubmissionResult {
    pub total: usize,
    pub score: usize,
    pub details: Vec<AnswerDetail>,
}

/// Per-question breakdown echoed back to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDetail {
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: i64,
    /// The submitted option index, or null when the question went
    /// unanswered.
    pub your_answer: Option<i64>,
}

fn validate_options(options: &[String]) -> Result<(), ValidationError> {
    if options.len() != 4 {
        let mut err = ValidationError::new("options_length");
        err.message = Some(Cow::from("Each question must have exactly 4 options."));
        return Err(err);
    }
    if options.iter().any(|option| option.trim().is_empty()) {
        let mut err = ValidationError::new("option_empty");
        err.message = Some(Cow::from("Options must be non-empty."));
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validate::validation_messages;

    fn valid_request() -> CreateQuizRequest {
        CreateQuizRequest {
            title: "Rust Basics".to_string(),
            questions: vec![QuizQuestion {
                question: "Which keyword declares an immutable binding?".to_string(),
                options: vec![
                    "let".to_string(),
                    "mut".to_string(),
                    "static".to_string(),
                    "const".to_string(),
                ],
                correct_index: 0,
            }],
        }
    }

    #[test]
    fn valid_quiz_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn normalize_trims_all_text_fields() {
        let mut request = valid_request();
        request.title = "  Rust Basics  ".to_string();
        request.questions[0].question = " Which keyword declares an immutable binding? ".to_string();
        request.questions[0].options[2] = " static ".to_string();

        request.normalize();

        assert_eq!(request.title, "Rust Basics");
        assert_eq!(
            request.questions[0].question,
            "Which keyword declares an immutable binding?"
        );
        assert_eq!(request.questions[0].options[2], "static");
    }

    #[test]
    fn short_title_is_rejected() {
        let mut request = valid_request();
        request.title = "ab".to_string();

        let errors = request.validate().unwrap_err();
        let messages = validation_messages(&errors);
        assert!(
            messages
                .iter()
                .any(|m| m.contains("Title must be between 3 and 100 characters."))
        );
    }

    #[test]
    fn empty_question_list_is_rejected() {
        let mut request = valid_request();
        request.questions.clear();

        let errors = request.validate().unwrap_err();
        let messages = validation_messages(&errors);
        assert!(
            messages
                .iter()
                .any(|m| m.contains("A quiz must have at least one question."))
        );
    }

    #[test]
    fn wrong_option_count_is_rejected() {
        let mut request = valid_request();
        request.questions[0].options.pop();

        let errors = request.validate().unwrap_err();
        let messages = validation_messages(&errors);
        assert!(
            messages
                .iter()
                .any(|m| m.contains("Each question must have exactly 4 options."))
        );
    }

    #[test]
    fn out_of_range_correct_index_is_rejected() {
        let mut request = valid_request();
        request.questions[0].correct_index = 4;

        let errors = request.validate().unwrap_err();
        let messages = validation_messages(&errors);
        assert!(
            messages
                .iter()
                .any(|m| m.contains("Correct index must be between 0 and 3."))
        );
    }

    #[test]
    fn all_violations_are_reported_together() {
        let request = CreateQuizRequest {
            title: "ab".to_string(),
            questions: vec![QuizQuestion {
                question: "hm?".to_string(),
                options: vec!["A".to_string(), "B".to_string(), "C".to_string()],
                correct_index: 7,
            }],
        };

        let errors = request.validate().unwrap_err();
        let messages = validation_messages(&errors);
        // Title, question text, option count and correct index all at once.
        assert!(messages.len() >= 4, "got: {messages:?}");
    }
}
