// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    models::quiz::{
        AnswerDetail, CreateQuizRequest, Quiz, QuizQuestion, QuizSummary, SubmissionResult,
        SubmitQuizRequest,
    },
    utils::validate::validation_messages,
};

/// Creates a new quiz.
///
/// Text fields are trimmed first, then the whole request is validated;
/// every violation is reported at once and nothing is stored unless all
/// checks pass.
pub async fn create_quiz(
    State(pool): State<PgPool>,
    Json(mut payload): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.normalize();
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::Validation(validation_messages(&validation_errors)));
    }

    let quiz = sqlx::query_as::<_, Quiz>(
        r#"
        INSERT INTO quizzes (title, questions)
        VALUES ($1, $2)
        RETURNING id, title, questions, created_at
        "#,
    )
    .bind(&payload.title)
    .bind(sqlx::types::Json(&payload.questions))
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create quiz: {:?}", e);
        AppError::from(e)
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": quiz })),
    ))
}

/// Lists all quizzes as lightweight summaries, newest first.
pub async fn list_quizzes(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let quizzes = sqlx::query_as::<_, QuizSummary>(
        r#"
        SELECT id, title, created_at
        FROM quizzes
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(json!({ "success": true, "data": quizzes })))
}

/// Retrieves a single quiz by id. Reading never mutates anything, so two
/// consecutive fetches of the same id return identical data.
pub async fn get_quiz(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_quiz_id(&id)?;

    let quiz = fetch_quiz(&pool, id).await?;

    Ok(Json(json!({ "success": true, "data": quiz })))
}

/// Scores a submission against the stored quiz.
///
/// The result is a pure function of the stored quiz and the given answers.
/// Nothing is persisted: no submission record exists and the quiz itself is
/// never touched.
pub async fn submit_quiz(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
    Json(payload): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_quiz_id(&id)?;

    let answers = payload.answers.ok_or_else(|| {
        AppError::Validation(vec!["Answers must be provided as an array.".to_string()])
    })?;

    let quiz = fetch_quiz(&pool, id).await?;

    let result = score_submission(&quiz.questions, &answers);

    Ok(Json(json!({ "success": true, "data": result })))
}

fn parse_quiz_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::BadRequest("Invalid quiz ID.".to_string()))
}

async fn fetch_quiz(pool: &PgPool, id: i64) -> Result<Quiz, AppError> {
    sqlx::query_as::<_, Quiz>(
        r#"
        SELECT id, title, questions, created_at
        FROM quizzes
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Quiz not found.".to_string()))
}

/// One point per question whose submitted option index exactly matches the
/// stored correct index, walked in the quiz's stored order.
///
/// Entries beyond the answer list and explicit nulls count as unanswered.
/// An out-of-range index never matches and therefore scores as wrong; it is
/// not an error.
fn score_submission(questions: &[QuizQuestion], answers: &[Option<i64>]) -> SubmissionResult {
    let mut score = 0;
    let mut details = Vec::with_capacity(questions.len());

    for (index, question) in questions.iter().enumerate() {
        let given = answers.get(index).copied().flatten();
        if given == Some(question.correct_index) {
            score += 1;
        }
        details.push(AnswerDetail {
            question: question.question.clone(),
            options: question.options.clone(),
            correct_index: question.correct_index,
            your_answer: given,
        });
    }

    SubmissionResult {
        total: questions.len(),
        score,
        details,
    }
}
