use std::collections::HashSet;

use axum::{extract::State, routing::post, Router};
use serde::{Deserialize, Serialize};
use sqlx::AnyPool;

use crate::{
    db::{
        queries::{categories::category_exists, questions::get_shuffled_questions},
        Question,
    },
    server::{app::AppState, deserializers::deserialize_category_filter, ApiError},
    telemetry::{record_served, QUIZ_ROUNDS_CNTR},
};

use super::{ApiResponse, Json};

#[derive(Deserialize)]
struct QuizCategory {
    #[serde(default, deserialize_with = "deserialize_category_filter")]
    id: Option<i64>,
}

#[derive(Deserialize)]
struct QuizRequest {
    #[serde(default)]
    previous_questions: Vec<i64>,
    #[serde(default)]
    quiz_category: Option<QuizCategory>,
}

#[derive(Serialize)]
struct QuizResponse {
    success: bool,
    question: Option<Question>,
}

/// Draws a random question that has not been asked yet; `null` once the pool is exhausted.
async fn next_question(
    State(pool): State<AnyPool>,
    Json(request): Json<QuizRequest>,
) -> ApiResponse<Json<QuizResponse>> {
    let category = request.quiz_category.and_then(|c| c.id);
    if let Some(id) = category {
        if !category_exists(&pool, id).await? {
            return Err(ApiError::NotFound);
        }
    }

    let asked: HashSet<i64> = request.previous_questions.into_iter().collect();
    let question = get_shuffled_questions(&pool, category)
        .await?
        .into_iter()
        .find(|q| !asked.contains(&q.id));

    QUIZ_ROUNDS_CNTR.inc();
    if question.is_some() {
        record_served("quiz", 1);
    }
    Ok(Json(QuizResponse {
        success: true,
        question,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_question))
        .with_state(state)
}
