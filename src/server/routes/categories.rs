use axum::{extract::State, routing::get, Router};
use serde::Serialize;
use sqlx::AnyPool;

use crate::{
    db::{
        queries::{categories::get_category, questions::get_questions_for_category},
        Question,
    },
    server::{app::AppState, ApiError},
    telemetry::record_served,
};

use super::{category_map, ApiResponse, CategoryMap, Json, Path};

#[derive(Serialize)]
struct CategoriesBody {
    success: bool,
    categories: CategoryMap,
    total_categories: usize,
}

#[derive(Serialize)]
struct CategoryQuestionsBody {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: String,
}

async fn get_categories(State(pool): State<AnyPool>) -> ApiResponse<Json<CategoriesBody>> {
    let categories = category_map(&pool).await?;
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(CategoriesBody {
        success: true,
        total_categories: categories.len(),
        categories,
    }))
}

async fn questions_for_category(
    State(pool): State<AnyPool>,
    Path(id): Path<i64>,
) -> ApiResponse<Json<CategoryQuestionsBody>> {
    let category = get_category(&pool, id).await?;
    let questions = get_questions_for_category(&pool, category.id).await?;
    record_served("category", questions.len());
    Ok(Json(CategoryQuestionsBody {
        success: true,
        total_questions: questions.len(),
        questions,
        current_category: category.name,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(questions_for_category))
        .with_state(state)
}
