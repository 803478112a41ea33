use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::AnyPool;

use crate::{
    db::{
        queries::{
            categories::category_exists,
            questions::{self, count_questions, get_questions_page, search_questions},
        },
        NewQuestion, Question,
    },
    pagination::PageQuery,
    server::{
        app::{AppState, PageSize},
        ApiError,
    },
    telemetry::record_served,
};

use super::{category_map, ApiResponse, CategoryMap, Json, Path, Query};

#[derive(Deserialize)]
struct SearchRequest {
    #[serde(rename = "searchTerm")]
    search_term: String,
}

#[derive(Deserialize)]
struct CreateRequest {
    question: String,
    answer: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    category: i64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    difficulty: i64,
}

// the frontend posts both searches and new questions to /questions
#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionsRequest {
    Search(SearchRequest),
    Create(CreateRequest),
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    categories: CategoryMap,
    current_category: Option<String>,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: Option<String>,
}

#[derive(Serialize)]
struct Created {
    success: bool,
    created: i64,
}

#[derive(Serialize)]
struct Deleted {
    success: bool,
    deleted: i64,
}

async fn list_questions(
    State(pool): State<AnyPool>,
    State(PageSize(per_page)): State<PageSize>,
    Query(query): Query<PageQuery>,
) -> ApiResponse<Json<QuestionsPage>> {
    let window = query.window(per_page).ok_or(ApiError::NotFound)?;
    let questions = get_questions_page(&pool, window.limit, window.offset).await?;
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }
    record_served("list", questions.len());
    Ok(Json(QuestionsPage {
        success: true,
        questions,
        total_questions: count_questions(&pool).await?,
        categories: category_map(&pool).await?,
        current_category: None,
    }))
}

async fn post_questions(
    State(pool): State<AnyPool>,
    Json(request): Json<QuestionsRequest>,
) -> ApiResponse<Response> {
    match request {
        QuestionsRequest::Search(search) => Ok(run_search(&pool, search).await?.into_response()),
        QuestionsRequest::Create(create) => {
            let created = create_question(&pool, create).await?;
            Ok((StatusCode::CREATED, created).into_response())
        }
    }
}

async fn search(
    State(pool): State<AnyPool>,
    Json(search): Json<SearchRequest>,
) -> ApiResponse<Json<SearchResults>> {
    run_search(&pool, search).await
}

async fn run_search(pool: &AnyPool, search: SearchRequest) -> ApiResponse<Json<SearchResults>> {
    let term = search.search_term.trim();
    if term.is_empty() {
        return Err(ApiError::Unprocessable("empty search term".to_owned()));
    }
    let questions = search_questions(pool, term).await?;
    tracing::debug!(term, found = questions.len(), "Question search");
    record_served("search", questions.len());
    Ok(Json(SearchResults {
        success: true,
        total_questions: questions.len(),
        questions,
        current_category: None,
    }))
}

async fn create_question(pool: &AnyPool, create: CreateRequest) -> ApiResponse<Json<Created>> {
    let question = create.question.trim();
    let answer = create.answer.trim();
    if question.is_empty() || answer.is_empty() {
        return Err(ApiError::Unprocessable(
            "question and answer must not be blank".to_owned(),
        ));
    }
    if !(1..=5).contains(&create.difficulty) {
        return Err(ApiError::Unprocessable(format!(
            "difficulty {} is outside 1..=5",
            create.difficulty
        )));
    }
    if !category_exists(pool, create.category).await? {
        return Err(ApiError::Unprocessable(format!(
            "unknown category {}",
            create.category
        )));
    }

    let id = questions::create_question(
        pool,
        NewQuestion {
            question,
            answer,
            category: create.category,
            difficulty: create.difficulty,
        },
    )
    .await?;
    tracing::info!(id, "Question created");

    Ok(Json(Created {
        success: true,
        created: id,
    }))
}

async fn delete_question(
    State(pool): State<AnyPool>,
    Path(id): Path<i64>,
) -> ApiResponse<Json<Deleted>> {
    questions::delete_question(&pool, id).await?;
    tracing::info!(id, "Question deleted");
    Ok(Json(Deleted {
        success: true,
        deleted: id,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(post_questions))
        .route("/questions/search", post(search))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}
