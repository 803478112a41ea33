mod categories;
mod questions;
mod quizzes;

use std::collections::BTreeMap;

use axum::extract::{FromRequest, FromRequestParts};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use sqlx::AnyPool;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

use crate::db::queries::categories::get_all_categories;
use crate::server::ApiError;

pub type ApiResponse<T> = Result<T, ApiError>;

/// `axum::Json` answering malformed bodies with the API error format.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        let Self(value) = self;
        axum::Json(value).into_response()
    }
}

/// `axum::extract::Query` answering malformed query strings with the API error format.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);

/// Categories keyed by id, serialized as a JSON object.
pub type CategoryMap = BTreeMap<i64, String>;

async fn category_map(pool: &AnyPool) -> sqlx::Result<CategoryMap> {
    Ok(get_all_categories(pool)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect())
}
