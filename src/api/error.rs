use crate::application::{book::BookApplicationError, loan::LoanApplicationError};
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use validator::ValidationErrors;

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーとリクエスト検証のエラーをHTTPレスポンスにマッピングする。
#[derive(Debug)]
pub enum ApiError {
    /// 404 Not Found
    NotFound(String),
    /// 400 Bad Request（1件以上のメッセージ）
    BadRequest(Vec<String>),
    /// 500 Internal Server Error（詳細はログのみ）
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(vec![message.into()])
    }
}

impl From<BookApplicationError> for ApiError {
    fn from(err: BookApplicationError) -> Self {
        match err {
            BookApplicationError::BookNotFound => ApiError::NotFound(err.to_string()),
            // ビジネスルール違反・引数不正は 400
            BookApplicationError::DuplicateIsbn | BookApplicationError::InvalidArgument(_) => {
                ApiError::bad_request(err.to_string())
            }
            BookApplicationError::StoreError(ref e) => {
                ApiError::Internal(format!("{}: {:?}", err, e))
            }
        }
    }
}

impl From<LoanApplicationError> for ApiError {
    fn from(err: LoanApplicationError) -> Self {
        match err {
            LoanApplicationError::LoanNotFound => ApiError::NotFound(err.to_string()),
            LoanApplicationError::BookAlreadyLoaned
            | LoanApplicationError::BookNotFound
            | LoanApplicationError::InvalidArgument(_) => ApiError::bad_request(err.to_string()),
            LoanApplicationError::StoreError(ref e) => {
                ApiError::Internal(format!("{}: {:?}", err, e))
            }
            LoanApplicationError::NotificationError(ref e) => {
                ApiError::Internal(format!("{}: {:?}", err, e))
            }
        }
    }
}

/// フィールドごとに1件のメッセージを返す
impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        messages.sort();

        ApiError::BadRequest(messages)
    }
}

// 抽出器の拒否はすべて 400。本文は axum のメッセージをそのまま使う
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, ErrorResponse::new(message)),
            ApiError::BadRequest(messages) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::many(messages))
            }
            ApiError::Internal(detail) => {
                // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("An unexpected error occurred"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
