//! リクエスト抽出器
//!
//! axum 標準の抽出器を包み、拒否を `ApiError`（`{"errors": [...]}` の 400）に変換する。

use axum::extract::{FromRequest, FromRequestParts};

use super::error::ApiError;

/// JSONボディ
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// パスパラメータ
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// クエリパラメータ
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
