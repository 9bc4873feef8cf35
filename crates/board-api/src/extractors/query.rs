//! Comment listing query parameters
//!
//! `GET /comments?page&limit&sort&parentComment`. `parentComment=null`
//! selects top-level comments only; an id selects that comment's replies;
//! leaving it out lists everything.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use board_core::{CommentSort, ParentFilter, Snowflake};
use serde::Deserialize;

use crate::response::ApiError;

/// Raw query string values
#[derive(Debug, Default, Deserialize)]
pub struct CommentListParams {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default, rename = "parentComment", alias = "parent_comment")]
    pub parent_comment: Option<String>,
}

/// Parsed listing parameters. Absent values are left for the service to
/// default from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentListQuery {
    pub parent: ParentFilter,
    pub sort: Option<CommentSort>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

fn positive(value: Option<&str>, message: &str) -> Result<Option<u32>, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => match raw.parse::<u32>() {
            Ok(n) if n >= 1 => Ok(Some(n)),
            _ => Err(ApiError::invalid_query(message)),
        },
    }
}

impl TryFrom<CommentListParams> for CommentListQuery {
    type Error = ApiError;

    fn try_from(params: CommentListParams) -> Result<Self, Self::Error> {
        let page = positive(params.page.as_deref(), "Page must be a positive integer")?;
        // Values above the configured maximum are capped later, not rejected
        let limit = match params.limit.as_deref().map(str::trim) {
            Some(raw) if raw.parse::<u64>().is_ok_and(|n| n > u64::from(u32::MAX)) => {
                Some(u32::MAX)
            }
            other => positive(other, "Limit must be a positive integer")?,
        };

        let sort = params
            .sort
            .as_deref()
            .map(str::parse::<CommentSort>)
            .transpose()
            .map_err(|e| ApiError::invalid_query(e.to_string()))?;

        let parent = match params.parent_comment.as_deref().map(str::trim) {
            None | Some("") => ParentFilter::Any,
            Some("null") => ParentFilter::TopLevel,
            Some(raw) => Snowflake::parse(raw)
                .map(ParentFilter::RepliesTo)
                .map_err(|_| ApiError::invalid_query("Invalid parentComment id"))?,
        };

        Ok(Self {
            parent,
            sort,
            page,
            limit,
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CommentListQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<CommentListParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.to_string()))?;

        CommentListQuery::try_from(params)
    }
}
