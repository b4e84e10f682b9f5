use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use snafu::IntoError as _;

use crate::prelude::*;
use crate::seo::SeoError;
use crate::store::StoreError;

#[derive(Debug, Snafu, Serialize)]
#[snafu(visibility(pub))]
#[serde(tag = "error", content = "data")]
pub enum ApiError {
    #[snafu(display("content `{content_id}` does not exist"))]
    NotFound {
        content_id: String,

        #[serde(skip)]
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("query parameter `{parameter}` must be between {min} and {max}, got {value}"))]
    InvalidQuery {
        parameter: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    #[snafu(display("failed to query the store"))]
    Query {
        #[serde(skip)]
        source: StoreError,

        #[serde(skip)]
        #[snafu(implicit)]
        location: Location,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidQuery { .. } => StatusCode::BAD_REQUEST,
            ApiError::Query { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SeoError> for ApiError {
    fn from(error: SeoError) -> Self {
        match error {
            SeoError::NotFound { content_id, .. } => NotFoundSnafu { content_id }.build(),
            SeoError::LoadContent { source, .. } => QuerySnafu.into_error(source),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    message: String,
    #[serde(flatten)]
    data: ApiError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Query { source, location } = &self {
            tracing::error!(%source, %location, "request failed on a store error");
        }

        let status = self.status();
        let content = ErrorResponse {
            message: self.to_string(),
            data: self,
        };

        (status, Json(content)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_message_and_tag() {
        let error = InvalidQuerySnafu {
            parameter: "days",
            value: 400u64,
            min: 1u64,
            max: 365u64,
        }
        .build();

        let json = serde_json::to_value(ErrorResponse {
            message: error.to_string(),
            data: error,
        })
        .unwrap();

        assert_eq!(json["error"], "InvalidQuery");
        assert_eq!(json["data"]["parameter"], "days");
        assert_eq!(
            json["message"],
            "query parameter `days` must be between 1 and 365, got 400"
        );
    }

    #[test]
    fn store_errors_are_internal() {
        let error = QuerySnafu.into_error(StoreError::Unavailable {
            message: "down".into(),
        });

        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.to_string(), "failed to query the store");
    }
}
