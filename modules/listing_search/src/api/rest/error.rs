//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::SearchError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// RFC-9457 Problem Details for HTTP API errors
#[derive(Debug, Serialize, ToSchema)]
pub struct Problem {
    /// A URI reference that identifies the problem type
    #[serde(rename = "type")]
    pub type_uri: String,

    /// A short, human-readable summary of the problem type
    pub title: String,

    /// The HTTP status code
    pub status: u16,

    /// A human-readable explanation specific to this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Extension: marketplace side the query vocabulary points at
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_mode: Option<String>,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.io/{}", status.as_u16()),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            suggested_mode: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_suggested_mode(mut self, mode: impl Into<String>) -> Self {
        self.suggested_mode = Some(mode.into());
        self
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self)).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}

/// Map domain errors to HTTP Problem Details
pub fn map_domain_error(error: SearchError) -> Problem {
    match error {
        SearchError::NoFiltersInferred {
            query,
            suggested_mode,
        } => {
            let problem = Problem::new(StatusCode::UNPROCESSABLE_ENTITY, "Could Not Infer Filters")
                .with_detail(format!(
                    "could not infer filters from query '{query}'; try naming a category, location or amount"
                ));
            match suggested_mode {
                Some(mode) => problem.with_suggested_mode(mode.as_str()),
                None => problem,
            }
        }

        SearchError::Validation { message } => {
            Problem::new(StatusCode::BAD_REQUEST, "Validation Error").with_detail(message)
        }

        SearchError::Backend { message } => {
            Problem::new(StatusCode::BAD_GATEWAY, "Search Backend Error").with_detail(message)
        }

        SearchError::Internal => Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            .with_detail("An unexpected error occurred"),
    }
}
