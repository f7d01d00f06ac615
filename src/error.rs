use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt::Display;

/// Request field that failed validation, named as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidField {
    Estado,
    Caracteristicas,
    Categorias,
    Ciudad,
    Km,
    Usuario,
    TopN,
}

impl InvalidField {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvalidField::Estado => "estado",
            InvalidField::Caracteristicas => "caracteristicas",
            InvalidField::Categorias => "categorias",
            InvalidField::Ciudad => "ciudad",
            InvalidField::Km => "km",
            InvalidField::Usuario => "usuario",
            InvalidField::TopN => "top_n",
        }
    }
}

impl Display for InvalidField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Invalid field: {0}")]
    Validation(InvalidField),

    #[error("Lookup miss: {0}")]
    LookupMiss(String),

    #[error("No businesses match the requested filters")]
    EmptyCandidateSet,

    #[error("Scoring error: {0}")]
    Scoring(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Data(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Data(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Data(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(field) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "detail": format!("BAD REQUEST: invalid '{}'", field),
                    "field": field.as_str(),
                }),
            ),
            // Lookup misses stay generic so callers can't probe reference tables
            AppError::LookupMiss(_) => (StatusCode::BAD_REQUEST, json!({ "detail": "BAD REQUEST" })),
            AppError::EmptyCandidateSet => (
                StatusCode::BAD_REQUEST,
                json!({ "detail": "no businesses match the requested filters" }),
            ),
            AppError::Scoring(_) | AppError::Data(_) | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "detail": self.to_string() }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
