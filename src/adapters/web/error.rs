//! Apology error responses.
//!
//! Every validation and business-rule failure renders the same apology page
//! carrying the message and a status code; only the status varies by kind.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use askama::Template;

use crate::domain::error::PapertradeError;

#[derive(Debug)]
pub struct Apology {
    pub status: StatusCode,
    pub message: String,
}

impl Apology {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<PapertradeError> for Apology {
    fn from(err: PapertradeError) -> Self {
        let status = match &err {
            PapertradeError::MissingField { .. }
            | PapertradeError::InvalidQuantity { .. }
            | PapertradeError::PasswordMismatch => StatusCode::BAD_REQUEST,
            PapertradeError::UnknownSymbol { .. }
            | PapertradeError::InsufficientCash { .. }
            | PapertradeError::InsufficientShares { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            PapertradeError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            PapertradeError::UsernameTaken { .. } => StatusCode::CONFLICT,
            PapertradeError::QuoteProvider { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for Apology {
    fn into_response(self) -> Response {
        let template = super::templates::ApologyTemplate {
            message: self.message.clone(),
            status: self.status.as_u16(),
        };
        match template.render() {
            Ok(html) => (self.status, Html(html)).into_response(),
            Err(_) => (self.status, self.message).into_response(),
        }
    }
}
