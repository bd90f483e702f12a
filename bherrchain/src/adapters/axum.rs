// Copyright (C) 2020-2026  The Blockhouse Technology Limited (TBTL).
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or (at your
// option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public
// License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! [Error] adapter for the [axum] web framework.
//!
//! This module implements [`axum::response::IntoResponse`] for [`Error`], so that handlers can
//! return [`crate::Result`] directly.  The HTTP status is taken from the [cause][Error::cause] of
//! the error if it is an [`HttpError`], otherwise it is [`StatusCode::INTERNAL_SERVER_ERROR`].
//! The body is the rendered message of the error.
//!
//! Use [`crate::wrap`] or [`PropagateError`][crate::traits::PropagateError] to attach an
//! [`HttpError`] as the cause of an error.

pub use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::Error;

/// Foreign error carrying the [HTTP Status Code][StatusCode] to respond with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    /// Creates the error from the status and a message.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Get the [HTTP Status Code][StatusCode] of this error.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for HttpError {}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self
            .cause()
            .downcast_foreign_ref::<HttpError>()
            .map_or(StatusCode::INTERNAL_SERVER_ERROR, HttpError::status);
        (status, self.to_string()).into_response()
    }
}
