// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for DOE-2 validation, property application and INP parsing

use thiserror::Error;

/// Result type alias for DOE-2 operations
pub type Result<T> = std::result::Result<T, Doe2Error>;

/// Errors that can occur while validating models or reading INP files
#[derive(Error, Debug)]
pub enum Doe2Error {
    /// One or more validation checks found issues
    ///
    /// Carries the full newline-joined report.
    #[error("{0}")]
    Validation(String),

    /// A dictionary does not follow the expected schema
    #[error("Invalid schema: {0}")]
    Schema(String),

    /// A property was assigned a value outside its allowed range
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// A distance string could not be interpreted
    #[error("Invalid distance string: {0:?}")]
    InvalidDistance(String),

    /// An INP command block could not be parsed (strict mode only)
    #[error("Invalid INP block at line {line}: {message}")]
    InvalidBlock { line: usize, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Doe2Error {
    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Doe2Error::Validation(msg.into())
    }

    /// Create a new schema error
    pub fn schema(msg: impl Into<String>) -> Self {
        Doe2Error::Schema(msg.into())
    }

    /// Create a new invalid value error
    pub fn invalid_value(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Doe2Error::InvalidValue {
            field: field.into(),
            message: msg.into(),
        }
    }

    /// Create a new block parse error
    pub fn invalid_block(line: usize, msg: impl Into<String>) -> Self {
        Doe2Error::InvalidBlock {
            line,
            message: msg.into(),
        }
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Doe2Error::Other(msg.into())
    }

    /// Whether this error came from a failed validation run
    pub fn is_validation(&self) -> bool {
        matches!(self, Doe2Error::Validation(_))
    }

    /// Whether this error signals a schema precondition violation
    pub fn is_schema(&self) -> bool {
        matches!(self, Doe2Error::Schema(_))
    }
}
