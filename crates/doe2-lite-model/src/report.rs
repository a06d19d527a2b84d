// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Check options, report shapes and report aggregation
//!
//! Every check in this workspace follows the same reporting contract:
//!
//! - with `raise_on_error`, any finding turns into [`Doe2Error::Validation`]
//! - otherwise a plain message string is returned (empty when clean)
//! - or, when `detailed` is requested, a list of [`ValidationIssue`] records
//!
//! Raising and detailed output are mutually exclusive: `detailed` is
//! cleared whenever `raise_on_error` is set.

use crate::{Doe2Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reporting options for a check run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckOptions {
    /// Fail with a validation error when issues are found
    pub raise_on_error: bool,
    /// Return structured issue records instead of a message
    pub detailed: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            raise_on_error: true,
            detailed: false,
        }
    }
}

impl CheckOptions {
    /// Raise on error, message output
    pub fn new() -> Self {
        Self::default()
    }

    /// Never raise, return a message string
    pub fn report_only() -> Self {
        Self {
            raise_on_error: false,
            detailed: false,
        }
    }

    /// Never raise, return structured issue records
    pub fn detailed_report() -> Self {
        Self {
            raise_on_error: false,
            detailed: true,
        }
    }

    /// Set whether to raise on error
    pub fn with_raise_on_error(mut self, enabled: bool) -> Self {
        self.raise_on_error = enabled;
        self
    }

    /// Set whether to return structured records
    pub fn with_detailed(mut self, enabled: bool) -> Self {
        self.detailed = enabled;
        self
    }

    /// Clamp `detailed` off when raising
    pub fn normalized(self) -> Self {
        Self {
            raise_on_error: self.raise_on_error,
            detailed: self.detailed && !self.raise_on_error,
        }
    }

    /// Options handed to a delegated check: never raise, same output shape
    pub fn delegated(self) -> Self {
        let normalized = self.normalized();
        Self {
            raise_on_error: false,
            detailed: normalized.detailed,
        }
    }
}

/// A single structured validation finding
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Record type tag, always "ValidationError"
    #[serde(rename = "type")]
    pub kind: String,
    /// Six-digit error code
    pub code: String,
    /// Short human-readable error category
    pub error_type: String,
    /// Extension that produced the issue (e.g. "Core", "Energy", "DOE2")
    pub extension_type: String,
    /// Type of the offending element (e.g. "Room", "Face")
    pub element_type: String,
    /// Identifiers of the offending elements
    pub element_id: Vec<String>,
    /// Display names of the offending elements
    pub element_name: Vec<String>,
    /// Full message
    pub message: String,
}

impl ValidationIssue {
    /// Create a new issue from the "Core" extension
    pub fn new(
        code: impl Into<String>,
        error_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: "ValidationError".to_string(),
            code: code.into(),
            error_type: error_type.into(),
            extension_type: "Core".to_string(),
            element_type: String::new(),
            element_id: Vec::new(),
            element_name: Vec::new(),
            message: message.into(),
        }
    }

    /// Issue for a message that came without structured information
    pub fn unclassified(message: impl Into<String>) -> Self {
        Self::new("000000", "Unknown Error", message)
    }

    /// Set the producing extension
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension_type = extension.into();
        self
    }

    /// Attach an offending element
    pub fn with_element(
        mut self,
        element_type: impl Into<String>,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.element_type = element_type.into();
        self.element_id.push(id.into());
        self.element_name.push(name.into());
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Output of a check run in one of the two non-raising shapes
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CheckOutcome {
    /// Newline-joined messages, empty when no issues were found
    Message(String),
    /// Structured records, empty when no issues were found
    Detailed(Vec<ValidationIssue>),
}

impl Default for CheckOutcome {
    fn default() -> Self {
        CheckOutcome::Message(String::new())
    }
}

impl CheckOutcome {
    /// Empty outcome in the requested shape
    pub fn empty(detailed: bool) -> Self {
        if detailed {
            CheckOutcome::Detailed(Vec::new())
        } else {
            CheckOutcome::Message(String::new())
        }
    }

    /// Check if no issues were reported
    pub fn is_empty(&self) -> bool {
        match self {
            CheckOutcome::Message(msg) => msg.is_empty(),
            CheckOutcome::Detailed(issues) => issues.is_empty(),
        }
    }

    /// Get the message if this is a message outcome
    pub fn as_message(&self) -> Option<&str> {
        match self {
            CheckOutcome::Message(msg) => Some(msg),
            CheckOutcome::Detailed(_) => None,
        }
    }

    /// Get the records if this is a detailed outcome
    pub fn issues(&self) -> Option<&[ValidationIssue]> {
        match self {
            CheckOutcome::Message(_) => None,
            CheckOutcome::Detailed(issues) => Some(issues),
        }
    }

    /// Render the outcome as a single message
    pub fn to_message(&self) -> String {
        match self {
            CheckOutcome::Message(msg) => msg.clone(),
            CheckOutcome::Detailed(issues) => issues
                .iter()
                .map(|issue| issue.message.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Convert into structured records
    pub fn into_issues(self) -> Vec<ValidationIssue> {
        match self {
            CheckOutcome::Message(msg) if msg.is_empty() => Vec::new(),
            CheckOutcome::Message(msg) => vec![ValidationIssue::unclassified(msg)],
            CheckOutcome::Detailed(issues) => issues,
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_message())
    }
}

/// Collects outcomes from a battery of checks and produces the final report
///
/// Outcomes are kept in push order. Empty outcomes are dropped. An outcome
/// of the other shape than requested is converted (records are rendered to
/// their messages, a message becomes an unclassified record).
#[derive(Debug)]
pub struct ReportBuilder {
    options: CheckOptions,
    messages: Vec<String>,
    issues: Vec<ValidationIssue>,
}

impl ReportBuilder {
    /// Create a builder; the options are normalized here
    pub fn new(options: CheckOptions) -> Self {
        Self {
            options: options.normalized(),
            messages: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Normalized options of this run
    pub fn options(&self) -> CheckOptions {
        self.options
    }

    /// Options to hand to each delegated check
    pub fn delegated(&self) -> CheckOptions {
        self.options.delegated()
    }

    /// Whether structured records are being collected
    pub fn detailed(&self) -> bool {
        self.options.detailed
    }

    /// Add the outcome of one check
    pub fn push(&mut self, outcome: CheckOutcome) {
        if outcome.is_empty() {
            return;
        }
        if self.options.detailed {
            self.issues.extend(outcome.into_issues());
        } else {
            self.messages.push(outcome.to_message());
        }
    }

    /// Number of non-empty findings collected so far
    pub fn len(&self) -> usize {
        if self.options.detailed {
            self.issues.len()
        } else {
            self.messages.len()
        }
    }

    /// Check if nothing has been found
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Produce the final report, failing if raising was requested and issues exist
    pub fn finish(self) -> Result<CheckOutcome> {
        if self.options.detailed {
            return Ok(CheckOutcome::Detailed(self.issues));
        }
        let full_msg = self.messages.join("\n");
        if self.options.raise_on_error && !self.messages.is_empty() {
            return Err(Doe2Error::Validation(full_msg));
        }
        Ok(CheckOutcome::Message(full_msg))
    }
}
