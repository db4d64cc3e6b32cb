use serde::Serialize;
use thiserror::Error;

use crate::UNKNOWN_STEP;

/// Status used when a failure carries no explicit override.
pub const DEFAULT_ERROR_STATUS: u16 = 500;
/// Message used when a failure carries no usable message.
pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong";

/// A captured failure.
///
/// Tagged rather than duck-typed: an optional numeric status, an optional
/// message, and an optional attributed step name. Records missing any of
/// these are normalized when formatted into an [`ErrorEnvelope`], never
/// dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", .message.as_deref().unwrap_or(DEFAULT_ERROR_MESSAGE))]
pub struct ErrorRecord {
    status: Option<u16>,
    message: Option<String>,
    step: Option<String>,
}

impl ErrorRecord {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Override the envelope status this failure will surface with.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Pre-attribute this failure to a step. The executor only fills the
    /// name in when it is absent.
    pub fn with_step(mut self, step: impl Into<String>) -> Self {
        self.step = Some(step.into());
        self
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn step(&self) -> Option<&str> {
        self.step.as_deref()
    }

    /// Stamp the originating step, unless the record already carries one.
    pub(crate) fn attribute_to(&mut self, step: &str) {
        if self.step.is_none() {
            self.step = Some(step.to_string());
        }
    }
}

impl From<&str> for ErrorRecord {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for ErrorRecord {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// The uniform failure shape surfaced to callers.
///
/// Travels the error channel of [`ChainResult`](crate::ChainResult); callers
/// distinguish success from failure by that channel, never by inspecting
/// `status`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("chain failed in {}: {} (status {})", .data.func, .data.message, .status)]
pub struct ErrorEnvelope {
    pub status: u16,
    pub data: ErrorBody,
}

/// Body of an [`ErrorEnvelope`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub func: String,
}

impl ErrorEnvelope {
    /// Normalize a captured record into the envelope shape.
    ///
    /// `status` falls back to 500 and `message` to the fixed default; `func`
    /// falls through explicit attribution, then the step in effect at
    /// capture time, then the literal `"unknown function"`.
    pub fn from_record(record: ErrorRecord, current_step: Option<&str>) -> Self {
        let status = record.status().unwrap_or(DEFAULT_ERROR_STATUS);
        let message = match record.message() {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => DEFAULT_ERROR_MESSAGE.to_string(),
        };
        let func = record
            .step()
            .or(current_step)
            .unwrap_or(UNKNOWN_STEP)
            .to_string();
        Self {
            status,
            data: ErrorBody { message, func },
        }
    }
}
