use serde::Serialize;

use dendrite_core::{ChainResult, ErrorEnvelope, SuccessEnvelope};

/// The serverless platform response shape consumers conventionally wrap an
/// envelope in: the envelope status becomes `statusCode` and the envelope
/// data is serialized into `body`.
///
/// This mapping is a consumer collaborator; the executor itself never
/// produces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LambdaResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl LambdaResponse {
    pub fn from_success(envelope: &SuccessEnvelope) -> Result<Self, serde_json::Error> {
        Ok(Self {
            status_code: envelope.status,
            body: serde_json::to_string(&envelope.data)?,
        })
    }

    pub fn from_error(envelope: &ErrorEnvelope) -> Result<Self, serde_json::Error> {
        Ok(Self {
            status_code: envelope.status,
            body: serde_json::to_string(&envelope.data)?,
        })
    }

    /// Collapse either outcome of a chain run into the platform shape.
    pub fn from_result(result: &ChainResult) -> Result<Self, serde_json::Error> {
        match result {
            Ok(envelope) => Self::from_success(envelope),
            Err(envelope) => Self::from_error(envelope),
        }
    }
}
