use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ErrorEnvelope;

/// Status carried by every success envelope.
pub const OK_STATUS: u16 = 200;

/// Outcome of a chain run.
///
/// Success and failure travel separate channels; both shapes carry a
/// `status` field, but only the `Ok` channel is success.
pub type ChainResult = Result<SuccessEnvelope, ErrorEnvelope>;

/// The uniform success shape: the accumulated running context with the seed
/// and bookkeeping keys stripped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuccessEnvelope {
    pub status: u16,
    pub data: Map<String, Value>,
}

impl SuccessEnvelope {
    pub(crate) fn new(data: Map<String, Value>) -> Self {
        Self {
            status: OK_STATUS,
            data,
        }
    }
}
