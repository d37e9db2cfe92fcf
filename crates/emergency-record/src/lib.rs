//! Emergency medical record model and its QR payload encoding.
//!
//! The record is a fixed set of named fields collected by the caller.
//! [`payload::serialize`] turns it into the JSON document embedded in the
//! QR code; [`payload::deserialize`] reads it back.

pub mod payload;
pub mod record;

pub use payload::{DOCUMENT_TYPE, deserialize, serialize};
pub use record::{EmergencyRecord, RequiredField};

/// Errors produced while validating or (de)serializing a record.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Please fill in the {0} field")]
    MissingField(RequiredField),

    #[error("Document type is {0:?}, expected \"MEDICAL_EMERGENCY\"")]
    NotEmergencyRecord(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
