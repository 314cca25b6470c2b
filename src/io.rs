//! Boundary serialization: request parsing and result emission.
//!
//! A generation request is a single JSON document carrying an optional
//! `config` object next to the entity collections. Unknown fields are
//! ignored; missing required fields and structurally invalid entities
//! are rejected here, before solving begins.

use std::io::{Read, Write};

use serde::Deserialize;
use thiserror::Error;

use crate::engine::{GenerationConfig, GenerationResult};
use crate::models::Entities;
use crate::validation::{self, ValidationError};

/// A parsed generation request: configuration plus entities.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerationRequest {
    /// Request options; every field is defaulted.
    #[serde(default)]
    pub config: GenerationConfig,
    /// Entity collections, at the document's top level.
    #[serde(flatten)]
    pub entities: Entities,
}

/// Failure to turn a request document into a usable request.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The document is not valid JSON or misses required fields.
    #[error("malformed request document: {0}")]
    Parse(#[from] serde_json::Error),
    /// The entities are structurally inconsistent.
    #[error("invalid request entities ({} issues)", .0.len())]
    Invalid(Vec<ValidationError>),
}

impl RequestError {
    /// Stable `invalid_input:<detail>` slug for failure documents.
    pub fn slug(&self) -> String {
        match self {
            RequestError::Parse(_) => "invalid_input:malformed_document".to_string(),
            RequestError::Invalid(errors) => match errors.first() {
                Some(err) => format!("invalid_input:{}", err.kind.slug()),
                None => "invalid_input:malformed_document".to_string(),
            },
        }
    }
}

/// Reads and validates a request document.
pub fn read_request(reader: impl Read) -> Result<GenerationRequest, RequestError> {
    let request: GenerationRequest = serde_json::from_reader(reader)?;
    validation::validate_entities(&request.entities).map_err(RequestError::Invalid)?;
    Ok(request)
}

/// Writes a result document.
pub fn write_result(
    mut writer: impl Write,
    result: &GenerationResult,
) -> Result<(), serde_json::Error> {
    serde_json::to_writer_pretty(&mut writer, result)?;
    writeln!(writer).map_err(serde_json::Error::io)?;
    Ok(())
}
