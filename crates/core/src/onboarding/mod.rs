//! Onboarding collaborators.
//!
//! Document/selfie validation and postal-code lookup are external services.
//! Only their shapes live here so onboarding flows can depend on them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Data read from an identity document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedDocumentData {
    pub cpf: String,
    pub name: String,
    pub birth_date: String,
}

/// Outcome of a document or selfie validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentValidation {
    pub is_valid: bool,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub extracted_data: Option<ExtractedDocumentData>,
}

/// Opaque validation service for uploaded documents and selfies.
#[async_trait]
pub trait DocumentValidatorTrait: Send + Sync {
    async fn validate_document(&self, file_name: &str, content: &[u8]) -> Result<DocumentValidation>;
    async fn validate_selfie(&self, content: &[u8]) -> Result<DocumentValidation>;
}

/// Structured address returned by a postal-code lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub cep: String,
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

/// External CEP lookup. `Ok(None)` means the postal code does not exist.
#[async_trait]
pub trait AddressLookupTrait: Send + Sync {
    async fn lookup(&self, cep: &str) -> Result<Option<Address>>;
}

/// Strips punctuation from a CEP and checks it has exactly eight digits.
pub fn normalize_cep(cep: &str) -> Option<String> {
    let digits: String = cep.chars().filter(|c| c.is_ascii_digit()).collect();
    let only_digits_and_separators = cep
        .chars()
        .all(|c| c.is_ascii_digit() || c == '-' || c == '.' || c == ' ');
    (digits.len() == 8 && only_digits_and_separators).then_some(digits)
}
