//! Multipart form payloads for file and blob uploads.

use crate::{ApiError, Result};
use bytes::Bytes;
use reqwest::multipart::{Form, Part};

/// A single form field.
#[derive(Debug, Clone)]
pub enum FormValue {
    /// Plain text field.
    Text(String),
    /// Binary field, sent as a file part.
    Blob {
        /// Contents.
        bytes: Bytes,
        /// File name reported to the server.
        file_name: Option<String>,
        /// MIME type, e.g. `image/png`.
        mime: Option<String>,
    },
}

/// Flat key/value form payload. Values are never flattened further.
#[derive(Debug, Clone, Default)]
pub struct FormPayload {
    entries: Vec<(String, FormValue)>,
}

impl FormPayload {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field.
    pub fn text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), FormValue::Text(value.into())));
        self
    }

    /// Add a binary field.
    pub fn blob(
        mut self,
        key: impl Into<String>,
        bytes: impl Into<Bytes>,
        file_name: Option<&str>,
        mime: Option<&str>,
    ) -> Self {
        self.entries.push((
            key.into(),
            FormValue::Blob {
                bytes: bytes.into(),
                file_name: file_name.map(str::to_string),
                mime: mime.map(str::to_string),
            },
        ));
        self
    }

    /// Get the fields in insertion order.
    pub fn entries(&self) -> &[(String, FormValue)] {
        &self.entries
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no fields.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Convert a payload into a multipart form, one part per field.
pub fn to_form_data(payload: &FormPayload) -> Result<Form> {
    let mut form = Form::new();

    for (key, value) in payload.entries() {
        form = match value {
            FormValue::Text(text) => form.text(key.clone(), text.clone()),
            FormValue::Blob {
                bytes,
                file_name,
                mime,
            } => {
                let mut part = Part::bytes(bytes.to_vec());
                if let Some(name) = file_name {
                    part = part.file_name(name.clone());
                }
                if let Some(mime) = mime {
                    part = part
                        .mime_str(mime)
                        .map_err(|e| ApiError::RequestBuild(e.to_string()))?;
                }
                form.part(key.clone(), part)
            }
        };
    }

    Ok(form)
}
