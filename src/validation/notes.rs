use garde::Validate;
use serde::Deserialize;

use super::errors::{FieldErrors, required};

/// The add/update note form as submitted.
#[derive(Deserialize, Validate, Debug, Default, Clone)]
#[serde(default)]
pub struct NoteForm {
    #[garde(custom(required), length(chars, max = 100))]
    pub title: String,
    #[garde(custom(required))]
    pub content: String,
    #[garde(skip)]
    pub csrf_token: String,
}

/// Note fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteInput {
    pub title: String,
    pub content: String,
}

/// Validates a note form. The title is trimmed; content is kept verbatim.
pub fn validate_note(form: &NoteForm) -> Result<NoteInput, FieldErrors> {
    let normalized = NoteForm {
        title: form.title.trim().to_string(),
        content: form.content.clone(),
        csrf_token: String::new(),
    };

    normalized.validate().map_err(FieldErrors::from)?;

    Ok(NoteInput {
        title: normalized.title,
        content: normalized.content,
    })
}
