//! Upload response classification
//!
//! The service reports a name conflict only through the shape of the error
//! body. All knowledge of that shape lives in [`classify_upload`]; callers
//! only ever see an [`UploadOutcome`].

use serde_json::Value;

const CONFLICT_FIELD: &str = "filename";
const CONFLICT_MESSAGE: &str = "has already been taken";

/// What happened to an upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The package was stored
    Uploaded,
    /// A package with the same file name already exists in the distribution
    Conflict,
    /// Any other rejection; `body` is the raw response
    Failed { status: u16, body: String },
}

/// Classify an upload response by status code and body
pub fn classify_upload(status: u16, body: &str) -> UploadOutcome {
    if (200..300).contains(&status) {
        return UploadOutcome::Uploaded;
    }

    if is_filename_taken(body) {
        return UploadOutcome::Conflict;
    }

    UploadOutcome::Failed {
        status,
        body: body.to_string(),
    }
}

/// `{"filename": ["has already been taken"]}`
fn is_filename_taken(body: &str) -> bool {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return false;
    };

    value
        .get(CONFLICT_FIELD)
        .and_then(Value::as_array)
        .is_some_and(|messages| {
            messages
                .iter()
                .any(|m| m.as_str() == Some(CONFLICT_MESSAGE))
        })
}
