//! Field-level edits for admin forms.
//!
//! An admin form changes one field at a time. [`apply_field_edit`] takes the
//! current document, replaces the value at a JSON pointer, and returns a new
//! document of the same type; the input is left untouched. The result is
//! then committed with [`ContentStore::try_edit`], which holds the store
//! locked for the whole read-modify-write.
//!
//! [`DocumentEditor`] lets the admin API treat every content store the same
//! way without knowing its document type.

use chrono::{DateTime, Utc};
use fratelli_core::{ContentDocument, ContentKind, LoadState};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::content::{ContentStore, SaveError, StoreError};
use crate::storage::CacheWrite;

/// Field edit errors.
#[derive(Debug, Error)]
pub enum EditError {
    /// Nothing exists at the pointer.
    #[error("no field at {0}")]
    PathNotFound(String),

    /// The edited document no longer matches its shape.
    #[error("invalid value for {path}: {source}")]
    Invalid {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The store refused the edited document.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One field change, addressed by an RFC 6901 JSON pointer
/// (`/hero/title`, `/features/0/description`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEdit {
    pub path: String,
    pub value: Value,
}

impl FieldEdit {
    #[must_use]
    pub fn new(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
        }
    }
}

/// Return a copy of `document` with one field replaced.
///
/// # Errors
///
/// Returns `EditError::PathNotFound` if the pointer does not address an
/// existing value, or `EditError::Invalid` if the new value does not fit the
/// document's shape.
pub fn apply_field_edit<T>(document: &T, edit: &FieldEdit) -> Result<T, EditError>
where
    T: Serialize + DeserializeOwned,
{
    let invalid = |source| EditError::Invalid {
        path: edit.path.clone(),
        source,
    };

    let mut tree = serde_json::to_value(document).map_err(invalid)?;
    let slot = tree
        .pointer_mut(&edit.path)
        .ok_or_else(|| EditError::PathNotFound(edit.path.clone()))?;
    *slot = edit.value.clone();

    serde_json::from_value(tree).map_err(invalid)
}

/// Type-erased view of a content store for the admin API.
pub trait DocumentEditor: Send + Sync {
    fn kind(&self) -> ContentKind;
    fn status(&self) -> LoadState;
    fn error(&self) -> Option<String>;
    fn last_saved(&self) -> Option<DateTime<Utc>>;

    /// Current document as JSON, `None` until loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be serialized.
    fn document_json(&self) -> Result<Option<Value>, EditError>;

    /// Replace the whole document with a JSON value of the right shape.
    ///
    /// # Errors
    ///
    /// Returns `EditError::Invalid` for a wrong shape and `EditError::Store`
    /// if the store is not ready.
    fn replace_document(&self, value: Value) -> Result<CacheWrite, EditError>;

    /// Apply one field edit and commit the result.
    ///
    /// # Errors
    ///
    /// Same as [`apply_field_edit`], plus `EditError::Store` if the store is
    /// not ready.
    fn edit_field(&self, edit: &FieldEdit) -> Result<CacheWrite, EditError>;

    /// See [`ContentStore::save_remote`].
    ///
    /// # Errors
    ///
    /// Returns the store's [`SaveError`].
    fn save_remote(&self) -> Result<DateTime<Utc>, SaveError>;
}

impl<T: ContentDocument> DocumentEditor for ContentStore<T> {
    fn kind(&self) -> ContentKind {
        T::KIND
    }

    fn status(&self) -> LoadState {
        Self::status(self)
    }

    fn error(&self) -> Option<String> {
        Self::error(self)
    }

    fn last_saved(&self) -> Option<DateTime<Utc>> {
        Self::last_saved(self)
    }

    fn document_json(&self) -> Result<Option<Value>, EditError> {
        self.data()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|source| EditError::Store(StoreError::Serialize { kind: T::KIND, source }))
    }

    fn replace_document(&self, value: Value) -> Result<CacheWrite, EditError> {
        let document: T = serde_json::from_value(value).map_err(|source| EditError::Invalid {
            path: String::new(),
            source,
        })?;
        Ok(self.update_data(document)?)
    }

    fn edit_field(&self, edit: &FieldEdit) -> Result<CacheWrite, EditError> {
        self.try_edit(|current| apply_field_edit(current, edit))
    }

    fn save_remote(&self) -> Result<DateTime<Utc>, SaveError> {
        Self::save_remote(self)
    }
}
