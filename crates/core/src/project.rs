//! The persisted project record, id validation, and store-boundary schema checks.
//!
//! A [`Project`] pairs a hosted floor-plan image with an optional hosted
//! render. Records crossing a store boundary are checked with
//! [`StoredProject::from_value`] so duck-typed JSON never leaks into the
//! sync layer.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::image::is_embedded;
use crate::types::{ProjectId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a project id, in characters.
pub const MAX_PROJECT_ID_LEN: usize = 128;

/// Error message for a missing, non-string, or blank id.
pub const MSG_INVALID_ID: &str = "Missing or invalid project id";

/// Error message for an id longer than [`MAX_PROJECT_ID_LEN`].
pub const MSG_ID_TOO_LONG: &str = "Project id is too long";

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

/// Whether a project is listed and shared beyond its owner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Private,
    Public,
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// A persisted project.
///
/// `source_image` is optional at the type level only because the remote
/// store refuses to hold it (images are hosted out-of-band); every record
/// returned from a successful save carries a hosted source URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[validate(length(min = 1, max = 128))]
    pub id: ProjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rendered_image: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
    /// Client-side creation instant, epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// Last-write instant, stamped by whichever store performed the write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl Project {
    /// Copy of this record without its source image, as accepted by the
    /// remote store.
    pub fn without_source(&self) -> Self {
        Self {
            source_image: None,
            ..self.clone()
        }
    }
}

/// A project as handed to the sync layer by the caller, before hosting.
///
/// `source_image` / `rendered_image` may hold embedded `data:` URLs or
/// hosted URLs. The `*_path` fields are local-only bookkeeping and are never
/// persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub source_image: Option<String>,
    #[serde(default)]
    pub rendered_image: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default, skip_serializing)]
    pub source_path: Option<String>,
    #[serde(default, skip_serializing)]
    pub rendered_path: Option<String>,
}

impl From<Project> for ProjectDraft {
    fn from(project: Project) -> Self {
        Self {
            id: Some(project.id),
            name: project.name,
            source_image: project.source_image,
            rendered_image: project.rendered_image,
            owner_id: project.owner_id,
            timestamp: project.timestamp,
            source_path: None,
            rendered_path: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Id validation
// ---------------------------------------------------------------------------

/// Trim and validate a raw project id.
///
/// Blank ids are rejected with [`MSG_INVALID_ID`]; ids longer than
/// [`MAX_PROJECT_ID_LEN`] characters with [`MSG_ID_TOO_LONG`].
pub fn validate_project_id(raw: &str) -> Result<ProjectId, CoreError> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(CoreError::Validation(MSG_INVALID_ID.into()));
    }
    if id.chars().count() > MAX_PROJECT_ID_LEN {
        return Err(CoreError::Validation(MSG_ID_TOO_LONG.into()));
    }
    Ok(id.to_string())
}

// ---------------------------------------------------------------------------
// Store-boundary validation
// ---------------------------------------------------------------------------

/// Typed result of reading a raw stored value.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredProject {
    Valid(Project),
    Invalid(String),
}

impl StoredProject {
    /// Validate a raw JSON value read from a key-value store.
    ///
    /// Rejects non-objects, values that do not deserialize, ids failing
    /// length rules, and any record carrying an embedded image payload.
    pub fn from_value(value: serde_json::Value) -> Self {
        if !value.is_object() {
            return Self::Invalid("stored value is not an object".into());
        }

        let project: Project = match serde_json::from_value(value) {
            Ok(p) => p,
            Err(e) => return Self::Invalid(format!("malformed project record: {e}")),
        };

        if let Err(e) = project.validate() {
            return Self::Invalid(format!("invalid project record: {e}"));
        }

        let embedded = [&project.source_image, &project.rendered_image]
            .into_iter()
            .flatten()
            .any(|url| is_embedded(url));
        if embedded {
            return Self::Invalid("project record holds an embedded image".into());
        }

        Self::Valid(project)
    }

    pub fn into_project(self) -> Option<Project> {
        match self {
            Self::Valid(p) => Some(p),
            Self::Invalid(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
