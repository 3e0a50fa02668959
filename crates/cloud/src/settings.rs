//! Hosting backend selection and validation.

use std::path::PathBuf;

use roomify_core::error::CoreError;

// ---------------------------------------------------------------------------
// Backend type
// ---------------------------------------------------------------------------

/// Which hosting backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostingBackendType {
    Local,
    S3,
}

impl HostingBackendType {
    /// Parse from the `HOSTING_BACKEND` value.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "local" => Ok(Self::Local),
            "s3" => Ok(Self::S3),
            other => Err(CoreError::Validation(format!(
                "Unknown hosting backend '{other}'. Must be one of: local, s3"
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::S3 => "s3",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Local => "Local Filesystem",
            Self::S3 => "Amazon S3 / Compatible",
        }
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Hosting configuration.
#[derive(Debug, Clone)]
pub struct HostingSettings {
    pub backend_type: HostingBackendType,
    /// Public base URL under which hosted artifacts are served.
    pub public_base_url: String,
    /// Directory holding hosted files (`local`).
    pub root: Option<PathBuf>,
    /// Bucket name (`s3`).
    pub bucket: Option<String>,
    /// Bucket region (`s3`).
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible stores (`s3`, optional).
    pub endpoint_url: Option<String>,
    /// Static credentials (`s3`, optional; the default chain is used otherwise).
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl HostingSettings {
    /// Load settings from environment variables.
    ///
    /// | Env Var                     | Required for | Default  |
    /// |-----------------------------|--------------|----------|
    /// | `HOSTING_BACKEND`           | --           | `local`  |
    /// | `HOSTING_PUBLIC_URL`        | all          | --       |
    /// | `HOSTING_ROOT`              | `local`      | --       |
    /// | `HOSTING_BUCKET`            | `s3`         | --       |
    /// | `HOSTING_REGION`            | `s3`         | --       |
    /// | `HOSTING_ENDPOINT_URL`      | --           | --       |
    /// | `HOSTING_ACCESS_KEY_ID`     | --           | --       |
    /// | `HOSTING_SECRET_ACCESS_KEY` | --           | --       |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CoreError> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let backend_type =
            HostingBackendType::from_name(&var("HOSTING_BACKEND").unwrap_or_else(|| "local".into()))?;

        let settings = Self {
            backend_type,
            public_base_url: var("HOSTING_PUBLIC_URL").unwrap_or_default(),
            root: var("HOSTING_ROOT").map(PathBuf::from),
            bucket: var("HOSTING_BUCKET"),
            region: var("HOSTING_REGION"),
            endpoint_url: var("HOSTING_ENDPOINT_URL"),
            access_key_id: var("HOSTING_ACCESS_KEY_ID"),
            secret_access_key: var("HOSTING_SECRET_ACCESS_KEY"),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Ensure the fields required by the selected backend are present.
    ///
    /// - all: `public_base_url` (http or https)
    /// - `local`: `root`
    /// - `s3`: `bucket` and `region`; credentials come in pairs
    pub fn validate(&self) -> Result<(), CoreError> {
        let base = self.public_base_url.as_str();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(CoreError::Validation(
                "Hosting requires an http(s) public base URL".into(),
            ));
        }

        match self.backend_type {
            HostingBackendType::Local => {
                require(self.root.as_ref().map(|p| p.as_os_str().len()), "root", self.backend_type)?;
            }
            HostingBackendType::S3 => {
                require(self.bucket.as_ref().map(String::len), "bucket", self.backend_type)?;
                require(self.region.as_ref().map(String::len), "region", self.backend_type)?;
                if self.access_key_id.is_some() != self.secret_access_key.is_some() {
                    return Err(CoreError::Validation(
                        "S3 access key id and secret must be set together".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Helper: ensure a required field is present and non-empty.
fn require(len: Option<usize>, field: &str, backend: HostingBackendType) -> Result<(), CoreError> {
    match len {
        Some(n) if n > 0 => Ok(()),
        _ => Err(CoreError::Validation(format!(
            "Hosting backend '{}' requires a non-empty '{field}'",
            backend.name()
        ))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
