//! Access credential for the rate provider

use crate::error::{FxEnrichError, Result};
use std::fmt;
use std::fs;
use std::path::Path;

/// Provider access key; never printed by `Debug`
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        ApiKey(key.into())
    }

    /// Read the key from a file, trimming surrounding whitespace
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| FxEnrichError::CredentialRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let key = contents.trim();
        if key.is_empty() {
            return Err(FxEnrichError::CredentialRead {
                path: path.to_path_buf(),
                reason: "file is empty".to_string(),
            });
        }

        Ok(ApiKey(key.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}
