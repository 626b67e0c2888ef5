use crate::error::FillError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the stored user id
pub const UID_ENV_VAR: &str = "FORMMATE_UID";

/// On-disk shape of the credential file
#[derive(Debug, Serialize, Deserialize)]
struct StoredCredentials {
    uid: String,
}

/// File-backed store for the authenticated user's id.
///
/// The dashboard writes this value on sign-in and clears it on sign-out;
/// the fill pipeline only ever reads it. A `FORMMATE_UID` environment
/// variable takes precedence over the file, mirroring how the WebDriver
/// URL can be overridden from the environment.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Create a store backed by the given file path
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Default credential file location under the user's home directory
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string());
        Path::new(&home).join(".formmate").join("credentials.json")
    }

    /// Read the stored user id, if any.
    ///
    /// A missing file is not an error; it simply means nobody is signed in.
    pub fn load(&self) -> Result<Option<String>, FillError> {
        if let Ok(uid) = std::env::var(UID_ENV_VAR) {
            if !uid.is_empty() {
                ::log::debug!("Using user id from {}", UID_ENV_VAR);
                return Ok(Some(uid));
            }
        }

        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)?;
        let creds: StoredCredentials = serde_json::from_str(&contents)?;
        if creds.uid.is_empty() {
            return Ok(None);
        }
        Ok(Some(creds.uid))
    }

    /// Persist a user id (sign-in)
    pub fn save(&self, uid: &str) -> Result<(), FillError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let creds = StoredCredentials {
            uid: uid.to_string(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&creds)?)?;
        ::log::info!("Stored user id at {}", self.path.display());
        Ok(())
    }

    /// Remove the stored user id (sign-out or token invalidation)
    pub fn clear(&self) -> Result<(), FillError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            ::log::info!("Cleared stored user id");
        }
        Ok(())
    }
}
