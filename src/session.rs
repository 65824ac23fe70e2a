//! Bearer-credential session.
//!
//! The session is an explicit object handed to the API client at
//! construction; there is no global credential lookup. Its lifecycle is
//! "present or absent": set at login, cleared at logout, read fresh on every
//! outbound call. The token persists across invocations in a plain file
//! under the user config directory.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::PathBuf;

/// Holds the bearer token (if any) and where it is persisted.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<String>,
    path: Option<PathBuf>,
}

impl Session {
    /// A session with no token and no backing file. Used for endpoints that
    /// never authenticate and in tests.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Load the session persisted at `path`, or an empty one if the file
    /// does not exist yet.
    pub fn load(path: PathBuf) -> Result<Self> {
        let token = match fs::read_to_string(&path) {
            Ok(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                return Err(err).with_context(|| format!("read token {}", path.display()))
            }
        };
        Ok(Self {
            token,
            path: Some(path),
        })
    }

    /// Load from the default token location under the user config dir.
    pub fn load_default() -> Result<Self> {
        let path = crate::config::token_path()
            .ok_or_else(|| anyhow!("no config directory available for session storage"))?;
        Self::load(path)
    }

    /// The current bearer token, if logged in.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Store a fresh token, persisting it when a backing file is configured.
    pub fn login(&mut self, token: String) -> Result<()> {
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
            fs::write(path, &token)
                .with_context(|| format!("write token {}", path.display()))?;
        }
        self.token = Some(token);
        Ok(())
    }

    /// Drop the token and remove the persisted copy.
    pub fn logout(&mut self) -> Result<()> {
        self.token = None;
        if let Some(path) = &self.path {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => {
                    return Err(err).with_context(|| format!("remove token {}", path.display()))
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn login_persists_and_logout_clears() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("token");

        let mut session = Session::load(path.clone()).unwrap();
        assert!(!session.is_authenticated());

        session.login("jwt-abc".to_string()).unwrap();
        assert_eq!(session.token(), Some("jwt-abc"));

        // A fresh load sees the persisted token.
        let reloaded = Session::load(path.clone()).unwrap();
        assert_eq!(reloaded.token(), Some("jwt-abc"));

        session.logout().unwrap();
        assert!(!session.is_authenticated());
        assert!(!path.exists());

        let after = Session::load(path).unwrap();
        assert!(!after.is_authenticated());
    }

    #[test]
    fn whitespace_only_token_file_counts_as_logged_out() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "\n  \n").unwrap();
        let session = Session::load(path).unwrap();
        assert!(!session.is_authenticated());
    }
}
