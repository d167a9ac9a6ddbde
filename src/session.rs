//! Explicit session context for the demo login gate.
//!
//! The logged-in user is held in an owned [`Session`] value passed to
//! whatever needs identity, not in process-wide state. The lifecycle is
//! explicit: [`Session::hydrate`] loads the stored user from a JSON file at
//! startup, [`Session::login`] checks demo credentials and persists the
//! user, [`Session::logout`] clears memory and removes the file.
//!
//! The credential check is intentionally non-cryptographic: a fixed list of
//! demo users from config.toml, compared in plain text. This is a demo
//! gate, not authentication.

use crate::config::users::DemoUser;
use crate::core::employee::Role;
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The identity carried by a logged-in session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Full display name
    pub full_name: String,
    /// Canonical employee-role string, validated at login
    pub role: String,
}

/// One user's session, backed by a durable JSON file.
#[derive(Debug)]
pub struct Session {
    user: Option<SessionUser>,
    storage_path: PathBuf,
}

impl Session {
    /// Loads the session from durable storage.
    ///
    /// A missing or unreadable file yields a logged-out session rather than
    /// an error; a corrupt file is logged and treated the same way.
    pub fn hydrate<P: AsRef<Path>>(storage_path: P) -> Self {
        let storage_path = storage_path.as_ref().to_path_buf();

        let user = match std::fs::read_to_string(&storage_path) {
            Ok(raw) => match serde_json::from_str::<SessionUser>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!("Ignoring corrupt session storage: {e}");
                    None
                }
            },
            Err(_) => None,
        };

        debug!(hydrated = user.is_some(), "session hydrated");
        Self { user, storage_path }
    }

    /// The current user, if logged in.
    #[must_use]
    pub const fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    /// Whether a user is currently logged in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Checks the credentials against the demo-user list and, on success,
    /// stores the user in memory and in durable storage.
    ///
    /// The configured role must be one of the enumerated employee roles; a
    /// misconfigured entry fails the login rather than carrying an arbitrary
    /// role string into the session.
    pub fn login(
        &mut self,
        users: &[DemoUser],
        login: &str,
        password: &str,
    ) -> Result<SessionUser> {
        let found = users
            .iter()
            .find(|u| u.login == login && u.password == password)
            .ok_or_else(|| Error::Validation {
                message: "Invalid login or password".to_string(),
            })?;

        let role = Role::parse(&found.role)?;
        let user = SessionUser {
            full_name: found.full_name.clone(),
            role: role.as_str().to_string(),
        };

        if let Some(parent) = self.storage_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.storage_path, serde_json::to_string(&user)?)?;

        self.user = Some(user.clone());
        Ok(user)
    }

    /// Clears the session and removes the durable storage file.
    pub fn logout(&mut self) -> Result<()> {
        self.user = None;
        match std::fs::remove_file(&self.storage_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
