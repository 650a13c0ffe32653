//! Process-wide session state: credentials plus the signed-in member.
//!
//! The gateway reads credentials synchronously before every request and
//! mutates the session only through [`SessionStore::set_credentials`] and
//! [`SessionStore::clear`]. Login/logout flows use the remaining operations.

use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::{Member, TokenPair};

/// Snapshot of the client session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub member: Option<Member>,
    pub is_authenticated: bool,
}

impl Session {
    fn apply_credentials(&mut self, tokens: &TokenPair) {
        self.access_token = Some(tokens.access_token.clone());
        self.refresh_token = Some(tokens.refresh_token.clone());
        self.is_authenticated = true;
    }
}

/// Storage for the process-wide [`Session`].
///
/// Reads never fail; writes return an error only when a persistent backend
/// cannot record the change (the in-memory state is updated regardless).
pub trait SessionStore: Send + Sync + 'static {
    /// Current session state.
    fn snapshot(&self) -> Session;

    /// Store a new credential pair (login or refresh). Marks the session authenticated.
    fn set_credentials(&self, tokens: &TokenPair) -> Result<(), Error>;

    /// Replace the signed-in member profile.
    fn set_member(&self, member: Member) -> Result<(), Error>;

    /// Store credentials and member in one step.
    fn login(&self, tokens: &TokenPair, member: Member) -> Result<(), Error>;

    /// Forget everything (logout, unrecoverable refresh failure).
    fn clear(&self) -> Result<(), Error>;

    /// Non-empty access token, if any.
    fn access_token(&self) -> Option<String> {
        self.snapshot().access_token.filter(|t| !t.is_empty())
    }

    /// Non-empty refresh token, if any.
    fn refresh_token(&self) -> Option<String> {
        self.snapshot().refresh_token.filter(|t| !t.is_empty())
    }

    fn is_authenticated(&self) -> bool {
        self.snapshot().is_authenticated
    }

    fn is_admin(&self) -> bool {
        self.snapshot().member.is_some_and(|m| m.is_admin())
    }
}

/// Session held in process memory only.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: RwLock<Session>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing session (restored elsewhere).
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            inner: RwLock::new(session),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn snapshot(&self) -> Session {
        self.inner.read().clone()
    }

    fn set_credentials(&self, tokens: &TokenPair) -> Result<(), Error> {
        self.inner.write().apply_credentials(tokens);
        Ok(())
    }

    fn set_member(&self, member: Member) -> Result<(), Error> {
        self.inner.write().member = Some(member);
        Ok(())
    }

    fn login(&self, tokens: &TokenPair, member: Member) -> Result<(), Error> {
        let mut session = self.inner.write();
        session.apply_credentials(tokens);
        session.member = Some(member);
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        *self.inner.write() = Session::default();
        Ok(())
    }

    fn access_token(&self) -> Option<String> {
        self.inner.read().access_token.clone().filter(|t| !t.is_empty())
    }

    fn refresh_token(&self) -> Option<String> {
        self.inner.read().refresh_token.clone().filter(|t| !t.is_empty())
    }
}

/// Session persisted as a JSON document, rewritten on every mutation.
///
/// A missing file is an empty session. A file that cannot be parsed is
/// treated the same way (and logged) so a corrupt entry never locks the
/// user out.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    inner: RwLock<Session>,
}

impl FileSessionStore {
    /// Open (or lazily create) the session file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the file exists but cannot be read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let session = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Discarding unreadable session file");
                Session::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Session::default(),
            Err(e) => {
                return Err(Error::Storage(format!("{}: {e}", path.display())));
            }
        };

        Ok(Self {
            path,
            inner: RwLock::new(session),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update(&self, f: impl FnOnce(&mut Session)) -> Result<(), Error> {
        let mut session = self.inner.write();
        f(&mut session);
        self.persist(&session)
    }

    fn persist(&self, session: &Session) -> Result<(), Error> {
        let bytes = serde_json::to_vec_pretty(session)?;
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                std::fs::create_dir_all(parent)
                    .map_err(|e| Error::Storage(format!("{}: {e}", parent.display())))?;
                parent
            }
            None => Path::new("."),
        };
        let storage = |e: std::io::Error| Error::Storage(format!("{}: {e}", self.path.display()));

        // Staged in the same directory so the rename cannot cross filesystems.
        let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(storage)?;
        staged.write_all(&bytes).map_err(storage)?;
        staged.as_file().sync_all().map_err(storage)?;
        staged.persist(&self.path).map_err(|e| storage(e.error))?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn snapshot(&self) -> Session {
        self.inner.read().clone()
    }

    fn set_credentials(&self, tokens: &TokenPair) -> Result<(), Error> {
        self.update(|s| s.apply_credentials(tokens))
    }

    fn set_member(&self, member: Member) -> Result<(), Error> {
        self.update(|s| s.member = Some(member))
    }

    fn login(&self, tokens: &TokenPair, member: Member) -> Result<(), Error> {
        self.update(|s| {
            s.apply_credentials(tokens);
            s.member = Some(member);
        })
    }

    fn clear(&self) -> Result<(), Error> {
        self.update(|s| *s = Session::default())
    }
}
