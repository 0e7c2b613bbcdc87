//! The session state machine.
//!
//! One manager instance owns the single current session: NoSession or
//! Active. A session comes into being only through a successful credential
//! verification (login, or restoring the persisted record at startup) and
//! goes away on logout or failed restoration. There is no third state.

use crate::Result;
use crate::error::PawhavenError;
use crate::models::Profile;
use crate::store::CredentialStore;
use crate::validation;
use chrono::NaiveDate;
use tracing::{debug, info};
use zeroize::Zeroizing;

use super::record::SessionRecord;

/// Sentinel returned by accessors when no session is active or a profile
/// field is unset. Display paths render it directly instead of handling an
/// error.
pub const UNKNOWN: &str = "?";

/// The in-memory representation of the authenticated actor.
#[derive(Clone)]
pub struct Session {
    identifier: String,
    secret: Zeroizing<String>,
    profile: Profile,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // secret intentionally omitted
        f.debug_struct("Session")
            .field("identifier", &self.identifier)
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Identifier (email) of the authenticated account
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The verified secret; persisted to the session record on login
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// The in-memory profile
    pub fn profile(&self) -> &Profile {
        &self.profile
    }
}

/// Current session state: fully valid or fully absent.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    NoSession,
    Active(Session),
}

impl SessionState {
    /// True when a session is live
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Active(_))
    }

    /// The live session, if any
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Active(session) => Some(session),
            SessionState::NoSession => None,
        }
    }
}

/// Owns the single current session and its on-disk persistence.
#[derive(Debug)]
pub struct SessionManager {
    credentials: CredentialStore,
    record: SessionRecord,
    state: SessionState,
}

impl SessionManager {
    /// Creates a manager in the NoSession state.
    pub fn new(credentials: CredentialStore, record: SessionRecord) -> Self {
        Self {
            credentials,
            record,
            state: SessionState::NoSession,
        }
    }

    /// The current state, for passing to operations that need the actor.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Restores a session from the persisted record; called once at
    /// process start.
    ///
    /// An absent or malformed record leaves NoSession. A present record is
    /// re-verified against the credential store: success transitions to
    /// Active, failure clears the record. Returns whether the end state is
    /// Active.
    pub async fn restore(&mut self) -> Result<bool> {
        self.state = SessionState::NoSession;

        let Some((identifier, secret)) = self.record.read().await? else {
            debug!("no persisted session to restore");
            return Ok(false);
        };

        if self.credentials.verify(&identifier, &secret).await? {
            self.activate(identifier, secret).await?;
            info!(identifier = self.identifier(), "session restored");
            Ok(true)
        } else {
            info!("persisted session failed verification; clearing record");
            self.record.clear().await?;
            Ok(false)
        }
    }

    /// Logs in with an identifier/secret pair.
    ///
    /// On success the record is overwritten and the state becomes Active.
    /// Logging in while already Active refreshes both the record and the
    /// profile.
    ///
    /// # Errors
    /// `InvalidCredentials` when the pair does not verify.
    pub async fn login(&mut self, identifier: &str, secret: &str) -> Result<()> {
        if !self.credentials.verify(identifier, secret).await? {
            return Err(PawhavenError::InvalidCredentials);
        }

        self.record.write(identifier, secret).await?;
        self.activate(identifier.to_string(), Zeroizing::new(secret.to_string()))
            .await?;
        info!(identifier, "logged in");
        Ok(())
    }

    /// Logs out: clears the persisted record and transitions to NoSession
    /// unconditionally, discarding in-memory profile data.
    pub async fn logout(&mut self) -> Result<()> {
        self.state = SessionState::NoSession;
        self.record.clear().await?;
        info!("logged out");
        Ok(())
    }

    /// Replaces the in-memory profile of the active session.
    ///
    /// This is a pure in-memory update; persisting to the store is the
    /// caller's separate `CredentialStore::update_profile` call.
    ///
    /// # Errors
    /// `NoActiveSession` when no session is active.
    pub fn update_profile(&mut self, profile: Profile) -> Result<()> {
        match &mut self.state {
            SessionState::Active(session) => {
                session.profile = profile;
                Ok(())
            }
            SessionState::NoSession => Err(PawhavenError::NoActiveSession),
        }
    }

    /// Validates a registration form (identifier shape, matching secret
    /// confirmation, all fields non-empty).
    pub fn validate_registration(identifier: &str, secret: &str, confirmation: &str) -> bool {
        validation::validate_registration(identifier, secret, confirmation)
    }

    async fn activate(&mut self, identifier: String, secret: Zeroizing<String>) -> Result<()> {
        let profile = self
            .credentials
            .fetch_profile(&identifier)
            .await?
            .unwrap_or_default();
        self.state = SessionState::Active(Session {
            identifier,
            secret,
            profile,
        });
        Ok(())
    }

    // --- display accessors -------------------------------------------------
    //
    // Read-only render paths get the "?" sentinel instead of an error when
    // no session is active or a field is unset.

    /// Identifier of the active session, or `"?"`.
    pub fn identifier(&self) -> &str {
        self.state
            .session()
            .map_or(UNKNOWN, |session| session.identifier())
    }

    /// Secret of the active session, or `"?"`.
    pub fn secret(&self) -> &str {
        self.state
            .session()
            .map_or(UNKNOWN, |session| session.secret())
    }

    /// First name, or `"?"`.
    pub fn first_name(&self) -> &str {
        self.profile_str(|profile| profile.first_name.as_deref())
    }

    /// Last name, or `"?"`.
    pub fn last_name(&self) -> &str {
        self.profile_str(|profile| profile.last_name.as_deref())
    }

    /// Date of birth, or `None`.
    pub fn date_of_birth(&self) -> Option<NaiveDate> {
        self.state
            .session()
            .and_then(|session| session.profile().date_of_birth)
    }

    /// Living conditions, or `"?"`.
    pub fn living_conditions(&self) -> &str {
        self.profile_str(|profile| profile.living_conditions.as_deref())
    }

    /// Pet experience, or `"?"`.
    pub fn pet_experience(&self) -> &str {
        self.profile_str(|profile| profile.pet_experience.as_deref())
    }

    /// Motivation, or `"?"`.
    pub fn motivation(&self) -> &str {
        self.profile_str(|profile| profile.motivation.as_deref())
    }

    /// Phone number, or `"?"`.
    pub fn phone_number(&self) -> &str {
        self.profile_str(|profile| profile.phone_number.as_deref())
    }

    fn profile_str<'a>(&'a self, field: impl Fn(&'a Profile) -> Option<&'a str>) -> &'a str {
        self.state
            .session()
            .and_then(|session| field(session.profile()))
            .unwrap_or(UNKNOWN)
    }
}
