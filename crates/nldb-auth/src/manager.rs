//! `AuthManager`: registration, login, session lifecycle, password changes,
//! and role-based access checks. Backed directly by a [`ControlPlaneStore`]
//! rather than an additional in-memory cache, since the store itself may be
//! the in-memory `mem://` backend in tests.

use std::sync::Arc;

use chrono::{Duration, Utc};
use nldb_config::SessionConfig;
use nldb_core::{AccountStatus, Role, Session, SessionId, SessionStatus, User, UserId};
use nldb_crypto::PasswordHash;
use nldb_events::{EventBus, EventMetadata, NldbEvent};
use nldb_storage::ControlPlaneStore;
use tracing::warn;

use crate::error::{AuthManagerError, AuthManagerResult};
use crate::password_policy;

/// Registration, login, session lifecycle, and access control.
pub struct AuthManager {
    store: Arc<dyn ControlPlaneStore>,
    events: EventBus,
    session_config: SessionConfig,
}

impl AuthManager {
    /// Build a manager over `store`, publishing lifecycle events on `events`.
    #[must_use]
    pub fn new(
        store: Arc<dyn ControlPlaneStore>,
        events: EventBus,
        session_config: SessionConfig,
    ) -> Self {
        Self {
            store,
            events,
            session_config,
        }
    }

    fn to_storage_err(err: nldb_storage::StorageError) -> AuthManagerError {
        AuthManagerError::StorageUnavailable(err.to_string())
    }

    /// Create the default admin account if no `Admin`-role user exists yet.
    /// Safe to call on every process start; a no-op once an admin exists.
    ///
    /// # Errors
    ///
    /// Returns [`AuthManagerError::StorageUnavailable`] if the store cannot
    /// be reached.
    pub async fn bootstrap_admin(
        &self,
        username: &str,
        password: Option<&str>,
    ) -> AuthManagerResult<()> {
        if self
            .store
            .any_admin_exists()
            .await
            .map_err(Self::to_storage_err)?
        {
            return Ok(());
        }

        let Some(password) = password else {
            warn!("no admin bootstrap password configured, skipping admin bootstrap");
            return Ok(());
        };

        if let Some(mut existing) = self
            .store
            .get_user_by_username(username)
            .await
            .map_err(Self::to_storage_err)?
        {
            existing.role = Role::Admin;
            self.store
                .update_user(&existing)
                .await
                .map_err(Self::to_storage_err)?;
            return Ok(());
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            username: username.to_string(),
            email: format!("{username}@bootstrap.local"),
            password_hash: PasswordHash::new(password).to_stored(),
            role: Role::Admin,
            status: AccountStatus::Active,
            created_at: now,
            last_login_at: None,
            failed_login_count: 0,
            locked_until: None,
        };
        self.store
            .create_user(&user)
            .await
            .map_err(Self::to_storage_err)?;
        self.events.publish(NldbEvent::UserRegistered {
            metadata: EventMetadata::new("auth_manager"),
            user_id: user.id.to_string(),
        });
        Ok(())
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthManagerError::UsernameTaken`], `EmailTaken`, or
    /// `WeakPassword` if the request is rejected, or `StorageUnavailable` on
    /// a storage failure.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> AuthManagerResult<User> {
        if self
            .store
            .get_user_by_username(username)
            .await
            .map_err(Self::to_storage_err)?
            .is_some()
        {
            return Err(AuthManagerError::UsernameTaken);
        }
        if self
            .store
            .get_user_by_email(email)
            .await
            .map_err(Self::to_storage_err)?
            .is_some()
        {
            return Err(AuthManagerError::EmailTaken);
        }
        password_policy::validate(password).map_err(AuthManagerError::WeakPassword)?;

        let user = User {
            id: UserId::new(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: PasswordHash::new(password).to_stored(),
            role: Role::User,
            status: AccountStatus::Active,
            created_at: Utc::now(),
            last_login_at: None,
            failed_login_count: 0,
            locked_until: None,
        };
        self.store
            .create_user(&user)
            .await
            .map_err(Self::to_storage_err)?;
        self.events.publish(NldbEvent::UserRegistered {
            metadata: EventMetadata::new("auth_manager"),
            user_id: user.id.to_string(),
        });
        Ok(user)
    }

    /// Authenticate `username`/`password`, returning the user and a freshly
    /// created session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthManagerError::InvalidCredentials`], `Locked`, or
    /// `Inactive` on rejection, or `StorageUnavailable` on a storage
    /// failure.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        user_agent: Option<String>,
        ip_address: Option<String>,
    ) -> AuthManagerResult<(User, Session)> {
        let mut user = self
            .store
            .get_user_by_username(username)
            .await
            .map_err(Self::to_storage_err)?
            .ok_or(AuthManagerError::InvalidCredentials)?;

        let now = Utc::now();
        if let Some(until) = user.locked_until {
            if until > now {
                return Err(AuthManagerError::Locked {
                    until: until.to_rfc3339(),
                });
            }
        }

        let matches = PasswordHash::from_stored(&user.password_hash)
            .map(|hash| hash.verify(password))
            .unwrap_or(false);

        if !matches {
            user.failed_login_count = user.failed_login_count.saturating_add(1);
            if user.failed_login_count >= self.session_config.max_failed_logins {
                let lockout = Duration::seconds(i64::try_from(self.session_config.lockout_secs).unwrap_or(i64::MAX));
                // Safety: adding a positive duration to the current time.
                #[allow(clippy::arithmetic_side_effects)]
                let until = now + lockout;
                user.locked_until = Some(until);
            }
            self.store
                .update_user(&user)
                .await
                .map_err(Self::to_storage_err)?;
            return Err(AuthManagerError::InvalidCredentials);
        }

        if user.status != AccountStatus::Active {
            return Err(AuthManagerError::Inactive);
        }

        user.failed_login_count = 0;
        user.locked_until = None;
        user.last_login_at = Some(now);
        self.store
            .update_user(&user)
            .await
            .map_err(Self::to_storage_err)?;

        let ttl = Duration::seconds(i64::try_from(self.session_config.ttl_secs).unwrap_or(i64::MAX));
        // Safety: adding a positive duration to the current time.
        #[allow(clippy::arithmetic_side_effects)]
        let expires_at = now + ttl;
        let session = Session {
            id: SessionId::new(),
            user_id: user.id,
            username: user.username.clone(),
            user_agent,
            ip_address,
            created_at: now,
            accessed_at: now,
            expires_at,
            status: SessionStatus::Active,
        };
        self.store
            .create_session(&session)
            .await
            .map_err(Self::to_storage_err)?;
        self.events.publish(NldbEvent::SessionCreated {
            metadata: EventMetadata::new("auth_manager"),
            session_id: session.id.to_string(),
            user_id: user.id.to_string(),
        });

        Ok((user, session))
    }

    /// Validate a session id, applying lazy expiry and best-effort
    /// `accessed_at` bookkeeping.
    ///
    /// # Errors
    ///
    /// Returns [`AuthManagerError::SessionNotFound`], `SessionExpired`, or
    /// `SessionRevoked`.
    pub async fn validate_session(&self, session_id: SessionId) -> AuthManagerResult<Session> {
        let mut session = self
            .store
            .get_session(session_id)
            .await
            .map_err(Self::to_storage_err)?
            .ok_or(AuthManagerError::SessionNotFound)?;

        if session.status == SessionStatus::LoggedOut {
            return Err(AuthManagerError::SessionRevoked);
        }
        let now = Utc::now();
        if !session.is_active(now) {
            return Err(AuthManagerError::SessionExpired);
        }

        session.accessed_at = now;
        if let Err(err) = self.store.update_session(&session).await {
            warn!(%err, "failed to persist session accessed_at, continuing");
        }
        Ok(session)
    }

    /// Extend an active session's expiry by `hours`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthManagerError::SessionNotFound`] or `SessionNotActive`.
    pub async fn extend_session(
        &self,
        session_id: SessionId,
        hours: i64,
    ) -> AuthManagerResult<Session> {
        let mut session = self
            .store
            .get_session(session_id)
            .await
            .map_err(Self::to_storage_err)?
            .ok_or(AuthManagerError::SessionNotFound)?;

        if !session.is_active(Utc::now()) {
            return Err(AuthManagerError::SessionNotActive);
        }

        // Safety: adding an administrator-supplied duration to an existing timestamp.
        #[allow(clippy::arithmetic_side_effects)]
        {
            session.expires_at += Duration::hours(hours);
        }
        self.store
            .update_session(&session)
            .await
            .map_err(Self::to_storage_err)?;
        Ok(session)
    }

    /// Revoke a session, making it permanently unusable. Equivalent to the
    /// spec's `logout`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthManagerError::SessionNotFound`].
    pub async fn revoke_session(&self, session_id: SessionId) -> AuthManagerResult<()> {
        let mut session = self
            .store
            .get_session(session_id)
            .await
            .map_err(Self::to_storage_err)?
            .ok_or(AuthManagerError::SessionNotFound)?;

        session.status = SessionStatus::LoggedOut;
        self.store
            .update_session(&session)
            .await
            .map_err(Self::to_storage_err)?;
        self.events.publish(NldbEvent::SessionEnded {
            metadata: EventMetadata::new("auth_manager"),
            session_id: session.id.to_string(),
            reason: "logout".to_string(),
        });
        Ok(())
    }

    /// Alias for [`Self::revoke_session`], matching the spec's naming.
    ///
    /// # Errors
    ///
    /// See [`Self::revoke_session`].
    pub async fn logout(&self, session_id: SessionId) -> AuthManagerResult<()> {
        self.revoke_session(session_id).await
    }

    /// Change a user's password after verifying their current one.
    ///
    /// # Errors
    ///
    /// Returns [`AuthManagerError::UserNotFound`], `BadCurrentPassword`, or
    /// `WeakPassword`.
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> AuthManagerResult<()> {
        let mut user = self
            .store
            .get_user_by_id(user_id)
            .await
            .map_err(Self::to_storage_err)?
            .ok_or(AuthManagerError::UserNotFound)?;

        let matches = PasswordHash::from_stored(&user.password_hash)
            .map(|hash| hash.verify(current_password))
            .unwrap_or(false);
        if !matches {
            return Err(AuthManagerError::BadCurrentPassword);
        }
        password_policy::validate(new_password).map_err(AuthManagerError::WeakPassword)?;

        user.password_hash = PasswordHash::new(new_password).to_stored();
        self.store
            .update_user(&user)
            .await
            .map_err(Self::to_storage_err)?;
        Ok(())
    }

    /// Whether `user_id` holds at least `required_role`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthManagerError::UserNotFound`].
    pub async fn validate_access(
        &self,
        user_id: UserId,
        required_role: Role,
    ) -> AuthManagerResult<bool> {
        let user = self
            .store
            .get_user_by_id(user_id)
            .await
            .map_err(Self::to_storage_err)?
            .ok_or(AuthManagerError::UserNotFound)?;
        Ok(user.role >= required_role)
    }

    /// Mark every currently-`Active` session past its expiry as `Expired`.
    /// Returns the number of sessions swept. Intended to run on a periodic
    /// timer (see `nldb_kernel::spawn_session_sweeper`).
    ///
    /// # Errors
    ///
    /// Returns [`AuthManagerError::StorageUnavailable`] if listing sessions
    /// fails; individual update failures are logged and skipped.
    pub async fn sweep_expired_sessions(&self) -> AuthManagerResult<usize> {
        let sessions = self
            .store
            .list_active_sessions()
            .await
            .map_err(Self::to_storage_err)?;
        let now = Utc::now();
        let mut swept = 0usize;
        for mut session in sessions {
            if session.expires_at > now {
                continue;
            }
            session.status = SessionStatus::Expired;
            let session_id = session.id;
            if let Err(err) = self.store.update_session(&session).await {
                warn!(%err, session_id = %session_id, "failed to sweep expired session, skipping");
                continue;
            }
            self.events.publish(NldbEvent::SessionEnded {
                metadata: EventMetadata::new("auth_manager"),
                session_id: session_id.to_string(),
                reason: "expired".to_string(),
            });
            swept += 1;
        }
        Ok(swept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nldb_storage::{Database, SurrealStore};
    use std::sync::Arc;

    async fn manager() -> AuthManager {
        let db = Database::connect_memory().await.unwrap();
        let store: Arc<dyn ControlPlaneStore> = Arc::new(SurrealStore::new(db));
        AuthManager::new(store, EventBus::new(), SessionConfig::default())
    }

    #[tokio::test]
    async fn register_login_logout_round_trip() {
        let auth = manager().await;
        let user = auth
            .register("alice", "alice@x.test", "Aa1!aaaa")
            .await
            .unwrap();

        let (logged_in_user, session) = auth
            .login("alice", "Aa1!aaaa", None, None)
            .await
            .unwrap();
        assert_eq!(logged_in_user.id, user.id);

        let validated = auth.validate_session(session.id).await.unwrap();
        assert_eq!(validated.id, session.id);

        auth.logout(session.id).await.unwrap();

        let result = auth.validate_session(session.id).await;
        assert!(matches!(result, Err(AuthManagerError::SessionRevoked)));
    }

    #[tokio::test]
    async fn register_rejects_duplicate_username() {
        let auth = manager().await;
        auth.register("alice", "a1@x.test", "Aa1!aaaa").await.unwrap();
        let result = auth.register("alice", "a2@x.test", "Aa1!aaaa").await;
        assert!(matches!(result, Err(AuthManagerError::UsernameTaken)));
    }

    #[tokio::test]
    async fn register_rejects_weak_password() {
        let auth = manager().await;
        let result = auth.register("alice", "a@x.test", "aaaaaaaa").await;
        assert!(matches!(result, Err(AuthManagerError::WeakPassword(_))));
    }

    #[tokio::test]
    async fn five_failed_logins_locks_account_until_lockout_expires() {
        let auth = manager().await;
        auth.register("alice", "a@x.test", "Aa1!aaaa").await.unwrap();

        for _ in 0..5 {
            let _ = auth.login("alice", "wrong-password", None, None).await;
        }

        let result = auth.login("alice", "Aa1!aaaa", None, None).await;
        assert!(matches!(result, Err(AuthManagerError::Locked { .. })));
    }

    #[tokio::test]
    async fn validate_access_checks_role_order() {
        let auth = manager().await;
        let user = auth.register("alice", "a@x.test", "Aa1!aaaa").await.unwrap();

        assert!(auth.validate_access(user.id, Role::Guest).await.unwrap());
        assert!(auth.validate_access(user.id, Role::User).await.unwrap());
        assert!(!auth.validate_access(user.id, Role::Admin).await.unwrap());
    }

    #[tokio::test]
    async fn bootstrap_admin_is_idempotent() {
        let auth = manager().await;
        auth.bootstrap_admin("admin", Some("Aa1!aaaa")).await.unwrap();
        auth.bootstrap_admin("admin", Some("Aa1!aaaa")).await.unwrap();

        let user = auth
            .store
            .get_user_by_username("admin")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.role, Role::Admin);
    }
}
