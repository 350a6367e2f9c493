//! Administrator session flows: login, token refresh, profile and menus,
//! logout and password change.
//!
//! Every flow after login takes the caller's [`AdminIdentity`] explicitly and
//! re-reads the live administrator record: a valid token is necessary but
//! not sufficient, so disabled or deleted accounts are turned away even
//! while their tokens are unexpired.
//!
//! Writes that only annotate a successful operation (last-login metadata,
//! activity time, audit entries) are best effort: failures are logged and
//! never change the outcome.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::identity::AdminIdentity;
use super::password::{hash_password, verify_password};
use super::permission::{build_menu_tree, MenuNode};
use super::token::{TokenError, TokenService};
use super::two_factor::verify_code;
use super::validation::{
    validate_login_password, validate_login_username, validate_password_change, ValidationError,
};
use crate::config::Config;
use crate::db::{
    AdminStore, Administrator, AuditLog, NewAdminLog, PermissionSource, RoleDirectory,
};
use crate::BackofficeError;

/// Role name shown when an administrator's role cannot be resolved.
pub const UNKNOWN_ROLE: &str = "unknown role";

/// Session flow errors. The display strings are the client-facing messages.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Unknown username, deleted account or wrong password.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The account exists but is disabled.
    #[error("account disabled")]
    AccountDisabled,

    /// Two-factor is on and no code was supplied.
    #[error("verification code required")]
    TwoFactorRequired,

    /// The supplied code did not verify.
    #[error("verification code incorrect")]
    TwoFactorInvalid,

    /// No usable identity: missing or invalid token, or the account is gone.
    #[error("not logged in or session expired")]
    NotLoggedIn,

    /// Password change with a wrong current password.
    #[error("old password incorrect")]
    OldPasswordIncorrect,

    /// Malformed input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Collaborator or configuration failure. The detail is logged, not shown.
    #[error("system error, try again")]
    Internal(String),
}

impl From<BackofficeError> for SessionError {
    fn from(e: BackofficeError) -> Self {
        SessionError::Internal(e.to_string())
    }
}

impl From<TokenError> for SessionError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::MissingSecret | TokenError::Signing(_) => SessionError::Internal(e.to_string()),
            _ => SessionError::NotLoggedIn,
        }
    }
}

/// Everything the session flows need from storage.
pub trait SessionStore: AdminStore + AuditLog + PermissionSource + RoleDirectory {}

impl<T> SessionStore for T where T: AdminStore + AuditLog + PermissionSource + RoleDirectory {}

/// Static settings read once from configuration.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Auxiliary socket endpoint returned on login.
    pub endpoint: String,
    /// Avatar returned by the info flow.
    pub avatar: String,
    /// Site used when a login does not name one.
    pub default_site_id: i64,
}

impl SessionSettings {
    /// Read settings from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            endpoint: config.socket.endpoint(),
            avatar: config.auth.default_avatar.clone(),
            default_site_id: config.auth.site_id,
        }
    }
}

/// A login request.
#[derive(Debug, Clone, Default)]
pub struct LoginAttempt {
    /// Username.
    pub username: String,
    /// Plaintext password.
    pub password: String,
    /// TOTP code, when the account uses two-factor authentication.
    pub code: Option<String>,
    /// Site; the configured default when absent.
    pub site_id: Option<i64>,
    /// Client IP.
    pub ip: String,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Signed session token.
    pub token: String,
    /// Auxiliary socket endpoint, possibly empty.
    pub endpoint: String,
    /// The administrator that logged in.
    pub identity: AdminIdentity,
}

/// Profile returned by the info flow.
#[derive(Debug, Clone)]
pub struct AdminInfo {
    /// Role names.
    pub roles: Vec<String>,
    /// Display name (nickname).
    pub name: String,
    /// Avatar URL.
    pub avatar: String,
    /// Short introduction line.
    pub introduction: String,
    /// Menu forest.
    pub menus: Vec<MenuNode>,
}

/// Outcome of logout and password change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Always true on return.
    pub success: bool,
    /// Human-readable confirmation.
    pub message: String,
}

impl ActionOutcome {
    fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}

/// Session orchestrator over a storage backend.
pub struct SessionService<S> {
    store: Arc<S>,
    tokens: Arc<TokenService>,
    settings: SessionSettings,
}

impl<S> Clone for SessionService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            tokens: Arc::clone(&self.tokens),
            settings: self.settings.clone(),
        }
    }
}

impl<S: SessionStore> SessionService<S> {
    /// Create a session service.
    pub fn new(store: Arc<S>, tokens: Arc<TokenService>, settings: SessionSettings) -> Self {
        Self {
            store,
            tokens,
            settings,
        }
    }

    /// Token service in use.
    pub fn tokens(&self) -> &Arc<TokenService> {
        &self.tokens
    }

    /// Authenticate with username and password (and a TOTP code when the
    /// account requires one) and issue a session token.
    ///
    /// Checks run in a fixed order: lookup, status, password, two-factor.
    pub async fn login(&self, attempt: LoginAttempt) -> Result<LoginOutcome, SessionError> {
        validate_login_username(&attempt.username)?;
        validate_login_password(&attempt.password)?;

        let site_id = attempt.site_id.unwrap_or(self.settings.default_site_id);
        let admin = self
            .store
            .find_by_username_and_site(&attempt.username, site_id)
            .await
            .map_err(|e| {
                error!(username = %attempt.username, site_id, "administrator lookup failed: {}", e);
                SessionError::from(e)
            })?;

        let admin = match admin {
            Some(admin) if !admin.is_deleted() => admin,
            _ => {
                warn!(username = %attempt.username, site_id, "login rejected: unknown administrator");
                return Err(SessionError::InvalidCredentials);
            }
        };

        if !admin.is_enabled() {
            warn!(admin_id = admin.id, username = %admin.username, "login rejected: account disabled");
            return Err(SessionError::AccountDisabled);
        }

        if !verify_password(&admin.password, &attempt.password) {
            warn!(admin_id = admin.id, username = %admin.username, "login rejected: wrong password");
            return Err(SessionError::InvalidCredentials);
        }

        if admin.two_factor_enabled {
            self.check_two_factor(&admin, attempt.code.as_deref())?;
        }

        let identity = AdminIdentity::new(admin.id, admin.username.clone(), admin.site_id);
        let token = self.tokens.issue(&identity).map_err(|e| {
            error!(admin_id = admin.id, "token issuance failed: {}", e);
            SessionError::from(e)
        })?;

        let now = Utc::now();
        if let Err(e) = self.store.update_login_meta(admin.id, &attempt.ip, now).await {
            error!(admin_id = admin.id, "failed to record login metadata: {}", e);
        }
        self.audit(&identity, &attempt.ip, "login succeeded").await;

        info!(admin_id = admin.id, username = %admin.username, site_id = admin.site_id, "administrator logged in");
        Ok(LoginOutcome {
            token,
            endpoint: self.settings.endpoint.clone(),
            identity,
        })
    }

    fn check_two_factor(&self, admin: &Administrator, code: Option<&str>) -> Result<(), SessionError> {
        let code = code.map(str::trim).filter(|c| !c.is_empty());
        let Some(code) = code else {
            return Err(SessionError::TwoFactorRequired);
        };

        let Some(secret) = admin.two_factor_secret.as_deref() else {
            error!(admin_id = admin.id, "two-factor enabled without a stored secret");
            return Err(SessionError::TwoFactorInvalid);
        };

        let now_secs = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
        match verify_code(secret, code, &admin.username, now_secs) {
            Ok(true) => Ok(()),
            Ok(false) => {
                warn!(admin_id = admin.id, "login rejected: wrong verification code");
                Err(SessionError::TwoFactorInvalid)
            }
            Err(e) => {
                error!(admin_id = admin.id, "stored two-factor secret unusable: {}", e);
                Err(SessionError::TwoFactorInvalid)
            }
        }
    }

    /// Issue a fresh token for a still-active administrator. The previous
    /// token stays valid until its own expiry.
    pub async fn refresh(&self, identity: &AdminIdentity, ip: &str) -> Result<String, SessionError> {
        let admin = self.authorize(identity).await?;

        let fresh = AdminIdentity::new(admin.id, admin.username.clone(), admin.site_id);
        let token = self.tokens.issue(&fresh).map_err(|e| {
            error!(admin_id = admin.id, "token issuance failed: {}", e);
            SessionError::from(e)
        })?;

        if let Err(e) = self.store.touch(admin.id, Utc::now()).await {
            error!(admin_id = admin.id, "failed to update last activity: {}", e);
        }
        self.audit(&fresh, ip, "token refreshed").await;

        debug!(admin_id = admin.id, "session token refreshed");
        Ok(token)
    }

    /// Profile, roles and menus of the calling administrator.
    pub async fn info(&self, identity: &AdminIdentity) -> Result<AdminInfo, SessionError> {
        let admin = self.authorize(identity).await?;

        let role = match self.store.find_role(admin.role_id).await {
            Ok(Some(role)) => role.name,
            Ok(None) => UNKNOWN_ROLE.to_string(),
            Err(e) => {
                error!(admin_id = admin.id, role_id = admin.role_id, "role lookup failed: {}", e);
                UNKNOWN_ROLE.to_string()
            }
        };

        let menus = self.load_menus(admin.id).await?;

        Ok(AdminInfo {
            roles: vec![role],
            name: admin.nickname.clone(),
            avatar: self.settings.avatar.clone(),
            introduction: format!("Administrator {}", admin.username),
            menus,
        })
    }

    /// Menu forest for the calling administrator.
    pub async fn menus(&self, identity: &AdminIdentity) -> Result<Vec<MenuNode>, SessionError> {
        let admin = self.authorize(identity).await?;
        self.load_menus(admin.id).await
    }

    async fn load_menus(&self, admin_id: i64) -> Result<Vec<MenuNode>, SessionError> {
        let records = self.store.list_enabled().await.map_err(|e| {
            error!(admin_id, "permission lookup failed: {}", e);
            SessionError::from(e)
        })?;
        Ok(build_menu_tree(&records))
    }

    /// Record a logout. Sessions are stateless, so nothing is revoked; the
    /// client discards its token.
    pub async fn logout(&self, identity: &AdminIdentity, ip: &str) -> ActionOutcome {
        let actor = match self.store.find_by_id(identity.admin_id).await {
            Ok(Some(admin)) => AdminIdentity::new(admin.id, admin.username, admin.site_id),
            Ok(None) => identity.clone(),
            Err(e) => {
                error!(admin_id = identity.admin_id, "administrator lookup failed during logout: {}", e);
                identity.clone()
            }
        };
        self.audit(&actor, ip, "logged out").await;

        info!(admin_id = actor.admin_id, username = %actor.username, "administrator logged out");
        ActionOutcome::ok("logged out")
    }

    /// Change the calling administrator's password.
    pub async fn change_password(
        &self,
        identity: &AdminIdentity,
        old_password: &str,
        new_password: &str,
        ip: &str,
    ) -> Result<ActionOutcome, SessionError> {
        validate_password_change(old_password, new_password)?;

        let admin = self.authorize(identity).await?;
        if !verify_password(&admin.password, old_password) {
            warn!(admin_id = admin.id, "password change rejected: old password incorrect");
            return Err(SessionError::OldPasswordIncorrect);
        }

        let hash = hash_password(new_password).map_err(|e| {
            error!(admin_id = admin.id, "password hashing failed: {}", e);
            SessionError::Internal(e.to_string())
        })?;
        self.store
            .update_password(admin.id, &hash, Utc::now())
            .await
            .map_err(|e| {
                error!(admin_id = admin.id, "failed to store new password: {}", e);
                SessionError::from(e)
            })?;

        let actor = AdminIdentity::new(admin.id, admin.username.clone(), admin.site_id);
        self.audit(&actor, ip, "password changed").await;

        info!(admin_id = admin.id, "administrator changed password");
        Ok(ActionOutcome::ok("password changed"))
    }

    /// Re-read the live record behind an identity and reject absent,
    /// deleted or disabled accounts.
    async fn authorize(&self, identity: &AdminIdentity) -> Result<Administrator, SessionError> {
        authorize(self.store.as_ref(), identity).await
    }

    async fn audit(&self, actor: &AdminIdentity, ip: &str, remark: &str) {
        let entry = NewAdminLog {
            site_id: actor.site_id,
            admin_id: actor.admin_id,
            admin_username: actor.username.clone(),
            ip: ip.to_string(),
            remark: remark.to_string(),
        };
        if let Err(e) = self.store.append(&entry).await {
            error!(admin_id = actor.admin_id, remark, "failed to write audit entry: {}", e);
        }
    }
}

/// Resolve the live administrator behind an identity.
///
/// Absent or soft-deleted accounts fail with [`SessionError::NotLoggedIn`],
/// disabled ones with [`SessionError::AccountDisabled`].
pub async fn authorize<S: AdminStore + ?Sized>(
    store: &S,
    identity: &AdminIdentity,
) -> Result<Administrator, SessionError> {
    let admin = store.find_by_id(identity.admin_id).await.map_err(|e| {
        error!(admin_id = identity.admin_id, "administrator lookup failed: {}", e);
        SessionError::from(e)
    })?;

    match admin {
        Some(admin) if admin.is_deleted() => {
            warn!(admin_id = admin.id, "rejected: administrator deleted");
            Err(SessionError::NotLoggedIn)
        }
        Some(admin) if !admin.is_enabled() => {
            warn!(admin_id = admin.id, "rejected: account disabled");
            Err(SessionError::AccountDisabled)
        }
        Some(admin) => Ok(admin),
        None => {
            warn!(admin_id = identity.admin_id, "rejected: administrator not found");
            Err(SessionError::NotLoggedIn)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::SubjectKind;
    use crate::auth::two_factor::generate_code;
    use crate::db::{PermissionKind, PermissionRecord, RecordStatus, Role};
    use crate::Result as StoreResult;
    use async_trait::async_trait;
    use chrono::DateTime;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const SECRET: &str = "JBSWY3DPEHPK3PXPJBSWY3DPEHPK3PXP";

    #[derive(Default)]
    struct Failures {
        lookup: bool,
        meta: bool,
        audit: bool,
        permissions: bool,
        roles: bool,
    }

    #[derive(Default)]
    struct FakeStore {
        admins: Mutex<HashMap<i64, Administrator>>,
        logs: Mutex<Vec<NewAdminLog>>,
        permissions: Vec<PermissionRecord>,
        roles: HashMap<i64, String>,
        fail: Failures,
    }

    fn fail_err() -> BackofficeError {
        BackofficeError::Database("connection reset".to_string())
    }

    impl FakeStore {
        fn insert(&self, admin: Administrator) {
            self.admins.lock().unwrap().insert(admin.id, admin);
        }

        fn get(&self, id: i64) -> Administrator {
            self.admins.lock().unwrap().get(&id).cloned().unwrap()
        }

        fn remarks(&self) -> Vec<String> {
            self.logs.lock().unwrap().iter().map(|l| l.remark.clone()).collect()
        }
    }

    #[async_trait]
    impl AdminStore for FakeStore {
        async fn find_by_username_and_site(&self, username: &str, site_id: i64) -> StoreResult<Option<Administrator>> {
            if self.fail.lookup {
                return Err(fail_err());
            }
            Ok(self
                .admins
                .lock()
                .unwrap()
                .values()
                .find(|a| a.username == username && a.site_id == site_id)
                .cloned())
        }

        async fn find_by_id(&self, id: i64) -> StoreResult<Option<Administrator>> {
            if self.fail.lookup {
                return Err(fail_err());
            }
            Ok(self.admins.lock().unwrap().get(&id).cloned())
        }

        async fn update_login_meta(&self, id: i64, ip: &str, at: DateTime<Utc>) -> StoreResult<()> {
            if self.fail.meta {
                return Err(fail_err());
            }
            if let Some(admin) = self.admins.lock().unwrap().get_mut(&id) {
                admin.last_login_ip = Some(ip.to_string());
                admin.last_login_at = Some(at);
            }
            Ok(())
        }

        async fn touch(&self, id: i64, at: DateTime<Utc>) -> StoreResult<()> {
            if self.fail.meta {
                return Err(fail_err());
            }
            if let Some(admin) = self.admins.lock().unwrap().get_mut(&id) {
                admin.updated_at = at;
            }
            Ok(())
        }

        async fn update_password(&self, id: i64, hash: &str, at: DateTime<Utc>) -> StoreResult<()> {
            if let Some(admin) = self.admins.lock().unwrap().get_mut(&id) {
                admin.password = hash.to_string();
                admin.updated_at = at;
            }
            Ok(())
        }
    }

    #[async_trait]
    impl AuditLog for FakeStore {
        async fn append(&self, entry: &NewAdminLog) -> StoreResult<()> {
            if self.fail.audit {
                return Err(fail_err());
            }
            self.logs.lock().unwrap().push(entry.clone());
            Ok(())
        }
    }

    #[async_trait]
    impl PermissionSource for FakeStore {
        async fn list_enabled(&self) -> StoreResult<Vec<PermissionRecord>> {
            if self.fail.permissions {
                return Err(fail_err());
            }
            Ok(self.permissions.clone())
        }
    }

    #[async_trait]
    impl RoleDirectory for FakeStore {
        async fn find_role(&self, id: i64) -> StoreResult<Option<Role>> {
            if self.fail.roles {
                return Err(fail_err());
            }
            Ok(self.roles.get(&id).map(|name| Role {
                id,
                site_id: 1,
                name: name.clone(),
                status: RecordStatus::Enabled,
                created_at: Utc::now(),
            }))
        }
    }

    fn admin(id: i64, username: &str, password: &str) -> Administrator {
        let now = Utc::now();
        Administrator {
            id,
            site_id: 1,
            username: username.to_string(),
            nickname: format!("{username} nick"),
            password: hash_password(password).unwrap(),
            role_id: 1,
            status: RecordStatus::Enabled,
            two_factor_enabled: false,
            two_factor_secret: None,
            last_login_ip: None,
            last_login_at: None,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn permission(id: i64, parent_id: i64, name: &str) -> PermissionRecord {
        PermissionRecord {
            id,
            parent_id,
            name: name.to_string(),
            kind: PermissionKind::Menu,
            backend_url: String::new(),
            frontend_url: String::new(),
            icon: String::new(),
            sort: 0,
            status: RecordStatus::Enabled,
        }
    }

    fn store() -> FakeStore {
        let store = FakeStore {
            permissions: vec![
                permission(1, 0, "Sys"),
                permission(2, 1, "Admins"),
                permission(3, 99, "Orphan"),
            ],
            roles: HashMap::from([(1, "Super Administrator".to_string())]),
            ..FakeStore::default()
        };
        store.insert(admin(1, "admin1", "secret1"));
        store
    }

    fn settings() -> SessionSettings {
        SessionSettings {
            endpoint: "ws://push.local:2346".to_string(),
            avatar: "/avatar.png".to_string(),
            default_site_id: 1,
        }
    }

    fn service(store: FakeStore) -> (SessionService<FakeStore>, Arc<FakeStore>) {
        let store = Arc::new(store);
        let service = SessionService::new(
            Arc::clone(&store),
            Arc::new(TokenService::new("test-secret")),
            settings(),
        );
        (service, store)
    }

    fn attempt(username: &str, password: &str) -> LoginAttempt {
        LoginAttempt {
            username: username.to_string(),
            password: password.to_string(),
            ip: "10.0.0.1".to_string(),
            ..LoginAttempt::default()
        }
    }

    fn identity() -> AdminIdentity {
        AdminIdentity::new(1, "admin1", 1)
    }

    #[tokio::test]
    async fn test_login_success() {
        let (service, store) = service(store());

        let outcome = service.login(attempt("admin1", "secret1")).await.unwrap();
        assert!(!outcome.token.is_empty());
        assert_eq!(outcome.endpoint, "ws://push.local:2346");

        let claims = service.tokens().validate(&outcome.token).unwrap();
        assert_eq!(claims.admin_id, 1);
        assert_eq!(claims.username, "admin1");
        assert_eq!(claims.site_id, 1);
        assert_eq!(claims.kind, SubjectKind::Admin);

        let stored = store.get(1);
        assert_eq!(stored.last_login_ip.as_deref(), Some("10.0.0.1"));
        assert!(stored.last_login_at.is_some());
        assert_eq!(store.remarks(), vec!["login succeeded"]);
    }

    #[tokio::test]
    async fn test_login_wrong_password_matches_unknown_user() {
        let (service, store) = service(store());

        let wrong = service.login(attempt("admin1", "nope99")).await.unwrap_err();
        let unknown = service.login(attempt("ghost1", "secret1")).await.unwrap_err();
        assert!(matches!(wrong, SessionError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
        assert!(store.remarks().is_empty());
    }

    #[tokio::test]
    async fn test_login_other_site_is_unknown() {
        let (service, _) = service(store());
        let mut other = attempt("admin1", "secret1");
        other.site_id = Some(2);
        assert!(matches!(service.login(other).await, Err(SessionError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_disabled_even_with_correct_password() {
        let store = store();
        let mut disabled = admin(2, "admin2", "secret2");
        disabled.status = RecordStatus::Disabled;
        store.insert(disabled);
        let (service, _) = service(store);

        let err = service.login(attempt("admin2", "secret2")).await.unwrap_err();
        assert!(matches!(err, SessionError::AccountDisabled));
        assert_eq!(err.to_string(), "account disabled");

        // Status is checked before the password.
        let err = service.login(attempt("admin2", "wrong1")).await.unwrap_err();
        assert!(matches!(err, SessionError::AccountDisabled));
    }

    #[tokio::test]
    async fn test_login_deleted_is_unknown() {
        let store = store();
        let mut deleted = admin(2, "admin2", "secret2");
        deleted.deleted_at = Some(Utc::now());
        store.insert(deleted);
        let (service, _) = service(store);

        let err = service.login(attempt("admin2", "secret2")).await.unwrap_err();
        assert!(matches!(err, SessionError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_requires_fields() {
        let (service, _) = service(store());
        let err = service.login(attempt("", "secret1")).await.unwrap_err();
        assert!(matches!(err, SessionError::Validation(ValidationError::UsernameRequired)));
        let err = service.login(attempt("admin1", "")).await.unwrap_err();
        assert!(matches!(err, SessionError::Validation(ValidationError::PasswordRequired)));
    }

    #[tokio::test]
    async fn test_login_two_factor() {
        let store = store();
        let mut guarded = admin(2, "admin2", "secret2");
        guarded.two_factor_enabled = true;
        guarded.two_factor_secret = Some(SECRET.to_string());
        store.insert(guarded);
        let (service, _) = service(store);

        let err = service.login(attempt("admin2", "secret2")).await.unwrap_err();
        assert!(matches!(err, SessionError::TwoFactorRequired));

        let mut blank = attempt("admin2", "secret2");
        blank.code = Some("  ".to_string());
        assert!(matches!(service.login(blank).await, Err(SessionError::TwoFactorRequired)));

        // Wrong password still wins over a missing code.
        let err = service.login(attempt("admin2", "wrong1")).await.unwrap_err();
        assert!(matches!(err, SessionError::InvalidCredentials));

        let now = u64::try_from(Utc::now().timestamp()).unwrap();
        let good = generate_code(SECRET, "admin2", now).unwrap();
        let bad = if good == "000000" { "111111" } else { "000000" };

        let mut wrong_code = attempt("admin2", "secret2");
        wrong_code.code = Some(bad.to_string());
        assert!(matches!(service.login(wrong_code).await, Err(SessionError::TwoFactorInvalid)));

        let mut right_code = attempt("admin2", "secret2");
        right_code.code = Some(good);
        assert!(service.login(right_code).await.is_ok());
    }

    #[tokio::test]
    async fn test_login_two_factor_without_secret() {
        let store = store();
        let mut broken = admin(2, "admin2", "secret2");
        broken.two_factor_enabled = true;
        store.insert(broken);
        let (service, _) = service(store);

        let mut with_code = attempt("admin2", "secret2");
        with_code.code = Some("123456".to_string());
        assert!(matches!(service.login(with_code).await, Err(SessionError::TwoFactorInvalid)));
    }

    #[tokio::test]
    async fn test_login_lookup_failure_is_system_error() {
        let mut store = store();
        store.fail.lookup = true;
        let (service, _) = service(store);

        let err = service.login(attempt("admin1", "secret1")).await.unwrap_err();
        assert!(matches!(err, SessionError::Internal(_)));
        assert_eq!(err.to_string(), "system error, try again");
    }

    #[tokio::test]
    async fn test_login_best_effort_failures_ignored() {
        let mut store = store();
        store.fail.meta = true;
        store.fail.audit = true;
        let (service, store) = service(store);

        let outcome = service.login(attempt("admin1", "secret1")).await.unwrap();
        assert!(!outcome.token.is_empty());
        assert!(store.get(1).last_login_at.is_none());
        assert!(store.remarks().is_empty());
    }

    #[tokio::test]
    async fn test_login_without_secret_fails() {
        let store = Arc::new(store());
        let service = SessionService::new(store, Arc::new(TokenService::new("")), settings());

        let err = service.login(attempt("admin1", "secret1")).await.unwrap_err();
        assert!(matches!(err, SessionError::Internal(_)));
    }

    #[tokio::test]
    async fn test_refresh_issues_new_token() {
        let (service, store) = service(store());

        let token = service.refresh(&identity(), "10.0.0.2").await.unwrap();
        let claims = service.tokens().validate(&token).unwrap();
        assert_eq!(claims.admin_id, 1);
        assert_eq!(store.remarks(), vec!["token refreshed"]);
    }

    #[tokio::test]
    async fn test_refresh_rejects_disabled_and_missing() {
        let store = store();
        let mut disabled = admin(2, "admin2", "secret2");
        disabled.status = RecordStatus::Disabled;
        store.insert(disabled);
        let (service, _) = service(store);

        let err = service
            .refresh(&AdminIdentity::new(2, "admin2", 1), "ip")
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::AccountDisabled));

        let err = service
            .refresh(&AdminIdentity::new(42, "ghost", 1), "ip")
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::NotLoggedIn));
    }

    #[tokio::test]
    async fn test_refresh_best_effort_failures_ignored() {
        let mut store = store();
        store.fail.meta = true;
        store.fail.audit = true;
        let (service, _) = service(store);
        assert!(service.refresh(&identity(), "ip").await.is_ok());
    }

    #[tokio::test]
    async fn test_info() {
        let (service, _) = service(store());

        let info = service.info(&identity()).await.unwrap();
        assert_eq!(info.roles, vec!["Super Administrator"]);
        assert_eq!(info.name, "admin1 nick");
        assert_eq!(info.avatar, "/avatar.png");
        assert_eq!(info.introduction, "Administrator admin1");
        assert_eq!(info.menus.len(), 1);
        assert_eq!(info.menus[0].name, "Sys");
        assert_eq!(info.menus[0].children.len(), 1);
        assert_eq!(info.menus[0].children[0].name, "Admins");
    }

    #[tokio::test]
    async fn test_info_role_failure_falls_back() {
        let mut store = store();
        store.fail.roles = true;
        let (service, _) = service(store);

        let info = service.info(&identity()).await.unwrap();
        assert_eq!(info.roles, vec![UNKNOWN_ROLE]);
    }

    #[tokio::test]
    async fn test_info_permission_failure_is_system_error() {
        let mut store = store();
        store.fail.permissions = true;
        let (service, _) = service(store);

        assert!(matches!(service.info(&identity()).await, Err(SessionError::Internal(_))));
        assert!(matches!(service.menus(&identity()).await, Err(SessionError::Internal(_))));
    }

    #[tokio::test]
    async fn test_menus_rejects_deleted() {
        let store = store();
        let mut deleted = admin(2, "admin2", "secret2");
        deleted.deleted_at = Some(Utc::now());
        store.insert(deleted);
        let (service, _) = service(store);

        let err = service.menus(&AdminIdentity::new(2, "admin2", 1)).await.unwrap_err();
        assert!(matches!(err, SessionError::NotLoggedIn));
    }

    #[tokio::test]
    async fn test_logout_records_audit() {
        let (service, store) = service(store());

        let outcome = service.logout(&identity(), "10.0.0.3").await;
        assert!(outcome.success);
        assert_eq!(outcome.message, "logged out");
        assert_eq!(store.remarks(), vec!["logged out"]);
        assert_eq!(store.logs.lock().unwrap()[0].ip, "10.0.0.3");
    }

    #[tokio::test]
    async fn test_logout_survives_failures() {
        let mut store = store();
        store.fail.lookup = true;
        store.fail.audit = true;
        let (service, _) = service(store);

        assert!(service.logout(&identity(), "ip").await.success);
    }

    #[tokio::test]
    async fn test_change_password() {
        let (service, store) = service(store());

        let outcome = service
            .change_password(&identity(), "secret1", "secret2", "ip")
            .await
            .unwrap();
        assert_eq!(outcome, ActionOutcome::ok("password changed"));
        assert!(verify_password(&store.get(1).password, "secret2"));
        assert_eq!(store.remarks(), vec!["password changed"]);

        assert!(service.login(attempt("admin1", "secret2")).await.is_ok());
        assert!(service.login(attempt("admin1", "secret1")).await.is_err());
    }

    #[tokio::test]
    async fn test_change_password_errors() {
        let (service, store) = service(store());

        let err = service.change_password(&identity(), "", "x", "ip").await.unwrap_err();
        assert_eq!(err.to_string(), "old password required");

        let err = service.change_password(&identity(), "secret1", "", "ip").await.unwrap_err();
        assert_eq!(err.to_string(), "new password required");

        let err = service.change_password(&identity(), "secret1", "abc", "ip").await.unwrap_err();
        assert!(matches!(err, SessionError::Validation(ValidationError::PasswordLength)));

        let err = service
            .change_password(&identity(), "secret1", "secret1", "ip")
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Validation(ValidationError::PasswordUnchanged)));

        let err = service
            .change_password(&identity(), "wrong99", "secret3", "ip")
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::OldPasswordIncorrect));

        assert!(verify_password(&store.get(1).password, "secret1"));
        assert!(store.remarks().is_empty());
    }

    #[test]
    fn test_token_error_mapping() {
        assert!(matches!(SessionError::from(TokenError::Expired), SessionError::NotLoggedIn));
        assert!(matches!(
            SessionError::from(TokenError::MissingSecret),
            SessionError::Internal(_)
        ));
    }
}
