//! Administrator accounts: create, list, update, soft delete, and the
//! startup bootstrap of the first account.

use tracing::{info, warn};

use crate::auth::validation::{
    validate_id, validate_nickname, validate_password, validate_role_id, validate_status,
    validate_username,
};
use crate::auth::{authorize, hash_password, AdminIdentity};
use crate::config::BootstrapConfig;
use crate::db::{
    AdminListFilter, AdminRepository, AdminSummary, AdminUpdate, Administrator, Database,
    NewAdmin, RecordStatus, RoleRepository,
};
use crate::{BackofficeError, Result};

use super::{paging, record_action, AdminError, Page};

/// Default page size for the administrator listing.
const DEFAULT_PAGE_SIZE: i64 = 10;

/// Input for creating an administrator.
#[derive(Debug, Clone, Default)]
pub struct CreateAdmin {
    /// Username, 4-12 characters.
    pub username: String,
    /// Plaintext password, 6-20 characters.
    pub password: String,
    /// Nickname, 2-20 characters.
    pub nickname: String,
    /// Role id, positive.
    pub role_id: i64,
    /// 0 disabled, 1 enabled; enabled when absent.
    pub status: Option<i32>,
}

/// Input for listing administrators.
#[derive(Debug, Clone, Default)]
pub struct ListAdmins {
    /// Substring match on username.
    pub username: Option<String>,
    /// Status filter.
    pub status: Option<i32>,
    /// 1-based page.
    pub page: Option<i64>,
    /// Page size.
    pub size: Option<i64>,
}

/// Input for updating an administrator. Absent or empty fields are unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateAdmin {
    /// Target id.
    pub id: i64,
    /// New plaintext password.
    pub password: Option<String>,
    /// New nickname.
    pub nickname: Option<String>,
    /// New role.
    pub role_id: Option<i64>,
    /// New status.
    pub status: Option<i32>,
}

fn is_unique_violation(e: &BackofficeError) -> bool {
    matches!(e, BackofficeError::Duplicate(_))
}

/// Administrator account management.
pub struct AccountService<'a> {
    db: &'a Database,
}

impl<'a> AccountService<'a> {
    /// Create a new AccountService.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create an administrator in the actor's site.
    pub async fn create(
        &self,
        actor: &AdminIdentity,
        input: CreateAdmin,
        ip: &str,
    ) -> std::result::Result<Administrator, AdminError> {
        validate_username(&input.username)?;
        validate_password(&input.password)?;
        validate_nickname(&input.nickname)?;
        validate_role_id(input.role_id)?;
        let status = match input.status {
            Some(code) => validate_status(code)?,
            None => RecordStatus::Enabled,
        };

        let actor = authorize(self.db, actor).await?;
        let repo = AdminRepository::new(self.db.pool());

        if repo.username_exists(actor.site_id, &input.username).await? {
            return Err(AdminError::UsernameTaken);
        }

        let hash = hash_password(&input.password).map_err(|e| AdminError::Internal(e.to_string()))?;
        let new_admin = NewAdmin::new(actor.site_id, &input.username, hash, &input.nickname, input.role_id)
            .with_status(status);
        let created = repo.create(&new_admin).await.map_err(|e| {
            if is_unique_violation(&e) {
                AdminError::UsernameTaken
            } else {
                AdminError::from(e)
            }
        })?;

        let identity = AdminIdentity::new(actor.id, actor.username.clone(), actor.site_id);
        record_action(self.db, &identity, ip, format!("created administrator: {}", created.username)).await;
        info!(admin_id = actor.id, created_id = created.id, "administrator created");

        Ok(created)
    }

    /// List live administrators of the actor's site, newest first.
    pub async fn list(
        &self,
        actor: &AdminIdentity,
        input: ListAdmins,
    ) -> std::result::Result<Page<AdminSummary>, AdminError> {
        let status = input.status.map(validate_status).transpose()?;
        let actor = authorize(self.db, actor).await?;

        let (page, size) = paging(input.page, input.size, DEFAULT_PAGE_SIZE);
        let filter = AdminListFilter {
            site_id: actor.site_id,
            username: input.username.filter(|u| !u.trim().is_empty()),
            status,
            page,
            size,
        };
        let (items, total) = AdminRepository::new(self.db.pool()).list(&filter).await?;

        Ok(Page {
            items,
            total,
            page,
            size,
        })
    }

    /// Update an administrator of the actor's site.
    pub async fn update(
        &self,
        actor: &AdminIdentity,
        input: UpdateAdmin,
        ip: &str,
    ) -> std::result::Result<Administrator, AdminError> {
        validate_id(input.id)?;
        let password = input.password.filter(|p| !p.is_empty());
        let nickname = input.nickname.filter(|n| !n.is_empty());
        if let Some(ref password) = password {
            validate_password(password)?;
        }
        if let Some(ref nickname) = nickname {
            validate_nickname(nickname)?;
        }
        if let Some(role_id) = input.role_id {
            validate_role_id(role_id)?;
        }
        let status = input.status.map(validate_status).transpose()?;

        let actor = authorize(self.db, actor).await?;
        let repo = AdminRepository::new(self.db.pool());
        let target = self.live_target(&repo, actor.site_id, input.id).await?;

        let mut update = AdminUpdate::new();
        if let Some(password) = password {
            let hash = hash_password(&password).map_err(|e| AdminError::Internal(e.to_string()))?;
            update = update.password(hash);
        }
        if let Some(nickname) = nickname {
            update = update.nickname(nickname);
        }
        if let Some(role_id) = input.role_id {
            update = update.role_id(role_id);
        }
        if let Some(status) = status {
            update = update.status(status);
        }

        let updated = repo
            .update(target.id, &update)
            .await?
            .ok_or_else(|| AdminError::NotFound("administrator".to_string()))?;

        let identity = AdminIdentity::new(actor.id, actor.username.clone(), actor.site_id);
        record_action(self.db, &identity, ip, format!("updated administrator: {}", updated.username)).await;
        info!(admin_id = actor.id, target_id = updated.id, "administrator updated");

        Ok(updated)
    }

    /// Soft-delete an administrator of the actor's site.
    pub async fn delete(
        &self,
        actor: &AdminIdentity,
        id: i64,
        ip: &str,
    ) -> std::result::Result<(), AdminError> {
        validate_id(id)?;
        if id == actor.admin_id {
            return Err(AdminError::CannotDeleteSelf);
        }

        let actor = authorize(self.db, actor).await?;
        let repo = AdminRepository::new(self.db.pool());
        let target = self.live_target(&repo, actor.site_id, id).await?;

        if !repo.soft_delete(target.id).await? {
            return Err(AdminError::NotFound("administrator".to_string()));
        }

        let identity = AdminIdentity::new(actor.id, actor.username.clone(), actor.site_id);
        record_action(self.db, &identity, ip, format!("deleted administrator: {}", target.username)).await;
        info!(admin_id = actor.id, target_id = target.id, "administrator deleted");

        Ok(())
    }

    async fn live_target(
        &self,
        repo: &AdminRepository<'_>,
        site_id: i64,
        id: i64,
    ) -> std::result::Result<Administrator, AdminError> {
        match repo.get_by_id(id).await? {
            Some(admin) if admin.site_id == site_id && !admin.is_deleted() => Ok(admin),
            _ => Err(AdminError::NotFound("administrator".to_string())),
        }
    }
}

/// Create the configured first administrator when the site has none.
///
/// Returns the created account, or `None` when bootstrapping is not
/// configured or the site already has administrators. The account gets the
/// site's first enabled role, creating one when the site has no roles.
pub async fn bootstrap(
    db: &Database,
    config: &BootstrapConfig,
    site_id: i64,
) -> Result<Option<Administrator>> {
    if !config.is_enabled() {
        return Ok(None);
    }

    let repo = AdminRepository::new(db.pool());
    if repo.count_by_site(site_id).await? > 0 {
        return Ok(None);
    }

    validate_username(&config.username)
        .and_then(|_| validate_password(&config.password))
        .and_then(|_| validate_nickname(&config.nickname))
        .map_err(|e| BackofficeError::Validation(format!("bootstrap administrator: {e}")))?;

    let roles = RoleRepository::new(db.pool());
    let role_id = match roles.list_enabled(site_id).await?.first() {
        Some(role) => role.id,
        None => {
            warn!(site_id, "no roles for site, creating one for the bootstrap administrator");
            roles.create(site_id, "Super Administrator", RecordStatus::Enabled).await?.id
        }
    };

    let hash = hash_password(&config.password).map_err(|e| BackofficeError::Validation(e.to_string()))?;
    let admin = repo
        .create(&NewAdmin::new(site_id, &config.username, hash, &config.nickname, role_id))
        .await?;

    info!(admin_id = admin.id, username = %admin.username, site_id, "bootstrap administrator created");
    Ok(Some(admin))
}
