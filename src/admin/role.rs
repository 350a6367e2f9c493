//! Role lookup for administrator forms.

use crate::auth::{authorize, AdminIdentity};
use crate::db::{Database, Role, RoleRepository};

use super::AdminError;

/// Role lookups scoped to the actor's site.
pub struct RoleService<'a> {
    db: &'a Database,
}

impl<'a> RoleService<'a> {
    /// Create a new RoleService.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Enabled roles of the actor's site, ordered by id.
    pub async fn list(&self, actor: &AdminIdentity) -> Result<Vec<Role>, AdminError> {
        let actor = authorize(self.db, actor).await?;
        Ok(RoleRepository::new(self.db.pool()).list_enabled(actor.site_id).await?)
    }
}
