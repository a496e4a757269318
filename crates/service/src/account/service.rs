use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::domain::{Role, User};
use crate::errors::ServiceError;
use crate::hash::HashProvider;
use crate::repository::{FindWith, GenericRepository};

/// Role and user management with the role-in-use guard and password hashing.
pub struct AccountService {
    roles: Arc<dyn GenericRepository<Role>>,
    users: Arc<dyn GenericRepository<User>>,
    hasher: Arc<dyn HashProvider>,
}

impl AccountService {
    pub fn new(
        roles: Arc<dyn GenericRepository<Role>>,
        users: Arc<dyn GenericRepository<User>>,
        hasher: Arc<dyn HashProvider>,
    ) -> Self {
        Self { roles, users, hasher }
    }

    pub async fn role_list(&self) -> Result<Vec<Role>, ServiceError> {
        Ok(self.roles.all().await?)
    }

    pub async fn add_role(&self, role: Role) -> Result<Role, ServiceError> {
        let created = self.roles.create(role).await?;
        info!(role_id = created.id, name = %created.name, "role_created");
        Ok(created)
    }

    pub async fn edit_role(&self, role: Role) -> Result<Role, ServiceError> {
        Ok(self.roles.update(role).await?)
    }

    /// Delete a role unless users are still assigned to it.
    ///
    /// The stored row (not the caller's copy) decides the guard, and the
    /// delete is never attempted when the guard fails.
    #[instrument(skip(self, role), fields(role_id = role.id))]
    pub async fn delete_role(&self, role: &Role) -> Result<(), ServiceError> {
        let stored = self.roles.find(FindWith::Id(role.id)).await?;
        if stored.usage >= 1 {
            debug!(usage = stored.usage, "role still assigned");
            return Err(ServiceError::unable_to_delete());
        }
        self.roles.delete(&stored).await.map_err(ServiceError::internal)?;
        info!("role_deleted");
        Ok(())
    }

    pub async fn user_list(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.users.all().await?)
    }

    pub async fn show_user(&self, id: i32) -> Result<User, ServiceError> {
        Ok(self.users.find(FindWith::Id(id)).await?)
    }

    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn add_user(&self, user: User) -> Result<User, ServiceError> {
        let user = self.with_hashed_password(user)?;
        let created = self.users.create(user).await?;
        info!(user_id = created.id, "user_created");
        Ok(created)
    }

    #[instrument(skip(self, user), fields(user_id = user.id))]
    pub async fn edit_user(&self, user: User) -> Result<User, ServiceError> {
        let user = self.with_hashed_password(user)?;
        Ok(self.users.update(user).await?)
    }

    #[instrument(skip(self, user), fields(user_id = user.id))]
    pub async fn delete_user(&self, user: &User) -> Result<(), ServiceError> {
        let stored = self.users.find(FindWith::Id(user.id)).await?;
        self.users.delete(&stored).await.map_err(ServiceError::internal)?;
        info!("user_deleted");
        Ok(())
    }

    /// Check a username/password pair against the stored digest.
    ///
    /// Unknown user, a failed comparison and a wrong password all yield
    /// [`ServiceError::Unauthenticated`] so callers cannot tell them apart.
    #[instrument(skip(self, password))]
    pub async fn verify_user_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, ServiceError> {
        let user = match self.users.find(FindWith::Username(username.to_string())).await {
            Ok(user) => user,
            Err(e) => {
                debug!(error = %e, "credential lookup failed");
                return Err(ServiceError::Unauthenticated);
            }
        };
        match self.hasher.compare(password, &user.password) {
            Ok(true) => Ok(user.without_password()),
            Ok(false) => Err(ServiceError::Unauthenticated),
            Err(e) => {
                warn!(error = %e, "password comparison failed");
                Err(ServiceError::Unauthenticated)
            }
        }
    }

    /// Swap a plaintext password for its digest. Empty means "keep the stored
    /// one", so nothing is hashed.
    fn with_hashed_password(&self, mut user: User) -> Result<User, ServiceError> {
        if user.has_password() {
            user.password = self.hasher.hash(&user.password).map_err(ServiceError::internal)?;
        }
        Ok(user)
    }
}
