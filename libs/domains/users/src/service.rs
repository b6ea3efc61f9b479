use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::commands::{
    ChangePasswordCommand, CreateUserCommand, DeleteUserCommand, UpdateUserCommand,
};
use crate::error::{UserError, UserResult};
use crate::models::{PagedResult, User, UserResponse};
use crate::password::PasswordHasher;
use crate::queries::{GetUserByUsernameQuery, GetUserQuery, ListUsersQuery};
use crate::repository::UserRepository;

/// Command and query handlers for user accounts
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: PasswordHasher> Clone for UserService<R, H> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            hasher: Arc::clone(&self.hasher),
        }
    }
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    pub fn new(repository: R, hasher: H) -> Self {
        Self {
            repository: Arc::new(repository),
            hasher: Arc::new(hasher),
        }
    }

    async fn load(&self, id: Uuid, cancel: &CancellationToken) -> UserResult<User> {
        self.repository
            .get_by_id(id, cancel)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    /// Create an account and return its identifier.
    ///
    /// Uniqueness is checked before the password is hashed, so a duplicate
    /// costs one query and nothing else.
    #[instrument(skip(self, cmd, cancel), fields(username = %cmd.username))]
    pub async fn create_user(
        &self,
        cmd: CreateUserCommand,
        cancel: &CancellationToken,
    ) -> UserResult<Uuid> {
        cmd.validate()?;
        let role = cmd.role()?;

        if self
            .repository
            .exists(&cmd.username, &cmd.email, None, cancel)
            .await?
        {
            return Err(UserError::DuplicateUser);
        }

        let password_hash = self.hasher.hash(&cmd.password)?;
        let user = User::create(cmd.username, cmd.email, password_hash, role)?;

        self.repository.add(&user, cancel).await?;
        Ok(user.id())
    }

    #[instrument(skip(self, cmd, cancel), fields(user_id = %cmd.user_id))]
    pub async fn update_user(
        &self,
        cmd: UpdateUserCommand,
        cancel: &CancellationToken,
    ) -> UserResult<()> {
        cmd.validate()?;
        let role = cmd.role()?;

        let mut user = self.load(cmd.user_id, cancel).await?;

        if self
            .repository
            .exists(&cmd.username, &cmd.email, Some(cmd.user_id), cancel)
            .await?
        {
            return Err(UserError::DuplicateUser);
        }

        user.update_profile(cmd.username, cmd.email, role, cmd.is_active)?;
        self.repository.update(&user, cancel).await
    }

    #[instrument(skip(self, cancel), fields(user_id = %cmd.user_id))]
    pub async fn delete_user(
        &self,
        cmd: DeleteUserCommand,
        cancel: &CancellationToken,
    ) -> UserResult<()> {
        self.repository.delete(cmd.user_id, cancel).await
    }

    #[instrument(skip(self, cancel), fields(user_id = %query.id))]
    pub async fn get_user(
        &self,
        query: GetUserQuery,
        cancel: &CancellationToken,
    ) -> UserResult<UserResponse> {
        self.load(query.id, cancel).await.map(UserResponse::from)
    }

    #[instrument(skip(self, cancel))]
    pub async fn get_user_by_username(
        &self,
        query: GetUserByUsernameQuery,
        cancel: &CancellationToken,
    ) -> UserResult<UserResponse> {
        let user = self
            .repository
            .get_by_username(&query.username, cancel)
            .await?;

        user.map(UserResponse::from)
            .ok_or(UserError::UsernameNotFound(query.username))
    }

    #[instrument(skip(self, cancel))]
    pub async fn list_users(
        &self,
        query: ListUsersQuery,
        cancel: &CancellationToken,
    ) -> UserResult<PagedResult<UserResponse>> {
        query.validate()?;

        let (users, total_count) = tokio::try_join!(
            self.repository
                .get_paged(query.page_number, query.page_size, cancel),
            self.repository.total_count(cancel),
        )?;

        Ok(
            PagedResult::new(users, total_count, query.page_number, query.page_size)
                .map(UserResponse::from),
        )
    }

    /// Replace the password after checking the current one
    #[instrument(skip(self, cmd, cancel), fields(user_id = %cmd.user_id))]
    pub async fn change_password(
        &self,
        cmd: ChangePasswordCommand,
        cancel: &CancellationToken,
    ) -> UserResult<()> {
        cmd.validate()?;

        let mut user = self.load(cmd.user_id, cancel).await?;

        if !self
            .hasher
            .verify(&cmd.current_password, user.password_hash())
        {
            tracing::warn!("Password change rejected: current password mismatch");
            return Err(UserError::InvalidCredentials);
        }

        let password_hash = self.hasher.hash(&cmd.new_password)?;
        user.change_password(password_hash)?;
        self.repository.update(&user, cancel).await
    }

    #[instrument(skip(self, cancel))]
    pub async fn activate_user(&self, id: Uuid, cancel: &CancellationToken) -> UserResult<()> {
        let mut user = self.load(id, cancel).await?;

        if user.activate() {
            self.repository.update(&user, cancel).await?;
        }
        Ok(())
    }

    #[instrument(skip(self, cancel))]
    pub async fn deactivate_user(&self, id: Uuid, cancel: &CancellationToken) -> UserResult<()> {
        let mut user = self.load(id, cancel).await?;

        if user.deactivate() {
            self.repository.update(&user, cancel).await?;
        }
        Ok(())
    }
}
