use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;

/// Repository trait for User persistence
///
/// Every operation takes the caller's cancellation token. Implementations
/// stop waiting on storage once it fires and return [`UserError::Cancelled`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid, cancel: &CancellationToken)
    -> UserResult<Option<User>>;

    /// Exact, case-sensitive match
    async fn get_by_username(
        &self,
        username: &str,
        cancel: &CancellationToken,
    ) -> UserResult<Option<User>>;

    /// Exact, case-sensitive match
    async fn get_by_email(
        &self,
        email: &str,
        cancel: &CancellationToken,
    ) -> UserResult<Option<User>>;

    /// One page ordered by `created_at` ascending. `page_number` starts at 1.
    async fn get_paged(
        &self,
        page_number: u64,
        page_size: u64,
        cancel: &CancellationToken,
    ) -> UserResult<Vec<User>>;

    /// True if any user other than `exclude_id` has this username OR this email
    async fn exists(
        &self,
        username: &str,
        email: &str,
        exclude_id: Option<Uuid>,
        cancel: &CancellationToken,
    ) -> UserResult<bool>;

    async fn add(&self, user: &User, cancel: &CancellationToken) -> UserResult<()>;

    /// Fails with `NotFound` if no row has this user's id
    async fn update(&self, user: &User, cancel: &CancellationToken) -> UserResult<()>;

    /// Fails with `NotFound` if no row has this id
    async fn delete(&self, id: Uuid, cancel: &CancellationToken) -> UserResult<()>;

    async fn total_count(&self, cancel: &CancellationToken) -> UserResult<u64>;
}

fn ensure_live(cancel: &CancellationToken) -> UserResult<()> {
    if cancel.is_cancelled() {
        return Err(UserError::Cancelled);
    }
    Ok(())
}

fn collides(existing: &User, username: &str, email: &str, exclude_id: Option<Uuid>) -> bool {
    Some(existing.id()) != exclude_id
        && (existing.username() == username || existing.email() == email)
}

/// In-memory implementation of UserRepository (for development/testing).
///
/// Mirrors the storage unique constraints on username and email.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_by_id(
        &self,
        id: Uuid,
        cancel: &CancellationToken,
    ) -> UserResult<Option<User>> {
        ensure_live(cancel)?;
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_by_username(
        &self,
        username: &str,
        cancel: &CancellationToken,
    ) -> UserResult<Option<User>> {
        ensure_live(cancel)?;
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username() == username).cloned())
    }

    async fn get_by_email(
        &self,
        email: &str,
        cancel: &CancellationToken,
    ) -> UserResult<Option<User>> {
        ensure_live(cancel)?;
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email() == email).cloned())
    }

    async fn get_paged(
        &self,
        page_number: u64,
        page_size: u64,
        cancel: &CancellationToken,
    ) -> UserResult<Vec<User>> {
        ensure_live(cancel)?;
        let users = self.users.read().await;

        let mut ordered: Vec<&User> = users.values().collect();
        ordered.sort_by_key(|u| (u.created_at(), u.id()));

        let offset = page_number.saturating_sub(1).saturating_mul(page_size);
        Ok(ordered
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(page_size).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn exists(
        &self,
        username: &str,
        email: &str,
        exclude_id: Option<Uuid>,
        cancel: &CancellationToken,
    ) -> UserResult<bool> {
        ensure_live(cancel)?;
        let users = self.users.read().await;
        Ok(users
            .values()
            .any(|u| collides(u, username, email, exclude_id)))
    }

    async fn add(&self, user: &User, cancel: &CancellationToken) -> UserResult<()> {
        ensure_live(cancel)?;
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|u| collides(u, user.username(), user.email(), None))
        {
            return Err(UserError::DuplicateUser);
        }

        users.insert(user.id(), user.clone());
        tracing::info!(user_id = %user.id(), "Created user");
        Ok(())
    }

    async fn update(&self, user: &User, cancel: &CancellationToken) -> UserResult<()> {
        ensure_live(cancel)?;
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id()) {
            return Err(UserError::NotFound(user.id()));
        }
        if users
            .values()
            .any(|u| collides(u, user.username(), user.email(), Some(user.id())))
        {
            return Err(UserError::DuplicateUser);
        }

        users.insert(user.id(), user.clone());
        tracing::info!(user_id = %user.id(), "Updated user");
        Ok(())
    }

    async fn delete(&self, id: Uuid, cancel: &CancellationToken) -> UserResult<()> {
        ensure_live(cancel)?;
        let mut users = self.users.write().await;

        if users.remove(&id).is_none() {
            return Err(UserError::NotFound(id));
        }

        tracing::info!(user_id = %id, "Deleted user");
        Ok(())
    }

    async fn total_count(&self, cancel: &CancellationToken) -> UserResult<u64> {
        ensure_live(cancel)?;
        let users = self.users.read().await;
        Ok(users.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn user(name: &str) -> User {
        User::create(name, format!("{}@example.com", name), "hash", Role::User).unwrap()
    }

    #[tokio::test]
    async fn test_add_and_lookup() {
        let repo = InMemoryUserRepository::new();
        let cancel = CancellationToken::new();
        let alice = user("alice");

        repo.add(&alice, &cancel).await.unwrap();

        let by_id = repo.get_by_id(alice.id(), &cancel).await.unwrap().unwrap();
        assert_eq!(by_id, alice);

        let by_name = repo.get_by_username("alice", &cancel).await.unwrap();
        assert!(by_name.is_some());
        assert!(repo.get_by_username("Alice", &cancel).await.unwrap().is_none());

        let by_email = repo.get_by_email("alice@example.com", &cancel).await.unwrap();
        assert_eq!(by_email.unwrap().id(), alice.id());
    }

    #[tokio::test]
    async fn test_exists_with_and_without_exclusion() {
        let repo = InMemoryUserRepository::new();
        let cancel = CancellationToken::new();
        let alice = user("alice");
        repo.add(&alice, &cancel).await.unwrap();

        assert!(repo.exists("alice", "other@example.com", None, &cancel).await.unwrap());
        assert!(repo.exists("other", "alice@example.com", None, &cancel).await.unwrap());
        assert!(!repo.exists("other", "other@example.com", None, &cancel).await.unwrap());
        assert!(
            !repo
                .exists("alice", "alice@example.com", Some(alice.id()), &cancel)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_add_rejects_duplicates() {
        let repo = InMemoryUserRepository::new();
        let cancel = CancellationToken::new();
        repo.add(&user("alice"), &cancel).await.unwrap();

        let clash =
            User::create("alice", "fresh@example.com", "hash", Role::User).unwrap();
        let result = repo.add(&clash, &cancel).await;

        assert!(matches!(result, Err(UserError::DuplicateUser)));
        assert_eq!(repo.total_count(&cancel).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_are_not_found() {
        let repo = InMemoryUserRepository::new();
        let cancel = CancellationToken::new();
        let ghost = user("ghost");

        let update = repo.update(&ghost, &cancel).await;
        assert!(matches!(update, Err(UserError::NotFound(id)) if id == ghost.id()));

        let delete = repo.delete(ghost.id(), &cancel).await;
        assert!(matches!(delete, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_user() {
        let repo = InMemoryUserRepository::new();
        let cancel = CancellationToken::new();
        let alice = user("alice");
        repo.add(&alice, &cancel).await.unwrap();

        repo.delete(alice.id(), &cancel).await.unwrap();

        assert!(repo.get_by_id(alice.id(), &cancel).await.unwrap().is_none());
        assert_eq!(repo.total_count(&cancel).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_paging_is_ordered_by_creation() {
        let repo = InMemoryUserRepository::new();
        let cancel = CancellationToken::new();

        let mut created = Vec::new();
        for i in 0..25 {
            let u = user(&format!("user_{:02}", i));
            repo.add(&u, &cancel).await.unwrap();
            created.push(u.id());
        }

        let page = repo.get_paged(2, 10, &cancel).await.unwrap();
        let ids: Vec<Uuid> = page.iter().map(User::id).collect();
        assert_eq!(ids, created[10..20]);

        let last = repo.get_paged(3, 10, &cancel).await.unwrap();
        assert_eq!(last.len(), 5);

        assert!(repo.get_paged(4, 10, &cancel).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_token_short_circuits() {
        let repo = InMemoryUserRepository::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = repo.add(&user("alice"), &cancel).await;
        assert!(matches!(result, Err(UserError::Cancelled)));

        let live = CancellationToken::new();
        assert_eq!(repo.total_count(&live).await.unwrap(), 0);
    }
}
