use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, SqlErr,
};
use std::future::Future;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    entity,
    error::{UserError, UserResult},
    models::User,
    repository::UserRepository,
};

pub struct PgUserRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

/// Unique violations surface as `DuplicateUser`: the existence check that
/// precedes every write is not atomic with it.
fn map_db_err(err: DbErr) -> UserError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
        tracing::info!(detail = %detail, "Unique constraint rejected user write");
        return UserError::DuplicateUser;
    }
    UserError::Database(err)
}

/// Race a query against the caller's token; dropping the query future
/// returns its pooled connection.
async fn cancellable<T>(
    cancel: &CancellationToken,
    query: impl Future<Output = Result<T, DbErr>>,
) -> UserResult<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::debug!("User query cancelled");
            Err(UserError::Cancelled)
        }
        result = query => result.map_err(map_db_err),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get_by_id(
        &self,
        id: Uuid,
        cancel: &CancellationToken,
    ) -> UserResult<Option<User>> {
        let model = cancellable(cancel, self.base.find_by_id(id)).await?;
        Ok(model.map(Into::into))
    }

    async fn get_by_username(
        &self,
        username: &str,
        cancel: &CancellationToken,
    ) -> UserResult<Option<User>> {
        let query = entity::Entity::find()
            .filter(entity::Column::Username.eq(username))
            .one(self.base.db());

        Ok(cancellable(cancel, query).await?.map(Into::into))
    }

    async fn get_by_email(
        &self,
        email: &str,
        cancel: &CancellationToken,
    ) -> UserResult<Option<User>> {
        let query = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .one(self.base.db());

        Ok(cancellable(cancel, query).await?.map(Into::into))
    }

    async fn get_paged(
        &self,
        page_number: u64,
        page_size: u64,
        cancel: &CancellationToken,
    ) -> UserResult<Vec<User>> {
        // Offsets are bound as BIGINT; anything past i64::MAX lies beyond every row
        let Some(offset) = page_number
            .saturating_sub(1)
            .checked_mul(page_size)
            .filter(|offset| i64::try_from(*offset).is_ok())
        else {
            return Ok(Vec::new());
        };
        let limit = page_size.min(i64::MAX as u64);

        let query = entity::Entity::find()
            .order_by_asc(entity::Column::CreatedAt)
            .order_by_asc(entity::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.base.db());

        let models = cancellable(cancel, query).await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn exists(
        &self,
        username: &str,
        email: &str,
        exclude_id: Option<Uuid>,
        cancel: &CancellationToken,
    ) -> UserResult<bool> {
        let mut query = entity::Entity::find().filter(
            Condition::any()
                .add(entity::Column::Username.eq(username))
                .add(entity::Column::Email.eq(email)),
        );

        if let Some(id) = exclude_id {
            query = query.filter(entity::Column::Id.ne(id));
        }

        let found = cancellable(cancel, query.one(self.base.db())).await?;
        Ok(found.is_some())
    }

    async fn add(&self, user: &User, cancel: &CancellationToken) -> UserResult<()> {
        let model = cancellable(cancel, self.base.insert(user.into())).await?;

        tracing::info!(user_id = %model.id, "Created user");
        Ok(())
    }

    async fn update(&self, user: &User, cancel: &CancellationToken) -> UserResult<()> {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(UserError::Cancelled),
            result = self.base.update(user.into()) => result,
        };

        match result {
            Ok(_) => {
                tracing::info!(user_id = %user.id(), "Updated user");
                Ok(())
            }
            Err(DbErr::RecordNotUpdated) => Err(UserError::NotFound(user.id())),
            Err(e) => Err(map_db_err(e)),
        }
    }

    async fn delete(&self, id: Uuid, cancel: &CancellationToken) -> UserResult<()> {
        let rows_affected = cancellable(cancel, self.base.delete_by_id(id)).await?;

        if rows_affected == 0 {
            return Err(UserError::NotFound(id));
        }

        tracing::info!(user_id = %id, "Deleted user");
        Ok(())
    }

    async fn total_count(&self, cancel: &CancellationToken) -> UserResult<u64> {
        cancellable(cancel, self.base.count()).await
    }
}
