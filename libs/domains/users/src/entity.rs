use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::{Role, User};

/// Sea-ORM entity for the `users` table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// OpenAPI tag for the user routes
    pub const TAG: &'static str = "users";
    /// Mount point below `/api`
    pub const URL: &'static str = "/users";
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        User::restore(
            model.id,
            model.username,
            model.email,
            model.password_hash,
            model.role,
            model.is_active,
            model.created_at.into(),
            model.updated_at.map(Into::into),
        )
    }
}

impl From<&User> for ActiveModel {
    fn from(user: &User) -> Self {
        ActiveModel {
            id: Set(user.id()),
            username: Set(user.username().to_string()),
            email: Set(user.email().to_string()),
            password_hash: Set(user.password_hash().to_string()),
            role: Set(user.role()),
            is_active: Set(user.is_active()),
            created_at: Set(user.created_at().into()),
            updated_at: Set(user.updated_at().map(Into::into)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_round_trip_preserves_fields() {
        let mut user = User::create("carol", "carol@example.com", "hash", Role::Admin).unwrap();
        user.deactivate();

        let active: ActiveModel = (&user).into();
        let model = Model {
            id: active.id.unwrap(),
            username: active.username.unwrap(),
            email: active.email.unwrap(),
            password_hash: active.password_hash.unwrap(),
            role: active.role.unwrap(),
            is_active: active.is_active.unwrap(),
            created_at: active.created_at.unwrap(),
            updated_at: active.updated_at.unwrap(),
        };

        assert_eq!(User::from(model), user);
    }
}
