use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter, Iterable};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{UserError, UserResult};

/// Account role, stored as an integer column
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    #[sea_orm(num_value = 1)]
    Admin,
    #[default]
    #[sea_orm(num_value = 2)]
    User,
}

impl Role {
    /// Every role, in declaration order
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }
}

/// The user account aggregate.
///
/// Fields are private so every mutation goes through an operation that keeps
/// the required fields non-blank and stamps `updated_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    role: Role,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

fn require(field: &str, value: &str) -> UserResult<()> {
    if value.trim().is_empty() {
        return Err(UserError::InvalidArgument(format!("{} must not be empty", field)));
    }
    Ok(())
}

impl User {
    /// Build a new, active account with a fresh identifier.
    pub fn create(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: Role,
    ) -> UserResult<Self> {
        let (username, email, password_hash) =
            (username.into(), email.into(), password_hash.into());
        require("username", &username)?;
        require("email", &email)?;
        require("password_hash", &password_hash)?;

        Ok(Self {
            id: Uuid::now_v7(),
            username,
            email,
            password_hash,
            role,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    /// Rehydrate a persisted row. No invariant checks: storage is trusted.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        id: Uuid,
        username: String,
        email: String,
        password_hash: String,
        role: Role,
        is_active: bool,
        created_at: DateTime<Utc>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            username,
            email,
            password_hash,
            role,
            is_active,
            created_at,
            updated_at,
        }
    }

    pub fn update_profile(
        &mut self,
        username: impl Into<String>,
        email: impl Into<String>,
        role: Role,
        is_active: bool,
    ) -> UserResult<()> {
        let (username, email) = (username.into(), email.into());
        require("username", &username)?;
        require("email", &email)?;

        self.username = username;
        self.email = email;
        self.role = role;
        self.is_active = is_active;
        self.touch();
        Ok(())
    }

    pub fn change_password(&mut self, password_hash: impl Into<String>) -> UserResult<()> {
        let password_hash = password_hash.into();
        require("password_hash", &password_hash)?;

        self.password_hash = password_hash;
        self.touch();
        Ok(())
    }

    /// Returns `false` when the account was already active.
    pub fn activate(&mut self) -> bool {
        if self.is_active {
            return false;
        }
        self.is_active = true;
        self.touch();
        true
    }

    /// Returns `false` when the account was already inactive.
    pub fn deactivate(&mut self) -> bool {
        if !self.is_active {
            return false;
        }
        self.is_active = false;
        self.touch();
        true
    }

    // Clock skew must never produce updated_at < created_at
    fn touch(&mut self) {
        self.updated_at = Some(Utc::now().max(self.created_at));
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub(crate) fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// Public projection of a user (never carries the password hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Body returned by the create endpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    pub id: Uuid,
}

/// One page of results plus the totals needed to render a pager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page_number: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total_count: u64, page_number: u64, page_size: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total_count.div_ceil(page_size)
        };

        Self {
            items,
            total_count,
            page_number,
            page_size,
            total_pages,
        }
    }

    /// An empty page, used when the backing store could not be reached
    pub fn empty(page_number: u64, page_size: u64) -> Self {
        Self::new(Vec::new(), 0, page_number, page_size)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_number: self.page_number,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }
}
