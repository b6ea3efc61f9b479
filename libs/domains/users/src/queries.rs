use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy)]
pub struct GetUserQuery {
    pub id: Uuid,
}

#[derive(Debug, Clone)]
pub struct GetUserByUsernameQuery {
    pub username: String,
}

/// Paging parameters for the user list
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// 1-based page index
    #[serde(default = "default_page_number")]
    #[validate(range(min = 1, max = 1000000, message = "Page number must be between 1 and 1000000"))]
    #[param(default = 1, minimum = 1, maximum = 1000000)]
    pub page_number: u64,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    #[param(default = 10, minimum = 1, maximum = 100)]
    pub page_size: u64,
}

fn default_page_number() -> u64 {
    1
}

fn default_page_size() -> u64 {
    10
}

impl Default for ListUsersQuery {
    fn default() -> Self {
        Self {
            page_number: default_page_number(),
            page_size: default_page_size(),
        }
    }
}

impl ListUsersQuery {
    pub fn new(page_number: u64, page_size: u64) -> Self {
        Self {
            page_number,
            page_size,
        }
    }
}
