//! Request and response types for the HTTP layer

pub mod error;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType};

use serde::{Deserialize, Serialize};

use crate::domain::User;

/// User representation returned by the API. The credential is never
/// included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: u64,
    pub name: String,
    pub email: String,
}

impl UserResponse {
    pub fn from_domain(user: &User) -> Self {
        Self {
            id: user.id().as_u64(),
            name: user.name().to_string(),
            email: user.email().to_string(),
        }
    }
}

/// Body for POST /v1/users
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserBody {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Body for PUT /v1/users/{id}; omitted fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}
