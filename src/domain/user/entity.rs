//! User entity and related types

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// User identifier, assigned by durable storage on creation.
///
/// Storage starts numbering at 1, so 0 can never name a persisted user and
/// is rejected at construction. Absence is expressed with `Option<User>`,
/// never a sentinel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct UserId(u64);

impl UserId {
    /// Create a new UserId after validation
    pub fn new(id: u64) -> Result<Self, DomainError> {
        if id == 0 {
            return Err(DomainError::invalid_id(
                "user id 0 is reserved and never assigned by storage",
            ));
        }
        Ok(Self(id))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// The cache key for this user: the decimal rendering of the id.
    pub fn cache_key(&self) -> String {
        self.0.to_string()
    }
}

impl TryFrom<u64> for UserId {
    type Error = DomainError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for u64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User entity
///
/// The credential is held only as an argon2 hash and is excluded from
/// serialization, so it never reaches the cache or an HTTP response in
/// recoverable form. Entries decoded from the cache carry an empty hash;
/// nothing on the read path needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    #[serde(skip_serializing, default)]
    password_hash: String,
}

impl User {
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

/// A user that has not been persisted yet; storage assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Field-wise patch for an existing user. `None` leaves the stored value
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password_hash.is_none()
    }
}
