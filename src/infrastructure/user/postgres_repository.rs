//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::user::{NewUser, User, UserId, UserPatch, UserRepository};
use crate::domain::DomainError;

/// PostgreSQL implementation of [`UserRepository`]
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_sqlx_error(operation: &str, e: sqlx::Error) -> DomainError {
    match e {
        sqlx::Error::PoolTimedOut => {
            DomainError::canceled(format!("{} timed out waiting for a connection", operation))
        }
        e => {
            let msg = e.to_string();
            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!("{}: email already exists", operation))
            } else {
                DomainError::storage(format!("{}: {}", operation, e))
            }
        }
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let id: i64 = row.get("id");
    let name: String = row.get("name");
    let email: String = row.get("email");
    let password_hash: String = row.get("password_hash");

    let user_id = UserId::new(id as u64)
        .map_err(|e| DomainError::storage(format!("invalid user id in database: {}", e)))?;

    Ok(User::new(user_id, name, email, password_hash))
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_u64() as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(&format!("failed to read user {}", id), e))?;

        match row {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("failed to create user", e))?;

        let id: i64 = row.get("id");
        let user_id = UserId::new(id as u64)
            .map_err(|e| DomainError::storage(format!("invalid generated user id: {}", e)))?;

        Ok(User::new(user_id, user.name, user.email, user.password_hash))
    }

    async fn update(&self, id: UserId, patch: &UserPatch) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash)
            WHERE id = $1
            "#,
        )
        .bind(id.as_u64() as i64)
        .bind(patch.name.as_deref())
        .bind(patch.email.as_deref())
        .bind(patch.password_hash.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(&format!("failed to update user {}", id), e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_u64() as i64)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(&format!("failed to delete user {}", id), e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, password_hash
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("failed to list users", e))?;

        let mut users = Vec::with_capacity(rows.len());

        for row in rows {
            users.push(row_to_user(&row)?);
        }

        Ok(users)
    }
}
