//! # User Repository
//!
//! Accounts used by the authentication layer. Passwords arrive here already
//! hashed; this module never sees plaintext.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use pharmacy_core::{Role, User};

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a new user.
    ///
    /// ## Errors
    /// * `UniqueViolation { field: "users.username" | "users.email" }` - Taken
    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> DbResult<User> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(id = %id, username = %username, "Inserting user");

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash, role, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            RETURNING id, username, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(&id)
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } if field.ends_with("username") => {
                DbError::duplicate("username", username)
            }
            DbError::UniqueViolation { field, .. } if field.ends_with("email") => {
                DbError::duplicate("email", email)
            }
            other => other,
        })?;

        info!(id = %user.id, username = %user.username, role = %user.role, "User registered");
        Ok(user)
    }

    /// Looks a user up by login name.
    pub async fn find_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by ID, failing with `NotFound` when absent.
    pub async fn get_by_id(&self, id: &str) -> DbResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("User", id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{memory_db, user};

    #[tokio::test]
    async fn test_create_and_lookup() {
        let db = memory_db().await;
        let created = user(&db, "ana").await;

        assert_eq!(created.role, Role::User);

        let by_name = db.users().find_by_username("ana").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);
        assert_eq!(by_name.password_hash, created.password_hash);

        let by_id = db.users().get_by_id(&created.id).await.unwrap();
        assert_eq!(by_id.email, "ana@pharmacy.test");

        assert!(db.users().find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_admin_role_round_trips() {
        let db = memory_db().await;
        let admin = db
            .users()
            .create("root", "root@pharmacy.test", "hash", Role::Admin)
            .await
            .unwrap();

        let fetched = db.users().get_by_id(&admin.id).await.unwrap();
        assert_eq!(fetched.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_duplicate_username_and_email() {
        let db = memory_db().await;
        user(&db, "ana").await;

        let dup_name = db
            .users()
            .create("ana", "other@pharmacy.test", "hash", Role::User)
            .await;
        assert!(matches!(
            dup_name,
            Err(DbError::UniqueViolation { ref field, .. }) if field == "username"
        ));

        let dup_email = db
            .users()
            .create("ana2", "ana@pharmacy.test", "hash", Role::User)
            .await;
        assert!(matches!(
            dup_email,
            Err(DbError::UniqueViolation { ref field, .. }) if field == "email"
        ));
    }
}
