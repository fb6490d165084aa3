/// User and role models
///
/// Users own a many-to-many set of roles via the `user_roles` association
/// table. Roles are never maintained as live back-references; they are
/// fetched explicitly per query.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id SERIAL PRIMARY KEY,
///     email TEXT NOT NULL UNIQUE,
///     password_hash TEXT NOT NULL,
///     name TEXT
/// );
///
/// CREATE TABLE roles (
///     id SERIAL PRIMARY KEY,
///     name VARCHAR(50) NOT NULL UNIQUE
/// );
///
/// CREATE TABLE user_roles (
///     user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role_id INTEGER NOT NULL REFERENCES roles(id) ON DELETE CASCADE,
///     PRIMARY KEY (user_id, role_id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use metrica_shared::models::user::{CreateUser, User};
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create_with_roles(&pool, CreateUser {
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     name: Some("Ana".to_string()),
///     role_ids: vec![1, 2],
/// }).await?;
///
/// assert_eq!(user.roles.len(), 2);
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;

/// User model representing a user account
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: i32,

    /// Email address, unique across all users
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Optional display name
    pub name: Option<String>,
}

/// Role model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Role {
    /// Unique role ID
    pub id: i32,

    /// Unique role name
    pub name: String,
}

/// A user together with their eagerly-resolved roles
#[derive(Debug, Clone, Serialize)]
pub struct UserWithRoles {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub roles: Vec<Role>,
}

impl UserWithRoles {
    fn from_parts(user: User, roles: Vec<Role>) -> Self {
        Self {
            id: user.id,
            email: user.email,
            password_hash: user.password_hash,
            name: user.name,
            roles,
        }
    }
}

/// Input for creating a new user
///
/// `password_hash` is the already-hashed password; plaintext never
/// reaches this layer.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,

    /// Role ids to associate. Not checked for existence here; an unknown
    /// id violates the foreign key and aborts the whole transaction.
    pub role_ids: Vec<i32>,
}

impl User {
    /// Lists all users with their roles, in insertion order
    ///
    /// Roles are resolved with a second query over the association table
    /// rather than a per-user N+1.
    pub async fn list_with_roles(pool: &PgPool) -> Result<Vec<UserWithRoles>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await?;

        let assignments = sqlx::query_as::<_, (i32, i32, String)>(
            r#"
            SELECT ur.user_id, r.id, r.name
            FROM user_roles ur
            JOIN roles r ON r.id = ur.role_id
            ORDER BY ur.user_id, r.id
            "#,
        )
        .fetch_all(pool)
        .await?;

        let mut roles_by_user: HashMap<i32, Vec<Role>> = HashMap::new();
        for (user_id, id, name) in assignments {
            roles_by_user
                .entry(user_id)
                .or_default()
                .push(Role { id, name });
        }

        Ok(users
            .into_iter()
            .map(|user| {
                let roles = roles_by_user.remove(&user.id).unwrap_or_default();
                UserWithRoles::from_parts(user, roles)
            })
            .collect())
    }

    /// Creates a user and their role associations in one transaction
    ///
    /// Either the user row and every association row commit, or none do.
    /// A duplicate email surfaces as a unique-constraint violation and a
    /// role id with no matching role as a foreign-key violation; both
    /// abort the transaction.
    pub async fn create_with_roles(
        pool: &PgPool,
        data: CreateUser,
    ) -> Result<UserWithRoles, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, name)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, name
            "#,
        )
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.name)
        .fetch_one(&mut *tx)
        .await?;

        if !data.role_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO user_roles (user_id, role_id)
                SELECT $1, role_id FROM UNNEST($2::int4[]) AS t(role_id)
                "#,
            )
            .bind(user.id)
            .bind(&data.role_ids)
            .execute(&mut *tx)
            .await?;
        }

        let roles = sqlx::query_as::<_, Role>(
            r#"
            SELECT r.id, r.name
            FROM roles r
            JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
            ORDER BY r.id
            "#,
        )
        .bind(user.id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(UserWithRoles::from_parts(user, roles))
    }

    /// Finds a user by email address
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Deletes a user by id, returning the deleted row
    ///
    /// Dependent productivity, sales, report, task-log, and role
    /// association rows are removed by the schema's ON DELETE CASCADE.
    /// Returns `None` if no such user exists.
    pub async fn delete(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            DELETE FROM users
            WHERE id = $1
            RETURNING id, email, password_hash, name
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}

impl Role {
    /// Creates a role with a unique name
    pub async fn create(pool: &PgPool, name: &str) -> Result<Self, sqlx::Error> {
        let role = sqlx::query_as::<_, Role>(
            r#"
            INSERT INTO roles (name)
            VALUES ($1)
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(pool)
        .await?;

        Ok(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_with_roles_from_parts() {
        let user = User {
            id: 7,
            email: "test@example.com".to_string(),
            password_hash: "hash".to_string(),
            name: None,
        };

        let with_roles = UserWithRoles::from_parts(
            user,
            vec![Role {
                id: 1,
                name: "admin".to_string(),
            }],
        );

        assert_eq!(with_roles.id, 7);
        assert_eq!(with_roles.roles.len(), 1);
        assert_eq!(with_roles.roles[0].name, "admin");
    }

    #[test]
    fn test_user_with_roles_serializes_role_list() {
        let user = User {
            id: 1,
            email: "a@b.c".to_string(),
            password_hash: "h".to_string(),
            name: Some("Ana".to_string()),
        };
        let with_roles = UserWithRoles::from_parts(user, vec![]);

        let json = serde_json::to_value(&with_roles).unwrap();
        assert_eq!(json["email"], "a@b.c");
        assert!(json["roles"].as_array().unwrap().is_empty());
    }

    // Integration tests for database operations are in metrica-api/tests
}
