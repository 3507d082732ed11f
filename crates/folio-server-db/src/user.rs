// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User repository for database operations.
//!
//! Credentials are stored as an opaque hash column that this crate never
//! interprets. Deleting a user cascades to the wikis they authored and to every
//! collaborator row that references them.

use async_trait::async_trait;
use chrono::Utc;
use folio_server_auth::{user::normalize_email, Role, User, UserId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::{map_unique_violation, DbError};
use crate::rows::{parse_id, parse_timestamp};

#[async_trait]
pub trait UserStore: Send + Sync {
	async fn create_user(&self, user: &User, password_hash: Option<&str>) -> Result<(), DbError>;
	async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError>;
	async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError>;
	async fn list_users(&self) -> Result<Vec<User>, DbError>;
	async fn update_role(&self, id: &UserId, role: Role) -> Result<bool, DbError>;
	async fn delete_user(&self, id: &UserId) -> Result<bool, DbError>;
	async fn find_missing_users(&self, ids: &[UserId]) -> Result<Vec<UserId>, DbError>;
}

/// Repository for user database operations.
#[derive(Clone)]
pub struct UserRepository {
	pool: SqlitePool,
}

impl UserRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a new user.
	///
	/// # Errors
	/// Returns `DbError::Conflict` if the email is already registered.
	#[tracing::instrument(skip(self, user, password_hash), fields(user_id = %user.id, role = %user.role))]
	pub async fn create_user(&self, user: &User, password_hash: Option<&str>) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO users (id, email, password_hash, role, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(user.id.to_string())
		.bind(&user.email)
		.bind(password_hash)
		.bind(user.role.as_str())
		.bind(user.created_at.to_rfc3339())
		.bind(user.updated_at.to_rfc3339())
		.execute(&self.pool)
		.await
		.map_err(|e| map_unique_violation(e, "email already registered"))?;

		tracing::debug!(user_id = %user.id, "user created");
		Ok(())
	}

	/// Get a user by ID.
	///
	/// # Errors
	/// Returns `DbError::InvalidRole` if the stored role is not recognized.
	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, email, role, created_at, updated_at
			FROM users
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_user(&r)).transpose()
	}

	/// Get a user by email. Matching is case-insensitive.
	#[tracing::instrument(skip(self, email))]
	pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, email, role, created_at, updated_at
			FROM users
			WHERE email = ?
			"#,
		)
		.bind(normalize_email(email))
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_user(&r)).transpose()
	}

	/// List all users in insertion order.
	#[tracing::instrument(skip(self))]
	pub async fn list_users(&self) -> Result<Vec<User>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, email, role, created_at, updated_at
			FROM users
			ORDER BY rowid ASC
			"#,
		)
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_user).collect()
	}

	/// Set a user's role.
	///
	/// # Returns
	/// `false` if no user exists with this ID.
	#[tracing::instrument(skip(self), fields(user_id = %id, role = %role))]
	pub async fn update_role(&self, id: &UserId, role: Role) -> Result<bool, DbError> {
		let result = sqlx::query("UPDATE users SET role = ?, updated_at = ? WHERE id = ?")
			.bind(role.as_str())
			.bind(Utc::now().to_rfc3339())
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}

	/// Delete a user together with their wikis.
	///
	/// # Returns
	/// `false` if no user exists with this ID.
	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn delete_user(&self, id: &UserId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM users WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		let deleted = result.rows_affected() > 0;
		if deleted {
			tracing::info!(user_id = %id, "user deleted");
		}
		Ok(deleted)
	}

	/// Returns the subset of `ids` with no matching user, in input order.
	#[tracing::instrument(skip(self, ids), fields(count = ids.len()))]
	pub async fn find_missing_users(&self, ids: &[UserId]) -> Result<Vec<UserId>, DbError> {
		let mut missing = Vec::new();
		for id in ids {
			let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE id = ?")
				.bind(id.to_string())
				.fetch_optional(&self.pool)
				.await?;
			if exists.is_none() {
				missing.push(*id);
			}
		}
		Ok(missing)
	}
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User, DbError> {
	let id: UserId = parse_id(&row.get::<String, _>("id"), "user")?;
	let role_str: String = row.get("role");
	let role = role_str
		.parse::<Role>()
		.map_err(|_| DbError::InvalidRole {
			user_id: id,
			value: role_str.clone(),
		})?;

	Ok(User {
		id,
		email: row.get("email"),
		role,
		created_at: parse_timestamp(&row.get::<String, _>("created_at"), "created_at")?,
		updated_at: parse_timestamp(&row.get::<String, _>("updated_at"), "updated_at")?,
	})
}

#[async_trait]
impl UserStore for UserRepository {
	async fn create_user(&self, user: &User, password_hash: Option<&str>) -> Result<(), DbError> {
		self.create_user(user, password_hash).await
	}

	async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError> {
		self.get_user_by_id(id).await
	}

	async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
		self.get_user_by_email(email).await
	}

	async fn list_users(&self) -> Result<Vec<User>, DbError> {
		self.list_users().await
	}

	async fn update_role(&self, id: &UserId, role: Role) -> Result<bool, DbError> {
		self.update_role(id, role).await
	}

	async fn delete_user(&self, id: &UserId) -> Result<bool, DbError> {
		self.delete_user(id).await
	}

	async fn find_missing_users(&self, ids: &[UserId]) -> Result<Vec<UserId>, DbError> {
		self.find_missing_users(ids).await
	}
}
