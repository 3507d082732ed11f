// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wiki repository for database operations.
//!
//! Wikis are always read together with their collaborator ids so that the
//! policy engine evaluates a consistent snapshot. Reads and writes that touch
//! both the wiki row and its collaborator rows run in one transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use folio_server_auth::{Collaborator, UserId, Wiki, WikiId, WikiWithCollaborators};
use sqlx::{sqlite::SqlitePool, Row, Sqlite, SqliteConnection, Transaction};

use crate::error::{map_unique_violation, DbError};
use crate::rows::{parse_id, parse_timestamp};

#[async_trait]
pub trait WikiStore: Send + Sync {
	async fn create_wiki(&self, wiki: &Wiki, collaborators: &[UserId]) -> Result<(), DbError>;
	async fn get_wiki(&self, id: &WikiId) -> Result<Option<WikiWithCollaborators>, DbError>;
	async fn list_wikis(&self) -> Result<Vec<WikiWithCollaborators>, DbError>;
	async fn update_wiki(
		&self,
		wiki: &Wiki,
		collaborators: Option<&[UserId]>,
	) -> Result<bool, DbError>;
	async fn delete_wiki(&self, id: &WikiId) -> Result<bool, DbError>;
	async fn list_collaborators(&self, wiki_id: &WikiId) -> Result<Vec<UserId>, DbError>;
	async fn is_collaborator(&self, wiki_id: &WikiId, user_id: &UserId) -> Result<bool, DbError>;
	async fn count_wikis_for_user(&self, user_id: &UserId) -> Result<i64, DbError>;
}

/// Repository for wiki and collaborator database operations.
#[derive(Clone)]
pub struct WikiRepository {
	pool: SqlitePool,
}

impl WikiRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a wiki and its collaborator rows atomically.
	///
	/// # Errors
	/// Returns `DbError::Conflict` if `collaborators` repeats a user, and
	/// `DbError::Sqlx` if the author or a collaborator does not exist.
	#[tracing::instrument(skip(self, wiki, collaborators), fields(wiki_id = %wiki.id, private = wiki.private, collaborators = collaborators.len()))]
	pub async fn create_wiki(&self, wiki: &Wiki, collaborators: &[UserId]) -> Result<(), DbError> {
		let mut tx = self.pool.begin().await?;

		sqlx::query(
			r#"
			INSERT INTO wikis (id, title, body, private, user_id, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(wiki.id.to_string())
		.bind(&wiki.title)
		.bind(&wiki.body)
		.bind(wiki.private as i32)
		.bind(wiki.user_id.to_string())
		.bind(wiki.created_at.to_rfc3339())
		.bind(wiki.updated_at.to_rfc3339())
		.execute(&mut *tx)
		.await?;

		insert_collaborators(&mut tx, &wiki.id, collaborators).await?;

		tx.commit().await?;
		tracing::debug!(wiki_id = %wiki.id, "wiki created");
		Ok(())
	}

	/// Get a wiki with its collaborator ids, both read in one transaction.
	#[tracing::instrument(skip(self), fields(wiki_id = %id))]
	pub async fn get_wiki(&self, id: &WikiId) -> Result<Option<WikiWithCollaborators>, DbError> {
		let mut tx = self.pool.begin().await?;

		let row = sqlx::query(
			r#"
			SELECT id, title, body, private, user_id, created_at, updated_at
			FROM wikis
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&mut *tx)
		.await?;

		let Some(row) = row else {
			return Ok(None);
		};

		let wiki = row_to_wiki(&row)?;
		let collaborators = fetch_collaborators(&mut tx, &wiki.id).await?;
		tx.commit().await?;

		Ok(Some(WikiWithCollaborators::new(wiki, collaborators)))
	}

	/// List every wiki in insertion order, each with its collaborator ids.
	///
	/// Collaborators are loaded with a single query and grouped in memory. Both
	/// queries share a read transaction.
	#[tracing::instrument(skip(self))]
	pub async fn list_wikis(&self) -> Result<Vec<WikiWithCollaborators>, DbError> {
		let mut tx = self.pool.begin().await?;

		let rows = sqlx::query(
			r#"
			SELECT id, title, body, private, user_id, created_at, updated_at
			FROM wikis
			ORDER BY rowid ASC
			"#,
		)
		.fetch_all(&mut *tx)
		.await?;

		let collaborator_rows = sqlx::query(
			r#"
			SELECT wiki_id, user_id
			FROM collaborators
			ORDER BY rowid ASC
			"#,
		)
		.fetch_all(&mut *tx)
		.await?;

		tx.commit().await?;

		let mut grouped: HashMap<WikiId, Vec<UserId>> = HashMap::new();
		for row in &collaborator_rows {
			let wiki_id: WikiId = parse_id(&row.get::<String, _>("wiki_id"), "wiki")?;
			let user_id: UserId = parse_id(&row.get::<String, _>("user_id"), "user")?;
			grouped.entry(wiki_id).or_default().push(user_id);
		}

		let wikis = rows
			.iter()
			.map(|row| {
				let wiki = row_to_wiki(row)?;
				let collaborators = grouped.remove(&wiki.id).unwrap_or_default();
				Ok(WikiWithCollaborators::new(wiki, collaborators))
			})
			.collect::<Result<Vec<_>, DbError>>()?;

		tracing::debug!(count = wikis.len(), "listed wikis");
		Ok(wikis)
	}

	/// Persist a wiki's title, body and privacy flag.
	///
	/// When `collaborators` is `Some`, the stored set is replaced wholesale in
	/// the same transaction. `None` leaves it untouched.
	///
	/// # Returns
	/// `false` if no wiki exists with this ID.
	#[tracing::instrument(skip(self, wiki, collaborators), fields(wiki_id = %wiki.id, private = wiki.private, replace_collaborators = collaborators.is_some()))]
	pub async fn update_wiki(
		&self,
		wiki: &Wiki,
		collaborators: Option<&[UserId]>,
	) -> Result<bool, DbError> {
		let mut tx = self.pool.begin().await?;

		let result = sqlx::query(
			r#"
			UPDATE wikis
			SET title = ?, body = ?, private = ?, updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(&wiki.title)
		.bind(&wiki.body)
		.bind(wiki.private as i32)
		.bind(wiki.updated_at.to_rfc3339())
		.bind(wiki.id.to_string())
		.execute(&mut *tx)
		.await?;

		if result.rows_affected() == 0 {
			return Ok(false);
		}

		if let Some(collaborators) = collaborators {
			sqlx::query("DELETE FROM collaborators WHERE wiki_id = ?")
				.bind(wiki.id.to_string())
				.execute(&mut *tx)
				.await?;
			insert_collaborators(&mut tx, &wiki.id, collaborators).await?;
		}

		tx.commit().await?;
		tracing::debug!(wiki_id = %wiki.id, "wiki updated");
		Ok(true)
	}

	/// Delete a wiki. Its collaborator rows go with it.
	///
	/// # Returns
	/// `false` if no wiki exists with this ID.
	#[tracing::instrument(skip(self), fields(wiki_id = %id))]
	pub async fn delete_wiki(&self, id: &WikiId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM wikis WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}

	/// Collaborator user ids for a wiki, in the order they were added.
	#[tracing::instrument(skip(self), fields(wiki_id = %wiki_id))]
	pub async fn list_collaborators(&self, wiki_id: &WikiId) -> Result<Vec<UserId>, DbError> {
		let mut conn = self.pool.acquire().await?;
		fetch_collaborators(&mut conn, wiki_id).await
	}

	#[tracing::instrument(skip(self), fields(wiki_id = %wiki_id, user_id = %user_id))]
	pub async fn is_collaborator(&self, wiki_id: &WikiId, user_id: &UserId) -> Result<bool, DbError> {
		let found: Option<i64> =
			sqlx::query_scalar("SELECT 1 FROM collaborators WHERE wiki_id = ? AND user_id = ?")
				.bind(wiki_id.to_string())
				.bind(user_id.to_string())
				.fetch_optional(&self.pool)
				.await?;

		Ok(found.is_some())
	}

	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn count_wikis_for_user(&self, user_id: &UserId) -> Result<i64, DbError> {
		let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM wikis WHERE user_id = ?")
			.bind(user_id.to_string())
			.fetch_one(&self.pool)
			.await?;

		Ok(count)
	}
}

async fn fetch_collaborators(
	conn: &mut SqliteConnection,
	wiki_id: &WikiId,
) -> Result<Vec<UserId>, DbError> {
	let rows = sqlx::query(
		r#"
		SELECT user_id
		FROM collaborators
		WHERE wiki_id = ?
		ORDER BY rowid ASC
		"#,
	)
	.bind(wiki_id.to_string())
	.fetch_all(&mut *conn)
	.await?;

	rows
		.iter()
		.map(|r| parse_id(&r.get::<String, _>("user_id"), "user"))
		.collect()
}

async fn insert_collaborators(
	tx: &mut Transaction<'_, Sqlite>,
	wiki_id: &WikiId,
	user_ids: &[UserId],
) -> Result<(), DbError> {
	for user_id in user_ids {
		let collaborator = Collaborator::new(*wiki_id, *user_id);
		sqlx::query(
			r#"
			INSERT INTO collaborators (id, wiki_id, user_id, created_at)
			VALUES (?, ?, ?, ?)
			"#,
		)
		.bind(collaborator.id.to_string())
		.bind(collaborator.wiki_id.to_string())
		.bind(collaborator.user_id.to_string())
		.bind(collaborator.created_at.to_rfc3339())
		.execute(&mut **tx)
		.await
		.map_err(|e| map_unique_violation(e, "duplicate collaborator"))?;
	}
	Ok(())
}

fn row_to_wiki(row: &sqlx::sqlite::SqliteRow) -> Result<Wiki, DbError> {
	let private: i32 = row.get("private");

	Ok(Wiki {
		id: parse_id(&row.get::<String, _>("id"), "wiki")?,
		title: row.get("title"),
		body: row.get("body"),
		private: private != 0,
		user_id: parse_id(&row.get::<String, _>("user_id"), "user")?,
		created_at: parse_timestamp(&row.get::<String, _>("created_at"), "created_at")?,
		updated_at: parse_timestamp(&row.get::<String, _>("updated_at"), "updated_at")?,
	})
}

#[async_trait]
impl WikiStore for WikiRepository {
	async fn create_wiki(&self, wiki: &Wiki, collaborators: &[UserId]) -> Result<(), DbError> {
		self.create_wiki(wiki, collaborators).await
	}

	async fn get_wiki(&self, id: &WikiId) -> Result<Option<WikiWithCollaborators>, DbError> {
		self.get_wiki(id).await
	}

	async fn list_wikis(&self) -> Result<Vec<WikiWithCollaborators>, DbError> {
		self.list_wikis().await
	}

	async fn update_wiki(
		&self,
		wiki: &Wiki,
		collaborators: Option<&[UserId]>,
	) -> Result<bool, DbError> {
		self.update_wiki(wiki, collaborators).await
	}

	async fn delete_wiki(&self, id: &WikiId) -> Result<bool, DbError> {
		self.delete_wiki(id).await
	}

	async fn list_collaborators(&self, wiki_id: &WikiId) -> Result<Vec<UserId>, DbError> {
		self.list_collaborators(wiki_id).await
	}

	async fn is_collaborator(&self, wiki_id: &WikiId, user_id: &UserId) -> Result<bool, DbError> {
		self.is_collaborator(wiki_id, user_id).await
	}

	async fn count_wikis_for_user(&self, user_id: &UserId) -> Result<i64, DbError> {
		self.count_wikis_for_user(user_id).await
	}
}
