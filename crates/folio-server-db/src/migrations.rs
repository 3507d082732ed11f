// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Schema setup.
//!
//! Every statement is idempotent, so running the full list against an
//! existing database is safe.

use sqlx::sqlite::SqlitePool;

use crate::error::DbError;

const MIGRATIONS: &[(&str, &str)] = &[
	(
		"create_users",
		r#"
		CREATE TABLE IF NOT EXISTS users (
			id TEXT PRIMARY KEY NOT NULL,
			email TEXT NOT NULL UNIQUE,
			password_hash TEXT,
			role TEXT NOT NULL DEFAULT 'standard',
			created_at TEXT NOT NULL,
			updated_at TEXT NOT NULL
		)
		"#,
	),
	(
		"create_wikis",
		r#"
		CREATE TABLE IF NOT EXISTS wikis (
			id TEXT PRIMARY KEY NOT NULL,
			title TEXT NOT NULL,
			body TEXT NOT NULL,
			private INTEGER NOT NULL DEFAULT 0,
			user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
			created_at TEXT NOT NULL,
			updated_at TEXT NOT NULL
		)
		"#,
	),
	(
		"index_wikis_user_id",
		"CREATE INDEX IF NOT EXISTS idx_wikis_user_id ON wikis(user_id)",
	),
	(
		"create_collaborators",
		r#"
		CREATE TABLE IF NOT EXISTS collaborators (
			id TEXT PRIMARY KEY NOT NULL,
			wiki_id TEXT NOT NULL REFERENCES wikis(id) ON DELETE CASCADE,
			user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
			created_at TEXT NOT NULL,
			UNIQUE (wiki_id, user_id)
		)
		"#,
	),
	(
		"index_collaborators_user_id",
		"CREATE INDEX IF NOT EXISTS idx_collaborators_user_id ON collaborators(user_id)",
	),
];

/// Applies the schema to the given pool.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
	for (name, sql) in MIGRATIONS {
		sqlx::query(sql).execute(pool).await?;
		tracing::trace!(migration = name, "applied migration");
	}

	tracing::debug!(count = MIGRATIONS.len(), "database migrations applied");
	Ok(())
}
