// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use folio_server_auth::UserId;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("Database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Conflict: {0}")]
	Conflict(String),

	#[error("Internal: {0}")]
	Internal(String),

	/// A users row holds a role outside the known set.
	#[error("Invalid role '{value}' for user {user_id}")]
	InvalidRole { user_id: UserId, value: String },
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Maps a unique-constraint violation to [`DbError::Conflict`].
pub(crate) fn map_unique_violation(e: sqlx::Error, what: &str) -> DbError {
	let is_unique = e
		.as_database_error()
		.map(|db| db.is_unique_violation())
		.unwrap_or(false);

	if is_unique {
		DbError::Conflict(what.to_string())
	} else {
		DbError::Sqlx(e)
	}
}
