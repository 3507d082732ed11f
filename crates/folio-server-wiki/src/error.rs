// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use folio_server_auth::AuthzError;
use folio_server_db::DbError;
use thiserror::Error;

use crate::membership::PaymentError;

pub type Result<T> = std::result::Result<T, WikiError>;

#[derive(Debug, Error)]
pub enum WikiError {
	/// The action needs a signed-in user and there is none.
	#[error("You need to sign in or sign up before continuing.")]
	Unauthenticated,

	#[error("You are not authorized to perform this action.")]
	Denied,

	#[error("{resource} not found")]
	NotFound { resource: String },

	#[error("validation failed: {0}")]
	Validation(String),

	#[error(transparent)]
	Payment(#[from] PaymentError),

	#[error("database error: {0}")]
	Db(DbError),
}

impl WikiError {
	pub fn not_found(resource: impl Into<String>) -> Self {
		WikiError::NotFound {
			resource: resource.into(),
		}
	}
}

impl From<AuthzError> for WikiError {
	fn from(e: AuthzError) -> Self {
		match e {
			AuthzError::Denied => WikiError::Denied,
			AuthzError::NotFound { resource } => WikiError::NotFound { resource },
			// A corrupt actor is never granted anything.
			AuthzError::InvalidActorState { .. } => WikiError::Denied,
			AuthzError::Validation(msg) => WikiError::Validation(msg),
		}
	}
}

impl From<DbError> for WikiError {
	fn from(e: DbError) -> Self {
		match e {
			DbError::NotFound(resource) => WikiError::NotFound { resource },
			other => WikiError::Db(other),
		}
	}
}
