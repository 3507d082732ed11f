// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

use crate::types::UserId;

pub type AuthzResult<T> = Result<T, AuthzError>;

/// Failures surfaced by the authorization layer and the wiki data model.
///
/// Policy evaluation itself never fails: [`crate::abac::is_allowed`] returns a
/// boolean. These variants exist for callers that want a `Result`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthzError {
	/// The policy denied the action. The message never says why.
	#[error("You are not authorized to perform this action.")]
	Denied,

	#[error("{resource} not found")]
	NotFound { resource: String },

	/// A stored user carries a role that is not one of the known values.
	#[error("user {user_id} has unrecognized role '{value}'")]
	InvalidActorState { user_id: UserId, value: String },

	#[error("validation failed: {0}")]
	Validation(String),
}
