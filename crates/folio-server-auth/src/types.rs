// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions for membership and authorization.
//!
//! This module defines the foundational types used throughout Folio:
//!
//! - **ID newtypes**: Type-safe wrappers around UUIDs ([`UserId`], [`WikiId`],
//!   [`CollaboratorId`]) preventing accidental mixing
//! - **Membership role**: The closed [`Role`] enumeration attached to every user
//!
//! All ID types implement transparent serde serialization (as UUID strings) and
//! provide conversion to/from [`uuid::Uuid`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			/// Create a new ID from a UUID.
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			/// Get the inner UUID value.
			pub fn into_inner(self) -> Uuid {
				self.0
			}

			/// Get a reference to the inner UUID.
			pub fn as_uuid(&self) -> &Uuid {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl FromStr for $name {
			type Err = uuid::Error;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Uuid::parse_str(s).map(Self)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Uuid {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a user.");
define_id_type!(WikiId, "Unique identifier for a wiki page.");
define_id_type!(CollaboratorId, "Unique identifier for a collaborator record.");

// =============================================================================
// Membership Role
// =============================================================================

/// Membership tier of a user.
///
/// Every persisted user carries exactly one role. New accounts start as
/// [`Role::Standard`]; payment moves them to [`Role::Premium`] and an explicit
/// downgrade moves them back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
	/// Free account. May author public wikis only.
	#[default]
	Standard,
	/// Paying account. May author private wikis and sees its own private wikis.
	Premium,
	/// Full access to every wiki, the only role that may destroy.
	Admin,
}

impl Role {
	/// Returns all available roles.
	pub fn all() -> &'static [Role] {
		&[Role::Standard, Role::Premium, Role::Admin]
	}

	/// Returns the canonical storage form of this role.
	pub fn as_str(&self) -> &'static str {
		match self {
			Role::Standard => "standard",
			Role::Premium => "premium",
			Role::Admin => "admin",
		}
	}

	pub fn is_admin(&self) -> bool {
		matches!(self, Role::Admin)
	}

	pub fn is_premium(&self) -> bool {
		matches!(self, Role::Premium)
	}

	pub fn is_standard(&self) -> bool {
		matches!(self, Role::Standard)
	}

	/// Returns true if this role unlocks private wiki authoring.
	pub fn can_author_private(&self) -> bool {
		match self {
			Role::Admin | Role::Premium => true,
			Role::Standard => false,
		}
	}
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error returned when a stored role string is not one of the known roles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
	type Err = UnknownRole;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"standard" => Ok(Role::Standard),
			"premium" => Ok(Role::Premium),
			"admin" => Ok(Role::Admin),
			other => Err(UnknownRole(other.to_string())),
		}
	}
}
