// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User accounts and membership transitions.
//!
//! This module provides:
//! - [`User`] - account entity carrying exactly one [`Role`]
//! - [`RoleChange`] - outcome of an upgrade or downgrade
//!
//! Credentials are owned by the account subsystem and never appear here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Role, UserId};

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	pub id: UserId,
	pub email: String,
	pub role: Role,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// Result of applying a membership transition to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RoleChange {
	Changed { from: Role, to: Role },
	Unchanged { role: Role },
}

impl RoleChange {
	pub fn is_changed(&self) -> bool {
		matches!(self, RoleChange::Changed { .. })
	}

	/// The role the user holds after the transition.
	pub fn current(&self) -> Role {
		match self {
			RoleChange::Changed { to, .. } => *to,
			RoleChange::Unchanged { role } => *role,
		}
	}
}

impl User {
	/// Creates a new standard user.
	pub fn new(email: impl Into<String>) -> Self {
		Self::with_role(email, Role::Standard)
	}

	/// Creates a new user with an explicit role. The email is normalized.
	pub fn with_role(email: impl Into<String>, role: Role) -> Self {
		let now = Utc::now();
		Self {
			id: UserId::generate(),
			email: normalize_email(&email.into()),
			role,
			created_at: now,
			updated_at: now,
		}
	}

	pub fn is_admin(&self) -> bool {
		self.role.is_admin()
	}

	pub fn is_premium(&self) -> bool {
		self.role.is_premium()
	}

	pub fn is_standard(&self) -> bool {
		self.role.is_standard()
	}

	/// Applies a completed premium payment.
	///
	/// Standard users become premium. Premium users stay premium and admins
	/// are never demoted by a purchase.
	pub fn apply_premium_payment(&mut self) -> RoleChange {
		match self.role {
			Role::Standard => self.set_role(Role::Premium),
			Role::Premium | Role::Admin => RoleChange::Unchanged { role: self.role },
		}
	}

	/// Applies an explicit downgrade. Only premium users are affected.
	pub fn apply_downgrade(&mut self) -> RoleChange {
		match self.role {
			Role::Premium => self.set_role(Role::Standard),
			Role::Standard | Role::Admin => RoleChange::Unchanged { role: self.role },
		}
	}

	fn set_role(&mut self, to: Role) -> RoleChange {
		let from = self.role;
		self.role = to;
		self.updated_at = Utc::now();
		RoleChange::Changed { from, to }
	}
}

/// Normalizes an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
	email.trim().to_lowercase()
}

/// Performs a minimal structural check on an email address.
///
/// Delivery and confirmation belong to the account subsystem; this only keeps
/// obviously malformed values out of the users table.
pub fn is_plausible_email(email: &str) -> bool {
	let email = email.trim();
	let Some((local, domain)) = email.split_once('@') else {
		return false;
	};
	!local.is_empty()
		&& !domain.is_empty()
		&& !domain.contains('@')
		&& domain.contains('.')
		&& !email.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
	use super::*;

	mod transitions {
		use super::*;

		#[test]
		fn new_user_is_standard() {
			let user = User::new("someone@example.com");
			assert!(user.is_standard());
			assert_eq!(user.created_at, user.updated_at);
		}

		#[test]
		fn payment_upgrades_standard_to_premium() {
			let mut user = User::new("a@example.com");
			let change = user.apply_premium_payment();
			assert_eq!(
				change,
				RoleChange::Changed {
					from: Role::Standard,
					to: Role::Premium
				}
			);
			assert!(user.is_premium());
		}

		#[test]
		fn payment_is_idempotent_for_premium() {
			let mut user = User::with_role("p@example.com", Role::Premium);
			let change = user.apply_premium_payment();
			assert!(!change.is_changed());
			assert_eq!(change.current(), Role::Premium);
		}

		#[test]
		fn payment_never_demotes_admin() {
			let mut user = User::with_role("root@example.com", Role::Admin);
			let change = user.apply_premium_payment();
			assert_eq!(change, RoleChange::Unchanged { role: Role::Admin });
			assert!(user.is_admin());
		}

		#[test]
		fn downgrade_moves_premium_to_standard() {
			let mut user = User::with_role("p@example.com", Role::Premium);
			let change = user.apply_downgrade();
			assert!(change.is_changed());
			assert!(user.is_standard());
		}

		#[test]
		fn downgrade_is_noop_for_other_roles() {
			let mut standard = User::new("s@example.com");
			let mut admin = User::with_role("a@example.com", Role::Admin);

			assert!(!standard.apply_downgrade().is_changed());
			assert!(!admin.apply_downgrade().is_changed());
			assert!(standard.is_standard());
			assert!(admin.is_admin());
		}

		#[test]
		fn downgrade_twice_is_stable() {
			let mut user = User::with_role("p@example.com", Role::Premium);
			user.apply_downgrade();
			let second = user.apply_downgrade();
			assert_eq!(second, RoleChange::Unchanged { role: Role::Standard });
		}
	}

	mod email {
		use super::*;

		#[test]
		fn normalizes_case_and_whitespace() {
			assert_eq!(normalize_email("  Admin@Example.COM "), "admin@example.com");
		}

		#[test]
		fn constructors_store_normalized_email() {
			assert_eq!(User::new(" Reader@Example.com").email, "reader@example.com");
			assert_eq!(
				User::with_role("ADMIN@example.com", Role::Admin).email,
				"admin@example.com"
			);
		}

		#[test]
		fn plausible_email_checks() {
			assert!(is_plausible_email("user1@factory.com"));
			assert!(!is_plausible_email("no-at-sign"));
			assert!(!is_plausible_email("@example.com"));
			assert!(!is_plausible_email("user@localhost"));
			assert!(!is_plausible_email("a@b@c.com"));
			assert!(!is_plausible_email("sp ace@example.com"));
		}
	}

	#[test]
	fn role_change_serializes_with_outcome_tag() {
		let json = serde_json::to_string(&RoleChange::Changed {
			from: Role::Standard,
			to: Role::Premium,
		})
		.unwrap();
		assert!(json.contains("\"outcome\":\"changed\""));
		assert!(json.contains("\"to\":\"premium\""));
	}
}
