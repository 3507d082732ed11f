// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Type definitions for ABAC policy evaluation.
//!
//! This module defines the data the policy engine reasons about:
//!
//! - [`Actor`]: The requester, either anonymous or an authenticated user with a role
//! - [`WikiAttrs`]: The wiki being accessed (owner, privacy flag, collaborators)
//! - [`Action`]: The operation being attempted
//!
//! # Design Principles
//!
//! 1. **Immutable evaluation**: All attributes are loaded before policy evaluation
//! 2. **No database access**: Policy functions are pure; all data is pre-loaded
//! 3. **Explicit absence**: A guest is [`Actor::Anonymous`], never a missing user

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AuthzError, AuthzResult};
use crate::user::User;
use crate::wiki::WikiWithCollaborators;
use crate::{Role, UserId};

/// Attributes of an authenticated requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorAttrs {
	pub user_id: UserId,
	pub role: Role,
}

/// The party a policy decision is made for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Actor {
	/// No authenticated user on the request.
	#[default]
	Anonymous,
	User(ActorAttrs),
}

impl Actor {
	pub fn anonymous() -> Self {
		Actor::Anonymous
	}

	pub fn user(user_id: UserId, role: Role) -> Self {
		Actor::User(ActorAttrs { user_id, role })
	}

	/// Builds an actor from a stored user id and raw role string.
	///
	/// # Errors
	/// Returns [`AuthzError::InvalidActorState`] if the role is not one of the
	/// known values. Callers decide how to degrade; the policy never sees it.
	pub fn from_stored(user_id: UserId, raw_role: &str) -> AuthzResult<Self> {
		raw_role
			.parse::<Role>()
			.map(|role| Actor::user(user_id, role))
			.map_err(|_| AuthzError::InvalidActorState {
				user_id,
				value: raw_role.to_string(),
			})
	}

	pub fn user_id(&self) -> Option<UserId> {
		match self {
			Actor::Anonymous => None,
			Actor::User(attrs) => Some(attrs.user_id),
		}
	}

	pub fn role(&self) -> Option<Role> {
		match self {
			Actor::Anonymous => None,
			Actor::User(attrs) => Some(attrs.role),
		}
	}

	pub fn is_anonymous(&self) -> bool {
		matches!(self, Actor::Anonymous)
	}

	pub fn is_admin(&self) -> bool {
		matches!(self.role(), Some(Role::Admin))
	}

	pub fn is_premium(&self) -> bool {
		matches!(self.role(), Some(Role::Premium))
	}

	pub fn is_standard(&self) -> bool {
		matches!(self.role(), Some(Role::Standard))
	}

	/// Returns true if this actor is the given user.
	pub fn is(&self, user_id: &UserId) -> bool {
		self.user_id().as_ref() == Some(user_id)
	}
}

impl From<&User> for Actor {
	fn from(user: &User) -> Self {
		Actor::user(user.id, user.role)
	}
}

impl fmt::Display for Actor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Actor::Anonymous => f.write_str("anonymous"),
			Actor::User(attrs) => write!(f, "{}", attrs.user_id),
		}
	}
}

/// Attributes of the wiki a decision is about.
///
/// Borrows the collaborator list so that evaluating a snapshot never copies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WikiAttrs<'a> {
	pub owner_user_id: UserId,
	pub private: bool,
	pub collaborators: &'a [UserId],
}

impl WikiAttrs<'static> {
	/// Attributes for a wiki with no collaborators.
	pub fn new(owner_user_id: UserId, private: bool) -> Self {
		Self {
			owner_user_id,
			private,
			collaborators: &[],
		}
	}

	pub fn public(owner_user_id: UserId) -> Self {
		Self::new(owner_user_id, false)
	}

	pub fn private(owner_user_id: UserId) -> Self {
		Self::new(owner_user_id, true)
	}
}

impl<'a> WikiAttrs<'a> {
	/// Builder: set the collaborator list.
	pub fn with_collaborators<'b>(self, collaborators: &'b [UserId]) -> WikiAttrs<'b> {
		WikiAttrs {
			owner_user_id: self.owner_user_id,
			private: self.private,
			collaborators,
		}
	}

	/// Returns true if the actor authored this wiki. Always false for guests.
	pub fn is_owned_by(&self, actor: &Actor) -> bool {
		actor.is(&self.owner_user_id)
	}

	/// Returns true if the actor is on the collaborator list. Always false for guests.
	pub fn has_collaborator(&self, actor: &Actor) -> bool {
		match actor.user_id() {
			Some(user_id) => self.collaborators.contains(&user_id),
			None => false,
		}
	}
}

/// Anything the policy engine can evaluate as a wiki.
pub trait WikiResource {
	fn wiki_attrs(&self) -> WikiAttrs<'_>;
}

impl WikiResource for WikiAttrs<'_> {
	fn wiki_attrs(&self) -> WikiAttrs<'_> {
		*self
	}
}

impl WikiResource for WikiWithCollaborators {
	fn wiki_attrs(&self) -> WikiAttrs<'_> {
		WikiAttrs {
			owner_user_id: self.wiki.user_id,
			private: self.wiki.private,
			collaborators: &self.collaborators,
		}
	}
}

/// Operations on wikis, named after the handler that performs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
	/// List wikis.
	Index,
	/// View a single wiki.
	Show,
	/// Open the create form.
	New,
	Create,
	/// Open the update form.
	Edit,
	Update,
	Destroy,
}

impl Action {
	pub fn all() -> &'static [Action] {
		&[
			Action::Index,
			Action::Show,
			Action::New,
			Action::Create,
			Action::Edit,
			Action::Update,
			Action::Destroy,
		]
	}
}

impl fmt::Display for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Action::Index => "index",
			Action::Show => "show",
			Action::New => "new",
			Action::Create => "create",
			Action::Edit => "edit",
			Action::Update => "update",
			Action::Destroy => "destroy",
		};
		f.write_str(name)
	}
}
