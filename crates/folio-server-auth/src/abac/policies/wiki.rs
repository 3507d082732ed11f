// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wiki access policies.

use crate::abac::{Actor, WikiAttrs};
use crate::Role;

/// Evaluates whether the actor may view the wiki.
///
/// Standard users are not granted their own private wikis by ownership; they
/// need to be on the collaborator list like anyone else.
pub fn evaluate_show(actor: &Actor, wiki: &WikiAttrs<'_>) -> bool {
	if !wiki.private {
		return true;
	}

	match actor {
		Actor::Anonymous => false,
		Actor::User(attrs) => match attrs.role {
			Role::Admin => true,
			Role::Premium => wiki.is_owned_by(actor) || wiki.has_collaborator(actor),
			Role::Standard => wiki.has_collaborator(actor),
		},
	}
}

/// Evaluates the authoring gate shared by new, create, edit and update.
///
/// Public wikis are open. Private wikis are reserved for paid and admin
/// accounts. For edit and update the caller passes the stored record.
pub fn evaluate_authoring(actor: &Actor, wiki: &WikiAttrs<'_>) -> bool {
	if !wiki.private {
		return true;
	}

	match actor {
		Actor::Anonymous => false,
		Actor::User(attrs) => attrs.role.can_author_private(),
	}
}

/// Evaluates whether the actor may destroy a wiki. Admins only.
pub fn evaluate_destroy(actor: &Actor) -> bool {
	match actor {
		Actor::Anonymous => false,
		Actor::User(attrs) => match attrs.role {
			Role::Admin => true,
			Role::Premium | Role::Standard => false,
		},
	}
}
