// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wiki pages and their collaborator allow-lists.
//!
//! This module provides:
//! - [`Wiki`] - a page authored by exactly one user
//! - [`Collaborator`] - join record granting a user visibility into a wiki
//! - [`WikiWithCollaborators`] - the per-request snapshot handed to the policy engine
//! - [`WikiParams`] / [`WikiChanges`] - submitted create and update payloads
//! - [`select_collaborators`] - turns a submitted id list into a collaborator set

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AuthzError, AuthzResult};
use crate::types::{CollaboratorId, UserId, WikiId};

/// Maximum length of a wiki title, in characters.
pub const MAX_TITLE_LEN: usize = 255;

/// A wiki page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wiki {
	pub id: WikiId,
	pub title: String,
	pub body: String,
	pub private: bool,
	/// The author. Every wiki has exactly one.
	pub user_id: UserId,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Wiki {
	/// Creates a new wiki owned by `user_id`. Does not validate.
	pub fn new(
		user_id: UserId,
		title: impl Into<String>,
		body: impl Into<String>,
		private: bool,
	) -> Self {
		let now = Utc::now();
		Self {
			id: WikiId::generate(),
			title: title.into(),
			body: body.into(),
			private,
			user_id,
			created_at: now,
			updated_at: now,
		}
	}

	/// Checks the title and body presence rules.
	pub fn validate(&self) -> AuthzResult<()> {
		validate_title(&self.title)?;
		validate_body(&self.body)
	}

	/// Applies submitted changes in place. Fields left as `None` are kept.
	pub fn apply(&mut self, changes: &WikiChanges) {
		if let Some(title) = &changes.title {
			self.title = title.clone();
		}
		if let Some(body) = &changes.body {
			self.body = body.clone();
		}
		if let Some(private) = changes.private {
			self.private = private;
		}
		self.updated_at = Utc::now();
	}
}

pub fn validate_title(title: &str) -> AuthzResult<()> {
	if title.trim().is_empty() {
		return Err(AuthzError::Validation("title can't be blank".to_string()));
	}
	if title.chars().count() > MAX_TITLE_LEN {
		return Err(AuthzError::Validation(format!(
			"title is too long (maximum is {MAX_TITLE_LEN} characters)"
		)));
	}
	Ok(())
}

pub fn validate_body(body: &str) -> AuthzResult<()> {
	if body.trim().is_empty() {
		return Err(AuthzError::Validation("body can't be blank".to_string()));
	}
	Ok(())
}

/// A user granted visibility into a wiki regardless of its privacy flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaborator {
	pub id: CollaboratorId,
	pub wiki_id: WikiId,
	pub user_id: UserId,
	pub created_at: DateTime<Utc>,
}

impl Collaborator {
	pub fn new(wiki_id: WikiId, user_id: UserId) -> Self {
		Self {
			id: CollaboratorId::generate(),
			wiki_id,
			user_id,
			created_at: Utc::now(),
		}
	}
}

/// A wiki together with the ids of its collaborators, loaded as one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiWithCollaborators {
	pub wiki: Wiki,
	pub collaborators: Vec<UserId>,
}

impl WikiWithCollaborators {
	pub fn new(wiki: Wiki, collaborators: Vec<UserId>) -> Self {
		Self {
			wiki,
			collaborators,
		}
	}

	/// A wiki with an empty collaborator set.
	pub fn solo(wiki: Wiki) -> Self {
		Self::new(wiki, Vec::new())
	}

	pub fn is_collaborator(&self, user_id: &UserId) -> bool {
		self.collaborators.contains(user_id)
	}
}

/// Payload submitted to create a wiki.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiParams {
	pub title: String,
	pub body: String,
	#[serde(default)]
	pub private: bool,
	/// Raw collaborator user ids as submitted. See [`select_collaborators`].
	#[serde(default)]
	pub collaborator_ids: Option<Vec<String>>,
}

/// Payload submitted to update a wiki.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiChanges {
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub body: Option<String>,
	#[serde(default)]
	pub private: Option<bool>,
	#[serde(default)]
	pub collaborator_ids: Option<Vec<String>>,
}

/// Builds a collaborator set from a submitted list of user ids.
///
/// Entries are processed in order. An empty string clears everything selected
/// so far; whitespace is not trimmed, so `" "` is an invalid id rather than a
/// clear. Duplicates are dropped, keeping first-seen order. Any other entry
/// must be a user UUID. Whether the user exists is the caller's concern.
pub fn select_collaborators<S: AsRef<str>>(submitted: &[S]) -> AuthzResult<Vec<UserId>> {
	let mut selected: Vec<UserId> = Vec::with_capacity(submitted.len());

	for raw in submitted {
		let raw = raw.as_ref();
		if raw.is_empty() {
			selected.clear();
			continue;
		}

		let user_id: UserId = raw
			.parse()
			.map_err(|_| AuthzError::Validation(format!("invalid collaborator id '{raw}'")))?;

		if !selected.contains(&user_id) {
			selected.push(user_id);
		}
	}

	Ok(selected)
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	mod validation {
		use super::*;

		#[test]
		fn accepts_title_and_body() {
			let wiki = Wiki::new(UserId::generate(), "Rust", "Ownership and borrowing.", false);
			assert!(wiki.validate().is_ok());
		}

		#[test]
		fn rejects_blank_title() {
			let wiki = Wiki::new(UserId::generate(), "   ", "body", false);
			assert_eq!(
				wiki.validate(),
				Err(AuthzError::Validation("title can't be blank".to_string()))
			);
		}

		#[test]
		fn rejects_blank_body() {
			let wiki = Wiki::new(UserId::generate(), "title", "\n\t", false);
			assert!(matches!(wiki.validate(), Err(AuthzError::Validation(_))));
		}

		#[test]
		fn rejects_overlong_title() {
			let title = "x".repeat(MAX_TITLE_LEN + 1);
			assert!(validate_title(&title).is_err());
			assert!(validate_title(&"x".repeat(MAX_TITLE_LEN)).is_ok());
		}

		#[test]
		fn new_wiki_is_public_by_default_when_asked() {
			let wiki = Wiki::new(UserId::generate(), "t", "b", false);
			assert!(!wiki.private);
			assert_eq!(wiki.created_at, wiki.updated_at);
		}
	}

	mod changes {
		use super::*;

		#[test]
		fn apply_only_touches_given_fields() {
			let mut wiki = Wiki::new(UserId::generate(), "old title", "old body", false);
			let before = wiki.clone();

			wiki.apply(&WikiChanges {
				title: Some("new title".to_string()),
				..Default::default()
			});

			assert_eq!(wiki.title, "new title");
			assert_eq!(wiki.body, before.body);
			assert_eq!(wiki.private, before.private);
			assert_eq!(wiki.user_id, before.user_id);
			assert!(wiki.updated_at >= before.updated_at);
		}

		#[test]
		fn apply_can_flip_privacy() {
			let mut wiki = Wiki::new(UserId::generate(), "t", "b", false);
			wiki.apply(&WikiChanges {
				private: Some(true),
				..Default::default()
			});
			assert!(wiki.private);
		}

		#[test]
		fn params_deserialize_with_defaults() {
			let params: WikiParams =
				serde_json::from_str(r#"{"title":"t","body":"b"}"#).unwrap();
			assert!(!params.private);
			assert!(params.collaborator_ids.is_none());
		}
	}

	mod collaborator_selection {
		use super::*;

		#[test]
		fn empty_list_selects_nobody() {
			let selected = select_collaborators::<&str>(&[]).unwrap();
			assert!(selected.is_empty());
		}

		#[test]
		fn keeps_submitted_order() {
			let a = UserId::generate();
			let b = UserId::generate();
			let submitted = vec![a.to_string(), b.to_string()];
			assert_eq!(select_collaborators(&submitted).unwrap(), vec![a, b]);
		}

		#[test]
		fn sentinel_clears_earlier_entries() {
			let a = UserId::generate();
			let b = UserId::generate();
			let submitted = vec![a.to_string(), String::new(), b.to_string()];
			assert_eq!(select_collaborators(&submitted).unwrap(), vec![b]);
		}

		#[test]
		fn leading_sentinel_is_harmless() {
			let a = UserId::generate();
			let submitted = vec![String::new(), a.to_string()];
			assert_eq!(select_collaborators(&submitted).unwrap(), vec![a]);
		}

		#[test]
		fn whitespace_entry_is_not_a_sentinel() {
			let a = UserId::generate();
			let submitted = vec![a.to_string(), " ".to_string()];
			let err = select_collaborators(&submitted).unwrap_err();
			assert_eq!(err, AuthzError::Validation("invalid collaborator id ' '".to_string()));
		}

		#[test]
		fn duplicates_collapse() {
			let a = UserId::generate();
			let submitted = vec![a.to_string(), a.to_string(), a.to_string()];
			assert_eq!(select_collaborators(&submitted).unwrap(), vec![a]);
		}

		#[test]
		fn garbage_id_is_a_validation_error() {
			let err = select_collaborators(&["42"]).unwrap_err();
			assert_eq!(
				err,
				AuthzError::Validation("invalid collaborator id '42'".to_string())
			);
		}

		#[test]
		fn snapshot_membership() {
			let owner = UserId::generate();
			let collaborator = UserId::generate();
			let snapshot = WikiWithCollaborators::new(
				Wiki::new(owner, "t", "b", true),
				vec![collaborator],
			);
			assert!(snapshot.is_collaborator(&collaborator));
			assert!(!snapshot.is_collaborator(&owner));
			assert!(!WikiWithCollaborators::solo(snapshot.wiki.clone()).is_collaborator(&collaborator));
		}
	}

	proptest! {
		#[test]
		fn selection_has_no_duplicates(raws in proptest::collection::vec(0u8..4, 0..20)) {
			let pool: Vec<UserId> = (0..4).map(|_| UserId::generate()).collect();
			let submitted: Vec<String> = raws.iter().map(|i| pool[*i as usize].to_string()).collect();

			let selected = select_collaborators(&submitted).unwrap();
			let mut deduped = selected.clone();
			deduped.sort();
			deduped.dedup();
			prop_assert_eq!(deduped.len(), selected.len());
		}

		#[test]
		fn selection_only_reflects_entries_after_last_sentinel(
			before in proptest::collection::vec(any::<u128>(), 0..5),
			after in proptest::collection::vec(any::<u128>(), 0..5),
		) {
			let mut submitted: Vec<String> = before.iter().map(|u| uuid::Uuid::from_u128(*u).to_string()).collect();
			submitted.push(String::new());
			submitted.extend(after.iter().map(|u| uuid::Uuid::from_u128(*u).to_string()));

			let selected = select_collaborators(&submitted).unwrap();
			for id in &selected {
				prop_assert!(after.contains(&id.into_inner().as_u128()));
			}
		}
	}
}
