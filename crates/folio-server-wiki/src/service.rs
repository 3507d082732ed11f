// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wiki request handling.
//!
//! Each method mirrors one wiki handler: it resolves the snapshot it needs,
//! asks the policy engine for a decision and only then touches storage.
//! Listing and viewing are open to guests. Every other action needs a
//! signed-in user before the policy is consulted.

use std::sync::Arc;

use folio_server_auth::abac::{self, Action, Actor, WikiAttrs, WikiResource};
use folio_server_auth::wiki::select_collaborators;
use folio_server_auth::{
	AuthzError, UserId, Wiki, WikiChanges, WikiId, WikiParams, WikiWithCollaborators,
};
use folio_server_db::{DbError, UserStore, WikiStore};
use tracing::instrument;

use crate::error::{Result, WikiError};

#[derive(Clone)]
pub struct WikiService {
	wikis: Arc<dyn WikiStore>,
	users: Arc<dyn UserStore>,
}

impl WikiService {
	pub fn new(wikis: Arc<dyn WikiStore>, users: Arc<dyn UserStore>) -> Self {
		Self { wikis, users }
	}

	/// Turns the session's user id into a policy actor.
	///
	/// No id, an id with no user behind it, and a user whose stored role is
	/// unrecognized all resolve to [`Actor::Anonymous`].
	#[instrument(skip(self))]
	pub async fn resolve_actor(&self, user_id: Option<UserId>) -> Result<Actor> {
		let Some(user_id) = user_id else {
			return Ok(Actor::Anonymous);
		};

		match self.users.get_user_by_id(&user_id).await {
			Ok(Some(user)) => Ok(Actor::from(&user)),
			Ok(None) => {
				tracing::warn!(%user_id, "session refers to a missing user, treating as anonymous");
				Ok(Actor::Anonymous)
			}
			Err(DbError::InvalidRole { user_id, value }) => {
				Actor::from_stored(user_id, &value).or_else(|e| {
					tracing::warn!(error = %e, "treating user with unrecognized role as anonymous");
					Ok(Actor::Anonymous)
				})
			}
			Err(e) => Err(e.into()),
		}
	}

	/// Lists the wikis visible to `actor`, in storage order.
	#[instrument(skip(self, actor), fields(actor = %actor))]
	pub async fn index(&self, actor: &Actor) -> Result<Vec<WikiWithCollaborators>> {
		if !abac::is_allowed_on_collection(actor, Action::Index) {
			return Err(self.denied(actor, Action::Index));
		}

		let all = self.wikis.list_wikis().await?;
		let total = all.len();
		let visible = abac::scope_into(actor, all);

		tracing::debug!(total, visible = visible.len(), "wiki index");
		Ok(visible)
	}

	#[instrument(skip(self, actor), fields(actor = %actor, %wiki_id))]
	pub async fn show(&self, actor: &Actor, wiki_id: WikiId) -> Result<WikiWithCollaborators> {
		let wiki = self.load(wiki_id).await?;
		self.check(actor, Action::Show, &wiki.wiki_attrs())?;
		Ok(wiki)
	}

	/// Returns an empty public draft for the create form.
	#[instrument(skip(self, actor), fields(actor = %actor))]
	pub fn new_form(&self, actor: &Actor) -> Result<Wiki> {
		let user_id = require_user(actor)?;
		let draft = Wiki::new(user_id, "", "", false);
		self.check(actor, Action::New, &WikiAttrs::new(user_id, draft.private))?;
		Ok(draft)
	}

	/// Creates a wiki authored by `actor`.
	///
	/// For a private wiki the submitted collaborator list becomes its
	/// collaborator set. For a public wiki the list is ignored.
	#[instrument(skip(self, actor, params), fields(actor = %actor, private = params.private))]
	pub async fn create(&self, actor: &Actor, params: WikiParams) -> Result<WikiWithCollaborators> {
		let user_id = require_user(actor)?;
		let wiki = Wiki::new(user_id, params.title, params.body, params.private);

		self.check(actor, Action::Create, &WikiAttrs::new(user_id, wiki.private))?;
		wiki.validate()?;

		let collaborators = match (&params.collaborator_ids, wiki.private) {
			(Some(submitted), true) => self.resolve_collaborators(submitted).await?,
			_ => Vec::new(),
		};

		self.wikis.create_wiki(&wiki, &collaborators).await?;
		tracing::info!(
			wiki_id = %wiki.id,
			%user_id,
			private = wiki.private,
			collaborators = collaborators.len(),
			"wiki created"
		);

		Ok(WikiWithCollaborators::new(wiki, collaborators))
	}

	/// Loads a wiki for the update form.
	#[instrument(skip(self, actor), fields(actor = %actor, %wiki_id))]
	pub async fn edit(&self, actor: &Actor, wiki_id: WikiId) -> Result<WikiWithCollaborators> {
		require_user(actor)?;
		let wiki = self.load(wiki_id).await?;
		self.check(actor, Action::Edit, &wiki.wiki_attrs())?;
		Ok(wiki)
	}

	/// Applies `changes` to a stored wiki.
	///
	/// The policy sees the stored record, so the privacy flag it checks is the
	/// one saved before this request. When the saved result is private and a
	/// collaborator list was submitted, the stored set is replaced by it.
	#[instrument(skip(self, actor, changes), fields(actor = %actor, %wiki_id))]
	pub async fn update(
		&self,
		actor: &Actor,
		wiki_id: WikiId,
		changes: WikiChanges,
	) -> Result<WikiWithCollaborators> {
		require_user(actor)?;
		let stored = self.load(wiki_id).await?;
		self.check(actor, Action::Update, &stored.wiki_attrs())?;

		let mut wiki = stored.wiki.clone();
		wiki.apply(&changes);
		wiki.validate()?;

		let replacement = match (&changes.collaborator_ids, wiki.private) {
			(Some(submitted), true) => Some(self.resolve_collaborators(submitted).await?),
			_ => None,
		};

		if !self.wikis.update_wiki(&wiki, replacement.as_deref()).await? {
			return Err(wiki_not_found(wiki_id).into());
		}

		tracing::info!(
			%wiki_id,
			private = wiki.private,
			collaborators_replaced = replacement.is_some(),
			"wiki updated"
		);

		let collaborators = replacement.unwrap_or(stored.collaborators);
		Ok(WikiWithCollaborators::new(wiki, collaborators))
	}

	/// Deletes a wiki and returns what was removed.
	#[instrument(skip(self, actor), fields(actor = %actor, %wiki_id))]
	pub async fn destroy(&self, actor: &Actor, wiki_id: WikiId) -> Result<Wiki> {
		require_user(actor)?;
		let stored = self.load(wiki_id).await?;
		self.check(actor, Action::Destroy, &stored.wiki_attrs())?;

		if !self.wikis.delete_wiki(&wiki_id).await? {
			return Err(wiki_not_found(wiki_id).into());
		}

		tracing::info!(%wiki_id, "wiki deleted");
		Ok(stored.wiki)
	}

	async fn load(&self, wiki_id: WikiId) -> Result<WikiWithCollaborators> {
		self
			.wikis
			.get_wiki(&wiki_id)
			.await?
			.ok_or_else(|| wiki_not_found(wiki_id).into())
	}

	/// Parses the submitted ids and checks that each names a user.
	async fn resolve_collaborators(&self, submitted: &[String]) -> Result<Vec<UserId>> {
		let selected = select_collaborators(submitted)?;

		let missing = self.users.find_missing_users(&selected).await?;
		if let Some(first) = missing.first() {
			return Err(AuthzError::NotFound {
				resource: format!("user {first}"),
			}
			.into());
		}

		Ok(selected)
	}

	fn check(&self, actor: &Actor, action: Action, wiki: &WikiAttrs<'_>) -> Result<()> {
		abac::authorize(actor, action, wiki).map_err(|_| self.denied(actor, action))
	}

	fn denied(&self, actor: &Actor, action: Action) -> WikiError {
		tracing::warn!(actor = %actor, %action, "authorization denied");
		WikiError::Denied
	}
}

fn require_user(actor: &Actor) -> Result<UserId> {
	actor.user_id().ok_or(WikiError::Unauthenticated)
}

fn wiki_not_found(wiki_id: WikiId) -> AuthzError {
	AuthzError::NotFound {
		resource: format!("wiki {wiki_id}"),
	}
}
