// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Visibility scoping for wiki listings.
//!
//! [`scope`] filters a candidate collection down to the wikis an actor may see.
//! Retained elements keep their relative order and the input is never mutated.
//! Membership checks are linear in each wiki's collaborator list.

use tracing::instrument;

use super::policies::wiki::evaluate_show;
use super::types::{Actor, WikiResource};

/// Returns references to the candidates visible to `actor`, in input order.
#[instrument(level = "debug", skip(actor, candidates), fields(actor = %actor, candidates = candidates.len()))]
pub fn scope<'a, T: WikiResource>(actor: &Actor, candidates: &'a [T]) -> Vec<&'a T> {
	let visible: Vec<&T> = if actor.is_admin() {
		candidates.iter().collect()
	} else {
		candidates
			.iter()
			.filter(|c| evaluate_show(actor, &c.wiki_attrs()))
			.collect()
	};

	tracing::debug!(visible = visible.len(), "scoped wiki listing");
	visible
}

/// Owned variant of [`scope`] for callers that hand the list onward.
pub fn scope_into<T: WikiResource>(actor: &Actor, candidates: Vec<T>) -> Vec<T> {
	if actor.is_admin() {
		return candidates;
	}

	candidates
		.into_iter()
		.filter(|c| evaluate_show(actor, &c.wiki_attrs()))
		.collect()
}
