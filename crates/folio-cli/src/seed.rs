// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sample data for local development.
//!
//! Writes straight through the repositories. Seeded wikis are public, so
//! nothing here needs a policy decision.

use folio_server_auth::{Role, User, Wiki};
use folio_server_db::{DbError, UserRepository, WikiRepository};
use rand::seq::SliceRandom;
use rand::Rng;

/// Accounts that always exist after seeding, one per role.
pub const FIXTURE_ACCOUNTS: &[(&str, Role)] = &[
	("admin@example.com", Role::Admin),
	("premium@example.com", Role::Premium),
	("standard@example.com", Role::Standard),
];

const FIRST_NAMES: &[&str] = &[
	"ada", "grace", "alan", "barbara", "edsger", "frances", "ken", "margaret", "niklaus", "radia",
];
const LAST_NAMES: &[&str] = &[
	"lovelace", "hopper", "turing", "liskov", "dijkstra", "allen", "thompson", "hamilton", "wirth",
	"perlman",
];
const LOREM: &[&str] = &[
	"lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
	"eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
	pub users_created: usize,
	pub wikis_created: usize,
}

/// Creates `user_count` random users, `wiki_count` public wikis spread across
/// them, and the fixture accounts if they are missing.
pub async fn seed<R: Rng>(
	users: &UserRepository,
	wikis: &WikiRepository,
	user_count: usize,
	wiki_count: usize,
	rng: &mut R,
) -> Result<SeedSummary, DbError> {
	let mut summary = SeedSummary::default();
	let mut authors = Vec::with_capacity(user_count);

	for n in 0..user_count {
		let email = random_email(rng, n);
		if users.get_user_by_email(&email).await?.is_some() {
			continue;
		}
		let user = User::new(email);
		users.create_user(&user, None).await?;
		authors.push(user.id);
		summary.users_created += 1;
	}

	if authors.is_empty() {
		authors = users.list_users().await?.into_iter().map(|u| u.id).collect();
	}

	for _ in 0..wiki_count {
		let Some(author) = authors.choose(rng) else {
			break;
		};
		let wiki = Wiki::new(*author, sentence(rng, 3, 7), paragraph(rng), false);
		wikis.create_wiki(&wiki, &[]).await?;
		summary.wikis_created += 1;
	}

	for (email, role) in FIXTURE_ACCOUNTS {
		if users.get_user_by_email(email).await?.is_some() {
			tracing::debug!(email, "fixture account already present");
			continue;
		}
		users.create_user(&User::with_role(*email, *role), None).await?;
		summary.users_created += 1;
	}

	tracing::info!(
		users = summary.users_created,
		wikis = summary.wikis_created,
		"seed finished"
	);
	Ok(summary)
}

fn random_email<R: Rng>(rng: &mut R, n: usize) -> String {
	let first = FIRST_NAMES.choose(rng).copied().unwrap_or("user");
	let last = LAST_NAMES.choose(rng).copied().unwrap_or("example");
	format!("{first}.{last}{n}@example.com")
}

fn sentence<R: Rng>(rng: &mut R, min_words: usize, max_words: usize) -> String {
	let len = rng.gen_range(min_words..=max_words);
	let words: Vec<&str> = (0..len)
		.filter_map(|_| LOREM.choose(rng).copied())
		.collect();

	let mut text = words.join(" ");
	if let Some(first) = text.get(..1).map(str::to_uppercase) {
		text.replace_range(..1, &first);
	}
	text.push('.');
	text
}

fn paragraph<R: Rng>(rng: &mut R) -> String {
	let count = rng.gen_range(3..=6);
	(0..count)
		.map(|_| sentence(rng, 6, 12))
		.collect::<Vec<_>>()
		.join(" ")
}

#[cfg(test)]
mod tests {
	use super::*;
	use folio_server_db::testing::create_test_pool;
	use rand::rngs::StdRng;
	use rand::SeedableRng;

	#[tokio::test]
	async fn seeds_users_wikis_and_fixtures() {
		let pool = create_test_pool().await;
		let users = UserRepository::new(pool.clone());
		let wikis = WikiRepository::new(pool);
		let mut rng = StdRng::seed_from_u64(7);

		let summary = seed(&users, &wikis, 10, 50, &mut rng).await.unwrap();
		assert_eq!(summary.users_created, 13);
		assert_eq!(summary.wikis_created, 50);

		let admin = users.get_user_by_email("admin@example.com").await.unwrap().unwrap();
		assert_eq!(admin.role, Role::Admin);
		let listed = wikis.list_wikis().await.unwrap();
		assert_eq!(listed.len(), 50);
		assert!(listed.iter().all(|w| !w.wiki.private && w.wiki.validate().is_ok()));
	}

	#[tokio::test]
	async fn reseeding_keeps_fixture_accounts_unique() {
		let pool = create_test_pool().await;
		let users = UserRepository::new(pool.clone());
		let wikis = WikiRepository::new(pool);
		let mut rng = StdRng::seed_from_u64(1);

		seed(&users, &wikis, 0, 0, &mut rng).await.unwrap();
		let again = seed(&users, &wikis, 0, 2, &mut rng).await.unwrap();

		assert_eq!(again.users_created, 0);
		assert_eq!(again.wikis_created, 2);
		assert_eq!(users.list_users().await.unwrap().len(), FIXTURE_ACCOUNTS.len());
	}

	#[test]
	fn sentences_are_capitalized_and_terminated() {
		let mut rng = StdRng::seed_from_u64(3);
		let text = sentence(&mut rng, 3, 7);
		assert!(text.ends_with('.'));
		assert!(text.chars().next().is_some_and(|c| c.is_uppercase()));
	}
}
