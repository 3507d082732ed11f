// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite persistence for users, wikis and collaborators.
//!
//! Each table has a store trait for callers to depend on and a repository
//! that implements it over a [`sqlx::SqlitePool`].

pub mod error;
pub mod migrations;
pub mod pool;
mod rows;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod user;
pub mod wiki;

pub use error::{DbError, Result};
pub use migrations::run_migrations;
pub use pool::create_pool;
pub use user::{UserRepository, UserStore};
pub use wiki::{WikiRepository, WikiStore};
