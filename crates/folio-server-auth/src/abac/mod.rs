// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Attribute-based access control for wikis.
//!
//! - [`is_allowed`] decides a single (actor, action, wiki) triple
//! - [`scope`] filters a listing down to what an actor may see
//!
//! Nothing in this module performs I/O. Callers load a consistent snapshot of
//! the actor, the wiki and its collaborators, then evaluate against it.

mod engine;
pub mod policies;
mod scope;
mod types;

pub use engine::{authorize, is_allowed, is_allowed_on_collection};
pub use scope::{scope, scope_into};
pub use types::{Action, Actor, ActorAttrs, WikiAttrs, WikiResource};
