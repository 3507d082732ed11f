// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Membership roles, the wiki data model and the wiki authorization policy.
//!
//! This crate is pure: it holds no connections and performs no I/O. The
//! persistence layer loads [`User`]s and [`WikiWithCollaborators`] snapshots,
//! and request handlers ask [`abac`] for decisions about them.

pub mod abac;
pub mod error;
pub mod types;
pub mod user;
pub mod wiki;

pub use abac::{Action, Actor, ActorAttrs, WikiAttrs, WikiResource};
pub use error::{AuthzError, AuthzResult};
pub use types::{CollaboratorId, Role, UnknownRole, UserId, WikiId};
pub use user::{RoleChange, User};
pub use wiki::{Collaborator, Wiki, WikiChanges, WikiParams, WikiWithCollaborators};
