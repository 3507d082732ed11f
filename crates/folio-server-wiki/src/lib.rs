// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wiki request handling and premium membership.
//!
//! [`WikiService`] runs the wiki handlers against the policy engine in
//! `folio-server-auth` and the stores in `folio-server-db`.
//! [`MembershipService`] charges for premium and applies role changes.

pub mod error;
pub mod membership;
pub mod service;

pub use error::{Result, WikiError};
pub use membership::{
	CardToken, ChargeReceipt, ChargeRequest, CheckoutDetails, MembershipService, PaymentError,
	PaymentGateway,
};
pub use service::WikiService;
