// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Premium membership: one-time payment upgrades and explicit downgrades.
//!
//! The card is charged through a [`PaymentGateway`]. The user's role only
//! changes after the gateway reports success.

use std::sync::Arc;

use async_trait::async_trait;
use folio_server_auth::{Role, RoleChange, User, UserId};
use folio_server_config::MembershipConfig;
use folio_server_db::UserStore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, WikiError};

/// Opaque card token issued by the payment provider's client-side widget.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CardToken(String);

impl CardToken {
	pub fn new(token: impl Into<String>) -> Self {
		Self(token.into())
	}

	pub fn expose(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Debug for CardToken {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("CardToken([REDACTED])")
	}
}

/// A single charge sent to the gateway.
#[derive(Debug, Clone)]
pub struct ChargeRequest {
	pub email: String,
	pub card_token: CardToken,
	/// Minor units of `currency`.
	pub amount_cents: u32,
	pub currency: String,
	pub description: String,
}

/// What the gateway returns for a successful charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeReceipt {
	pub charge_id: String,
	pub amount_cents: u32,
	pub currency: String,
}

/// Details shown on the checkout form before a card is entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutDetails {
	pub description: String,
	pub amount_cents: u32,
	pub currency: String,
}

#[derive(Debug, Error)]
pub enum PaymentError {
	/// The card was refused. The message comes from the provider and is safe to show.
	#[error("{0}")]
	CardDeclined(String),

	#[error("payment gateway error: {0}")]
	Gateway(String),
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
	async fn charge(&self, request: &ChargeRequest) -> std::result::Result<ChargeReceipt, PaymentError>;
}

pub fn charge_description(email: &str) -> String {
	format!("Premium Membership - {email}")
}

#[derive(Clone)]
pub struct MembershipService {
	users: Arc<dyn UserStore>,
	gateway: Option<Arc<dyn PaymentGateway>>,
	config: MembershipConfig,
}

impl MembershipService {
	/// A service that can apply role changes but cannot take payments.
	pub fn new(users: Arc<dyn UserStore>, config: MembershipConfig) -> Self {
		Self {
			users,
			gateway: None,
			config,
		}
	}

	pub fn with_gateway(mut self, gateway: Arc<dyn PaymentGateway>) -> Self {
		self.gateway = Some(gateway);
		self
	}

	/// Price and description for the checkout form.
	pub fn checkout_details(&self, user: &User) -> CheckoutDetails {
		CheckoutDetails {
			description: charge_description(&user.email),
			amount_cents: self.config.premium_price_cents,
			currency: self.config.currency.clone(),
		}
	}

	pub fn charge_request(&self, user: &User, card_token: CardToken) -> ChargeRequest {
		ChargeRequest {
			email: user.email.clone(),
			card_token,
			amount_cents: self.config.premium_price_cents,
			currency: self.config.currency.clone(),
			description: charge_description(&user.email),
		}
	}

	/// Charges the user's card and upgrades them on success.
	///
	/// Premium and admin users are not charged; they get
	/// [`RoleChange::Unchanged`] back.
	///
	/// # Errors
	/// Returns `WikiError::Payment` if no gateway is configured or the gateway
	/// refuses the charge. The user's role is left untouched in that case.
	#[instrument(skip(self, card_token), fields(%user_id))]
	pub async fn purchase_premium(&self, user_id: UserId, card_token: CardToken) -> Result<RoleChange> {
		let user = self.load_user(user_id).await?;
		if user.role != Role::Standard {
			tracing::info!(%user_id, role = %user.role, "premium already held, not charging");
			return Ok(RoleChange::Unchanged { role: user.role });
		}

		let gateway = self
			.gateway
			.as_ref()
			.ok_or_else(|| PaymentError::Gateway("no payment gateway configured".to_string()))?;
		let request = self.charge_request(&user, card_token);

		let receipt = gateway.charge(&request).await.map_err(|e| {
			tracing::warn!(%user_id, error = %e, "premium charge failed");
			e
		})?;

		tracing::info!(
			%user_id,
			charge_id = %receipt.charge_id,
			amount_cents = receipt.amount_cents,
			"premium charge captured"
		);

		self.complete_upgrade(user_id).await
	}

	/// Applies a successful payment to the user's role.
	///
	/// Standard users become premium. Premium and admin users are unchanged.
	#[instrument(skip(self), fields(%user_id))]
	pub async fn complete_upgrade(&self, user_id: UserId) -> Result<RoleChange> {
		let mut user = self.load_user(user_id).await?;
		let change = user.apply_premium_payment();
		self.persist(&user, &change).await?;
		Ok(change)
	}

	/// Returns a premium user to standard. A no-op for any other role.
	#[instrument(skip(self), fields(%user_id))]
	pub async fn downgrade(&self, user_id: UserId) -> Result<RoleChange> {
		let mut user = self.load_user(user_id).await?;
		let change = user.apply_downgrade();
		self.persist(&user, &change).await?;
		Ok(change)
	}

	async fn load_user(&self, user_id: UserId) -> Result<User> {
		self
			.users
			.get_user_by_id(&user_id)
			.await?
			.ok_or_else(|| WikiError::not_found(format!("user {user_id}")))
	}

	async fn persist(&self, user: &User, change: &RoleChange) -> Result<()> {
		match change {
			RoleChange::Changed { from, to } => {
				if !self.users.update_role(&user.id, *to).await? {
					return Err(WikiError::not_found(format!("user {}", user.id)));
				}
				tracing::info!(user_id = %user.id, %from, %to, "membership role changed");
			}
			RoleChange::Unchanged { role } => {
				tracing::debug!(user_id = %user.id, %role, "membership role unchanged");
			}
		}
		Ok(())
	}
}
