// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Premium membership pricing.

use serde::Deserialize;

use crate::error::ConfigError;

const DEFAULT_PRICE_CENTS: u32 = 1500;
const DEFAULT_CURRENCY: &str = "usd";

/// Membership configuration (runtime, fully resolved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipConfig {
	/// One-time price of a premium upgrade, in the currency's minor unit.
	pub premium_price_cents: u32,
	/// ISO 4217 code, lowercase.
	pub currency: String,
}

impl Default for MembershipConfig {
	fn default() -> Self {
		Self {
			premium_price_cents: DEFAULT_PRICE_CENTS,
			currency: DEFAULT_CURRENCY.to_string(),
		}
	}
}

impl MembershipConfig {
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.premium_price_cents == 0 {
			return Err(ConfigError::Validation(
				"membership.premium_price_cents must be greater than zero".to_string(),
			));
		}

		let currency_ok =
			self.currency.len() == 3 && self.currency.chars().all(|c| c.is_ascii_lowercase());
		if !currency_ok {
			return Err(ConfigError::Validation(format!(
				"membership.currency must be a three-letter lowercase code, got '{}'",
				self.currency
			)));
		}

		Ok(())
	}
}

/// Membership configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MembershipConfigLayer {
	#[serde(default)]
	pub premium_price_cents: Option<u32>,
	#[serde(default)]
	pub currency: Option<String>,
}

impl MembershipConfigLayer {
	pub fn merge(&mut self, other: MembershipConfigLayer) {
		if other.premium_price_cents.is_some() {
			self.premium_price_cents = other.premium_price_cents;
		}
		if other.currency.is_some() {
			self.currency = other.currency;
		}
	}

	pub fn finalize(self) -> MembershipConfig {
		MembershipConfig {
			premium_price_cents: self.premium_price_cents.unwrap_or(DEFAULT_PRICE_CENTS),
			currency: self
				.currency
				.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn default_is_fifteen_dollars() {
		let config = MembershipConfigLayer::default().finalize();
		assert_eq!(config.premium_price_cents, 1500);
		assert_eq!(config.currency, "usd");
		assert!(config.validate().is_ok());
	}

	#[test]
	fn zero_price_is_rejected() {
		let config = MembershipConfig {
			premium_price_cents: 0,
			..Default::default()
		};
		assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
	}

	#[test]
	fn currency_must_be_lowercase_iso_code() {
		for bad in ["USD", "us", "usdd", "u$d", ""] {
			let config = MembershipConfig {
				currency: bad.to_string(),
				..Default::default()
			};
			assert!(config.validate().is_err(), "accepted {bad:?}");
		}
	}

	proptest! {
		#[test]
		fn any_positive_price_with_valid_currency_passes(
			price in 1u32..,
			currency in "[a-z]{3}",
		) {
			let config = MembershipConfig { premium_price_cents: price, currency };
			prop_assert!(config.validate().is_ok());
		}
	}
}
