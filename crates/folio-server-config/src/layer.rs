// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration, as produced by a single source.

use serde::Deserialize;

use crate::sections::{DatabaseConfigLayer, LoggingConfigLayer, MembershipConfigLayer};

/// One source's view of the configuration. Unset sections are `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub database: Option<DatabaseConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
	#[serde(default)]
	pub membership: Option<MembershipConfigLayer>,
}

impl ServerConfigLayer {
	/// Overlays `other` on top of `self`. Values set in `other` win.
	pub fn merge(&mut self, other: ServerConfigLayer) {
		merge_section(&mut self.database, other.database, DatabaseConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
		merge_section(&mut self.membership, other.membership, MembershipConfigLayer::merge);
	}
}

fn merge_section<T>(target: &mut Option<T>, other: Option<T>, merge: fn(&mut T, T)) {
	match (target.as_mut(), other) {
		(Some(existing), Some(other)) => merge(existing, other),
		(None, Some(other)) => *target = Some(other),
		(_, None) => {}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_partial_toml() {
		let layer: ServerConfigLayer = toml::from_str(
			r#"
			[database]
			url = "sqlite:/var/lib/folio/folio.db"
			"#,
		)
		.unwrap();

		assert_eq!(
			layer.database.and_then(|d| d.url).as_deref(),
			Some("sqlite:/var/lib/folio/folio.db")
		);
		assert!(layer.logging.is_none());
		assert!(layer.membership.is_none());
	}

	#[test]
	fn later_layer_overrides_set_fields_only() {
		let mut base = ServerConfigLayer {
			logging: Some(LoggingConfigLayer {
				level: Some("debug".to_string()),
				format: None,
			}),
			membership: Some(MembershipConfigLayer {
				premium_price_cents: Some(2000),
				currency: Some("eur".to_string()),
			}),
			..Default::default()
		};

		base.merge(ServerConfigLayer {
			membership: Some(MembershipConfigLayer {
				premium_price_cents: Some(900),
				currency: None,
			}),
			..Default::default()
		});

		let membership = base.membership.unwrap();
		assert_eq!(membership.premium_price_cents, Some(900));
		assert_eq!(membership.currency.as_deref(), Some("eur"));
		assert_eq!(base.logging.unwrap().level.as_deref(), Some("debug"));
	}

	#[test]
	fn empty_layer_merge_is_noop() {
		let mut base = ServerConfigLayer {
			database: Some(DatabaseConfigLayer {
				url: Some("sqlite::memory:".to_string()),
			}),
			..Default::default()
		};
		base.merge(ServerConfigLayer::default());
		assert_eq!(
			base.database.unwrap().url.as_deref(),
			Some("sqlite::memory:")
		);
	}
}
