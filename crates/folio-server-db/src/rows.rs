// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use std::str::FromStr;

use crate::error::DbError;

pub(crate) fn parse_id<T: FromStr>(raw: &str, kind: &str) -> Result<T, DbError> {
	raw
		.parse()
		.map_err(|_| DbError::Internal(format!("Invalid {kind} ID: {raw}")))
}

pub(crate) fn parse_timestamp(raw: &str, field: &str) -> Result<DateTime<Utc>, DbError> {
	DateTime::parse_from_rfc3339(raw)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("Invalid {field}: {e}")))
}
