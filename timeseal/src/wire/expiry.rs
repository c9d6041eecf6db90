/*
 * Copyright 2025 by Ideal Labs, LLC
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Time coordinates and the expiry wire format.
//!
//! A signing key lives at `[year, month, day, chunk]` where a chunk is a
//! 15-minute window of the day, indexed 0..=95. Signer and verifier MUST
//! format path segments identically: `%d` year, `%02d` month, day and
//! chunk, no separators. Everything is UTC.

use std::fmt;
use std::str::FromStr;

use chrono::{
	DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Timelike,
	Utc,
};

use crate::error::Error;

/// Minutes per expiry window.
pub const CHUNK_MINUTES: u32 = 15;

/// Windows per day.
pub const CHUNKS_PER_DAY: u32 = 24 * 60 / CHUNK_MINUTES;

/// The wire layout of the date half: Unix `date(1)` output at UTC
/// midnight, e.g. `Mon Aug  3 00:00:00 UTC 2026`.
const DATE_FORMAT: &str = "%a %b %e %H:%M:%S UTC %Y";

/// A key's expiry coordinate: a UTC day plus a 15-minute chunk of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
	pub day: NaiveDate,
	pub chunk: u32,
}

impl Expiry {
	/// The coordinate covering the given instant.
	pub fn from_datetime(at: DateTime<Utc>) -> Self {
		Expiry {
			day: at.date_naive(),
			chunk: (at.hour() * 60 + at.minute()) / CHUNK_MINUTES,
		}
	}

	/// The identity path `[year, month, day, chunk]` a signer extracts
	/// down to.
	pub fn path(&self) -> [String; 4] {
		let [year, month, day] = self.date_path();
		[year, month, day, format_two_digit(self.chunk)]
	}

	/// The `[year, month, day]` prefix, which is what DNS publishes
	/// parameters for.
	pub fn date_path(&self) -> [String; 3] {
		[
			format_year(self.day.year()),
			format_two_digit(self.day.month()),
			format_two_digit(self.day.day()),
		]
	}

	/// The instant this coordinate's window opens.
	pub fn window_start(&self) -> DateTime<Utc> {
		let midnight = Utc.from_utc_datetime(
			&self
				.day
				.and_hms_opt(0, 0, 0)
				.expect("midnight exists on every day"),
		);
		midnight + Duration::minutes((self.chunk * CHUNK_MINUTES) as i64)
	}

	/// Whether the window had already opened and passed by `now`.
	pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
		now > self.window_start()
	}
}

impl fmt::Display for Expiry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let midnight = self
			.day
			.and_hms_opt(0, 0, 0)
			.expect("midnight exists on every day");
		write!(
			f,
			"{},{}",
			midnight.format(DATE_FORMAT),
			format_two_digit(self.chunk)
		)
	}
}

impl FromStr for Expiry {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let (date_part, chunk_part) =
			s.split_once(',').ok_or(Error::BadEncoding)?;
		let date = NaiveDateTime::parse_from_str(date_part, DATE_FORMAT)
			.map_err(|_| Error::BadEncoding)?;
		let chunk: u32 =
			chunk_part.parse().map_err(|_| Error::BadEncoding)?;
		if chunk >= CHUNKS_PER_DAY {
			return Err(Error::BadEncoding);
		}
		Ok(Expiry { day: date.date(), chunk })
	}
}

/// `%d`, no padding.
pub fn format_year(year: i32) -> String {
	format!("{}", year)
}

/// `%02d`.
pub fn format_two_digit(value: u32) -> String {
	format!("{:02}", value)
}

#[cfg(test)]
mod test {
	use super::*;
	use chrono::TimeZone;

	#[test]
	fn expiry_chunk_arithmetic() {
		// 13:07 UTC -> (13*60 + 7) / 15 = 52
		let at = Utc.with_ymd_and_hms(2026, 8, 3, 13, 7, 0).unwrap();
		let expiry = Expiry::from_datetime(at);
		assert_eq!(expiry.chunk, 52);

		let midnight = Utc.with_ymd_and_hms(2026, 8, 3, 0, 0, 0).unwrap();
		assert_eq!(Expiry::from_datetime(midnight).chunk, 0);
		let last = Utc.with_ymd_and_hms(2026, 8, 3, 23, 59, 59).unwrap();
		assert_eq!(Expiry::from_datetime(last).chunk, CHUNKS_PER_DAY - 1);
	}

	#[test]
	fn expiry_paths_are_zero_padded() {
		let at = Utc.with_ymd_and_hms(2026, 8, 3, 0, 14, 0).unwrap();
		let expiry = Expiry::from_datetime(at);
		assert_eq!(expiry.path(), ["2026", "08", "03", "00"]);
		assert_eq!(expiry.date_path(), ["2026", "08", "03"]);
	}

	#[test]
	fn expiry_wire_format_round_trips() {
		let at = Utc.with_ymd_and_hms(2026, 8, 3, 13, 7, 0).unwrap();
		let expiry = Expiry::from_datetime(at);

		let wire = expiry.to_string();
		assert_eq!(wire, "Mon Aug  3 00:00:00 UTC 2026,52");
		assert_eq!(wire.parse::<Expiry>().unwrap(), expiry);

		// double-digit days too
		let at = Utc.with_ymd_and_hms(2026, 8, 14, 1, 0, 0).unwrap();
		let expiry = Expiry::from_datetime(at);
		let wire = expiry.to_string();
		assert_eq!(wire, "Fri Aug 14 00:00:00 UTC 2026,04");
		assert_eq!(wire.parse::<Expiry>().unwrap(), expiry);
	}

	#[test]
	fn expiry_rejects_malformed_wire_forms() {
		assert!("no comma here".parse::<Expiry>().is_err());
		assert!("Mon Aug  3 00:00:00 UTC 2026,96".parse::<Expiry>().is_err());
		assert!("3 Aug 2026,12".parse::<Expiry>().is_err());
	}

	#[test]
	fn expiry_window_comparison() {
		let at = Utc.with_ymd_and_hms(2026, 8, 3, 13, 7, 0).unwrap();
		let expiry = Expiry::from_datetime(at);

		let start = Utc.with_ymd_and_hms(2026, 8, 3, 13, 0, 0).unwrap();
		assert_eq!(expiry.window_start(), start);

		assert!(expiry.is_expired(start + Duration::minutes(20)));
		assert!(!expiry.is_expired(start - Duration::minutes(1)));
	}
}
