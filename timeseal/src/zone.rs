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

//! Assembles the DNS publication set for a span of days.
//!
//! The master record (under the bare zone name) carries the master
//! public parameters plus one Q-value per covered year; each year record
//! carries its months' Q-values; each month record carries its days'.
//! Anything below the day (the 15-minute chunks) is extracted on demand
//! by the signer and never published ahead of time.
//!
//! Output is the record *content*; writing zone files or pushing TXT
//! updates belongs to the generator binary.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};

use crate::hibs::Hibs;
use crate::wire::{self, expiry};

/// One publishable TXT record chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRecord {
	/// Fully qualified record name, e.g. `2026_0._timeseal.example.com`.
	pub name: String,
	/// Chunk content, `EOM`-terminated on the final chunk of a record.
	pub content: String,
}

#[derive(Debug, Default)]
struct YearKeys {
	params: String,
	months: BTreeMap<u32, MonthKeys>,
}

#[derive(Debug, Default)]
struct MonthKeys {
	params: String,
	days: BTreeMap<u32, String>,
}

/// Walks `days` consecutive days starting at `start`, extracting the
/// `[year, month, day]` node for each, and returns every record the zone
/// needs, chunked and named.
pub fn build(
	hierarchy: &mut Hibs,
	start: NaiveDate,
	days: u32,
	zone: &str,
) -> Vec<ZoneRecord> {
	let mut years: BTreeMap<i32, YearKeys> = BTreeMap::new();

	let mut date = start;
	for _ in 0..days {
		let path = [
			expiry::format_year(date.year()),
			expiry::format_two_digit(date.month()),
			expiry::format_two_digit(date.day()),
		];

		let day_node = hierarchy.extract_path(&path);
		let month_node = hierarchy
			.entity(day_node)
			.parent()
			.expect("a day node sits under a month node");
		let year_node = hierarchy
			.entity(month_node)
			.parent()
			.expect("a month node sits under a year node");

		let year = years.entry(date.year()).or_default();
		if year.params.is_empty() {
			year.params = hierarchy.entity(year_node).params();
		}

		let month = year.months.entry(date.month()).or_default();
		if month.params.is_empty() {
			month.params = hierarchy.entity(month_node).params();
		}

		month
			.days
			.insert(date.day(), hierarchy.entity(day_node).params());

		date = date + Duration::days(1);
	}

	let mut records = Vec::new();

	let mut master_payload =
		wire::format_tag_value("public", &hierarchy.export_public());
	for (year_number, year) in &years {
		let year_tag = expiry::format_year(*year_number);
		master_payload.push(',');
		master_payload
			.push_str(&wire::format_tag_value(&year_tag, &year.params));

		let mut month_payload = String::new();
		for (month_number, month) in &year.months {
			let month_tag = expiry::format_two_digit(*month_number);
			month_payload
				.push_str(&wire::format_tag_value(&month_tag, &month.params));
			month_payload.push(',');

			let mut day_payload = String::new();
			for (day_number, day_params) in &month.days {
				day_payload.push_str(&wire::format_tag_value(
					&expiry::format_two_digit(*day_number),
					day_params,
				));
				day_payload.push(',');
			}

			push_record(
				&mut records,
				&format!("{}{}", year_tag, month_tag),
				&day_payload,
				zone,
			);
		}

		push_record(&mut records, &year_tag, &month_payload, zone);
	}

	push_record(&mut records, "", &master_payload, zone);

	records
}

fn push_record(
	records: &mut Vec<ZoneRecord>,
	tag: &str,
	payload: &str,
	zone: &str,
) {
	for (index, content) in wire::chunk_record(payload).into_iter().enumerate()
	{
		records.push(ZoneRecord {
			name: wire::record_name(tag, index, zone),
			content,
		});
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use ark_std::test_rng;

	const ZONE: &str = "_timeseal.example.com";

	fn record<'a>(
		records: &'a [ZoneRecord],
		name: &str,
	) -> &'a ZoneRecord {
		records
			.iter()
			.find(|r| r.name == name)
			.unwrap_or_else(|| panic!("missing record {}", name))
	}

	#[test]
	fn zone_build_covers_a_month_boundary() {
		let mut rng = test_rng();
		let mut h = Hibs::setup(&mut rng);

		// Jan 30 + 4 days crosses into February
		let start = NaiveDate::from_ymd_opt(2026, 1, 30).unwrap();
		let records = build(&mut h, start, 4, ZONE);

		let master = wire::assemble_record(|i| {
			Ok(record(&records, &wire::record_name("", i, ZONE)).content.clone())
		})
		.unwrap();
		let master = wire::parse_tag_values(&master).unwrap();
		assert_eq!(master["public"], h.export_public());
		assert!(master.contains_key("2026"));

		let year = wire::assemble_record(|i| {
			Ok(record(&records, &wire::record_name("2026", i, ZONE))
				.content
				.clone())
		})
		.unwrap();
		let year = wire::parse_tag_values(&year).unwrap();
		assert!(year.contains_key("01"));
		assert!(year.contains_key("02"));

		let january = wire::assemble_record(|i| {
			Ok(record(&records, &wire::record_name("202601", i, ZONE))
				.content
				.clone())
		})
		.unwrap();
		let january = wire::parse_tag_values(&january).unwrap();
		assert_eq!(
			january.keys().collect::<Vec<_>>(),
			vec!["30", "31"]
		);

		let february = wire::assemble_record(|i| {
			Ok(record(&records, &wire::record_name("202602", i, ZONE))
				.content
				.clone())
		})
		.unwrap();
		let february = wire::parse_tag_values(&february).unwrap();
		assert_eq!(february.keys().collect::<Vec<_>>(), vec!["01", "02"]);
	}

	#[test]
	fn zone_records_carry_the_published_q_values() {
		let mut rng = test_rng();
		let mut h = Hibs::setup(&mut rng);

		let start = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
		let records = build(&mut h, start, 1, ZONE);

		let august = wire::assemble_record(|i| {
			Ok(record(&records, &wire::record_name("202608", i, ZONE))
				.content
				.clone())
		})
		.unwrap();
		let august = wire::parse_tag_values(&august).unwrap();

		let day = h.extract_path(&["2026", "08", "03"]);
		assert_eq!(august["03"], h.entity(day).params());
	}

	#[test]
	fn zone_long_records_are_chunked_in_order() {
		let mut rng = test_rng();
		let mut h = Hibs::setup(&mut rng);

		// 31 base64 Q-values at ~128 chars each overflow one chunk
		let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
		let records = build(&mut h, start, 31, ZONE);

		let chunked: Vec<_> = records
			.iter()
			.filter(|r| r.name.starts_with("202601_"))
			.collect();
		assert!(chunked.len() > 1);
		assert!(chunked.last().unwrap().content.ends_with(wire::EOM));

		let assembled = wire::assemble_record(|i| {
			Ok(record(&records, &wire::record_name("202601", i, ZONE))
				.content
				.clone())
		})
		.unwrap();
		let january = wire::parse_tag_values(&assembled).unwrap();
		assert_eq!(january.len(), 31);
	}
}
