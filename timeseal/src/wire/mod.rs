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

//! Text framing for DNS-published key material.
//!
//! Records are comma-separated `tag=value` lists. A record too large for
//! one TXT entry is split into ordered chunks published as
//! `<tag>_0.<zone>`, `<tag>_1.<zone>`, ...; the final chunk ends with
//! the literal marker `EOM`, which readers strip after reassembly. The
//! DNS transport itself (lookups, retries, caching) belongs to the
//! resolver daemon, so reassembly here is driven by a caller-supplied
//! fetch closure.

use std::collections::BTreeMap;

use crate::error::Error;

pub mod expiry;

/// Marker terminating the last chunk of a record.
pub const EOM: &str = "EOM";

/// Maximum characters per published chunk.
pub const CHUNK_CHARS: usize = 1000;

pub fn format_tag_value(tag: &str, value: &str) -> String {
	format!("{}={}", tag, value)
}

/// Parses a comma-separated `tag=value` list.
///
/// Values split on the FIRST `=` only (base64 padding survives), and
/// surrounding ASCII quotes are stripped, since TXT records often come
/// back quoted.
pub fn parse_tag_values(input: &str) -> Result<BTreeMap<String, String>, Error> {
	let mut tagged = BTreeMap::new();
	for pair in input.split(',') {
		let (tag, value) = pair.split_once('=').ok_or(Error::BadEncoding)?;
		tagged.insert(tag.to_owned(), trim_quotes(value).to_owned());
	}
	Ok(tagged)
}

fn trim_quotes(s: &str) -> &str {
	let s = s.strip_suffix('"').unwrap_or(s);
	s.strip_prefix('"').unwrap_or(s)
}

/// Splits a record payload into publishable chunks: one trailing comma is
/// dropped, the `EOM` marker appended, and the result cut into
/// [`CHUNK_CHARS`]-sized pieces.
pub fn chunk_record(payload: &str) -> Vec<String> {
	let trimmed = payload.strip_suffix(',').unwrap_or(payload);
	let terminated = format!("{}{}", trimmed, EOM);

	let chars: Vec<char> = terminated.chars().collect();
	chars
		.chunks(CHUNK_CHARS)
		.map(|chunk| chunk.iter().collect())
		.collect()
}

/// The DNS name a chunk is published under: `<tag>_<index>.<zone>`, or
/// the bare zone for the empty tag (the master record).
pub fn record_name(tag: &str, index: usize, zone: &str) -> String {
	if tag.is_empty() {
		zone.to_owned()
	} else {
		format!("{}_{}.{}", tag, index, zone)
	}
}

/// Reassembles a chunked record by pulling chunks 0, 1, ... from `fetch`
/// until one ends in [`EOM`], then strips the marker.
pub fn assemble_record<F>(mut fetch: F) -> Result<String, Error>
where
	F: FnMut(usize) -> Result<String, Error>,
{
	let mut assembled = String::new();
	for index in 0.. {
		let chunk = fetch(index)?;
		let terminated = chunk.ends_with(EOM);
		assembled.push_str(&chunk);
		if terminated {
			break;
		}
	}
	assembled.truncate(assembled.len() - EOM.len());
	Ok(assembled)
}

/// Joins an exported signature and its included Q-values into the wire
/// form `base64(sig),base64(Q_i),...`.
pub fn signature_to_wire(sig: &str, q_values: &[String]) -> String {
	let mut parts = Vec::with_capacity(q_values.len() + 1);
	parts.push(sig.to_owned());
	parts.extend_from_slice(q_values);
	parts.join(",")
}

/// Splits the signature wire form back into the signature point and its
/// Q-values.
pub fn signature_from_wire(wire: &str) -> Result<(String, Vec<String>), Error> {
	let mut parts = wire.split(',').map(str::to_owned);
	let sig = parts.next().filter(|s| !s.is_empty()).ok_or(Error::BadEncoding)?;
	Ok((sig, parts.collect()))
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn wire_tag_values_split_on_first_equals_and_strip_quotes() {
		let parsed =
			parse_tag_values("public=\"aGk=\",2020=YQ==,01=Yg==").unwrap();
		assert_eq!(parsed["public"], "aGk=");
		assert_eq!(parsed["2020"], "YQ==");
		assert_eq!(parsed["01"], "Yg==");
	}

	#[test]
	fn wire_tag_values_reject_a_bare_token() {
		assert_eq!(
			parse_tag_values("public=x,orphan"),
			Err(Error::BadEncoding)
		);
	}

	#[test]
	fn wire_chunking_round_trips() {
		// long enough to need three chunks
		let payload: String =
			std::iter::repeat("0123456789").take(250).collect();
		let chunks = chunk_record(&payload);
		assert_eq!(chunks.len(), 3);
		assert!(chunks.iter().take(2).all(|c| c.len() == CHUNK_CHARS));
		assert!(chunks.last().unwrap().ends_with(EOM));

		let assembled =
			assemble_record(|i| Ok(chunks[i].clone())).unwrap();
		assert_eq!(assembled, payload);
	}

	#[test]
	fn wire_chunking_drops_one_trailing_comma() {
		let chunks = chunk_record("2020=YQ==,01=Yg==,");
		assert_eq!(chunks, vec!["2020=YQ==,01=Yg==EOM".to_owned()]);

		let assembled = assemble_record(|_| Ok(chunks[0].clone())).unwrap();
		assert_eq!(assembled, "2020=YQ==,01=Yg==");
	}

	#[test]
	fn wire_record_names() {
		assert_eq!(
			record_name("202001", 0, "_timeseal.example.com"),
			"202001_0._timeseal.example.com"
		);
		assert_eq!(
			record_name("", 0, "_timeseal.example.com"),
			"_timeseal.example.com"
		);
	}

	#[test]
	fn wire_assemble_propagates_fetch_failures() {
		let result =
			assemble_record(|_| Err::<String, _>(Error::BadEncoding));
		assert_eq!(result, Err(Error::BadEncoding));
	}

	#[test]
	fn wire_signature_round_trips() {
		let q_values = vec!["cTE=".to_owned(), "cTI=".to_owned()];
		let wire = signature_to_wire("c2ln", &q_values);
		assert_eq!(wire, "c2ln,cTE=,cTI=");

		let (sig, qs) = signature_from_wire(&wire).unwrap();
		assert_eq!(sig, "c2ln");
		assert_eq!(qs, q_values);

		assert_eq!(signature_from_wire(""), Err(Error::BadEncoding));
	}
}
