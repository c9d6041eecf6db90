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

//! Import/export of group elements and scalars.
//!
//! Group elements travel in their compressed form, base64 on text
//! boundaries. Scalars travel as lowercase big-endian hex; any import is
//! reduced mod r.

use ark_ff::{BigInteger, PrimeField};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

use crate::error::Error;
use crate::group::Scalar;

/// Compressed binary form of a group element.
pub fn to_bytes<T: CanonicalSerialize>(value: &T) -> Vec<u8> {
	let mut out = Vec::with_capacity(value.compressed_size());
	value
		.serialize_compressed(&mut out)
		.expect("serialization into a Vec cannot fail");
	out
}

/// Reads a group element from its compressed form, validating that the
/// bytes name a point on the curve in the right subgroup.
pub fn from_bytes<T: CanonicalDeserialize>(bytes: &[u8]) -> Result<T, Error> {
	T::deserialize_compressed(bytes).map_err(|_| Error::BadEncoding)
}

/// Base64 of the compressed form.
pub fn to_base64<T: CanonicalSerialize>(value: &T) -> String {
	base64::encode(to_bytes(value))
}

pub fn from_base64<T: CanonicalDeserialize>(encoded: &str) -> Result<T, Error> {
	let bytes = base64::decode(encoded).map_err(|_| Error::BadEncoding)?;
	from_bytes(&bytes)
}

/// Canonical 32-byte big-endian form of a scalar.
pub fn scalar_to_bytes(scalar: &Scalar) -> [u8; 32] {
	scalar
		.into_bigint()
		.to_bytes_be()
		.try_into()
		.expect("the scalar field fits 32 bytes")
}

/// Interprets big-endian bytes as an integer and reduces it mod r.
pub fn scalar_from_be_bytes(bytes: &[u8]) -> Scalar {
	Scalar::from_be_bytes_mod_order(bytes)
}

pub fn scalar_to_hex(scalar: &Scalar) -> String {
	hex::encode(scalar_to_bytes(scalar))
}

/// Reads a big-endian hex scalar. Odd-length strings get an implied
/// leading zero nibble; the value is reduced mod r.
pub fn scalar_from_hex(encoded: &str) -> Result<Scalar, Error> {
	let padded;
	let normalized = if encoded.len() % 2 == 1 {
		padded = format!("0{}", encoded);
		&padded
	} else {
		encoded
	};
	let bytes = hex::decode(normalized).map_err(|_| Error::BadEncoding)?;
	Ok(scalar_from_be_bytes(&bytes))
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::group::{G1, G2, Gt};
	use ark_ff::One;
	use ark_std::{test_rng, UniformRand};

	#[test]
	fn codec_points_round_trip_through_bytes_and_base64() {
		let mut rng = test_rng();

		let p = G1::rand(&mut rng);
		assert_eq!(p, from_bytes::<G1>(&to_bytes(&p)).unwrap());
		assert_eq!(p, from_base64::<G1>(&to_base64(&p)).unwrap());

		let q = G2::rand(&mut rng);
		assert_eq!(q, from_bytes::<G2>(&to_bytes(&q)).unwrap());

		let e = crate::group::pair(&p, &q);
		assert_eq!(e, from_base64::<Gt>(&to_base64(&e)).unwrap());
	}

	#[test]
	fn codec_rejects_garbage() {
		assert_eq!(from_base64::<G1>("not base64!"), Err(Error::BadEncoding));
		assert_eq!(from_bytes::<G1>(&[0xAB; 7]), Err(Error::BadEncoding));
		assert_eq!(scalar_from_hex("zzzz"), Err(Error::BadEncoding));
	}

	#[test]
	fn codec_scalar_hex_round_trips() {
		let mut rng = test_rng();
		for _ in 0..8 {
			let s = Scalar::rand(&mut rng);
			assert_eq!(s, scalar_from_hex(&scalar_to_hex(&s)).unwrap());
		}
	}

	#[test]
	fn codec_scalar_hex_tolerates_odd_length() {
		let s = scalar_from_hex("f").unwrap();
		assert_eq!(s, Scalar::from(15u64));

		let one = scalar_from_hex("1").unwrap();
		assert!(one.is_one());
	}

	#[test]
	fn codec_scalar_import_reduces_mod_r() {
		// 2^256 - 1 is far above the group order
		let all_ones = [0xFFu8; 32];
		let reduced = scalar_from_be_bytes(&all_ones);
		assert_eq!(reduced, scalar_from_hex(&hex::encode(all_ones)).unwrap());
		// the reduced value re-exports canonically, below 32 bytes of 0xFF
		assert_ne!(scalar_to_bytes(&reduced), all_ones);
	}
}
