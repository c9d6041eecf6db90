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

//! Hashing into the groups and mask generation.

use ark_bls12_381::g1;
use ark_ec::{
	hashing::{
		curve_maps::wb::WBMap, map_to_curve_hasher::MapToCurveBasedHasher,
		HashToCurve,
	},
	AffineRepr,
};
use ark_ff::field_hashers::DefaultFieldHasher;
use sha2::{Digest, Sha256};
use sha3::{
	digest::{ExtendableOutput, Update, XofReader},
	Shake256,
};

use crate::group::{Scalar, G1};

/// Prefix byte for message hashes bound into signatures.
pub const SIGNING_PREFIX: u8 = b'0';
/// Prefix byte for identity-segment hashes used in the key hierarchy.
pub const IDENTITY_PREFIX: u8 = b'1';

const DOMAIN: &[u8] = b"TIMESEAL-V01-CS01-with-BLS12381G1_XMD:SHA-256_SSWU_RO_";

/// sha256 hasher
pub fn sha256(b: &[u8]) -> [u8; 32] {
	let mut hasher = Sha256::new();
	Digest::update(&mut hasher, b);
	hasher.finalize().into()
}

/// Maps raw bytes onto a point of G1 with the curve's native
/// Wahby-Boneh map.
pub fn hash_to_g1(bytes: &[u8]) -> G1 {
	let hasher = MapToCurveBasedHasher::<
		G1,
		DefaultFieldHasher<Sha256, 128>,
		WBMap<g1::Config>,
	>::new(DOMAIN)
	.expect("the domain separation tag is valid");
	hasher
		.hash(bytes)
		.expect("hashing to the curve cannot fail on byte input")
		.into_group()
}

/// A map from bytes to the scalar field, `SHA256(b) mod r`.
pub fn hash_to_scalar(b: &[u8]) -> Scalar {
	crate::group::codec::scalar_from_be_bytes(&sha256(b))
}

/// SHAKE-256 expansion of `input`. At least 64 bytes are squeezed from
/// the sponge regardless of how few are requested.
pub fn long_hash(input: &[u8], len: usize) -> Vec<u8> {
	let mut out = vec![0u8; core::cmp::max(len, 64)];
	let mut sponge = Shake256::default();
	sponge.update(input);
	sponge.finalize_xof().read(&mut out);
	out.truncate(len);
	out
}

/// One-time-pad style masking: `message (+) long_hash(key_material)`.
pub fn xor_with_long_hash(message: &[u8], key_material: &[u8]) -> Vec<u8> {
	let mask = long_hash(key_material, message.len());
	message.iter().zip(mask.iter()).map(|(m, k)| m ^ k).collect()
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn hash_sha256_is_the_reference_function() {
		let actual = sha256(b"test");
		let expected = [
			159, 134, 208, 129, 136, 76, 125, 101, 154, 47, 234, 160, 197, 90,
			208, 21, 163, 191, 79, 27, 43, 11, 130, 44, 209, 93, 108, 21, 176,
			240, 10, 8,
		];
		assert_eq!(actual, expected);
	}

	#[test]
	fn hash_to_g1_is_deterministic_and_collision_free_on_inputs() {
		let a = hash_to_g1(b"TEST");
		let b = hash_to_g1(b"TEST");
		assert_eq!(a, b);

		let c = hash_to_g1(b"TEST2");
		assert_ne!(a, c);
	}

	#[test]
	fn hash_long_hash_extends_and_truncates() {
		// short requests still drain a 64-byte sponge prefix
		let short = long_hash(b"input", 3);
		assert_eq!(short.len(), 3);
		let long = long_hash(b"input", 200);
		assert_eq!(long.len(), 200);
		// the short output is a prefix of the long one
		assert_eq!(short[..], long[..3]);
	}

	#[test]
	fn hash_xor_mask_is_an_involution() {
		let message = b"attack at dawn".to_vec();
		let masked = xor_with_long_hash(&message, b"key material");
		assert_ne!(masked, message);
		assert_eq!(xor_with_long_hash(&masked, b"key material"), message);
	}
}
