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

//! The pairing group layer over BLS12-381.
//!
//! Four concrete types: [`Scalar`] in the shared scalar field, [`G1`] and
//! [`G2`] elliptic-curve groups written additively, and [`Gt`] in the
//! target group. `Gt` is arkworks' `PairingOutput`, which spells the
//! target group additively: `+` is the target-group product, `* Scalar`
//! is exponentiation, and negation is inversion.
//!
//! Keeping the three groups as distinct types keeps the pairing
//! signature `e: G1 x G2 -> Gt` checked by the compiler.

use ark_bls12_381::Bls12_381;
use ark_ec::pairing::{Pairing, PairingOutput};
use ark_ff::Zero;

use crate::error::Error;

pub mod codec;
pub mod hash;

/// An integer in the scalar field shared by all three groups,
/// always reduced mod r.
pub type Scalar = ark_bls12_381::Fr;

/// The small source group; signature points and identity hashes live here.
pub type G1 = ark_bls12_381::G1Projective;

/// The large source group; public parameters and Q-values live here.
pub type G2 = ark_bls12_381::G2Projective;

/// The target group of the pairing.
pub type Gt = PairingOutput<Bls12_381>;

/// The bilinear pairing `e(p, q)`.
pub fn pair(p: &G1, q: &G2) -> Gt {
	Bls12_381::pairing(*p, *q)
}

/// The product of pairings over two equal-length slices,
/// `prod_i e(p_i, q_i)`, computed with shared Miller loops.
///
/// Verifiers lean on this being one multi-pairing rather than a loop of
/// single pairings. Empty inputs return the `Gt` identity.
pub fn product_pair(ps: &[G1], qs: &[G2]) -> Result<Gt, Error> {
	if ps.len() != qs.len() {
		return Err(Error::LengthMismatch { left: ps.len(), right: qs.len() });
	}
	if ps.is_empty() {
		return Ok(Gt::zero());
	}
	Ok(Bls12_381::multi_pairing(ps.iter().copied(), qs.iter().copied()))
}

#[cfg(test)]
mod test {
	use super::*;
	use ark_std::{test_rng, UniformRand};

	#[test]
	fn group_product_pair_matches_single_pairings() {
		let mut rng = test_rng();
		let ps: Vec<G1> = (0..100).map(|_| G1::rand(&mut rng)).collect();
		let qs: Vec<G2> = (0..100).map(|_| G2::rand(&mut rng)).collect();

		let folded = ps
			.iter()
			.zip(qs.iter())
			.fold(Gt::zero(), |acc, (p, q)| acc + pair(p, q));
		let batched = product_pair(&ps, &qs).unwrap();

		assert_eq!(folded, batched);
	}

	#[test]
	fn group_product_pair_of_nothing_is_identity() {
		let result = product_pair(&[], &[]).unwrap();
		assert_eq!(result, Gt::zero());

		// the identity is absorbing under the group operation
		let mut rng = test_rng();
		let gt = pair(&G1::rand(&mut rng), &G2::rand(&mut rng));
		assert_eq!(gt + result, gt);
	}

	#[test]
	fn group_product_pair_rejects_mismatched_lengths() {
		let mut rng = test_rng();
		let ps: Vec<G1> = (0..2).map(|_| G1::rand(&mut rng)).collect();
		let qs: Vec<G2> = (0..3).map(|_| G2::rand(&mut rng)).collect();

		assert_eq!(
			product_pair(&ps, &qs),
			Err(Error::LengthMismatch { left: 2, right: 3 })
		);
	}

	#[test]
	fn group_pairing_is_bilinear() {
		let mut rng = test_rng();
		let p = G1::rand(&mut rng);
		let q = G2::rand(&mut rng);
		let a = Scalar::rand(&mut rng);
		let b = Scalar::rand(&mut rng);

		assert_eq!(pair(&(p * a), &(q * b)), pair(&p, &q) * (a * b));
	}

	#[test]
	fn group_gt_exponent_round_trips_through_both_sides() {
		let mut rng = test_rng();
		let p = G1::rand(&mut rng);
		let q = G2::rand(&mut rng);
		let e = Scalar::rand(&mut rng);

		let lhs = pair(&(p * e), &q);
		let rhs = pair(&p, &(q * e));
		assert_eq!(lhs, rhs);
		assert_ne!(lhs, pair(&p, &q));
	}
}
