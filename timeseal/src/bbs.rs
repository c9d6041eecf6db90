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

//! The Boneh-Boyen-Shacham short signature.
//!
//! See "Short Signatures Without Random Oracles". A signature is a single
//! G1 point plus a scalar: `sigma = (x + H(m) + y*r)^{-1} * g1`, checked
//! as `e(sigma, u + H(m)*g2 + r*v) == e(g1, g2)` with `u = x*g2` and
//! `v = y*g2`. The timestamp service hands these out as short-lived
//! credentials consumed by the OR-proof in [`crate::timeforge`].

use std::fmt;
use std::str::FromStr;

use ark_bls12_381::{G1Affine, G2Affine};
use ark_ec::AffineRepr;
use ark_ff::{Field, UniformRand};
use ark_std::rand::Rng;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::Error;
use crate::group::{self, codec, hash, Scalar, G1, G2, Gt};

/// The signing scalars; wiped from memory on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
	pub x: Scalar,
	pub y: Scalar,
}

/// Everything a verifier needs: the generators, `u = x*g2`, `v = y*g2`
/// and the precomputed pairing `z = e(g1, g2)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
	pub g1: G1,
	pub g2: G2,
	pub u: G2,
	pub v: G2,
	pub z: Gt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
	pub sigma: G1,
	pub r: Scalar,
}

/// A BBS keypair.
pub struct Bbs {
	pub public: PublicKey,
	pub secret: SecretKey,
}

impl Bbs {
	pub fn generate<R: Rng>(rng: &mut R) -> Self {
		let x = Scalar::rand(rng);
		let y = Scalar::rand(rng);

		let g1 = G1Affine::generator().into_group();
		let g2 = G2Affine::generator().into_group();
		let z = group::pair(&g1, &g2);

		let public = PublicKey { g1, g2, u: g2 * x, v: g2 * y, z };
		Bbs { public, secret: SecretKey { x, y } }
	}

	/// `sigma = (x + H(m) + y*r)^{-1} * g1` for a fresh `r`.
	///
	/// `r` is resampled in the (negligible) case that the denominator
	/// lands on zero, so signing always succeeds.
	pub fn sign<R: Rng>(&self, message: &str, rng: &mut R) -> Signature {
		let m = hash::hash_to_scalar(message.as_bytes());
		loop {
			let r = Scalar::rand(rng);
			let denominator = self.secret.x + m + self.secret.y * r;
			if let Some(exponent) = denominator.inverse() {
				return Signature { sigma: self.public.g1 * exponent, r };
			}
		}
	}
}

impl PublicKey {
	/// `e(sigma, u + H(m)*g2 + r*v) == z`
	pub fn verify(&self, message: &str, signature: &Signature) -> bool {
		let m = hash::hash_to_scalar(message.as_bytes());
		let rhs = self.u + self.g2 * m + self.v * signature.r;
		group::pair(&signature.sigma, &rhs) == self.z
	}
}

impl fmt::Display for PublicKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{},{},{},{},{}",
			codec::to_base64(&self.g1),
			codec::to_base64(&self.g2),
			codec::to_base64(&self.u),
			codec::to_base64(&self.v),
			codec::to_base64(&self.z),
		)
	}
}

impl FromStr for PublicKey {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let parts: Vec<&str> = s.split(',').collect();
		if parts.len() != 5 {
			return Err(Error::BadEncoding);
		}
		Ok(PublicKey {
			g1: codec::from_base64(parts[0])?,
			g2: codec::from_base64(parts[1])?,
			u: codec::from_base64(parts[2])?,
			v: codec::from_base64(parts[3])?,
			z: codec::from_base64(parts[4])?,
		})
	}
}

impl fmt::Display for SecretKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{},{}",
			codec::scalar_to_hex(&self.x),
			codec::scalar_to_hex(&self.y)
		)
	}
}

impl FromStr for SecretKey {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let parts: Vec<&str> = s.split(',').collect();
		if parts.len() != 2 {
			return Err(Error::BadEncoding);
		}
		Ok(SecretKey {
			x: codec::scalar_from_hex(parts[0])?,
			y: codec::scalar_from_hex(parts[1])?,
		})
	}
}
