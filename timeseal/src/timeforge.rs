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

//! TimeForge: a non-interactive OR-proof binding a signature to time.
//!
//! The signer proves knowledge of EITHER the long-term key behind
//! `pk = sk * g1` OR a timestamp credential `A = (tsk + t)^{-1} * g1`
//! issued by the [`crate::bbs`] timestamp service, while committing to
//! the timestamp with a Pedersen commitment `B = t*g1 + r*h`. A verifier
//! learns that one branch holds but not which; once the timestamp
//! service's per-window secrets are published, anyone could have forged
//! the credential branch, which is exactly the deniability the scheme is
//! after.
//!
//! The proof is a Fiat-Shamir transform of a sigma-protocol OR
//! composition: the credential branch is simulated under a chosen
//! challenge half `c1` (Lemma 4.1 of Boneh-Boyen-Shacham group
//! signatures), the knowledge branch answers the complementary half
//! `c2 = c (+) c1` honestly, and the transcript hash `c` binds both to
//! the message.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use ark_bls12_381::{G1Affine, G2Affine};
use ark_ec::AffineRepr;
use ark_ff::UniformRand;
use ark_std::rand::Rng;
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::bbs;
use crate::error::Error;
use crate::group::{self, codec, Scalar, G1, G2, Gt};

/// Public half of a TimeForge identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
	pub g1: G1,
	pub u: G1,
	pub v: G1,
	pub h: G1,
	pub g2: G2,
	pub w: G2,
	/// Public key of the timestamp service whose credentials the
	/// simulated branch refers to.
	pub server: bbs::PublicKey,
	/// `sk * g1`
	pub pk: G1,
}

/// The sender's secrets; wiped from memory on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
	pub y: Scalar,
	pub sk: Scalar,
}

/// A TimeForge keypair.
pub struct TimeForge {
	pub public: PublicKey,
	secret: SecretKey,
}

/// A full proof transcript.
///
/// `c2` is carried as raw bytes: it is the XOR of a hash image with a
/// scalar encoding and is generally not below the group order. It is
/// reduced mod r only where it scales a point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
	pub t1: G1,
	pub t2: G1,
	pub t3: G1,
	pub t4: G1,
	pub t5: G1,
	pub b: G1,
	pub r: G1,
	pub c1: Scalar,
	pub c2: [u8; 32],
	pub s: Scalar,
	pub sa: Scalar,
	pub sb: Scalar,
	pub sx: Scalar,
	pub ss1: Scalar,
	pub ss2: Scalar,
	pub s2: Scalar,
	pub s3: Scalar,
	pub s4: Scalar,
}

impl TimeForge {
	/// Samples a sender keypair bound to the given timestamp service.
	pub fn generate<R: Rng>(server: bbs::PublicKey, rng: &mut R) -> Self {
		let y = Scalar::rand(rng);
		let sk = Scalar::rand(rng);

		let g1 = G1Affine::generator().into_group();
		let g2 = G2Affine::generator().into_group();

		let public = PublicKey {
			g1,
			u: G1::rand(rng),
			v: G1::rand(rng),
			h: G1::rand(rng),
			g2,
			w: g2 * y,
			server,
			pk: g1 * sk,
		};
		TimeForge { public, secret: SecretKey { y, sk } }
	}

	/// Signs `message`, committing to the current wall-clock time.
	pub fn sign<R: Rng>(&self, message: &str, rng: &mut R) -> Signature {
		let now = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.expect("system clock is before the unix epoch")
			.as_secs();
		self.sign_at(message, now, rng)
	}

	/// Signs `message` committing to an explicit unix timestamp.
	///
	/// The signing daemon computes its expiry window before calling in,
	/// and tests want determinism, so the clock read stays separable.
	pub fn sign_at<R: Rng>(
		&self,
		message: &str,
		timestamp: u64,
		rng: &mut R,
	) -> Signature {
		let p = &self.public;

		// Pedersen commitment to the timestamp
		let t = Scalar::from(timestamp);
		let r = Scalar::rand(rng);
		let b = p.g1 * t + p.h * r;

		// the challenge half answered by the simulated credential branch
		let c1 = Scalar::rand(rng);

		// simulate the credential branch under c1: commitments first
		let alpha = Scalar::rand(rng);
		let beta = Scalar::rand(rng);
		let a = G1::rand(rng);
		let t1 = p.u * alpha;
		let t2 = p.v * beta;
		let t3 = a + p.h * (alpha + beta);

		// then the simulated responses
		let sa = Scalar::rand(rng);
		let sb = Scalar::rand(rng);
		let sx = Scalar::rand(rng);
		let ss1 = Scalar::rand(rng);
		let ss2 = Scalar::rand(rng);

		let r1 = p.u * sa - t1 * c1;
		let r2 = p.v * sb - t2 * c1;
		let (_, _, r3) = credential_commitment(p, &t3, c1, sa, sb, sx, ss1, ss2);
		let r4 = t1 * sx - p.u * ss1;
		let r5 = t2 * sx - p.v * ss2;

		// opening of B under the simulated challenge
		let s2 = Scalar::rand(rng);
		let t4 = p.g1 * sx + p.h * s2 - b * c1;

		// honest Schnorr commitment for the knowledge branch
		let k = Scalar::rand(rng);
		let r_point = p.g1 * k;

		let (c, c3) =
			challenge(p, &t1, &t2, &t3, &r1, &r2, &r3, &r4, &r5, &r_point, message);

		// split the challenge: c2 = c (+) c1, and answer c2 honestly
		let c2 = xor_32(&c, &codec::scalar_to_bytes(&c1));
		let s = self.secret.sk * codec::scalar_from_be_bytes(&c2) + k;

		// fresh 256-bit nonces opening B under the truncated challenge c3
		let mut tau1_bytes = [0u8; 32];
		rng.fill_bytes(&mut tau1_bytes);
		let mut tau2_bytes = [0u8; 32];
		rng.fill_bytes(&mut tau2_bytes);
		let tau1 = codec::scalar_from_be_bytes(&tau1_bytes);
		let tau2 = codec::scalar_from_be_bytes(&tau2_bytes);

		let t5 = p.g1 * tau1 + p.h * tau2;
		let s3 = t * c3 + tau1;
		let s4 = r * c3 + tau2;

		Signature {
			t1,
			t2,
			t3,
			t4,
			t5,
			b,
			r: r_point,
			c1,
			c2,
			s,
			sa,
			sb,
			sx,
			ss1,
			ss2,
			s2,
			s3,
			s4,
		}
	}

	pub fn verify(&self, message: &str, signature: &Signature) -> bool {
		self.public.verify(message, signature)
	}
}

impl PublicKey {
	/// Recomputes the simulated commitments and the transcript hash,
	/// then checks the seven acceptance equations. Any failure is an
	/// honest rejection.
	pub fn verify(&self, message: &str, sig: &Signature) -> bool {
		let r1 = self.u * sig.sa - sig.t1 * sig.c1;
		let r2 = self.v * sig.sb - sig.t2 * sig.c1;
		let (numerator, pre_challenge, r3) = credential_commitment(
			self, &sig.t3, sig.c1, sig.sa, sig.sb, sig.sx, sig.ss1, sig.ss2,
		);
		let r4 = sig.t1 * sig.sx - self.u * sig.ss1;
		let r5 = sig.t2 * sig.sx - self.v * sig.ss2;

		let (c, c3) = challenge(
			self, &sig.t1, &sig.t2, &sig.t3, &r1, &r2, &r3, &r4, &r5, &sig.r,
			message,
		);

		// (a) the challenge halves recombine: c1 == c (+) c2
		if xor_32(&c, &sig.c2) != codec::scalar_to_bytes(&sig.c1) {
			return false;
		}

		// (b), (c) credential-branch response equations
		if self.u * sig.sa != sig.t1 * sig.c1 + r1 {
			return false;
		}
		if self.v * sig.sb != sig.t2 * sig.c1 + r2 {
			return false;
		}

		// (d) the pairing-product identity behind R3
		if numerator != pre_challenge * sig.c1 + r3 {
			return false;
		}

		// (e) knowledge branch: s*g1 == R + c2*pk
		let c2 = codec::scalar_from_be_bytes(&sig.c2);
		if self.g1 * sig.s != sig.r + self.pk * c2 {
			return false;
		}

		// (f) opening of B under c3
		if self.g1 * sig.s3 + self.h * sig.s4 != sig.b * c3 + sig.t5 {
			return false;
		}

		// (g) opening of B under c1
		if self.g1 * sig.sx + self.h * sig.s2 != sig.b * sig.c1 + sig.t4 {
			return false;
		}

		true
	}
}

/// The R3 identity shared by signer and verifier:
///
/// `R3 = e(T3,g2)^sx * e(h,w)^(sa*sb) * e(h,g2)^(ss1*ss2)
///       * [e(T3,w) / e(g1,g2)]^c1`
///
/// Returned as (numerator, pre-challenge quotient, full R3) because the
/// verifier's check (d) reuses the first two.
#[allow(clippy::too_many_arguments)]
fn credential_commitment(
	public: &PublicKey,
	t3: &G1,
	c1: Scalar,
	sa: Scalar,
	sb: Scalar,
	sx: Scalar,
	ss1: Scalar,
	ss2: Scalar,
) -> (Gt, Gt, Gt) {
	let numerator = group::pair(t3, &public.g2) * sx
		+ group::pair(&public.h, &public.w) * (sa * sb)
		+ group::pair(&public.h, &public.g2) * (ss1 * ss2);
	let pre_challenge =
		group::pair(&public.g1, &public.g2) - group::pair(t3, &public.w);
	let r3 = numerator - pre_challenge * c1;
	(numerator, pre_challenge, r3)
}

/// The Fiat-Shamir transcript hash and its truncated companion.
///
/// `c  = SHA256(T1 || T2 || T3 || R1..R5 || PK || server || R || message)`
/// `c3 = SHA256(transcript || "1")`, low 32 bits.
///
/// Signer and verifier must feed byte-identical transcripts; everything
/// here is the compressed encoding.
#[allow(clippy::too_many_arguments)]
fn challenge(
	public: &PublicKey,
	t1: &G1,
	t2: &G1,
	t3: &G1,
	r1: &G1,
	r2: &G1,
	r3: &Gt,
	r4: &G1,
	r5: &G1,
	r_point: &G1,
	message: &str,
) -> ([u8; 32], Scalar) {
	let mut hasher = Sha256::new();
	hasher.update(codec::to_bytes(t1));
	hasher.update(codec::to_bytes(t2));
	hasher.update(codec::to_bytes(t3));
	hasher.update(codec::to_bytes(r1));
	hasher.update(codec::to_bytes(r2));
	hasher.update(codec::to_bytes(r3));
	hasher.update(codec::to_bytes(r4));
	hasher.update(codec::to_bytes(r5));
	hasher.update(codec::to_bytes(&public.pk));
	hasher.update(public.server.to_string().as_bytes());
	hasher.update(codec::to_bytes(r_point));
	hasher.update(message.as_bytes());

	let c: [u8; 32] = hasher.clone().finalize().into();

	hasher.update(b"1");
	let tagged: [u8; 32] = hasher.finalize().into();
	let c3 = codec::scalar_from_be_bytes(&tagged[28..]);

	(c, c3)
}

/// XOR of two big-endian byte strings of at most 32 bytes, both
/// left-padded with zeros to 32. Scalar exports can come in at 31 bytes;
/// signer and verifier must agree on the alignment.
fn xor_32(a: &[u8], b: &[u8]) -> [u8; 32] {
	assert!(a.len() <= 32 && b.len() <= 32, "xor operands exceed 32 bytes");
	let mut out = [0u8; 32];
	for (i, byte) in a.iter().enumerate() {
		out[32 - a.len() + i] = *byte;
	}
	for (i, byte) in b.iter().enumerate() {
		out[32 - b.len() + i] ^= *byte;
	}
	out
}

impl fmt::Display for Signature {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let fields = [
			codec::to_base64(&self.t1),
			codec::to_base64(&self.t2),
			codec::to_base64(&self.t3),
			codec::to_base64(&self.t4),
			codec::to_base64(&self.t5),
			codec::to_base64(&self.b),
			codec::to_base64(&self.r),
			codec::scalar_to_hex(&self.c1),
			hex::encode(self.c2),
			codec::scalar_to_hex(&self.s),
			codec::scalar_to_hex(&self.sa),
			codec::scalar_to_hex(&self.sb),
			codec::scalar_to_hex(&self.sx),
			codec::scalar_to_hex(&self.ss1),
			codec::scalar_to_hex(&self.ss2),
			codec::scalar_to_hex(&self.s2),
			codec::scalar_to_hex(&self.s3),
			codec::scalar_to_hex(&self.s4),
		];
		write!(f, "{}", fields.join(","))
	}
}

impl FromStr for Signature {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let parts: Vec<&str> = s.split(',').collect();
		if parts.len() != 18 {
			return Err(Error::MalformedTranscript);
		}

		let c2_bytes = hex::decode(parts[8]).map_err(|_| Error::BadEncoding)?;
		if c2_bytes.len() > 32 {
			return Err(Error::BadEncoding);
		}
		let mut c2 = [0u8; 32];
		c2[32 - c2_bytes.len()..].copy_from_slice(&c2_bytes);

		Ok(Signature {
			t1: codec::from_base64(parts[0])?,
			t2: codec::from_base64(parts[1])?,
			t3: codec::from_base64(parts[2])?,
			t4: codec::from_base64(parts[3])?,
			t5: codec::from_base64(parts[4])?,
			b: codec::from_base64(parts[5])?,
			r: codec::from_base64(parts[6])?,
			c1: codec::scalar_from_hex(parts[7])?,
			c2,
			s: codec::scalar_from_hex(parts[9])?,
			sa: codec::scalar_from_hex(parts[10])?,
			sb: codec::scalar_from_hex(parts[11])?,
			sx: codec::scalar_from_hex(parts[12])?,
			ss1: codec::scalar_from_hex(parts[13])?,
			ss2: codec::scalar_from_hex(parts[14])?,
			s2: codec::scalar_from_hex(parts[15])?,
			s3: codec::scalar_from_hex(parts[16])?,
			s4: codec::scalar_from_hex(parts[17])?,
		})
	}
}
