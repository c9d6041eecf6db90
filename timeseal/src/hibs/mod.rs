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

//! Gentry-Silverberg hierarchical identity-based signatures and
//! encryption.
//!
//! Identities are paths of opaque byte strings (here: year, month, day,
//! 15-minute chunk). Key extraction is deterministic in the master
//! secret, so a signer can rebuild any subtree from the master alone:
//! `s_t = H(id_t || s_{t-1}) mod r`. Extracted nodes are memoized in an
//! arena and live as long as the instance.
//!
//! An instance is a single-writer object: the node arena and the
//! identity-hash cache are mutated during extraction and verification,
//! and the type is deliberately not `Sync`. Confine one instance per
//! worker or serialize access externally.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use ark_ff::{UniformRand, Zero};
use ark_std::rand::Rng;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::Error;
use crate::group::{self, codec, hash, Scalar, G1, G2};

mod entity;

pub use entity::{Entity, EntityId};
use entity::Arena;

/// Master public parameters: a random G2 generator and its multiple by
/// the master secret, `Q0 = s * P0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameters {
	pub p0: G2,
	pub q0: G2,
}

/// The master secret scalar; wiped from memory on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
struct MasterSecret(Scalar);

/// A hierarchical signature: the signature point plus the Q-values of the
/// signing leaf's ancestry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
	pub sig: G1,
	pub q_values: Vec<G2>,
}

impl Signature {
	/// Rebuilds a signature from wire parts: the base64 signature point
	/// and one base64 Q-value per level of the path being verified.
	/// Q-values trimmed at export time are recovered from DNS by the
	/// caller and spliced back in here.
	pub fn from_parts<Q: AsRef<str>>(
		sig: &str,
		q_values: &[Q],
	) -> Result<Self, Error> {
		let sig = codec::from_base64(sig)?;
		let q_values = q_values
			.iter()
			.map(|q| codec::from_base64(q.as_ref()))
			.collect::<Result<Vec<G2>, Error>>()?;
		Ok(Signature { sig, q_values })
	}
}

/// A hierarchical ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ciphertext {
	/// `r * P0`
	pub u0: G2,
	/// `r * P_i` for every level past the first
	pub u_values: Vec<G1>,
	/// message (+) long_hash(e(P_1, Q0)^r)
	pub v: Vec<u8>,
}

/// A Gentry-Silverberg hierarchy.
///
/// Built either with a fresh master keypair ([`Hibs::setup`]) or from
/// exported parameters ([`Hibs::import_public`], optionally followed by
/// [`Hibs::import_master_secret`]). Verification and encryption need only
/// the public half; extraction, signing and decryption need the master
/// secret and panic without one.
pub struct Hibs {
	params: Parameters,
	master: Option<MasterSecret>,
	arena: Arena,
	hash_cache: RefCell<HashMap<String, G1>>,
}

impl core::fmt::Debug for Hibs {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Hibs")
			.field("params", &self.params)
			.field("master", &self.master.as_ref().map(|_| "<redacted>"))
			.field("arena", &self.arena)
			.field("hash_cache", &self.hash_cache)
			.finish()
	}
}

impl Hibs {
	/// Samples a fresh master keypair.
	pub fn setup<R: Rng>(rng: &mut R) -> Self {
		let p0 = G2::rand(rng);
		let s = Scalar::rand(rng);
		let q0 = p0 * s;
		Hibs {
			params: Parameters { p0, q0 },
			master: Some(MasterSecret(s)),
			arena: Arena::default(),
			hash_cache: RefCell::new(HashMap::new()),
		}
	}

	pub fn params(&self) -> &Parameters {
		&self.params
	}

	/// The master secret scalar, if this instance holds one.
	pub fn master_secret(&self) -> Option<&Scalar> {
		self.master.as_ref().map(|m| &m.0)
	}

	/// Hashes an identity segment (or, with `signing`, a message) onto
	/// G1.
	///
	/// The two uses are domain-separated by an ASCII prefix byte: '0'
	/// for message hashes, '1' for identity hashes. Identity hashes are
	/// memoized; message hashes are one-shot per signature and are not.
	pub fn public_key_hash(&self, id: &str, signing: bool) -> G1 {
		if signing {
			let mut input = Vec::with_capacity(id.len() + 1);
			input.push(hash::SIGNING_PREFIX);
			input.extend_from_slice(id.as_bytes());
			return hash::hash_to_g1(&hash::sha256(&input));
		}

		let key = format!("{}{}", hash::IDENTITY_PREFIX as char, id);
		if let Some(cached) = self.hash_cache.borrow().get(&key) {
			return *cached;
		}
		let point = hash::hash_to_g1(&hash::sha256(key.as_bytes()));
		self.hash_cache.borrow_mut().insert(key, point);
		point
	}

	/// Extracts the child entity `id` under `parent` (`None` for a
	/// root-level child), creating and memoizing it on first use.
	///
	/// Derivation is a pure function of the path and the master secret:
	/// `s_t = H(id_t || s_{t-1}) mod r` with `s_0` the master secret,
	/// `S_t = S_{t-1} + s_{t-1} * P_t`, `Q_t = s_t * P0`.
	pub fn extract(&mut self, id: &str, parent: Option<EntityId>) -> EntityId {
		if let Some(existing) = self.arena.child(parent, id) {
			return existing;
		}

		let (parent_scalar, parent_point, parent_qs) = match parent {
			Some(p) => {
				let node = self.arena.get(p);
				(node.derivation, node.secret_point, node.q_values.clone())
			},
			None => {
				let master = self
					.master
					.as_ref()
					.expect("extraction requires the master secret");
				(master.0, G1::zero(), Vec::new())
			},
		};

		let public = self.public_key_hash(id, false);

		let mut material = Vec::with_capacity(id.len() + 32);
		material.extend_from_slice(id.as_bytes());
		material.extend_from_slice(&codec::scalar_to_bytes(&parent_scalar));
		let derivation = codec::scalar_from_be_bytes(&hash::sha256(&material));

		let secret_point = parent_point + public * parent_scalar;
		let q_t = self.params.p0 * derivation;

		let mut q_values = parent_qs;
		q_values.push(q_t);

		self.arena.insert(Entity {
			id: id.to_owned(),
			derivation,
			secret_point,
			public,
			q_values,
			parent,
			children: BTreeMap::new(),
		})
	}

	/// Folds [`Hibs::extract`] along `path` and returns the leaf.
	pub fn extract_path<P: AsRef<str>>(&mut self, path: &[P]) -> EntityId {
		let mut node = None;
		for id in path {
			node = Some(self.extract(id.as_ref(), node));
		}
		node.expect("identity paths must not be empty")
	}

	pub fn entity(&self, id: EntityId) -> &Entity {
		self.arena.get(id)
	}

	/// Signs `message` under the leaf at `path`:
	/// `Sig = S_t + s_t * H1('0' || message)`. Never fails.
	pub fn sign<P: AsRef<str>>(
		&mut self,
		message: &str,
		path: &[P],
	) -> Signature {
		let leaf_id = self.extract_path(path);
		let p_m = self.public_key_hash(message, true);
		let leaf = self.arena.get(leaf_id);

		let sig = leaf.secret_point + p_m * leaf.derivation;
		Signature { sig, q_values: leaf.q_values.clone() }
	}

	/// Signs and exports wire parts: the base64 signature point plus the
	/// trailing `include` Q-values. Ancestry above the split point is
	/// already in DNS, so the wire only carries the suffix.
	pub fn export_sign<P: AsRef<str>>(
		&mut self,
		message: &str,
		path: &[P],
		include: usize,
	) -> (String, Vec<String>) {
		let signature = self.sign(message, path);
		let start = signature.q_values.len().saturating_sub(include);
		let q_values = signature.q_values[start..]
			.iter()
			.map(|q| codec::to_base64(q))
			.collect();
		(codec::to_base64(&signature.sig), q_values)
	}

	/// Checks `sig` over `message` and `path` against the master public
	/// parameters with a single product pairing:
	///
	/// `e(Sig, P0) == e(P_1, Q0) * prod_{i>=2} e(P_i, Q_{i-1}) * e(P_M, Q_t)`
	///
	/// `Ok(false)` is an honest rejection; an error means the Q-list
	/// does not even match the path's shape.
	pub fn verify<P: AsRef<str>>(
		&self,
		sig: &Signature,
		message: &str,
		path: &[P],
	) -> Result<bool, Error> {
		if path.is_empty() || sig.q_values.len() != path.len() {
			return Err(Error::LengthMismatch {
				left: sig.q_values.len(),
				right: path.len(),
			});
		}

		let p_m = self.public_key_hash(message, true);

		let mut g1_vals = Vec::with_capacity(path.len() + 1);
		let mut g2_vals = Vec::with_capacity(path.len() + 1);

		g1_vals.push(self.public_key_hash(path[0].as_ref(), false));
		g2_vals.push(self.params.q0);

		for i in 1..path.len() {
			g1_vals.push(self.public_key_hash(path[i].as_ref(), false));
			g2_vals.push(sig.q_values[i - 1]);
		}

		g1_vals.push(p_m);
		g2_vals.push(*sig.q_values.last().expect("path is non-empty"));

		let rhs = group::product_pair(&g1_vals, &g2_vals)?;
		let lhs = group::pair(&sig.sig, &self.params.p0);

		Ok(lhs == rhs)
	}

	/// Encrypts `message` to whoever can extract the leaf at `path`.
	pub fn encrypt<P: AsRef<str>, R: Rng>(
		&self,
		path: &[P],
		message: &[u8],
		rng: &mut R,
	) -> Ciphertext {
		let r = Scalar::rand(rng);
		let u0 = self.params.p0 * r;

		let mut p1 = None;
		let mut u_values = Vec::with_capacity(path.len().saturating_sub(1));
		for (i, id) in path.iter().enumerate() {
			let p_t = self.public_key_hash(id.as_ref(), false);
			if i == 0 {
				p1 = Some(p_t);
			} else {
				u_values.push(p_t * r);
			}
		}
		let p1 = p1.expect("identity paths must not be empty");

		let gr = group::pair(&p1, &self.params.q0) * r;
		let v = hash::xor_with_long_hash(message, &codec::to_bytes(&gr));

		Ciphertext { u0, u_values, v }
	}

	/// Decrypts a ciphertext addressed to the leaf at `path`.
	pub fn decrypt<P: AsRef<str>>(
		&mut self,
		path: &[P],
		ciphertext: &Ciphertext,
	) -> Result<Vec<u8>, Error> {
		let leaf_id = self.extract_path(path);
		let leaf = self.arena.get(leaf_id);

		if ciphertext.u_values.len() + 1 != leaf.q_values.len() {
			return Err(Error::MalformedCiphertext);
		}

		let denominator = group::product_pair(
			&ciphertext.u_values,
			&leaf.q_values[..ciphertext.u_values.len()],
		)?;
		let num = group::pair(&leaf.secret_point, &ciphertext.u0) - denominator;

		Ok(hash::xor_with_long_hash(&ciphertext.v, &codec::to_bytes(&num)))
	}

	/// Exports the master public parameters: base64 of the
	/// length-prefixed (u32 big-endian) compressed `P0 || Q0`.
	pub fn export_public(&self) -> String {
		let p0 = codec::to_bytes(&self.params.p0);
		let q0 = codec::to_bytes(&self.params.q0);

		let mut buf = Vec::with_capacity(p0.len() + q0.len() + 8);
		buf.extend_from_slice(&(p0.len() as u32).to_be_bytes());
		buf.extend_from_slice(&p0);
		buf.extend_from_slice(&(q0.len() as u32).to_be_bytes());
		buf.extend_from_slice(&q0);

		base64::encode(buf)
	}

	/// Builds a verify/encrypt-only instance from exported public
	/// parameters.
	pub fn import_public(encoded: &str) -> Result<Self, Error> {
		let raw = base64::decode(encoded).map_err(|_| Error::BadEncoding)?;

		let (p0_bytes, rest) = take_length_prefixed(&raw)?;
		let (q0_bytes, _) = take_length_prefixed(rest)?;

		let p0 = codec::from_bytes(p0_bytes)?;
		let q0 = codec::from_bytes(q0_bytes)?;

		Ok(Hibs {
			params: Parameters { p0, q0 },
			master: None,
			arena: Arena::default(),
			hash_cache: RefCell::new(HashMap::new()),
		})
	}

	/// Exports the master secret as base64-wrapped hex.
	///
	/// Panics on a verify-only instance.
	pub fn export_master_secret(&self) -> String {
		let master = self
			.master
			.as_ref()
			.expect("this instance holds no master secret");
		base64::encode(codec::scalar_to_hex(&master.0))
	}

	/// Installs a master secret from its exported form, resetting any
	/// previously extracted tree.
	pub fn import_master_secret(&mut self, encoded: &str) -> Result<(), Error> {
		let raw = base64::decode(encoded).map_err(|_| Error::BadEncoding)?;
		let hex_str = String::from_utf8(raw).map_err(|_| Error::BadEncoding)?;
		let s = codec::scalar_from_hex(&hex_str)?;

		self.master = Some(MasterSecret(s));
		self.arena = Arena::default();
		Ok(())
	}

	/// Exports the derivation scalar of the leaf at `path` as
	/// base64-wrapped hex. Publishing this once the leaf's window has
	/// passed is what makes old signatures deniable.
	pub fn export_leaf_secret<P: AsRef<str>>(&mut self, path: &[P]) -> String {
		let leaf = self.extract_path(path);
		base64::encode(codec::scalar_to_hex(&self.arena.get(leaf).derivation))
	}
}

fn take_length_prefixed(buf: &[u8]) -> Result<(&[u8], &[u8]), Error> {
	if buf.len() < 4 {
		return Err(Error::BadEncoding);
	}
	let len = u32::from_be_bytes(
		buf[..4].try_into().expect("slice is exactly four bytes"),
	) as usize;
	if buf.len() < 4 + len {
		return Err(Error::BadEncoding);
	}
	Ok((&buf[4..4 + len], &buf[4 + len..]))
}
