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

use std::collections::BTreeMap;

use crate::group::{codec, Scalar, G1, G2};

/// Handle to a node of the extraction tree.
///
/// Handles are only meaningful against the instance that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EntityId(pub(crate) usize);

/// One node of the key hierarchy.
///
/// A node at depth `t` under identity path `id_1, ..., id_t` carries its
/// derivation scalar `s_t`, its aggregated secret point
/// `S_t = S_{t-1} + s_{t-1} * P_t`, the hash point `P_t` of its own
/// identity segment, and the Q-values `[s_1 * P0, ..., s_t * P0]`
/// collected along its ancestry.
#[derive(Debug, Clone)]
pub struct Entity {
	pub(crate) id: String,
	pub(crate) derivation: Scalar,
	pub(crate) secret_point: G1,
	pub(crate) public: G1,
	pub(crate) q_values: Vec<G2>,
	pub(crate) parent: Option<EntityId>,
	pub(crate) children: BTreeMap<String, EntityId>,
}

impl Entity {
	/// The identity segment this node answers for.
	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn parent(&self) -> Option<EntityId> {
		self.parent
	}

	/// Q-values along the ancestry, root child first, this node last.
	pub fn q_values(&self) -> &[G2] {
		&self.q_values
	}

	/// The metadata a verifier needs for this node: base64 of its own
	/// (final) Q-value. This is the per-day blob published in DNS.
	pub fn params(&self) -> String {
		let q = self
			.q_values
			.last()
			.expect("every entity carries at least its own Q-value");
		codec::to_base64(q)
	}
}

/// Flat storage for the entity tree.
///
/// Nodes never move and are never evicted, so an [`EntityId`] stays valid
/// for the lifetime of the instance; the parent back-reference is an
/// index instead of an owning edge.
#[derive(Debug, Default)]
pub(crate) struct Arena {
	nodes: Vec<Entity>,
	roots: BTreeMap<String, EntityId>,
}

impl Arena {
	pub fn get(&self, id: EntityId) -> &Entity {
		&self.nodes[id.0]
	}

	pub fn child(&self, parent: Option<EntityId>, id: &str) -> Option<EntityId> {
		match parent {
			Some(p) => self.nodes[p.0].children.get(id).copied(),
			None => self.roots.get(id).copied(),
		}
	}

	pub fn insert(&mut self, entity: Entity) -> EntityId {
		let handle = EntityId(self.nodes.len());
		let parent = entity.parent;
		let id = entity.id.clone();
		self.nodes.push(entity);
		match parent {
			Some(p) => {
				self.nodes[p.0].children.insert(id, handle);
			},
			None => {
				self.roots.insert(id, handle);
			},
		}
		handle
	}
}
