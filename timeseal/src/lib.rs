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

//! Short-lived, hierarchically-derived signatures for email-like messages.
//!
//! A sender signs under a time coordinate (year, month, day, 15-minute
//! chunk) with a key extracted from a Gentry-Silverberg hierarchy; any
//! verifier checks the signature against the master public parameters and
//! the per-coordinate Q-values published in DNS. Once a leaf key expires
//! it can be published without endangering any signature outside its
//! subtree. The [`timeforge`] module adds a deniability layer: an OR-proof
//! that the signer knows either a long-term key or a fresh timestamp
//! credential.

#![warn(
	unused,
	future_incompatible,
	nonstandard_style,
	rust_2018_idioms,
	rust_2021_compatibility
)]
#![deny(unsafe_code)]

pub mod bbs;
pub mod config;
pub mod error;
pub mod group;
pub mod hibs;
pub mod timeforge;
pub mod wire;
pub mod zone;

pub use error::Error;
