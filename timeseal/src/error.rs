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

use thiserror::Error;

/// Structural failures surfaced to callers.
///
/// Verification APIs report honest rejections as `Ok(false)` / `false`;
/// an `Error` always means the input could not even be interpreted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
	/// A base64 string, hex string, or compressed group element failed
	/// to decode.
	#[error("bad base64, hex, or compressed-point encoding")]
	BadEncoding,

	/// Two vectors that must pair up element-wise have different lengths.
	#[error("mismatched lengths: {left} vs {right}")]
	LengthMismatch { left: usize, right: usize },

	/// A ciphertext's blinding values do not fit the identity path it
	/// claims to be encrypted under.
	#[error("ciphertext does not match the identity path")]
	MalformedCiphertext,

	/// A serialized proof transcript has the wrong number of fields.
	#[error("proof transcript has the wrong number of fields")]
	MalformedTranscript,
}
