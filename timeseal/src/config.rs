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

//! On-disk configuration shared by the signing daemon and the key
//! generator.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("config io: {0}")]
	Io(#[from] io::Error),
	#[error("config parse: {0}")]
	Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
	/// Directory holding the public record files and the master secret.
	pub key_dir: PathBuf,
	/// Where the milter <-> MTA pipe lives.
	pub milter_socket: PathBuf,
	/// Where the signing daemon <-> milter pipe lives.
	pub signer_socket: PathBuf,
	/// The DNS zone public parameters are published under.
	pub zone: String,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			key_dir: PathBuf::from("~/.timeseal/"),
			milter_socket: PathBuf::from("/tmp/milter.sock"),
			signer_socket: PathBuf::from("/tmp/timeseal.sock"),
			zone: "_timeseal.example.com".to_owned(),
		}
	}
}

impl Config {
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let raw = fs::read_to_string(path)?;
		Ok(serde_json::from_str(&raw)?)
	}

	/// Writes the config as pretty-printed JSON, creating parent
	/// directories as needed.
	pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent)?;
		}
		fs::write(path, serde_json::to_string_pretty(self)?)?;
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn config_round_trips_through_disk() {
		let dir = std::env::temp_dir().join("timeseal-config-test");
		let path = dir.join("config.json");

		let config = Config {
			key_dir: PathBuf::from("/var/lib/timeseal"),
			zone: "_timeseal.test.example".to_owned(),
			..Config::default()
		};
		config.save(&path).unwrap();

		let loaded = Config::load(&path).unwrap();
		assert_eq!(loaded, config);

		fs::remove_dir_all(&dir).unwrap();
	}

	#[test]
	fn config_load_fails_cleanly_on_a_missing_file() {
		let missing = Path::new("/definitely/not/a/real/config.json");
		assert!(matches!(Config::load(missing), Err(ConfigError::Io(_))));
	}
}
