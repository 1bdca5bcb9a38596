use std::{io, path::PathBuf};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read config file {}: {source}", path.display())]
	ReadConfig { path: PathBuf, source: io::Error },
	#[error("Failed to parse config file {}: {source}", path.display())]
	ParseConfig { path: PathBuf, source: toml::de::Error },
	/// `key` is the dotted TOML path of the offending setting.
	#[error("{key} {requirement}.")]
	Validation { key: String, requirement: &'static str },
}
impl Error {
	pub(crate) fn invalid(key: impl Into<String>, requirement: &'static str) -> Self {
		Self::Validation { key: key.into(), requirement }
	}
}
