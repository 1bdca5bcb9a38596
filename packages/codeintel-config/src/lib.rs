mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Backend, Config, Query, Service};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::invalid("service.http_bind", "must be non-empty"));
	}

	let api_base = cfg.backend.api_base.as_str();

	if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
		return Err(Error::invalid("backend.api_base", "must start with http:// or https://"));
	}
	if cfg.backend.timeout_ms == 0 {
		return Err(Error::invalid("backend.timeout_ms", "must be greater than zero"));
	}

	for (key, value) in &cfg.backend.default_headers {
		if !value.is_string() {
			let key = format!("backend.default_headers.{key}");

			return Err(Error::invalid(key, "must be a string"));
		}
	}

	if cfg.query.request_timeout_ms == 0 {
		return Err(Error::invalid("query.request_timeout_ms", "must be greater than zero"));
	}
	if cfg.query.max_concurrency == 0 {
		return Err(Error::invalid("query.max_concurrency", "must be greater than zero"));
	}
	if cfg.query.max_page_size == 0 {
		return Err(Error::invalid("query.max_page_size", "must be greater than zero"));
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let trimmed = cfg.backend.api_base.trim().trim_end_matches('/');

	if trimmed.len() != cfg.backend.api_base.len() {
		cfg.backend.api_base = trimmed.to_string();
	}
	if cfg.backend.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.backend.api_key = None;
	}
}
