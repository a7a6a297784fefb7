mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, Daily, LlmProviderConfig, Postgres, Providers, Query, Service, Storage, Tags,
	WebSearchProviderConfig,
};

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
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::invalid("storage.postgres.pool_max_conns", "must be greater than zero"));
	}
	if cfg.providers.llm.api_key.trim().is_empty() {
		return Err(Error::invalid("providers.llm.api_key", "must be non-empty"));
	}
	if !cfg.providers.llm.temperature.is_finite() {
		return Err(Error::invalid("providers.llm.temperature", "must be a finite number"));
	}

	for (key, timeout_ms) in [
		("providers.llm.timeout_ms", cfg.providers.llm.timeout_ms),
		("providers.web_search.timeout_ms", cfg.providers.web_search.timeout_ms),
		("query.stage_timeout_ms", cfg.query.stage_timeout_ms),
	] {
		if timeout_ms == 0 {
			return Err(Error::invalid(key, "must be greater than zero"));
		}
	}

	validate_query(&cfg.query)?;
	validate_tags(&cfg.tags)?;

	if cfg.daily.tag_count == 0 {
		return Err(Error::invalid("daily.tag_count", "must be greater than zero"));
	}
	if cfg.daily.article_count == 0 {
		return Err(Error::invalid("daily.article_count", "must be greater than zero"));
	}
	if cfg.daily.retrieve_count < cfg.daily.article_count {
		return Err(Error::invalid(
			"daily.retrieve_count",
			"must be greater than or equal to daily.article_count",
		));
	}

	Ok(())
}

fn validate_query(query: &Query) -> Result<()> {
	for (key, weight) in
		[("query.llm_weight", query.llm_weight), ("query.interest_weight", query.interest_weight)]
	{
		if !weight.is_finite() {
			return Err(Error::invalid(key, "must be a finite number"));
		}
		if weight < 0.0 {
			return Err(Error::invalid(key, "must be zero or greater"));
		}
	}

	for (key, count) in [
		("query.result_count", query.result_count),
		("query.candidate_count", query.candidate_count),
		("query.retrieve_count", query.retrieve_count),
	] {
		if count == 0 {
			return Err(Error::invalid(key, "must be greater than zero"));
		}
	}

	if query.result_count > query.candidate_count {
		return Err(Error::invalid(
			"query.result_count",
			"must be less than or equal to query.candidate_count",
		));
	}
	if query.web_search_count > query.candidate_count {
		return Err(Error::invalid(
			"query.web_search_count",
			"must be less than or equal to query.candidate_count",
		));
	}

	Ok(())
}

fn validate_tags(tags: &Tags) -> Result<()> {
	for (key, value) in [
		("tags.click_score", tags.click_score),
		("tags.bookmark_score", tags.bookmark_score),
		("tags.similar_tag_weight", tags.similar_tag_weight),
	] {
		if !value.is_finite() {
			return Err(Error::invalid(key, "must be a finite number"));
		}
	}

	if !(tags.time_scaling_factor > 0.0 && tags.time_scaling_factor <= 1.0) {
		return Err(Error::invalid("tags.time_scaling_factor", "must be in the range (0.0, 1.0]"));
	}
	if !tags.removal_threshold.is_finite() || tags.removal_threshold < 0.0 {
		return Err(Error::invalid("tags.removal_threshold", "must be zero or greater"));
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg
		.providers
		.web_search
		.categories
		.as_deref()
		.map(|categories| categories.trim().is_empty())
		.unwrap_or(false)
	{
		cfg.providers.web_search.categories = None;
	}
	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}
}
