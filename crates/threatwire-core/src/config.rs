use crate::app_config::{AppConfig, Environment};
use crate::keywords::{
    KeywordTiers, DEFAULT_CRITICAL_KEYWORDS, DEFAULT_HIGH_KEYWORDS, DEFAULT_MEDIUM_KEYWORDS,
};
use crate::ConfigError;

const DEFAULT_FEEDS: &str = "https://krebsonsecurity.com/feed/,\
https://www.bleepingcomputer.com/feed/,\
https://feeds.feedburner.com/TheHackersNews,\
https://www.darkreading.com/rss.xml,\
https://www.securityweek.com/feed/,\
https://feeds.feedburner.com/eset/blog";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation are decoupled from the real environment so tests
/// can drive them with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let value = parse_usize(var, default)?;
        if value == 0 {
            return Err(invalid(var, "must be greater than zero".to_string()));
        }
        Ok(value)
    };

    let openai_api_key = require("OPENAI_API_KEY")?;

    let env = parse_environment(&or_default("THREATWIRE_ENV", "development"))?;
    let bind_addr = or_default("THREATWIRE_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("THREATWIRE_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("THREATWIRE_LOG_LEVEL", "info");

    let feeds = parse_feeds(&or_default("THREATWIRE_FEEDS", DEFAULT_FEEDS))?;
    let articles_per_feed = parse_positive("THREATWIRE_ARTICLES_PER_FEED", "3")?;
    let content_max_length = parse_positive("THREATWIRE_CONTENT_MAX_LENGTH", "12000")?;
    let content_min_length = parse_positive("THREATWIRE_CONTENT_MIN_LENGTH", "500")?;
    if content_min_length > content_max_length {
        return Err(invalid(
            "THREATWIRE_CONTENT_MIN_LENGTH",
            format!("must not exceed THREATWIRE_CONTENT_MAX_LENGTH ({content_max_length})"),
        ));
    }

    let keyword_tiers = KeywordTiers::from_lists(
        &or_default(
            "THREATWIRE_THREAT_KEYWORDS_CRITICAL",
            DEFAULT_CRITICAL_KEYWORDS,
        ),
        &or_default("THREATWIRE_THREAT_KEYWORDS_HIGH", DEFAULT_HIGH_KEYWORDS),
        &or_default("THREATWIRE_THREAT_KEYWORDS_MEDIUM", DEFAULT_MEDIUM_KEYWORDS),
    );

    let storage_dir = PathBuf::from(or_default("THREATWIRE_STORAGE_DIR", "./articles"));
    let public_base_url = or_default(
        "THREATWIRE_PUBLIC_BASE_URL",
        "http://localhost:3000/articles",
    )
    .trim_end_matches('/')
    .to_string();

    let llm_base_url = or_default("THREATWIRE_LLM_BASE_URL", "https://api.openai.com/v1");
    let llm_model = or_default("THREATWIRE_LLM_MODEL", "gpt-4");
    let llm_title_model = or_default("THREATWIRE_LLM_TITLE_MODEL", "gpt-3.5-turbo");
    let llm_max_tokens = parse_u32("THREATWIRE_LLM_MAX_TOKENS", "3000")?;
    let llm_timeout_secs = parse_u64("THREATWIRE_LLM_TIMEOUT_SECS", "120")?;
    let llm_max_retries = parse_u32("THREATWIRE_LLM_MAX_RETRIES", "3")?;
    let llm_backoff_base_ms = parse_u64("THREATWIRE_LLM_BACKOFF_BASE_MS", "1000")?;
    let llm_min_response_chars = parse_usize("THREATWIRE_LLM_MIN_RESPONSE_CHARS", "200")?;
    let rewrite_titles = parse_bool(
        "THREATWIRE_REWRITE_TITLES",
        &or_default("THREATWIRE_REWRITE_TITLES", "true"),
    )?;

    let scraper_request_timeout_secs = parse_u64("THREATWIRE_SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default("THREATWIRE_SCRAPER_USER_AGENT", DEFAULT_USER_AGENT);
    let max_concurrent_requests = parse_positive("THREATWIRE_MAX_CONCURRENT_REQUESTS", "4")?;
    let article_timeout_secs = parse_u64("THREATWIRE_ARTICLE_TIMEOUT_SECS", "300")?;
    let run_deadline_secs = parse_u64("THREATWIRE_RUN_DEADLINE_SECS", "1800")?;

    let schedule = or_default("THREATWIRE_SCHEDULE", "0 0 */6 * * *");
    let api_keys = or_default("THREATWIRE_API_KEYS", "")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect();

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        feeds,
        articles_per_feed,
        content_max_length,
        content_min_length,
        keyword_tiers,
        storage_dir,
        public_base_url,
        openai_api_key,
        llm_base_url,
        llm_model,
        llm_title_model,
        llm_max_tokens,
        llm_timeout_secs,
        llm_max_retries,
        llm_backoff_base_ms,
        llm_min_response_chars,
        rewrite_titles,
        scraper_request_timeout_secs,
        scraper_user_agent,
        max_concurrent_requests,
        article_timeout_secs,
        run_deadline_secs,
        schedule,
        api_keys,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "THREATWIRE_ENV".to_string(),
            reason: format!("expected development, test or production, got \"{other}\""),
        }),
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got \"{other}\""),
        }),
    }
}

/// Splits the comma-separated feed list. An empty list is a configuration
/// error, as is any entry that is not an absolute http(s) URL.
fn parse_feeds(raw: &str) -> Result<Vec<String>, ConfigError> {
    let feeds: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect();

    if feeds.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "THREATWIRE_FEEDS".to_string(),
            reason: "no feeds configured".to_string(),
        });
    }

    if let Some(bad) = feeds.iter().find(|f| !is_absolute_http_url(f)) {
        return Err(ConfigError::InvalidEnvVar {
            var: "THREATWIRE_FEEDS".to_string(),
            reason: format!("\"{bad}\" is not an absolute http(s) URL"),
        });
    }

    Ok(feeds)
}

fn is_absolute_http_url(raw: &str) -> bool {
    let rest = raw
        .strip_prefix("https://")
        .or_else(|| raw.strip_prefix("http://"));
    rest.and_then(|r| r.split(['/', '?', '#']).next())
        .is_some_and(|host| !host.is_empty() && !host.contains(char::is_whitespace))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
