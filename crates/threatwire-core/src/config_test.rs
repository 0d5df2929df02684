use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("OPENAI_API_KEY", "sk-test");
    m
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "THREATWIRE_ENV"));
}

#[test]
fn build_app_config_fails_without_api_key() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "OPENAI_API_KEY"),
        "expected MissingEnvVar(OPENAI_API_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_api_key_as_missing() {
    let mut map = full_env();
    map.insert("OPENAI_API_KEY", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
}

#[test]
fn build_app_config_succeeds_with_defaults() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).expect("config");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.feeds.len(), 6);
    assert_eq!(cfg.feeds[0], "https://krebsonsecurity.com/feed/");
    assert_eq!(cfg.articles_per_feed, 3);
    assert_eq!(cfg.content_max_length, 12_000);
    assert_eq!(cfg.content_min_length, 500);
    assert_eq!(cfg.keyword_tiers, KeywordTiers::default());
    assert_eq!(cfg.storage_dir, std::path::PathBuf::from("./articles"));
    assert_eq!(cfg.public_base_url, "http://localhost:3000/articles");
    assert_eq!(cfg.llm_base_url, "https://api.openai.com/v1");
    assert_eq!(cfg.llm_model, "gpt-4");
    assert_eq!(cfg.llm_max_tokens, 3000);
    assert_eq!(cfg.llm_max_retries, 3);
    assert!(cfg.rewrite_titles);
    assert_eq!(cfg.scraper_request_timeout_secs, 30);
    assert_eq!(cfg.max_concurrent_requests, 4);
    assert_eq!(cfg.schedule, "0 0 */6 * * *");
    assert!(cfg.api_keys.is_empty());
}

#[test]
fn build_app_config_fails_with_empty_feed_list() {
    let mut map = full_env();
    map.insert("THREATWIRE_FEEDS", " , ,");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, ref reason }) if var == "THREATWIRE_FEEDS" && reason.contains("no feeds")),
        "expected InvalidEnvVar(THREATWIRE_FEEDS), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_relative_feed_url() {
    let mut map = full_env();
    map.insert("THREATWIRE_FEEDS", "https://example.com/feed,/local/feed.xml");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "THREATWIRE_FEEDS")
    );
}

#[test]
fn build_app_config_parses_feed_list() {
    let mut map = full_env();
    map.insert(
        "THREATWIRE_FEEDS",
        " https://a.example/feed , http://b.example/rss.xml ",
    );
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.feeds,
        vec![
            "https://a.example/feed".to_string(),
            "http://b.example/rss.xml".to_string()
        ]
    );
}

#[test]
fn build_app_config_rejects_zero_articles_per_feed() {
    let mut map = full_env();
    map.insert("THREATWIRE_ARTICLES_PER_FEED", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "THREATWIRE_ARTICLES_PER_FEED")
    );
}

#[test]
fn build_app_config_rejects_min_length_above_max() {
    let mut map = full_env();
    map.insert("THREATWIRE_CONTENT_MAX_LENGTH", "400");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "THREATWIRE_CONTENT_MIN_LENGTH")
    );
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = full_env();
    map.insert("THREATWIRE_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "THREATWIRE_BIND_ADDR"),
        "expected InvalidEnvVar(THREATWIRE_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_overrides_keyword_tiers() {
    let mut map = full_env();
    map.insert("THREATWIRE_THREAT_KEYWORDS_CRITICAL", "Wormable, RCE");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.keyword_tiers.critical,
        vec!["wormable".to_string(), "rce".to_string()]
    );
    assert_eq!(cfg.keyword_tiers.high, KeywordTiers::default().high);
}

#[test]
fn build_app_config_parses_rewrite_titles_flag() {
    let mut map = full_env();
    map.insert("THREATWIRE_REWRITE_TITLES", "no");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(!cfg.rewrite_titles);

    map.insert("THREATWIRE_REWRITE_TITLES", "maybe");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "THREATWIRE_REWRITE_TITLES")
    );
}

#[test]
fn build_app_config_rejects_invalid_retry_count() {
    let mut map = full_env();
    map.insert("THREATWIRE_LLM_MAX_RETRIES", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "THREATWIRE_LLM_MAX_RETRIES")
    );
}

#[test]
fn build_app_config_collects_api_keys() {
    let mut map = full_env();
    map.insert("THREATWIRE_API_KEYS", "alpha, beta,,");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.api_keys, vec!["alpha".to_string(), "beta".to_string()]);
}

#[test]
fn debug_output_redacts_secrets() {
    let mut map = full_env();
    map.insert("THREATWIRE_API_KEYS", "super-secret-token");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let debug = format!("{cfg:?}");
    assert!(!debug.contains("sk-test"));
    assert!(!debug.contains("super-secret-token"));
    assert!(debug.contains("[redacted]"));
}

#[test]
fn public_base_url_loses_trailing_slash() {
    let mut map = full_env();
    map.insert("THREATWIRE_PUBLIC_BASE_URL", "https://cdn.example.com/articles/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.public_base_url, "https://cdn.example.com/articles");
}
