use std::net::IpAddr;
use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_HOLIDAY_URL: &str = "https://www.holiday.com.tw/act/member/index.aspx";
const DEFAULT_PARTY_WORLD_URL: &str = "https://www.cashboxparty.com/act/ktv/20200904/";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
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
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let env = parse_environment(&or_default("MEMBERDAY_ENV", "development"));

    let port: u16 = parse_value("PORT", &or_default("PORT", "8000"))?;
    let bind_host: IpAddr =
        parse_value("MEMBERDAY_BIND_HOST", &or_default("MEMBERDAY_BIND_HOST", "0.0.0.0"))?;
    let log_level = or_default("MEMBERDAY_LOG_LEVEL", "info");
    let cors_origins = split_list(&or_default("MEMBERDAY_CORS_ORIGINS", ""));

    let holiday_url = or_default("MEMBERDAY_HOLIDAY_URL", DEFAULT_HOLIDAY_URL);
    let party_world_url = or_default("MEMBERDAY_PARTY_WORLD_URL", DEFAULT_PARTY_WORLD_URL);

    let scraper_request_timeout_secs: u64 = parse_value(
        "MEMBERDAY_SCRAPER_REQUEST_TIMEOUT_SECS",
        &or_default("MEMBERDAY_SCRAPER_REQUEST_TIMEOUT_SECS", "30"),
    )?;
    let scraper_user_agent = or_default(
        "MEMBERDAY_SCRAPER_USER_AGENT",
        "memberday/0.1 (member-day-calendar)",
    );

    Ok(AppConfig {
        env,
        bind_host,
        port,
        log_level,
        cors_origins,
        holiday_url,
        party_world_url,
        scraper_request_timeout_secs,
        scraper_user_agent,
    })
}

fn parse_value<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
