use crate::app_config::{AppConfig, Environment};
use crate::geo::{Coordinate, DEFAULT_COORDINATE};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are malformed or out of range.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does not load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are malformed or out of range.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Tests pass a `HashMap` lookup instead of touching the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_f64 = |var: &str, raw: &str| -> Result<f64, ConfigError> {
        raw.trim()
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let coordinate = |lat_var: &str,
                      lng_var: &str,
                      lat: &str,
                      lng: &str|
     -> Result<Coordinate, ConfigError> {
        let lat = parse_f64(lat_var, lat)?;
        let lng = parse_f64(lng_var, lng)?;
        Coordinate::new(lat, lng).map_err(|e| invalid(lat_var, e.to_string()))
    };

    let env = parse_environment(&or_default("TRIPWIZ_ENV", "development"))?;

    let api_base_url = or_default("TRIPWIZ_API_BASE_URL", "http://localhost:8080/api/v1");
    let asset_base_url = or_default("TRIPWIZ_ASSET_BASE_URL", "http://localhost:8080");
    let api_token = lookup("TRIPWIZ_API_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty());
    let log_level = or_default("TRIPWIZ_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("TRIPWIZ_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("TRIPWIZ_USER_AGENT", "tripwiz/0.1 (trip-planner)");
    let max_retries = parse_u32("TRIPWIZ_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("TRIPWIZ_RETRY_BACKOFF_BASE_MS", "1000")?;
    let navigation_delay_ms = parse_u64("TRIPWIZ_NAVIGATION_DELAY_MS", "1500")?;

    let default_location = coordinate(
        "TRIPWIZ_DEFAULT_LATITUDE",
        "TRIPWIZ_DEFAULT_LONGITUDE",
        &or_default(
            "TRIPWIZ_DEFAULT_LATITUDE",
            &DEFAULT_COORDINATE.latitude().to_string(),
        ),
        &or_default(
            "TRIPWIZ_DEFAULT_LONGITUDE",
            &DEFAULT_COORDINATE.longitude().to_string(),
        ),
    )?;

    let home_location = match (
        lookup("TRIPWIZ_HOME_LATITUDE").ok(),
        lookup("TRIPWIZ_HOME_LONGITUDE").ok(),
    ) {
        (Some(lat), Some(lng)) => Some(coordinate(
            "TRIPWIZ_HOME_LATITUDE",
            "TRIPWIZ_HOME_LONGITUDE",
            &lat,
            &lng,
        )?),
        (None, None) => None,
        (Some(_), None) => {
            return Err(ConfigError::MissingEnvVar(
                "TRIPWIZ_HOME_LONGITUDE".to_string(),
            ))
        }
        (None, Some(_)) => {
            return Err(ConfigError::MissingEnvVar(
                "TRIPWIZ_HOME_LATITUDE".to_string(),
            ))
        }
    };

    Ok(AppConfig {
        env,
        api_base_url,
        asset_base_url,
        api_token,
        log_level,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        navigation_delay_ms,
        default_location,
        home_location,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "TRIPWIZ_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
