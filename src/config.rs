use std::collections::HashMap;
use std::path::PathBuf;

use crate::errors::AppError;

/// Store credentials plus the ticker -> destination database mapping.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub db_map: HashMap<String, String>,
}

impl StoreConfig {
    pub fn database_for(&self, ticker: &str) -> Option<&str> {
        self.db_map.get(ticker).map(String::as_str)
    }

    /// Present only when STORE_HOST is set; then user and password are
    /// required. The run skips store persistence when this returns `None`.
    fn from_env() -> Result<Option<Self>, AppError> {
        let host = match std::env::var("STORE_HOST") {
            Ok(host) => host,
            Err(_) => return Ok(None),
        };

        let user = std::env::var("STORE_USER")
            .map_err(|_| AppError::Config("STORE_HOST set but STORE_USER missing".into()))?;
        let password = std::env::var("STORE_PASSWORD")
            .map_err(|_| AppError::Config("STORE_HOST set but STORE_PASSWORD missing".into()))?;
        let port = std::env::var("STORE_PORT")
            .unwrap_or_else(|_| "5432".to_string())
            .parse::<u16>()
            .map_err(|e| AppError::Config(format!("bad STORE_PORT: {e}")))?;
        let db_map = parse_db_map(&std::env::var("STORE_DB_MAP").unwrap_or_default())?;

        Ok(Some(Self {
            host,
            port,
            user,
            password,
            db_map,
        }))
    }
}

/// All run configuration, resolved once from the environment and passed
/// explicitly into each component.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub ticker_a: String,
    pub ticker_b: String,
    pub window_days: i64,
    pub output_dir: PathBuf,
    pub store: Option<StoreConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let api_key = std::env::var("ALPHAVANTAGE_API_KEY")
            .map_err(|_| AppError::Config("ALPHAVANTAGE_API_KEY not set".into()))?;

        let symbols =
            std::env::var("STOCK_SYMBOLS").unwrap_or_else(|_| "SPOT,SIRI".to_string());
        let (ticker_a, ticker_b) = parse_symbol_pair(&symbols)?;

        let window_days = std::env::var("WINDOW_DAYS")
            .unwrap_or_else(|_| "180".to_string())
            .parse::<i64>()
            .map_err(|e| AppError::Config(format!("bad WINDOW_DAYS: {e}")))?;
        if window_days <= 0 {
            return Err(AppError::Config(format!(
                "WINDOW_DAYS must be positive, got {window_days}"
            )));
        }

        let output_dir = std::env::var("OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        Ok(Self {
            api_key,
            ticker_a,
            ticker_b,
            window_days,
            output_dir,
            store: StoreConfig::from_env()?,
        })
    }
}

/// "SPOT,SIRI" -> ("SPOT", "SIRI"); exactly two distinct non-empty tickers.
fn parse_symbol_pair(raw: &str) -> Result<(String, String), AppError> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [a, b] if !a.is_empty() && !b.is_empty() && a != b => {
            Ok((a.to_string(), b.to_string()))
        }
        _ => Err(AppError::Config(format!(
            "STOCK_SYMBOLS must name two distinct tickers, got {raw:?}"
        ))),
    }
}

/// "SPOT=spotify_service,SIRI=siriusxm_service" -> map; empty input -> empty
/// map (every upsert then fails with UnmappedDestination).
fn parse_db_map(raw: &str) -> Result<HashMap<String, String>, AppError> {
    let mut map = HashMap::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (ticker, database) = entry.split_once('=').ok_or_else(|| {
            AppError::Config(format!("bad STORE_DB_MAP entry {entry:?}, expected TICKER=db"))
        })?;
        if ticker.trim().is_empty() || database.trim().is_empty() {
            return Err(AppError::Config(format!(
                "bad STORE_DB_MAP entry {entry:?}, expected TICKER=db"
            )));
        }
        map.insert(ticker.trim().to_string(), database.trim().to_string());
    }
    Ok(map)
}
