//! Configuration module
//!
//! Configuration is read once at process start and handed to the router and the
//! storage adapter. Nothing else in the crate family reads the environment.

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_MAX_FILE_SIZE, DEFAULT_PORT, DEFAULT_REPORTS_TABLE, DEFAULT_SIGNED_URL_TTL_SECS,
};

/// Which implementation backs the report store adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Supabase-compatible object storage + PostgREST metadata table.
    Supabase,
    /// In-process store; contents are lost on restart.
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Supabase => "supabase",
            StorageBackend::Memory => "memory",
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "supabase" => Ok(StorageBackend::Supabase),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(anyhow::anyhow!(
                "STORAGE_BACKEND must be 'supabase' or 'memory', got '{}'",
                other
            )),
        }
    }
}

/// Server-level settings.
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
}

/// Report service configuration
#[derive(Clone, Debug)]
pub struct ReportServiceConfig {
    pub base: BaseConfig,
    pub storage_backend: StorageBackend,
    pub service_url: Option<String>,
    pub service_key: Option<String>,
    pub storage_bucket: Option<String>,
    pub reports_table: String,
    pub upload_password: String,
    pub app_url: String,
    pub max_file_size_bytes: usize,
    pub signed_url_ttl_secs: u64,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ReportServiceConfig>);

impl Config {
    fn inner(&self) -> &ReportServiceConfig {
        &self.0
    }

    /// Load `.env` (if present) and read the configuration from the process environment.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        // A missing .env file is fine; real deployments inject variables directly.
        let _ = dotenvy::dotenv();
        Self::from_source(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_source<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = ReportServiceConfig::from_source(lookup)?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.inner().base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend
    }

    pub fn service_url(&self) -> Option<&str> {
        self.inner().service_url.as_deref()
    }

    pub fn service_key(&self) -> Option<&str> {
        self.inner().service_key.as_deref()
    }

    pub fn storage_bucket(&self) -> Option<&str> {
        self.inner().storage_bucket.as_deref()
    }

    pub fn reports_table(&self) -> &str {
        &self.inner().reports_table
    }

    pub fn upload_password(&self) -> &str {
        &self.inner().upload_password
    }

    pub fn app_url(&self) -> &str {
        &self.inner().app_url
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.inner().max_file_size_bytes
    }

    pub fn signed_url_ttl_secs(&self) -> u64 {
        self.inner().signed_url_ttl_secs
    }
}

fn parse_or<T: FromStr>(value: Option<String>, key: &str, default: T) -> Result<T, anyhow::Error> {
    match value {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number", key)),
        _ => Ok(default),
    }
}

impl ReportServiceConfig {
    pub fn from_source<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let environment = non_empty("ENVIRONMENT")
            .or_else(|| non_empty("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let server_port: u16 = parse_or(lookup("PORT"), "PORT", DEFAULT_PORT)?;

        let cors_origins: Vec<String> = non_empty("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port,
            cors_origins,
            environment,
        };

        let storage_backend = match non_empty("STORAGE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => StorageBackend::Supabase,
        };

        let upload_password = lookup("UPLOAD_PASSWORD")
            .ok_or_else(|| anyhow::anyhow!("UPLOAD_PASSWORD must be set for gated routes"))?;

        let app_url = non_empty("APP_URL")
            .unwrap_or_else(|| format!("http://localhost:{}", server_port))
            .trim_end_matches('/')
            .to_string();

        let config = ReportServiceConfig {
            base,
            storage_backend,
            service_url: non_empty("SUPABASE_URL").map(|s| s.trim_end_matches('/').to_string()),
            service_key: non_empty("SUPABASE_ANON_KEY"),
            storage_bucket: non_empty("STORAGE_BUCKET"),
            reports_table: non_empty("REPORTS_TABLE")
                .unwrap_or_else(|| DEFAULT_REPORTS_TABLE.to_string()),
            upload_password,
            app_url,
            max_file_size_bytes: parse_or(
                lookup("MAX_FILE_SIZE"),
                "MAX_FILE_SIZE",
                DEFAULT_MAX_FILE_SIZE,
            )?,
            signed_url_ttl_secs: parse_or(
                lookup("SIGNED_URL_TTL_SECS"),
                "SIGNED_URL_TTL_SECS",
                DEFAULT_SIGNED_URL_TTL_SECS,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.upload_password.is_empty() {
            return Err(anyhow::anyhow!("UPLOAD_PASSWORD must not be empty"));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE must be greater than 0"));
        }

        if self.signed_url_ttl_secs == 0 {
            return Err(anyhow::anyhow!("SIGNED_URL_TTL_SECS must be greater than 0"));
        }

        if self.storage_backend == StorageBackend::Supabase {
            match self.service_url.as_deref() {
                Some(url) if url.starts_with("http://") || url.starts_with("https://") => {}
                Some(_) => {
                    return Err(anyhow::anyhow!(
                        "SUPABASE_URL must be an http:// or https:// URL"
                    ))
                }
                None => {
                    return Err(anyhow::anyhow!(
                        "SUPABASE_URL must be set when using the supabase storage backend"
                    ))
                }
            }
            if self.service_key.is_none() {
                return Err(anyhow::anyhow!(
                    "SUPABASE_ANON_KEY must be set when using the supabase storage backend"
                ));
            }
            if self.storage_bucket.is_none() {
                return Err(anyhow::anyhow!(
                    "STORAGE_BUCKET must be set when using the supabase storage backend"
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn supabase_env() -> Vec<(&'static str, &'static str)> {
        vec![
            ("SUPABASE_URL", "https://project.supabase.co/"),
            ("SUPABASE_ANON_KEY", "anon-key"),
            ("STORAGE_BUCKET", "reports"),
            ("UPLOAD_PASSWORD", "secret"),
            ("APP_URL", "https://reports.example.com/"),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_source(lookup_from(&supabase_env())).unwrap();
        assert_eq!(config.server_port(), 3000);
        assert_eq!(config.max_file_size_bytes(), 52_428_800);
        assert_eq!(config.signed_url_ttl_secs(), 604_800);
        assert_eq!(config.reports_table(), "reports");
        assert_eq!(config.storage_backend(), StorageBackend::Supabase);
        assert_eq!(config.cors_origins(), ["*".to_string()]);
        assert!(!config.is_production());
    }

    #[test]
    fn test_trailing_slashes_trimmed() {
        let config = Config::from_source(lookup_from(&supabase_env())).unwrap();
        assert_eq!(config.service_url(), Some("https://project.supabase.co"));
        assert_eq!(config.app_url(), "https://reports.example.com");
    }

    #[test]
    fn test_missing_password_rejected() {
        let env: Vec<_> = supabase_env()
            .into_iter()
            .filter(|(k, _)| *k != "UPLOAD_PASSWORD")
            .collect();
        let err = Config::from_source(lookup_from(&env)).unwrap_err();
        assert!(err.to_string().contains("UPLOAD_PASSWORD"));
    }

    #[test]
    fn test_supabase_backend_requires_bucket() {
        let env: Vec<_> = supabase_env()
            .into_iter()
            .filter(|(k, _)| *k != "STORAGE_BUCKET")
            .collect();
        let err = Config::from_source(lookup_from(&env)).unwrap_err();
        assert!(err.to_string().contains("STORAGE_BUCKET"));
    }

    #[test]
    fn test_memory_backend_needs_no_service() {
        let config = Config::from_source(lookup_from(&[
            ("STORAGE_BACKEND", "memory"),
            ("UPLOAD_PASSWORD", "secret"),
            ("PORT", "8080"),
        ]))
        .unwrap();
        assert_eq!(config.storage_backend(), StorageBackend::Memory);
        assert_eq!(config.app_url(), "http://localhost:8080");
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let mut env = supabase_env();
        env.push(("MAX_FILE_SIZE", "fifty"));
        let err = Config::from_source(lookup_from(&env)).unwrap_err();
        assert!(err.to_string().contains("MAX_FILE_SIZE"));
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let mut env = supabase_env();
        env.push(("STORAGE_BACKEND", "s3"));
        assert!(Config::from_source(lookup_from(&env)).is_err());
    }

    #[test]
    fn test_cors_origins_split() {
        let mut env = supabase_env();
        env.push(("CORS_ORIGINS", "https://a.example, https://b.example"));
        env.push(("ENVIRONMENT", "Production"));
        let config = Config::from_source(lookup_from(&env)).unwrap();
        assert_eq!(
            config.cors_origins(),
            ["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert!(config.is_production());
    }
}
