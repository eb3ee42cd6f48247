use std::env;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Which store implementation the API runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Supabase,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supabase" | "postgrest" => Ok(StorageBackend::Supabase),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend: {}", other)),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Supabase => write!(f, "supabase"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub storage_backend: StorageBackend,
    pub bind_address: String,
    pub port: u16,
    pub max_availability_days: i64,
    pub request_timeout_secs: u64,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_service_key: String::new(),
            jwt_secret: String::new(),
            token_ttl_hours: 24,
            storage_backend: StorageBackend::Supabase,
            bind_address: "0.0.0.0".to_string(),
            port: 5000,
            max_availability_days: 90,
            request_timeout_secs: 10,
            admin_email: None,
            admin_password: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_service_key: env::var("SUPABASE_SERVICE_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_SERVICE_KEY not set, using empty value");
                    String::new()
                }),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            token_ttl_hours: parse_or("TOKEN_TTL_HOURS", defaults.token_ttl_hours),
            storage_backend: parse_or("STORAGE_BACKEND", defaults.storage_backend),
            bind_address: env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| defaults.bind_address.clone()),
            port: parse_or("PORT", defaults.port),
            max_availability_days: parse_or("MAX_AVAILABILITY_DAYS", defaults.max_availability_days),
            request_timeout_secs: parse_or("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
            admin_email: env::var("ADMIN_EMAIL").ok().filter(|v| !v.is_empty()),
            admin_password: env::var("ADMIN_PASSWORD").ok().filter(|v| !v.is_empty()),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        let store_ready = match self.storage_backend {
            StorageBackend::Supabase => {
                !self.supabase_url.is_empty() && !self.supabase_service_key.is_empty()
            }
            StorageBackend::Memory => true,
        };

        store_ready && !self.jwt_secret.is_empty()
    }

    pub fn has_admin_bootstrap(&self) -> bool {
        self.admin_email.is_some() && self.admin_password.is_some()
    }
}

fn parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} has an invalid value '{}', using default {:?}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
