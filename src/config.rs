use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Connection settings, shared by every subcommand
/// Priority: CLI > ENV (including .env) > defaults
#[derive(Args, Debug)]
pub struct CliArgs {
    /// Base URL of the catalog API
    #[arg(
        long,
        env = "STOREFRONT_API_URL",
        default_value = "https://api.escuelajs.co/api/v1"
    )]
    pub api_url: String,

    /// Token refresh endpoint path (deployments disagree on the exact shape)
    #[arg(long, env = "STOREFRONT_REFRESH_PATH", default_value = "/auth/refresh")]
    pub refresh_path: String,

    /// Renew the access token when it expires within this many seconds
    #[arg(long, env = "TOKEN_EXPIRY_BUFFER", default_value = "60")]
    pub expiry_buffer: u64,

    /// Path to the session database
    #[arg(long, env = "STOREFRONT_SESSION_FILE")]
    pub session_file: Option<String>,

    /// HTTP connect timeout in seconds
    #[arg(long, env = "HTTP_CONNECT_TIMEOUT", default_value = "10")]
    pub connect_timeout: u64,

    /// HTTP request timeout in seconds
    #[arg(long, env = "HTTP_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub refresh_path: String,
    pub expiry_buffer: u64,
    pub session_file: PathBuf,

    pub http_connect_timeout: u64,
    pub http_request_timeout: u64,

    pub log_level: String,
}

impl Config {
    /// Build the configuration from parsed CLI arguments
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let session_file = args
            .session_file
            .as_deref()
            .map(expand_tilde)
            .unwrap_or_else(default_session_file);

        Ok(Config {
            api_base_url: args.api_url.trim_end_matches('/').to_string(),
            refresh_path: args.refresh_path.clone(),
            expiry_buffer: args.expiry_buffer,
            session_file,
            http_connect_timeout: args.connect_timeout,
            http_request_timeout: args.request_timeout,
            log_level: args.log_level.clone(),
        })
    }

    /// Full URL of the renewal endpoint
    pub fn refresh_url(&self) -> String {
        format!("{}{}", self.api_base_url, self.refresh_path)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            anyhow::bail!("api-url must start with http:// or https://");
        }
        if !self.refresh_path.starts_with('/') {
            anyhow::bail!("refresh-path must start with '/'");
        }

        Ok(())
    }
}

/// Expand tilde (~) in file paths to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(&path[2..]);
        }
    }
    PathBuf::from(path)
}

/// Default location of the session database, under the user data directory
fn default_session_file() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("storefront").join("session.sqlite3"))
        .unwrap_or_else(|| PathBuf::from(".storefront-session.sqlite3"))
}
