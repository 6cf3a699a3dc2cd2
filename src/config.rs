//! Application configuration loaded from environment variables.

/// Minimum session secret length in bytes. The secret signs the flash
/// cookie, so anything shorter is trivially brute-forceable.
const MIN_SECRET_LEN: usize = 32;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:4000").
    pub bind_addr: String,

    /// Path to the SQLite database file.
    pub db_path: String,

    /// Directory holding the page/layout/partial template fragments.
    pub template_dir: String,

    /// Directory served under `/static`.
    pub static_dir: String,

    /// Secret key used to sign the flash cookie. At least 32 bytes.
    pub session_secret: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// All variables have defaults suitable for local development:
    /// - `SNIPBIN_BIND_ADDR`: Server bind address (default: "0.0.0.0:4000")
    /// - `SNIPBIN_DB_PATH`: SQLite database path (default: "snipbin.db")
    /// - `SNIPBIN_TEMPLATE_DIR`: Template directory (default: "./ui/html")
    /// - `SNIPBIN_STATIC_DIR`: Static asset directory (default: "./ui/static")
    /// - `SNIPBIN_SESSION_SECRET`: Cookie signing secret, >= 32 bytes
    ///   (default: a fixed development-only key)
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("SNIPBIN_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:4000".to_string());

        let db_path = std::env::var("SNIPBIN_DB_PATH").unwrap_or_else(|_| "snipbin.db".to_string());

        let template_dir = std::env::var("SNIPBIN_TEMPLATE_DIR")
            .unwrap_or_else(|_| "./ui/html".to_string())
            .trim_end_matches('/')
            .to_string();

        let static_dir = std::env::var("SNIPBIN_STATIC_DIR")
            .unwrap_or_else(|_| "./ui/static".to_string())
            .trim_end_matches('/')
            .to_string();

        let session_secret = std::env::var("SNIPBIN_SESSION_SECRET")
            .unwrap_or_else(|_| "dev-only-secret-change-me-in-production!".to_string());

        if session_secret.len() < MIN_SECRET_LEN {
            anyhow::bail!(
                "SNIPBIN_SESSION_SECRET must be at least {MIN_SECRET_LEN} bytes (got {})",
                session_secret.len()
            );
        }

        tracing::info!(
            bind_addr = %bind_addr,
            db_path = %db_path,
            template_dir = %template_dir,
            static_dir = %static_dir,
            "configuration loaded"
        );

        Ok(Self {
            bind_addr,
            db_path,
            template_dir,
            static_dir,
            session_secret,
        })
    }
}
