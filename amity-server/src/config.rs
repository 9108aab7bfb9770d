//! Configuration for the Amity server.
//!
//! CLI arguments with environment variable fallbacks. A `.env` file in the
//! working directory is loaded before parsing.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Minimum JWT secret length in bytes outside dev mode.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Amity - friends, interests and notifications over a JSON API
#[derive(Parser, Debug, Clone)]
#[command(name = "amity-server")]
#[command(about = "HTTP API for the Amity social network")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:5000")]
    pub listen: SocketAddr,

    /// Directory holding the database
    #[arg(long, env = "DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// JWT secret for token signing (required unless in dev mode)
    #[arg(long, env = "JWT_SECRET")]
    pub jwt_secret: Option<String>,

    /// JWT token expiry in seconds
    #[arg(long, env = "JWT_EXPIRY_SECONDS", default_value = "86400")]
    pub jwt_expiry_seconds: u64,

    /// Built single-page app served for non-API paths
    #[arg(long, env = "STATIC_DIR", default_value = "./build")]
    pub static_dir: PathBuf,

    /// Redirect plain HTTP requests (per `x-forwarded-proto`) to HTTPS
    #[arg(long, env = "FORCE_HTTPS", default_value = "false")]
    pub force_https: bool,

    /// Enable development mode (allows a built-in JWT secret)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Checks settings that clap cannot express.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        if !self.dev_mode {
            match &self.jwt_secret {
                None => return Err("JWT_SECRET is required outside dev mode".to_string()),
                Some(secret) if secret.len() < MIN_JWT_SECRET_LEN => {
                    return Err(format!(
                        "JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} bytes"
                    ));
                }
                Some(_) => {}
            }
        }

        if self.jwt_expiry_seconds == 0 {
            return Err("JWT_EXPIRY_SECONDS must be greater than zero".to_string());
        }

        Ok(())
    }

    /// Default tracing filter when `RUST_LOG` is unset.
    #[must_use]
    pub fn default_log_filter(&self) -> String {
        format!(
            "amity_server={level},amity_core={level},tower_http=info",
            level = self.log_level
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("amity-server").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let args = parse(&["--dev-mode"]);
        assert_eq!(args.listen, "0.0.0.0:5000".parse().unwrap());
        assert_eq!(args.data_dir, PathBuf::from("./data"));
        assert_eq!(args.jwt_expiry_seconds, 86_400);
        assert!(!args.force_https);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn secret_required_outside_dev_mode() {
        let args = parse(&[]);
        if args.jwt_secret.is_none() {
            assert!(args.validate().is_err());
        }
    }

    #[test]
    fn short_secret_rejected() {
        let args = parse(&["--jwt-secret", "too-short"]);
        let err = args.validate().unwrap_err();
        assert!(err.contains("at least 32"));
    }

    #[test]
    fn long_secret_accepted() {
        let args = parse(&["--jwt-secret", &"x".repeat(MIN_JWT_SECRET_LEN)]);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn log_filter_uses_level() {
        let args = parse(&["--dev-mode", "--log-level", "debug"]);
        assert_eq!(
            args.default_log_filter(),
            "amity_server=debug,amity_core=debug,tower_http=info"
        );
    }
}
