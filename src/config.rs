use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use std::{env, fmt};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;
const DEFAULT_MEMORY_BUCKET: &str = "local-files";

/// Which blob backend the gateway talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    S3,
    Memory,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::S3 => write!(f, "s3"),
            BackendKind::Memory => write!(f, "memory"),
        }
    }
}

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub backend: BackendKind,
    pub bucket: String,
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
    pub max_upload_bytes: usize,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Per-user file storage gateway over S3")]
pub struct Args {
    /// Host to bind to (overrides FILE_GATEWAY_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides FILE_GATEWAY_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Storage backend (overrides FILE_GATEWAY_BACKEND)
    #[arg(long, value_enum)]
    pub backend: Option<BackendKind>,

    /// Bucket holding every user's files (overrides FILE_GATEWAY_BUCKET)
    #[arg(long)]
    pub bucket: Option<String>,

    /// AWS region (overrides FILE_GATEWAY_REGION)
    #[arg(long)]
    pub region: Option<String>,

    /// Custom S3 endpoint, e.g. MinIO (overrides FILE_GATEWAY_ENDPOINT_URL)
    #[arg(long)]
    pub endpoint_url: Option<String>,

    /// Use path-style bucket addressing (overrides FILE_GATEWAY_FORCE_PATH_STYLE)
    #[arg(long)]
    pub force_path_style: bool,

    /// Upload body limit in bytes (overrides FILE_GATEWAY_MAX_UPLOAD_BYTES)
    #[arg(long)]
    pub max_upload_bytes: Option<usize>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Merge already-parsed CLI args with environment fallbacks.
    pub fn from_args(args: Args) -> Result<Self> {
        // --- Environment fallback ---
        let env_host = env::var("FILE_GATEWAY_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = parse_env("FILE_GATEWAY_PORT", 8080u16)?;
        let env_backend = match optional_env("FILE_GATEWAY_BACKEND")? {
            Some(value) => BackendKind::from_str(&value, true)
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("parsing FILE_GATEWAY_BACKEND value `{}`", value))?,
            None => BackendKind::S3,
        };
        let env_force_path_style = parse_env("FILE_GATEWAY_FORCE_PATH_STYLE", false)?;
        let env_max_upload = parse_env("FILE_GATEWAY_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;

        // --- Merge ---
        let backend = args.backend.unwrap_or(env_backend);
        let bucket = match args.bucket.or(optional_env("FILE_GATEWAY_BUCKET")?) {
            Some(bucket) => bucket,
            None if backend == BackendKind::Memory => DEFAULT_MEMORY_BUCKET.into(),
            None => bail!("a bucket is required: pass --bucket or set FILE_GATEWAY_BUCKET"),
        };

        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            backend,
            bucket,
            region: args.region.or(optional_env("FILE_GATEWAY_REGION")?),
            endpoint_url: args
                .endpoint_url
                .or(optional_env("FILE_GATEWAY_ENDPOINT_URL")?),
            force_path_style: args.force_path_style || env_force_path_style,
            max_upload_bytes: args.max_upload_bytes.unwrap_or(env_max_upload),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn optional_env(name: &str) -> Result<Option<String>> {
    match env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(err).with_context(|| format!("reading {}", name)),
    }
}

fn parse_env<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(name)? {
        Some(value) => value
            .parse::<T>()
            .with_context(|| format!("parsing {} value `{}`", name, value)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<AppConfig> {
        let mut full = vec!["user-file-gateway"];
        full.extend_from_slice(argv);
        AppConfig::from_args(Args::parse_from(full))
    }

    #[test]
    fn cli_flags_take_precedence() {
        let cfg = parse(&[
            "--host",
            "127.0.0.1",
            "--port",
            "9000",
            "--bucket",
            "team-files",
            "--endpoint-url",
            "http://localhost:9000",
            "--force-path-style",
            "--max-upload-bytes",
            "1024",
        ])
        .unwrap();

        assert_eq!(cfg.addr(), "127.0.0.1:9000");
        assert_eq!(cfg.bucket, "team-files");
        assert_eq!(cfg.endpoint_url.as_deref(), Some("http://localhost:9000"));
        assert!(cfg.force_path_style);
        assert_eq!(cfg.max_upload_bytes, 1024);
    }

    #[test]
    fn memory_backend_gets_a_default_bucket() {
        let cfg = parse(&["--backend", "memory"]).unwrap();
        assert_eq!(cfg.backend, BackendKind::Memory);
        if env::var("FILE_GATEWAY_BUCKET").is_err() {
            assert_eq!(cfg.bucket, DEFAULT_MEMORY_BUCKET);
        }
    }
}
