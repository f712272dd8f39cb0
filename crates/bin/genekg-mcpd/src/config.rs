use clap::{Parser, builder::BoolishValueParser};
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_DB_NAMESPACE: &str = "genekg";
const DEFAULT_DB_NAME: &str = "genekg";
const DEFAULT_MCP_HTTP_ADDR: &str = "127.0.0.1:4020";
const DEFAULT_TRAVERSAL_DEPTH: usize = 1;
const DEFAULT_MAX_TRAVERSAL_DEPTH: usize = 5;

#[derive(Parser, Debug)]
#[command(name = "genekg-mcpd", version, about = "Gene knowledge MCP daemon.")]
struct CliArgs {
    /// Path to the on-disk database. Omit to run in memory.
    #[arg(long, env = "GENEKG_DB_PATH")]
    db_path: Option<PathBuf>,

    #[arg(long, env = "GENEKG_DB_NAMESPACE", default_value = DEFAULT_DB_NAMESPACE)]
    db_namespace: String,

    #[arg(long, env = "GENEKG_DB_NAME", default_value = DEFAULT_DB_NAME)]
    db_name: String,

    #[arg(
        long = "stdio",
        env = "GENEKG_ENABLE_STDIO",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    enable_stdio: bool,

    #[arg(
        long,
        env = "GENEKG_MCP_SERVE",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    mcp_serve: bool,

    #[arg(long, env = "GENEKG_MCP_HTTP_ADDR", default_value = DEFAULT_MCP_HTTP_ADDR)]
    mcp_http_addr: SocketAddr,

    /// Directory of KGML files to ingest at startup.
    #[arg(long, env = "GENEKG_KGML_DIR")]
    kgml_dir: Option<PathBuf>,

    /// GAF file to ingest at startup.
    #[arg(long, env = "GENEKG_GAF_PATH")]
    gaf_path: Option<PathBuf>,

    #[arg(
        long,
        env = "GENEKG_DEFAULT_TRAVERSAL_DEPTH",
        default_value_t = DEFAULT_TRAVERSAL_DEPTH
    )]
    default_traversal_depth: usize,

    #[arg(
        long,
        env = "GENEKG_MAX_TRAVERSAL_DEPTH",
        default_value_t = DEFAULT_MAX_TRAVERSAL_DEPTH
    )]
    max_traversal_depth: usize,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Clone)]
pub struct GenekgConfig {
    pub db_path: Option<PathBuf>,
    pub db_namespace: String,
    pub db_name: String,
    pub enable_stdio: bool,
    pub mcp_serve: bool,
    pub mcp_http_addr: SocketAddr,
    pub kgml_dir: Option<PathBuf>,
    pub gaf_path: Option<PathBuf>,
    pub default_traversal_depth: usize,
    pub max_traversal_depth: usize,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl GenekgConfig {
    /// Parses configuration from CLI arguments and the environment.
    ///
    /// # Errors
    /// Returns `ConfigError` if a setting fails validation.
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }
}

impl TryFrom<CliArgs> for GenekgConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.db_namespace.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "GENEKG_DB_NAMESPACE",
                value: args.db_namespace,
            });
        }
        if args.db_name.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "GENEKG_DB_NAME",
                value: args.db_name,
            });
        }
        if args.max_traversal_depth == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "GENEKG_MAX_TRAVERSAL_DEPTH",
                value: args.max_traversal_depth.to_string(),
            });
        }
        if args.default_traversal_depth == 0
            || args.default_traversal_depth > args.max_traversal_depth
        {
            return Err(ConfigError::InvalidSetting {
                name: "GENEKG_DEFAULT_TRAVERSAL_DEPTH",
                value: args.default_traversal_depth.to_string(),
            });
        }

        let db_path = args.db_path.filter(|path| !path.as_os_str().is_empty());

        Ok(Self {
            db_path,
            db_namespace: args.db_namespace,
            db_name: args.db_name,
            enable_stdio: args.enable_stdio,
            mcp_serve: args.mcp_serve,
            mcp_http_addr: args.mcp_http_addr,
            kgml_dir: args.kgml_dir,
            gaf_path: args.gaf_path,
            default_traversal_depth: args.default_traversal_depth,
            max_traversal_depth: args.max_traversal_depth,
        })
    }
}
