//! Server configuration from flags and environment

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "striform-api", version, about = "Striform REST API server")]
pub struct ServerConfig {
    /// Interface to bind
    #[arg(long, env = "STRIFORM_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Persist documents to this JSON file instead of memory
    #[arg(long, env = "STRIFORM_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Allow cross-origin requests from any origin
    #[arg(long, env = "STRIFORM_CORS_ANY", default_value_t = true, action = clap::ArgAction::Set)]
    pub cors_any: bool,
}

impl ServerConfig {
    pub fn addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}
