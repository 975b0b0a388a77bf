use crate::azure::client::{ClientOptions, DEFAULT_TIMEOUT_SECS};
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Address to bind the HTTP server to
    #[arg(long, env = "ADO_ASSISTANT_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to run the server on
    #[arg(long, env = "ADO_ASSISTANT_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Timeout for each Azure DevOps call, in seconds
    #[arg(long, env = "ADO_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,

    /// Override for the Azure DevOps base URL (defaults to https://{organization}.visualstudio.com)
    #[arg(long, env = "ADO_BASE_URL")]
    pub base_url: Option<String>,
}

impl Config {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            timeout: Duration::from_secs(self.request_timeout_secs),
            base_url: self.base_url.clone(),
        }
    }
}
