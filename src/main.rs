use clap::Parser;
use log::info;
use raw_http_server::{logger, Server, ServerConfig, ServerError, ServerResult};
use std::path::PathBuf;

/// Minimal HTTP/1.1 server: `/`, `/echo/<text>`, `/user-agent` and `/files/<name>`
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Directory served under /files/
    #[arg(long, env = "STATIC_DIR")]
    directory: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    address: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// JSON configuration file; command-line values take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// off, error, warn, info, debug or trace
    #[arg(long)]
    log_level: Option<String>,

    /// Write the effective configuration to this file and exit
    #[arg(long)]
    save_config: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> ServerResult<(ServerConfig, Option<PathBuf>)> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_json_file(path)?,
            None => ServerConfig::new(),
        };

        if let Some(directory) = self.directory {
            config = config.with_static_root(directory);
        }
        if let Some(address) = self.address {
            config.listen_address = address;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(level) = self.log_level {
            config = config.with_log_level(&level);
        }

        Ok((config, self.save_config))
    }
}

fn main() -> ServerResult<()> {
    let (config, save_config) = Cli::parse().into_config()?;

    if let Some(path) = save_config {
        config.save_to_json_file(&path)?;
        println!("Configuration saved to: {}", path.display());
        return Ok(());
    }

    logger::init_logger(config.level_filter()?)?;

    let server = Server::from_config(&config)?;

    let metrics = server.metrics();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal. Stopping server...");
        info!("Served so far:\n{}", metrics.format());
        std::process::exit(0);
    })
    .map_err(|e| ServerError::Config(format!("Signal handler: {}", e)))?;

    server.run()
}
