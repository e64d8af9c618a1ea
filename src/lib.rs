pub mod agent;
pub mod cli;
pub mod config;
pub mod llm;
pub mod models;
pub mod server;

use agent::ChatAgent;
use cli::Args;
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let gemini_configured = args.gemini_api_key
        .as_deref()
        .map(|k| !k.trim().is_empty())
        .unwrap_or(false);

    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Static Dir: {}", args.static_dir);
    info!("Chat Model: {}", args.chat_model);
    info!("Gemini Configured: {}", gemini_configured);
    info!("Request Timeout: {}s", args.request_timeout_secs);
    if let Some(path) = &args.persona_path {
        info!("Persona Path: {}", path);
    }
    info!("-------------------------");

    let agent = Arc::new(ChatAgent::new(&args)?);
    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, agent, args);
    server.run().await?;

    Ok(())
}
