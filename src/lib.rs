pub mod cli;
pub mod config;
pub mod gateway;
pub mod llm;
pub mod models;
pub mod server;

use cli::Args;
use gateway::ChatGateway;
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Chat LLM Type: {}", args.chat_llm_type);
    info!("Chat Model: {}", args.chat_model);
    info!("Project: {}", args.project_id.as_deref().unwrap_or("(unset)"));
    info!("Location: {}", args.location);
    info!("Data Store: {}", args.datastore_id.as_deref().unwrap_or("(none)"));
    info!("Attempt Profiles: {}", args.attempt_profiles.join(","));
    info!("Request Timeout: {}s", args.request_timeout_secs);
    info!("CORS Origins: {}", args.cors_allow_origins.join(","));
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let gateway = Arc::new(ChatGateway::from_args(&args).await?);
    info!(
        "Gateway ready: client {}, error policy {}, retrieval {}",
        gateway.client_status(),
        gateway.policy(),
        if gateway.settings().retrieval_enabled() { "enabled" } else { "disabled" }
    );

    let addr = args.server_addr.clone();
    let server = Server::new(addr, gateway, args);
    server.run().await?;

    Ok(())
}
