pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod llm;
pub mod models;
pub mod server;
pub mod uploads;

use cli::Args;
use config::persona::ConversationPolicy;
use history::initialize_turn_store;
use llm::new_model_client;
use log::info;
use server::{api::AppState, Server};
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Public Base URL: {}", args.public_base_url());
    info!("Database Host: {}:{}", args.db_host, args.db_port);
    info!("Database Name: {}", args.db_name);
    info!("Database User: {}", args.db_user);
    info!("Chat Model: {}", args.chat_model);
    info!("Chat Base URL: {}", args.chat_base_url);
    info!("Upload Directory: {}", args.upload_dir);
    info!("-------------------------");

    tokio::fs::create_dir_all(&args.upload_dir).await?;

    let store = initialize_turn_store(&args).await?;
    let model = new_model_client(&args)?;
    let policy = ConversationPolicy::default();
    info!("Conversation policy version: {}", policy.version);

    let state = AppState::new(store, model, policy, &args);
    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, state);
    server.run().await?;

    Ok(())
}
