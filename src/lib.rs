pub mod cli;
pub mod error;
pub mod models;
pub mod server;
pub mod store;
pub mod wizard;

use cli::Args;
use log::info;
use server::Server;
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Store Type: {}", args.store_type);
    info!("Main Conversation Id: {}", args.main_conversation_id);
    info!("Chat Title: {}", args.chat_title);
    info!("Poll Interval (ms): {}", args.poll_interval_ms);
    if args.conversation_ttl_secs > 0 {
        info!("Conversation TTL (s): {}", args.conversation_ttl_secs);
        info!("Sweep Interval (s): {}", args.sweep_interval_secs);
    } else {
        info!("Conversation TTL: disabled");
    }
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let store = store::initialize_store(&args)?;
    let server = Server::new(store, args);
    server.run().await?;

    Ok(())
}
