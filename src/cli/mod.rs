use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Server Args ---
    /// Host address and port for the HTTP server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "0.0.0.0:5000")]
    pub server_addr: String,

    /// Optional path to the TLS certificate file (PEM format) for enabling HTTPS. Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format) for enabling HTTPS. Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,

    // --- Conversation Store Args ---
    /// Conversation store type (memory)
    #[arg(long, env = "STORE_TYPE", default_value = "memory")]
    pub store_type: String,

    /// Well-known id of the persistent chat conversation returned by /new/main.
    #[arg(long, env = "MAIN_CONVERSATION_ID", default_value = "main_chat")]
    pub main_conversation_id: String,

    /// Idle time in seconds after which a conversation is evicted. 0 means conversations live for the whole process.
    #[arg(long, env = "CONVERSATION_TTL_SECS", default_value = "0")]
    pub conversation_ttl_secs: u64,

    /// How often the idle sweep runs, in seconds. Only used when CONVERSATION_TTL_SECS > 0.
    #[arg(long, env = "SWEEP_INTERVAL_SECS", default_value = "60")]
    pub sweep_interval_secs: u64,

    // --- Page Args ---
    /// Title and heading of the persistent chat page.
    #[arg(long, env = "CHAT_TITLE", default_value = "Persistent Chat")]
    pub chat_title: String,

    /// Interval at which the browser page polls for updates, in milliseconds.
    #[arg(long, env = "POLL_INTERVAL_MS", default_value = "2000")]
    pub poll_interval_ms: u64,
}

impl Args {
    pub fn tls_paths(&self) -> Option<(&str, &str)> {
        if !self.enable_tls {
            return None;
        }
        match (&self.tls_cert_path, &self.tls_key_path) {
            (Some(cert), Some(key)) => Some((cert.as_str(), key.as_str())),
            _ => None,
        }
    }
}
