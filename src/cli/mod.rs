use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Server Args ---
    /// Host address and port for the HTTP server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:5000")]
    pub server_addr: String,

    /// Externally reachable base URL used when translating stored image paths
    /// into links. Defaults to http://{server_addr} when unset.
    #[arg(long, env = "PUBLIC_BASE_URL")]
    pub public_base_url: Option<String>,

    // --- Storage Args ---
    /// MySQL server hostname.
    #[arg(long, env = "DB_HOST", default_value = "127.0.0.1")]
    pub db_host: String,

    /// MySQL server port.
    #[arg(long, env = "DB_PORT", default_value = "3306")]
    pub db_port: u16,

    /// MySQL user for the conversation store.
    #[arg(long, env = "DB_USER", default_value = "root")]
    pub db_user: String,

    /// MySQL password for the conversation store.
    #[arg(long, env = "DB_PASSWORD", default_value = "")]
    pub db_password: String,

    /// Database holding the conversations table.
    #[arg(long, env = "DB_NAME", default_value = "chatbot")]
    pub db_name: String,

    /// Maximum number of pooled database connections.
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value = "5")]
    pub db_max_connections: u32,

    // --- Chat LLM Provider Args ---
    /// API key for the Generative Language API.
    #[arg(long, env = "GOOGLE_API_KEY", default_value = "")]
    pub chat_api_key: String,

    /// Model name for chat completion.
    #[arg(long, env = "CHAT_MODEL", default_value = "gemini-1.5-flash-latest")]
    pub chat_model: String,

    /// Base URL for the Generative Language API.
    #[arg(
        long,
        env = "CHAT_BASE_URL",
        default_value = "https://generativelanguage.googleapis.com/v1beta"
    )]
    pub chat_base_url: String,

    // --- File Store Args ---
    /// Directory where uploaded images are persisted and served from.
    #[arg(long, env = "UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: String,
}

impl Args {
    /// Base URL clients can reach this service on, without a trailing slash.
    pub fn public_base_url(&self) -> String {
        match &self.public_base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}", self.server_addr),
        }
    }
}
