use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Server Args ---
    /// Host address and port for the HTTP server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "0.0.0.0:3000")]
    pub server_addr: String,

    /// Directory of static frontend assets served at the root path. Skipped
    /// when the directory does not exist.
    #[arg(long, env = "STATIC_DIR", default_value = "public")]
    pub static_dir: String,

    // --- Gemini Provider Args ---
    /// API key for the Gemini generative-language API. Unset or blank runs
    /// the chatbot on local fallback replies only.
    #[arg(long, env = "GEMINI_API_KEY")]
    pub gemini_api_key: Option<String>,

    /// Model name for chat completion.
    #[arg(long, env = "CHAT_MODEL", default_value = "gemini-1.5-flash")]
    pub chat_model: String,

    /// Base URL for the generative-language API (e.g., a local stub during
    /// development).
    #[arg(long, env = "CHAT_BASE_URL")]
    pub chat_base_url: Option<String>,

    /// Timeout in seconds for a single provider call. Expiry degrades to a
    /// local reply like any other transport failure.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "12")]
    pub request_timeout_secs: u64,

    // --- Persona Args ---
    /// Path to a JSON persona/business configuration file overriding the
    /// built-in copy.
    #[arg(long, env = "PERSONA_PATH")]
    pub persona_path: Option<String>,

    // --- One-shot Mode ---
    /// Answer a single message on stdout as JSON and exit without starting
    /// the server.
    #[arg(long, value_name = "MESSAGE")]
    pub one_shot: Option<String>,
}
