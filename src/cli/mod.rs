use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Server Args ---
    /// Host address and port for the HTTP server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "0.0.0.0:8000")]
    pub server_addr: String,

    /// Name reported by the health endpoint.
    #[arg(long, env = "SERVICE_NAME", default_value = "Grace AI Chat API")]
    pub service_name: String,

    /// Comma separated list of allowed CORS origins. "*" allows any origin, method and header.
    #[arg(long, env = "CORS_ALLOW_ORIGINS", default_value = "*", value_delimiter = ',')]
    pub cors_allow_origins: Vec<String>,

    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,

    // --- Chat LLM Provider Args ---
    /// Type of generation backend (vertex, gemini, mock)
    #[arg(long, env = "CHAT_LLM_TYPE", default_value = "vertex")]
    pub chat_llm_type: String,

    /// Base URL for the generation API. Defaults depend on the backend type.
    #[arg(long, env = "CHAT_BASE_URL")] // No default, let adapters handle defaults if None
    pub chat_base_url: Option<String>,

    /// API Key for the Gemini API backend
    #[arg(long, env = "CHAT_API_KEY", default_value = "")]
    pub chat_api_key: String,

    /// Model name for generation (e.g., gemini-2.0-flash-001)
    #[arg(long, env = "CHAT_MODEL", default_value = "gemini-2.0-flash-001")]
    pub chat_model: String,

    // --- Vertex AI Args ---
    /// Google Cloud project id used by the Vertex AI backend
    #[arg(long, env = "GOOGLE_CLOUD_PROJECT")]
    pub project_id: Option<String>,

    /// Google Cloud region used by the Vertex AI backend
    #[arg(long, env = "GOOGLE_CLOUD_LOCATION", default_value = "us-central1")]
    pub location: String,

    /// Path to a service account key file used to mint Vertex AI access tokens.
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS")]
    pub credentials_path: Option<String>,

    /// Pre-issued OAuth2 access token for Vertex AI. Used instead of a service account key.
    #[arg(long, env = "VERTEX_ACCESS_TOKEN")]
    pub access_token: Option<String>,

    // --- Retrieval Args ---
    /// Retrieval data store, either a full resource name or a bare data store id.
    /// No retrieval tool is attached when unset.
    #[arg(long, env = "DATASTORE_ID")]
    pub datastore_id: Option<String>,

    /// Location of the retrieval data store when DATASTORE_ID is a bare id.
    #[arg(long, env = "DATASTORE_LOCATION", default_value = "global")]
    pub datastore_location: String,

    // --- Generation Args ---
    #[arg(long, env = "TEMPERATURE", default_value = "1.0")]
    pub temperature: f32,

    #[arg(long, env = "TOP_P", default_value = "0.95")]
    pub top_p: f32,

    #[arg(long, env = "MAX_OUTPUT_TOKENS", default_value = "8192")]
    pub max_output_tokens: u32,

    /// Temperature used by the "simple" attempt profile.
    #[arg(long, env = "FALLBACK_TEMPERATURE", default_value = "0.7")]
    pub fallback_temperature: f32,

    /// Output token limit used by the "simple" attempt profile.
    #[arg(long, env = "FALLBACK_MAX_OUTPUT_TOKENS", default_value = "2048")]
    pub fallback_max_output_tokens: u32,

    /// Ordered list of request profiles to attempt (full, simple).
    #[arg(long, env = "ATTEMPT_PROFILES", default_value = "full,simple", value_delimiter = ',')]
    pub attempt_profiles: Vec<String>,

    /// Safety filter categories sent with threshold OFF on the "full" profile.
    #[arg(
        long,
        env = "DISABLED_SAFETY_CATEGORIES",
        default_value = "HARM_CATEGORY_HATE_SPEECH,HARM_CATEGORY_DANGEROUS_CONTENT,HARM_CATEGORY_SEXUALLY_EXPLICIT,HARM_CATEGORY_HARASSMENT",
        value_delimiter = ','
    )]
    pub disabled_safety_categories: Vec<String>,

    /// Optional JSON file overriding the persona and the fixed reply strings.
    #[arg(long, env = "PROMPTS_PATH")]
    pub prompts_path: Option<String>,

    // --- Error Handling Args ---
    /// How failed generations are reported: "graceful" replies with an apology,
    /// "strict" answers 500 with the error detail.
    #[arg(long, env = "ERROR_POLICY", default_value = "graceful")]
    pub error_policy: String,

    /// Timeout in seconds for each call to the generation backend. 0 disables it.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "60")]
    pub request_timeout_secs: u64,
}
