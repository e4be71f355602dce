//! # Endpoint Resolution
//!
//! Decides which configured URL a benchmark run targets, which backend
//! selector the load generator is told to use, and the exact chat
//! completions path appended to the base URL.

use crate::config::Config;
use crate::error::BenchError;

/// Backend selector handed to the load generator. Identifies the client
/// protocol used to reach the target endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Generic OpenAI-compatible completions client.
    OpenAi,
    /// OpenAI-compatible chat completions client.
    OpenAiChat,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::OpenAi => "openai",
            Backend::OpenAiChat => "openai-chat",
        }
    }

    /// Narrow the generic selector to the chat-specific one. The hosted
    /// endpoints serve chat-completions semantics, so this always happens
    /// before invocation.
    pub fn narrow_to_chat(self) -> Backend {
        match self {
            Backend::OpenAi => Backend::OpenAiChat,
            other => other,
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the endpoint a run targets.
///
/// `BASETEN_BASE_URL` wins over `BASETEN_API_URL`; both speak the
/// OpenAI-compatible protocol. Neither being set is a configuration error
/// naming both accepted variables.
pub fn resolve_base_url(config: &Config) -> Result<(String, Backend), BenchError> {
    if let Some(base) = non_empty(&config.base_url) {
        return Ok((base, Backend::OpenAi));
    }
    if let Some(base) = non_empty(&config.api_url) {
        return Ok((base, Backend::OpenAi));
    }
    Err(BenchError::Config(
        "No endpoint configured. Set BASETEN_BASE_URL to the OpenAI-compatible \
         base URL of the deployment, or BASETEN_API_URL to a direct endpoint URL."
            .to_string(),
    ))
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Build the chat completions path for a base URL.
///
/// Three cases, depending on how much of the versioned path the base URL
/// already carries:
/// - base ends in `/v1`: only `/chat/completions` is appended
/// - base ends in `/v1/`: `chat/completions` is appended without a leading
///   slash so the concatenation has no double slash
/// - otherwise: the full `/v1/chat/completions` is appended
pub fn chat_endpoint_path(base_url: &str) -> String {
    if base_url.ends_with("/v1") {
        "/chat/completions".to_string()
    } else if base_url.ends_with("/v1/") {
        "chat/completions".to_string()
    } else {
        "/v1/chat/completions".to_string()
    }
}
