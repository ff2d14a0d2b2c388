use std::env;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use std::time::Duration;

use serde_json::{json, Value};

/// Environment variable holding the explanation-service API key
pub const API_KEY_ENV: &str = "PYOUT_GEMINI_KEY";

/// generateContent endpoint of the text-generation service
const API_BASE: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash-latest:generateContent";

/// Cap on one explain call
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the remote explanation service (blocking).
///
/// Every failure mode comes back as a display string, never a panic or a
/// propagated error.
#[derive(Clone)]
pub struct ExplainClient {
    http: reqwest::blocking::Client,
    api_base: String,
    api_key: String,
}

impl ExplainClient {
    /// Build a client from the environment; `None` when no key is configured
    pub fn from_env() -> Option<Self> {
        let key = env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty())?;
        Some(Self::new(API_BASE, key))
    }

    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("pyout/{}", env!("CARGO_PKG_VERSION")))
            .timeout(HTTP_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            api_base: api_base.into(),
            api_key: api_key.into(),
        }
    }

    /// Ask the service to explain `code`
    pub fn explain(&self, code: &str) -> String {
        let url = format!("{}?key={}", self.api_base, self.api_key);
        let body = json!({ "contents": [{ "parts": [{ "text": prompt_for(code) }] }] });

        let response = match self.http.post(&url).json(&body).send() {
            Ok(response) => response,
            Err(_) => return "Error: Failed to connect to the explanation service.".to_string(),
        };

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return format!(
                "Error: API request failed with status {}. {}",
                status.as_u16(),
                detail
            );
        }

        match response.json::<Value>() {
            Ok(data) => {
                parse_explanation(&data).unwrap_or_else(|| "No explanation found.".to_string())
            }
            Err(_) => "No explanation found.".to_string(),
        }
    }
}

/// Fixed instructional prompt wrapped around the snippet
fn prompt_for(code: &str) -> String {
    format!(
        "Explain this Python code to a beginner in simple language: \n\n```python\n{}\n```",
        code
    )
}

/// Pull the candidate text out of a generateContent response
fn parse_explanation(data: &Value) -> Option<String> {
    data["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Runs explain calls on worker threads, delivering through a channel
pub struct ExplainHandle {
    client: Option<ExplainClient>,
    tx: Sender<String>,
    rx: Receiver<String>,
}

impl ExplainHandle {
    pub fn from_env() -> Self {
        Self::with_client(ExplainClient::from_env())
    }

    pub fn with_client(client: Option<ExplainClient>) -> Self {
        let (tx, rx) = channel();
        Self { client, tx, rx }
    }

    /// Fire an explain request; the outcome arrives via `poll`
    pub fn spawn(&self, code: String) {
        let tx = self.tx.clone();
        match self.client.clone() {
            Some(client) => {
                thread::spawn(move || {
                    let _ = tx.send(client.explain(&code));
                });
            }
            None => {
                let _ = tx.send(format!(
                    "Error: no API key configured. Set {}.",
                    API_KEY_ENV
                ));
            }
        }
    }

    pub fn poll(&self) -> Option<String> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_wraps_code_in_fence() {
        let prompt = prompt_for("print(x)");
        assert!(prompt.starts_with("Explain this Python code to a beginner"));
        assert!(prompt.contains("```python\nprint(x)\n```"));
    }

    #[test]
    fn test_parse_explanation_reads_candidate_text() {
        let data = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "It prints x." }] }
            }]
        });
        assert_eq!(parse_explanation(&data), Some("It prints x.".to_string()));
    }

    #[test]
    fn test_parse_explanation_rejects_malformed_bodies() {
        assert_eq!(parse_explanation(&json!({})), None);
        assert_eq!(parse_explanation(&json!({ "candidates": [] })), None);
        let blank = json!({
            "candidates": [{ "content": { "parts": [{ "text": "  " }] } }]
        });
        assert_eq!(parse_explanation(&blank), None);
    }

    #[test]
    fn test_missing_key_reports_configuration_error() {
        let handle = ExplainHandle::with_client(None);
        handle.spawn("print(x)".to_string());

        let message = handle.poll().unwrap();
        assert!(message.contains(API_KEY_ENV));
        assert!(message.starts_with("Error:"));
    }
}
