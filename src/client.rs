use std::time::Duration;

use serde_json::Value;

use crate::error::{PromptDeckError, Result};
use crate::message::{ChatRequest, Turn};
use crate::panel::ChatPanel;

/// HTTP client for the promptdeckd proxy daemon.
#[derive(Clone)]
pub struct DashClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl DashClient {
    pub fn new(daemon_url: &str, token: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(2))
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| PromptDeckError::Runtime(e.to_string()))?;

        Ok(Self {
            http,
            base_url: daemon_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// POSTs the turn list to the tool's proxy route and coerces the JSON
    /// reply to a display string.
    pub async fn send_chat(&self, tool_id: &str, turns: &[Turn]) -> Result<String> {
        let url = format!("{}/api/{}", self.base_url, tool_id);
        let mut request = self.http.post(url).json(&ChatRequest {
            messages: turns.to_vec(),
        });
        if !self.token.trim().is_empty() {
            request = request.header("authorization", format!("Bearer {}", self.token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| PromptDeckError::Upstream(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PromptDeckError::Upstream(e.to_string()))?;
        if !status.is_success() {
            return Err(PromptDeckError::Upstream(format!("HTTP {status}: {body}")));
        }

        Ok(coerce_reply(&body))
    }

    /// One full submission round trip against a panel: begin, send, then
    /// append the pair on success or clear pending on failure. The error
    /// kind is returned so the caller can render a failure state.
    pub async fn submit(&self, panel: &mut ChatPanel, tool_id: &str, prompt: &str) -> Result<()> {
        let turns = panel.begin_submit(prompt)?;
        let prompt = turns
            .last()
            .map(|turn| turn.content.clone())
            .unwrap_or_default();

        match self.send_chat(tool_id, &turns).await {
            Ok(reply) => {
                panel.complete(prompt, reply);
                Ok(())
            }
            Err(err) => {
                panel.fail();
                Err(err)
            }
        }
    }

    pub async fn health(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.http.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

/// A JSON string relays its inner value; any other JSON payload is shown
/// as compact JSON text.
pub fn coerce_reply(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(text)) => text,
        Ok(value) => value.to_string(),
        Err(_) => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_payloads_coerce_to_their_inner_value() {
        assert_eq!(coerce_reply("\"users, orders\""), "users, orders");
    }

    #[test]
    fn structured_payloads_coerce_to_compact_json() {
        assert_eq!(
            coerce_reply("{\"result\": \"users, orders\"}"),
            "{\"result\":\"users, orders\"}"
        );
        assert_eq!(coerce_reply("[1, 2]"), "[1,2]");
        assert_eq!(coerce_reply("42"), "42");
    }

    #[test]
    fn non_json_payloads_pass_through() {
        assert_eq!(coerce_reply("plain text"), "plain text");
    }
}
