use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;

use newsroom_domain::protocol::Prompt;

/// Runs one chat completion and returns the raw reply text.
pub async fn complete(cfg: &newsroom_config::LlmProviderConfig, prompt: &Prompt) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": chat_messages(prompt),
	});
	let res = client
		.post(&url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_completion_text(&json)
}

pub fn chat_messages(prompt: &Prompt) -> Vec<Value> {
	let mut messages = Vec::with_capacity(2);

	if let Some(instructions) = prompt.instructions.as_deref() {
		messages.push(serde_json::json!({ "role": "system", "content": instructions }));
	}

	messages.push(serde_json::json!({ "role": "user", "content": prompt.input }));

	messages
}

fn parse_completion_text(json: &Value) -> Result<String> {
	json.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.map(str::to_string)
		.ok_or_else(|| eyre::eyre!("Completion response is missing message content."))
}
