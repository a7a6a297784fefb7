use reqwest::header::{AUTHORIZATION, HeaderName};
use serde_json::{Map, Value};

use newsroom_domain::protocol::Prompt;

#[test]
fn builds_bearer_auth_header() {
	let headers =
		newsroom_providers::auth_headers("secret", &Map::new()).expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
}

#[test]
fn rejects_non_string_default_headers() {
	let mut defaults = Map::new();

	defaults.insert("x-retries".to_string(), Value::from(3));

	assert!(newsroom_providers::extra_headers(&defaults).is_err());
}

#[test]
fn keeps_string_default_headers() {
	let mut defaults = Map::new();

	defaults.insert("x-client".to_string(), Value::from("newsroom"));

	let headers = newsroom_providers::extra_headers(&defaults).expect("Failed to build headers.");

	assert_eq!(headers.get(HeaderName::from_static("x-client")).expect("Missing header."), "newsroom");
	assert!(headers.get(AUTHORIZATION).is_none());
}

#[test]
fn instructions_become_system_message() {
	let prompt = Prompt { instructions: Some("rank".to_string()), input: "query".to_string() };
	let messages = newsroom_providers::llm::chat_messages(&prompt);

	assert_eq!(messages.len(), 2);
	assert_eq!(messages[0]["role"], "system");
	assert_eq!(messages[0]["content"], "rank");
	assert_eq!(messages[1]["role"], "user");
	assert_eq!(messages[1]["content"], "query");
}

#[test]
fn prompt_without_instructions_is_single_user_message() {
	let prompt = Prompt { instructions: None, input: "keywords".to_string() };
	let messages = newsroom_providers::llm::chat_messages(&prompt);

	assert_eq!(messages.len(), 1);
	assert_eq!(messages[0]["role"], "user");
}
