//! JSON-over-HTTP shim to the pipeline backend.
//!
//! Every backend operation goes through [`invoke`]: a POST to
//! `/api/<command>`, except the config commands which resolve against
//! localStorage first and only fall back to the remote endpoint.

use log::warn;
use serde::Deserialize;
use serde_json::{Value, json};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use crate::components::graph_view::GraphDataset;
use crate::errors::PipelineFailure;
use crate::storage;
use crate::store::StepState;

pub const BACKEND_URL: &str = "http://localhost:5001";

#[derive(Clone, Debug, PartialEq)]
pub enum RpcError {
	/// The fetch itself failed (backend down, CORS, DNS).
	Network(String),
	/// The backend answered with a non-OK status.
	Http(u16),
	/// The response body was not the JSON we expected.
	Decode(String),
}

impl std::fmt::Display for RpcError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			RpcError::Network(msg) => write!(f, "network error: {msg}"),
			RpcError::Http(status) => write!(f, "backend returned HTTP {status}"),
			RpcError::Decode(msg) => write!(f, "unreadable response: {msg}"),
		}
	}
}

impl std::error::Error for RpcError {}

fn js_error_message(err: JsValue) -> String {
	err.as_string()
		.unwrap_or_else(|| format!("{err:?}"))
}

async fn post_json(command: &str, body: &Value) -> Result<Value, RpcError> {
	let window = web_sys::window().ok_or_else(|| RpcError::Network("no window".into()))?;

	let init = RequestInit::new();
	init.set_method("POST");
	init.set_body(&JsValue::from_str(&body.to_string()));

	let url = format!("{BACKEND_URL}/api/{command}");
	let request = Request::new_with_str_and_init(&url, &init)
		.map_err(|e| RpcError::Network(js_error_message(e)))?;
	request
		.headers()
		.set("Content-Type", "application/json")
		.map_err(|e| RpcError::Network(js_error_message(e)))?;

	let response = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(|e| RpcError::Network(js_error_message(e)))?;
	let response: Response = response
		.dyn_into()
		.map_err(|e| RpcError::Decode(js_error_message(e)))?;

	let status = response.status();
	let text_promise = response
		.text()
		.map_err(|e| RpcError::Decode(js_error_message(e)))?;
	let text = JsFuture::from(text_promise)
		.await
		.map_err(|e| RpcError::Decode(js_error_message(e)))?
		.as_string()
		.unwrap_or_default();

	let value: Value =
		serde_json::from_str(&text).map_err(|e| RpcError::Decode(e.to_string()))?;
	// Error statuses still carry a structured body; hand it back so the
	// caller can read error/error_type out of it.
	if !(200..300).contains(&status) && value.get("error").is_none() {
		return Err(RpcError::Http(status));
	}
	Ok(value)
}

pub fn is_local_command(command: &str) -> bool {
	matches!(
		command,
		"getApiConfig" | "saveApiConfig" | "getModelConfig" | "saveModelConfig"
	)
}

/// Uniform entry point for every backend command.
pub async fn invoke(command: &str, args: Value) -> Result<Value, RpcError> {
	match command {
		"getApiConfig" => Ok(get_api_config().await),
		"saveApiConfig" => Ok(json!(save_api_config(&args).await)),
		"getModelConfig" => Ok(get_model_config().await),
		"saveModelConfig" => Ok(json!(save_model_config(&args))),
		_ => post_json(command, &args).await,
	}
}

/// Local storage first; remote as a fallback that is cached locally;
/// defaults when both are empty.
async fn get_api_config() -> Value {
	if let Some(config) = storage::load_api_config() {
		return serde_json::to_value(&config).unwrap_or_default();
	}
	if let Ok(value) = post_json("getApiConfig", &json!({})).await {
		if let Ok(config) = serde_json::from_value::<storage::ApiConfig>(value.clone()) {
			let _ = storage::save_api_config(&config);
		}
		return value;
	}
	serde_json::to_value(storage::ApiConfig::default()).unwrap_or_default()
}

async fn save_api_config(args: &Value) -> bool {
	let Ok(config) = serde_json::from_value::<storage::ApiConfig>(args.clone()) else {
		warn!("saveApiConfig called with a malformed payload");
		return false;
	};
	let saved = storage::save_api_config(&config);
	// Remote persistence is best effort; local storage is the source of truth.
	if post_json("saveApiConfig", args).await.is_err() {
		warn!("backend unreachable; API config saved locally only");
	}
	saved
}

async fn get_model_config() -> Value {
	if let Some(config) = storage::load_model_config() {
		return serde_json::to_value(&config).unwrap_or_default();
	}
	if let Ok(value) = post_json("getModelConfig", &json!({})).await {
		if let Ok(config) = serde_json::from_value::<storage::ModelConfig>(value.clone()) {
			let _ = storage::save_model_config(&config);
		}
		return value;
	}
	serde_json::to_value(storage::ModelConfig::default()).unwrap_or_default()
}

fn save_model_config(args: &Value) -> bool {
	match serde_json::from_value::<storage::ModelConfig>(args.clone()) {
		Ok(config) => storage::save_model_config(&config),
		Err(_) => {
			warn!("saveModelConfig called with a malformed payload");
			false
		}
	}
}

/// QA difficulty; serialized with the backend's literal labels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Difficulty {
	Easy,
	#[default]
	Medium,
	Hard,
}

impl Difficulty {
	pub fn wire_value(self) -> &'static str {
		match self {
			Difficulty::Easy => "简单",
			Difficulty::Medium => "中等",
			Difficulty::Hard => "困难",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Difficulty::Easy => "Easy",
			Difficulty::Medium => "Medium",
			Difficulty::Hard => "Hard",
		}
	}

	pub fn from_wire(value: &str) -> Self {
		match value {
			"简单" => Difficulty::Easy,
			"困难" => Difficulty::Hard,
			_ => Difficulty::Medium,
		}
	}

	pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
}

#[derive(Debug, Deserialize)]
struct GraphResponse {
	#[serde(default)]
	success: bool,
	#[serde(default)]
	data: GraphDataset,
	#[serde(default)]
	error: Option<String>,
}

/// Fetches the graph built by the last pipeline run. A missing success
/// flag surfaces as the inline, retryable error message.
pub async fn get_knowledge_graph(output_path: &str) -> Result<GraphDataset, String> {
	let value = invoke("getKnowledgeGraph", json!({ "output_path": output_path }))
		.await
		.map_err(|e| e.to_string())?;
	let response: GraphResponse =
		serde_json::from_value(value).map_err(|e| format!("unreadable graph payload: {e}"))?;
	if response.success {
		Ok(response.data)
	} else {
		Err(response
			.error
			.unwrap_or_else(|| "failed to load the knowledge graph".to_string()))
	}
}

pub async fn generate_qa(
	graph_path: &str,
	concepts: &[String],
	difficulty: Difficulty,
	output: &str,
) -> Result<(), String> {
	let value = invoke(
		"generateQA",
		json!({
			"graphPath": graph_path,
			"concepts": concepts,
			"difficulty": difficulty.wire_value(),
			"output": output,
		}),
	)
	.await
	.map_err(|e| e.to_string())?;
	if value.get("success").and_then(Value::as_bool).unwrap_or(false) {
		Ok(())
	} else {
		Err(value
			.get("error")
			.and_then(Value::as_str)
			.unwrap_or("question generation failed")
			.to_string())
	}
}

pub async fn run_pipeline(
	input_path: &str,
	output_path: &str,
	steps: &[String],
) -> Result<(), PipelineFailure> {
	let result = invoke(
		"runPipeline",
		json!({
			"input_path": input_path,
			"output_path": output_path,
			"steps": steps,
		}),
	)
	.await;
	let value = match result {
		Ok(value) => value,
		Err(RpcError::Network(msg)) => {
			return Err(PipelineFailure {
				error: msg,
				error_type: Some("network_error".to_string()),
				..PipelineFailure::default()
			});
		}
		Err(err) => {
			return Err(PipelineFailure {
				error: err.to_string(),
				..PipelineFailure::default()
			});
		}
	};
	if value.get("success").and_then(Value::as_bool).unwrap_or(false) {
		Ok(())
	} else {
		Err(serde_json::from_value(value).unwrap_or_default())
	}
}

pub async fn load_state(output_path: &str) -> Result<StepState, RpcError> {
	let value = invoke("loadState", json!({ "output_path": output_path })).await?;
	if !value.get("success").and_then(Value::as_bool).unwrap_or(false) {
		return Ok(StepState::default());
	}
	Ok(value
		.get("state")
		.cloned()
		.and_then(|v| serde_json::from_value(v).ok())
		.unwrap_or_default())
}

async fn pick_path(command: &str) -> Option<String> {
	let value = invoke(command, json!({})).await.ok()?;
	if !value.get("success").and_then(Value::as_bool).unwrap_or(false) {
		return None;
	}
	value
		.get("path")
		.and_then(Value::as_str)
		.map(str::to_string)
}

pub async fn select_input() -> Option<String> {
	pick_path("selectInput").await
}

pub async fn select_folder() -> Option<String> {
	pick_path("selectFolder").await
}

pub async fn create_output_folder(path: &str) -> Option<String> {
	let value = invoke("createOutputFolder", json!({ "path": path })).await.ok()?;
	if !value.get("success").and_then(Value::as_bool).unwrap_or(false) {
		return None;
	}
	value
		.get("path")
		.and_then(Value::as_str)
		.map(str::to_string)
}

pub async fn open_folder(path: &str) -> bool {
	match invoke("openFolder", json!({ "path": path })).await {
		Ok(value) => value.get("success").and_then(Value::as_bool).unwrap_or(false),
		Err(_) => false,
	}
}

/// Folder metadata the estimator feeds on.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct FolderInfo {
	#[serde(rename = "totalSize", default)]
	pub total_size: u64,
	#[serde(rename = "fileCount", default)]
	pub file_count: u32,
	#[serde(rename = "fileTypes", default)]
	pub file_types: Vec<String>,
}

pub async fn get_folder_info(path: &str) -> Option<FolderInfo> {
	let value = invoke("getFolderInfo", json!({ "path": path })).await.ok()?;
	if !value.get("success").and_then(Value::as_bool).unwrap_or(false) {
		return None;
	}
	serde_json::from_value(value).ok()
}

/// Monotonic ticket counter for in-flight graph loads. A response is
/// applied only while its ticket is still the latest one issued, so a
/// rapid double reload cannot finish out of order.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestSeq {
	latest: u64,
}

impl RequestSeq {
	pub fn begin(&mut self) -> u64 {
		self.latest += 1;
		self.latest
	}

	pub fn is_current(&self, ticket: u64) -> bool {
		ticket == self.latest
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_the_config_commands_resolve_locally() {
		for cmd in ["getApiConfig", "saveApiConfig", "getModelConfig", "saveModelConfig"] {
			assert!(is_local_command(cmd));
		}
		for cmd in ["runPipeline", "getKnowledgeGraph", "generateQA", "loadState"] {
			assert!(!is_local_command(cmd));
		}
	}

	#[test]
	fn difficulty_round_trips_through_wire_labels() {
		for d in Difficulty::ALL {
			assert_eq!(Difficulty::from_wire(d.wire_value()), d);
		}
		assert_eq!(Difficulty::from_wire("garbage"), Difficulty::Medium);
	}

	#[test]
	fn stale_tickets_are_rejected_after_a_newer_request() {
		let mut seq = RequestSeq::default();
		let first = seq.begin();
		let second = seq.begin();
		assert!(!seq.is_current(first));
		assert!(seq.is_current(second));
	}

	#[test]
	fn folder_info_deserializes_the_wire_field_names() {
		let info: FolderInfo = serde_json::from_str(
			r#"{"success":true,"totalSize":2097152,"fileCount":3,"fileTypes":["md","pdf"]}"#,
		)
		.unwrap();
		assert_eq!(info.total_size, 2 * 1024 * 1024);
		assert_eq!(info.file_count, 3);
		assert_eq!(info.file_types, vec!["md".to_string(), "pdf".to_string()]);
	}
}
