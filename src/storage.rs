//! Browser-persisted configuration and run history.
//!
//! Read/write failures are logged and surfaced as `Option`/`bool`; storage
//! being unavailable never takes the app down.

use std::collections::HashMap;

use log::warn;
use serde::{Deserialize, Serialize};

pub const API_CONFIG_KEY: &str = "apiConfig";
pub const MODEL_CONFIG_KEY: &str = "modelConfig";
pub const PROGRESS_HISTORY_KEY: &str = "progressHistory";

fn local_storage() -> Option<web_sys::Storage> {
	web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub fn storage_get_string(key: &str) -> Option<String> {
	local_storage().and_then(|s| s.get_item(key).ok().flatten())
}

pub fn storage_set_string(key: &str, value: &str) -> bool {
	match local_storage() {
		Some(s) => s.set_item(key, value).is_ok(),
		None => false,
	}
}

pub fn storage_remove(key: &str) {
	if let Some(s) = local_storage() {
		let _ = s.remove_item(key);
	}
}

/// Credentials for the model providers and the text recognizer.
/// Field names follow the backend's wire spelling.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
	#[serde(default)]
	pub spark_api_key: String,
	#[serde(default)]
	pub silicon_api_key: String,
	#[serde(default)]
	pub openai_api_key: String,
	#[serde(default)]
	pub glm_api_key: String,
	#[serde(rename = "APPID", default)]
	pub app_id: String,
	#[serde(rename = "APISecret", default)]
	pub api_secret: String,
	#[serde(rename = "APIKEY", default)]
	pub api_key: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
	#[serde(default)]
	pub model_provider: String,
	#[serde(default)]
	pub model_name: String,
}

impl Default for ModelConfig {
	fn default() -> Self {
		Self {
			model_provider: "silicon".to_string(),
			model_name: "Pro/deepseek-ai/DeepSeek-V3".to_string(),
		}
	}
}

/// Per-step run durations, fed by completed pipeline runs and read by the
/// statistics panel.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressHistory {
	#[serde(rename = "totalRuns", default)]
	pub total_runs: u32,
	#[serde(rename = "stepTimes", default)]
	pub step_times: HashMap<String, Vec<f64>>,
}

impl ProgressHistory {
	pub fn record_run(&mut self, steps: &[String], elapsed_secs: f64) {
		self.total_runs += 1;
		for step in steps {
			self.step_times.entry(step.clone()).or_default().push(elapsed_secs);
		}
	}

	/// Mean duration across every recorded step time, rounded to whole
	/// seconds. Zero when nothing has been recorded.
	pub fn average_secs(&self) -> u64 {
		let mut total = 0.0;
		let mut count = 0usize;
		for times in self.step_times.values() {
			for t in times {
				total += t;
				count += 1;
			}
		}
		if count == 0 {
			0
		} else {
			(total / count as f64).round() as u64
		}
	}

	pub fn step_count(&self) -> usize {
		self.step_times.len()
	}
}

fn load_json<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
	let raw = storage_get_string(key)?;
	match serde_json::from_str(&raw) {
		Ok(value) => Some(value),
		Err(err) => {
			// A corrupt blob is dropped so the next save starts clean.
			warn!("discarding unreadable {key} blob: {err}");
			storage_remove(key);
			None
		}
	}
}

fn save_json<T: Serialize>(key: &str, value: &T) -> bool {
	match serde_json::to_string(value) {
		Ok(raw) => storage_set_string(key, &raw),
		Err(err) => {
			warn!("failed to serialize {key}: {err}");
			false
		}
	}
}

pub fn load_api_config() -> Option<ApiConfig> {
	load_json(API_CONFIG_KEY)
}

pub fn save_api_config(config: &ApiConfig) -> bool {
	save_json(API_CONFIG_KEY, config)
}

pub fn load_model_config() -> Option<ModelConfig> {
	load_json(MODEL_CONFIG_KEY)
}

pub fn save_model_config(config: &ModelConfig) -> bool {
	save_json(MODEL_CONFIG_KEY, config)
}

pub fn load_progress_history() -> ProgressHistory {
	load_json(PROGRESS_HISTORY_KEY).unwrap_or_default()
}

pub fn save_progress_history(history: &ProgressHistory) -> bool {
	save_json(PROGRESS_HISTORY_KEY, history)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn api_config_round_trips_wire_field_names() {
		let config = ApiConfig {
			spark_api_key: "sk".into(),
			app_id: "id1".into(),
			..ApiConfig::default()
		};
		let raw = serde_json::to_string(&config).unwrap();
		assert!(raw.contains("\"APPID\":\"id1\""));
		let back: ApiConfig = serde_json::from_str(&raw).unwrap();
		assert_eq!(back, config);
	}

	#[test]
	fn model_config_defaults_match_the_initial_selection() {
		let config = ModelConfig::default();
		assert_eq!(config.model_provider, "silicon");
		assert_eq!(config.model_name, "Pro/deepseek-ai/DeepSeek-V3");
	}

	#[test]
	fn history_average_spans_all_steps() {
		let mut history = ProgressHistory::default();
		history.record_run(&["preprocess".into(), "tree".into()], 30.0);
		history.record_run(&["preprocess".into()], 90.0);
		assert_eq!(history.total_runs, 2);
		assert_eq!(history.step_count(), 2);
		// Samples: 30, 30, 90.
		assert_eq!(history.average_secs(), 50);
	}

	#[test]
	fn empty_history_averages_to_zero() {
		assert_eq!(ProgressHistory::default().average_secs(), 0);
	}
}
