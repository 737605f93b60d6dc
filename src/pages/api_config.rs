use leptos::prelude::*;
use leptos::task::spawn_local;
use log::warn;
use serde_json::json;

use crate::rpc;
use crate::storage::{ApiConfig, ModelConfig};

struct Provider {
	key: &'static str,
	name: &'static str,
	description: &'static str,
	api_key_field: &'static str,
	models: &'static [(&'static str, &'static str)],
}

const PROVIDERS: &[Provider] = &[
	Provider {
		key: "silicon",
		name: "SiliconFlow",
		description: "Hosted open-weight models",
		api_key_field: "silicon_api_key",
		models: &[
			("Pro/deepseek-ai/DeepSeek-V3", "DeepSeek V3 Pro"),
			("deepseek-ai/DeepSeek-V3", "DeepSeek V3"),
			("zai-org/GLM-4.5", "GLM-4.5"),
			("Qwen/Qwen3-235B-A22B-Instruct-2507", "Qwen3 235B Instruct"),
		],
	},
	Provider {
		key: "spark",
		name: "iFlytek Spark",
		description: "Required provider; also drives text recognition",
		api_key_field: "spark_api_key",
		models: &[
			("4.0Ultra", "Spark 4.0 Ultra"),
			("generalv3.5", "Spark 3.5"),
			("max-32k", "Spark Max 32K"),
			("lite", "Spark Lite"),
		],
	},
	Provider {
		key: "zhipuai",
		name: "ZhipuAI",
		description: "GLM model family",
		api_key_field: "glm_api_key",
		models: &[
			("glm-4.5", "GLM-4.5"),
			("glm-4.5-air", "GLM-4.5 Air"),
			("glm-4.5-flash", "GLM-4.5 Flash"),
			("glm-4-plus", "GLM-4 Plus"),
		],
	},
	Provider {
		key: "openai",
		name: "OpenAI",
		description: "GPT model family",
		api_key_field: "openai_api_key",
		models: &[
			("gpt-5", "GPT-5"),
			("gpt-5-mini", "GPT-5 Mini"),
			("gpt-4.1", "GPT-4.1"),
		],
	},
];

fn provider_by_key(key: &str) -> &'static Provider {
	PROVIDERS
		.iter()
		.find(|p| p.key == key)
		.unwrap_or(&PROVIDERS[0])
}

fn config_field(config: &ApiConfig, field: &str) -> String {
	match field {
		"spark_api_key" => config.spark_api_key.clone(),
		"silicon_api_key" => config.silicon_api_key.clone(),
		"openai_api_key" => config.openai_api_key.clone(),
		"glm_api_key" => config.glm_api_key.clone(),
		"APPID" => config.app_id.clone(),
		"APISecret" => config.api_secret.clone(),
		"APIKEY" => config.api_key.clone(),
		_ => String::new(),
	}
}

fn set_config_field(config: &mut ApiConfig, field: &str, value: String) {
	match field {
		"spark_api_key" => config.spark_api_key = value,
		"silicon_api_key" => config.silicon_api_key = value,
		"openai_api_key" => config.openai_api_key = value,
		"glm_api_key" => config.glm_api_key = value,
		"APPID" => config.app_id = value,
		"APISecret" => config.api_secret = value,
		"APIKEY" => config.api_key = value,
		_ => {}
	}
}

#[component]
fn KeyField(
	label: &'static str,
	field: &'static str,
	config: RwSignal<ApiConfig>,
	show_keys: RwSignal<bool>,
	saved: RwSignal<bool>,
) -> impl IntoView {
	view! {
		<div class="key-field">
			<label>{label}</label>
			<input
				type=move || if show_keys.get() { "text" } else { "password" }
				prop:value=move || config.with(|c| config_field(c, field))
				on:input=move |ev| {
					let value = event_target_value(&ev);
					config.update(|c| set_config_field(c, field, value));
					saved.set(false);
				}
			/>
		</div>
	}
}

/// Provider, model and credential configuration. Saved to localStorage and
/// pushed to the backend on a best-effort basis.
#[component]
pub fn ApiConfigPage() -> impl IntoView {
	let api_config = RwSignal::new(ApiConfig::default());
	let model_config = RwSignal::new(ModelConfig::default());
	let loading = RwSignal::new(true);
	let saved = RwSignal::new(false);
	let show_keys = RwSignal::new(false);

	Effect::new(move |_| {
		spawn_local(async move {
			if let Ok(value) = rpc::invoke("getApiConfig", json!({})).await {
				if let Ok(config) = serde_json::from_value::<ApiConfig>(value) {
					api_config.set(config);
				}
			}
			if let Ok(value) = rpc::invoke("getModelConfig", json!({})).await {
				if let Ok(config) = serde_json::from_value::<ModelConfig>(value) {
					model_config.set(config);
				}
			}
			loading.set(false);
		});
	});

	let save = move |_| {
		let api = api_config.get_untracked();
		let model = model_config.get_untracked();
		spawn_local(async move {
			let api_value = serde_json::to_value(&api).unwrap_or_default();
			let model_value = serde_json::to_value(&model).unwrap_or_default();
			let api_ok = rpc::invoke("saveApiConfig", api_value.clone())
				.await
				.map(|v| v.as_bool().unwrap_or(false))
				.unwrap_or(false);
			let model_ok = rpc::invoke("saveModelConfig", model_value.clone())
				.await
				.map(|v| v.as_bool().unwrap_or(false))
				.unwrap_or(false);
			if !(api_ok && model_ok) {
				warn!("configuration could not be persisted locally");
				return;
			}
			// Merge both blobs for the backend's environment push.
			let mut merged = api_value;
			if let (Some(obj), Some(extra)) = (merged.as_object_mut(), model_value.as_object()) {
				for (k, v) in extra {
					obj.insert(k.clone(), v.clone());
				}
			}
			if rpc::invoke("sendConfigToBackend", merged).await.is_err() {
				warn!("backend unreachable; configuration saved locally only");
			}
			saved.set(true);
		});
	};

	view! {
		<section class="panel">
			<h1>"API configuration"</h1>

			{move || {
				loading
					.get()
					.then(|| view! { <p class="loading-hint">"Loading configuration..."</p> })
			}}

			<div class="provider-grid">
				{PROVIDERS
					.iter()
					.map(|provider| {
						let key = provider.key;
						view! {
							<button
								type="button"
								class="provider-card"
								class:active=move || {
									model_config.with(|m| m.model_provider == key)
								}
								on:click=move |_| {
									model_config
										.update(|m| {
											m.model_provider = key.to_string();
											m.model_name = provider_by_key(key)
												.models
												.first()
												.map(|(value, _)| value.to_string())
												.unwrap_or_default();
										});
									saved.set(false);
								}
							>
								<span class="provider-name">{provider.name}</span>
								<span class="provider-description">{provider.description}</span>
							</button>
						}
					})
					.collect_view()}
			</div>

			<label class="model-select">
				"Model"
				<select on:change=move |ev| {
					model_config.update(|m| m.model_name = event_target_value(&ev));
					saved.set(false);
				}>
					{move || {
						let provider =
							provider_by_key(&model_config.with(|m| m.model_provider.clone()));
						provider
							.models
							.iter()
							.map(|(value, label)| {
								let value = *value;
								view! {
									<option
										value=value
										selected=move || {
											model_config.with(|m| m.model_name == value)
										}
									>
										{*label}
									</option>
								}
							})
							.collect_view()
					}}
				</select>
			</label>

			<div class="key-fields">
				<label class="show-keys">
					<input
						type="checkbox"
						prop:checked=move || show_keys.get()
						on:change=move |ev| show_keys.set(event_target_checked(&ev))
					/>
					"Show keys"
				</label>
				{move || {
					let field =
						provider_by_key(&model_config.with(|m| m.model_provider.clone()))
							.api_key_field;
					view! {
						<KeyField
							label="Provider API key"
							field=field
							config=api_config
							show_keys=show_keys
							saved=saved
						/>
					}
				}}
				<h2>"Text recognition (required)"</h2>
				<KeyField label="APPID" field="APPID" config=api_config show_keys=show_keys saved=saved />
				<KeyField
					label="APISecret"
					field="APISecret"
					config=api_config
					show_keys=show_keys
					saved=saved
				/>
				<KeyField label="APIKEY" field="APIKEY" config=api_config show_keys=show_keys saved=saved />
			</div>

			<button type="button" class="save-button" on:click=save>
				"Save configuration"
			</button>
			{move || {
				saved
					.get()
					.then(|| view! { <p class="saved-hint">"Configuration saved"</p> })
			}}
		</section>
	}
}
