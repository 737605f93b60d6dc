//! Maps structured backend failures to user-facing remediation templates.

use serde::Deserialize;

/// Structured payload a failed `runPipeline` call carries.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct PipelineFailure {
	#[serde(default)]
	pub error: String,
	#[serde(default)]
	pub error_type: Option<String>,
	#[serde(default)]
	pub details: Option<String>,
	#[serde(default)]
	pub solutions: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ErrorTemplate {
	pub kind: &'static str,
	pub title: &'static str,
	pub description: &'static str,
	pub solutions: &'static [&'static str],
}

const TEMPLATES: &[ErrorTemplate] = &[
	ErrorTemplate {
		kind: "auth_error",
		title: "Authentication failed",
		description: "The configured API credentials were rejected by the model provider.",
		solutions: &[
			"Check the API keys on the configuration page",
			"Make sure the selected provider matches the configured key",
			"Regenerate the key in the provider console if it expired",
		],
	},
	ErrorTemplate {
		kind: "quota_error",
		title: "Quota exhausted",
		description: "The provider reported that the account is out of quota or rate limited.",
		solutions: &[
			"Wait a few minutes and retry",
			"Top up the account or switch to another provider",
		],
	},
	ErrorTemplate {
		kind: "network_error",
		title: "Network error",
		description: "The backend could not reach the model provider.",
		solutions: &[
			"Check the network connection",
			"Retry the run; transient failures usually clear up",
		],
	},
	ErrorTemplate {
		kind: "file_error",
		title: "File processing failed",
		description: "One of the input documents could not be processed.",
		solutions: &[
			"Check that the input files are readable and not corrupted",
			"Remove unsupported file types from the input folder",
		],
	},
	ErrorTemplate {
		kind: "file_not_found",
		title: "Path not found",
		description: "The selected input or output path does not exist.",
		solutions: &[
			"Re-select the input path",
			"Create the output folder before running",
		],
	},
	ErrorTemplate {
		kind: "permission_error",
		title: "Permission denied",
		description: "The backend lacks permission to read or write the selected paths.",
		solutions: &[
			"Pick a folder the backend process can write to",
			"Fix the permissions on the selected paths",
		],
	},
];

const UNKNOWN: ErrorTemplate = ErrorTemplate {
	kind: "unknown",
	title: "Processing failed",
	description: "The pipeline stopped with an unrecognized error.",
	solutions: &["Retry the run", "Check the backend logs for details"],
};

pub fn template_for(error_type: Option<&str>) -> &'static ErrorTemplate {
	error_type
		.and_then(|t| TEMPLATES.iter().find(|tpl| tpl.kind == t))
		.unwrap_or(&UNKNOWN)
}

/// What the notification actually shows: template defaults, overridden by
/// whatever the backend supplied.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayError {
	pub kind: String,
	pub title: String,
	pub description: String,
	pub solutions: Vec<String>,
	pub details: Option<String>,
}

pub fn resolve(failure: &PipelineFailure) -> DisplayError {
	let template = template_for(failure.error_type.as_deref());
	let description = if failure.error.is_empty() {
		template.description.to_string()
	} else {
		failure.error.clone()
	};
	let solutions = if failure.solutions.is_empty() {
		template.solutions.iter().map(|s| s.to_string()).collect()
	} else {
		failure.solutions.clone()
	};
	DisplayError {
		kind: template.kind.to_string(),
		title: template.title.to_string(),
		description,
		solutions,
		details: failure.details.clone(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn known_error_types_map_to_their_template() {
		assert_eq!(template_for(Some("auth_error")).title, "Authentication failed");
		assert_eq!(template_for(Some("quota_error")).kind, "quota_error");
		assert_eq!(template_for(Some("permission_error")).kind, "permission_error");
	}

	#[test]
	fn unrecognized_or_missing_types_fall_back_to_unknown() {
		assert_eq!(template_for(Some("cosmic_ray")).kind, "unknown");
		assert_eq!(template_for(None).kind, "unknown");
	}

	#[test]
	fn backend_solutions_override_the_template() {
		let failure = PipelineFailure {
			error: "key rejected".into(),
			error_type: Some("auth_error".into()),
			details: Some("HTTP 401".into()),
			solutions: vec!["rotate the key".into()],
		};
		let shown = resolve(&failure);
		assert_eq!(shown.title, "Authentication failed");
		assert_eq!(shown.description, "key rejected");
		assert_eq!(shown.solutions, vec!["rotate the key".to_string()]);
		assert_eq!(shown.details.as_deref(), Some("HTTP 401"));
	}

	#[test]
	fn empty_failure_still_renders_a_complete_notice() {
		let shown = resolve(&PipelineFailure::default());
		assert_eq!(shown.title, "Processing failed");
		assert!(!shown.description.is_empty());
		assert!(!shown.solutions.is_empty());
	}

	#[test]
	fn failure_payload_deserializes_from_backend_json() {
		let failure: PipelineFailure = serde_json::from_str(
			r#"{"error":"no quota","error_type":"quota_error","solutions":["wait"]}"#,
		)
		.unwrap();
		assert_eq!(failure.error_type.as_deref(), Some("quota_error"));
		assert_eq!(resolve(&failure).title, "Quota exhausted");
	}
}
