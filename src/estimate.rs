//! Heuristic run-time prediction from input metadata.
//!
//! Purely advisory: a bad guess is a display artifact, never an error.

const MIB: u64 = 1024 * 1024;

/// Predictions are clamped into this window to avoid degenerate output.
const MIN_PREDICTION_SECS: f64 = 30.0;
const MAX_PREDICTION_SECS: f64 = 1800.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeCategory {
	Small,
	Medium,
	Large,
	Huge,
}

impl SizeCategory {
	pub fn from_bytes(bytes: u64) -> Self {
		if bytes < MIB {
			Self::Small
		} else if bytes < 10 * MIB {
			Self::Medium
		} else if bytes < 100 * MIB {
			Self::Large
		} else {
			Self::Huge
		}
	}

	fn multiplier(self) -> f64 {
		match self {
			Self::Small => 0.5,
			Self::Medium => 1.0,
			Self::Large => 2.0,
			Self::Huge => 3.0,
		}
	}
}

const TYPE_MULTIPLIERS: &[(&str, f64)] = &[
	("jpg", 1.3),
	("jpeg", 1.3),
	("png", 1.3),
	("gif", 1.3),
	("bmp", 1.3),
	("pdf", 1.2),
	("txt", 0.8),
	("md", 0.7),
	("json", 0.6),
	("doc", 1.0),
	("docx", 1.0),
	("html", 0.9),
	("htm", 0.9),
];

fn type_multiplier(extension: &str) -> f64 {
	let ext = extension.trim_start_matches('.').to_ascii_lowercase();
	TYPE_MULTIPLIERS
		.iter()
		.find(|(k, _)| *k == ext)
		.map(|(_, m)| *m)
		.unwrap_or(1.0)
}

fn is_image(extension: &str) -> bool {
	matches!(
		extension.trim_start_matches('.').to_ascii_lowercase().as_str(),
		"jpg" | "jpeg" | "png" | "gif" | "bmp"
	)
}

const STEP_BASE_SECS: &[(&str, f64)] = &[("preprocess", 30.0), ("augment", 120.0), ("tree", 90.0)];

fn base_step_time(step: &str) -> f64 {
	STEP_BASE_SECS
		.iter()
		.find(|(k, _)| *k == step)
		.map(|(_, t)| *t)
		.unwrap_or(60.0)
}

fn clamp_prediction(secs: f64) -> u64 {
	secs.clamp(MIN_PREDICTION_SECS, MAX_PREDICTION_SECS).round() as u64
}

/// Predicted seconds for one file going through `step`.
pub fn estimate_file(size_bytes: u64, extension: &str, step: &str) -> u64 {
	let predicted = base_step_time(step)
		* SizeCategory::from_bytes(size_bytes).multiplier()
		* type_multiplier(extension);
	clamp_prediction(predicted)
}

/// Predicted seconds for a folder going through `step`. More files cost
/// more, and image/pdf-heavy folders cost extra.
pub fn estimate_folder(total_size_bytes: u64, file_count: u32, extensions: &[String], step: &str) -> u64 {
	let mut type_mult = 1.0;
	if extensions.iter().any(|e| is_image(e)) {
		type_mult *= 1.3;
	}
	if extensions
		.iter()
		.any(|e| e.trim_start_matches('.').eq_ignore_ascii_case("pdf"))
	{
		type_mult *= 1.2;
	}
	let count_adjustment = (0.1 * file_count as f64).max(1.0);
	let predicted = base_step_time(step)
		* SizeCategory::from_bytes(total_size_bytes).multiplier()
		* type_mult
		* count_adjustment;
	clamp_prediction(predicted)
}

pub fn format_duration(secs: u64) -> String {
	if secs < 60 {
		format!("{secs}s")
	} else {
		format!("{}m {}s", secs / 60, secs % 60)
	}
}

pub fn format_file_size(bytes: u64) -> String {
	const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
	if bytes == 0 {
		return "0 B".to_string();
	}
	let mut value = bytes as f64;
	let mut unit = 0;
	while value >= 1024.0 && unit < UNITS.len() - 1 {
		value /= 1024.0;
		unit += 1;
	}
	format!("{:.1} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn medium_pdf_is_base_times_type_multiplier() {
		// 2 MiB pdf: medium bucket (x1.0), pdf (x1.2).
		let secs = estimate_file(2 * MIB, "pdf", "preprocess");
		assert_eq!(secs, (30.0f64 * 1.0 * 1.2).round() as u64);
	}

	#[test]
	fn unknown_extension_and_step_use_neutral_defaults() {
		let secs = estimate_file(2 * MIB, "xyz", "mystery-step");
		assert_eq!(secs, 60);
	}

	#[test]
	fn tiny_text_file_is_clamped_to_the_floor() {
		// small (x0.5) * json (x0.6) * preprocess 30s = 9s, below the floor.
		assert_eq!(estimate_file(1024, "json", "preprocess"), 30);
	}

	#[test]
	fn huge_inputs_are_clamped_to_the_ceiling() {
		let secs = estimate_folder(500 * MIB, 200, &["pdf".to_string()], "augment");
		assert_eq!(secs, 1800);
	}

	#[test]
	fn folder_type_multipliers_stack_for_images_and_pdfs() {
		let exts = vec!["png".to_string(), "pdf".to_string(), "md".to_string()];
		// augment 120 * medium 1.0 * 1.3 * 1.2 * count max(1, 0.5).
		let secs = estimate_folder(2 * MIB, 5, &exts, "augment");
		assert_eq!(secs, (120.0f64 * 1.3 * 1.2).round() as u64);
	}

	#[test]
	fn file_count_adjustment_kicks_in_above_ten_files() {
		let exts = vec!["md".to_string()];
		let ten = estimate_folder(2 * MIB, 10, &exts, "tree");
		let forty = estimate_folder(2 * MIB, 40, &exts, "tree");
		assert_eq!(ten, 90);
		assert_eq!(forty, 360);
	}

	#[test]
	fn size_buckets_split_at_the_documented_boundaries() {
		assert_eq!(SizeCategory::from_bytes(MIB - 1), SizeCategory::Small);
		assert_eq!(SizeCategory::from_bytes(MIB), SizeCategory::Medium);
		assert_eq!(SizeCategory::from_bytes(10 * MIB), SizeCategory::Large);
		assert_eq!(SizeCategory::from_bytes(100 * MIB), SizeCategory::Huge);
	}

	#[test]
	fn durations_format_in_minutes_and_seconds() {
		assert_eq!(format_duration(45), "45s");
		assert_eq!(format_duration(150), "2m 30s");
	}

	#[test]
	fn file_sizes_format_with_one_decimal() {
		assert_eq!(format_file_size(0), "0 B");
		assert_eq!(format_file_size(512), "512.0 B");
		assert_eq!(format_file_size(2 * MIB), "2.0 MB");
	}
}
