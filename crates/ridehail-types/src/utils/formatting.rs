//! String formatting utilities.
//!
//! Helpers for rendering identifiers in logs and for normalizing hex
//! input before parsing.

/// Truncates a long identifier for display.
///
/// Digests and addresses dominate log lines otherwise; only the first
/// 8 characters carry enough information to visually correlate entries.
/// Counts characters, not bytes, so a digest with multi-byte content
/// cannot split a character.
pub fn truncate_id(id: &str) -> String {
	match id.char_indices().nth(8) {
		Some((offset, _)) => format!("{}..", &id[..offset]),
		None => id.to_string(),
	}
}

/// Strips a leading "0x" or "0X" from a hex string, if present.
pub fn without_0x_prefix(hex_str: &str) -> &str {
	hex_str
		.strip_prefix("0x")
		.or_else(|| hex_str.strip_prefix("0X"))
		.unwrap_or(hex_str)
}
