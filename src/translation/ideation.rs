/*!
 * Structured viral content idea generation.
 *
 * Idea bundles are requested as schema-constrained JSON so the provider
 * returns a machine-readable array instead of prose. The field names are
 * camelCase on the wire to match the response schema sent with the request.
 */

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A single short-video content strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViralIdea {
    /// Video title
    pub title: String,

    /// Opening hook line
    pub hook: String,

    /// Beat-by-beat content roadmap
    pub roadmap: String,

    /// Full voiceover script
    pub script: String,

    /// Thumbnail image prompt that renders the overlay text
    pub thumb_prompt_with_text: String,

    /// Thumbnail image prompt with no text baked in
    pub thumb_prompt_no_text: String,

    /// Overlay text to place on the thumbnail
    pub thumbnail_text: String,
}

/// Response schema for an idea bundle of `count` entries.
///
/// Uses the uppercase type names the Gemini REST API expects.
pub fn bundle_schema(count: usize) -> Value {
    json!({
        "type": "ARRAY",
        "minItems": count,
        "maxItems": count,
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "hook": { "type": "STRING" },
                "roadmap": { "type": "STRING" },
                "script": { "type": "STRING" },
                "thumbPromptWithText": { "type": "STRING" },
                "thumbPromptNoText": { "type": "STRING" },
                "thumbnailText": { "type": "STRING" }
            },
            "required": [
                "title",
                "hook",
                "roadmap",
                "script",
                "thumbPromptWithText",
                "thumbPromptNoText",
                "thumbnailText"
            ]
        }
    })
}

/// Parse a provider response into an idea bundle.
///
/// Providers without schema enforcement tend to wrap JSON in markdown
/// fences, so fences are stripped before parsing.
pub fn parse_bundle(text: &str) -> Result<Vec<ViralIdea>> {
    let body = strip_code_fences(text);
    let ideas: Vec<ViralIdea> =
        serde_json::from_str(body).context("Failed to parse idea bundle JSON")?;

    if ideas.is_empty() {
        return Err(anyhow!("Provider returned an empty idea bundle"));
    }

    Ok(ideas)
}

fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string ("json") on the opening fence line
    let rest = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };

    rest.strip_suffix("```").unwrap_or(rest).trim()
}
