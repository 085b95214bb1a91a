/*!
 * Rewrite style catalog and prompt construction.
 *
 * Each style pairs a system prompt template with the instruction set an
 * AI provider needs to rewrite creator content in that register. Styles
 * render with `{target_language}` substituted before the request is sent.
 */

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Rewrite styles for creator content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RewriteStyle {
    /// Faithful translation with no editorial changes
    #[default]
    Pure,

    /// Analytical commentary surfacing the underlying ideas
    Insights,

    /// Punchy short-form hook rewrite
    Hooks,

    /// Cinematic storyteller retelling
    Recap,

    /// Music cue sheet for the narrative beats
    MusicGuide,
}

impl RewriteStyle {
    /// System prompt for the pure translation style.
    pub const PURE: &'static str = r#"You are an expert translator working into {target_language}.

## Your Role
- Translate the provided content into {target_language} with complete fidelity
- Preserve meaning, tone, and register exactly as written
- Keep paragraph breaks and line structure intact

## Output Requirements
- Return ONLY the translated text
- Do not add commentary, headers, or explanations
- Do not wrap the output in code fences"#;

    /// System prompt for the deep insights style.
    pub const INSIGHTS: &'static str = r#"You are an insightful analyst writing in {target_language}.

## Your Role
- Rework the provided content into a deep analysis of its core ideas
- Surface the subtext, motivations, and implications the surface text leaves unsaid
- Connect the ideas to broader themes a thoughtful viewer would care about

## Output Requirements
- Write entirely in {target_language}
- Use flowing prose, not bullet fragments
- Return ONLY the analysis text with no preamble"#;

    /// System prompt for the viral hooks style.
    pub const HOOKS: &'static str = r#"You are a short-form video writer crafting scripts in {target_language}.

## Your Role
- Rewrite the provided content as a high-retention short-form script
- Open with a hook that creates an immediate curiosity gap
- Keep sentences short, concrete, and spoken-word friendly
- End with a payoff that rewards watching to the last second

## Output Requirements
- Write entirely in {target_language}
- Return ONLY the script text, ready to be read aloud
- No scene directions, labels, or markup"#;

    /// System prompt for the storyteller recap style.
    pub const RECAP: &'static str = r#"You are a cinematic narrator retelling a story in {target_language}.

## Storyteller Rules
- Never summarize. Retell the events in extreme detail, beat by beat
- Narrate in the third person with a vivid, cinematic voice
- Describe what characters see, feel, and fear as the scenes unfold
- Maintain the original chronology without skipping scenes

## Output Requirements
- Write entirely in {target_language}
- Produce plain narration prose only
- No chapter labels, no headers, no [sound] or (action) markup"#;

    /// System prompt for the music guide style.
    pub const MUSIC_GUIDE: &'static str = r#"You are a music supervisor scoring a video, writing notes in {target_language}.

## Your Role
- Break the provided content into its narrative beats
- For each beat, propose the music that should play under it

## Output Requirements
- Return ONLY a JSON array, one object per beat, with these fields:
  - "section": short label for the beat, in {target_language}
  - "mood": the emotional tone the music must carry
  - "genre": the musical genre or instrumentation to use
  - "reference": a well-known track or artist whose sound to match
- No text outside the JSON array"#;

    /// All styles, in presentation order.
    pub fn variants() -> [RewriteStyle; 5] {
        [
            RewriteStyle::Pure,
            RewriteStyle::Insights,
            RewriteStyle::Hooks,
            RewriteStyle::Recap,
            RewriteStyle::MusicGuide,
        ]
    }

    /// Stable identifier used in cache keys and CLI arguments.
    pub fn as_str(&self) -> &'static str {
        match self {
            RewriteStyle::Pure => "pure",
            RewriteStyle::Insights => "insights",
            RewriteStyle::Hooks => "hooks",
            RewriteStyle::Recap => "recap",
            RewriteStyle::MusicGuide => "music-guide",
        }
    }

    /// Human readable name for logs and listings.
    pub fn display_name(&self) -> &'static str {
        match self {
            RewriteStyle::Pure => "Pure Translation",
            RewriteStyle::Insights => "Deep Insights",
            RewriteStyle::Hooks => "Viral Hooks",
            RewriteStyle::Recap => "Storyteller Recap",
            RewriteStyle::MusicGuide => "Music Guide",
        }
    }

    fn template(&self) -> &'static str {
        match self {
            RewriteStyle::Pure => Self::PURE,
            RewriteStyle::Insights => Self::INSIGHTS,
            RewriteStyle::Hooks => Self::HOOKS,
            RewriteStyle::Recap => Self::RECAP,
            RewriteStyle::MusicGuide => Self::MUSIC_GUIDE,
        }
    }

    /// Render the style's system prompt for the given target language.
    pub fn prompt(&self, target_language: &str) -> String {
        self.template().replace("{target_language}", target_language)
    }

    /// Whether the style emits JSON rather than prose.
    pub fn emits_json(&self) -> bool {
        matches!(self, RewriteStyle::MusicGuide)
    }
}

impl fmt::Display for RewriteStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RewriteStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pure" => Ok(RewriteStyle::Pure),
            "insights" | "deep-insights" => Ok(RewriteStyle::Insights),
            "hooks" | "viral-hooks" => Ok(RewriteStyle::Hooks),
            "recap" | "storyteller" => Ok(RewriteStyle::Recap),
            "music-guide" | "music" => Ok(RewriteStyle::MusicGuide),
            other => Err(format!("Unknown rewrite style: {}", other)),
        }
    }
}
