use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for target-language handling
///
/// Translation targets can be given as ISO 639-1 (2-letter) codes,
/// ISO 639-2 (3-letter) codes or plain English names ("Burmese").
/// This module resolves any of those to a canonical `Language`, to the
/// display name used in prompts and to the short code used in output
/// file names.
///
/// Resolve a language given as an ISO code or an English name
pub fn resolve_language(input: &str) -> Result<Language> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("Empty language"));
    }

    let lowered = trimmed.to_lowercase();

    // ISO 639-1 (2-letter) code
    if lowered.len() == 2 {
        if let Some(lang) = Language::from_639_1(&lowered) {
            return Ok(lang);
        }
    }

    // ISO 639-2 (3-letter) code
    if lowered.len() == 3 {
        if let Some(lang) = Language::from_639_3(&lowered) {
            return Ok(lang);
        }

        // ISO 639-2/B codes that differ from ISO 639-2/T
        let part2t = match lowered.as_str() {
            "fre" => Some("fra"), // French
            "ger" => Some("deu"), // German
            "dut" => Some("nld"), // Dutch
            "gre" => Some("ell"), // Greek
            "chi" => Some("zho"), // Chinese
            "cze" => Some("ces"), // Czech
            "ice" => Some("isl"), // Icelandic
            "alb" => Some("sqi"), // Albanian
            "arm" => Some("hye"), // Armenian
            "baq" => Some("eus"), // Basque
            "bur" => Some("mya"), // Burmese
            "per" => Some("fas"), // Persian
            "geo" => Some("kat"), // Georgian
            "may" => Some("msa"), // Malay
            "mac" => Some("mkd"), // Macedonian
            "rum" => Some("ron"), // Romanian
            "slo" => Some("slk"), // Slovak
            "wel" => Some("cym"), // Welsh
            _ => None,
        };
        if let Some(code) = part2t {
            if let Some(lang) = Language::from_639_3(code) {
                return Ok(lang);
            }
        }
    }

    // English name, tolerating lowercase input
    if let Some(lang) = Language::from_name(trimmed) {
        return Ok(lang);
    }
    if let Some(lang) = Language::from_name(&title_case(&lowered)) {
        return Ok(lang);
    }

    Err(anyhow!("Unrecognized language: {}", input))
}

/// Validate a language input without keeping the resolved value
pub fn validate_language(input: &str) -> Result<()> {
    resolve_language(input).map(|_| ())
}

/// English display name for prompts, e.g. "my" -> "Burmese"
pub fn display_name(input: &str) -> Result<String> {
    Ok(resolve_language(input)?.to_name().to_string())
}

/// Short code for output file naming: ISO 639-1 when it exists,
/// ISO 639-3 otherwise
pub fn short_code(input: &str) -> Result<String> {
    let lang = resolve_language(input)?;
    match lang.to_639_1() {
        Some(code) => Ok(code.to_string()),
        None => Ok(lang.to_639_3().to_string()),
    }
}

fn title_case(lowered: &str) -> String {
    lowered
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
