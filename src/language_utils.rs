use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// This module provides functions for validating and describing the language
/// codes used by catalogs and by the remote translation service: ISO 639-1
/// (2-letter) and ISO 639-3 (3-letter) codes, optionally carrying a region
/// subtag such as `pt-BR` or `zh_CN`.
/// Split a locale code into its primary language and optional region subtag
fn split_code(code: &str) -> (String, Option<String>) {
    let trimmed = code.trim();
    match trimmed.split_once(['-', '_']) {
        Some((primary, region)) => (primary.to_lowercase(), Some(region.to_uppercase())),
        None => (trimmed.to_lowercase(), None),
    }
}

/// Resolve the primary subtag of a code to an ISO language
fn resolve(code: &str) -> Option<Language> {
    let (primary, _) = split_code(code);
    match primary.len() {
        2 => Language::from_639_1(&primary),
        3 => Language::from_639_3(&primary),
        _ => None,
    }
}

/// Validate that a code (with optional region subtag) names a real language
pub fn validate_language_code(code: &str) -> Result<()> {
    if resolve(code).is_some() {
        Ok(())
    } else {
        Err(anyhow!("Invalid language code: {}", code))
    }
}

/// Check whether a directory name looks like a locale the tool can translate
///
/// Used when scanning a locale tree: directories that are not language codes
/// (build artifacts, VCS dirs) are skipped.
pub fn is_supported_locale(code: &str) -> bool {
    resolve(code).is_some()
}

/// Normalize a code for the translation service: lowercase language,
/// uppercase region, dash-separated (e.g. `pt_br` becomes `pt-BR`)
pub fn normalize_language_code(code: &str) -> Result<String> {
    if resolve(code).is_none() {
        return Err(anyhow!("Invalid language code: {}", code));
    }
    let (primary, region) = split_code(code);
    Ok(match region {
        Some(region) => format!("{}-{}", primary, region),
        None => primary,
    })
}

/// English name of the language behind a code, for log messages
pub fn get_language_name(code: &str) -> Result<String> {
    let language = resolve(code)
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))?;
    Ok(language.to_name().to_string())
}

/// Check if two codes refer to the same language, ignoring region and
/// 2-letter vs 3-letter spelling
pub fn language_codes_match(first: &str, second: &str) -> bool {
    match (resolve(first), resolve(second)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
