// ABOUTME: Loads patch profiles from TOML files and validates them before any file is touched.
// ABOUTME: Rejects fragments that could never be detected as present.

use std::fs;
use std::path::Path;

use dom_query::Document;

use crate::dom::query::find_by_id;
use crate::error::ConfigError;
use crate::profile::PatchProfile;

/// Parses a profile from TOML text and validates it.
pub fn parse_profile(text: &str) -> Result<PatchProfile, ConfigError> {
    let profile: PatchProfile = toml::from_str(text)?;
    validate(&profile)?;
    Ok(profile)
}

/// Reads a profile file from disk.
pub fn load_profile(path: impl AsRef<Path>) -> Result<PatchProfile, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_profile(&text)
}

/// Checks the invariants the patcher relies on.
pub fn validate(profile: &PatchProfile) -> Result<(), ConfigError> {
    for (i, rule) in profile.head_rules.iter().enumerate() {
        if !is_tag_name(&rule.tag) {
            return Err(ConfigError::invalid(format!(
                "head rule #{} has invalid tag name '{}'",
                i + 1,
                rule.tag
            )));
        }
        if let Some((name, _)) = rule
            .match_attrs
            .iter()
            .chain(&rule.extra_attrs)
            .find(|(name, _)| name.trim().is_empty())
        {
            return Err(ConfigError::invalid(format!(
                "head rule #{} has an empty attribute name '{}'",
                i + 1,
                name
            )));
        }
    }

    if !is_tag_name(&profile.container.tag) {
        return Err(ConfigError::invalid(format!(
            "container has invalid tag name '{}'",
            profile.container.tag
        )));
    }
    if profile.container.id.trim().is_empty() {
        return Err(ConfigError::invalid("container id must not be empty"));
    }

    if let Some(fragment) = &profile.fragment {
        if fragment.id.trim().is_empty() {
            return Err(ConfigError::invalid("fragment id must not be empty"));
        }
        // Otherwise the fragment is appended again on every run.
        let doc = Document::from(fragment.html.as_str());
        if find_by_id(&doc.root(), &fragment.id).is_none() {
            return Err(ConfigError::invalid(format!(
                "fragment html has no element with id '{}'",
                fragment.id
            )));
        }
    }

    Ok(())
}

fn is_tag_name(tag: &str) -> bool {
    let mut chars = tag.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}
