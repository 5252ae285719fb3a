// ABOUTME: Patch profile types: head rules, container spec, content fragment, and built-in profiles.
// ABOUTME: A profile describes everything the patcher guarantees about a page.

use std::fmt;

use serde::Deserialize;

use crate::error::ConfigError;

/// Placeholder expanded to the page's folder name inside attribute values.
pub const SLUG_PLACEHOLDER: &str = "{slug}";

/// Ordered attribute list. Order is kept so inserted tags serialize predictably.
pub type Attrs = Vec<(String, String)>;

/// A tag that must exist exactly once in the document head.
///
/// `match_attrs` decides whether the tag is already present; `extra_attrs` are
/// written on insertion only. An `<meta name="app-slug">` rule, for example,
/// matches on `name` and writes `content` as an extra.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HeadRule {
    pub tag: String,
    #[serde(rename = "match", default, with = "attr_map")]
    pub match_attrs: Attrs,
    #[serde(rename = "extra", default, with = "attr_map")]
    pub extra_attrs: Attrs,
}

impl HeadRule {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            match_attrs: Vec::new(),
            extra_attrs: Vec::new(),
        }
    }

    /// Add an attribute that participates in matching.
    pub fn matching(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.match_attrs.push((name.into(), value.into()));
        self
    }

    /// Add an attribute that is only written on insertion.
    pub fn with_extra(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_attrs.push((name.into(), value.into()));
        self
    }

    /// Match attributes with `{slug}` expanded.
    pub fn resolved_match(&self, slug: &str) -> Attrs {
        expand(&self.match_attrs, slug)
    }

    /// All attributes to write on insertion, match attributes first.
    pub fn resolved_all(&self, slug: &str) -> Attrs {
        let mut attrs = expand(&self.match_attrs, slug);
        attrs.extend(expand(&self.extra_attrs, slug));
        attrs
    }
}

impl fmt::Display for HeadRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (name, value) in &self.match_attrs {
            write!(f, " {}=\"{}\"", name, value)?;
        }
        write!(f, ">")
    }
}

fn expand(attrs: &[(String, String)], slug: &str) -> Attrs {
    attrs
        .iter()
        .map(|(k, v)| (k.clone(), v.replace(SLUG_PLACEHOLDER, slug)))
        .collect()
}

/// The wrapper element that receives all body content.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContainerSpec {
    #[serde(default = "default_container_tag")]
    pub tag: String,
    pub id: String,
}

impl Default for ContainerSpec {
    fn default() -> Self {
        Self {
            tag: default_container_tag(),
            id: "app-root".to_string(),
        }
    }
}

fn default_container_tag() -> String {
    "main".to_string()
}

/// An HTML block appended to the container unless an element with `id` is already in it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FragmentSpec {
    pub id: String,
    pub html: String,
}

/// A named bundle of everything the patcher ensures on a page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PatchProfile {
    pub name: String,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(rename = "head", default)]
    pub head_rules: Vec<HeadRule>,
    #[serde(default)]
    pub container: ContainerSpec,
    #[serde(default)]
    pub fragment: Option<FragmentSpec>,
}

fn default_lang() -> String {
    "en".to_string()
}

const CLINICIAN_NOTES_HTML: &str = r#"<section id="clinician-notes">
  <div style="background: var(--surface); border: 1px solid var(--line); border-radius: 12px; box-shadow: var(--shadow); padding: 16px; margin-top: 24px;">
    <label for="clinician-comment" style="display:block;font-weight:600;margin-bottom:8px;">
      Clinician comments (optional)
    </label>
    <textarea id="clinician-comment" rows="4" style="width:100%; padding:10px; border-radius:8px; border:1px solid var(--line); font: inherit; resize: vertical;"
      placeholder="Enter any notes relevant to this session..."></textarea>
    <p style="margin:8px 0 0; color: var(--muted); font-size: 0.9rem;">
      This note will be added as <code>clinician_comment</code> in the exported CSV.
    </p>
  </div>
</section>"#;

impl PatchProfile {
    /// Shared theme stylesheet, frame script and the app-slug meta tag.
    pub fn frame() -> Self {
        Self {
            name: "frame".to_string(),
            lang: default_lang(),
            head_rules: vec![
                HeadRule::new("meta")
                    .matching("name", "app-slug")
                    .with_extra("content", SLUG_PLACEHOLDER),
                HeadRule::new("link")
                    .matching("rel", "stylesheet")
                    .matching("href", "../shared/theme.css"),
                HeadRule::new("script")
                    .matching("src", "../shared/frame.js")
                    .matching("defer", ""),
            ],
            container: ContainerSpec::default(),
            fragment: None,
        }
    }

    /// Clinician feedback script plus the clinician comment block.
    pub fn clinician_notes() -> Self {
        Self {
            name: "clinician-notes".to_string(),
            lang: default_lang(),
            head_rules: vec![HeadRule::new("script")
                .matching("src", "../shared/js/clinician_feedback.js")
                .matching("defer", "")],
            container: ContainerSpec::default(),
            fragment: Some(FragmentSpec {
                id: "clinician-notes".to_string(),
                html: CLINICIAN_NOTES_HTML.to_string(),
            }),
        }
    }

    /// Look up a built-in profile by name.
    pub fn builtin(name: &str) -> Result<Self, ConfigError> {
        match name.to_lowercase().as_str() {
            "frame" => Ok(Self::frame()),
            "clinician-notes" | "clinician" => Ok(Self::clinician_notes()),
            _ => Err(ConfigError::UnknownProfile(name.to_string())),
        }
    }
}

/// Deserializes a TOML inline table into an ordered attribute list.
mod attr_map {
    use serde::{Deserialize, Deserializer};

    use super::Attrs;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Attrs, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = toml::Table::deserialize(deserializer)?;
        map.into_iter()
            .map(|(k, v)| match v {
                toml::Value::String(s) => Ok((k, s)),
                toml::Value::Boolean(true) => Ok((k, String::new())),
                other => Err(serde::de::Error::custom(format!(
                    "attribute '{}' must be a string or true, got {}",
                    k,
                    other.type_str()
                ))),
            })
            .collect()
    }
}
