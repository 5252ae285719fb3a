// ABOUTME: HTML parsing engines used to build the mutable document tree.
// ABOUTME: Engines differ only in whitespace and entity normalization, never in patch semantics.

use std::fmt;
use std::str::FromStr;

use dom_query::Document;
use scraper::Html;
use tracing::debug;

/// The parser front-end used to read a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserEngine {
    /// dom_query's html5ever tree builder, used directly.
    #[default]
    Html5,
    /// scraper's html5ever front-end; its serialization is loaded into dom_query.
    Scraper,
}

impl ParserEngine {
    /// Parses `source` into a full document.
    pub fn parse(self, source: &str) -> Document {
        match self {
            ParserEngine::Html5 => Document::from(source),
            ParserEngine::Scraper => {
                let html = Html::parse_document(source);
                if !html.errors.is_empty() {
                    debug!(
                        count = html.errors.len(),
                        first = %html.errors[0],
                        "scraper reported recoverable parse errors"
                    );
                }
                Document::from(html.html())
            }
        }
    }
}

impl fmt::Display for ParserEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParserEngine::Html5 => "html5",
            ParserEngine::Scraper => "scraper",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ParserEngine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html5" | "html5ever" | "lxml" => Ok(ParserEngine::Html5),
            "scraper" | "html" => Ok(ParserEngine::Scraper),
            other => Err(format!("unknown parser '{}' (expected html5 or scraper)", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_accepts_aliases() {
        assert_eq!("html5".parse::<ParserEngine>(), Ok(ParserEngine::Html5));
        assert_eq!("LXML".parse::<ParserEngine>(), Ok(ParserEngine::Html5));
        assert_eq!("scraper".parse::<ParserEngine>(), Ok(ParserEngine::Scraper));
        assert!("regex".parse::<ParserEngine>().is_err());
    }

    #[test]
    fn test_engines_agree_on_structure() {
        let src = "<title>t</title><p class=x>Hi &amp; bye</p>";
        for engine in [ParserEngine::Html5, ParserEngine::Scraper] {
            let doc = engine.parse(src);
            assert_eq!(doc.select("head title").text().to_string(), "t", "{}", engine);
            assert_eq!(doc.select("body p.x").text().to_string(), "Hi & bye", "{}", engine);
        }
    }
}
