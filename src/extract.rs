//! Pulls the root `<svg>` attributes and the raw inner markup out of an SVG string.
//!
//! This is not an XML parser: the inner content is never inspected, only
//! located, so that it can be injected verbatim into a mounted node.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::OnceLock;

use crate::config::SvgXmlConfig;
use crate::error::{SvgXmlError, SvgXmlResult};

/// An attribute declared on the root `<svg>` tag. `value` is `None` for
/// boolean-style attributes written without `=`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkupAttribute {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Root attributes in source order plus the markup between the root tags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub attributes: Vec<MarkupAttribute>,
    pub inner: String,
}

impl Extraction {
    /// Looks up an attribute by name. When a name repeats, the last one wins.
    pub fn attribute(&self, name: &str) -> Option<&MarkupAttribute> {
        self.attributes.iter().rev().find(|a| a.name == name)
    }
}

/// Extract with the default configuration (self-closing roots rejected).
pub fn extract(markup: &str) -> SvgXmlResult<Extraction> {
    extract_with(markup, &SvgXmlConfig::default())
}

pub fn extract_with(markup: &str, config: &SvgXmlConfig) -> SvgXmlResult<Extraction> {
    let start = root_start(markup)
        .ok_or_else(|| SvgXmlError::malformed("no <svg>...</svg> element found"))?;
    let markup = &markup[start..];

    let extraction = match span_regex().captures(markup) {
        Some(caps) => {
            // Starts with the delimiter after `<svg`: whitespace, `/` or `>`
            let content = caps.get(1).map_or("", |m| m.as_str());
            let end = find_tag_end(content).ok_or_else(|| {
                SvgXmlError::malformed("opening <svg> tag is never closed with '>'")
            })?;
            Extraction {
                attributes: scan_attributes(&content[..end]),
                inner: content[end + 1..].to_string(),
            }
        }
        None => extract_self_closing(markup, config)?,
    };

    tracing::debug!(
        attributes = extraction.attributes.len(),
        inner_len = extraction.inner.len(),
        "Extracted SVG markup"
    );
    Ok(extraction)
}

fn extract_self_closing(markup: &str, config: &SvgXmlConfig) -> SvgXmlResult<Extraction> {
    let not_found = || SvgXmlError::malformed("no <svg>...</svg> element found");

    let open = open_regex().find(markup).ok_or_else(not_found)?;
    // Keep the delimiter so that `<svg/>` still has its '/' in view
    let rest = &markup[open.end() - 1..];
    let end = find_tag_end(rest).ok_or_else(not_found)?;
    let attrs = rest[..end].trim_end();

    if !attrs.ends_with('/') {
        return Err(not_found());
    }
    if !config.allow_self_closing {
        return Err(SvgXmlError::UnsupportedSelfClosing);
    }

    Ok(Extraction {
        attributes: scan_attributes(&attrs[..attrs.len() - 1]),
        inner: String::new(),
    })
}

/// Byte offset of the first `<svg` that is not inside a `<!-- -->` comment.
fn root_start(markup: &str) -> Option<usize> {
    let comments: Vec<Range<usize>> = comment_regex()
        .find_iter(markup)
        .map(|m| m.range())
        .collect();
    open_regex()
        .find_iter(markup)
        .map(|m| m.start())
        .find(|pos| !comments.iter().any(|c| c.contains(pos)))
}

/// Byte offset of the first `>` that is not inside a quoted attribute value.
fn find_tag_end(s: &str) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, b) in s.bytes().enumerate() {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"') | (None, b'\'') => quote = Some(b),
            (None, b'>') => return Some(i),
            _ => {}
        }
    }
    None
}

fn scan_attributes(raw: &str) -> Vec<MarkupAttribute> {
    attribute_regex()
        .captures_iter(raw)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_string();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().to_string());
            Some(MarkupAttribute { name, value })
        })
        .collect()
}

/// `<svg` ... last `</svg>`, case-insensitive and spanning newlines.
fn span_regex() -> &'static Regex {
    static SPAN_REGEX: OnceLock<Regex> = OnceLock::new();
    SPAN_REGEX.get_or_init(|| Regex::new(r"(?is)<svg([ \t\r\n/>].*)</svg\s*>").unwrap())
}

/// An unterminated comment runs to the end of the input.
fn comment_regex() -> &'static Regex {
    static COMMENT_REGEX: OnceLock<Regex> = OnceLock::new();
    COMMENT_REGEX.get_or_init(|| Regex::new(r"(?s)<!--.*?(?:-->|\z)").unwrap())
}

fn open_regex() -> &'static Regex {
    static OPEN_REGEX: OnceLock<Regex> = OnceLock::new();
    OPEN_REGEX.get_or_init(|| Regex::new(r"(?i)<svg[ \t\r\n/>]").unwrap())
}

fn attribute_regex() -> &'static Regex {
    static ATTRIBUTE_REGEX: OnceLock<Regex> = OnceLock::new();
    ATTRIBUTE_REGEX.get_or_init(|| {
        Regex::new(
            r#"(?i)([a-z_:][-a-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#,
        )
        .unwrap()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(name: &str, value: Option<&str>) -> MarkupAttribute {
        MarkupAttribute {
            name: name.to_string(),
            value: value.map(str::to_string),
        }
    }

    #[test]
    fn test_view_box_and_inner() {
        let result = extract(r#"<svg viewBox="0 0 10 10"><circle r="5"/></svg>"#).unwrap();
        assert_eq!(result.attributes, vec![attr("viewBox", Some("0 0 10 10"))]);
        assert_eq!(result.inner, r#"<circle r="5"/>"#);
    }

    #[test]
    fn test_no_attributes() {
        let result = extract("<svg><g/></svg>").unwrap();
        assert!(result.attributes.is_empty());
        assert_eq!(result.inner, "<g/>");
    }

    #[test]
    fn test_case_insensitive_and_multiline() {
        let xml = "<SVG\n  width='24'\n  height=\"24\"\n>\n<path d=\"M0 0\"/>\n</Svg>";
        let result = extract(xml).unwrap();
        assert_eq!(
            result.attributes,
            vec![attr("width", Some("24")), attr("height", Some("24"))]
        );
        assert_eq!(result.inner, "\n<path d=\"M0 0\"/>\n");
    }

    #[test]
    fn test_boolean_and_bare_values() {
        let result = extract("<svg focusable data-x=1 hidden><g/></svg>").unwrap();
        assert_eq!(
            result.attributes,
            vec![
                attr("focusable", None),
                attr("data-x", Some("1")),
                attr("hidden", None)
            ]
        );
    }

    #[test]
    fn test_hyphenated_and_namespaced_names_stay_whole() {
        let xml = r#"<svg stroke-width="2" xmlns:xlink="http://www.w3.org/1999/xlink"></svg>"#;
        let result = extract(xml).unwrap();
        assert_eq!(
            result.attributes,
            vec![
                attr("stroke-width", Some("2")),
                attr("xmlns:xlink", Some("http://www.w3.org/1999/xlink"))
            ]
        );
        assert_eq!(result.inner, "");
    }

    #[test]
    fn test_quoted_gt_does_not_end_tag() {
        let result = extract(r#"<svg aria-label="a > b"><g/></svg>"#).unwrap();
        assert_eq!(result.attributes, vec![attr("aria-label", Some("a > b"))]);
        assert_eq!(result.inner, "<g/>");
    }

    #[test]
    fn test_nested_svg_stays_in_inner() {
        let xml = r#"<svg width="10"><svg x="1"><g/></svg></svg>"#;
        let result = extract(xml).unwrap();
        assert_eq!(result.inner, r#"<svg x="1"><g/></svg>"#);
    }

    #[test]
    fn test_leading_prolog_is_ignored() {
        let xml = "<?xml version=\"1.0\"?>\n<svg height=\"1\"></svg>\n";
        let result = extract(xml).unwrap();
        assert_eq!(result.attributes, vec![attr("height", Some("1"))]);
    }

    #[test]
    fn test_commented_svg_is_skipped() {
        let xml = r#"<!-- <svg> icon --><svg viewBox="0 0 1 1"><g/></svg>"#;
        let result = extract(xml).unwrap();
        assert_eq!(result.attributes, vec![attr("viewBox", Some("0 0 1 1"))]);
        assert_eq!(result.inner, "<g/>");
    }

    #[test]
    fn test_svg_only_in_comment_is_malformed() {
        let result = extract("<!-- <svg></svg> -->");
        assert!(matches!(result, Err(SvgXmlError::MalformedMarkup { .. })));
    }

    #[test]
    fn test_repeated_attribute_last_wins() {
        let result = extract(r#"<svg color="red" color="blue"></svg>"#).unwrap();
        assert_eq!(result.attributes.len(), 2);
        assert_eq!(result.attribute("color"), Some(&attr("color", Some("blue"))));
    }

    #[test]
    fn test_not_svg_is_malformed() {
        let result = extract("not svg");
        assert!(matches!(result, Err(SvgXmlError::MalformedMarkup { .. })));
    }

    #[test]
    fn test_svg_prefixed_tag_is_not_root() {
        let result = extract("<svgx></svgx>");
        assert!(matches!(result, Err(SvgXmlError::MalformedMarkup { .. })));
    }

    #[test]
    fn test_unterminated_open_tag() {
        let result = extract(r#"<svg width="1 </svg>"#);
        assert!(matches!(result, Err(SvgXmlError::MalformedMarkup { .. })));
    }

    #[test]
    fn test_self_closing_rejected_by_default() {
        let result = extract(r#"<svg width="4" />"#);
        assert_eq!(result, Err(SvgXmlError::UnsupportedSelfClosing));
    }

    #[test]
    fn test_self_closing_when_enabled() {
        let config = SvgXmlConfig {
            allow_self_closing: true,
            ..SvgXmlConfig::default()
        };
        let result = extract_with(r#"<svg width="4" />"#, &config).unwrap();
        assert_eq!(result.attributes, vec![attr("width", Some("4"))]);
        assert_eq!(result.inner, "");
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let xml = r#"<svg viewBox="0 0 1 1" fill='none'><rect/></svg>"#;
        assert_eq!(extract(xml).unwrap(), extract(xml).unwrap());
    }
}
