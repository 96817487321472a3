use serde::{Deserialize, Serialize};

use crate::error::SvgXmlResult;
use crate::style::Style;

/// Component configuration, usually loaded from YAML
///
/// ```yaml
/// allowSelfClosing: true
/// classPrefix: hud
/// baseStyle:
///   display: block
///   zIndex: 2
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SvgXmlConfig {
    /// Accept `<svg ... />` roots as an element with empty inner content
    pub allow_self_closing: bool,
    /// Prefix for generated stylesheet class names
    pub class_prefix: String,
    /// Presentation defaults attached to every rendered element
    pub base_style: Style,
}

impl Default for SvgXmlConfig {
    fn default() -> Self {
        SvgXmlConfig {
            allow_self_closing: false,
            class_prefix: "svgxml".to_string(),
            base_style: Style::svg_defaults(),
        }
    }
}

impl SvgXmlConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML document. Missing keys keep their defaults; a partial
    /// `baseStyle` is layered over the built-in defaults.
    pub fn from_yaml(yaml: &str) -> SvgXmlResult<Self> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Raw {
            allow_self_closing: Option<bool>,
            class_prefix: Option<String>,
            base_style: Option<Style>,
        }

        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let raw: Raw = serde_yaml::from_str(yaml)?;
        let defaults = Self::default();
        Ok(SvgXmlConfig {
            allow_self_closing: raw.allow_self_closing.unwrap_or(defaults.allow_self_closing),
            class_prefix: raw.class_prefix.unwrap_or(defaults.class_prefix),
            base_style: match raw.base_style {
                Some(style) => defaults.base_style.merge(&style),
                None => defaults.base_style,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SvgXmlError;
    use crate::style::Display;

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(SvgXmlConfig::from_yaml("").unwrap(), SvgXmlConfig::default());
    }

    #[test]
    fn test_partial_base_style_layers_over_defaults() {
        let yaml = "allowSelfClosing: true\nclassPrefix: hud\nbaseStyle:\n  display: block\n  zIndex: 2\n";
        let config = SvgXmlConfig::from_yaml(yaml).unwrap();
        assert!(config.allow_self_closing);
        assert_eq!(config.class_prefix, "hud");
        assert_eq!(config.base_style.display, Some(Display::Block));
        assert_eq!(config.base_style.z_index, Some(2));
        assert_eq!(config.base_style.border_color, Some("black".to_string()));
    }

    #[test]
    fn test_invalid_yaml() {
        let result = SvgXmlConfig::from_yaml("allowSelfClosing: [1, 2");
        assert!(matches!(result, Err(SvgXmlError::InvalidConfig(_))));
    }
}
