use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::sync::Arc;

use crate::config::SvgXmlConfig;

/// A dimension value that can be either a number (pixels) or `auto`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    Pixels(f64),
    Keyword(SizeKeyword),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeKeyword {
    Auto,
}

impl Dimension {
    pub const AUTO: Dimension = Dimension::Keyword(SizeKeyword::Auto);

    fn to_css(&self) -> String {
        match self {
            Dimension::Pixels(px) => format!("{}px", px),
            Dimension::Keyword(SizeKeyword::Auto) => "auto".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    Solid,
    Dashed,
    Dotted,
}

impl BorderStyle {
    pub fn as_css(&self) -> &'static str {
        match self {
            BorderStyle::Solid => "solid",
            BorderStyle::Dashed => "dashed",
            BorderStyle::Dotted => "dotted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    Flex,
    Block,
    Inline,
    None,
}

impl Display {
    pub fn as_css(&self) -> &'static str {
        match self {
            Display::Flex => "flex",
            Display::Block => "block",
            Display::Inline => "inline",
            Display::None => "none",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoxSizing {
    BorderBox,
    ContentBox,
}

impl BoxSizing {
    pub fn as_css(&self) -> &'static str {
        match self {
            BoxSizing::BorderBox => "border-box",
            BoxSizing::ContentBox => "content-box",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Relative,
    Absolute,
    Static,
}

impl Position {
    pub fn as_css(&self) -> &'static str {
        match self {
            Position::Relative => "relative",
            Position::Absolute => "absolute",
            Position::Static => "static",
        }
    }
}

/// Presentation properties that can be attached to the rendered `<svg>` element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Style {
    // Border
    pub border_width: Option<f64>,
    pub border_style: Option<BorderStyle>,
    pub border_color: Option<String>,

    // Flex item
    pub flex_basis: Option<Dimension>,
    pub flex_shrink: Option<f64>,

    // Box
    pub display: Option<Display>,
    pub box_sizing: Option<BoxSizing>,
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
    pub min_width: Option<f64>,
    pub min_height: Option<f64>,
    pub margin: Option<f64>,
    pub padding: Option<f64>,

    // Position
    pub position: Option<Position>,
    pub z_index: Option<i32>,

    // Paint
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub opacity: Option<f64>,
}

impl Style {
    /// Defaults every rendered `<svg>` element carries.
    pub fn svg_defaults() -> Self {
        Style {
            border_width: Some(0.0),
            border_style: Some(BorderStyle::Solid),
            border_color: Some("black".to_string()),
            flex_basis: Some(Dimension::AUTO),
            flex_shrink: Some(0.0),
            display: Some(Display::Flex),
            box_sizing: Some(BoxSizing::BorderBox),
            margin: Some(0.0),
            min_height: Some(0.0),
            min_width: Some(0.0),
            padding: Some(0.0),
            position: Some(Position::Relative),
            z_index: Some(0),
            ..Style::default()
        }
    }

    /// Returns a copy of `self` with every property set in `other` overriding it.
    pub fn merge(&self, other: &Style) -> Style {
        Style {
            border_width: other.border_width.or(self.border_width),
            border_style: other.border_style.clone().or_else(|| self.border_style.clone()),
            border_color: other.border_color.clone().or_else(|| self.border_color.clone()),
            flex_basis: other.flex_basis.clone().or_else(|| self.flex_basis.clone()),
            flex_shrink: other.flex_shrink.or(self.flex_shrink),
            display: other.display.clone().or_else(|| self.display.clone()),
            box_sizing: other.box_sizing.clone().or_else(|| self.box_sizing.clone()),
            width: other.width.clone().or_else(|| self.width.clone()),
            height: other.height.clone().or_else(|| self.height.clone()),
            min_width: other.min_width.or(self.min_width),
            min_height: other.min_height.or(self.min_height),
            margin: other.margin.or(self.margin),
            padding: other.padding.or(self.padding),
            position: other.position.clone().or_else(|| self.position.clone()),
            z_index: other.z_index.or(self.z_index),
            color: other.color.clone().or_else(|| self.color.clone()),
            background_color: other
                .background_color
                .clone()
                .or_else(|| self.background_color.clone()),
            opacity: other.opacity.or(self.opacity),
        }
    }

    /// CSS declarations in field order, as `(property, value)` pairs.
    pub fn declarations(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(v) = self.border_width {
            out.push(("border-width", px(v)));
        }
        if let Some(ref v) = self.border_style {
            out.push(("border-style", v.as_css().to_string()));
        }
        if let Some(ref v) = self.border_color {
            out.push(("border-color", v.clone()));
        }
        if let Some(ref v) = self.flex_basis {
            out.push(("flex-basis", v.to_css()));
        }
        if let Some(v) = self.flex_shrink {
            out.push(("flex-shrink", v.to_string()));
        }
        if let Some(ref v) = self.display {
            out.push(("display", v.as_css().to_string()));
        }
        if let Some(ref v) = self.box_sizing {
            out.push(("box-sizing", v.as_css().to_string()));
        }
        if let Some(ref v) = self.width {
            out.push(("width", v.to_css()));
        }
        if let Some(ref v) = self.height {
            out.push(("height", v.to_css()));
        }
        if let Some(v) = self.min_width {
            out.push(("min-width", px(v)));
        }
        if let Some(v) = self.min_height {
            out.push(("min-height", px(v)));
        }
        if let Some(v) = self.margin {
            out.push(("margin", px(v)));
        }
        if let Some(v) = self.padding {
            out.push(("padding", px(v)));
        }
        if let Some(ref v) = self.position {
            out.push(("position", v.as_css().to_string()));
        }
        if let Some(v) = self.z_index {
            out.push(("z-index", v.to_string()));
        }
        if let Some(ref v) = self.color {
            out.push(("color", v.clone()));
        }
        if let Some(ref v) = self.background_color {
            out.push(("background-color", v.clone()));
        }
        if let Some(v) = self.opacity {
            out.push(("opacity", v.to_string()));
        }
        out
    }

    /// Inline CSS text, e.g. `border-width: 0px; display: flex;`
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        for (prop, val) in self.declarations() {
            if !css.is_empty() {
                css.push(' ');
            }
            let _ = write!(css, "{}: {};", prop, val);
        }
        css
    }
}

fn px(v: f64) -> String {
    if v == 0.0 {
        "0px".to_string()
    } else {
        format!("{}px", v)
    }
}

/// A stylesheet entry with its rendered class name
#[derive(Debug, Clone, PartialEq)]
pub struct NamedStyle {
    pub name: String,
    pub class_name: String,
    pub style: Style,
}

/// Styles attached to the component, built once and passed by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSheet {
    svg: Arc<NamedStyle>,
}

impl StyleSheet {
    pub fn from_config(config: &SvgXmlConfig) -> Self {
        StyleSheet {
            svg: Arc::new(NamedStyle {
                name: "svg".to_string(),
                class_name: format!("{}-svg", config.class_prefix),
                style: config.base_style.clone(),
            }),
        }
    }

    pub fn svg(&self) -> &Arc<NamedStyle> {
        &self.svg
    }

    /// Class list applied to the root element.
    pub fn class_list(&self) -> ClassList {
        ClassList(vec![Arc::clone(&self.svg)])
    }

    /// Renders every entry as a CSS rule, ready to inject into a `<style>` tag.
    pub fn to_css(&self) -> String {
        format!(".{} {{ {} }}\n", self.svg.class_name, self.svg.style.to_css())
    }
}

/// Ordered stylesheet entries attached to an element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassList(pub Vec<Arc<NamedStyle>>);

impl ClassList {
    pub fn class_names(&self) -> Vec<&str> {
        self.0.iter().map(|s| s.class_name.as_str()).collect()
    }

    /// All entries flattened into one style, later entries winning.
    pub fn flatten(&self) -> Style {
        self.0
            .iter()
            .fold(Style::default(), |acc, entry| acc.merge(&entry.style))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_defaults_css() {
        let css = Style::svg_defaults().to_css();
        assert_eq!(
            css,
            "border-width: 0px; border-style: solid; border-color: black; flex-basis: auto; \
             flex-shrink: 0; display: flex; box-sizing: border-box; min-width: 0px; \
             min-height: 0px; margin: 0px; padding: 0px; position: relative; z-index: 0;"
        );
    }

    #[test]
    fn test_merge_prefers_other() {
        let base = Style::svg_defaults();
        let over = Style {
            display: Some(Display::Block),
            opacity: Some(0.5),
            ..Style::default()
        };
        let merged = base.merge(&over);
        assert_eq!(merged.display, Some(Display::Block));
        assert_eq!(merged.opacity, Some(0.5));
        assert_eq!(merged.position, Some(Position::Relative));
    }

    #[test]
    fn test_default_sheet() {
        let sheet = StyleSheet::from_config(&SvgXmlConfig::default());
        assert_eq!(sheet.svg().name, "svg");
        assert_eq!(sheet.svg().class_name, "svgxml-svg");
        assert_eq!(sheet.svg().style, Style::svg_defaults());
        assert_eq!(sheet.class_list().flatten(), Style::svg_defaults());
    }

    #[test]
    fn test_class_list_names() {
        let config = SvgXmlConfig {
            class_prefix: "nt".to_string(),
            ..SvgXmlConfig::default()
        };
        let sheet = StyleSheet::from_config(&config);
        assert_eq!(sheet.class_list().class_names(), vec!["nt-svg"]);
        assert!(sheet.to_css().starts_with(".nt-svg { border-width: 0px;"));
    }

    #[test]
    fn test_keywords_match_config_names() {
        let style: Style = serde_yaml::from_str(
            "display: none\nboxSizing: content-box\nborderStyle: dashed\nposition: absolute\n",
        )
        .unwrap();
        assert_eq!(
            style.to_css(),
            "border-style: dashed; display: none; box-sizing: content-box; position: absolute;"
        );
    }

    #[test]
    fn test_dimension_deserializes_auto_and_number() {
        let style: Style = serde_yaml::from_str("width: auto\nheight: 24\n").unwrap();
        assert_eq!(style.width, Some(Dimension::AUTO));
        assert_eq!(style.height, Some(Dimension::Pixels(24.0)));
    }
}
