//! # NullTrace SvgXml
//!
//! Renders raw inline SVG text as a native-looking `<svg>` view.
//!
//! ## Features
//! - Regex-based extraction of the root `<svg>` attributes and inner markup
//! - Attribute/prop merging with caller precedence and a fixed allow-list
//! - Host-agnostic rendering through the [`Host`] trait, with deferred
//!   injection of the inner markup after mount
//! - A string host for server-side output
//!
//! ## Example
//! ```ignore
//! use nulltrace_svgxml::{render_to_string, SvgXmlContext, SvgXmlProps};
//!
//! let props = SvgXmlProps::new(r#"<svg viewBox="0 0 10 10"><circle r="5"/></svg>"#)
//!     .color("red");
//!
//! let html = render_to_string(&props, SvgXmlContext::shared()).expect("Failed to render SVG");
//! ```

pub mod component;
pub mod config;
pub mod error;
pub mod extract;
pub mod host;
pub mod markup;
pub mod props;
pub mod style;

// --- Core types ---
pub use component::{
    merge_props, LayoutEffect, NumberProp, Rendered, SvgXml, SvgXmlContext, SvgXmlProps,
    ROOT_TAG, SVG_NAMESPACE,
};
pub use config::SvgXmlConfig;
pub use error::{SvgXmlError, SvgXmlResult};
pub use extract::{Extraction, MarkupAttribute};
pub use host::{
    set_and_forward_ref, ForwardedRef, Host, HostEvent, HostNode, LayoutEvent, NodeHandle,
    NodeRef, RefSetter, ResponderHandlers,
};
pub use markup::{MarkupElement, MarkupHost, MarkupNode};
pub use props::{Callback, EventHandler, PropValue, Props, FORWARDED_PROPS};
pub use style::{ClassList, Style, StyleSheet};

/// Extract the root attributes and inner markup with the default configuration
pub fn extract(markup: &str) -> SvgXmlResult<Extraction> {
    extract::extract(markup)
}

/// Extract with a custom configuration
pub fn extract_with(markup: &str, config: &SvgXmlConfig) -> SvgXmlResult<Extraction> {
    extract::extract_with(markup, config)
}

/// Render `props` to a complete `<svg>` string
pub fn render_to_string(props: &SvgXmlProps, context: &SvgXmlContext) -> SvgXmlResult<String> {
    markup::render_to_string(props, context)
}
