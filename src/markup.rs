//! A string-backed host: turns the rendered element into SVG markup.
//!
//! Used for server-side output and by the `svgxml-render` binary. Event
//! handlers and refs have no textual form and are left out.

use std::cell::RefCell;
use std::rc::Rc;

use crate::component::{SvgXml, SvgXmlContext, SvgXmlProps};
use crate::error::SvgXmlResult;
use crate::host::{Host, HostNode, NodeHandle};
use crate::props::{PropValue, Props};

/// Host whose elements serialise to markup
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupHost;

impl Host for MarkupHost {
    type Element = MarkupElement;

    fn create_element(&self, tag: &str, props: Props) -> MarkupElement {
        MarkupElement {
            tag: tag.to_string(),
            props,
        }
    }
}

/// Element description produced by [`MarkupHost`]
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupElement {
    pub tag: String,
    pub props: Props,
}

impl MarkupElement {
    /// Attributes as they appear on the opening tag. `None` marks a bare
    /// boolean attribute.
    pub fn attributes(&self) -> Vec<(String, Option<String>)> {
        let mut attrs = Vec::new();
        for (key, value) in self.props.iter() {
            match (key, value) {
                (_, PropValue::Handler(_)) | (_, PropValue::Ref(_)) => {}
                ("dataSet", PropValue::Map(map)) => {
                    for (k, v) in map {
                        attrs.push((format!("data-{}", k), Some(v.clone())));
                    }
                }
                ("accessibilityState", PropValue::Map(map)) => {
                    for (k, v) in map {
                        attrs.push((format!("aria-{}", k), Some(v.clone())));
                    }
                }
                (_, PropValue::Map(_)) => {}
                (_, PropValue::ClassList(list)) => {
                    if !list.is_empty() {
                        attrs.push(("class".to_string(), Some(list.class_names().join(" "))));
                    }
                }
                (_, PropValue::Style(style)) => {
                    let css = style.to_css();
                    if !css.is_empty() {
                        attrs.push(("style".to_string(), Some(css)));
                    }
                }
                (_, PropValue::Bool(false)) => {}
                (_, PropValue::Bool(true)) => attrs.push((attribute_name(key), None)),
                (_, PropValue::Number(n)) => attrs.push((attribute_name(key), Some(n.to_string()))),
                (_, PropValue::Text(s)) => attrs.push((attribute_name(key), Some(s.clone()))),
            }
        }
        attrs
    }

    /// Opening tag, e.g. `<svg viewBox="0 0 1 1" xmlns="...">`
    pub fn open_tag(&self) -> String {
        let mut out = format!("<{}", self.tag);
        for (name, value) in self.attributes() {
            out.push(' ');
            out.push_str(&name);
            if let Some(value) = value {
                out.push_str("=\"");
                out.push_str(&escape_attribute(&value));
                out.push('"');
            }
        }
        out.push('>');
        out
    }

    /// Creates the node and hands it to the element's ref, as a host does on commit.
    pub fn mount(&self) -> Rc<MarkupNode> {
        let node = Rc::new(MarkupNode {
            open_tag: self.open_tag(),
            tag: self.tag.clone(),
            inner: RefCell::new(String::new()),
        });
        if let Some(PropValue::Ref(setter)) = self.props.get("ref") {
            setter.call(&Some(Rc::clone(&node) as NodeHandle));
        }
        node
    }

    /// Clears the element's ref, as a host does when the element leaves the tree.
    pub fn unmount(&self) {
        if let Some(PropValue::Ref(setter)) = self.props.get("ref") {
            setter.call(&None);
        }
    }
}

/// A mounted [`MarkupElement`]
#[derive(Debug)]
pub struct MarkupNode {
    tag: String,
    open_tag: String,
    inner: RefCell<String>,
}

impl HostNode for MarkupNode {
    fn set_inner_markup(&self, markup: &str) {
        *self.inner.borrow_mut() = markup.to_string();
    }
}

impl MarkupNode {
    pub fn inner_markup(&self) -> String {
        self.inner.borrow().clone()
    }

    pub fn outer_markup(&self) -> String {
        format!("{}{}</{}>", self.open_tag, self.inner.borrow(), self.tag)
    }
}

/// Renders, mounts and injects in one go, returning the final markup.
pub fn render_to_string(props: &SvgXmlProps, context: &SvgXmlContext) -> SvgXmlResult<String> {
    let mut view = SvgXml::with_context(context);
    let rendered = view.render(&MarkupHost, props, None)?;
    let node = rendered.element.mount();
    if let Some(effect) = rendered.effect {
        effect.run();
    }
    Ok(node.outer_markup())
}

/// Host prop name to markup attribute name.
fn attribute_name(prop: &str) -> String {
    match prop {
        "nativeID" => "id",
        "testID" => "data-testid",
        "accessibilityLabel" => "aria-label",
        "accessibilityRole" => "role",
        "accessibilityLiveRegion" => "aria-live",
        "pointerEvents" => "pointer-events",
        other => other,
    }
    .to_string()
}

fn escape_attribute(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
