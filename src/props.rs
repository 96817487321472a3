use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::extract::MarkupAttribute;
use crate::host::{HostEvent, RefSetter};
use crate::style::{ClassList, Style};

/// Property names allowed to reach the rendered `<svg>` element.
///
/// Anything else, including attributes extracted from the markup, is dropped.
/// `children` is deliberately absent: the element's content is owned by the
/// injected markup.
pub const FORWARDED_PROPS: &[&str] = &[
    // Accessibility
    "accessibilityLabel",
    "accessibilityLiveRegion",
    "accessibilityRole",
    "accessibilityState",
    "accessibilityValue",
    "accessible",
    "importantForAccessibility",
    // Identity
    "nativeID",
    "testID",
    "dataSet",
    // Presentation
    "classList",
    "color",
    "disabled",
    "opacity",
    "pointerEvents",
    "preserveAspectRatio",
    "ref",
    "style",
    "viewBox",
    "x",
    "y",
    "width",
    "height",
    // Focus, keyboard, click
    "onBlur",
    "onClick",
    "onClickCapture",
    "onContextMenu",
    "onFocus",
    "onKeyDown",
    "onKeyUp",
    // Touch
    "onTouchCancel",
    "onTouchCancelCapture",
    "onTouchEnd",
    "onTouchEndCapture",
    "onTouchMove",
    "onTouchMoveCapture",
    "onTouchStart",
    "onTouchStartCapture",
    // Mouse, scroll
    "onMouseDown",
    "onMouseEnter",
    "onMouseLeave",
    "onMouseMove",
    "onMouseOver",
    "onMouseOut",
    "onMouseUp",
    "onScroll",
    "onWheel",
    // Link
    "href",
    "rel",
    "target",
];

/// Shared callback compared by identity, the way a UI host compares handler props.
pub struct Callback<T: ?Sized, R = ()>(Rc<dyn Fn(&T) -> R>);

impl<T: ?Sized, R> Callback<T, R> {
    pub fn new(f: impl Fn(&T) -> R + 'static) -> Self {
        Callback(Rc::new(f))
    }

    pub fn call(&self, arg: &T) -> R {
        (self.0)(arg)
    }

    fn addr(&self) -> *const () {
        Rc::as_ptr(&self.0) as *const ()
    }
}

impl<T: ?Sized, R> Clone for Callback<T, R> {
    fn clone(&self) -> Self {
        Callback(Rc::clone(&self.0))
    }
}

impl<T: ?Sized, R> PartialEq for Callback<T, R> {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl<T: ?Sized, R> fmt::Debug for Callback<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", self.addr())
    }
}

/// Handler for host events. The return value answers responder negotiation
/// (`onStartShouldSetResponder` and friends) and is ignored for plain listeners.
pub type EventHandler = Callback<HostEvent, bool>;

/// A single property value
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Text(String),
    Number(f64),
    Bool(bool),
    /// Keyed values such as `dataSet` or `accessibilityState`
    Map(BTreeMap<String, String>),
    Handler(EventHandler),
    Style(Style),
    ClassList(ClassList),
    Ref(RefSetter),
}

impl PropValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Text(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Text(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<Style> for PropValue {
    fn from(value: Style) -> Self {
        PropValue::Style(value)
    }
}

impl From<EventHandler> for PropValue {
    fn from(value: EventHandler) -> Self {
        PropValue::Handler(value)
    }
}

impl From<BTreeMap<String, String>> for PropValue {
    fn from(value: BTreeMap<String, String>) -> Self {
        PropValue::Map(value)
    }
}

/// Insertion-ordered property bag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props(IndexMap<String, PropValue>);

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root attributes as props, in source order. Attributes written without
    /// a value become `Bool(true)`; a repeated name keeps its first position
    /// and its last value.
    pub fn from_attributes(attributes: &[MarkupAttribute]) -> Self {
        let mut props = Props::new();
        for attr in attributes {
            let value = match &attr.value {
                Some(v) => PropValue::Text(v.clone()),
                None => PropValue::Bool(true),
            };
            props.set(attr.name.clone(), value);
        }
        props
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Inserts or overwrites. An existing key keeps its position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PropValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<PropValue> {
        self.0.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Overlays `other` on `self`; on collision `other` wins.
    pub fn extend(&mut self, other: Props) {
        for (key, value) in other.0 {
            self.0.insert(key, value);
        }
    }

    /// Keeps only the keys in `allow`, preserving order.
    pub fn pick(&self, allow: &[&str]) -> Props {
        let mut picked = Props::new();
        for (key, value) in &self.0 {
            if allow.contains(&key.as_str()) {
                picked.0.insert(key.clone(), value.clone());
            } else {
                tracing::trace!(prop = %key, "Dropping prop outside the allow-list");
            }
        }
        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_caller_wins_and_keeps_position() {
        let mut props = Props::new().with("color", "blue").with("viewBox", "0 0 1 1");
        props.extend(Props::new().with("width", 4.0).with("color", "red"));
        assert_eq!(props.keys().collect::<Vec<_>>(), vec!["color", "viewBox", "width"]);
        assert_eq!(props.get("color"), Some(&PropValue::from("red")));
    }

    #[test]
    fn test_pick_filters_unknown_keys() {
        let props = Props::new()
            .with("viewBox", "0 0 1 1")
            .with("fill", "none")
            .with("children", "<g/>")
            .with("href", "#a");
        let picked = props.pick(FORWARDED_PROPS);
        assert_eq!(picked.keys().collect::<Vec<_>>(), vec!["viewBox", "href"]);
    }

    #[test]
    fn test_from_attributes_repeated_name() {
        let attr = |name: &str, value: &str| MarkupAttribute {
            name: name.to_string(),
            value: Some(value.to_string()),
        };
        let props = Props::from_attributes(&[
            attr("width", "1"),
            attr("viewBox", "0 0 1 1"),
            attr("width", "2"),
        ]);
        assert_eq!(props.keys().collect::<Vec<_>>(), vec!["width", "viewBox"]);
        assert_eq!(props.get("width").and_then(PropValue::as_text), Some("2"));
    }

    #[test]
    fn test_from_attributes_boolean_value() {
        let attrs = vec![
            MarkupAttribute {
                name: "focusable".to_string(),
                value: None,
            },
            MarkupAttribute {
                name: "width".to_string(),
                value: Some("8".to_string()),
            },
        ];
        let props = Props::from_attributes(&attrs);
        assert_eq!(props.get("focusable"), Some(&PropValue::Bool(true)));
        assert_eq!(props.get("width").and_then(PropValue::as_text), Some("8"));
    }

    #[test]
    fn test_callback_identity() {
        let a: Callback<i32, i32> = Callback::new(|x| x + 1);
        let b = a.clone();
        let c: Callback<i32, i32> = Callback::new(|x| x + 1);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(b.call(&1), 2);
    }

    #[test]
    fn test_children_is_not_forwarded() {
        assert!(!FORWARDED_PROPS.contains(&"children"));
        assert!(!FORWARDED_PROPS.contains(&"xmlns"));
    }
}
