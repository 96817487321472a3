//! Contracts of the UI host the component renders into.
//!
//! The host owns element creation, layout measurement, platform methods and
//! the responder system. This crate only calls into them.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::props::{Callback, EventHandler, Props};
use crate::style::{ClassList, Style};

/// A mounted node the component can write raw markup into
pub trait HostNode: fmt::Debug {
    /// Replaces the node's content with `markup`, unescaped and unreconciled.
    fn set_inner_markup(&self, markup: &str);
}

pub type NodeHandle = Rc<dyn HostNode>;

/// Called by the host with `Some(node)` on mount and `None` on unmount.
pub type RefSetter = Callback<Option<NodeHandle>>;

/// Shared slot holding the currently mounted node, if any
#[derive(Clone, Default)]
pub struct NodeRef(Rc<RefCell<Option<NodeHandle>>>);

impl NodeRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<NodeHandle> {
        self.0.borrow().clone()
    }

    pub fn set(&self, node: Option<NodeHandle>) {
        *self.0.borrow_mut() = node;
    }

    pub fn is_mounted(&self) -> bool {
        self.0.borrow().is_some()
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeRef").field(&self.is_mounted()).finish()
    }
}

/// A ref handed in from outside the component
#[derive(Debug, Clone, PartialEq)]
pub enum ForwardedRef {
    Callback(RefSetter),
    Object(NodeRef),
}

/// Composes an optional forwarded ref and the component's own ref into one
/// setter that writes to both.
pub fn set_and_forward_ref(forwarded: Option<ForwardedRef>, local: NodeRef) -> RefSetter {
    Callback::new(move |node: &Option<NodeHandle>| {
        local.set(node.clone());
        match &forwarded {
            Some(ForwardedRef::Callback(setter)) => setter.call(node),
            Some(ForwardedRef::Object(target)) => target.set(node.clone()),
            None => {}
        }
    })
}

/// Geometry reported to `onLayout`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutEvent {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A pointer, touch or keyboard event delivered by the host
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostEvent {
    pub kind: String,
    pub x: f64,
    pub y: f64,
}

impl HostEvent {
    pub fn new(kind: impl Into<String>) -> Self {
        HostEvent {
            kind: kind.into(),
            ..Self::default()
        }
    }
}

/// Responder lifecycle callbacks, handed to the host untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponderHandlers {
    pub on_move_should_set_responder: Option<EventHandler>,
    pub on_move_should_set_responder_capture: Option<EventHandler>,
    pub on_responder_end: Option<EventHandler>,
    pub on_responder_grant: Option<EventHandler>,
    pub on_responder_move: Option<EventHandler>,
    pub on_responder_reject: Option<EventHandler>,
    pub on_responder_release: Option<EventHandler>,
    pub on_responder_start: Option<EventHandler>,
    pub on_responder_terminate: Option<EventHandler>,
    pub on_responder_termination_request: Option<EventHandler>,
    pub on_start_should_set_responder: Option<EventHandler>,
    pub on_start_should_set_responder_capture: Option<EventHandler>,
}

impl ResponderHandlers {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// The UI host: element factory plus the hooks a native-looking view registers
pub trait Host {
    type Element;

    /// Builds an element description for `tag` carrying `props`.
    fn create_element(&self, tag: &str, props: Props) -> Self::Element;

    fn use_element_layout(&self, _node: &NodeRef, _on_layout: Option<&Callback<LayoutEvent>>) {}

    fn use_platform_methods(&self, _node: &NodeRef, _class_list: &ClassList, _style: Option<&Style>) {}

    fn use_responder_events(&self, _node: &NodeRef, _handlers: &ResponderHandlers) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug)]
    struct Dummy;

    impl HostNode for Dummy {
        fn set_inner_markup(&self, _markup: &str) {}
    }

    #[test]
    fn test_forward_to_object_ref() {
        let local = NodeRef::new();
        let outer = NodeRef::new();
        let setter = set_and_forward_ref(Some(ForwardedRef::Object(outer.clone())), local.clone());

        setter.call(&Some(Rc::new(Dummy) as NodeHandle));
        assert!(local.is_mounted());
        assert!(outer.is_mounted());

        setter.call(&None);
        assert!(!local.is_mounted());
        assert!(!outer.is_mounted());
    }

    #[test]
    fn test_forward_to_callback_ref() {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let forwarded = ForwardedRef::Callback(Callback::new(move |node: &Option<NodeHandle>| {
            if node.is_some() {
                seen.set(seen.get() + 1);
            }
        }));
        let local = NodeRef::new();
        let setter = set_and_forward_ref(Some(forwarded), local.clone());

        setter.call(&Some(Rc::new(Dummy) as NodeHandle));
        assert_eq!(calls.get(), 1);
        assert!(local.is_mounted());
    }

    #[test]
    fn test_without_forwarded_ref() {
        let local = NodeRef::new();
        let setter = set_and_forward_ref(None, local.clone());
        setter.call(&Some(Rc::new(Dummy) as NodeHandle));
        assert!(local.is_mounted());
    }

    #[test]
    fn test_responder_handlers_empty() {
        let mut handlers = ResponderHandlers::default();
        assert!(handlers.is_empty());
        handlers.on_responder_grant = Some(Callback::new(|_: &HostEvent| true));
        assert!(!handlers.is_empty());
    }
}
