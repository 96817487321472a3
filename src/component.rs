//! The `SvgXml` view: renders raw SVG text as a host `<svg>` element.
//!
//! Each render extracts the root attributes from the markup, merges them
//! under the caller's props, filters the result through [`FORWARDED_PROPS`]
//! and asks the host for an `svg` element. The inner markup is written into
//! the mounted node afterwards by a [`LayoutEffect`], outside the host's
//! normal reconciliation.

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;
use std::sync::OnceLock;

use crate::config::SvgXmlConfig;
use crate::error::SvgXmlResult;
use crate::extract::{extract_with, Extraction};
use crate::host::{
    set_and_forward_ref, ForwardedRef, Host, LayoutEvent, NodeHandle, NodeRef, RefSetter,
    ResponderHandlers,
};
use crate::props::{Callback, PropValue, Props, FORWARDED_PROPS};
use crate::style::{ClassList, Style, StyleSheet};

pub const ROOT_TAG: &str = "svg";
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// A numeric prop that may also be given as text, e.g. `opacity="0.5"`
#[derive(Debug, Clone, PartialEq)]
pub enum NumberProp {
    Number(f64),
    Text(String),
}

impl From<NumberProp> for PropValue {
    fn from(value: NumberProp) -> Self {
        match value {
            NumberProp::Number(n) => PropValue::Number(n),
            NumberProp::Text(s) => PropValue::Text(s),
        }
    }
}

/// Props accepted by [`SvgXml`]
#[derive(Debug, Clone, PartialEq)]
pub struct SvgXmlProps {
    /// Source SVG text; must contain one `<svg>...</svg>` root
    pub xml: String,
    pub color: Option<String>,
    pub view_box: Option<String>,
    pub opacity: Option<NumberProp>,
    pub preserve_aspect_ratio: Option<String>,
    pub style: Option<Style>,
    pub on_layout: Option<Callback<LayoutEvent>>,
    pub responder: ResponderHandlers,
    /// Every other host-convention prop (accessibility, events, geometry, ...)
    pub extra: Props,
}

impl SvgXmlProps {
    pub fn new(xml: impl Into<String>) -> Self {
        SvgXmlProps {
            xml: xml.into(),
            color: None,
            view_box: None,
            opacity: None,
            preserve_aspect_ratio: None,
            style: None,
            on_layout: None,
            responder: ResponderHandlers::default(),
            extra: Props::new(),
        }
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn view_box(mut self, view_box: impl Into<String>) -> Self {
        self.view_box = Some(view_box.into());
        self
    }

    pub fn opacity(mut self, opacity: NumberProp) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn preserve_aspect_ratio(mut self, value: impl Into<String>) -> Self {
        self.preserve_aspect_ratio = Some(value.into());
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    pub fn on_layout(mut self, handler: Callback<LayoutEvent>) -> Self {
        self.on_layout = Some(handler);
        self
    }

    pub fn responder(mut self, handlers: ResponderHandlers) -> Self {
        self.responder = handlers;
        self
    }

    pub fn prop(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.extra.set(key, value);
        self
    }

    /// The caller's props as one bag. Typed fields override `extra` entries
    /// of the same name.
    pub fn to_props(&self) -> Props {
        let mut props = self.extra.clone();
        if let Some(ref color) = self.color {
            props.set("color", color.as_str());
        }
        if let Some(ref view_box) = self.view_box {
            props.set("viewBox", view_box.as_str());
        }
        if let Some(ref opacity) = self.opacity {
            props.set("opacity", opacity.clone());
        }
        if let Some(ref par) = self.preserve_aspect_ratio {
            props.set("preserveAspectRatio", par.as_str());
        }
        props
    }
}

/// Configuration plus the stylesheet derived from it, built once
#[derive(Debug, Clone, PartialEq)]
pub struct SvgXmlContext {
    pub config: SvgXmlConfig,
    pub sheet: StyleSheet,
}

impl SvgXmlContext {
    pub fn new(config: SvgXmlConfig) -> Self {
        let sheet = StyleSheet::from_config(&config);
        SvgXmlContext { config, sheet }
    }

    /// Context for the default configuration.
    pub fn shared() -> &'static SvgXmlContext {
        static SHARED: OnceLock<SvgXmlContext> = OnceLock::new();
        SHARED.get_or_init(|| SvgXmlContext::new(SvgXmlConfig::default()))
    }
}

/// Combines extracted attributes and caller props into the bag handed to the host.
///
/// Caller props win on collision, everything outside [`FORWARDED_PROPS`] is
/// dropped, then `classList`, `ref`, `style` and `xmlns` are set by the
/// component. `xmlns` is always [`SVG_NAMESPACE`].
pub fn merge_props(
    extraction: &Extraction,
    caller: &Props,
    class_list: &ClassList,
    set_ref: &RefSetter,
    style: Option<&Style>,
) -> Props {
    let mut merged = Props::from_attributes(&extraction.attributes);
    merged.extend(caller.clone());

    let mut props = merged.pick(FORWARDED_PROPS);
    props.set("classList", PropValue::ClassList(class_list.clone()));
    props.set("ref", PropValue::Ref(set_ref.clone()));
    match style {
        Some(style) => props.set("style", style.clone()),
        None => {
            props.remove("style");
        }
    }
    props.set("xmlns", SVG_NAMESPACE);
    props
}

/// Node that last received inner markup, and the extraction written into it
type InjectedSlot = Rc<RefCell<Option<(NodeHandle, Rc<Extraction>)>>>;

fn same_node(a: &NodeHandle, b: &NodeHandle) -> bool {
    Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}

/// Writes the extracted inner markup into the mounted node. Run it after the
/// host has committed the element.
#[derive(Debug)]
#[must_use = "the inner markup is only injected when the effect runs"]
pub struct LayoutEffect {
    node: NodeRef,
    extraction: Rc<Extraction>,
    injected: InjectedSlot,
}

impl LayoutEffect {
    pub fn inner(&self) -> &str {
        &self.extraction.inner
    }

    /// Returns `false` without writing if the node is not mounted. A skipped
    /// effect is scheduled again on the next render.
    pub fn run(self) -> bool {
        match self.node.current() {
            Some(node) => {
                node.set_inner_markup(&self.extraction.inner);
                *self.injected.borrow_mut() = Some((node, self.extraction));
                true
            }
            None => {
                tracing::debug!("Node not mounted, skipping inner markup injection");
                false
            }
        }
    }
}

/// Output of one render pass
#[derive(Debug)]
pub struct Rendered<E> {
    pub element: E,
    /// `None` when the mounted node already holds this inner markup
    pub effect: Option<LayoutEffect>,
}

#[derive(Debug, PartialEq)]
struct MergeKey {
    caller: Props,
    extraction: Rc<Extraction>,
    class_list: ClassList,
    set_ref: RefSetter,
    style: Option<Style>,
}

/// Keeps the last computed value and recomputes when the key changes.
#[derive(Debug)]
struct Memo<K, V> {
    slot: Option<(K, V)>,
}

impl<K: PartialEq, V: Clone> Memo<K, V> {
    fn new() -> Self {
        Memo { slot: None }
    }

    fn get_or_try_update<E>(&mut self, key: K, f: impl FnOnce(&K) -> Result<V, E>) -> Result<V, E> {
        if let Some((ref cached, ref value)) = self.slot {
            if *cached == key {
                return Ok(value.clone());
            }
        }
        let value = f(&key)?;
        self.slot = Some((key, value.clone()));
        Ok(value)
    }

    fn get_or_update(&mut self, key: K, f: impl FnOnce(&K) -> V) -> V {
        self.get_or_try_update::<Infallible>(key, |k| Ok(f(k)))
            .unwrap_or_else(|never| match never {})
    }
}

/// A mounted-or-mountable instance of the view. Keep one per host element
/// and call [`SvgXml::render`] on every update.
#[derive(Debug)]
pub struct SvgXml<'a> {
    context: &'a SvgXmlContext,
    host_ref: NodeRef,
    set_ref: Option<(Option<ForwardedRef>, RefSetter)>,
    extraction: Memo<String, Rc<Extraction>>,
    merged: Memo<MergeKey, Props>,
    injected: InjectedSlot,
}

impl SvgXml<'static> {
    pub fn new() -> Self {
        SvgXml::with_context(SvgXmlContext::shared())
    }
}

impl Default for SvgXml<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> SvgXml<'a> {
    pub fn with_context(context: &'a SvgXmlContext) -> Self {
        SvgXml {
            context,
            host_ref: NodeRef::new(),
            set_ref: None,
            extraction: Memo::new(),
            merged: Memo::new(),
            injected: InjectedSlot::default(),
        }
    }

    /// The component's own ref to the mounted node.
    pub fn node_ref(&self) -> &NodeRef {
        &self.host_ref
    }

    /// Renders `props` into a host element.
    ///
    /// Fails with [`crate::SvgXmlError::MalformedMarkup`] when `props.xml`
    /// has no `<svg>` root; no element is created in that case.
    pub fn render<H: Host>(
        &mut self,
        host: &H,
        props: &SvgXmlProps,
        forwarded_ref: Option<ForwardedRef>,
    ) -> SvgXmlResult<Rendered<H::Element>> {
        let set_ref = self.ref_setter(forwarded_ref);
        let class_list = self.context.sheet.class_list();

        host.use_element_layout(&self.host_ref, props.on_layout.as_ref());
        host.use_platform_methods(&self.host_ref, &class_list, props.style.as_ref());
        host.use_responder_events(&self.host_ref, &props.responder);

        let context = self.context;
        let extraction = self
            .extraction
            .get_or_try_update(props.xml.clone(), |xml| {
                extract_with(xml, &context.config).map(Rc::new)
            })
            .map_err(|err| {
                tracing::warn!(error = %err, "Failed to extract SVG markup");
                err
            })?;

        let key = MergeKey {
            caller: props.to_props(),
            extraction: Rc::clone(&extraction),
            class_list,
            set_ref,
            style: props.style.clone(),
        };
        let merged = self.merged.get_or_update(key, |k| {
            merge_props(
                &k.extraction,
                &k.caller,
                &k.class_list,
                &k.set_ref,
                k.style.as_ref(),
            )
        });

        let element = host.create_element(ROOT_TAG, merged);
        Ok(Rendered {
            element,
            effect: self.schedule_injection(extraction),
        })
    }

    /// Detaches the component's node ref so pending effects become no-ops.
    pub fn unmount(&mut self) {
        self.host_ref.set(None);
        self.injected.borrow_mut().take();
    }

    fn ref_setter(&mut self, forwarded: Option<ForwardedRef>) -> RefSetter {
        if let Some((ref previous, ref setter)) = self.set_ref {
            if *previous == forwarded {
                return setter.clone();
            }
        }
        let setter = set_and_forward_ref(forwarded.clone(), self.host_ref.clone());
        self.set_ref = Some((forwarded, setter.clone()));
        setter
    }

    fn schedule_injection(&mut self, extraction: Rc<Extraction>) -> Option<LayoutEffect> {
        let up_to_date = match (self.host_ref.current(), self.injected.borrow().as_ref()) {
            (Some(mounted), Some((node, previous))) => {
                same_node(&mounted, node) && previous.inner == extraction.inner
            }
            _ => false,
        };
        if up_to_date {
            return None;
        }
        Some(LayoutEffect {
            node: self.host_ref.clone(),
            extraction,
            injected: Rc::clone(&self.injected),
        })
    }
}
