use crate::node::{NodeData, NodeId, NodeKind};
use crate::style::{self, StyleDeclarations};
use crate::text::{DeterministicTextMeasurer, TextMeasurer};
use crate::{Error, Result};
use fontscaler_core::units::px;
use fontscaler_core::{BindingId, EventHost, FrameSlot, LayoutHost, LayoutOracle, Trigger};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use std::cell::Cell;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct Listener {
    trigger: Trigger,
    slot: FrameSlot,
}

/// Serializable view of a subtree, used to compare content before and after a cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSnapshot {
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

/// Headless document: a node arena, inline styles, a block/inline layout and a paint clock.
pub struct Document {
    nodes: Vec<Option<NodeData>>,
    root: NodeId,
    viewport_width: f64,
    pub(crate) measurer: Arc<dyn TextMeasurer + Send + Sync>,
    listeners: FxHashMap<BindingId, Listener>,
    next_binding: u64,
    frame: u64,
    ready: bool,
    fonts_loaded: bool,
    measurement_clones: FxHashSet<NodeId>,
    pub(crate) layout_passes: Cell<u64>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("viewport_width", &self.viewport_width)
            .field("listeners", &self.listeners.len())
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}

impl Document {
    pub fn new(viewport_width: f64) -> Self {
        Self::with_text_measurer(viewport_width, Arc::new(DeterministicTextMeasurer::default()))
    }

    pub fn with_text_measurer(
        viewport_width: f64,
        measurer: Arc<dyn TextMeasurer + Send + Sync>,
    ) -> Self {
        Self {
            nodes: vec![Some(NodeData::new(NodeKind::Document))],
            root: NodeId(0),
            viewport_width,
            measurer,
            listeners: FxHashMap::default(),
            next_binding: 0,
            frame: 0,
            ready: false,
            fonts_loaded: false,
            measurement_clones: FxHashSet::default(),
            layout_passes: Cell::new(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0)?.as_ref()
    }

    fn data_mut(&mut self, id: NodeId) -> Result<&mut NodeData> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(Error::UnknownNode { id })
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(Some(data));
        NodeId(self.nodes.len() - 1)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.data(id).is_some()
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.data(id).map(|d| &d.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.data(id).map(|d| d.children.as_slice()).unwrap_or(&[])
    }

    /// True iff `id` is reachable from the document root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(n) = cur {
            if n == self.root {
                return true;
            }
            cur = self.parent(n);
        }
        false
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeData::new(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
        }))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeData::new(NodeKind::Text(text.to_string())))
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.alloc(NodeData::new(NodeKind::Comment(text.to_string())))
    }

    fn check_insertion(&self, parent: NodeId, child: NodeId) -> Result<()> {
        let parent_kind = self.kind(parent).ok_or(Error::UnknownNode { id: parent })?;
        let child_kind = self.kind(child).ok_or(Error::UnknownNode { id: child })?;
        if !matches!(parent_kind, NodeKind::Document | NodeKind::Element { .. }) {
            return Err(Error::HierarchyRequest {
                message: format!("{parent:?} cannot have children"),
            });
        }
        if matches!(child_kind, NodeKind::Document) {
            return Err(Error::HierarchyRequest {
                message: "the document node cannot be inserted".to_string(),
            });
        }
        let mut cur = Some(parent);
        while let Some(n) = cur {
            if n == child {
                return Err(Error::HierarchyRequest {
                    message: format!("{child:?} is an ancestor of {parent:?}"),
                });
            }
            cur = self.parent(n);
        }
        Ok(())
    }

    fn unlink(&mut self, id: NodeId) -> Result<()> {
        let parent = self.data_mut(id)?.parent.take();
        if let Some(p) = parent {
            self.data_mut(p)?.children.retain(|c| *c != id);
        }
        Ok(())
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_insertion(parent, child)?;
        self.unlink(child)?;
        self.data_mut(parent)?.children.push(child);
        self.data_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Inserts `node` as the next sibling of `reference`.
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) -> Result<()> {
        let parent = self
            .parent(reference)
            .ok_or_else(|| Error::HierarchyRequest {
                message: format!("{reference:?} has no parent"),
            })?;
        self.check_insertion(parent, node)?;
        self.unlink(node)?;
        let siblings = &mut self.data_mut(parent)?.children;
        let at = siblings
            .iter()
            .position(|c| *c == reference)
            .map(|i| i + 1)
            .unwrap_or(siblings.len());
        siblings.insert(at, node);
        self.data_mut(node)?.parent = Some(parent);
        Ok(())
    }

    /// Removes `id` from its parent; the subtree stays allocated and can be re-inserted.
    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        self.unlink(id)
    }

    /// Detaches `id` and frees its whole subtree. Handles into it stop resolving.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(Error::HierarchyRequest {
                message: "the document node cannot be removed".to_string(),
            });
        }
        self.unlink(id)?;
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if let Some(data) = self.nodes.get_mut(n.0).and_then(Option::take) {
                stack.extend(data.children);
            }
            self.measurement_clones.remove(&n);
        }
        Ok(())
    }

    /// `cloneNode`: copies the node (and with `deep`, its descendants) without tree links or
    /// listeners.
    pub fn clone_node(&mut self, id: NodeId, deep: bool) -> Result<NodeId> {
        let data = self.data(id).ok_or(Error::UnknownNode { id })?;
        if matches!(data.kind, NodeKind::Document) {
            return Err(Error::HierarchyRequest {
                message: "the document node cannot be cloned".to_string(),
            });
        }
        let copy = data.shallow_copy();
        let children = if deep { data.children.clone() } else { Vec::new() };
        let new_id = self.alloc(copy);
        for child in children {
            let child_copy = self.clone_node(child, true)?;
            self.append_child(new_id, child_copy)?;
        }
        Ok(new_id)
    }

    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> Result<NodeId> {
        let id = self.create_element(tag);
        self.append_child(parent, id)?;
        Ok(id)
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId> {
        let id = self.create_text(text);
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let Some(data) = self.data(n) else {
                continue;
            };
            if let NodeKind::Text(t) = &data.kind {
                out.push_str(t);
            }
            stack.extend(data.children.iter().rev());
        }
        out
    }

    pub fn snapshot(&self, id: NodeId) -> Option<NodeSnapshot> {
        let data = self.data(id)?;
        Some(NodeSnapshot {
            kind: data.kind.clone(),
            style: (!data.style.is_empty()).then(|| data.style.css_text()),
            children: data
                .children
                .iter()
                .filter_map(|c| self.snapshot(*c))
                .collect(),
        })
    }

    fn element_style_mut(&mut self, id: NodeId) -> Result<&mut StyleDeclarations> {
        let data = self.data_mut(id)?;
        match data.kind {
            NodeKind::Element { .. } | NodeKind::Document => Ok(&mut data.style),
            _ => Err(Error::HierarchyRequest {
                message: format!("{id:?} cannot carry a style"),
            }),
        }
    }

    /// Sets an inline declaration. Styling the document node styles the root (`:root`).
    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) -> Result<()> {
        self.element_style_mut(id)?.set(property, value);
        Ok(())
    }

    pub fn remove_style(&mut self, id: NodeId, property: &str) -> Result<Option<String>> {
        Ok(self.element_style_mut(id)?.remove(property))
    }

    /// Replaces the inline style with the parsed `style` attribute text.
    pub fn set_style_attribute(&mut self, id: NodeId, css_text: &str) -> Result<()> {
        let parsed = StyleDeclarations::parse(css_text)?;
        *self.element_style_mut(id)? = parsed;
        Ok(())
    }

    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.data(id)?.style.get(property)
    }

    pub fn style_attribute(&self, id: NodeId) -> Option<String> {
        let style = &self.data(id)?.style;
        (!style.is_empty()).then(|| style.css_text())
    }

    /// Computed value of `property`: the inline declaration, else the inherited value for
    /// inherited and custom properties. `font-size` is always reported in px.
    pub fn computed_value(&self, id: NodeId, property: &str) -> Option<String> {
        self.data(id)?;
        if property == "font-size" {
            return Some(px(self.font_size_px(id)));
        }
        let inherited = style::is_inherited(property);
        let mut cur = Some(id);
        while let Some(n) = cur {
            let data = self.data(n)?;
            if let Some(v) = data.style.get(property) {
                return Some(v.to_string());
            }
            if !inherited && data.kind.is_element() {
                return None;
            }
            cur = data.parent;
        }
        None
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    /// Resizes the viewport and fires [`Trigger::Resize`].
    pub fn set_viewport_width(&mut self, width: f64) -> usize {
        self.viewport_width = width;
        self.dispatch(Trigger::Resize)
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn mark_ready(&mut self) -> usize {
        self.ready = true;
        self.dispatch(Trigger::Ready)
    }

    pub fn mark_fonts_loaded(&mut self) -> usize {
        self.fonts_loaded = true;
        self.dispatch(Trigger::FontsLoaded)
    }

    /// Fires `trigger`; returns the number of listeners notified.
    pub fn dispatch(&mut self, trigger: Trigger) -> usize {
        let mut notified = 0;
        for listener in self.listeners.values() {
            if listener.trigger == trigger {
                listener.slot.schedule(trigger, self.frame);
                notified += 1;
            }
        }
        tracing::trace!(?trigger, notified, frame = self.frame, "dom: dispatch");
        notified
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Moves the paint clock to the next frame.
    pub fn advance_frame(&mut self) -> u64 {
        self.frame += 1;
        self.frame
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Measurement clones currently attached to the document.
    pub fn measurement_clone_count(&self) -> usize {
        self.measurement_clones
            .iter()
            .filter(|id| self.is_connected(**id))
            .count()
    }

    /// Number of height layouts performed so far.
    pub fn layout_passes(&self) -> u64 {
        self.layout_passes.get()
    }
}

impl LayoutOracle for Document {
    type Node = NodeId;

    fn is_element(&self, node: NodeId) -> bool {
        self.kind(node).is_some_and(NodeKind::is_element)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        Document::parent(self, node)
    }

    fn computed_style_value(&self, node: NodeId, property: &str) -> Option<String> {
        self.computed_value(node, property)
    }

    fn measure_rendered_height(&self, node: NodeId) -> f64 {
        self.content_height(node)
    }

    fn measure_width(&self, node: NodeId) -> f64 {
        self.content_width(node)
    }
}

impl LayoutHost for Document {
    fn deep_clone(&mut self, node: NodeId) -> NodeId {
        let id = match self.clone_node(node, true) {
            Ok(id) => id,
            Err(err) => {
                tracing::warn!(?node, error = %err, "dom: clone failed; measuring an empty element");
                self.create_element("div")
            }
        };
        self.measurement_clones.insert(id);
        id
    }

    fn set_out_of_flow(&mut self, node: NodeId) {
        // A copied `height` would pin the clone and hide its wrapped content.
        let res = self
            .set_style(node, "position", "absolute")
            .and_then(|()| self.remove_style(node, "height"));
        if let Err(err) = res {
            tracing::warn!(?node, error = %err, "dom: set_out_of_flow failed");
        }
    }

    fn set_width(&mut self, node: NodeId, width: f64) {
        if let Err(err) = self.set_style(node, "width", &px(width)) {
            tracing::warn!(?node, error = %err, "dom: set_width failed");
        }
    }

    fn insert_after(&mut self, reference: NodeId, node: NodeId) {
        if let Err(err) = Document::insert_after(self, reference, node) {
            tracing::warn!(?reference, ?node, error = %err, "dom: insert_after failed");
        }
    }

    fn set_font_size(&mut self, node: NodeId, size: f64) {
        if let Err(err) = self.set_style(node, "font-size", &px(size)) {
            tracing::warn!(?node, error = %err, "dom: set_font_size failed");
        }
    }

    fn detach(&mut self, node: NodeId) {
        let res = if self.measurement_clones.contains(&node) {
            self.remove(node)
        } else {
            Document::detach(self, node)
        };
        if let Err(err) = res {
            tracing::warn!(?node, error = %err, "dom: detach failed");
        }
    }
}

impl EventHost for Document {
    fn bind(&mut self, trigger: Trigger, slot: FrameSlot) -> BindingId {
        let id = BindingId(self.next_binding);
        self.next_binding += 1;
        // Ready and fonts-loaded are states, not just events: late listeners run right away.
        let already = match trigger {
            Trigger::Ready => self.ready,
            Trigger::FontsLoaded => self.fonts_loaded,
            Trigger::Resize => false,
        };
        if already {
            slot.schedule(trigger, self.frame);
        }
        self.listeners.insert(id, Listener { trigger, slot });
        id
    }

    fn unbind(&mut self, binding: BindingId) {
        self.listeners.remove(&binding);
    }

    fn current_frame(&self) -> u64 {
        self.frame
    }
}
