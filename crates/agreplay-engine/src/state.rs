use agreplay_types::{RenderedElement, ToolInvocation};
use std::collections::HashMap;

/// The running transcript of one replay.
///
/// Elements are only appended within an epoch; a compaction boundary clears
/// everything at once. The matching index stores positions into `elements`,
/// never references, so a reset is two `clear()` calls.
#[derive(Debug, Clone, Default)]
pub struct ReplayState {
    elements: Vec<RenderedElement>,
    /// invocation id -> position of its `ToolInvocation` element
    index: HashMap<String, usize>,
    open_group: Option<String>,
    epoch: usize,
}

impl ReplayState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[RenderedElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Response group currently accepting continuation blocks
    pub fn open_group(&self) -> Option<&str> {
        self.open_group.as_deref()
    }

    /// Number of compaction boundaries seen so far
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    /// Position of the invocation registered under `id` in this epoch
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn lookup(&self, id: &str) -> Option<&ToolInvocation> {
        match self.elements.get(self.position_of(id)?)? {
            RenderedElement::ToolInvocation(invocation) => Some(invocation),
            _ => None,
        }
    }

    pub(crate) fn invocation_mut(&mut self, id: &str) -> Option<&mut ToolInvocation> {
        let position = self.position_of(id)?;
        match self.elements.get_mut(position)? {
            RenderedElement::ToolInvocation(invocation) => Some(invocation),
            _ => None,
        }
    }

    /// Append an element and return its position
    pub(crate) fn push(&mut self, element: RenderedElement) -> usize {
        self.elements.push(element);
        self.elements.len() - 1
    }

    /// Append a tool invocation and make it resolvable by id.
    ///
    /// A repeated id within one epoch points at the newest invocation.
    pub(crate) fn push_invocation(&mut self, invocation: ToolInvocation) -> usize {
        let id = invocation.id.clone();
        let position = self.push(RenderedElement::ToolInvocation(invocation));
        self.index.insert(id, position);
        position
    }

    pub(crate) fn set_open_group(&mut self, group: Option<String>) {
        self.open_group = group;
    }

    pub(crate) fn close_group(&mut self) {
        self.open_group = None;
    }

    /// Start a new epoch: drop every element and index entry, in place
    pub(crate) fn reset(&mut self) {
        self.elements.clear();
        self.index.clear();
        self.open_group = None;
        self.epoch += 1;
    }
}
