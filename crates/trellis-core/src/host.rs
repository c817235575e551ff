use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::{HostError, Key, View, ViewKind};

new_key_type! {
    /// Handle to a mounted node.
    pub struct NodeId;
}

struct Node {
    kind: ViewKind,
    key: Option<Key>,
    /// Named-transition phase marker, e.g. `yolo-enter` or `yolo-leave`.
    transition_class: Option<String>,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
}

/// Retained tree of mounted views.
///
/// The host owns mounted structure only; it does not drive transitions or
/// lifecycle. Mutations go through [`Host::mount`], [`Host::unmount`],
/// [`Host::patch`] and [`Host::reorder_children`]; the query methods are
/// panic-free and return empty results for unknown nodes.
#[derive(Default)]
pub struct Host {
    nodes: SlotMap<NodeId, Node>,
}

impl Host {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detached container to mount into.
    pub fn create_root(&mut self) -> NodeId {
        self.nodes.insert(Node {
            kind: ViewKind::Panel,
            key: None,
            transition_class: None,
            parent: None,
            children: SmallVec::new(),
        })
    }

    /// Mounts `view` and its subtree under `parent` at `index`.
    pub fn mount(&mut self, parent: NodeId, index: usize, view: &View) -> Result<NodeId, HostError> {
        let len = self.container(parent)?.children.len();
        if index > len {
            return Err(HostError::IndexOutOfBounds { parent, index, len });
        }
        let node = self.mount_subtree(parent, view);
        self.nodes[parent].children.insert(index, node);
        log::trace!("mounted {node:?} under {parent:?} at {index}");
        Ok(node)
    }

    fn mount_subtree(&mut self, parent: NodeId, view: &View) -> NodeId {
        let node = self.nodes.insert(Node {
            kind: view.kind.clone(),
            key: view.key.clone(),
            transition_class: None,
            parent: Some(parent),
            children: SmallVec::new(),
        });
        for child in &view.children {
            let c = self.mount_subtree(node, child);
            self.nodes[node].children.push(c);
        }
        node
    }

    /// Removes `node` and its subtree.
    pub fn unmount(&mut self, node: NodeId) -> Result<(), HostError> {
        if !self.nodes.contains_key(node) {
            return Err(HostError::UnknownNode(node));
        }
        if let Some(parent) = self.nodes[node].parent
            && let Some(p) = self.nodes.get_mut(parent)
        {
            p.children.retain(|c| *c != node);
        }
        self.remove_subtree(node);
        Ok(())
    }

    fn remove_subtree(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.nodes[node].children);
        for child in children {
            self.remove_subtree(child);
        }
        self.nodes.remove(node);
    }

    /// Replaces a mounted node's content in place; children are untouched.
    pub fn patch(&mut self, node: NodeId, view: &View) -> Result<(), HostError> {
        let n = self
            .nodes
            .get_mut(node)
            .ok_or(HostError::UnknownNode(node))?;
        n.kind = view.kind.clone();
        n.key = view.key.clone();
        Ok(())
    }

    /// Reorders a container's children. `order` must be a permutation of
    /// the current child list.
    pub fn reorder_children(&mut self, parent: NodeId, order: &[NodeId]) -> Result<(), HostError> {
        let current = &self.container(parent)?.children;
        let mut a: SmallVec<[NodeId; 4]> = current.clone();
        let mut b: SmallVec<[NodeId; 4]> = SmallVec::from_slice(order);
        a.sort_unstable();
        b.sort_unstable();
        if a != b {
            return Err(HostError::ReorderMismatch(parent));
        }
        self.nodes[parent].children = SmallVec::from_slice(order);
        Ok(())
    }

    pub fn set_transition_class(
        &mut self,
        node: NodeId,
        class: Option<String>,
    ) -> Result<(), HostError> {
        let n = self
            .nodes
            .get_mut(node)
            .ok_or(HostError::UnknownNode(node))?;
        n.transition_class = class;
        Ok(())
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    pub fn child_count(&self, node: NodeId) -> usize {
        self.nodes.get(node).map_or(0, |n| n.children.len())
    }

    pub fn child_at(&self, node: NodeId, index: usize) -> Option<NodeId> {
        self.nodes.get(node)?.children.get(index).copied()
    }

    /// The identifying attribute of a mounted `Item`.
    pub fn ident(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node)?.kind {
            ViewKind::Item { ident } => Some(ident),
            _ => None,
        }
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node)?.kind {
            ViewKind::Label { text } => Some(text),
            _ => None,
        }
    }

    pub fn key(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node)?.key.as_deref()
    }

    pub fn transition_class(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node)?.transition_class.as_deref()
    }

    fn container(&self, node: NodeId) -> Result<&Node, HostError> {
        let n = self.nodes.get(node).ok_or(HostError::UnknownNode(node))?;
        match n.kind {
            ViewKind::Panel => Ok(n),
            _ => Err(HostError::NotAContainer(node)),
        }
    }
}
