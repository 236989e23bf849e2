//! Hierarchical transform tree
//!
//! Nodes live in a slot map arena. Each node owns its list of child keys; the
//! parent link is a plain key. Removing a node removes its whole subtree.
//!
//! World matrices are only refreshed by [`TransformTree::update`], which walks
//! a subtree top-down: `world = parent_world * local`, children in insertion
//! order. Until then `world_transform` returns whatever the last update left.

use slotmap::{new_key_type, SlotMap};
use thiserror::Error;

use crate::foundation::math::Mat4;

new_key_type! {
    /// Key of a node in a [`TransformTree`]
    pub struct NodeKey;
}

/// Errors from tree edits
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformError {
    /// The edit would make a node its own ancestor
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    Cycle {
        /// Intended parent
        parent: NodeKey,
        /// Intended child
        child: NodeKey,
    },

    /// The key does not name a live node
    #[error("unknown transform node {0:?}")]
    UnknownNode(NodeKey),
}

#[derive(Debug)]
struct TransformNode<P> {
    local: Mat4,
    world: Mat4,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
    payload: Option<P>,
}

/// Arena of transform nodes with an optional payload per node
#[derive(Debug)]
pub struct TransformTree<P = ()> {
    nodes: SlotMap<NodeKey, TransformNode<P>>,
}

impl<P> Default for TransformTree<P> {
    fn default() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }
}

impl<P> TransformTree<P> {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached node; its world matrix starts as identity
    pub fn create_node(&mut self, local: Mat4) -> NodeKey {
        self.nodes.insert(TransformNode {
            local,
            world: Mat4::identity(),
            parent: None,
            children: Vec::new(),
            payload: None,
        })
    }

    /// Append `child` to the children of `parent`, detaching it from any
    /// previous parent first
    pub fn attach_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), TransformError> {
        self.node(parent)?;
        self.node(child)?;
        if self.is_ancestor_or_self(child, parent) {
            return Err(TransformError::Cycle { parent, child });
        }

        self.unlink(child);
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Make `node` a root again; its subtree stays attached to it
    pub fn detach(&mut self, node: NodeKey) -> Result<(), TransformError> {
        self.node(node)?;
        self.unlink(node);
        Ok(())
    }

    /// Remove `node` and its whole subtree, returning how many nodes went away
    pub fn remove(&mut self, node: NodeKey) -> Result<usize, TransformError> {
        self.node(node)?;
        self.unlink(node);

        let mut removed = 0;
        let mut pending = vec![node];
        while let Some(key) = pending.pop() {
            if let Some(entry) = self.nodes.remove(key) {
                pending.extend(entry.children);
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Whether `key` names a live node
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Replace the local transform; takes effect at the next update
    pub fn set_local_transform(&mut self, node: NodeKey, local: Mat4) -> Result<(), TransformError> {
        self.node_mut(node)?.local = local;
        Ok(())
    }

    /// Local transform relative to the parent
    pub fn local_transform(&self, node: NodeKey) -> Result<Mat4, TransformError> {
        Ok(self.node(node)?.local)
    }

    /// World transform as of the last update that reached this node
    pub fn world_transform(&self, node: NodeKey) -> Result<Mat4, TransformError> {
        Ok(self.node(node)?.world)
    }

    /// Parent of `node`, `None` for a root
    pub fn parent(&self, node: NodeKey) -> Result<Option<NodeKey>, TransformError> {
        Ok(self.node(node)?.parent)
    }

    /// Children of `node` in update order
    pub fn children(&self, node: NodeKey) -> Result<&[NodeKey], TransformError> {
        Ok(&self.node(node)?.children)
    }

    /// Attach a payload to `node`, returning the previous one
    pub fn set_payload(&mut self, node: NodeKey, payload: P) -> Result<Option<P>, TransformError> {
        Ok(self.node_mut(node)?.payload.replace(payload))
    }

    /// Payload of `node`, if any
    pub fn payload(&self, node: NodeKey) -> Result<Option<&P>, TransformError> {
        Ok(self.node(node)?.payload.as_ref())
    }

    /// Refresh world matrices of `node` and its subtree
    pub fn update(&mut self, node: NodeKey, parent_world: &Mat4) -> Result<(), TransformError> {
        self.update_with(node, parent_world, |_, _, _| {})
    }

    /// Like [`update`](Self::update), calling `visit` on every node right after
    /// its world matrix is refreshed, parents before children
    pub fn update_with<F>(&mut self, node: NodeKey, parent_world: &Mat4, mut visit: F) -> Result<(), TransformError>
    where
        F: FnMut(NodeKey, &Mat4, Option<&P>),
    {
        self.node(node)?;
        self.update_recursive(node, parent_world, &mut visit);
        Ok(())
    }

    fn update_recursive<F>(&mut self, key: NodeKey, parent_world: &Mat4, visit: &mut F)
    where
        F: FnMut(NodeKey, &Mat4, Option<&P>),
    {
        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };
        node.world = parent_world * node.local;
        let world = node.world;
        visit(key, &world, node.payload.as_ref());

        let mut index = 0;
        while let Some(&child) = self.nodes.get(key).and_then(|n| n.children.get(index)) {
            self.update_recursive(child, &world, visit);
            index += 1;
        }
    }

    fn is_ancestor_or_self(&self, candidate: NodeKey, mut node: NodeKey) -> bool {
        loop {
            if node == candidate {
                return true;
            }
            match self.nodes.get(node).and_then(|n| n.parent) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    fn unlink(&mut self, child: NodeKey) {
        let Some(parent) = self.nodes.get_mut(child).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.retain(|&c| c != child);
        }
    }

    fn node(&self, key: NodeKey) -> Result<&TransformNode<P>, TransformError> {
        self.nodes.get(key).ok_or(TransformError::UnknownNode(key))
    }

    fn node_mut(&mut self, key: NodeKey) -> Result<&mut TransformNode<P>, TransformError> {
        self.nodes.get_mut(key).ok_or(TransformError::UnknownNode(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4Ext, Vec3};

    fn translation(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::new_translation(&Vec3::new(x, y, z))
    }

    #[test]
    fn test_chain_composes_in_order() {
        let mut tree: TransformTree = TransformTree::new();
        let t_root = translation(1.0, 0.0, 0.0);
        let t_a = Mat4::rotation_y(0.5);
        let t_b = Mat4::new_scaling(2.0) * translation(0.0, 3.0, 0.0);

        let root = tree.create_node(t_root);
        let a = tree.create_node(t_a);
        let b = tree.create_node(t_b);
        tree.attach_child(root, a).unwrap();
        tree.attach_child(a, b).unwrap();

        tree.update(root, &Mat4::identity()).unwrap();

        assert_eq!(tree.world_transform(b).unwrap(), Mat4::identity() * t_root * t_a * t_b);
    }

    #[test]
    fn test_repeated_update_is_bit_identical() {
        let mut tree: TransformTree = TransformTree::new();
        let root = tree.create_node(Mat4::rotation_x(0.3));
        let child = tree.create_node(translation(0.1, 0.2, 0.3) * Mat4::rotation_z(1.1));
        tree.attach_child(root, child).unwrap();

        tree.update(root, &Mat4::identity()).unwrap();
        let first = tree.world_transform(child).unwrap();
        tree.update(root, &Mat4::identity()).unwrap();

        assert_eq!(tree.world_transform(child).unwrap(), first);
    }

    #[test]
    fn test_local_change_seen_after_update() {
        let mut tree: TransformTree = TransformTree::new();
        let root = tree.create_node(Mat4::identity());
        let child = tree.create_node(Mat4::identity());
        tree.attach_child(root, child).unwrap();
        tree.update(root, &Mat4::identity()).unwrap();

        tree.set_local_transform(root, translation(0.0, 0.0, 4.0)).unwrap();
        assert_eq!(tree.world_transform(child).unwrap(), Mat4::identity());

        tree.update(root, &Mat4::identity()).unwrap();
        assert_eq!(tree.world_transform(child).unwrap(), translation(0.0, 0.0, 4.0));
    }

    #[test]
    fn test_cycles_rejected() {
        let mut tree: TransformTree = TransformTree::new();
        let root = tree.create_node(Mat4::identity());
        let mid = tree.create_node(Mat4::identity());
        let leaf = tree.create_node(Mat4::identity());
        tree.attach_child(root, mid).unwrap();
        tree.attach_child(mid, leaf).unwrap();

        assert_eq!(
            tree.attach_child(leaf, root),
            Err(TransformError::Cycle { parent: leaf, child: root })
        );
        assert!(matches!(tree.attach_child(mid, mid), Err(TransformError::Cycle { .. })));
        assert_eq!(tree.parent(root).unwrap(), None);
    }

    #[test]
    fn test_reattach_moves_child() {
        let mut tree: TransformTree = TransformTree::new();
        let a = tree.create_node(Mat4::identity());
        let b = tree.create_node(Mat4::identity());
        let child = tree.create_node(Mat4::identity());

        tree.attach_child(a, child).unwrap();
        tree.attach_child(b, child).unwrap();

        assert!(tree.children(a).unwrap().is_empty());
        assert_eq!(tree.children(b).unwrap(), &[child]);
        assert_eq!(tree.parent(child).unwrap(), Some(b));
    }

    #[test]
    fn test_detach_keeps_subtree() {
        let mut tree: TransformTree = TransformTree::new();
        let root = tree.create_node(Mat4::identity());
        let mid = tree.create_node(translation(1.0, 0.0, 0.0));
        let leaf = tree.create_node(translation(0.0, 2.0, 0.0));
        tree.attach_child(root, mid).unwrap();
        tree.attach_child(mid, leaf).unwrap();

        tree.detach(mid).unwrap();
        tree.update(root, &translation(10.0, 0.0, 0.0)).unwrap();

        assert!(tree.children(root).unwrap().is_empty());
        assert_eq!(tree.parent(mid).unwrap(), None);
        assert_eq!(tree.children(mid).unwrap(), &[leaf]);
        // no longer reached from the old root
        assert_eq!(tree.world_transform(mid).unwrap(), Mat4::identity());

        tree.update(mid, &Mat4::identity()).unwrap();
        assert_eq!(tree.world_transform(leaf).unwrap(), translation(1.0, 2.0, 0.0));
        assert_eq!(tree.detach(mid), Ok(()));
    }

    #[test]
    fn test_remove_takes_subtree() {
        let mut tree: TransformTree = TransformTree::new();
        let root = tree.create_node(Mat4::identity());
        let mid = tree.create_node(Mat4::identity());
        let leaf = tree.create_node(Mat4::identity());
        tree.attach_child(root, mid).unwrap();
        tree.attach_child(mid, leaf).unwrap();

        assert_eq!(tree.remove(mid).unwrap(), 2);
        assert!(!tree.contains(leaf));
        assert!(tree.children(root).unwrap().is_empty());
        assert_eq!(tree.world_transform(leaf), Err(TransformError::UnknownNode(leaf)));
    }

    #[test]
    fn test_update_with_visits_parents_first() {
        let mut tree: TransformTree<&str> = TransformTree::new();
        let root = tree.create_node(Mat4::identity());
        let left = tree.create_node(Mat4::identity());
        let right = tree.create_node(Mat4::identity());
        let grandchild = tree.create_node(Mat4::identity());
        tree.attach_child(root, left).unwrap();
        tree.attach_child(root, right).unwrap();
        tree.attach_child(left, grandchild).unwrap();
        tree.set_payload(left, "left").unwrap();
        tree.set_payload(grandchild, "grandchild").unwrap();
        tree.set_payload(right, "right").unwrap();

        let mut order = Vec::new();
        tree.update_with(root, &Mat4::identity(), |_, _, payload| {
            if let Some(name) = payload {
                order.push(*name);
            }
        })
        .unwrap();

        assert_eq!(order, ["left", "grandchild", "right"]);
        assert_eq!(tree.payload(root).unwrap(), None);
        assert_eq!(tree.set_payload(left, "renamed").unwrap(), Some("left"));
        assert_eq!(tree.payload(left).unwrap(), Some(&"renamed"));
    }
}
