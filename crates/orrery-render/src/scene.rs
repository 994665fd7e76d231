//! Scene graph: a forest of visual objects and lights with local transforms.
//!
//! The graph only stores ids for GPU resources. Whoever adds a visual is
//! responsible for disposing its geometry and material through the
//! [`Renderer`](crate::Renderer) once the node is removed; see
//! [`Stage::dispose_object`](crate::Stage::dispose_object).

use glam::{EulerRot, Mat4, Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::color::{Color, palette};
use crate::renderer::{GeometryId, MaterialId};

/// Identifier of a node inside one [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// Omnidirectional light with a finite reach.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub color: Color,
    pub intensity: f32,
    /// Distance at which the light has faded to zero. `0` means unlimited.
    pub distance: f32,
}

/// Light applied uniformly to every lit surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

/// What a node is.
///
/// The three visual kinds are siblings: each owns one geometry and one
/// material, and none is a special case of another.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Object3D {
    Mesh {
        geometry: GeometryId,
        material: MaterialId,
    },
    Line {
        geometry: GeometryId,
        material: MaterialId,
    },
    Points {
        geometry: GeometryId,
        material: MaterialId,
    },
    PointLight(PointLight),
    AmbientLight(AmbientLight),
}

impl Object3D {
    /// The GPU resources held by a visual, `None` for lights.
    pub fn resources(&self) -> Option<(GeometryId, MaterialId)> {
        match *self {
            Self::Mesh { geometry, material }
            | Self::Line { geometry, material }
            | Self::Points { geometry, material } => Some((geometry, material)),
            Self::PointLight(_) | Self::AmbientLight(_) => None,
        }
    }
}

/// Local position and XYZ Euler rotation (radians) relative to the parent.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
        }
    }

    /// Local-to-parent matrix.
    pub fn matrix(&self) -> Mat4 {
        let r = self.rotation;
        Mat4::from_rotation_translation(Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z), self.position)
    }
}

/// One entry in the scene graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub object: Object3D,
    pub transform: Transform,
    pub name: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn new(object: Object3D) -> Self {
        Self {
            object,
            transform: Transform::default(),
            name: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// The renderable world.
#[derive(Debug)]
pub struct Scene {
    /// Clear color behind all geometry.
    pub background: Color,
    nodes: FxHashMap<NodeId, Node>,
    roots: Vec<NodeId>,
    next_id: u64,
}

impl Scene {
    pub fn new(background: Color) -> Self {
        Self {
            background,
            nodes: FxHashMap::default(),
            roots: Vec::new(),
            next_id: 0,
        }
    }

    /// Add a top-level node.
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = self.insert(node, None);
        self.roots.push(id);
        id
    }

    /// Attach `node` under `parent`. Returns `None` if `parent` is not in the scene.
    pub fn add_child(&mut self, parent: NodeId, node: Node) -> Option<NodeId> {
        if !self.nodes.contains_key(&parent) {
            return None;
        }
        let id = self.insert(node, Some(parent));
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        Some(id)
    }

    /// Add a top-level `parent` with `child` already attached.
    pub fn add_with_child(&mut self, parent: Node, child: Node) -> (NodeId, NodeId) {
        let parent_id = self.add(parent);
        let child_id = self.insert(child, Some(parent_id));
        if let Some(p) = self.nodes.get_mut(&parent_id) {
            p.children.push(child_id);
        }
        (parent_id, child_id)
    }

    fn insert(&mut self, mut node: Node, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        node.parent = parent;
        node.children.clear();
        self.nodes.insert(id, node);
        id
    }

    /// Detach `id` and its whole subtree. Returns the removed nodes, `id` first.
    ///
    /// Removing an unknown id returns an empty list.
    pub fn remove(&mut self, id: NodeId) -> Vec<Node> {
        let Some(parent) = self.nodes.get(&id).map(|n| n.parent) else {
            return Vec::new();
        };
        match parent {
            Some(p) => {
                if let Some(p) = self.nodes.get_mut(&p) {
                    p.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                stack.extend(node.children.iter().rev().copied());
                removed.push(node);
            }
        }
        removed
    }

    /// Drop every node. Returns them in no particular order.
    pub fn clear(&mut self) -> Vec<Node> {
        self.roots.clear();
        self.nodes.drain().map(|(_, node)| node).collect()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.nodes.get_mut(&id).map(|n| &mut n.transform)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of top-level objects.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of nodes at any depth.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Find a node by name, searching the whole graph.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, n)| n.name.as_deref() == Some(name))
            .map(|(id, _)| *id)
    }

    /// Local-to-world matrix of `id`.
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut node = self.nodes.get(&id)?;
        let mut matrix = node.transform.matrix();
        while let Some(parent) = node.parent {
            node = self.nodes.get(&parent)?;
            matrix = node.transform.matrix() * matrix;
        }
        Some(matrix)
    }

    /// Depth-first walk over every node with its world matrix, parents before children.
    pub fn visit(&self, mut f: impl FnMut(NodeId, &Node, Mat4)) {
        let mut stack: Vec<(NodeId, Mat4)> =
            self.roots.iter().rev().map(|id| (*id, Mat4::IDENTITY)).collect();
        while let Some((id, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            let world = parent_world * node.transform.matrix();
            f(id, node, world);
            stack.extend(node.children.iter().rev().map(|c| (*c, world)));
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(palette::PURE_BLACK)
    }
}
