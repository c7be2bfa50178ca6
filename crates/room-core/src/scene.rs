//! Index-based scene-node arena shared by the picker, the interaction
//! machinery, and the renderer.
//!
//! Nodes form a tree through parent/child indices. A subtree is "attached"
//! when its topmost ancestor appears in `roots`; detached subtrees keep
//! their storage (the summon creature lives detached while hidden) but are
//! neither rendered nor hit-testable. Removed slots are recycled through a
//! free list so repeated glow attach/detach cycles do not grow the arena.

use glam::{Mat4, Quat, Vec3};

pub type NodeId = usize;
pub type MeshId = usize;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Vertex layout uploaded verbatim to the GPU.
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let mut aabb = Aabb {
            min: first,
            max: first,
        };
        for p in it {
            aabb.min = aabb.min.min(p);
            aabb.max = aabb.max.max(p);
        }
        Some(aabb)
    }

    /// Transform all eight corners and re-wrap; conservative for rotations.
    pub fn transformed(&self, m: &Mat4) -> Aabb {
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];
        let mut min = m.transform_point3(corners[0]);
        let mut max = min;
        for c in &corners[1..] {
            let p = m.transform_point3(*c);
            min = min.min(p);
            max = max.max(p);
        }
        Aabb { min, max }
    }
}

#[derive(Clone, Debug)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    pub base_color: [f32; 4],
    pub local_aabb: Aabb,
}

#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub local: Transform,
    pub visible: bool,
    pub mesh: Option<MeshId>,
    /// `Some(alpha)` marks a glow-overlay clone: rendered translucent,
    /// skipped by the hit resolver.
    pub overlay_opacity: Option<f32>,
}

impl Node {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            local: Transform::default(),
            visible: true,
            mesh: None,
            overlay_opacity: None,
        }
    }

    pub fn with_mesh(name: impl Into<String>, mesh: MeshId) -> Self {
        let mut n = Self::named(name);
        n.mesh = Some(mesh);
        n
    }
}

#[derive(Default)]
pub struct Scene {
    nodes: Vec<Option<Node>>,
    free: Vec<NodeId>,
    roots: Vec<NodeId>,
    pub meshes: Vec<MeshData>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mesh(&mut self, mesh: MeshData) -> MeshId {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    pub fn mesh(&self, id: MeshId) -> Option<&MeshData> {
        self.meshes.get(id)
    }

    /// Insert a node without linking it anywhere; reuses freed slots.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id] = Some(node);
            id
        } else {
            self.nodes.push(Some(node));
            self.nodes.len() - 1
        }
    }

    /// Insert a node as a child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        node.parent = Some(parent);
        let id = self.add_node(node);
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        id
    }

    /// Insert a node and attach it as a top-level scene root.
    pub fn add_root(&mut self, node: Node) -> NodeId {
        let id = self.add_node(node);
        self.roots.push(id);
        id
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Put an existing top-level node back into the active scene.
    pub fn attach_root(&mut self, id: NodeId) {
        if !self.roots.contains(&id) {
            self.roots.push(id);
        }
    }

    /// Remove a top-level node from the active scene, keeping its storage.
    pub fn detach_root(&mut self, id: NodeId) {
        self.roots.retain(|r| *r != id);
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id).and_then(|slot| slot.as_ref())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id).and_then(|slot| slot.as_mut())
    }

    pub fn live_node_count(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    /// Remove `id` and everything below it, unlinking from parent/roots and
    /// recycling the slots.
    pub fn remove_subtree(&mut self, id: NodeId) {
        let parent = self.node(id).and_then(|n| n.parent);
        if let Some(p) = parent {
            if let Some(pn) = self.node_mut(p) {
                pn.children.retain(|c| *c != id);
            }
        }
        self.roots.retain(|r| *r != id);
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(slot) = self.nodes.get_mut(cur) {
                if let Some(node) = slot.take() {
                    stack.extend(node.children);
                    self.free.push(cur);
                }
            }
        }
    }

    /// `id` plus every node below it, in depth-first order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(node) = self.node(cur) {
                out.push(cur);
                stack.extend(node.children.iter().copied());
            }
        }
        out
    }

    pub fn world_transform(&self, id: NodeId) -> Mat4 {
        let mut chain = Vec::new();
        let mut cur = Some(id);
        while let Some(c) = cur {
            match self.node(c) {
                Some(node) => {
                    chain.push(node.local.matrix());
                    cur = node.parent;
                }
                None => break,
            }
        }
        let mut m = Mat4::IDENTITY;
        for local in chain.iter().rev() {
            m *= *local;
        }
        m
    }

    /// True when the topmost ancestor of `id` is an active scene root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut cur = id;
        loop {
            match self.node(cur) {
                Some(node) => match node.parent {
                    Some(p) => cur = p,
                    None => return self.roots.contains(&cur),
                },
                None => return false,
            }
        }
    }

    /// True when `id` and all its ancestors are visible.
    pub fn effectively_visible(&self, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            match self.node(c) {
                Some(node) => {
                    if !node.visible {
                        return false;
                    }
                    cur = node.parent;
                }
                None => return false,
            }
        }
        true
    }

    /// Case-insensitive substring lookup under `root`, the way the source
    /// scene names its fixtures (exporters mangle case freely).
    pub fn find_by_name(&self, root: NodeId, needle: &str) -> Option<NodeId> {
        let needle = needle.to_lowercase();
        self.descendants(root)
            .into_iter()
            .find(|id| match self.node(*id) {
                Some(n) => n.name.to_lowercase().contains(&needle),
                None => false,
            })
    }
}
