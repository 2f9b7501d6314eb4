//! Arena-backed scene graph
//!
//! Owns every node and material of a scene. Parent/child links are stored as
//! handles on both sides and are always updated together, so a node answers
//! "who is my parent" only while it is actually attached.

use slotmap::SlotMap;

use crate::core::config::SceneConfig;
use crate::foundation::math::Mat4;
use super::{
    Camera, Light, Material, MaterialId, Mesh, Node, NodeId, NodeKind, ObjectId,
    SceneError, SceneResult,
};

/// Hierarchical scene storage
#[derive(Debug)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, Node>,
    materials: SlotMap<MaterialId, Material>,
    next_light_id: u32,
    free_light_ids: Vec<u32>,
    max_lights: u32,
    max_depth: usize,
}

impl SceneGraph {
    /// Create an empty scene with default limits
    pub fn new() -> Self {
        Self::with_config(&SceneConfig::default())
    }

    /// Create an empty scene with explicit limits
    pub fn with_config(config: &SceneConfig) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            materials: SlotMap::with_key(),
            next_light_id: 0,
            free_light_ids: Vec::new(),
            max_lights: config.max_lights,
            max_depth: config.max_depth,
        }
    }

    /// Maximum hierarchy depth accepted by walks over this graph
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    /// Store a new, detached node
    ///
    /// Lights are given the lowest free light slot; creation fails once all
    /// slots are taken. Mesh geometry is validated first.
    pub fn create_node(&mut self, name: impl Into<String>, local: Mat4, mut kind: NodeKind) -> SceneResult<NodeId> {
        if let NodeKind::Mesh(mesh) = &kind {
            mesh.geometry.validate()?;
        }
        if let NodeKind::Light(light) = &mut kind {
            light.light_id = self.allocate_light_slot()?;
        }

        Ok(self.insert(Node::new(name, local, kind)))
    }

    /// Replace a node's kind, keeping light slots consistent
    ///
    /// A light keeps its slot when it stays a light, a node that becomes a
    /// light takes a free slot, and a light that becomes something else gives
    /// its slot back.
    pub fn set_kind(&mut self, id: NodeId, mut kind: NodeKind) -> SceneResult<()> {
        let old_slot = self.get(id)?.as_light().map(Light::light_id);
        if let NodeKind::Mesh(mesh) = &kind {
            mesh.geometry.validate()?;
        }

        if let NodeKind::Light(light) = &mut kind {
            light.light_id = match old_slot {
                Some(slot) => slot,
                None => self.allocate_light_slot()?,
            };
        } else if let Some(slot) = old_slot {
            self.release_light_slot(slot);
        }

        self.get_mut(id)?.kind = kind;
        Ok(())
    }

    fn allocate_light_slot(&mut self) -> SceneResult<u32> {
        if let Some((index, _)) = self.free_light_ids.iter().enumerate().min_by_key(|&(_, slot)| *slot) {
            return Ok(self.free_light_ids.swap_remove(index));
        }
        if self.next_light_id >= self.max_lights {
            return Err(SceneError::LightLimitReached { max: self.max_lights });
        }
        let slot = self.next_light_id;
        self.next_light_id += 1;
        Ok(slot)
    }

    fn release_light_slot(&mut self, slot: u32) {
        log::trace!("Released light slot {}", slot);
        self.free_light_ids.push(slot);
    }

    fn insert(&mut self, node: Node) -> NodeId {
        log::trace!("Created {} node '{}' ({})", node.kind.label(), node.name, node.id);
        self.nodes.insert(node)
    }

    /// Store a new group node
    pub fn create_group(&mut self, name: impl Into<String>, local: Mat4) -> NodeId {
        self.insert(Node::new(name, local, NodeKind::Group))
    }

    /// Store a new light node
    pub fn create_light(&mut self, name: impl Into<String>, local: Mat4, light: Light) -> SceneResult<NodeId> {
        self.create_node(name, local, NodeKind::Light(light))
    }

    /// Store a new mesh node, rejecting inconsistent geometry
    pub fn create_mesh(&mut self, name: impl Into<String>, local: Mat4, mesh: Mesh) -> SceneResult<NodeId> {
        self.create_node(name, local, NodeKind::Mesh(mesh))
    }

    /// Store a new camera node
    pub fn create_camera(&mut self, name: impl Into<String>, local: Mat4, camera: Camera) -> NodeId {
        self.insert(Node::new(name, local, NodeKind::Camera(camera)))
    }

    /// Store a material
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.insert(material)
    }

    // ------------------------------------------------------------------
    // Access
    // ------------------------------------------------------------------

    /// Look up a node
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Look up a node mutably
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Look up a node or fail with [`SceneError::UnknownNode`]
    pub fn get(&self, id: NodeId) -> SceneResult<&Node> {
        self.nodes.get(id).ok_or(SceneError::UnknownNode(id))
    }

    fn get_mut(&mut self, id: NodeId) -> SceneResult<&mut Node> {
        self.nodes.get_mut(id).ok_or(SceneError::UnknownNode(id))
    }

    /// Drop a material from the scene
    ///
    /// Meshes still referring to it keep a handle that no longer resolves.
    pub fn remove_material(&mut self, id: MaterialId) -> Option<Material> {
        let removed = self.materials.remove(id);
        if let Some(material) = &removed {
            log::trace!("Removed material '{}'", material.name);
        }
        removed
    }

    /// Look up a material
    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id)
    }

    /// Look up a material mutably
    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id)
    }

    /// Whether the handle refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Replace a node's local transform
    pub fn set_local_transform(&mut self, id: NodeId, local: Mat4) -> SceneResult<()> {
        self.get_mut(id)?.local = local;
        Ok(())
    }

    /// Parent of a node, `None` for roots and unknown handles
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    /// Children of a node in insertion order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map_or(&[], |node| node.children.as_slice())
    }

    /// Number of direct children
    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).len()
    }

    // ------------------------------------------------------------------
    // Hierarchy
    // ------------------------------------------------------------------

    /// Attach `child` as the last child of `parent`
    ///
    /// A child that already has a parent is detached from it first. Attaching
    /// a node under itself or under one of its own descendants is rejected.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        self.get(parent)?;
        self.get(child)?;

        if parent == child {
            return Err(SceneError::SelfParent(child));
        }
        if self.is_ancestor_or_self(child, parent)? {
            return Err(SceneError::CycleDetected { parent, child });
        }

        if let Some(previous) = self.nodes[child].parent {
            self.detach(previous, child);
        }

        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        Ok(())
    }

    /// Attach `child` under `parent`; same as [`Self::add_child`] with the arguments swapped
    pub fn set_parent(&mut self, child: NodeId, parent: NodeId) -> SceneResult<()> {
        self.add_child(parent, child)
    }

    /// Detach `child` from `parent`
    ///
    /// Returns `false` when `child` is not among `parent`'s children. The
    /// child stays in the arena as a root.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(child_object) = self.nodes.get(child).map(Node::id) else {
            return false;
        };
        let Some(position) = self.nodes.get(parent).and_then(|node| {
            node.children.iter().position(|&id| self.nodes.get(id).map(Node::id) == Some(child_object))
        }) else {
            return false;
        };

        let removed = self.nodes[parent].children.remove(position);
        if let Some(node) = self.nodes.get_mut(removed) {
            node.parent = None;
        }
        true
    }

    /// Detach every child of `parent`; the children stay in the arena as roots
    pub fn remove_all_children(&mut self, parent: NodeId) -> SceneResult<()> {
        let children = std::mem::take(&mut self.get_mut(parent)?.children);
        for child in children {
            if let Some(node) = self.nodes.get_mut(child) {
                node.parent = None;
            }
        }
        Ok(())
    }

    fn detach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(parent) {
            if let Some(position) = node.children.iter().position(|&id| id == child) {
                node.children.remove(position);
            }
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
        }
    }

    /// Whether `ancestor` is `node` or lies on its parent chain
    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> SceneResult<bool> {
        let mut current = Some(node);
        let mut depth = 0;

        while let Some(id) = current {
            if id == ancestor {
                return Ok(true);
            }
            depth += 1;
            if depth > self.max_depth {
                return Err(SceneError::DepthLimitExceeded { node, limit: self.max_depth });
            }
            current = self.parent(id);
        }
        Ok(false)
    }

    /// Destroy a node and its whole subtree
    ///
    /// The node is detached from its parent first. Returns the number of
    /// nodes removed from the arena.
    pub fn destroy(&mut self, id: NodeId) -> SceneResult<usize> {
        if let Some(parent) = self.get(id)?.parent {
            self.detach(parent, id);
        }

        let mut worklist = vec![id];
        let mut removed = 0;
        while let Some(current) = worklist.pop() {
            if let Some(node) = self.nodes.remove(current) {
                if let NodeKind::Light(light) = &node.kind {
                    self.release_light_slot(light.light_id);
                }
                worklist.extend(node.children);
                removed += 1;
            }
        }

        log::trace!("Destroyed {} nodes", removed);
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Transforms
    // ------------------------------------------------------------------

    /// World transform of a node
    ///
    /// Composed as `local * parent_local * grandparent_local * ... * root_local`:
    /// each ancestor is multiplied on the right. A root returns its local
    /// transform unchanged.
    pub fn world_transform(&self, id: NodeId) -> SceneResult<Mat4> {
        let node = self.get(id)?;
        let mut world = node.local;
        let mut current = node.parent;
        let mut depth = 0;

        while let Some(parent_id) = current {
            depth += 1;
            if depth > self.max_depth {
                return Err(SceneError::DepthLimitExceeded { node: id, limit: self.max_depth });
            }
            let parent = self.get(parent_id)?;
            world *= parent.local;
            current = parent.parent;
        }

        Ok(world)
    }

    /// View matrix of a camera node: the inverse of its world transform
    pub fn view_matrix(&self, camera: NodeId) -> SceneResult<Mat4> {
        if !self.get(camera)?.is_camera() {
            return Err(SceneError::NotACamera(camera));
        }
        self.world_transform(camera)?
            .try_inverse()
            .ok_or(SceneError::SingularTransform(camera))
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Descendants of `id` named `name`
    ///
    /// The node itself is not considered. At every level all direct children
    /// are checked first, then each child's subtree is searched in order.
    pub fn find_by_name(&self, id: NodeId, name: &str) -> Vec<NodeId> {
        let mut matches = Vec::new();
        let mut pending = vec![id];

        while let Some(current) = pending.pop() {
            let children = self.children(current);
            matches.extend(
                children
                    .iter()
                    .copied()
                    .filter(|&child| self.nodes.get(child).is_some_and(|node| node.name == name)),
            );
            // Reverse so the first child's subtree is searched first
            pending.extend(children.iter().rev().copied());
        }

        matches
    }

    /// Direct child of `id` carrying `object_id`
    pub fn find_by_id(&self, id: NodeId, object_id: ObjectId) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.nodes.get(child).is_some_and(|node| node.id == object_id))
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
