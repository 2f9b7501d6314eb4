//! Scene nodes and their kinds

use std::sync::atomic::{AtomicU32, Ordering};

use crate::foundation::math::Mat4;
use super::{Camera, Light, Mesh};

slotmap::new_key_type! {
    /// Stable handle to a node stored in a [`super::SceneGraph`]
    pub struct NodeId;
}

static NEXT_OBJECT_ID: AtomicU32 = AtomicU32::new(0);

/// Process-wide object identifier
///
/// Identifiers start at 1 and grow monotonically for the lifetime of the
/// process; 0 is never handed out. Unlike [`NodeId`] they are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(u32);

impl ObjectId {
    /// Allocate the next identifier
    pub fn next() -> Self {
        Self(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Raw identifier value
    pub fn value(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node is, beyond its place in the hierarchy
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Pure transform group
    Group,
    /// Light source
    Light(Light),
    /// Renderable geometry
    Mesh(Mesh),
    /// Viewpoint; never rendered
    Camera(Camera),
}

/// Kind tag of a node that may appear in a render list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawableKind {
    /// Group node
    Group,
    /// Light node
    Light,
    /// Mesh node
    Mesh,
}

impl NodeKind {
    /// Short name used in logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Light(_) => "light",
            Self::Mesh(_) => "mesh",
            Self::Camera(_) => "camera",
        }
    }

    /// Drawable tag, `None` for cameras
    pub fn drawable(&self) -> Option<DrawableKind> {
        match self {
            Self::Group => Some(DrawableKind::Group),
            Self::Light(_) => Some(DrawableKind::Light),
            Self::Mesh(_) => Some(DrawableKind::Mesh),
            Self::Camera(_) => None,
        }
    }
}

/// A node of the scene graph
///
/// Hierarchy links are managed by [`super::SceneGraph`]; a node only exposes
/// them read-only.
#[derive(Debug, Clone)]
pub struct Node {
    pub(super) id: ObjectId,
    pub(super) name: String,
    pub(super) local: Mat4,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
    pub(super) kind: NodeKind,
}

impl Node {
    pub(super) fn new(name: impl Into<String>, local: Mat4, kind: NodeKind) -> Self {
        Self {
            id: ObjectId::next(),
            name: name.into(),
            local,
            parent: None,
            children: Vec::new(),
            kind,
        }
    }

    /// Unique object identifier
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Human-readable name (not unique)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the node
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Transform relative to the parent frame
    pub fn local_transform(&self) -> &Mat4 {
        &self.local
    }

    /// Replace the local transform
    pub fn set_local_transform(&mut self, local: Mat4) {
        self.local = local;
    }

    /// Current parent, if attached
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Number of direct children
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Node kind
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Whether the node is a light
    pub fn is_light(&self) -> bool {
        matches!(self.kind, NodeKind::Light(_))
    }

    /// Whether the node is a mesh
    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh(_))
    }

    /// Whether the node is a camera
    pub fn is_camera(&self) -> bool {
        matches!(self.kind, NodeKind::Camera(_))
    }

    /// Whether traversal emits a render entry for this node
    pub fn is_drawable(&self) -> bool {
        !self.is_camera()
    }

    /// Light payload
    pub fn as_light(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    /// Mutable light payload
    pub fn as_light_mut(&mut self) -> Option<&mut Light> {
        match &mut self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    /// Mesh payload
    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// Mutable mesh payload
    pub fn as_mesh_mut(&mut self) -> Option<&mut Mesh> {
        match &mut self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// Camera payload
    pub fn as_camera(&self) -> Option<&Camera> {
        match &self.kind {
            NodeKind::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    /// Mutable camera payload
    pub fn as_camera_mut(&mut self) -> Option<&mut Camera> {
        match &mut self.kind {
            NodeKind::Camera(camera) => Some(camera),
            _ => None,
        }
    }
}
