//! Per-frame render list
//!
//! Collects traversal output with a simple insertion policy: light entries go
//! to the front of the list, everything else to the back. Lights therefore
//! form one contiguous run at the front (most recently inserted first) while
//! the other entries keep traversal order.
//!
//! [`RenderList::classify`] splits the list into [`RenderBatches`]:
//!
//! 1. the leading run of lights,
//! 2. every mesh whose material is fully opaque,
//! 3. whatever is left, in list order.

use std::collections::VecDeque;

use crate::core::config::MalformedEntryPolicy;
use crate::foundation::math::Mat4;
use crate::scene::{NodeId, SceneError, SceneGraph};
use super::{RenderBatches, RenderEntry, RenderError, RenderResult, SceneTraverser};

/// Working list of render entries for one frame
#[derive(Debug, Default, Clone)]
pub struct RenderList {
    entries: VecDeque<RenderEntry>,
}

impl RenderList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Insert one entry according to the light front-loading policy
    pub fn load(&mut self, entry: RenderEntry) {
        if entry.is_light() {
            self.entries.push_front(entry);
        } else {
            self.entries.push_back(entry);
        }
    }

    /// Traverse a subtree and load every entry, using the scene's depth limit
    pub fn pass(&mut self, graph: &SceneGraph, root: Option<NodeId>, initial: &Mat4) -> RenderResult<()> {
        self.pass_with(&SceneTraverser::for_scene(graph), graph, root, initial)
    }

    /// Traverse a subtree with an explicit traverser and load every entry
    pub fn pass_with(
        &mut self,
        traverser: &SceneTraverser,
        graph: &SceneGraph,
        root: Option<NodeId>,
        initial: &Mat4,
    ) -> RenderResult<()> {
        traverser.visit(graph, root, initial, |entry| self.load(entry))
    }

    /// Entries in list order
    pub fn entries(&self) -> impl Iterator<Item = &RenderEntry> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Split the list into lights, opaque meshes and the rest
    ///
    /// The list itself is left untouched, so classifying twice gives the same
    /// batches. Meshes that cannot be classified (no material, or a material
    /// handle that no longer resolves) are handled according to `policy`.
    pub fn classify(&self, graph: &SceneGraph, policy: MalformedEntryPolicy) -> RenderResult<RenderBatches> {
        let mut batches = RenderBatches::default();

        let light_run = self.entries.iter().take_while(|entry| entry.is_light()).count();
        batches.lights.extend(self.entries.iter().take(light_run).cloned());

        for entry in self.entries.iter().skip(light_run) {
            if !entry.is_mesh() {
                batches.transparent.push(entry.clone());
                continue;
            }

            match Self::mesh_is_opaque(graph, entry) {
                Ok(true) => batches.opaque.push(entry.clone()),
                Ok(false) => batches.transparent.push(entry.clone()),
                Err(err) => match policy {
                    MalformedEntryPolicy::Reject => return Err(err),
                    MalformedEntryPolicy::Skip => {
                        log::warn!("Skipping render entry: {}", err);
                    }
                },
            }
        }

        log::trace!(
            "Classified {} entries: {} lights, {} opaque, {} transparent",
            self.entries.len(),
            batches.lights.len(),
            batches.opaque.len(),
            batches.transparent.len()
        );
        Ok(batches)
    }

    fn mesh_is_opaque(graph: &SceneGraph, entry: &RenderEntry) -> RenderResult<bool> {
        let node = graph.get(entry.node)?;
        let Some(mesh) = node.as_mesh() else {
            // The node changed kind since traversal; treat it like any other non-mesh
            return Ok(false);
        };
        let material_id = mesh.material.ok_or_else(|| RenderError::MissingMaterial {
            node: entry.node,
            name: node.name().to_string(),
        })?;
        let material = graph
            .material(material_id)
            .ok_or(SceneError::UnknownMaterial(material_id))?;

        Ok(material.is_opaque())
    }
}
