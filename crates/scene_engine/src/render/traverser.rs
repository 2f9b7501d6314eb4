//! Scene traversal
//!
//! Walks a subtree in pre-order (node, then each child subtree in child-list
//! order) and emits one [`RenderEntry`] per non-camera node. The accumulated
//! transform is composed as `accumulated * local`, so a child's entry carries
//! `parent_world * child_local`.

use crate::core::config::DEFAULT_MAX_DEPTH;
use crate::foundation::math::Mat4;
use crate::scene::{NodeId, SceneGraph};
use super::{RenderEntry, RenderError, RenderResult};

/// Depth-bounded pre-order walker
#[derive(Debug, Clone, Copy)]
pub struct SceneTraverser {
    max_depth: usize,
}

impl SceneTraverser {
    /// Create a traverser that refuses trees deeper than `max_depth`
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Traverser using the scene's own depth limit
    pub fn for_scene(graph: &SceneGraph) -> Self {
        Self::new(graph.max_depth())
    }

    /// Depth limit
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Collect the entries of a subtree in traversal order
    ///
    /// A `None` root yields no entries.
    pub fn traverse(&self, graph: &SceneGraph, root: Option<NodeId>, initial: &Mat4) -> RenderResult<Vec<RenderEntry>> {
        let mut entries = Vec::new();
        self.visit(graph, root, initial, |entry| entries.push(entry))?;
        Ok(entries)
    }

    /// Walk a subtree and hand every entry to `sink` in traversal order
    ///
    /// Uses an explicit stack so very deep trees do not exhaust the call stack.
    pub fn visit<F>(&self, graph: &SceneGraph, root: Option<NodeId>, initial: &Mat4, mut sink: F) -> RenderResult<()>
    where
        F: FnMut(RenderEntry),
    {
        let Some(root) = root else {
            return Ok(());
        };

        // (node, transform accumulated above it, depth)
        let mut stack: Vec<(NodeId, Mat4, usize)> = vec![(root, *initial, 0)];
        let mut visited = 0usize;

        while let Some((id, accumulated, depth)) = stack.pop() {
            if depth > self.max_depth {
                return Err(RenderError::DepthLimitExceeded { node: id, limit: self.max_depth });
            }

            let node = graph.get(id)?;
            let world = accumulated * node.local_transform();

            if let Some(kind) = node.kind().drawable() {
                sink(RenderEntry::new(id, kind, world));
            }
            visited += 1;

            // Reverse so the first child is popped first
            stack.extend(node.children().iter().rev().map(|&child| (child, world, depth + 1)));
        }

        log::trace!("Traversal visited {} nodes", visited);
        Ok(())
    }
}

impl Default for SceneTraverser {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4Ext, Vec3};
    use crate::scene::{Camera, DrawableKind, Light, Material, Mesh, SceneError};
    use approx::assert_relative_eq;

    #[test]
    fn test_none_root_yields_nothing() {
        let graph = SceneGraph::new();
        let entries = SceneTraverser::default().traverse(&graph, None, &Mat4::identity()).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_group_is_an_entry_and_transforms_compose() {
        let mut graph = SceneGraph::new();
        let material = graph.add_material(Material::new("solid"));
        let root = graph.create_group("root", Mat4::identity());
        let group_local = Mat4::translation(0.0, 2.0, 0.0) * Mat4::rotation_y(0.5);
        let mesh_local = Mat4::translation(1.0, 0.0, 0.0);
        let group = graph.create_group("group", group_local);
        let mesh = graph.create_mesh("mesh_d", mesh_local, Mesh::new(Some(material))).unwrap();
        graph.add_child(root, group).unwrap();
        graph.add_child(group, mesh).unwrap();

        let entries = SceneTraverser::default().traverse(&graph, Some(root), &Mat4::identity()).unwrap();

        let nodes: Vec<_> = entries.iter().map(|e| e.node).collect();
        assert_eq!(nodes, vec![root, group, mesh]);
        assert_eq!(entries[1].kind, DrawableKind::Group);
        assert_relative_eq!(entries[2].transform, group_local * mesh_local);
    }

    #[test]
    fn test_initial_transform_is_applied_on_the_left() {
        let mut graph = SceneGraph::new();
        let local = Mat4::rotation_x(0.3);
        let root = graph.create_group("root", local);
        let initial = Mat4::translation(0.0, 0.0, -3.0);

        let entries = SceneTraverser::default().traverse(&graph, Some(root), &initial).unwrap();
        assert_relative_eq!(entries[0].transform, initial * local);
    }

    #[test]
    fn test_cameras_are_skipped_but_their_children_are_not() {
        let mut graph = SceneGraph::new();
        let root = graph.create_group("root", Mat4::identity());
        let camera = graph.create_camera(
            "camera",
            Mat4::translation(0.0, 0.0, 4.0),
            Camera::perspective(640, 480, 0.1, 50.0, 60.0),
        );
        let headlight = graph.create_light("headlight", Mat4::identity(), Light::spot(-Vec3::z(), 25.0)).unwrap();
        graph.add_child(root, camera).unwrap();
        graph.add_child(camera, headlight).unwrap();

        let entries = SceneTraverser::default().traverse(&graph, Some(root), &Mat4::identity()).unwrap();

        let nodes: Vec<_> = entries.iter().map(|e| e.node).collect();
        assert_eq!(nodes, vec![root, headlight]);
        assert_relative_eq!(entries[1].transform, Mat4::translation(0.0, 0.0, 4.0));
    }

    #[test]
    fn test_one_entry_per_non_camera_node() {
        let mut graph = SceneGraph::new();
        let root = graph.create_group("root", Mat4::identity());
        let mut cameras = 0;
        let mut total = 1;
        let mut parents = vec![root];
        for i in 0..30 {
            let parent = parents[i % parents.len()];
            let node = if i % 4 == 0 {
                cameras += 1;
                graph.create_camera(format!("cam{i}"), Mat4::identity(), Camera::orthographic(10, 10))
            } else {
                graph.create_mesh(format!("mesh{i}"), Mat4::identity(), Mesh::new(None)).unwrap()
            };
            graph.add_child(parent, node).unwrap();
            parents.push(node);
            total += 1;
        }

        let entries = SceneTraverser::default().traverse(&graph, Some(root), &Mat4::identity()).unwrap();
        assert_eq!(entries.len(), total - cameras);
        assert!(entries.iter().all(|e| !graph.get(e.node).unwrap().is_camera()));
    }

    #[test]
    fn test_preorder_follows_child_order() {
        let mut graph = SceneGraph::new();
        let root = graph.create_group("root", Mat4::identity());
        let a = graph.create_group("a", Mat4::identity());
        let a1 = graph.create_group("a1", Mat4::identity());
        let b = graph.create_group("b", Mat4::identity());
        graph.add_child(root, a).unwrap();
        graph.add_child(root, b).unwrap();
        graph.add_child(a, a1).unwrap();

        let entries = SceneTraverser::default().traverse(&graph, Some(root), &Mat4::identity()).unwrap();
        let nodes: Vec<_> = entries.iter().map(|e| e.node).collect();
        assert_eq!(nodes, vec![root, a, a1, b]);
    }

    #[test]
    fn test_depth_limit_and_unknown_root() {
        let mut graph = SceneGraph::new();
        let root = graph.create_group("root", Mat4::identity());
        let mut chain = vec![root];
        for i in 0..4 {
            let node = graph.create_group(format!("n{i}"), Mat4::identity());
            graph.add_child(chain[chain.len() - 1], node).unwrap();
            chain.push(node);
        }

        // The first node past the limit is reported, not the traversal root
        let result = SceneTraverser::new(2).traverse(&graph, Some(root), &Mat4::identity());
        assert_eq!(result, Err(RenderError::DepthLimitExceeded { node: chain[3], limit: 2 }));

        graph.destroy(root).unwrap();
        let result = SceneTraverser::default().traverse(&graph, Some(root), &Mat4::identity());
        assert_eq!(result, Err(RenderError::Scene(SceneError::UnknownNode(root))));
    }
}
