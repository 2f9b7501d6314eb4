//! Classified render batches and their submission order

use crate::core::config::{RenderConfig, TransparentOrder};
use crate::foundation::math::{Mat4, Mat4Ext};
use crate::scene::SceneGraph;
use super::{DrawCommand, RenderBackend, RenderEntry, RenderResult};

/// The three disjoint batches of one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderBatches {
    /// Lights, most recently inserted first
    pub lights: Vec<RenderEntry>,
    /// Meshes with a fully opaque material, in traversal order
    pub opaque: Vec<RenderEntry>,
    /// Everything else, in traversal order
    pub transparent: Vec<RenderEntry>,
}

/// Counters reported by [`RenderBatches::submit`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitStats {
    /// Lights enabled and drawn
    pub lights_activated: usize,
    /// Light entries not drawn: past the active-light cap, or no longer a light
    pub lights_skipped: usize,
    /// Opaque draws issued
    pub opaque_drawn: usize,
    /// Blended draws issued
    pub transparent_drawn: usize,
}

impl SubmitStats {
    /// Total draws issued
    pub fn draws(&self) -> usize {
        self.lights_activated + self.opaque_drawn + self.transparent_drawn
    }
}

impl RenderBatches {
    /// Number of entries across all batches
    pub fn total(&self) -> usize {
        self.lights.len() + self.opaque.len() + self.transparent.len()
    }

    /// Whether there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Lower the batches into backend commands
    ///
    /// Lights go first: each of the first `max_active_lights` is enabled and
    /// drawn at `view * world`, the rest are skipped. Opaque meshes follow
    /// without blending. Transparent entries come last, each one wrapped in
    /// its own enable/disable blend pair.
    pub fn submit(
        &self,
        graph: &SceneGraph,
        view: &Mat4,
        config: &RenderConfig,
        backend: &mut dyn RenderBackend,
    ) -> RenderResult<SubmitStats> {
        let mut stats = SubmitStats::default();
        let max_active = config.max_active_lights as usize;

        for entry in &self.lights {
            if stats.lights_activated >= max_active {
                stats.lights_skipped += 1;
                continue;
            }
            let node = graph.get(entry.node)?;
            let Some(light) = node.as_light() else {
                log::warn!("Light entry '{}' no longer refers to a light", node.name());
                stats.lights_skipped += 1;
                continue;
            };

            backend.submit(graph, DrawCommand::EnableLight { light_id: light.light_id() })?;
            backend.submit(graph, DrawCommand::DrawLight { node: entry.node, model_view: view * entry.transform })?;
            stats.lights_activated += 1;
        }
        if stats.lights_skipped > 0 {
            log::debug!(
                "Skipped {} light entries (active limit {})",
                stats.lights_skipped,
                max_active
            );
        }

        for entry in &self.opaque {
            backend.submit(graph, Self::draw_command(graph, entry, view)?)?;
            stats.opaque_drawn += 1;
        }

        let mut transparent: Vec<(&RenderEntry, Mat4)> = self
            .transparent
            .iter()
            .map(|entry| (entry, view * entry.transform))
            .collect();
        if config.transparent_order == TransparentOrder::BackToFront {
            // The camera looks down -Z, so the most negative depth is farthest away
            transparent.sort_by(|a, b| a.1.translation_part().z.total_cmp(&b.1.translation_part().z));
        }

        for (entry, _) in transparent {
            // Blend must be off again whenever this loop returns
            let command = Self::draw_command(graph, entry, view)?;
            backend.submit(graph, DrawCommand::EnableBlend)?;
            let drawn = backend.submit(graph, command);
            backend.submit(graph, DrawCommand::DisableBlend)?;
            drawn?;
            stats.transparent_drawn += 1;
        }

        log::trace!(
            "Submitted {} lights, {} opaque, {} transparent",
            stats.lights_activated,
            stats.opaque_drawn,
            stats.transparent_drawn
        );
        Ok(stats)
    }

    fn draw_command(graph: &SceneGraph, entry: &RenderEntry, view: &Mat4) -> RenderResult<DrawCommand> {
        let node = graph.get(entry.node)?;
        let model_view = view * entry.transform;

        Ok(match node.as_mesh() {
            Some(mesh) => DrawCommand::DrawMesh { node: entry.node, material: mesh.material, model_view },
            None => DrawCommand::DrawNode { node: entry.node, model_view },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{MalformedEntryPolicy, SceneConfig};
    use crate::foundation::math::Vec3;
    use crate::render::{CommandRecorder, RenderError, RenderList};
    use crate::scene::{DrawableKind, Light, Material, Mesh, NodeId, SceneError};
    use approx::assert_relative_eq;

    fn batches_for(graph: &SceneGraph, root: NodeId) -> RenderBatches {
        let mut list = RenderList::new();
        list.pass(graph, Some(root), &Mat4::identity()).unwrap();
        list.classify(graph, MalformedEntryPolicy::Reject).unwrap()
    }

    fn mesh(graph: &mut SceneGraph, parent: NodeId, name: &str, transparency: f32, local: Mat4) -> NodeId {
        let material = graph.add_material(Material::new(name).with_transparency(transparency));
        let node = graph.create_mesh(name, local, Mesh::new(Some(material))).unwrap();
        graph.add_child(parent, node).unwrap();
        node
    }

    #[test]
    fn test_submission_order() {
        let mut graph = SceneGraph::new();
        let root = graph.create_group("root", Mat4::identity());
        let light = graph.create_light("sun", Mat4::identity(), Light::directional(-Vec3::y())).unwrap();
        graph.add_child(root, light).unwrap();
        let wood = mesh(&mut graph, root, "wood", 1.0, Mat4::identity());
        let glass = mesh(&mut graph, root, "glass", 0.5, Mat4::identity());

        let batches = batches_for(&graph, root);
        let mut recorder = CommandRecorder::new();
        let stats = batches
            .submit(&graph, &Mat4::identity(), &RenderConfig::default(), &mut recorder)
            .unwrap();

        let wood_material = graph.get(wood).unwrap().as_mesh().unwrap().material;
        let glass_material = graph.get(glass).unwrap().as_mesh().unwrap().material;
        let identity = Mat4::identity();
        assert_eq!(
            recorder.commands(),
            &[
                DrawCommand::EnableLight { light_id: 0 },
                DrawCommand::DrawLight { node: light, model_view: identity },
                DrawCommand::DrawMesh { node: wood, material: wood_material, model_view: identity },
                DrawCommand::EnableBlend,
                DrawCommand::DrawNode { node: root, model_view: identity },
                DrawCommand::DisableBlend,
                DrawCommand::EnableBlend,
                DrawCommand::DrawMesh { node: glass, material: glass_material, model_view: identity },
                DrawCommand::DisableBlend,
            ]
        );
        assert_eq!(stats, SubmitStats { lights_activated: 1, lights_skipped: 0, opaque_drawn: 1, transparent_drawn: 2 });
        assert_eq!(stats.draws(), recorder.draw_count());
    }

    #[test]
    fn test_active_lights_are_capped() {
        let mut graph = SceneGraph::with_config(&SceneConfig { max_lights: 16, ..SceneConfig::default() });
        let root = graph.create_group("root", Mat4::identity());
        for i in 0..10 {
            let light = graph.create_light(format!("l{i}"), Mat4::identity(), Light::omnidirectional()).unwrap();
            graph.add_child(root, light).unwrap();
        }

        let batches = batches_for(&graph, root);
        assert_eq!(batches.lights.len(), 10);

        let mut recorder = CommandRecorder::new();
        let stats = batches
            .submit(&graph, &Mat4::identity(), &RenderConfig::default(), &mut recorder)
            .unwrap();
        assert_eq!(stats.lights_activated, 8);
        assert_eq!(stats.lights_skipped, 2);

        // Front-loading reverses the lights, so the last slots are enabled first
        let enabled: Vec<u32> = recorder
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::EnableLight { light_id } => Some(*light_id),
                _ => None,
            })
            .collect();
        assert_eq!(enabled, vec![9, 8, 7, 6, 5, 4, 3, 2]);

        let config = RenderConfig::default().with_max_active_lights(3);
        recorder.clear();
        let stats = batches.submit(&graph, &Mat4::identity(), &config, &mut recorder).unwrap();
        assert_eq!(stats.lights_activated, 3);
    }

    #[test]
    fn test_view_is_applied_on_the_left() {
        let mut graph = SceneGraph::new();
        let root = graph.create_group("root", Mat4::identity());
        let local = Mat4::translation(1.0, 0.0, 0.0);
        let node = mesh(&mut graph, root, "m", 1.0, local);
        let view = Mat4::translation(0.0, 0.0, -5.0) * Mat4::rotation_y(0.25);

        let batches = batches_for(&graph, root);
        let mut recorder = CommandRecorder::new();
        batches.submit(&graph, &view, &RenderConfig::default(), &mut recorder).unwrap();

        let command = recorder
            .commands()
            .iter()
            .find(|command| command.node() == Some(node))
            .unwrap();
        assert_relative_eq!(*command.model_view().unwrap(), view * local);
    }

    #[test]
    fn test_back_to_front_sorts_only_when_configured() {
        let mut graph = SceneGraph::new();
        let root = graph.create_group("root", Mat4::translation(0.0, 0.0, -1.0));
        let near = mesh(&mut graph, root, "near", 0.5, Mat4::translation(0.0, 0.0, 0.5));
        let far = mesh(&mut graph, root, "far", 0.5, Mat4::translation(0.0, 0.0, -10.0));
        let batches = batches_for(&graph, root);

        let drawn = |config: &RenderConfig| {
            let mut recorder = CommandRecorder::new();
            batches.submit(&graph, &Mat4::identity(), config, &mut recorder).unwrap();
            recorder.commands().iter().filter_map(DrawCommand::node).collect::<Vec<_>>()
        };

        assert_eq!(drawn(&RenderConfig::default()), vec![root, near, far]);
        let sorted = RenderConfig::default().with_transparent_order(TransparentOrder::BackToFront);
        assert_eq!(drawn(&sorted), vec![far, root, near]);
    }

    #[test]
    fn test_every_transparent_draw_is_wrapped_in_blend() {
        let mut graph = SceneGraph::new();
        let root = graph.create_group("root", Mat4::identity());
        for i in 0..4 {
            mesh(&mut graph, root, &format!("glass{i}"), 0.25, Mat4::identity());
        }
        let batches = batches_for(&graph, root);
        let mut recorder = CommandRecorder::new();
        batches.submit(&graph, &Mat4::identity(), &RenderConfig::default(), &mut recorder).unwrap();

        for triple in recorder.commands().chunks(3) {
            assert_eq!(triple[0], DrawCommand::EnableBlend);
            assert!(triple[1].is_draw());
            assert_eq!(triple[2], DrawCommand::DisableBlend);
        }
        assert_eq!(recorder.len(), 3 * batches.transparent.len());
    }

    /// Records commands and rejects every mesh draw
    #[derive(Default)]
    struct RejectingBackend {
        commands: Vec<DrawCommand>,
    }

    impl RenderBackend for RejectingBackend {
        fn submit(&mut self, _graph: &SceneGraph, command: DrawCommand) -> RenderResult<()> {
            let reject = matches!(command, DrawCommand::DrawMesh { .. });
            self.commands.push(command);
            if reject {
                Err(RenderError::Backend("device lost".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn blend_balance(commands: &[DrawCommand]) -> (usize, usize) {
        let enabled = commands.iter().filter(|c| **c == DrawCommand::EnableBlend).count();
        let disabled = commands.iter().filter(|c| **c == DrawCommand::DisableBlend).count();
        (enabled, disabled)
    }

    #[test]
    fn test_rejected_draw_still_disables_blend() {
        let mut graph = SceneGraph::new();
        let root = graph.create_group("root", Mat4::identity());
        mesh(&mut graph, root, "glass", 0.5, Mat4::identity());
        let batches = batches_for(&graph, root);

        let mut backend = RejectingBackend::default();
        let result = batches.submit(&graph, &Mat4::identity(), &RenderConfig::default(), &mut backend);

        assert_eq!(result, Err(RenderError::Backend("device lost".to_string())));
        assert_eq!(backend.commands.last(), Some(&DrawCommand::DisableBlend));
        let (enabled, disabled) = blend_balance(&backend.commands);
        assert_eq!(enabled, disabled);
    }

    #[test]
    fn test_stale_transparent_entry_does_not_leave_blend_on() {
        let mut graph = SceneGraph::new();
        let root = graph.create_group("root", Mat4::identity());
        let glass = mesh(&mut graph, root, "glass", 0.5, Mat4::identity());
        let batches = batches_for(&graph, root);
        graph.destroy(glass).unwrap();

        let mut recorder = CommandRecorder::new();
        let result = batches.submit(&graph, &Mat4::identity(), &RenderConfig::default(), &mut recorder);

        assert_eq!(result, Err(RenderError::Scene(SceneError::UnknownNode(glass))));
        assert_eq!(recorder.commands().last(), Some(&DrawCommand::DisableBlend));
        let (enabled, disabled) = blend_balance(recorder.commands());
        assert_eq!(enabled, disabled);
    }

    #[test]
    fn test_light_entry_that_is_not_a_light_counts_as_skipped() {
        let mut graph = SceneGraph::new();
        let group = graph.create_group("was_a_light", Mat4::identity());
        let batches = RenderBatches {
            lights: vec![RenderEntry::new(group, DrawableKind::Light, Mat4::identity())],
            ..RenderBatches::default()
        };

        let mut recorder = CommandRecorder::new();
        let stats = batches
            .submit(&graph, &Mat4::identity(), &RenderConfig::default(), &mut recorder)
            .unwrap();

        assert_eq!(stats.lights_activated, 0);
        assert_eq!(stats.lights_skipped, 1);
        assert!(recorder.is_empty());
    }
}
