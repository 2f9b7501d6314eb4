//! Render backend abstraction
//!
//! A backend consumes [`DrawCommand`]s in submission order. The scene is
//! passed alongside each command so a backend can look up light parameters,
//! materials or geometry by handle.

use crate::scene::SceneGraph;
use super::{DrawCommand, RenderResult};

/// Receiver of draw commands
pub trait RenderBackend {
    /// Execute (or record) one command
    fn submit(&mut self, graph: &SceneGraph, command: DrawCommand) -> RenderResult<()>;
}

/// In-memory backend that records every command it receives
#[derive(Debug, Default, Clone)]
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands received so far
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of recorded commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of commands that issue a draw
    pub fn draw_count(&self) -> usize {
        self.commands.iter().filter(|command| command.is_draw()).count()
    }

    /// Forget everything recorded
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Take the recorded commands, leaving the recorder empty
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl RenderBackend for CommandRecorder {
    fn submit(&mut self, _graph: &SceneGraph, command: DrawCommand) -> RenderResult<()> {
        self.commands.push(command);
        Ok(())
    }
}
