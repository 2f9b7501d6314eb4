//! Fixed-size grid of scene nodes
//!
//! Maps board coordinates to cell nodes (one square of a chessboard, for
//! example). Pieces are attached as children of a cell node, so clearing a
//! cell detaches its children rather than destroying them.

use super::{NodeId, SceneError, SceneGraph, SceneResult};

/// Number of rows and columns of a [`NodeGrid`]
pub const GRID_SIZE: usize = 8;

/// 8x8 grid of optional cell nodes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeGrid {
    cells: [[Option<NodeId>; GRID_SIZE]; GRID_SIZE],
}

impl NodeGrid {
    /// Create an empty grid
    pub fn new() -> Self {
        Self::default()
    }

    fn check(row: usize, col: usize) -> SceneResult<()> {
        if row < GRID_SIZE && col < GRID_SIZE {
            Ok(())
        } else {
            Err(SceneError::OutOfRange { row, col })
        }
    }

    /// Place a node in a cell, replacing any previous one
    pub fn set(&mut self, row: usize, col: usize, node: NodeId) -> SceneResult<Option<NodeId>> {
        Self::check(row, col)?;
        Ok(self.cells[row][col].replace(node))
    }

    /// Node stored in a cell
    pub fn get(&self, row: usize, col: usize) -> SceneResult<Option<NodeId>> {
        Self::check(row, col)?;
        Ok(self.cells[row][col])
    }

    /// Node stored in a cell that must be filled
    pub fn cell(&self, row: usize, col: usize) -> SceneResult<NodeId> {
        self.get(row, col)?.ok_or(SceneError::EmptyCell { row, col })
    }

    /// Detach everything attached to a cell's node
    pub fn clear_cell(&self, graph: &mut SceneGraph, row: usize, col: usize) -> SceneResult<()> {
        if let Some(cell) = self.get(row, col)? {
            graph.remove_all_children(cell)?;
        }
        Ok(())
    }

    /// Detach the children of every cell node
    pub fn clear_all(&self, graph: &mut SceneGraph) -> SceneResult<()> {
        for cell in self.cells.iter().flatten().flatten() {
            graph.remove_all_children(*cell)?;
        }
        Ok(())
    }

    /// Cells whose node currently has at least one child
    pub fn occupied(&self, graph: &SceneGraph) -> Vec<(usize, usize)> {
        let mut occupied = Vec::new();
        for (row, cells) in self.cells.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if cell.is_some_and(|id| graph.child_count(id) > 0) {
                    occupied.push((row, col));
                }
            }
        }
        occupied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Mat4;

    #[test]
    fn test_out_of_range_is_rejected() {
        let mut graph = SceneGraph::new();
        let node = graph.create_group("cell", Mat4::identity());
        let mut grid = NodeGrid::new();

        assert_eq!(grid.set(8, 0, node), Err(SceneError::OutOfRange { row: 8, col: 0 }));
        assert_eq!(grid.get(0, 9), Err(SceneError::OutOfRange { row: 0, col: 9 }));
        assert!(grid.clear_cell(&mut graph, 10, 10).is_err());
    }

    #[test]
    fn test_empty_cell_is_not_out_of_range() {
        let mut graph = SceneGraph::new();
        let node = graph.create_group("d4", Mat4::identity());
        let mut grid = NodeGrid::new();
        grid.set(3, 3, node).unwrap();

        assert_eq!(grid.cell(3, 3), Ok(node));
        assert_eq!(grid.cell(3, 4), Err(SceneError::EmptyCell { row: 3, col: 4 }));
        assert_eq!(grid.cell(3, 8), Err(SceneError::OutOfRange { row: 3, col: 8 }));
    }

    #[test]
    fn test_clear_cell_detaches_pieces() {
        let mut graph = SceneGraph::new();
        let cell = graph.create_group("e2", Mat4::identity());
        let pawn = graph.create_group("pawn", Mat4::identity());
        graph.add_child(cell, pawn).unwrap();

        let mut grid = NodeGrid::new();
        assert_eq!(grid.set(1, 4, cell).unwrap(), None);
        assert_eq!(grid.get(1, 4).unwrap(), Some(cell));
        assert_eq!(grid.occupied(&graph), vec![(1, 4)]);

        grid.clear_cell(&mut graph, 1, 4).unwrap();
        assert_eq!(graph.child_count(cell), 0);
        assert_eq!(graph.parent(pawn), None);
        assert!(grid.occupied(&graph).is_empty());
    }

    #[test]
    fn test_clear_all() {
        let mut graph = SceneGraph::new();
        let mut grid = NodeGrid::new();
        for row in 0..GRID_SIZE {
            let cell = graph.create_group(format!("cell{row}"), Mat4::identity());
            let piece = graph.create_group("piece", Mat4::identity());
            graph.add_child(cell, piece).unwrap();
            grid.set(row, row, cell).unwrap();
        }

        assert_eq!(grid.occupied(&graph).len(), GRID_SIZE);
        grid.clear_all(&mut graph).unwrap();
        assert!(grid.occupied(&graph).is_empty());
    }
}
