//! Chessboard scene
//!
//! Every square is a slab mesh stored in a [`NodeGrid`]; pieces hang off the
//! square they stand on, so moving a piece is a reparent.

use scene_engine::foundation::math::{Mat4, Mat4Ext};
use scene_engine::scene::{
    Material, MaterialId, Mesh, MeshGeometry, NodeGrid, NodeId, SceneGraph, SceneResult, GRID_SIZE,
};

/// Thickness of a board square
const SQUARE_HEIGHT: f32 = 0.1;

/// Piece types, used only for naming and piece height
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceKind {
    fn name(self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Rook => "rook",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    fn height(self) -> f32 {
        match self {
            Self::Pawn => 0.5,
            Self::Rook | Self::Knight | Self::Bishop => 0.8,
            Self::Queen => 1.0,
            Self::King => 1.1,
        }
    }
}

/// Which player owns a piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    White,
    Black,
}

const BACK_RANK: [PieceKind; GRID_SIZE] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Board nodes and the materials shared by its pieces
pub struct Board {
    /// Group holding every square and the selection marker
    pub root: NodeId,
    /// Square nodes by (row, column); row 0 is White's back rank
    pub grid: NodeGrid,
    marker: NodeId,
    white: MaterialId,
    black: MaterialId,
}

/// Geometry of a unit cube squashed to `height`
fn slab(edge: f32, height: f32) -> MeshGeometry {
    let mut geometry = MeshGeometry::cube(edge);
    for vertex in &mut geometry.vertices {
        vertex.y *= height / edge;
    }
    geometry
}

fn square_name(row: usize, col: usize) -> String {
    // col < 8, so the cast cannot truncate
    format!("{}{}", char::from(b'a' + col as u8), row + 1)
}

/// Position of a square's center relative to the board
fn square_position(row: usize, col: usize) -> Mat4 {
    let half = (GRID_SIZE as f32 - 1.0) * 0.5;
    Mat4::translation(col as f32 - half, 0.0, half - row as f32)
}

impl Board {
    /// Create the board group, its 64 squares and a hidden selection marker
    pub fn build(scene: &mut SceneGraph) -> SceneResult<Self> {
        let root = scene.create_group("board", Mat4::identity());

        let light_square = scene.add_material(Material::new("light_square").with_diffuse(0.9, 0.85, 0.7));
        let dark_square = scene.add_material(Material::new("dark_square").with_diffuse(0.35, 0.25, 0.15));
        let white = scene.add_material(
            Material::new("white_piece")
                .with_diffuse(0.95, 0.95, 0.9)
                .with_specular(0.6, 0.6, 0.6, 32.0),
        );
        let black = scene.add_material(
            Material::new("black_piece")
                .with_diffuse(0.1, 0.1, 0.12)
                .with_specular(0.6, 0.6, 0.6, 32.0),
        );
        let highlight = scene.add_material(
            Material::new("selection")
                .with_emission(0.2, 0.6, 0.2)
                .with_transparency(0.4),
        );

        let mut grid = NodeGrid::new();
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let material = if (row + col) % 2 == 0 { dark_square } else { light_square };
                let square = scene.create_mesh(
                    square_name(row, col),
                    square_position(row, col),
                    Mesh::with_geometry(Some(material), slab(1.0, SQUARE_HEIGHT)),
                )?;
                scene.add_child(root, square)?;
                grid.set(row, col, square)?;
            }
        }

        let marker = scene.create_mesh(
            "selection",
            Mat4::identity(),
            Mesh::with_geometry(Some(highlight), slab(1.0, 0.02)),
        )?;

        log::debug!("Built board with {} squares", GRID_SIZE * GRID_SIZE);
        Ok(Self { root, grid, marker, white, black })
    }

    /// Put a new piece on a square
    pub fn place(&self, scene: &mut SceneGraph, kind: PieceKind, side: Side, row: usize, col: usize) -> SceneResult<NodeId> {
        let square = self.square(row, col)?;
        let material = match side {
            Side::White => self.white,
            Side::Black => self.black,
        };
        let name = format!("{:?}_{}", side, kind.name()).to_lowercase();
        let piece = scene.create_mesh(
            name,
            Mat4::translation(0.0, SQUARE_HEIGHT, 0.0),
            Mesh::with_geometry(Some(material), slab(0.6, kind.height())),
        )?;
        scene.add_child(square, piece)?;
        Ok(piece)
    }

    /// Set up the opening position and return the number of pieces placed
    pub fn setup(&self, scene: &mut SceneGraph) -> SceneResult<usize> {
        self.grid.clear_all(scene)?;

        let mut placed = 0;
        for (col, kind) in BACK_RANK.iter().enumerate() {
            self.place(scene, *kind, Side::White, 0, col)?;
            self.place(scene, PieceKind::Pawn, Side::White, 1, col)?;
            self.place(scene, PieceKind::Pawn, Side::Black, GRID_SIZE - 2, col)?;
            self.place(scene, *kind, Side::Black, GRID_SIZE - 1, col)?;
            placed += 4;
        }
        Ok(placed)
    }

    /// Move the selection marker over a square
    pub fn select(&self, scene: &mut SceneGraph, row: usize, col: usize) -> SceneResult<()> {
        self.square(row, col)?;
        if scene.parent(self.marker).is_none() {
            scene.add_child(self.root, self.marker)?;
        }
        let lift = Mat4::translation(0.0, SQUARE_HEIGHT + 0.01, 0.0);
        scene.set_local_transform(self.marker, square_position(row, col) * lift)
    }

    /// Move whatever stands on `from` onto `to`, removing anything captured
    ///
    /// Returns the number of captured nodes.
    pub fn move_piece(&self, scene: &mut SceneGraph, from: (usize, usize), to: (usize, usize)) -> SceneResult<usize> {
        let source = self.square(from.0, from.1)?;
        let target = self.square(to.0, to.1)?;

        let mut captured = 0;
        for piece in scene.children(target).to_vec() {
            captured += scene.destroy(piece)?;
        }
        for piece in scene.children(source).to_vec() {
            scene.add_child(target, piece)?;
        }

        log::debug!(
            "Moved {} -> {}, captured {}",
            square_name(from.0, from.1),
            square_name(to.0, to.1),
            captured
        );
        Ok(captured)
    }

    fn square(&self, row: usize, col: usize) -> SceneResult<NodeId> {
        self.grid.cell(row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_engine::scene::SceneError;

    #[test]
    fn test_board_has_every_square() {
        let mut scene = SceneGraph::new();
        let board = Board::build(&mut scene).unwrap();

        assert_eq!(scene.child_count(board.root), GRID_SIZE * GRID_SIZE);
        let e2 = board.grid.get(1, 4).unwrap().unwrap();
        assert_eq!(scene.get(e2).unwrap().name(), "e2");
        assert!(board.grid.occupied(&scene).is_empty());
    }

    #[test]
    fn test_setup_fills_four_ranks() {
        let mut scene = SceneGraph::new();
        let board = Board::build(&mut scene).unwrap();

        assert_eq!(board.setup(&mut scene).unwrap(), 32);
        let occupied = board.grid.occupied(&scene);
        assert_eq!(occupied.len(), 32);
        assert!(occupied.iter().all(|&(row, _)| row <= 1 || row >= GRID_SIZE - 2));
    }

    #[test]
    fn test_move_and_capture() {
        let mut scene = SceneGraph::new();
        let board = Board::build(&mut scene).unwrap();
        board.setup(&mut scene).unwrap();

        assert_eq!(board.move_piece(&mut scene, (1, 4), (3, 4)).unwrap(), 0);
        assert_eq!(board.move_piece(&mut scene, (6, 3), (3, 4)).unwrap(), 1);
        assert_eq!(board.grid.occupied(&scene).len(), 31);
    }

    #[test]
    fn test_selection_marker_is_translucent_and_off_grid() {
        let mut scene = SceneGraph::new();
        let board = Board::build(&mut scene).unwrap();

        board.select(&mut scene, 2, 2).unwrap();
        board.select(&mut scene, 3, 3).unwrap();
        assert_eq!(scene.child_count(board.root), GRID_SIZE * GRID_SIZE + 1);
        assert!(board.grid.occupied(&scene).is_empty());

        let marker = scene.find_by_name(board.root, "selection");
        assert_eq!(marker.len(), 1);
        let material = scene.get(marker[0]).unwrap().as_mesh().unwrap().material.unwrap();
        assert!(!scene.material(material).unwrap().is_opaque());
        assert!(matches!(
            board.select(&mut scene, 8, 0),
            Err(SceneError::OutOfRange { row: 8, col: 0 })
        ));
    }
}
