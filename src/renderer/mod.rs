//! Renderer: the deterministic rasterizer.
//!
//! Takes `ResolvedScene`s (in-memory, from the engine) and produces a
//! `PlayablePresentation` (serializable, for the player).
//!
//! The renderer is pure and stateless. Given the same input, it always
//! produces the same output. It knows nothing about machines or time beyond
//! the frame rate it records for playback.

use crate::types::{
    Cell, CellChange, Frame, Marker, PlayablePresentation, ResolvedScene, TerminalContract,
};

pub struct Renderer;

impl Renderer {
    /// Render a sequence of resolved scenes into a playable presentation.
    ///
    /// The first frame is always a full frame. Subsequent frames are diffs
    /// against the previous frame. Scene markers become presentation markers.
    pub fn render(
        scenes: &[ResolvedScene],
        contract: TerminalContract,
        frame_rate: f64,
    ) -> PlayablePresentation {
        let mut frames = Vec::with_capacity(scenes.len());
        let mut markers = Vec::new();
        let mut prev_grid: Option<Vec<Vec<Cell>>> = None;

        for (frame_index, scene) in scenes.iter().enumerate() {
            let grid = Self::rasterize(scene, &contract);
            let frame = match &prev_grid {
                None => Frame::Full {
                    cells: grid.clone(),
                },
                Some(prev) => Frame::Diff {
                    changes: Self::diff(prev, &grid),
                },
            };
            frames.push(frame);
            if let Some(label) = &scene.marker {
                markers.push(Marker {
                    frame_index,
                    label: label.clone(),
                });
            }
            prev_grid = Some(grid);
        }

        PlayablePresentation {
            contract,
            frame_rate,
            frames,
            markers,
        }
    }

    /// Rasterize a resolved scene onto a fixed-size cell grid.
    ///
    /// Draw operations are sorted by z-order so that higher z values
    /// paint over lower ones.
    pub(crate) fn rasterize(scene: &ResolvedScene, contract: &TerminalContract) -> Vec<Vec<Cell>> {
        let w = contract.width as usize;
        let h = contract.height as usize;
        let mut grid = vec![vec![Cell::default(); w]; h];

        let mut ops: Vec<_> = scene.ops.iter().collect();
        ops.sort_by_key(|op| op.z_order);

        for op in ops {
            let x = op.x as usize;
            let y = op.y as usize;
            if x < w && y < h {
                grid[y][x] = Cell {
                    ch: op.ch,
                    style: op.style.clone(),
                };
            }
        }

        grid
    }

    /// Compute a cell-level diff between two grids.
    fn diff(prev: &[Vec<Cell>], next: &[Vec<Cell>]) -> Vec<CellChange> {
        let mut changes = Vec::new();
        for (y, (prev_row, next_row)) in prev.iter().zip(next.iter()).enumerate() {
            for (x, (prev_cell, next_cell)) in prev_row.iter().zip(next_row.iter()).enumerate() {
                if prev_cell != next_cell {
                    changes.push(CellChange {
                        x: x as u16,
                        y: y as u16,
                        cell: next_cell.clone(),
                    });
                }
            }
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DrawOp, Style};

    fn op(x: u16, y: u16, ch: char, z_order: i32) -> DrawOp {
        DrawOp {
            x,
            y,
            ch,
            style: Style::default(),
            z_order,
        }
    }

    fn scene(ops: Vec<DrawOp>, marker: Option<&str>) -> ResolvedScene {
        ResolvedScene {
            width: 3,
            height: 2,
            ops,
            marker: marker.map(str::to_string),
        }
    }

    fn contract() -> TerminalContract {
        TerminalContract {
            width: 3,
            height: 2,
        }
    }

    #[test]
    fn higher_z_wins_regardless_of_op_order() {
        let ops = vec![op(1, 1, 'b', 5), op(1, 1, 'a', 2)];
        let grid = Renderer::rasterize(&scene(ops, None), &contract());
        assert_eq!(grid[1][1].ch, 'b');
    }

    #[test]
    fn first_frame_full_then_diffs_and_markers_carry_over() {
        let scenes = [
            scene(vec![op(0, 0, 'x', 0)], None),
            scene(vec![op(0, 0, 'x', 0), op(2, 1, 'o', 1)], Some("start")),
            scene(vec![op(0, 0, 'x', 0), op(2, 1, 'o', 1)], None),
        ];
        let presentation = Renderer::render(&scenes, contract(), 24.0);

        assert_eq!(presentation.frame_rate, 24.0);
        assert!(matches!(presentation.frames[0], Frame::Full { .. }));
        let Frame::Diff { changes } = &presentation.frames[1] else {
            panic!("second frame should be a diff");
        };
        assert_eq!(changes.len(), 1);
        assert_eq!((changes[0].x, changes[0].y, changes[0].cell.ch), (2, 1, 'o'));
        let Frame::Diff { changes } = &presentation.frames[2] else {
            panic!("third frame should be a diff");
        };
        assert!(changes.is_empty());
        assert_eq!(
            presentation.markers,
            vec![Marker {
                frame_index: 1,
                label: "start".into(),
            }]
        );
    }
}
