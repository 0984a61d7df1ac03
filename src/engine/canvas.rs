//! A `Graphics` that paints onto a character grid.
//!
//! Machine pixels are mapped to cells through the current transform and the
//! configured cell size. Every primitive gets its own z-order, increasing in
//! draw order, so the renderer's sort reproduces painter's order.

use glam::DVec2;

use crate::config::CanvasConfig;
use crate::graphics::{Fill, Graphics, PLACEHOLDER, Pen, point_in_polygon};
use crate::types::{DrawOp, ResolvedScene, Style};

const SOLID: char = '█';
const IMAGE: char = '▒';

pub struct CellCanvas {
    width: u16,
    height: u16,
    cell: DVec2,
    offset: DVec2,
    factor: f64,
    stack: Vec<(DVec2, f64)>,
    ops: Vec<DrawOp>,
    next_z: i32,
}

impl CellCanvas {
    pub fn new(config: &CanvasConfig) -> Self {
        CellCanvas {
            width: config.width,
            height: config.height,
            cell: DVec2::new(config.cell_width, config.cell_height),
            offset: DVec2::ZERO,
            factor: 1.0,
            stack: Vec::new(),
            ops: Vec::new(),
            next_z: 0,
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_scene(self, marker: Option<String>) -> ResolvedScene {
        ResolvedScene {
            width: self.width,
            height: self.height,
            ops: self.ops,
            marker,
        }
    }

    /// Point in fractional cell coordinates.
    fn to_cells(&self, p: DVec2) -> DVec2 {
        (self.offset + p * self.factor) / self.cell
    }

    fn plot(&mut self, x: i64, y: i64, ch: char, style: &Style, z_order: i32) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        self.ops.push(DrawOp {
            x: x as u16,
            y: y as u16,
            ch,
            style: style.clone(),
            z_order,
        });
    }

    fn take_z(&mut self) -> i32 {
        let z = self.next_z;
        self.next_z += 1;
        z
    }
}

/// Glyph and style a fill is painted with.
fn fill_cell(fill: &Fill) -> (char, Style) {
    match fill {
        Fill::Color(color) => {
            let mut style = Style::fg(*color);
            style.bold = *color == PLACEHOLDER;
            (SOLID, style)
        }
        Fill::Image(_) => (
            IMAGE,
            Style {
                dim: true,
                ..Default::default()
            },
        ),
    }
}

impl Graphics for CellCanvas {
    fn push_state(&mut self) {
        self.stack.push((self.offset, self.factor));
    }

    fn pop_state(&mut self) {
        if let Some((offset, factor)) = self.stack.pop() {
            self.offset = offset;
            self.factor = factor;
        }
    }

    fn translate(&mut self, offset: DVec2) {
        self.offset += offset * self.factor;
    }

    fn scale(&mut self, factor: f64) {
        self.factor *= factor;
    }

    /// Paints every cell whose centre lies inside the outline. Outlines too
    /// thin to cover a centre still leave one cell at their centroid.
    fn fill_polygon(&mut self, points: &[DVec2], fill: &Fill) {
        if points.is_empty() {
            return;
        }
        let cells: Vec<DVec2> = points.iter().map(|p| self.to_cells(*p)).collect();
        let (ch, style) = fill_cell(fill);
        let z = self.take_z();

        let min = cells.iter().fold(DVec2::splat(f64::INFINITY), |a, p| a.min(*p));
        let max = cells.iter().fold(DVec2::splat(f64::NEG_INFINITY), |a, p| a.max(*p));
        let x0 = (min.x.floor() as i64).max(0);
        let y0 = (min.y.floor() as i64).max(0);
        let x1 = (max.x.ceil() as i64).min(i64::from(self.width));
        let y1 = (max.y.ceil() as i64).min(i64::from(self.height));

        let mut painted = false;
        for y in y0..y1 {
            for x in x0..x1 {
                let centre = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                if point_in_polygon(&cells, centre) {
                    self.plot(x, y, ch, &style, z);
                    painted = true;
                }
            }
        }
        if !painted {
            let centroid = cells.iter().copied().sum::<DVec2>() / cells.len() as f64;
            self.plot(centroid.x.floor() as i64, centroid.y.floor() as i64, ch, &style, z);
        }
    }

    fn stroke_polyline(&mut self, points: &[DVec2], pen: &Pen) {
        let style = Style::fg(pen.color);
        let z = self.take_z();
        let cells: Vec<DVec2> = points.iter().map(|p| self.to_cells(*p)).collect();
        if let [only] = cells.as_slice() {
            self.plot(only.x.floor() as i64, only.y.floor() as i64, pen.glyph, &style, z);
            return;
        }
        for pair in cells.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let span = b - a;
            let steps = (span.x.abs().max(span.y.abs()) * 2.0).ceil().max(1.0) as usize;
            for i in 0..=steps {
                let p = a + span * (i as f64 / steps as f64);
                self.plot(p.x.floor() as i64, p.y.floor() as i64, pen.glyph, &style, z);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;

    fn canvas() -> CellCanvas {
        CellCanvas::new(&CanvasConfig {
            width: 20,
            height: 10,
            cell_width: 4.0,
            cell_height: 8.0,
        })
    }

    fn square(x: f64, y: f64, size: f64) -> Vec<DVec2> {
        vec![
            DVec2::new(x, y),
            DVec2::new(x + size, y),
            DVec2::new(x + size, y + size),
            DVec2::new(x, y + size),
        ]
    }

    #[test]
    fn fills_cells_whose_centres_are_covered() {
        let mut canvas = canvas();
        // 16x16 pixels = 4 columns by 2 rows.
        canvas.fill_polygon(&square(0.0, 0.0, 16.0), &Fill::Color(Color::rgb(1, 2, 3)));
        let ops = canvas.ops();
        assert_eq!(ops.len(), 8);
        assert!(ops.iter().all(|op| op.ch == SOLID && op.x < 4 && op.y < 2));
        assert_eq!(ops[0].style.fg, Some(Color::rgb(1, 2, 3)));
    }

    #[test]
    fn slivers_still_show_up() {
        let mut canvas = canvas();
        canvas.fill_polygon(&square(9.0, 9.0, 1.0), &Fill::Color(PLACEHOLDER));
        let ops = canvas.ops();
        assert_eq!(ops.len(), 1);
        assert_eq!((ops[0].x, ops[0].y), (2, 1));
        assert!(ops[0].style.bold);
    }

    #[test]
    fn transform_stack_moves_and_scales() {
        let mut canvas = canvas();
        canvas.push_state();
        canvas.translate(DVec2::new(40.0, 40.0));
        canvas.scale(0.5);
        canvas.stroke_polyline(&[DVec2::new(8.0, 0.0)], &Pen::new(Color::rgb(0, 0, 0), '*'));
        canvas.pop_state();
        canvas.stroke_polyline(&[DVec2::new(8.0, 0.0)], &Pen::new(Color::rgb(0, 0, 0), '*'));

        let ops = canvas.ops();
        // (40 + 4, 40) -> cell (11, 5); untransformed (8, 0) -> cell (2, 0).
        assert_eq!((ops[0].x, ops[0].y), (11, 5));
        assert_eq!((ops[1].x, ops[1].y), (2, 0));
    }

    #[test]
    fn later_primitives_sit_higher() {
        let mut canvas = canvas();
        canvas.fill_polygon(&square(0.0, 0.0, 8.0), &Fill::Color(Color::rgb(0, 0, 0)));
        canvas.stroke_polyline(
            &[DVec2::new(0.0, 4.0), DVec2::new(40.0, 4.0)],
            &Pen::new(Color::rgb(9, 9, 9), '-'),
        );
        let ops = canvas.ops();
        let fill_z = ops[0].z_order;
        let stroke: Vec<_> = ops.iter().filter(|op| op.ch == '-').collect();
        assert!(stroke.len() >= 10);
        assert!(stroke.iter().all(|op| op.z_order > fill_z && op.y == 0));
    }

    #[test]
    fn off_canvas_cells_are_clipped() {
        let mut canvas = canvas();
        canvas.fill_polygon(
            &square(-100.0, -100.0, 120.0),
            &Fill::Color(Color::rgb(5, 5, 5)),
        );
        let ops = canvas.ops();
        assert!(!ops.is_empty());
        assert!(ops.iter().all(|op| op.x < 20 && op.y < 10 && op.ch == SOLID));
    }
}
