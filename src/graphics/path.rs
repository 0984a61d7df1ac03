use glam::DVec2;

/// Samples taken along each cubic segment when flattening.
const CURVE_STEPS: usize = 16;

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Line(DVec2),
    Cubic { c1: DVec2, c2: DVec2, end: DVec2 },
}

/// An open path of straight and cubic bezier segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    start: DVec2,
    segments: Vec<Segment>,
}

impl Path {
    pub fn new(start: DVec2) -> Self {
        Path {
            start,
            segments: Vec::new(),
        }
    }

    pub fn line_to(&mut self, end: DVec2) {
        self.segments.push(Segment::Line(end));
    }

    pub fn curve_to(&mut self, c1: DVec2, c2: DVec2, end: DVec2) {
        self.segments.push(Segment::Cubic { c1, c2, end });
    }

    /// Approximate the path by a polyline.
    pub fn flatten(&self) -> Vec<DVec2> {
        let mut points = vec![self.start];
        let mut from = self.start;
        for segment in &self.segments {
            match *segment {
                Segment::Line(end) => {
                    points.push(end);
                    from = end;
                }
                Segment::Cubic { c1, c2, end } => {
                    for step in 1..=CURVE_STEPS {
                        let t = step as f64 / CURVE_STEPS as f64;
                        points.push(cubic(from, c1, c2, end, t));
                    }
                    from = end;
                }
            }
        }
        points
    }
}

fn cubic(p0: DVec2, p1: DVec2, p2: DVec2, p3: DVec2, t: f64) -> DVec2 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}
