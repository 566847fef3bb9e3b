use foundation::math::Vec2;

use crate::paint::{Color, Paint, Transform2D};

/// The drawing operations the globe needs from a 2-D canvas.
///
/// Coordinates are screen pixels, y down. `set_transform` applies to every
/// following call until replaced.
pub trait DrawSurface {
    fn clear(&mut self, color: Color);
    fn set_transform(&mut self, transform: Transform2D);
    fn draw_circle(&mut self, center: Vec2, radius: f64, paint: Paint);
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color, width: f64);
    fn draw_polyline(&mut self, points: &[Vec2], color: Color, width: f64);
    fn draw_polygon(&mut self, points: &[Vec2], paint: Paint);
    fn draw_label(&mut self, at: Vec2, text: &str, color: Color);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    SetTransform(Transform2D),
    Circle {
        center: Vec2,
        radius: f64,
        paint: Paint,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
        width: f64,
    },
    Polyline {
        points: Vec<Vec2>,
        color: Color,
        width: f64,
    },
    Polygon {
        points: Vec<Vec2>,
        paint: Paint,
    },
    Label {
        at: Vec2,
        text: String,
        color: Color,
    },
}

/// Records every call. Used by tests and by hosts that replay frames elsewhere.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn circles(&self) -> impl Iterator<Item = (Vec2, f64, Paint)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Circle {
                center,
                radius,
                paint,
            } => Some((*center, *radius, *paint)),
            _ => None,
        })
    }

    pub fn line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }

    pub fn polyline_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Polyline { .. }))
            .count()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Label { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DrawSurface for RecordingSurface {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn set_transform(&mut self, transform: Transform2D) {
        self.commands.push(DrawCommand::SetTransform(transform));
    }

    fn draw_circle(&mut self, center: Vec2, radius: f64, paint: Paint) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            paint,
        });
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color, width: f64) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn draw_polyline(&mut self, points: &[Vec2], color: Color, width: f64) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            color,
            width,
        });
    }

    fn draw_polygon(&mut self, points: &[Vec2], paint: Paint) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            paint,
        });
    }

    fn draw_label(&mut self, at: Vec2, text: &str, color: Color) {
        self.commands.push(DrawCommand::Label {
            at,
            text: text.to_string(),
            color,
        });
    }
}

/// Discards everything.
#[derive(Debug, Default, Copy, Clone)]
pub struct NullSurface;

impl DrawSurface for NullSurface {
    fn clear(&mut self, _color: Color) {}
    fn set_transform(&mut self, _transform: Transform2D) {}
    fn draw_circle(&mut self, _center: Vec2, _radius: f64, _paint: Paint) {}
    fn draw_line(&mut self, _from: Vec2, _to: Vec2, _color: Color, _width: f64) {}
    fn draw_polyline(&mut self, _points: &[Vec2], _color: Color, _width: f64) {}
    fn draw_polygon(&mut self, _points: &[Vec2], _paint: Paint) {}
    fn draw_label(&mut self, _at: Vec2, _text: &str, _color: Color) {}
}
