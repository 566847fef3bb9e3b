use foundation::math::Vec2;
use scene::DragOrigin;

/// One press-move-release sequence that started on the globe.
///
/// Every press starts out as a possible click. Once the pointer has
/// travelled `slop` pixels in total (path length, not displacement) it is a
/// drag for good, even if it comes back to where it started.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Gesture {
    start: Vec2,
    last: Vec2,
    travelled: f64,
    origin: DragOrigin,
}

impl Gesture {
    pub fn begin(at: Vec2, origin: DragOrigin) -> Self {
        Self {
            start: at,
            last: at,
            travelled: 0.0,
            origin,
        }
    }

    /// Records a pointer position and returns the offset from the press.
    pub fn move_to(&mut self, at: Vec2) -> Vec2 {
        self.travelled += self.last.distance(at);
        self.last = at;
        at - self.start
    }

    pub fn travelled(&self) -> f64 {
        self.travelled
    }

    pub fn origin(&self) -> DragOrigin {
        self.origin
    }

    pub fn is_click(&self, slop: f64) -> bool {
        self.travelled < slop
    }
}
