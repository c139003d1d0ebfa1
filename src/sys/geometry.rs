use serde::{Deserialize, Serialize};

/// Integer pixel rectangle in the host's global coordinate space.
///
/// Width and height are never negative; [`Rect::new`] clamps them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawRect")]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: width.max(0),
            height: height.max(0),
        }
    }

    pub fn is_empty(&self) -> bool { self.width == 0 || self.height == 0 }

    pub fn right(&self) -> i32 { self.x + self.width }

    /// Horizontal centre, in f64 so odd widths don't lose the half pixel.
    pub fn center_x(&self) -> f64 { self.x as f64 + self.width as f64 / 2.0 }

    pub fn with_origin(self, x: i32, y: i32) -> Self { Self { x, y, ..self } }

    /// Same rectangle with width and height swapped so that width >= height.
    pub fn landscape(self) -> Self {
        if self.height > self.width {
            Self::new(self.x, self.y, self.height, self.width)
        } else {
            self
        }
    }
}

#[derive(Deserialize)]
struct RawRect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl From<RawRect> for Rect {
    fn from(raw: RawRect) -> Self { Rect::new(raw.x, raw.y, raw.width, raw.height) }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}
