use crate::sys::geometry::Rect;

/// Equal-width partition of a work area into vertical columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Columns {
    area: Rect,
    count: u32,
}

impl Columns {
    pub fn new(area: Rect, count: u32) -> Self {
        Self {
            area,
            count: count.max(1),
        }
    }

    pub fn count(&self) -> u32 { self.count }

    /// Truncating division, so the columns may leave a few pixels unused on
    /// the right edge.
    pub fn width(&self) -> i32 { self.area.width / self.count as i32 }

    pub fn rect(&self, index: u32) -> Rect {
        let width = self.width();
        Rect::new(
            self.area.x + width * index.min(self.count - 1) as i32,
            self.area.y,
            width,
            self.area.height,
        )
    }

    /// The column whose centre is closest to the centre of `frame`. Ties go
    /// to the lower column.
    pub fn nearest(&self, frame: Rect) -> u32 {
        let width = self.width() as f64;
        let center = frame.center_x() - self.area.x as f64;
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for index in 0..self.count {
            let column_center = width * index as f64 + width / 2.0;
            let distance = (center - column_center).abs();
            if distance < best_distance {
                best = index;
                best_distance = distance;
            }
        }
        best
    }

    /// Column for a new window given the frames of the windows already on the
    /// monitor: the first column, left to right, that holds no occupant.
    ///
    /// With fewer occupants than columns there is always a free column; if
    /// every column is taken the leftmost one is returned.
    pub fn find_slot(&self, occupants: &[Rect]) -> u32 {
        let mut taken = vec![false; self.count as usize];
        for frame in occupants {
            taken[self.nearest(*frame) as usize] = true;
        }
        taken.iter().position(|t| !t).unwrap_or(0) as u32
    }
}
