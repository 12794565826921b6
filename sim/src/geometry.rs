use serde::{Deserialize, Serialize};

/// Grid coordinates. Signed so that neighborhoods of edge cells can be
/// enumerated before the bounds check rejects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offsets on both axes from `self` to `other`
    pub fn delta(&self, other: Position) -> (i32, i32) {
        ((other.x - self.x).abs(), (other.y - self.y).abs())
    }

    /// Within `radius` cells on both axes (a square, not a circle)
    pub fn within(&self, other: Position, radius: u32) -> bool {
        let (dx, dy) = self.delta(other);
        dx as u32 <= radius && dy as u32 <= radius
    }

    /// The 3x3 block centered on this position, x-major then y, center included
    pub fn neighborhood(&self) -> impl Iterator<Item = Position> {
        let center = *self;
        (-1..=1).flat_map(move |dx| {
            (-1..=1).map(move |dy| Position::new(center.x + dx, center.y + dy))
        })
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Position::new(x, y)
    }
}

/// Squared Euclidean distance; only ever compared, so no square root
pub fn squared_distance(a: Position, b: Position) -> i64 {
    let dx = (a.x - b.x) as i64;
    let dy = (a.y - b.y) as i64;
    dx * dx + dy * dy
}

/// Index of the position closest to `target`; the earliest wins a tie
pub fn closest_to(positions: &[Position], target: Position) -> Option<usize> {
    let mut best: Option<(usize, i64)> = None;
    for (idx, &pos) in positions.iter().enumerate() {
        let distance = squared_distance(pos, target);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((idx, distance)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Index of the position farthest from `target`; the earliest wins a tie
pub fn farthest_from(positions: &[Position], target: Position) -> Option<usize> {
    let mut best: Option<(usize, i64)> = None;
    for (idx, &pos) in positions.iter().enumerate() {
        let distance = squared_distance(pos, target);
        match best {
            Some((_, best_distance)) if distance <= best_distance => {}
            _ => best = Some((idx, distance)),
        }
    }
    best.map(|(idx, _)| idx)
}
