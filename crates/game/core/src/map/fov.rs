//! Field-of-view and line-of-sight.
//!
//! The player's FOV is the shared visibility proxy for most AIs; variants
//! with their own senses (slime radius, zombie short sight) combine it with
//! distance checks. Visibility of a tile is decided by Bresenham
//! line-of-sight from the origin within a radius.

use crate::map::GameMap;
use crate::state::Position;

/// Computed set of visible tiles for one origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FovMap {
    width: i32,
    height: i32,
    visible: Vec<bool>,
    pub origin: Position,
    pub radius: i32,
}

impl FovMap {
    pub fn is_visible(&self, p: Position) -> bool {
        if p.x < 0 || p.y < 0 || p.x >= self.width || p.y >= self.height {
            return false;
        }
        self.visible[(p.y * self.width + p.x) as usize]
    }
}

/// Walk the Bresenham line from `from` to `to`, checking sight blockage on
/// every intermediate tile. The endpoints themselves do not block the line.
pub fn line_of_sight(map: &GameMap, from: Position, to: Position) -> bool {
    let mut x = from.x;
    let mut y = from.y;
    let dx = (to.x - from.x).abs();
    let dy = (to.y - from.y).abs();
    let sx = if to.x > from.x { 1 } else { -1 };
    let sy = if to.y > from.y { 1 } else { -1 };
    let mut err = dx - dy;

    loop {
        if x == to.x && y == to.y {
            return true;
        }
        let here = Position::new(x, y);
        if here != from && map.blocks_sight(here) {
            return false;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}

/// Compute the set of tiles visible from `origin` within `radius`, and mark
/// them explored on the map.
pub fn compute_fov(map: &mut GameMap, origin: Position, radius: i32) -> FovMap {
    let mut fov = FovMap {
        width: map.width,
        height: map.height,
        visible: vec![false; (map.width * map.height) as usize],
        origin,
        radius,
    };

    for y in (origin.y - radius).max(0)..=(origin.y + radius).min(map.height - 1) {
        for x in (origin.x - radius).max(0)..=(origin.x + radius).min(map.width - 1) {
            let p = Position::new(x, y);
            if origin.euclidean(p) > f64::from(radius) {
                continue;
            }
            if line_of_sight(map, origin, p) {
                fov.visible[(y * map.width + x) as usize] = true;
                map.mark_explored(p);
            }
        }
    }

    fov
}
