//! Floor geometry: tile grid, rooms, and visibility.

mod connectivity;
mod fov;

pub use connectivity::{
    CorridorStyle, UnionFind, add_loop_connections, compute_mst, connect_rooms, dig_corridor,
    door_positions,
};
pub use fov::{FovMap, compute_fov, line_of_sight};

use bitflags::bitflags;

use crate::state::Position;

bitflags! {
    /// Per-tile flags packed into one byte.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct TileFlags: u8 {
        /// Movement blocked (wall).
        const BLOCKED = 0b0000_0001;
        /// Sight blocked.
        const BLOCK_SIGHT = 0b0000_0010;
        /// Seen by the player at least once.
        const EXPLORED = 0b0000_0100;
    }
}

impl serde::Serialize for TileFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> serde::Deserialize<'de> for TileFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u8::deserialize(deserializer)?;
        Ok(TileFlags::from_bits_truncate(bits))
    }
}

/// Axis-aligned rectangular room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + w,
            y2: y + h,
        }
    }

    pub fn center(&self) -> Position {
        Position::new((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x1 <= other.x2 && self.x2 >= other.x1 && self.y1 <= other.y2 && self.y2 >= other.y1
    }

    pub fn contains(&self, p: Position) -> bool {
        p.x > self.x1 && p.x < self.x2 && p.y > self.y1 && p.y < self.y2
    }
}

/// A floor's tile grid plus room and corridor-edge metadata.
///
/// Maps start fully walled; rooms and corridors are carved out of them.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GameMap {
    pub width: i32,
    pub height: i32,
    tiles: Vec<TileFlags>,
    pub rooms: Vec<Rect>,
    /// Room-index pairs connected by corridors (MST edges then loop edges).
    pub edges: Vec<(usize, usize)>,
    pub dungeon_level: u32,
}

impl GameMap {
    pub fn new(width: i32, height: i32, dungeon_level: u32) -> Self {
        let solid = TileFlags::BLOCKED | TileFlags::BLOCK_SIGHT;
        Self {
            width,
            height,
            tiles: vec![solid; (width * height) as usize],
            rooms: Vec::new(),
            edges: Vec::new(),
            dungeon_level,
        }
    }

    #[inline]
    fn index(&self, p: Position) -> usize {
        (p.y * self.width + p.x) as usize
    }

    pub fn in_bounds(&self, p: Position) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    pub fn flags(&self, p: Position) -> TileFlags {
        if self.in_bounds(p) {
            self.tiles[self.index(p)]
        } else {
            TileFlags::BLOCKED | TileFlags::BLOCK_SIGHT
        }
    }

    pub fn is_blocked(&self, p: Position) -> bool {
        self.flags(p).contains(TileFlags::BLOCKED)
    }

    pub fn blocks_sight(&self, p: Position) -> bool {
        self.flags(p).contains(TileFlags::BLOCK_SIGHT)
    }

    pub fn is_explored(&self, p: Position) -> bool {
        self.flags(p).contains(TileFlags::EXPLORED)
    }

    pub fn mark_explored(&mut self, p: Position) {
        if self.in_bounds(p) {
            let idx = self.index(p);
            self.tiles[idx].insert(TileFlags::EXPLORED);
        }
    }

    /// Carve a single tile into walkable, see-through floor.
    pub fn carve(&mut self, p: Position) {
        if self.in_bounds(p) {
            let idx = self.index(p);
            self.tiles[idx].remove(TileFlags::BLOCKED | TileFlags::BLOCK_SIGHT);
        }
    }

    /// Carve a room's interior and record it.
    pub fn carve_room(&mut self, room: Rect) {
        for y in (room.y1 + 1)..room.y2 {
            for x in (room.x1 + 1)..room.x2 {
                self.carve(Position::new(x, y));
            }
        }
        self.rooms.push(room);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_map_is_solid() {
        let map = GameMap::new(10, 10, 1);
        assert!(map.is_blocked(Position::new(5, 5)));
        assert!(map.blocks_sight(Position::new(5, 5)));
        assert!(map.is_blocked(Position::new(-1, 0)));
    }

    #[test]
    fn carve_room_opens_interior_only() {
        let mut map = GameMap::new(20, 20, 1);
        map.carve_room(Rect::new(2, 2, 6, 6));
        assert!(!map.is_blocked(Position::new(4, 4)));
        // Room border stays solid.
        assert!(map.is_blocked(Position::new(2, 2)));
        assert_eq!(map.rooms.len(), 1);
    }

    #[test]
    fn rect_centers_and_intersections() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        let c = Rect::new(20, 20, 3, 3);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert_eq!(a.center(), Position::new(5, 5));
    }
}
