//! Floor assembly: room placement plus the core connectivity engine.
//!
//! Room geometry here is deliberately simple (random non-overlapping
//! rectangles); the interesting work — MST, loops, corridor styles, door
//! placement — happens in `barrow_core::map::connectivity`.

use barrow_core::{
    Color, Door, Entity, EntityId, GameConfig, GameMap, GameRng, Position, Rect, RenderOrder,
    connect_rooms,
};

/// Output of floor assembly: geometry plus the door entities to place.
pub struct FloorPlan {
    pub map: GameMap,
    pub doors: Vec<(Position, Door)>,
    /// Up-stairs landing (also the player entry when descending).
    pub entry: Position,
    /// Down-stairs location.
    pub exit: Position,
}

/// Build a floor: carve rooms, connect them, and roll door variants.
pub fn generate_floor(
    level: u32,
    width: i32,
    height: i32,
    max_rooms: usize,
    config: &GameConfig,
    rng: &mut GameRng,
) -> FloorPlan {
    let mut map = GameMap::new(width, height, level);

    for _ in 0..max_rooms * 4 {
        if map.rooms.len() >= max_rooms {
            break;
        }
        let w = rng.range_i32(5, 10);
        let h = rng.range_i32(4, 8);
        let x = rng.range_i32(1, width - w - 2);
        let y = rng.range_i32(1, height - h - 2);
        let room = Rect::new(x, y, w, h);
        if !map.rooms.iter().any(|r| r.intersects(&room)) {
            map.carve_room(room);
        }
    }

    let door_positions = connect_rooms(&mut map, &config.connectivity, rng);

    let mut doors = Vec::new();
    for pos in door_positions {
        let door = if rng.chance(config.connectivity.locked_door_chance) {
            Door::locked("brass")
        } else if rng.chance(config.connectivity.secret_door_chance) {
            Door::secret(14)
        } else {
            Door::closed()
        };
        doors.push((pos, door));
    }

    let entry = map.rooms.first().map(Rect::center).unwrap_or_default();
    let exit = map.rooms.last().map(Rect::center).unwrap_or(entry);

    tracing::debug!(
        target: "barrow_runtime::worldgen",
        level,
        rooms = map.rooms.len(),
        doors = doors.len(),
        "assembled floor"
    );

    FloorPlan {
        map,
        doors,
        entry,
        exit,
    }
}

/// Stamp a door entity for a planned position.
pub fn door_entity(id: EntityId, position: Position, door: Door) -> Entity {
    let mut entity = Entity::new(id, "door", '+', Color::ORANGE, position)
        .with_render_order(RenderOrder::Prop);
    entity.door = Some(door);
    entity
}
