//! Dungeon connectivity engine: MST plus loops, corridor digging, doors.
//!
//! For a floor's room list the engine builds a minimum spanning tree over
//! room centers (Kruskal with union-find), adds a configurable number of
//! extra loop edges sampled from the complement, digs each edge as a
//! corridor in one of three styles, and reports door positions at a
//! configured spacing along every corridor.

use crate::config::ConnectivityConfig;
use crate::map::{GameMap, Rect};
use crate::rng::GameRng;
use crate::state::Position;

/// Union-Find (disjoint set) with path compression and union by rank.
#[derive(Clone, Debug)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u32>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            let root = self.find(self.parent[x]);
            self.parent[x] = root;
        }
        self.parent[x]
    }

    /// Union two sets. Returns true if they were previously disjoint.
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let rx = self.find(x);
        let ry = self.find(y);
        if rx == ry {
            return false;
        }
        if self.rank[rx] < self.rank[ry] {
            self.parent[rx] = ry;
        } else if self.rank[rx] > self.rank[ry] {
            self.parent[ry] = rx;
        } else {
            self.parent[ry] = rx;
            self.rank[rx] += 1;
        }
        true
    }
}

/// Compute MST edges between rooms via Kruskal's algorithm.
///
/// Edge weight is the Euclidean distance between room centers. Ties are
/// broken by index pair so the result is deterministic.
pub fn compute_mst(rooms: &[Rect]) -> Vec<(usize, usize)> {
    if rooms.len() <= 1 {
        return Vec::new();
    }

    let mut edges: Vec<(f64, usize, usize)> = Vec::new();
    for i in 0..rooms.len() {
        for j in (i + 1)..rooms.len() {
            let d = rooms[i].center().euclidean(rooms[j].center());
            edges.push((d, i, j));
        }
    }
    edges.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap().then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));

    let mut uf = UnionFind::new(rooms.len());
    let mut mst = Vec::with_capacity(rooms.len() - 1);
    for (_d, i, j) in edges {
        if uf.union(i, j) {
            mst.push((i, j));
            if mst.len() == rooms.len() - 1 {
                break;
            }
        }
    }
    mst
}

/// Add `loop_count` extra edges sampled (without replacement) from pairs not
/// already connected directly.
pub fn add_loop_connections(
    rooms: &[Rect],
    loop_count: usize,
    existing: &[(usize, usize)],
    rng: &mut GameRng,
) -> Vec<(usize, usize)> {
    if rooms.len() <= 2 || loop_count == 0 {
        return Vec::new();
    }

    let mut candidates: Vec<(usize, usize)> = Vec::new();
    for i in 0..rooms.len() {
        for j in (i + 1)..rooms.len() {
            let pair = (i, j);
            if !existing.contains(&pair) {
                candidates.push(pair);
            }
        }
    }
    if candidates.is_empty() {
        tracing::warn!(target: "barrow_core::map", "no candidate edges left for loops");
        return Vec::new();
    }

    rng.sample_indices(candidates.len(), loop_count)
        .into_iter()
        .map(|idx| candidates[idx])
        .collect()
}

/// Corridor digging styles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CorridorStyle {
    /// L-shaped: horizontal-then-vertical or vertical-then-horizontal, 50/50.
    Orthogonal,
    /// Random zigzag weighted toward the longer remaining axis.
    Jagged,
    /// Bresenham with occasional single-step deviations.
    Organic,
}

/// Generate corridor tiles from `start` to `end` in the given style.
pub fn dig_corridor(
    start: Position,
    end: Position,
    style: CorridorStyle,
    rng: &mut GameRng,
) -> Vec<Position> {
    match style {
        CorridorStyle::Orthogonal => dig_orthogonal(start, end, rng),
        CorridorStyle::Jagged => dig_jagged(start, end, rng),
        CorridorStyle::Organic => dig_organic(start, end, rng),
    }
}

fn dig_orthogonal(start: Position, end: Position, rng: &mut GameRng) -> Vec<Position> {
    let mut tiles = Vec::new();
    if rng.chance(0.5) {
        // Horizontal first.
        for x in start.x.min(end.x)..=start.x.max(end.x) {
            tiles.push(Position::new(x, start.y));
        }
        for y in start.y.min(end.y)..=start.y.max(end.y) {
            tiles.push(Position::new(end.x, y));
        }
    } else {
        for y in start.y.min(end.y)..=start.y.max(end.y) {
            tiles.push(Position::new(start.x, y));
        }
        for x in start.x.min(end.x)..=start.x.max(end.x) {
            tiles.push(Position::new(x, end.y));
        }
    }
    tiles
}

fn dig_jagged(start: Position, end: Position, rng: &mut GameRng) -> Vec<Position> {
    let mut tiles = Vec::new();
    let mut x = start.x;
    let mut y = start.y;
    let sx = if end.x > start.x { 1 } else { -1 };
    let sy = if end.y > start.y { 1 } else { -1 };

    while x != end.x || y != end.y {
        tiles.push(Position::new(x, y));
        let x_dist = (end.x - x).abs();
        let y_dist = (end.y - y).abs();
        if x_dist == 0 {
            y += sy;
        } else if y_dist == 0 {
            x += sx;
        } else if rng.chance(f64::from(x_dist) / f64::from(x_dist + y_dist)) {
            x += sx;
        } else {
            y += sy;
        }
    }
    tiles.push(end);
    tiles
}

fn dig_organic(start: Position, end: Position, rng: &mut GameRng) -> Vec<Position> {
    const TURN_CHANCE: f64 = 0.15;

    let mut tiles = Vec::new();
    let mut pos = start;

    // Line walk with occasional single-step deviations onto the minor axis.
    // Every step heads toward the endpoint, so the walk always terminates.
    while pos != end {
        tiles.push(pos);
        let rdx = (end.x - pos.x).abs();
        let rdy = (end.y - pos.y).abs();
        let (sx, sy) = pos.step_toward(end);

        if rdx > 0 && rdy > 0 && rng.chance(TURN_CHANCE) {
            if rng.chance(0.5) {
                pos.x += sx;
            } else {
                pos.y += sy;
            }
            continue;
        }

        if rdx >= rdy && rdx > 0 {
            pos.x += sx;
        } else {
            pos.y += sy;
        }
    }
    tiles.push(end);
    tiles
}

/// Door positions at a regular spacing along a corridor.
///
/// Doors land on every `spacing`th tile, so consecutive doors along one
/// corridor are at most `spacing` tiles apart.
pub fn door_positions(corridor: &[Position], spacing: usize) -> Vec<Position> {
    if spacing == 0 || corridor.len() < spacing {
        return Vec::new();
    }
    corridor
        .iter()
        .skip(spacing - 1)
        .step_by(spacing)
        .copied()
        .collect()
}

/// Connect every room on the map: MST plus loops, corridors carved, door
/// positions reported. Edges are recorded on the map for save/debug use.
pub fn connect_rooms(
    map: &mut GameMap,
    cfg: &ConnectivityConfig,
    rng: &mut GameRng,
) -> Vec<Position> {
    let rooms = map.rooms.clone();
    let mut edges = compute_mst(&rooms);
    let loops = add_loop_connections(&rooms, cfg.loop_count, &edges, rng);
    edges.extend(loops);

    let mut doors = Vec::new();
    for &(a, b) in &edges {
        let style = match rng.pick_index(3) {
            Some(0) => CorridorStyle::Orthogonal,
            Some(1) => CorridorStyle::Jagged,
            _ => CorridorStyle::Organic,
        };
        let corridor = dig_corridor(rooms[a].center(), rooms[b].center(), style, rng);
        for &tile in &corridor {
            map.carve(tile);
        }
        // Doors only make sense outside room interiors.
        doors.extend(
            door_positions(&corridor, cfg.door_spacing)
                .into_iter()
                .filter(|p| !rooms.iter().any(|r| r.contains(*p))),
        );
    }

    map.edges = edges;
    doors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rooms_grid() -> Vec<Rect> {
        vec![
            Rect::new(0, 0, 6, 6),
            Rect::new(20, 0, 6, 6),
            Rect::new(0, 20, 6, 6),
            Rect::new(20, 20, 6, 6),
            Rect::new(10, 10, 6, 6),
        ]
    }

    #[test]
    fn mst_connects_every_room() {
        let rooms = rooms_grid();
        let mst = compute_mst(&rooms);
        assert_eq!(mst.len(), rooms.len() - 1);

        let mut uf = UnionFind::new(rooms.len());
        for &(a, b) in &mst {
            uf.union(a, b);
        }
        let root = uf.find(0);
        for i in 1..rooms.len() {
            assert_eq!(uf.find(i), root, "room {i} disconnected");
        }
    }

    #[test]
    fn loops_come_from_the_complement() {
        let rooms = rooms_grid();
        let mst = compute_mst(&rooms);
        let mut rng = GameRng::seeded(9);
        let loops = add_loop_connections(&rooms, 3, &mst, &mut rng);
        assert_eq!(loops.len(), 3);
        for edge in &loops {
            assert!(!mst.contains(edge));
        }
        let mut dedup = loops.clone();
        dedup.sort_unstable();
        dedup.dedup();
        assert_eq!(dedup.len(), loops.len());
    }

    #[test]
    fn corridors_connect_endpoints_contiguously() {
        let mut rng = GameRng::seeded(4);
        for style in [CorridorStyle::Orthogonal, CorridorStyle::Jagged, CorridorStyle::Organic] {
            let start = Position::new(2, 3);
            let end = Position::new(17, 11);
            let tiles = dig_corridor(start, end, style, &mut rng);
            assert!(tiles.contains(&start), "{style:?} missing start");
            assert_eq!(*tiles.last().unwrap(), end, "{style:?} missing end");
            for pair in tiles.windows(2) {
                assert!(
                    pair[0].chebyshev(pair[1]) <= 1,
                    "{style:?} corridor has a gap between {:?} and {:?}",
                    pair[0],
                    pair[1]
                );
            }
        }
    }

    #[test]
    fn doors_every_n_tiles() {
        let corridor: Vec<Position> = (0..20).map(|x| Position::new(x, 5)).collect();
        let doors = door_positions(&corridor, 5);
        assert_eq!(
            doors,
            vec![Position::new(4, 5), Position::new(9, 5), Position::new(14, 5), Position::new(19, 5)]
        );
        assert!(door_positions(&corridor, 0).is_empty());
        assert!(door_positions(&corridor[..3], 5).is_empty());
    }

    #[test]
    fn connect_rooms_carves_walkable_paths() {
        let mut map = GameMap::new(40, 40, 1);
        for room in rooms_grid() {
            map.carve_room(room);
        }
        let mut rng = GameRng::seeded(77);
        let cfg = ConnectivityConfig::default();
        connect_rooms(&mut map, &cfg, &mut rng);
        assert!(map.edges.len() >= map.rooms.len() - 1);
        // Every room center must be carved and reachable tiles exist along edges.
        for room in &map.rooms {
            assert!(!map.is_blocked(room.center()));
        }
    }
}
