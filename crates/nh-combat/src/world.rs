//! The patch of level a fight or prayer happens on
//!
//! Only what the combat and prayer rules look at is modelled: terrain,
//! traps, altars, loose objects, and the other monsters standing nearby.
//! Missing tiles read as solid stone.

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::combatant::{AlignmentType, Combatant, CombatantId};
use crate::object::{Artifact, Item, ItemId, ObjectKind, ObjectCatalog};

/// Map coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// One step away in any of the eight directions
    pub const fn is_adjacent(self, other: Position) -> bool {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        dx <= 1 && dy <= 1 && (dx + dy) > 0
    }

    pub fn neighbors(self) -> impl Iterator<Item = Position> {
        (-1..=1)
            .flat_map(|dx| (-1..=1).map(move |dy| (dx, dy)))
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .map(move |(dx, dy)| self.offset(dx, dy))
    }
}

/// An altar and what kind of temple it stands in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Altar {
    pub alignment: AlignmentType,
    /// Attended by a priest
    pub shrine: bool,
    /// High altar of Moloch's sanctum or the Astral plane
    pub sanctum: bool,
}

impl Altar {
    pub const fn new(alignment: AlignmentType) -> Self {
        Self {
            alignment,
            shrine: false,
            sanctum: false,
        }
    }
}

/// Terrain kinds the rules distinguish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display)]
pub enum Terrain {
    #[default]
    Stone,
    Wall,
    Room,
    Corridor,
    Door,
    Pool,
    Moat,
    Lava,
    Ice,
    #[strum(to_string = "altar")]
    Altar(Altar),
    Fountain,
}

impl Terrain {
    /// Cannot be walked into
    pub const fn is_solid(&self) -> bool {
        matches!(self, Terrain::Stone | Terrain::Wall)
    }

    /// Water deep enough to drown in
    pub const fn is_pool(&self) -> bool {
        matches!(self, Terrain::Pool | Terrain::Moat)
    }

    /// Open floor a web can be spun on
    pub const fn holds_web(&self) -> bool {
        matches!(self, Terrain::Room | Terrain::Corridor)
    }

    /// Word for the ground at this spot
    pub const fn surface(&self) -> &'static str {
        match self {
            Terrain::Pool | Terrain::Moat | Terrain::Fountain => "water",
            Terrain::Lava => "lava",
            Terrain::Ice => "ice",
            Terrain::Altar(_) => "altar",
            Terrain::Corridor | Terrain::Door | Terrain::Room => "floor",
            Terrain::Stone | Terrain::Wall => "stone",
        }
    }
}

/// Traps that interact with combat effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum TrapKind {
    Pit,
    SpikedPit,
    Hole,
    TrapDoor,
    Teleport,
    LevelTeleport,
    MagicPortal,
    VibratingSquare,
    MagicTrap,
    FireTrap,
    PolyTrap,
    Web,
    BearTrap,
}

impl TrapKind {
    pub const fn is_pit(&self) -> bool {
        matches!(self, TrapKind::Pit | TrapKind::SpikedPit)
    }
}

/// A trap and whether the hero knows about it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trap {
    pub kind: TrapKind,
    pub seen: bool,
}

/// One map square
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: Terrain,
    pub trap: Option<Trap>,
    /// Objects lying here, top of the pile last
    pub objects: Vec<Item>,
}

/// Level state shared by everything in a fight
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Field {
    tiles: HashMap<Position, Tile>,
    /// Monsters other than the two principals, reachable by cleaves
    pub bystanders: Vec<Combatant>,
    /// Game turn
    pub moves: u64,
    pub in_gehennom: bool,
    /// Curses only work at night
    pub night: bool,
    /// Notes of the passtune
    pub castle_tune: String,
    artifacts: HashSet<Artifact>,
    next_item: u32,
    next_combatant: u32,
}

impl Field {
    pub fn new() -> Self {
        Self {
            castle_tune: "CDEFG".to_string(),
            next_item: 10_000,
            next_combatant: 1_000,
            ..Self::default()
        }
    }

    /// A level with every listed square open floor
    pub fn with_floor(squares: impl IntoIterator<Item = Position>) -> Self {
        let mut field = Self::new();
        for pos in squares {
            field.set_terrain(pos, Terrain::Room);
        }
        field
    }

    pub fn tile(&self, pos: Position) -> Option<&Tile> {
        self.tiles.get(&pos)
    }

    pub fn terrain(&self, pos: Position) -> Terrain {
        self.tiles.get(&pos).map_or(Terrain::Stone, |t| t.terrain)
    }

    pub fn set_terrain(&mut self, pos: Position, terrain: Terrain) {
        self.tiles.entry(pos).or_default().terrain = terrain;
    }

    pub fn trap_at(&self, pos: Position) -> Option<Trap> {
        self.tiles.get(&pos).and_then(|t| t.trap)
    }

    pub fn set_trap(&mut self, pos: Position, kind: Option<TrapKind>) {
        self.tiles.entry(pos).or_default().trap = kind.map(|kind| Trap { kind, seen: false });
    }

    pub fn reveal_trap(&mut self, pos: Position) {
        if let Some(trap) = self.tiles.get_mut(&pos).and_then(|t| t.trap.as_mut()) {
            trap.seen = true;
        }
    }

    pub fn altar_at(&self, pos: Position) -> Option<Altar> {
        match self.terrain(pos) {
            Terrain::Altar(altar) => Some(altar),
            _ => None,
        }
    }

    pub fn objects_at(&self, pos: Position) -> &[Item] {
        self.tiles.get(&pos).map_or(&[][..], |t| t.objects.as_slice())
    }

    pub fn objects_at_mut(&mut self, pos: Position) -> &mut Vec<Item> {
        &mut self.tiles.entry(pos).or_default().objects
    }

    /// Drop an item on a square; the field now owns it
    pub fn place_object(&mut self, pos: Position, item: Item) {
        self.objects_at_mut(pos).push(item);
    }

    pub fn new_item_id(&mut self) -> ItemId {
        self.next_item += 1;
        ItemId(self.next_item)
    }

    pub fn new_combatant_id(&mut self) -> CombatantId {
        self.next_combatant += 1;
        CombatantId(self.next_combatant)
    }

    /// Index into `bystanders` of the living monster at `pos`
    pub fn bystander_at(&self, pos: Position) -> Option<usize> {
        self.bystanders
            .iter()
            .position(|m| m.position == pos && !m.is_dead())
    }

    /// Solid rock or boulders on every side
    pub fn is_boxed_in(&self, pos: Position, catalog: &dyn ObjectCatalog) -> bool {
        pos.neighbors().all(|n| {
            self.terrain(n).is_solid()
                || self
                    .objects_at(n)
                    .iter()
                    .any(|o| catalog.lookup(o.otype).kind == ObjectKind::Boulder)
        })
    }

    /// A high altar to `alignment` stands somewhere on the level
    pub fn has_sanctum(&self, alignment: AlignmentType) -> bool {
        self.tiles.values().any(|t| {
            matches!(t.terrain, Terrain::Altar(altar) if altar.sanctum && altar.alignment == alignment)
        })
    }

    pub fn artifact_exists(&self, artifact: Artifact) -> bool {
        self.artifacts.contains(&artifact)
    }

    pub fn record_artifact(&mut self, artifact: Artifact) {
        self.artifacts.insert(artifact);
    }

    /// Artifacts created so far this game
    pub fn nartifacts(&self) -> usize {
        self.artifacts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{StaticCatalog, otyp};

    #[test]
    fn test_missing_tiles_are_stone() {
        let field = Field::new();
        assert_eq!(field.terrain(Position::new(3, 3)), Terrain::Stone);
        assert!(field.trap_at(Position::new(3, 3)).is_none());
    }

    #[test]
    fn test_neighbors() {
        let p = Position::new(5, 5);
        let all: Vec<_> = p.neighbors().collect();
        assert_eq!(all.len(), 8);
        assert!(all.iter().all(|n| n.is_adjacent(p)));
        assert!(!p.is_adjacent(p));
    }

    #[test]
    fn test_boxed_in_by_rock_and_boulders() {
        let cat = StaticCatalog::standard();
        let here = Position::new(1, 1);
        let mut field = Field::with_floor([here]);
        assert!(field.is_boxed_in(here, &cat));

        let east = here.offset(1, 0);
        field.set_terrain(east, Terrain::Corridor);
        assert!(!field.is_boxed_in(here, &cat));

        let id = field.new_item_id();
        field.place_object(east, Item::from_catalog(id, otyp::BOULDER, &cat));
        assert!(field.is_boxed_in(here, &cat));
    }

    #[test]
    fn test_altar_lookup() {
        let mut field = Field::new();
        let pos = Position::new(2, 2);
        field.set_terrain(pos, Terrain::Altar(Altar::new(AlignmentType::Chaotic)));
        assert_eq!(field.altar_at(pos).map(|a| a.alignment), Some(AlignmentType::Chaotic));
        assert_eq!(field.terrain(pos).to_string(), "altar");
    }
}
