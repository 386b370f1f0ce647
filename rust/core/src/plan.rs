// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan snapshot consumed by the ground reconstruction.
//!
//! Only the fields the geometry engine reads are modeled here: footprints,
//! level membership, elevations and visibility flags. Everything else a
//! home editor tracks (names, colors, prices...) lives with the host.

use crate::error::{Error, Result};
use rustc_hash::{FxHashMap, FxHashSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Plan coordinate pair `[x, y]`, y pointing south as in plan views.
pub type PlanPoint = [f32; 2];

/// Stable level identifier used as map key during a rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LevelId(pub u32);

/// A building level.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Level {
    pub id: LevelId,
    pub name: String,
    /// Elevation of the level floor, relative to the ground at 0
    pub elevation: f32,
    /// Whether the level may be displayed at all
    pub viewable: bool,
    /// Whether the level is currently shown
    pub visible: bool,
}

impl Level {
    /// Create a viewable, visible level
    pub fn new(id: u32, name: impl Into<String>, elevation: f32) -> Self {
        Self {
            id: LevelId(id),
            name: name.into(),
            elevation,
            viewable: true,
            visible: true,
        }
    }

    #[inline]
    pub fn is_viewable_and_visible(&self) -> bool {
        self.viewable && self.visible
    }
}

/// A room floor polygon.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Room {
    pub points: Vec<PlanPoint>,
    pub level: Option<LevelId>,
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub floor_visible: bool,
}

impl Room {
    pub fn new(points: Vec<PlanPoint>, level: Option<LevelId>) -> Self {
        Self {
            points,
            level,
            floor_visible: true,
        }
    }
}

/// A wall, given by its already computed footprint polygon.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Wall {
    pub points: Vec<PlanPoint>,
    pub level: Option<LevelId>,
}

impl Wall {
    pub fn new(points: Vec<PlanPoint>, level: Option<LevelId>) -> Self {
        Self { points, level }
    }
}

/// A piece of furniture, located by its center, size and angle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Furniture {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub depth: f32,
    /// Rotation around the center, in radians
    #[cfg_attr(feature = "serde", serde(default))]
    pub angle: f32,
    /// Elevation of the piece bottom relative to its level
    #[cfg_attr(feature = "serde", serde(default))]
    pub elevation: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub model_mirrored: bool,
    pub level: Option<LevelId>,
    /// SVG path data in the unit square that replaces the footprint
    /// when the piece digs the ground (staircases)
    #[cfg_attr(feature = "serde", serde(default))]
    pub cut_out_shape: Option<String>,
}

impl Furniture {
    pub fn new(x: f32, y: f32, width: f32, depth: f32, level: Option<LevelId>) -> Self {
        Self {
            x,
            y,
            width,
            depth,
            angle: 0.0,
            elevation: 0.0,
            model_mirrored: false,
            level,
            cut_out_shape: None,
        }
    }

    /// The four corners of the piece footprint, rotated around its center.
    pub fn points(&self) -> [PlanPoint; 4] {
        let half_width = self.width / 2.0;
        let half_depth = self.depth / 2.0;
        let (sin, cos) = self.angle.sin_cos();
        let corner = |dx: f32, dy: f32| -> PlanPoint {
            [self.x + dx * cos - dy * sin, self.y + dx * sin + dy * cos]
        };
        [
            corner(-half_width, -half_depth),
            corner(half_width, -half_depth),
            corner(half_width, half_depth),
            corner(-half_width, half_depth),
        ]
    }

    /// Elevation of the piece bottom relative to the ground.
    pub fn ground_elevation(&self, level: Option<&Level>) -> f32 {
        self.elevation + level.map_or(0.0, |level| level.elevation)
    }
}

#[cfg(feature = "serde")]
fn default_true() -> bool {
    true
}

/// Immutable snapshot of the plan items taken for one rebuild.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Plan {
    #[cfg_attr(feature = "serde", serde(default))]
    pub levels: Vec<Level>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rooms: Vec<Room>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub walls: Vec<Wall>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub furniture: Vec<Furniture>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.levels.push(level);
        self
    }

    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    pub fn with_wall(mut self, wall: Wall) -> Self {
        self.walls.push(wall);
        self
    }

    pub fn with_furniture(mut self, piece: Furniture) -> Self {
        self.furniture.push(piece);
        self
    }

    /// Check if the plan holds no item
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty() && self.walls.is_empty() && self.furniture.is_empty()
    }

    /// Build the id -> level lookup used during a rebuild.
    pub fn level_index(&self) -> LevelIndex<'_> {
        LevelIndex {
            levels: self.levels.iter().map(|level| (level.id, level)).collect(),
        }
    }

    /// Check that level identifiers are unique and that every item
    /// references an existing level.
    pub fn validate(&self) -> Result<()> {
        let mut ids = FxHashSet::default();
        for level in &self.levels {
            if !ids.insert(level.id) {
                return Err(Error::DuplicateLevel(level.id));
            }
        }

        let references = self
            .rooms
            .iter()
            .filter_map(|room| room.level)
            .chain(self.walls.iter().filter_map(|wall| wall.level))
            .chain(self.furniture.iter().filter_map(|piece| piece.level));
        for id in references {
            if !ids.contains(&id) {
                return Err(Error::UnknownLevel(id));
            }
        }
        Ok(())
    }
}

/// Level lookup by identifier.
#[derive(Debug)]
pub struct LevelIndex<'a> {
    levels: FxHashMap<LevelId, &'a Level>,
}

impl<'a> LevelIndex<'a> {
    pub fn get(&self, id: LevelId) -> Option<&'a Level> {
        self.levels.get(&id).copied()
    }

    /// Resolve an item level reference; `None` means the implicit ground level.
    pub fn resolve(&self, id: Option<LevelId>) -> Result<Option<&'a Level>> {
        match id {
            None => Ok(None),
            Some(id) => self.get(id).map(Some).ok_or(Error::UnknownLevel(id)),
        }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_furniture_points_unrotated() {
        let piece = Furniture::new(100.0, 50.0, 40.0, 20.0, None);
        let points = piece.points();
        assert_eq!(points[0], [80.0, 40.0]);
        assert_eq!(points[1], [120.0, 40.0]);
        assert_eq!(points[2], [120.0, 60.0]);
        assert_eq!(points[3], [80.0, 60.0]);
    }

    #[test]
    fn test_furniture_points_rotated_quarter_turn() {
        let mut piece = Furniture::new(0.0, 0.0, 40.0, 20.0, None);
        piece.angle = std::f32::consts::FRAC_PI_2;
        let points = piece.points();
        // Width now runs along y
        assert_relative_eq!(points[0][0], 10.0, epsilon = 1e-4);
        assert_relative_eq!(points[0][1], -20.0, epsilon = 1e-4);
        assert_relative_eq!(points[2][0], -10.0, epsilon = 1e-4);
        assert_relative_eq!(points[2][1], 20.0, epsilon = 1e-4);
    }

    #[test]
    fn test_ground_elevation_adds_level_elevation() {
        let level = Level::new(1, "Basement", -250.0);
        let mut piece = Furniture::new(0.0, 0.0, 10.0, 10.0, Some(level.id));
        piece.elevation = 30.0;
        assert_relative_eq!(piece.ground_elevation(Some(&level)), -220.0);
        assert_relative_eq!(piece.ground_elevation(None), 30.0);
    }

    #[test]
    fn test_validate_unknown_level() {
        let plan = Plan::new()
            .with_level(Level::new(1, "Ground", 0.0))
            .with_room(Room::new(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]], Some(LevelId(7))));
        match plan.validate() {
            Err(Error::UnknownLevel(id)) => assert_eq!(id, LevelId(7)),
            other => panic!("expected unknown level, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_duplicate_level() {
        let plan = Plan::new()
            .with_level(Level::new(1, "A", 0.0))
            .with_level(Level::new(1, "B", -100.0));
        assert!(matches!(plan.validate(), Err(Error::DuplicateLevel(LevelId(1)))));
    }

    #[test]
    fn test_level_index_resolve() {
        let plan = Plan::new().with_level(Level::new(3, "Cellar", -300.0));
        let index = plan.level_index();
        assert_eq!(index.len(), 1);
        assert!(index.resolve(None).unwrap().is_none());
        assert_eq!(index.resolve(Some(LevelId(3))).unwrap().unwrap().name, "Cellar");
        assert!(index.resolve(Some(LevelId(4))).is_err());
    }
}
