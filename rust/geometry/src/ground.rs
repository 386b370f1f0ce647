// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ground and underground surfaces
//!
//! The builder reads a plan snapshot and produces the flat ground at
//! elevation 0, with holes where rooms and dug levels open it, and for
//! every underground elevation band:
//!
//! - a floor patch at the band elevation,
//! - vertical skirts down from the shallower band,
//! - a lid closing, at the shallower elevation, the holes left in the band.
//!
//! Bands are keyed by elevation and walked shallowest first. Items at the
//! same elevation share one band even when they belong to different levels.

use crate::area::Area;
use crate::error::{Error, Result};
use crate::footprint::furniture_area;
use crate::mesh::{GroundMesh, Primitive};
use crate::outline::area_points;
use crate::polygon::Rect;
use crate::texture::{TextureMapping, TextureTransform};
use home3d_core::{Level, LevelId, Plan};
use nalgebra::{Point2, Point3};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Margin kept around everything removed from the ground
pub const DEFAULT_GROUND_PADDING: f64 = 5000.0;

/// Curve flattening tolerance, in plan units
pub const DEFAULT_FLATNESS: f64 = 1.0;

/// Ground reconstruction settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundConfig {
    /// Rectangle the ground must cover at least. Without it the ground
    /// only covers the padded bounds of the removed areas.
    pub extent: Option<Rect>,
    pub padding: f64,
    pub flatness: f64,
    /// Texture mapped on every surface, if any
    pub texture: Option<TextureMapping>,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            extent: None,
            padding: DEFAULT_GROUND_PADDING,
            flatness: DEFAULT_FLATNESS,
            texture: None,
        }
    }
}

impl GroundConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.padding.is_finite() && self.padding >= 0.0) {
            return Err(Error::InvalidArgument(format!(
                "ground padding must be a non-negative number, got {}",
                self.padding
            )));
        }
        if !(self.flatness.is_finite() && self.flatness > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "flatness must be a positive number, got {}",
                self.flatness
            )));
        }
        if let Some(extent) = &self.extent {
            let finite = [extent.min.x, extent.min.y, extent.max.x, extent.max.y]
                .iter()
                .all(|v| v.is_finite());
            if !finite || extent.width() < 0.0 || extent.height() < 0.0 {
                return Err(Error::InvalidArgument(format!(
                    "invalid ground extent {:?}",
                    extent
                )));
            }
        }
        if let Some(texture) = &self.texture {
            texture.validate()?;
        }
        Ok(())
    }
}

/// Band ordering key: elevation descending, so the shallowest band comes
/// first.
#[derive(Debug, Clone, Copy)]
pub struct BandKey(f32);

impl BandKey {
    pub fn new(elevation: f32) -> Self {
        // -0.0 and 0.0 are one band
        Self(if elevation == 0.0 { 0.0 } else { elevation })
    }

    #[inline]
    pub fn elevation(self) -> f32 {
        self.0
    }
}

impl Ord for BandKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.total_cmp(&self.0)
    }
}

impl PartialOrd for BandKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for BandKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BandKey {}

/// Areas of one underground elevation.
#[derive(Debug, Clone)]
pub struct ElevationBand {
    /// Levels at this elevation
    pub levels: Vec<LevelId>,
    pub elevation: f32,
    /// Everything rooms, walls and furniture dig at this elevation
    pub occupied: Area,
    /// Horizontal patch drawn at the band elevation
    pub floor: Area,
    /// Region whose boundary gets skirts up to the shallower band
    pub side: Area,
    /// Holes of the band closed at the shallower elevation
    pub lid: Area,
}

/// What a fragment represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    /// Part of the configured extent beyond the padded ground
    OutsideGround,
    /// Ground at elevation 0
    Ground,
    Floor,
    Skirt,
    Lid,
}

/// One emitted surface.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundFragment {
    pub kind: FragmentKind,
    /// Elevation of the patch, or of the skirt bottom
    pub elevation: f32,
    /// Skirt height, 0 for flat patches
    pub height: f32,
    /// Levels of the band the fragment belongs to, empty for the ground
    pub levels: Vec<LevelId>,
    pub mesh: GroundMesh,
}

/// Result of a ground rebuild.
#[derive(Debug, Clone)]
pub struct GroundGeometry {
    /// Fragments in drawing order: ground first, then bands from the
    /// shallowest to the deepest
    pub fragments: Vec<GroundFragment>,
    /// Underground bands, shallowest first
    pub bands: Vec<ElevationBand>,
    /// Rectangle covered by the elevation 0 ground patch
    pub ground_bounds: Rect,
    /// Union of everything removed from the elevation 0 ground
    pub removed_from_ground: Area,
}

impl GroundGeometry {
    pub fn fragments_of(&self, kind: FragmentKind) -> impl Iterator<Item = &GroundFragment> + '_ {
        self.fragments.iter().filter(move |f| f.kind == kind)
    }
}

/// Footprints gathered for one band before union
#[derive(Debug, Default)]
struct BandItems {
    levels: Vec<LevelId>,
    areas: Vec<Area>,
}

impl BandItems {
    fn add(&mut self, level: &Level, area: Area) {
        if !self.levels.contains(&level.id) {
            self.levels.push(level.id);
        }
        if !area.is_empty() {
            self.areas.push(area);
        }
    }
}

#[derive(Debug, Default)]
struct Collected {
    removed_from_ground: Vec<Area>,
    underground: BTreeMap<BandKey, BandItems>,
    room_areas: BTreeMap<BandKey, Vec<Area>>,
}

impl Collected {
    /// Record an area dug by an item of `level`, if the level is underground
    fn dig(&mut self, level: Option<&Level>, area: Area) {
        if let Some(level) = level.filter(|level| level.elevation < 0.0) {
            self.underground
                .entry(BandKey::new(level.elevation))
                .or_default()
                .add(level, area);
        }
    }
}

/// Builds ground geometry from plan snapshots.
#[derive(Debug, Clone, Default)]
pub struct GroundBuilder {
    config: GroundConfig,
}

impl GroundBuilder {
    pub fn new(config: GroundConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GroundConfig {
        &self.config
    }

    /// Run one rebuild pass over `plan`.
    ///
    /// Degenerate footprints are skipped. Errors only report caller
    /// defects: invalid configuration, non-finite coordinates or items
    /// referencing levels missing from the plan.
    pub fn build(&self, plan: &Plan) -> Result<GroundGeometry> {
        self.config.validate()?;
        plan.validate()?;
        if let Some(level) = plan.levels.iter().find(|l| !l.elevation.is_finite()) {
            return Err(Error::InvalidArgument(format!(
                "level {:?} has a non-finite elevation",
                level.id
            )));
        }

        let mut collected = self.collect(plan)?;
        let bands = self.carve(&mut collected);
        let removed_from_ground = Area::union_all(collected.removed_from_ground.iter());

        let texture = match &self.config.texture {
            Some(mapping) => Some(mapping.transform()?),
            None => None,
        };
        let emitter = Emitter {
            flatness: self.config.flatness,
            texture,
            origin: self
                .config
                .extent
                .map_or(Point2::origin(), |extent| extent.min),
        };

        let mut fragments = Vec::new();
        let ground_bounds = self.emit_ground(&emitter, &removed_from_ground, &mut fragments)?;

        let mut previous_elevation = 0.0f32;
        for band in &bands {
            emitter.patch(
                &mut fragments,
                FragmentKind::Floor,
                &band.floor,
                band.elevation,
                &band.levels,
            )?;
            let height = previous_elevation - band.elevation;
            if height > 0.0 {
                emitter.skirt(&mut fragments, band, height);
                emitter.patch(
                    &mut fragments,
                    FragmentKind::Lid,
                    &band.lid,
                    previous_elevation,
                    &band.levels,
                )?;
            }
            previous_elevation = band.elevation;
        }

        tracing::debug!(
            bands = bands.len(),
            fragments = fragments.len(),
            "Ground geometry built"
        );

        Ok(GroundGeometry {
            fragments,
            bands,
            ground_bounds,
            removed_from_ground,
        })
    }

    /// Gather the footprints that open the ground or dig underground levels
    fn collect(&self, plan: &Plan) -> Result<Collected> {
        let index = plan.level_index();
        let mut collected = Collected::default();
        let mut dropped = 0usize;

        for room in &plan.rooms {
            let level = index.resolve(room.level)?;
            let viewable = level.map_or(true, |level| level.viewable);
            if !(viewable && room.floor_visible && room.points.len() > 2) {
                continue;
            }
            let area = Area::from_plan_points(&room.points)?;
            if area.is_empty() {
                dropped += 1;
                continue;
            }

            let on_ground = level.map_or(true, |level| {
                level.elevation <= 0.0 && level.is_viewable_and_visible()
            });
            if on_ground {
                collected.removed_from_ground.push(area.clone());
                if let Some(level) = level.filter(|level| level.elevation < 0.0) {
                    collected
                        .room_areas
                        .entry(BandKey::new(level.elevation))
                        .or_default()
                        .push(area.clone());
                }
            }
            collected.dig(level, area);
        }

        for piece in &plan.furniture {
            let level = index.resolve(piece.level)?;
            let viewable = level.map_or(true, |level| level.viewable);
            let underground = level.map_or(false, |level| level.elevation < 0.0);
            if viewable && underground && piece.ground_elevation(level) < 0.0 {
                let area = furniture_area(piece, self.config.flatness)?;
                if area.is_empty() {
                    dropped += 1;
                }
                collected.dig(level, area);
            }
        }

        // Walls enclosing a region dig the whole region
        let mut walls: BTreeMap<BandKey, (&Level, Vec<Area>)> = BTreeMap::new();
        for wall in &plan.walls {
            let level = match index.resolve(wall.level)? {
                Some(level) if level.viewable && level.elevation < 0.0 => level,
                _ => continue,
            };
            let area = Area::from_plan_points(&wall.points)?;
            if area.is_empty() {
                dropped += 1;
                continue;
            }
            walls
                .entry(BandKey::new(level.elevation))
                .or_insert_with(|| (level, Vec::new()))
                .1
                .push(area);
        }
        for (level, areas) in walls.into_values() {
            let union = Area::union_all(areas.iter());
            for outer in union.outer_loops() {
                collected.dig(Some(level), Area::filled(outer));
            }
        }

        if dropped > 0 {
            tracing::trace!(dropped, "Degenerate footprints skipped");
        }
        tracing::debug!(
            removed = collected.removed_from_ground.len(),
            bands = collected.underground.len(),
            "Ground footprints collected"
        );
        Ok(collected)
    }

    /// Split the occupied area of each band into floor, side and lid
    fn carve(&self, collected: &mut Collected) -> Vec<ElevationBand> {
        let occupied: Vec<(BandKey, Vec<LevelId>, Area)> = std::mem::take(&mut collected.underground)
            .into_iter()
            .map(|(key, items)| (key, items.levels, Area::union_all(items.areas.iter())))
            .collect();

        let mut bands = Vec::with_capacity(occupied.len());
        for (i, (key, levels, area)) in occupied.iter().enumerate() {
            // Deeper bands dig through this one: their outer loops, holes
            // filled, are not part of this band's floor
            let deeper_outers: Vec<Area> = occupied[i + 1..]
                .iter()
                .flat_map(|(_, _, deeper)| deeper.outer_loops().map(Area::filled))
                .collect();
            let deeper = Area::union_all(deeper_outers.iter());

            let carved = area.subtract(&deeper);
            let side = area.union(&deeper);

            let mut lids = Vec::new();
            for region in carved.regions() {
                collected
                    .removed_from_ground
                    .push(Area::filled(region.outer()));
                for hole in region.holes() {
                    // Only the part of the hole the band did not occupy at start
                    lids.push(Area::filled(hole).subtract(area));
                }
            }

            let rooms = collected
                .room_areas
                .get(key)
                .map(|rooms| Area::union_all(rooms.iter()))
                .unwrap_or_default();
            let floor = carved.subtract(&rooms);

            bands.push(ElevationBand {
                levels: levels.clone(),
                elevation: key.elevation(),
                occupied: area.clone(),
                floor,
                side,
                lid: Area::union_all(lids.iter()),
            });
        }
        bands
    }

    /// Emit the elevation 0 ground, and the outside ground when an extent
    /// is configured. Returns the rectangle of the ground patch.
    fn emit_ground(
        &self,
        emitter: &Emitter,
        removed: &Area,
        fragments: &mut Vec<GroundFragment>,
    ) -> Result<Rect> {
        let padding = self.config.padding;
        let extent = self.config.extent;
        let removed_bounds = removed.bounds();

        if let (Some(extent), Some(bounds)) = (extent, removed_bounds) {
            if extent == bounds {
                let ground = Area::from_rect(&extent).subtract(removed);
                emitter.patch(fragments, FragmentKind::Ground, &ground, 0.0, &[])?;
                return Ok(extent);
            }
        }

        let ground_bounds = match (removed_bounds, extent) {
            (None, None) => Rect::new(
                Point2::new(-padding, -padding),
                Point2::new(padding, padding),
            ),
            (None, Some(extent)) => {
                let mut rect = Rect::new(
                    Point2::new(extent.min.x.max(-padding), extent.min.y.max(-padding)),
                    Point2::new(extent.min.x.max(-padding), extent.min.y.max(-padding)),
                );
                rect.add_point(&Point2::new(
                    extent.max.x.min(padding),
                    extent.max.y.min(padding),
                ));
                rect
            }
            (Some(bounds), None) => Rect::new(
                Point2::new(bounds.min.x - padding, bounds.min.y - padding),
                Point2::new(bounds.max.x + padding, bounds.max.y + padding),
            ),
            (Some(bounds), Some(extent)) => {
                let mut rect = bounds;
                rect.add_point(&Point2::new(
                    (bounds.min.x - padding).max(extent.min.x),
                    (bounds.min.y - padding).max(extent.min.y),
                ));
                rect.add_point(&Point2::new(
                    (bounds.max.x + padding).min(extent.max.x),
                    (bounds.max.y + padding).min(extent.max.y),
                ));
                rect
            }
        };

        if let Some(extent) = extent {
            // Split the large surface in two to limit rendering artifacts
            let outside = Area::from_rect(&extent).subtract(&Area::from_rect(&ground_bounds));
            emitter.patch(fragments, FragmentKind::OutsideGround, &outside, 0.0, &[])?;
        }

        let ground = Area::from_rect(&ground_bounds).subtract(removed);
        emitter.patch(fragments, FragmentKind::Ground, &ground, 0.0, &[])?;
        Ok(ground_bounds)
    }
}

/// Build ground geometry with the given configuration
pub fn build_ground(plan: &Plan, config: &GroundConfig) -> Result<GroundGeometry> {
    GroundBuilder::new(config.clone()).build(plan)
}

/// Turns areas into mesh fragments
struct Emitter {
    flatness: f64,
    texture: Option<TextureTransform>,
    /// Texture origin of horizontal patches
    origin: Point2<f64>,
}

impl Emitter {
    /// Emit a horizontal patch, holes merged, if the area is not empty
    fn patch(
        &self,
        fragments: &mut Vec<GroundFragment>,
        kind: FragmentKind,
        area: &Area,
        elevation: f32,
        levels: &[LevelId],
    ) -> Result<()> {
        let loops = area_points(area, self.flatness, false)?;
        if loops.is_empty() {
            return Ok(());
        }

        let y = elevation as f64;
        let mut mesh = GroundMesh::new(Primitive::Polygons);
        mesh.strip_counts = loops.iter().map(Vec::len).collect();
        mesh.coords = loops
            .iter()
            .flatten()
            .map(|p| Point3::new(p.x, y, p.y))
            .collect();
        if let Some(texture) = &self.texture {
            mesh.tex_coords = Some(
                loops
                    .iter()
                    .flatten()
                    .map(|p| texture.apply(Point2::new(p.x - self.origin.x, self.origin.y - p.y)))
                    .collect(),
            );
        }

        fragments.push(GroundFragment {
            kind,
            elevation,
            height: 0.0,
            levels: levels.to_vec(),
            mesh,
        });
        Ok(())
    }

    /// Emit the vertical quads along every side loop of a band
    fn skirt(&self, fragments: &mut Vec<GroundFragment>, band: &ElevationBand, height: f32) {
        let bottom = band.elevation as f64;
        let top = bottom + height as f64;

        let mut mesh = GroundMesh::new(Primitive::Quads);
        let mut tex_coords = Vec::new();
        for polygon in band.side.loops() {
            let points = polygon.points();
            for (i, point) in points.iter().enumerate() {
                let next = points[(i + 1) % points.len()];
                mesh.coords.extend([
                    Point3::new(point.x, bottom, point.y),
                    Point3::new(point.x, top, point.y),
                    Point3::new(next.x, top, next.y),
                    Point3::new(next.x, bottom, next.y),
                ]);
                if let Some(texture) = &self.texture {
                    let distance = (next - point).norm();
                    tex_coords.extend([
                        texture.apply(Point2::new(point.x, bottom)),
                        texture.apply(Point2::new(point.x, top)),
                        texture.apply(Point2::new(point.x - distance, top)),
                        texture.apply(Point2::new(point.x - distance, bottom)),
                    ]);
                }
            }
            mesh.strip_counts.push(points.len() * 4);
        }
        if mesh.is_empty() {
            return;
        }
        if self.texture.is_some() {
            mesh.tex_coords = Some(tex_coords);
        }

        fragments.push(GroundFragment {
            kind: FragmentKind::Skirt,
            elevation: band.elevation,
            height,
            levels: band.levels.clone(),
            mesh,
        });
    }
}
