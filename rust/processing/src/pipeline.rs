// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ground rebuild pass with fragment triangulation.

use crate::config::Config;
use crate::error::Result;
use crate::types::{FragmentData, FragmentKindData, GroundData, RebuildStats};
use home3d_core::Plan;
use home3d_geometry::{GroundBuilder, GroundFragment};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Rebuild the ground of `plan` and triangulate every fragment.
pub fn rebuild_ground(plan: &Plan, config: &Config) -> Result<GroundData> {
    rebuild(plan, config, 0)
}

/// Rebuild from a JSON plan snapshot and return the ground as JSON.
pub fn rebuild_ground_json(plan_json: &str, config: &Config) -> Result<String> {
    let plan: Plan = serde_json::from_str(plan_json)?;
    let data = rebuild_ground(&plan, config)?;
    Ok(data.to_json()?)
}

fn rebuild(plan: &Plan, config: &Config, generation: u64) -> Result<GroundData> {
    let total_start = std::time::Instant::now();

    tracing::info!(
        generation,
        levels = plan.levels.len(),
        rooms = plan.rooms.len(),
        walls = plan.walls.len(),
        furniture = plan.furniture.len(),
        "Starting ground rebuild"
    );

    plan.validate()?;

    let build_start = std::time::Instant::now();
    let geometry = GroundBuilder::new(config.to_ground_config()).build(plan)?;
    let build_time = build_start.elapsed();

    let mut kinds: FxHashMap<FragmentKindData, usize> = FxHashMap::default();
    for fragment in &geometry.fragments {
        *kinds.entry(fragment.kind.into()).or_default() += 1;
    }
    tracing::debug!(
        fragments = geometry.fragments.len(),
        kinds = ?kinds,
        build_time_ms = build_time.as_millis(),
        "Ground geometry built, starting triangulation"
    );

    // Fragments are independent, triangulate them in parallel
    let triangulation_start = std::time::Instant::now();
    let fragments: Vec<FragmentData> = geometry
        .fragments
        .par_iter()
        .map(fragment_data)
        .collect::<Result<Vec<_>>>()?;
    let triangulation_time = triangulation_start.elapsed();

    let stats = RebuildStats {
        band_count: geometry.bands.len(),
        fragment_count: fragments.len(),
        vertex_count: fragments.iter().map(FragmentData::vertex_count).sum(),
        triangle_count: fragments.iter().map(FragmentData::triangle_count).sum(),
        build_time_ms: build_time.as_millis() as u64,
        triangulation_time_ms: triangulation_time.as_millis() as u64,
        total_time_ms: total_start.elapsed().as_millis() as u64,
    };

    tracing::info!(
        generation,
        bands = stats.band_count,
        fragments = stats.fragment_count,
        triangles = stats.triangle_count,
        total_time_ms = stats.total_time_ms,
        "Ground rebuild complete"
    );

    let bounds = geometry.ground_bounds;
    Ok(GroundData {
        generation,
        ground_bounds: [bounds.min.x, bounds.min.y, bounds.max.x, bounds.max.y],
        band_elevations: geometry.bands.iter().map(|band| band.elevation).collect(),
        fragments,
        stats,
    })
}

fn fragment_data(fragment: &GroundFragment) -> Result<FragmentData> {
    let mesh = fragment.mesh.triangulate()?;
    Ok(FragmentData::new(
        fragment.kind.into(),
        fragment.elevation,
        fragment.height,
        fragment.levels.iter().map(|level| level.0).collect(),
        mesh,
    ))
}

/// Rebuilds the ground of one scene and stamps each result with a
/// generation, so hosts can drop the results of superseded rebuilds.
///
/// Rebuilds may run on any thread. Two rebuilds of one scene should not be
/// interleaved; when they are, only the latest started is current.
#[derive(Debug, Default)]
pub struct GroundRebuilder {
    config: Config,
    generation: AtomicU64,
}

impl GroundRebuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            generation: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generation of the latest rebuild started, 0 before any.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Start a new rebuild, superseding the previous ones.
    pub fn rebuild(&self, plan: &Plan) -> Result<GroundData> {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        rebuild(plan, &self.config, generation)
    }

    /// Whether `data` comes from the latest rebuild started.
    pub fn is_current(&self, data: &GroundData) -> bool {
        data.generation == self.generation()
    }
}
