//! The LOD store: owns the shared point array and every level built so far.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::{PlanetGenConfig, UvAtlasConfig};
use crate::error::PlanetError;
use crate::icosahedron;
use crate::level::MeshLevel;
use crate::mesh::{Color, Point};
use crate::mesh_data::MeshData;
use crate::plates::{count_plates, fill_plates, inherit_midpoint_colors};
use crate::random::level_rng;
use crate::subdivide::subdivide;
use crate::tectonics::{refine_faults, seed_faults};

#[derive(Debug, Clone, PartialEq)]
pub struct PlanetSettings {
    pub radius: f32,
    pub seed: u64,
    pub node_density: f32,
    pub max_depth: usize,
}

impl PlanetSettings {
    pub fn from_config(config: &PlanetGenConfig, seed: u64) -> Self {
        Self {
            radius: config.generation.radius,
            seed,
            node_density: config.generation.node_density,
            max_depth: config.generation.max_depth,
        }
    }

    pub fn validate(&self) -> Result<(), PlanetError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(PlanetError::InvalidRadius(self.radius));
        }
        if !(self.node_density > 0.0 && self.node_density < 1.0) {
            return Err(PlanetError::InvalidNodeDensity(self.node_density));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Planet {
    settings: PlanetSettings,
    atlas: UvAtlasConfig,
    default_color: Color,
    points: Vec<Point>,
    levels: Vec<MeshLevel>,
    reached_depth: usize,
    /// Set by a reseed until the next successful build restores `reached_depth`.
    rebuild_pending: bool,
}

impl Planet {
    /// Validate the settings and build level 0.
    pub fn new(settings: PlanetSettings) -> Result<Self, PlanetError> {
        let config = PlanetGenConfig::default();
        Self::with_style(settings, config.uv_atlas, config.colors.default_color)
    }

    pub fn from_config(config: &PlanetGenConfig, seed: u64) -> Result<Self, PlanetError> {
        Self::with_style(
            PlanetSettings::from_config(config, seed),
            config.uv_atlas.clone(),
            config.colors.default_color,
        )
    }

    pub fn with_style(
        settings: PlanetSettings,
        atlas: UvAtlasConfig,
        default_color: Color,
    ) -> Result<Self, PlanetError> {
        settings.validate()?;
        let (points, level) = build_base(&settings)?;
        Ok(Self {
            settings,
            atlas,
            default_color,
            points,
            levels: vec![level],
            reached_depth: 0,
            rebuild_pending: false,
        })
    }

    pub fn settings(&self) -> &PlanetSettings {
        &self.settings
    }

    pub fn seed(&self) -> u64 {
        self.settings.seed
    }

    /// Deepest level requested so far. Survives a reseed.
    pub fn reached_depth(&self) -> usize {
        self.reached_depth
    }

    pub fn built_depth(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    pub fn level(&self, depth: usize) -> Option<&MeshLevel> {
        self.levels.get(depth)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Render buffers for `depth`, building any missing levels first. The first
    /// request after a reseed also rebuilds everything up to the old `reached_depth`.
    pub fn request_level(&mut self, depth: usize) -> Result<MeshData, PlanetError> {
        self.build_to(depth, None)?;
        Ok(MeshData::from_level(
            &self.levels[depth],
            &self.points,
            &self.atlas,
            self.default_color,
        ))
    }

    /// Build every level up to `depth`.
    ///
    /// `cancel` is polled between build phases. A failed or cancelled level is
    /// rolled back entirely; levels finished before it are kept. After a reseed
    /// the target is raised to `reached_depth` until one build succeeds.
    pub fn build_to(
        &mut self,
        depth: usize,
        cancel: Option<&AtomicBool>,
    ) -> Result<(), PlanetError> {
        if depth > self.settings.max_depth {
            return Err(PlanetError::DepthOutOfRange {
                requested: depth,
                max: self.settings.max_depth,
            });
        }
        let target = if self.rebuild_pending {
            depth.max(self.reached_depth)
        } else {
            depth
        };
        while self.levels.len() <= target {
            if let Err(err) = self.build_next(cancel) {
                self.roll_back();
                return Err(err);
            }
        }
        self.reached_depth = self.reached_depth.max(depth);
        self.rebuild_pending = false;
        Ok(())
    }

    /// Drop every level and rebuild level 0 from `seed`. Radius and density are kept.
    /// On failure the planet is left as it was.
    pub fn change_seed(&mut self, seed: u64) -> Result<(), PlanetError> {
        let settings = PlanetSettings {
            seed,
            ..self.settings.clone()
        };
        settings.validate()?;
        let (points, level) = build_base(&settings)?;
        self.settings = settings;
        self.points = points;
        self.levels = vec![level];
        self.rebuild_pending = true;
        Ok(())
    }

    /// Positions of the points a level's faces index into, for indexed rendering
    /// with [`MeshLevel::face_indices`].
    pub fn shared_positions(&self, depth: usize) -> Option<Vec<[f32; 3]>> {
        let level = self.levels.get(depth)?;
        Some(
            self.points[..level.point_count]
                .iter()
                .map(|p| p.position.to_array())
                .collect(),
        )
    }

    pub fn plate_count(&self, depth: usize) -> Option<usize> {
        let level = self.levels.get(depth)?;
        Some(count_plates(&self.points[..level.point_count]))
    }

    fn build_next(&mut self, cancel: Option<&AtomicBool>) -> Result<(), PlanetError> {
        let check = || match cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(PlanetError::Cancelled),
            _ => Ok(()),
        };
        check()?;
        let Some(parent) = self.levels.last_mut() else {
            let (points, level) = build_base(&self.settings)?;
            self.points = points;
            self.levels = vec![level];
            return Ok(());
        };

        let mut child = subdivide(parent, &mut self.points, self.settings.radius)?;
        check()?;
        let mut rng = level_rng(self.settings.seed, child.depth);
        refine_faults(parent, &mut child, &mut rng)?;
        check()?;
        inherit_midpoint_colors(parent, &mut self.points);
        fill_plates(&child, &mut self.points, &mut rng);

        log_level(&child);
        self.levels.push(child);
        Ok(())
    }

    /// Forget a half-built level: its points and the lineage it left on the parent.
    fn roll_back(&mut self) {
        if let Some(parent) = self.levels.last_mut() {
            self.points.truncate(parent.point_count);
            parent.clear_lineage();
            log::warn!("discarded partial level {}", parent.depth + 1);
        }
    }
}

fn build_base(settings: &PlanetSettings) -> Result<(Vec<Point>, MeshLevel), PlanetError> {
    let (mut points, mut level) = icosahedron::generate(settings.radius)?;
    let mut rng = level_rng(settings.seed, 0);
    seed_faults(&mut level, &mut rng, settings.node_density)?;
    fill_plates(&level, &mut points, &mut rng);
    log_level(&level);
    Ok((points, level))
}

fn log_level(level: &MeshLevel) {
    log::info!(
        "built level {}: {} points, {} edges, {} faces, {} fault links",
        level.depth,
        level.point_count,
        level.edges.len(),
        level.faces.len(),
        level.faults.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn settings(seed: u64) -> PlanetSettings {
        PlanetSettings {
            radius: 1.0,
            seed,
            node_density: 0.15,
            max_depth: 5,
        }
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f32::NAN)]
    #[case(f32::INFINITY)]
    fn bad_radius_is_rejected(#[case] radius: f32) {
        let settings = PlanetSettings {
            radius,
            ..settings(1)
        };
        assert!(matches!(Planet::new(settings), Err(PlanetError::InvalidRadius(_))));
    }

    #[rstest]
    #[case(0.0)]
    #[case(1.0)]
    #[case(-0.2)]
    #[case(f32::NAN)]
    fn bad_density_is_rejected(#[case] node_density: f32) {
        let settings = PlanetSettings {
            node_density,
            ..settings(1)
        };
        assert!(matches!(
            Planet::new(settings),
            Err(PlanetError::InvalidNodeDensity(_))
        ));
    }

    #[test]
    fn levels_are_built_lazily_and_cached() {
        let mut planet = Planet::new(settings(42)).unwrap();
        assert_eq!(planet.built_depth(), 0);
        planet.request_level(2).unwrap();
        assert_eq!(planet.built_depth(), 2);
        assert_eq!(planet.reached_depth(), 2);

        let faults = planet.level(1).unwrap().faults.fault_edges().to_vec();
        planet.request_level(1).unwrap();
        assert_eq!(planet.built_depth(), 2);
        assert_eq!(planet.level(1).unwrap().faults.fault_edges(), &faults[..]);
        assert_eq!(planet.reached_depth(), 2);
    }

    #[test]
    fn depth_beyond_maximum_is_rejected() {
        let mut planet = Planet::new(settings(1)).unwrap();
        assert_eq!(
            planet.request_level(6),
            Err(PlanetError::DepthOutOfRange { requested: 6, max: 5 })
        );
        assert_eq!(planet.built_depth(), 0);
    }

    #[test]
    fn cancelled_build_leaves_no_partial_level() {
        let mut planet = Planet::new(settings(7)).unwrap();
        planet.request_level(1).unwrap();
        let points = planet.points().len();

        let cancel = AtomicBool::new(true);
        assert_eq!(planet.build_to(3, Some(&cancel)), Err(PlanetError::Cancelled));
        assert_eq!(planet.built_depth(), 1);
        assert_eq!(planet.points().len(), points);
        assert_eq!(planet.reached_depth(), 1);

        cancel.store(false, Ordering::Relaxed);
        planet.build_to(3, Some(&cancel)).unwrap();
        assert_eq!(planet.built_depth(), 3);
    }

    #[test]
    fn failed_build_is_rolled_back() {
        let mut planet = Planet::new(settings(3)).unwrap();
        let points = planet.points().len();
        // a face pointing at an edge it does not own corrupts level 0
        planet.levels[0].faces[3].edges[0] = planet.levels[0].faces[15].edges[0];
        assert!(matches!(planet.request_level(1), Err(PlanetError::Topology(_))));
        assert_eq!(planet.points().len(), points);
        assert_eq!(planet.built_depth(), 0);
        assert!(planet.level(0).unwrap().edges.iter().all(|e| e.split.is_none()));
    }

    #[test]
    fn reseeding_rebuilds_from_level_zero() {
        let mut planet = Planet::new(settings(1)).unwrap();
        planet.request_level(2).unwrap();
        let base: Vec<_> = planet.points()[..12].iter().map(|p| p.position).collect();

        planet.change_seed(2).unwrap();
        assert_eq!(planet.seed(), 2);
        assert_eq!(planet.built_depth(), 0);
        assert_eq!(planet.reached_depth(), 2);
        assert_eq!(planet.points().len(), 12);
        let rebuilt: Vec<_> = planet.points().iter().map(|p| p.position).collect();
        assert_eq!(base, rebuilt);
    }

    #[test]
    fn first_request_after_reseed_restores_reached_depth() {
        let mut planet = Planet::new(settings(1)).unwrap();
        planet.request_level(3).unwrap();
        planet.change_seed(2).unwrap();

        planet.request_level(1).unwrap();
        assert_eq!(planet.built_depth(), 3);
        assert_eq!(planet.reached_depth(), 3);

        // later requests only build what they ask for
        planet.change_seed(4).unwrap();
        planet.request_level(0).unwrap();
        assert_eq!(planet.built_depth(), 3);
        planet.change_seed(5).unwrap();
        assert_eq!(planet.built_depth(), 0);
    }

    #[test]
    fn cancelled_rebuild_after_reseed_is_retried() {
        let mut planet = Planet::new(settings(8)).unwrap();
        planet.request_level(2).unwrap();
        planet.change_seed(9).unwrap();

        assert_eq!(
            planet.build_to(0, Some(&AtomicBool::new(true))),
            Err(PlanetError::Cancelled)
        );
        assert_eq!(planet.built_depth(), 0);
        planet.request_level(0).unwrap();
        assert_eq!(planet.built_depth(), 2);
    }

    #[test]
    fn failed_reseed_keeps_the_old_planet() {
        let mut planet = Planet::new(settings(12)).unwrap();
        planet.request_level(2).unwrap();
        let points = planet.points().to_vec();

        planet.settings.radius = f32::NAN;
        assert!(matches!(planet.change_seed(13), Err(PlanetError::InvalidRadius(_))));
        assert_eq!(planet.seed(), 12);
        assert_eq!(planet.built_depth(), 2);
        assert_eq!(planet.points(), &points[..]);
    }

    #[test]
    fn empty_store_reports_depth_zero() {
        let mut planet = Planet::new(settings(14)).unwrap();
        planet.levels.clear();
        assert_eq!(planet.built_depth(), 0);
        planet.request_level(1).unwrap();
        assert_eq!(planet.built_depth(), 1);
    }

    #[test]
    fn shared_view_matches_face_indices() {
        let mut planet = Planet::new(settings(5)).unwrap();
        planet.request_level(2).unwrap();
        let positions = planet.shared_positions(1).unwrap();
        let level = planet.level(1).unwrap();
        assert_eq!(positions.len(), 42);
        assert!(level.face_indices().iter().all(|&i| (i as usize) < positions.len()));
        assert!(planet.shared_positions(3).is_none());
    }

    #[test]
    fn plate_count_is_stable_per_level() {
        let mut planet = Planet::new(settings(11)).unwrap();
        planet.request_level(2).unwrap();
        let plates = planet.plate_count(0).unwrap();
        assert!(plates >= 2);
        // refinement only adds plates where a fault edge cut off a new pocket
        assert!(planet.plate_count(2).unwrap() >= plates);
    }

    #[test]
    fn config_supplies_style_and_settings() {
        let mut config = PlanetGenConfig::default();
        config.colors.default_color = [0.5, 0.5, 0.5, 1.0];
        config.generation.radius = 4.0;
        let planet = Planet::from_config(&config, 9).unwrap();
        assert_eq!(planet.settings().radius, 4.0);
        assert_eq!(planet.settings().seed, 9);
        assert!((planet.points()[0].position.length() - 4.0).abs() < 1e-4);
    }
}
