use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bevy::prelude::Resource;
use bevy::tasks::Task;
use icoplanet::Planet;

use crate::planet::logic::BuildOutcome;

#[derive(Resource, Clone)]
pub struct ViewerSettings {
    pub radius: f32,
    pub user_seed: u32,
    pub seed: u64,
    pub node_density: f32,
    pub lod: usize,
    pub max_depth: usize,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        let config = icoplanet::get_config();
        let user_seed = icoplanet::generate_seed();
        Self {
            radius: config.generation.radius,
            user_seed,
            seed: icoplanet::expand_seed(user_seed),
            node_density: config.generation.node_density,
            lod: config.generation.initial_depth.min(config.generation.max_depth),
            max_depth: config.generation.max_depth,
        }
    }
}

/// The planet and the background build working on it.
///
/// While a task runs it owns the planet; `planet` is `None` until the task hands it back.
#[derive(Resource, Default)]
pub struct PlanetBuild {
    pub planet: Option<Planet>,
    pub task: Option<Task<BuildOutcome>>,
    pub cancel: Arc<AtomicBool>,
    /// Settings changed while a task was running
    pub dirty: bool,
}

impl PlanetBuild {
    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Ask the running task to stop at its next checkpoint.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Stop and forget the running task and its planet.
    pub fn discard(&mut self) {
        self.cancel();
        self.task = None;
        self.planet = None;
    }
}

/// What the panel shows about the level on screen.
#[derive(Resource, Default, Clone, PartialEq)]
pub struct PlanetStats {
    pub depth: usize,
    pub faces: usize,
    pub fault_links: usize,
    pub fault_edges: usize,
    pub plates: usize,
}
