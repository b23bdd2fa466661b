pub mod components;
pub mod events;
pub mod resources;
pub mod systems;
pub mod ui;
mod logic;

use crate::planet::events::*;
use crate::planet::resources::*;
use crate::planet::systems::*;
use crate::planet::ui::systems::render_planet_ui;
use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

pub struct PlanetPlugin;

impl Plugin for PlanetPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<RequestLevelEvent>()
            .add_message::<GenerateNewSeedEvent>()
            .add_message::<RegeneratePlanetEvent>()
            .init_resource::<ViewerSettings>()
            .init_resource::<PlanetBuild>()
            .init_resource::<PlanetStats>()
            .add_systems(Startup, request_initial_level)
            .add_systems(EguiPrimaryContextPass, render_planet_ui)
            .add_systems(
                Update,
                (
                    handle_generate_new_seed,
                    handle_regenerate,
                    start_level_builds,
                    poll_level_builds,
                    planet_control,
                )
                    .chain(),
            );
    }
}
