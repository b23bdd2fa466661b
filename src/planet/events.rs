use bevy::prelude::*;

/// Show the level currently selected in the settings, building it if needed.
#[derive(Message)]
pub struct RequestLevelEvent;

#[derive(Message)]
pub struct GenerateNewSeedEvent;

/// Throw away every level and rebuild with the current seed and density.
#[derive(Message)]
pub struct RegeneratePlanetEvent;
