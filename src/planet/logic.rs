use std::sync::atomic::AtomicBool;

use bevy::asset::RenderAssetUsages;
use bevy::math::Vec3;
use bevy::mesh::{Indices, Mesh, PrimitiveTopology};
use icoplanet::{MeshData, Planet, PlanetError, PlanetGenConfig};

use crate::planet::resources::{PlanetStats, ViewerSettings};

#[derive(Debug, Clone, PartialEq)]
pub struct BuildRequest {
    pub seed: u64,
    pub node_density: f32,
    pub depth: usize,
}

impl BuildRequest {
    pub fn from_settings(settings: &ViewerSettings) -> Self {
        Self {
            seed: settings.seed,
            node_density: settings.node_density,
            depth: settings.lod,
        }
    }
}

pub struct BuildOutcome {
    /// Handed back so the next request can reuse its cached levels
    pub planet: Option<Planet>,
    pub request: BuildRequest,
    pub result: Result<(MeshData, PlanetStats), PlanetError>,
}

/// Bring `planet` up to the requested level, replacing it when it was built
/// from a different seed or density.
pub fn build_level(
    planet: Option<Planet>,
    config: &PlanetGenConfig,
    request: BuildRequest,
    cancel: &AtomicBool,
) -> BuildOutcome {
    let planet = match planet {
        Some(p)
            if p.seed() == request.seed
                && p.settings().node_density == request.node_density =>
        {
            Ok(p)
        }
        _ => {
            let mut config = config.clone();
            config.generation.node_density = request.node_density;
            Planet::from_config(&config, request.seed)
        }
    };
    let mut planet = match planet {
        Ok(planet) => planet,
        Err(err) => {
            return BuildOutcome {
                planet: None,
                request,
                result: Err(err),
            };
        }
    };

    let result = planet
        .build_to(request.depth, Some(cancel))
        .and_then(|_| planet.request_level(request.depth))
        .map(|data| {
            let stats = stats_for(&planet, request.depth);
            (data, stats)
        });
    BuildOutcome {
        planet: Some(planet),
        request,
        result,
    }
}

pub fn stats_for(planet: &Planet, depth: usize) -> PlanetStats {
    let Some(level) = planet.level(depth) else {
        return PlanetStats::default();
    };
    PlanetStats {
        depth,
        faces: level.faces.len(),
        fault_links: level.faults.len(),
        fault_edges: level.fault_edge_count(),
        plates: planet.plate_count(depth).unwrap_or(0),
    }
}

/// Generated faces wind clockwise seen from outside; Bevy culls those.
pub fn counter_clockwise(indices: &[u32]) -> Vec<u32> {
    indices
        .chunks_exact(3)
        .flat_map(|tri| [tri[0], tri[2], tri[1]])
        .collect()
}

/// On a sphere the outward normal is just the normalized position.
pub fn sphere_normals(positions: &[[f32; 3]]) -> Vec<[f32; 3]> {
    positions
        .iter()
        .map(|p| Vec3::from_array(*p).normalize_or_zero().to_array())
        .collect()
}

pub fn planet_mesh(data: MeshData) -> Mesh {
    let normals = sphere_normals(&data.positions);
    let indices = counter_clockwise(&data.indices);

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, data.positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, data.uvs);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, data.colors);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}
