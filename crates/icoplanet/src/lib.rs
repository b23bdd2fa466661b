//! Icosphere levels of detail with seeded fault lines and plate coloring.
//!
//! [`Planet`] is the entry point: it builds level 0 on construction and every
//! finer level on first request, returning flat [`MeshData`] buffers.

pub mod config;
pub mod error;
pub mod fault;
pub mod icosahedron;
pub mod level;
pub mod mesh;
pub mod mesh_data;
pub mod planet;
pub mod plates;
pub mod random;
pub mod subdivide;
pub mod tectonics;

pub use config::{PlanetGenConfig, get_config, reload_config};
pub use error::{PlanetError, TopologyError};
pub use fault::{FaceKind, FaultGraph, FaultLink};
pub use level::MeshLevel;
pub use mesh_data::MeshData;
pub use planet::{Planet, PlanetSettings};
pub use random::{RandomSource, expand_seed, generate_seed};
