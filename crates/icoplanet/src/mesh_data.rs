use crate::config::{UvAtlasConfig, UvTriangle};
use crate::fault::FaceKind;
use crate::level::MeshLevel;
use crate::mesh::{Color, Point};

/// Flat render buffers for one level. Vertices are not shared between faces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub uvs: Vec<[f32; 2]>,
    pub colors: Vec<[f32; 4]>,
}

impl MeshData {
    pub fn from_level(
        level: &MeshLevel,
        points: &[Point],
        atlas: &UvAtlasConfig,
        default_color: Color,
    ) -> Self {
        let vertices = level.faces.len() * 3;
        let mut data = Self {
            positions: Vec::with_capacity(vertices),
            indices: (0..vertices as u32).collect(),
            uvs: Vec::with_capacity(vertices),
            colors: Vec::with_capacity(vertices),
        };

        for face in &level.faces {
            let uvs = face_uvs(atlas, face.kind);
            for (corner, &p) in face.points.iter().enumerate() {
                let point = &points[p];
                data.positions.push(point.position.to_array());
                data.uvs.push(uvs[corner]);
                data.colors.push(point.plate.unwrap_or(default_color));
            }
        }
        data
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Per-corner UVs for a face. A link's atlas tip lands on its apex corner so
/// the drawn segment runs between the two crossed edges.
fn face_uvs(atlas: &UvAtlasConfig, kind: FaceKind) -> UvTriangle {
    match kind {
        FaceKind::Plain => atlas.plain,
        FaceKind::Intersection => atlas.intersection,
        FaceKind::Link { apex } => {
            std::array::from_fn(|corner| atlas.link[(corner + 3 - apex) % 3])
        }
    }
}
