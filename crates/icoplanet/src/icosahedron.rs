use crate::error::PlanetError;
use crate::level::MeshLevel;
use crate::mesh::{Edge, Face, Point, link_face_to_edges};
use glam::Vec3;
use std::f32::consts::PI;

// Edges are laid out band by band so the face table below stays readable:
// 5 around the top pole, the top ring, the middle zigzag, the bottom ring,
// then 5 around the bottom pole.
const EDGES: [[usize; 2]; 30] = [
    [0, 1], [0, 2], [0, 3], [0, 4], [0, 5],
    [1, 2], [2, 3], [3, 4], [4, 5], [5, 1],
    [6, 1], [1, 7], [7, 2], [2, 8], [8, 3], [3, 9], [9, 4], [4, 10], [10, 5], [5, 6],
    [6, 7], [7, 8], [8, 9], [9, 10], [10, 6],
    [11, 6], [11, 7], [11, 8], [11, 9], [11, 10],
];

// (points, edges); points are clockwise seen from outside
const FACES: [([usize; 3], [usize; 3]); 20] = [
    // top cap
    ([2, 1, 0], [0, 1, 5]),
    ([3, 2, 0], [1, 2, 6]),
    ([4, 3, 0], [2, 3, 7]),
    ([5, 4, 0], [3, 4, 8]),
    ([1, 5, 0], [4, 0, 9]),
    // middle band
    ([7, 6, 1], [20, 10, 11]),
    ([7, 1, 2], [5, 11, 12]),
    ([8, 7, 2], [21, 12, 13]),
    ([8, 2, 3], [6, 13, 14]),
    ([9, 8, 3], [22, 14, 15]),
    ([9, 3, 4], [7, 15, 16]),
    ([10, 9, 4], [23, 16, 17]),
    ([10, 4, 5], [8, 17, 18]),
    ([6, 10, 5], [24, 18, 19]),
    ([6, 5, 1], [9, 19, 10]),
    // bottom cap
    ([6, 7, 11], [25, 26, 20]),
    ([7, 8, 11], [26, 27, 21]),
    ([8, 9, 11], [27, 28, 22]),
    ([9, 10, 11], [28, 29, 23]),
    ([10, 6, 11], [29, 25, 24]),
];

/// The 12 icosahedron vertices: top pole, top ring, bottom ring, bottom pole.
pub fn vertices(radius: f32) -> [Vec3; 12] {
    let latitude = 0.5_f32.atan();
    let ring_height = radius * latitude.sin();
    let ring_radius = radius * latitude.cos();
    let step = PI / 5.0; // 36 degrees

    let mut out = [Vec3::ZERO; 12];
    out[0] = Vec3::new(0.0, 0.0, radius);
    out[11] = Vec3::new(0.0, 0.0, -radius);
    for k in 0..5 {
        let top = step * (2 * k) as f32;
        let bottom = step * (2 * k as i32 - 1) as f32;
        out[1 + k] = Vec3::new(ring_radius * top.cos(), ring_radius * top.sin(), ring_height);
        out[6 + k] = Vec3::new(
            ring_radius * bottom.cos(),
            ring_radius * bottom.sin(),
            -ring_height,
        );
    }
    out
}

/// Build the level-0 mesh. Returns the initial point array with it.
pub fn generate(radius: f32) -> Result<(Vec<Point>, MeshLevel), PlanetError> {
    let points: Vec<Point> = vertices(radius).into_iter().map(Point::new).collect();
    let mut edges: Vec<Edge> = EDGES.iter().map(|&[a, b]| Edge::new(a, b)).collect();
    let mut faces = Vec::with_capacity(FACES.len());

    for (id, &(face_points, face_edges)) in FACES.iter().enumerate() {
        let face = Face::new(face_points, face_edges);
        link_face_to_edges(&mut edges, id, &face)?;
        faces.push(face);
    }

    let level = MeshLevel::new(0, edges, faces, points.len());
    Ok((points, level))
}
