use crate::error::PlanetError;
use crate::level::MeshLevel;
use crate::mesh::{Edge, EdgeSplit, Face, Point, link_face_to_edges};

/// Split every edge at its midpoint and every face into four.
///
/// Midpoints are appended to `points` and pushed back out to `radius`. The
/// parent records its lineage (edge midpoints, sub-edges, sub-faces) so the
/// fault and plate passes can map parent features onto the child level.
///
/// # Errors
/// Any face whose edges cannot be matched by endpoints means the parent is
/// corrupted; the child level is abandoned.
pub fn subdivide(
    parent: &mut MeshLevel,
    points: &mut Vec<Point>,
    radius: f32,
) -> Result<MeshLevel, PlanetError> {
    let mut edges = Vec::with_capacity(parent.edges.len() * 2 + parent.faces.len() * 3);
    let mut faces = Vec::with_capacity(parent.faces.len() * 4);

    for edge in parent.edges.iter_mut() {
        let [a, b] = edge.points;
        let mid = (points[a].position + points[b].position) * 0.5;
        let midpoint = points.len();
        points.push(Point::new(mid * (radius / mid.length())));

        let first = edges.len();
        edges.push(Edge::new(a, midpoint));
        edges.push(Edge::new(b, midpoint));
        edge.split = Some(EdgeSplit {
            midpoint,
            children: [first, first + 1],
        });
    }

    for (id, face) in parent.faces.iter_mut().enumerate() {
        let [p0, p1, p2] = face.points;
        let [e01, e12, e20] = face.edges_by_points(id, &parent.edges)?;
        let m01 = parent.edges[e01].midpoint(e01)?;
        let m12 = parent.edges[e12].midpoint(e12)?;
        let m20 = parent.edges[e20].midpoint(e20)?;
        let sub = |e: usize, p: usize| parent.edges[e].sub_edge_touching(e, p);

        let inner = edges.len();
        edges.push(Edge::new(m01, m20));
        edges.push(Edge::new(m12, m01));
        edges.push(Edge::new(m20, m12));

        let children = [
            Face::new([p0, m01, m20], [sub(e01, p0)?, sub(e20, p0)?, inner]),
            Face::new([p1, m12, m01], [sub(e01, p1)?, sub(e12, p1)?, inner + 1]),
            Face::new([p2, m20, m12], [sub(e12, p2)?, sub(e20, p2)?, inner + 2]),
            Face::new([m01, m12, m20], [inner, inner + 1, inner + 2]),
        ];

        let first = faces.len();
        for child in children {
            link_face_to_edges(&mut edges, faces.len(), &child)?;
            faces.push(child);
        }
        face.children = Some([first, first + 1, first + 2, first + 3]);
    }

    Ok(MeshLevel::new(parent.depth + 1, edges, faces, points.len()))
}
