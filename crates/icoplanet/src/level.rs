use crate::error::{PlanetError, TopologyError};
use crate::fault::{FaceKind, FaultGraph};
use crate::mesh::{Edge, EdgeId, Face, FaceId, LinkId, shared_edge};

/// One subdivision depth: its own edges, faces and fault graph.
#[derive(Debug, Clone)]
pub struct MeshLevel {
    pub depth: usize,
    pub edges: Vec<Edge>,
    pub faces: Vec<Face>,
    pub faults: FaultGraph,
    /// Size of the shared point array right after this level was built
    pub point_count: usize,
}

impl MeshLevel {
    pub fn new(depth: usize, edges: Vec<Edge>, faces: Vec<Face>, point_count: usize) -> Self {
        Self {
            depth,
            edges,
            faces,
            faults: FaultGraph::default(),
            point_count,
        }
    }

    pub fn euler_characteristic(&self) -> i64 {
        self.point_count as i64 - self.edges.len() as i64 + self.faces.len() as i64
    }

    /// Faces across each of `face`'s edges.
    pub fn adjacent_faces(&self, face: FaceId) -> Result<[FaceId; 3], TopologyError> {
        let edges = self.faces[face].edges;
        let across = |e: EdgeId| {
            self.edges[e]
                .other_face(face)
                .ok_or(TopologyError::OpenEdge { edge: e })
        };
        Ok([across(edges[0])?, across(edges[1])?, across(edges[2])?])
    }

    pub fn shared_edge(&self, a: FaceId, b: FaceId) -> Result<EdgeId, TopologyError> {
        shared_edge(&self.faces, &self.edges, a, b)
    }

    /// Faces as triples of indices into the shared point array.
    pub fn face_indices(&self) -> Vec<u32> {
        self.faces
            .iter()
            .flat_map(|face| face.points.map(|p| p as u32))
            .collect()
    }

    pub fn fault_edge_count(&self) -> usize {
        self.faults.fault_edges().len()
    }

    pub fn link_on(&self, face: FaceId) -> Option<LinkId> {
        self.faces[face].link
    }

    pub fn add_link(&mut self, face: FaceId) -> LinkId {
        self.faults.add_link(&mut self.faces, face)
    }

    pub fn link_or_create(&mut self, face: FaceId) -> LinkId {
        match self.faces[face].link {
            Some(link) => link,
            None => self.add_link(face),
        }
    }

    pub fn connect_links(&mut self, a: LinkId, b: LinkId) -> Result<(), PlanetError> {
        self.faults.connect(a, b, &self.faces, &mut self.edges)
    }

    /// Record each face's draw classification. Runs once the fault graph is final.
    pub fn classify_faces(&mut self) -> Result<(), PlanetError> {
        let kinds = (0..self.faces.len())
            .map(|face| self.faults.classify(&self.faces, &self.edges, face))
            .collect::<Result<Vec<FaceKind>, PlanetError>>()?;
        for (face, kind) in self.faces.iter_mut().zip(kinds) {
            face.kind = kind;
        }
        Ok(())
    }

    /// Forget the split records left by a subdivision that was abandoned.
    pub fn clear_lineage(&mut self) {
        for edge in &mut self.edges {
            edge.split = None;
        }
        for face in &mut self.faces {
            face.children = None;
        }
    }

    /// Check every face/edge cross-reference and that the mesh is closed.
    pub fn validate_topology(&self) -> Result<(), TopologyError> {
        for (id, face) in self.faces.iter().enumerate() {
            face.edges_by_points(id, &self.edges)?;
            for &e in &face.edges {
                if !self.edges[e].faces.contains(&Some(id)) {
                    return Err(TopologyError::FaceEdgeMismatch { face: id });
                }
            }
        }
        for (id, edge) in self.edges.iter().enumerate() {
            if !edge.is_closed() {
                return Err(TopologyError::OpenEdge { edge: id });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::icosahedron;

    #[test]
    fn adjacency_is_symmetric() {
        let (_, level) = icosahedron::generate(1.0).unwrap();
        for face in 0..level.faces.len() {
            let neighbours = level.adjacent_faces(face).unwrap();
            assert!(!neighbours.contains(&face));
            for n in neighbours {
                assert!(level.adjacent_faces(n).unwrap().contains(&face));
                let e = level.shared_edge(face, n).unwrap();
                assert_eq!(level.shared_edge(n, face).unwrap(), e);
            }
        }
    }

    #[test]
    fn face_indices_follow_face_order() {
        let (_, level) = icosahedron::generate(1.0).unwrap();
        let indices = level.face_indices();
        assert_eq!(indices.len(), 60);
        assert_eq!(&indices[..3], &[2, 1, 0]);
        assert_eq!(&indices[57..], &[10, 6, 11]);
    }

    #[test]
    fn open_edge_is_reported() {
        let (_, mut level) = icosahedron::generate(1.0).unwrap();
        level.edges[7].faces[1] = None;
        assert!(level.validate_topology().is_err());
    }
}
