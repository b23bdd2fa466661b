//! Arena-indexed mesh entities.
//!
//! Points live in one append-only array shared by every level. Edges and faces
//! belong to a single level and refer to each other by index into that level.

use crate::error::TopologyError;
use crate::fault::FaceKind;
use glam::Vec3;

pub type PointId = usize;
pub type EdgeId = usize;
pub type FaceId = usize;
pub type LinkId = usize;

pub type Color = [f32; 4];

#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub position: Vec3,
    /// Plate color; written once, never changed afterwards
    pub plate: Option<Color>,
}

impl Point {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            plate: None,
        }
    }
}

/// Lineage recorded on an edge once it has been split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSplit {
    pub midpoint: PointId,
    /// `children[i]` runs from `points[i]` to the midpoint
    pub children: [EdgeId; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub points: [PointId; 2],
    pub faces: [Option<FaceId>; 2],
    pub split: Option<EdgeSplit>,
    pub fault: bool,
}

impl Edge {
    pub fn new(a: PointId, b: PointId) -> Self {
        Self {
            points: [a, b],
            faces: [None, None],
            split: None,
            fault: false,
        }
    }

    /// Direction-insensitive endpoint match.
    pub fn connects(&self, a: PointId, b: PointId) -> bool {
        (self.points[0] == a && self.points[1] == b) || (self.points[0] == b && self.points[1] == a)
    }

    pub fn is_closed(&self) -> bool {
        self.faces[0].is_some() && self.faces[1].is_some()
    }

    /// The face on the other side of `face`.
    pub fn other_face(&self, face: FaceId) -> Option<FaceId> {
        match self.faces {
            [Some(a), b] if a == face => b,
            [a, Some(b)] if b == face => a,
            _ => None,
        }
    }

    pub fn attach_face(&mut self, id: EdgeId, face: FaceId) -> Result<(), TopologyError> {
        match self.faces.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(face);
                Ok(())
            }
            None => Err(TopologyError::EdgeOverfull { edge: id }),
        }
    }

    pub fn shared_point(&self, other: &Edge) -> Option<PointId> {
        self.points.iter().copied().find(|p| other.points.contains(p))
    }

    pub fn midpoint(&self, id: EdgeId) -> Result<PointId, TopologyError> {
        self.split
            .map(|split| split.midpoint)
            .ok_or(TopologyError::MissingMidpoint { edge: id })
    }

    /// The child edge running from `point` to the midpoint.
    pub fn sub_edge_touching(&self, id: EdgeId, point: PointId) -> Result<EdgeId, TopologyError> {
        let split = self.split.ok_or(TopologyError::MissingMidpoint { edge: id })?;
        self.points
            .iter()
            .position(|&p| p == point)
            .map(|i| split.children[i])
            .ok_or(TopologyError::MissingSubEdge { edge: id, point })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub points: [PointId; 3],
    pub edges: [EdgeId; 3],
    /// `[corner0, corner1, corner2, center]` once split
    pub children: Option<[FaceId; 4]>,
    pub link: Option<LinkId>,
    pub kind: FaceKind,
}

impl Face {
    pub fn new(points: [PointId; 3], edges: [EdgeId; 3]) -> Self {
        Self {
            points,
            edges,
            children: None,
            link: None,
            kind: FaceKind::Plain,
        }
    }

    /// Resolve this face's edges as `[edge01, edge12, edge20]` by endpoint matching.
    pub fn edges_by_points(
        &self,
        id: FaceId,
        edges: &[Edge],
    ) -> Result<[EdgeId; 3], TopologyError> {
        let [p0, p1, p2] = self.points;
        let find = |a: PointId, b: PointId| {
            self.edges
                .iter()
                .copied()
                .find(|&e| edges[e].connects(a, b))
                .ok_or(TopologyError::FaceEdgeMismatch { face: id })
        };
        Ok([find(p0, p1)?, find(p1, p2)?, find(p2, p0)?])
    }
}

/// Register `face` on each of its edges.
pub fn link_face_to_edges(
    edges: &mut [Edge],
    id: FaceId,
    face: &Face,
) -> Result<(), TopologyError> {
    for &e in &face.edges {
        edges[e].attach_face(e, id)?;
    }
    Ok(())
}

/// The edge separating two adjacent faces.
pub fn shared_edge(
    faces: &[Face],
    edges: &[Edge],
    a: FaceId,
    b: FaceId,
) -> Result<EdgeId, TopologyError> {
    faces[a]
        .edges
        .iter()
        .copied()
        .find(|&e| edges[e].other_face(a) == Some(b))
        .ok_or(TopologyError::NoSharedEdge { a, b })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_equality_ignores_direction() {
        let edge = Edge::new(3, 7);
        assert!(edge.connects(3, 7));
        assert!(edge.connects(7, 3));
        assert!(!edge.connects(3, 8));
    }

    #[test]
    fn edge_accepts_at_most_two_faces() {
        let mut edge = Edge::new(0, 1);
        edge.attach_face(4, 10).unwrap();
        edge.attach_face(4, 11).unwrap();
        assert!(edge.is_closed());
        assert_eq!(edge.other_face(10), Some(11));
        assert_eq!(edge.other_face(11), Some(10));
        assert_eq!(edge.other_face(12), None);
        assert_eq!(
            edge.attach_face(4, 12),
            Err(TopologyError::EdgeOverfull { edge: 4 })
        );
    }

    #[test]
    fn sub_edges_follow_endpoint_order() {
        let mut edge = Edge::new(5, 9);
        assert_eq!(
            edge.sub_edge_touching(2, 5),
            Err(TopologyError::MissingMidpoint { edge: 2 })
        );
        edge.split = Some(EdgeSplit {
            midpoint: 20,
            children: [40, 41],
        });
        assert_eq!(edge.midpoint(2), Ok(20));
        assert_eq!(edge.sub_edge_touching(2, 5), Ok(40));
        assert_eq!(edge.sub_edge_touching(2, 9), Ok(41));
        assert_eq!(
            edge.sub_edge_touching(2, 6),
            Err(TopologyError::MissingSubEdge { edge: 2, point: 6 })
        );
    }

    #[test]
    fn face_edges_resolve_in_point_order() {
        let edges = vec![Edge::new(2, 0), Edge::new(0, 1), Edge::new(1, 2)];
        let face = Face::new([0, 1, 2], [0, 1, 2]);
        assert_eq!(face.edges_by_points(0, &edges), Ok([1, 2, 0]));

        let broken = Face::new([0, 1, 3], [0, 1, 2]);
        assert_eq!(
            broken.edges_by_points(5, &edges),
            Err(TopologyError::FaceEdgeMismatch { face: 5 })
        );
    }

    #[test]
    fn shared_point_of_adjacent_edges() {
        let a = Edge::new(1, 2);
        let b = Edge::new(2, 3);
        let c = Edge::new(4, 5);
        assert_eq!(a.shared_point(&b), Some(2));
        assert_eq!(a.shared_point(&c), None);
    }
}
