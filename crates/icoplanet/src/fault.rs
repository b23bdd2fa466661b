//! Fault links: a graph of face-bound nodes whose connections trace plate boundaries.

use crate::error::PlanetError;
use crate::mesh::{Edge, EdgeId, Face, FaceId, LinkId, shared_edge};

/// How a face is drawn, derived from the fault link it hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaceKind {
    #[default]
    Plain,
    /// Pass-through segment. `apex` is the index (0..3) of the face point shared
    /// by the two edges the line crosses
    Link { apex: usize },
    Intersection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultLink {
    pub face: FaceId,
    /// Set semantics, at most one connection per neighbouring face
    pub connections: Vec<LinkId>,
}

impl FaultLink {
    pub fn is_complete(&self) -> bool {
        matches!(self.connections.len(), 2 | 3)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FaultGraph {
    links: Vec<FaultLink>,
    /// Every edge crossed by a connection, in the order they were tagged
    fault_edges: Vec<EdgeId>,
}

impl FaultGraph {
    pub fn links(&self) -> &[FaultLink] {
        &self.links
    }

    pub fn link(&self, id: LinkId) -> &FaultLink {
        &self.links[id]
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn fault_edges(&self) -> &[EdgeId] {
        &self.fault_edges
    }

    pub fn intersection_count(&self) -> usize {
        self.links.iter().filter(|l| l.connections.len() == 3).count()
    }

    pub fn add_link(&mut self, faces: &mut [Face], face: FaceId) -> LinkId {
        let id = self.links.len();
        self.links.push(FaultLink {
            face,
            connections: Vec::with_capacity(3),
        });
        faces[face].link = Some(id);
        id
    }

    /// Connect two links on adjacent faces and tag the edge between them.
    pub fn connect(
        &mut self,
        a: LinkId,
        b: LinkId,
        faces: &[Face],
        edges: &mut [Edge],
    ) -> Result<(), PlanetError> {
        if a == b || self.links[a].connections.contains(&b) {
            return Ok(());
        }
        let edge = shared_edge(faces, edges, self.links[a].face, self.links[b].face)?;
        self.links[a].connections.push(b);
        self.links[b].connections.push(a);
        if !edges[edge].fault {
            edges[edge].fault = true;
            self.fault_edges.push(edge);
        }
        Ok(())
    }

    /// Every link must end with 2 or 3 connections, and connections must be mutual.
    pub fn validate(&self) -> Result<(), PlanetError> {
        for (id, link) in self.links.iter().enumerate() {
            let mutual = link
                .connections
                .iter()
                .all(|&other| self.links[other].connections.contains(&id));
            if !link.is_complete() || !mutual {
                return Err(PlanetError::FaultInvariant {
                    link: id,
                    face: link.face,
                    connections: link.connections.len(),
                });
            }
        }
        Ok(())
    }

    pub fn classify(
        &self,
        faces: &[Face],
        edges: &[Edge],
        face: FaceId,
    ) -> Result<FaceKind, PlanetError> {
        let Some(id) = faces[face].link else {
            return Ok(FaceKind::Plain);
        };
        let link = &self.links[id];
        match link.connections[..] {
            [a, b] => {
                let ea = shared_edge(faces, edges, face, self.links[a].face)?;
                let eb = shared_edge(faces, edges, face, self.links[b].face)?;
                let apex = edges[ea]
                    .shared_point(&edges[eb])
                    .and_then(|p| faces[face].points.iter().position(|&q| q == p))
                    .ok_or(PlanetError::FaultInvariant {
                        link: id,
                        face,
                        connections: 2,
                    })?;
                Ok(FaceKind::Link { apex })
            }
            [_, _, _] => Ok(FaceKind::Intersection),
            _ => Err(PlanetError::FaultInvariant {
                link: id,
                face,
                connections: link.connections.len(),
            }),
        }
    }
}
