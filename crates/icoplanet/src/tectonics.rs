//! Fault line generation.
//!
//! Level 0 seeds links on random faces, surrounds each seed with neighbours and
//! then grows every dangling link until it has two connections. Finer levels
//! never regenerate: each parent fault edge picks one of its halves, and faces
//! whose children picked up two or three links are bridged through the center
//! child so the lines stay closed.

use crate::error::{PlanetError, TopologyError};
use crate::level::MeshLevel;
use crate::mesh::FaceId;
use crate::random::RandomSource;

/// Number of seed links for `faces` faces. Never zero, so every planet has at least one fault.
pub fn seed_count(faces: usize, node_density: f32) -> usize {
    ((faces as f32 * node_density).round() as usize).clamp(1, faces)
}

/// Build the level-0 fault graph.
pub fn seed_faults<R: RandomSource + ?Sized>(
    level: &mut MeshLevel,
    rng: &mut R,
    node_density: f32,
) -> Result<(), PlanetError> {
    let mut unpicked: Vec<FaceId> = (0..level.faces.len()).collect();
    let seeds = seed_count(level.faces.len(), node_density);

    while level.faults.len() < seeds {
        let pick = rng.pick(unpicked.len());
        let face = unpicked.remove(pick);
        level.add_link(face);
    }
    log::debug!("seeded {seeds} fault nodes");

    // Seeds still alone at this point get linked to all three neighbours.
    for seed in 0..seeds {
        if !level.faults.link(seed).connections.is_empty() {
            continue;
        }
        let face = level.faults.link(seed).face;
        for neighbour in level.adjacent_faces(face)? {
            let link = claim(level, &mut unpicked, neighbour);
            level.connect_links(seed, link)?;
        }
    }

    expand_links(level, &mut unpicked, rng)?;
    level.faults.validate()?;
    level.classify_faces()?;
    log::debug!(
        "level 0 faults: {} links, {} fault edges",
        level.faults.len(),
        level.fault_edge_count()
    );
    Ok(())
}

/// Grow every link with fewer than two connections toward a random unconnected
/// neighbour. Links created along the way are visited too.
fn expand_links<R: RandomSource + ?Sized>(
    level: &mut MeshLevel,
    unpicked: &mut Vec<FaceId>,
    rng: &mut R,
) -> Result<(), PlanetError> {
    let mut id = 0;
    while id < level.faults.len() {
        while level.faults.link(id).connections.len() < 2 {
            let link = level.faults.link(id);
            let connected: Vec<FaceId> = link
                .connections
                .iter()
                .map(|&other| level.faults.link(other).face)
                .collect();
            let candidates: Vec<FaceId> = level
                .adjacent_faces(link.face)?
                .into_iter()
                .filter(|f| !connected.contains(f))
                .collect();
            if candidates.is_empty() {
                break;
            }
            let target = candidates[rng.pick(candidates.len())];
            let other = claim(level, unpicked, target);
            level.connect_links(id, other)?;
        }
        id += 1;
    }
    Ok(())
}

/// The link on `face`, creating it (and taking the face out of the pool) if needed.
fn claim(level: &mut MeshLevel, unpicked: &mut Vec<FaceId>, face: FaceId) -> usize {
    if let Some(link) = level.link_on(face) {
        return link;
    }
    if let Some(pos) = unpicked.iter().position(|&f| f == face) {
        unpicked.remove(pos);
    }
    level.add_link(face)
}

/// Carry the parent's fault lines onto its freshly subdivided child.
pub fn refine_faults<R: RandomSource + ?Sized>(
    parent: &MeshLevel,
    child: &mut MeshLevel,
    rng: &mut R,
) -> Result<(), PlanetError> {
    for &edge in parent.faults.fault_edges() {
        let split = parent.edges[edge]
            .split
            .ok_or(TopologyError::MissingMidpoint { edge })?;
        let half = split.children[rng.pick(2)];
        let [Some(a), Some(b)] = child.edges[half].faces else {
            return Err(TopologyError::OpenEdge { edge: half }.into());
        };
        let la = child.link_or_create(a);
        let lb = child.link_or_create(b);
        child.connect_links(la, lb)?;
    }

    for link in parent.faults.links() {
        let children = parent.faces[link.face]
            .children
            .ok_or(TopologyError::FaceNotSplit { face: link.face })?;
        let linked: Vec<usize> = children[..3]
            .iter()
            .filter_map(|&c| child.link_on(c))
            .collect();
        // A single linked corner already carries the line across to the neighbours.
        if matches!(linked.len(), 2 | 3) {
            let center = child.link_or_create(children[3]);
            for corner in linked {
                child.connect_links(corner, center)?;
            }
        }
    }

    child.faults.validate()?;
    child.classify_faces()?;
    log::debug!(
        "level {} faults: {} links, {} fault edges",
        child.depth,
        child.faults.len(),
        child.fault_edge_count()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::FaceKind;
    use crate::icosahedron;
    use crate::mesh::Point;
    use crate::random::level_rng;
    use crate::subdivide::subdivide;
    use rstest::rstest;

    fn seeded(seed: u64, density: f32) -> (Vec<Point>, MeshLevel) {
        let (points, mut level) = icosahedron::generate(1.0).unwrap();
        seed_faults(&mut level, &mut level_rng(seed, 0), density).unwrap();
        (points, level)
    }

    #[rstest]
    #[case(20, 0.15, 3)]
    #[case(20, 0.5, 10)]
    #[case(20, 0.01, 1)]
    #[case(20, 0.99, 20)]
    fn seed_count_rounds_density(
        #[case] faces: usize,
        #[case] density: f32,
        #[case] expected: usize,
    ) {
        assert_eq!(seed_count(faces, density), expected);
    }

    #[rstest]
    fn every_link_has_two_or_three_connections(
        #[values(1, 7, 42, 1234, 99999)] seed: u64,
        #[values(0.05, 0.15, 0.4, 0.9)] density: f32,
    ) {
        let (_, level) = seeded(seed, density);
        assert!(level.faults.len() >= seed_count(20, density));
        for link in level.faults.links() {
            assert!(matches!(link.connections.len(), 2 | 3));
        }
    }

    #[test]
    fn fault_edges_separate_connected_links() {
        let (_, level) = seeded(42, 0.15);
        let tagged: Vec<_> = (0..level.edges.len()).filter(|&e| level.edges[e].fault).collect();
        let mut listed = level.faults.fault_edges().to_vec();
        listed.sort();
        assert_eq!(tagged, listed);

        for &e in &tagged {
            let [Some(a), Some(b)] = level.edges[e].faces else {
                panic!("open edge {e}");
            };
            let la = level.faces[a].link.unwrap();
            let lb = level.faces[b].link.unwrap();
            assert!(level.faults.link(la).connections.contains(&lb));
        }
    }

    #[test]
    fn link_and_face_back_references_agree() {
        let (_, level) = seeded(5, 0.3);
        for (id, link) in level.faults.links().iter().enumerate() {
            assert_eq!(level.faces[link.face].link, Some(id));
        }
    }

    #[test]
    fn same_seed_same_graph() {
        let (_, a) = seeded(314, 0.2);
        let (_, b) = seeded(314, 0.2);
        assert_eq!(a.faults.links(), b.faults.links());
        assert_eq!(a.faults.fault_edges(), b.faults.fault_edges());
    }

    #[test]
    fn saturated_density_links_every_face() {
        let (_, level) = seeded(3, 0.99);
        assert_eq!(level.faults.len(), 20);
        assert!(level.faces.iter().all(|f| f.link.is_some()));
        level.faults.validate().unwrap();
    }

    #[test]
    fn face_kinds_match_connection_counts() {
        let (_, level) = seeded(42, 0.3);
        for face in &level.faces {
            match (face.link, face.kind) {
                (None, FaceKind::Plain) => {}
                (Some(l), FaceKind::Link { apex }) => {
                    assert_eq!(level.faults.link(l).connections.len(), 2);
                    assert!(apex < 3);
                }
                (Some(l), FaceKind::Intersection) => {
                    assert_eq!(level.faults.link(l).connections.len(), 3)
                }
                other => panic!("unexpected face state {other:?}"),
            }
        }
    }

    #[rstest]
    fn refinement_keeps_invariant_and_follows_parent(
        #[values(1, 42, 777)] seed: u64,
        #[values(0.1, 0.3)] density: f32,
    ) {
        let (mut points, mut level) = seeded(seed, density);
        for depth in 1..=3 {
            let mut child = subdivide(&mut level, &mut points, 1.0).unwrap();
            refine_faults(&level, &mut child, &mut level_rng(seed, depth)).unwrap();

            for link in child.faults.links() {
                assert!(matches!(link.connections.len(), 2 | 3));
            }
            for &edge in level.faults.fault_edges() {
                let halves = level.edges[edge].split.unwrap().children;
                let tagged = halves.iter().filter(|&&h| child.edges[h].fault).count();
                assert_eq!(tagged, 1);
            }
            // links only appear under parent faces that had one
            for (face, parent_face) in level.faces.iter().enumerate() {
                if parent_face.link.is_none() {
                    for c in parent_face.children.unwrap() {
                        assert!(child.faces[c].link.is_none(), "face {face} child {c}");
                    }
                }
            }
            level = child;
        }
    }

    #[test]
    fn refinement_without_split_parent_fails() {
        let (mut points, mut level) = seeded(9, 0.2);
        let mut child = subdivide(&mut level, &mut points, 1.0).unwrap();
        let edge = level.faults.fault_edges()[0];
        level.edges[edge].split = None;
        let err = refine_faults(&level, &mut child, &mut level_rng(9, 1)).unwrap_err();
        assert_eq!(err, PlanetError::Topology(TopologyError::MissingMidpoint { edge }));
    }
}
