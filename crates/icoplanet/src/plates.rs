//! Plate coloring. Points on the same side of every fault line share a color.

use std::collections::{HashSet, VecDeque};

use crate::level::MeshLevel;
use crate::mesh::{Color, Point};
use crate::random::RandomSource;

/// Copy endpoint colors onto the midpoints of the parent's non-fault edges.
///
/// Midpoints of fault edges stay uncolored until [`fill_plates`] reaches them
/// from a non-fault neighbour, which keeps boundaries where the parent drew them.
pub fn inherit_midpoint_colors(parent: &MeshLevel, points: &mut [Point]) {
    for edge in parent.edges.iter().filter(|e| !e.fault) {
        if let Some(split) = edge.split {
            points[split.midpoint].plate = points[edge.points[0]].plate;
        }
    }
}

/// Color every uncolored point of `level`.
///
/// Existing colors spread first, breadth-first over non-fault edges. Whatever
/// they cannot reach becomes a new plate with a random color.
pub fn fill_plates<R: RandomSource + ?Sized>(level: &MeshLevel, points: &mut [Point], rng: &mut R) {
    let count = level.point_count;
    let mut neighbours = vec![Vec::new(); count];
    for edge in level.edges.iter().filter(|e| !e.fault) {
        let [a, b] = edge.points;
        neighbours[a].push(b);
        neighbours[b].push(a);
    }

    let mut queue: VecDeque<usize> = (0..count).filter(|&p| points[p].plate.is_some()).collect();
    flood(&neighbours, points, &mut queue);

    let mut plates = 0;
    for start in 0..count {
        if points[start].plate.is_some() {
            continue;
        }
        points[start].plate = Some(random_color(rng));
        queue.push_back(start);
        flood(&neighbours, points, &mut queue);
        plates += 1;
    }
    log::debug!("level {}: {plates} new plates", level.depth);
}

fn flood(neighbours: &[Vec<usize>], points: &mut [Point], queue: &mut VecDeque<usize>) {
    while let Some(p) = queue.pop_front() {
        let color = points[p].plate;
        for &n in &neighbours[p] {
            if points[n].plate.is_none() {
                points[n].plate = color;
                queue.push_back(n);
            }
        }
    }
}

fn random_color<R: RandomSource + ?Sized>(rng: &mut R) -> Color {
    let mut channel = || 0.2 + 0.8 * rng.draw() as f32;
    [channel(), channel(), channel(), 1.0]
}

/// Number of distinct plate colors among `points`.
pub fn count_plates(points: &[Point]) -> usize {
    points
        .iter()
        .filter_map(|p| p.plate)
        .map(|c| c.map(f32::to_bits))
        .collect::<HashSet<_>>()
        .len()
}
