//! 2-D coordinate generation
//!
//! Each connected component is embedded by stress majorization over target
//! distances derived from the graph: ideal zig-zag chain distances between
//! atoms, replaced by regular-polygon chord lengths for atoms sharing a ring.
//! Classical MDS provides the starting coordinates, so the result depends only
//! on the input graph. Coordinates are in bond-length units.

use std::collections::{HashMap, VecDeque};

use super::graph::Molecule;
use super::rings::RingInfo;

const COMPONENT_GAP: f64 = 1.5;
const MAX_ITERATIONS: usize = 300;
const LARGE_COMPONENT_ITERATIONS: usize = 60;
const LARGE_COMPONENT: usize = 150;
const CONVERGENCE: f64 = 1e-4;
const POWER_ITERATIONS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Computes 2-D coordinates for every atom, components packed left to right
pub fn compute_2d_coords(mol: &Molecule, rings: &RingInfo) -> Vec<Point> {
    let mut coords = vec![Point::default(); mol.num_atoms()];
    let mut cursor = 0.0;

    for component in mol.components() {
        let local = layout_component(mol, rings, &component);
        let (min, max) = bounds(&local);
        let offset_x = cursor - min.x;
        let offset_y = -(min.y + max.y) / 2.0;

        for (&atom, point) in component.iter().zip(&local) {
            coords[atom] = Point::new(point.x + offset_x, point.y + offset_y);
        }

        cursor += (max.x - min.x) + COMPONENT_GAP;
    }

    coords
}

/// Bounding box of a point set as (min corner, max corner)
pub fn bounds(points: &[Point]) -> (Point, Point) {
    if points.is_empty() {
        return (Point::default(), Point::default());
    }

    points.iter().fold(
        (
            Point::new(f64::INFINITY, f64::INFINITY),
            Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        ),
        |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        },
    )
}

fn layout_component(mol: &Molecule, rings: &RingInfo, atoms: &[usize]) -> Vec<Point> {
    match atoms.len() {
        0 => Vec::new(),
        1 => vec![Point::default()],
        2 => vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)],
        _ => {
            let targets = target_distances(mol, rings, atoms);
            let initial = classical_mds(&targets);
            stress_majorization(&targets, initial)
        }
    }
}

/// Distance between the ends of a fully extended zig-zag chain of `bonds` bonds
fn chain_distance(bonds: usize) -> f64 {
    let along = bonds as f64 * (3f64.sqrt() / 2.0);
    if bonds % 2 == 1 {
        (along * along + 0.25).sqrt()
    } else {
        along
    }
}

/// Chord between two vertices `separation` steps apart on a regular polygon with unit edges
fn ring_chord(size: usize, separation: usize) -> f64 {
    let size = size as f64;
    (std::f64::consts::PI * separation as f64 / size).sin() / (std::f64::consts::PI / size).sin()
}

fn target_distances(mol: &Molecule, rings: &RingInfo, atoms: &[usize]) -> Vec<Vec<f64>> {
    let n = atoms.len();
    let local: HashMap<usize, usize> = atoms.iter().enumerate().map(|(i, &a)| (a, i)).collect();
    let mut targets = vec![vec![0.0; n]; n];

    for (i, &start) in atoms.iter().enumerate() {
        let mut hops = vec![usize::MAX; n];
        let mut queue = VecDeque::from([start]);
        hops[i] = 0;

        while let Some(atom) = queue.pop_front() {
            let current = hops[local[&atom]];

            for neighbor in mol.neighbors(atom) {
                let j = local[&neighbor];
                if hops[j] == usize::MAX {
                    hops[j] = current + 1;
                    queue.push_back(neighbor);
                }
            }
        }

        for (j, &count) in hops.iter().enumerate() {
            targets[i][j] = if i == j { 0.0 } else { chain_distance(count) };
        }
    }

    // rings are ordered smallest first, so the tightest ring wins for shared pairs
    let mut fixed = vec![vec![false; n]; n];
    for ring in rings.rings() {
        if !ring.iter().all(|atom| local.contains_key(atom)) {
            continue;
        }

        let size = ring.len();
        for p in 0..size {
            for q in (p + 1)..size {
                let (i, j) = (local[&ring[p]], local[&ring[q]]);
                if fixed[i][j] {
                    continue;
                }

                let separation = (q - p).min(size - (q - p));
                let chord = ring_chord(size, separation);
                targets[i][j] = chord;
                targets[j][i] = chord;
                fixed[i][j] = true;
                fixed[j][i] = true;
            }
        }
    }

    targets
}

/// Classical multidimensional scaling onto the two leading eigenvectors
fn classical_mds(targets: &[Vec<f64>]) -> Vec<Point> {
    let n = targets.len();
    let squared: Vec<Vec<f64>> = targets
        .iter()
        .map(|row| row.iter().map(|d| d * d).collect())
        .collect();

    let row_means: Vec<f64> = squared
        .iter()
        .map(|row| row.iter().sum::<f64>() / n as f64)
        .collect();
    let grand_mean = row_means.iter().sum::<f64>() / n as f64;

    let gram: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| -0.5 * (squared[i][j] - row_means[i] - row_means[j] + grand_mean))
                .collect()
        })
        .collect();

    let (first_value, first) = dominant_eigenvector(&gram, None);
    let (second_value, second) = dominant_eigenvector(&gram, Some(&first));

    let scale_x = first_value.max(0.0).sqrt();
    let scale_y = second_value.max(0.0).sqrt();
    let flat = scale_y < 1e-3 * scale_x.max(1.0);

    (0..n)
        .map(|i| {
            let mut y = second[i] * scale_y;
            if flat {
                // lift collinear starts off the line so the majorization can bend them
                y += 0.1 * ((i % 3) as f64 - 1.0);
            }
            Point::new(first[i] * scale_x, y)
        })
        .collect()
}

/// Power iteration for the dominant eigenpair, optionally orthogonal to `exclude`
fn dominant_eigenvector(matrix: &[Vec<f64>], exclude: Option<&[f64]>) -> (f64, Vec<f64>) {
    let n = matrix.len();
    let mut vector: Vec<f64> = (0..n)
        .map(|i| 1.0 + (i as f64 * 0.618_033_988_7).fract())
        .collect();

    let orthogonalize = |v: &mut Vec<f64>| {
        if let Some(u) = exclude {
            let dot: f64 = v.iter().zip(u).map(|(a, b)| a * b).sum();
            for (value, component) in v.iter_mut().zip(u) {
                *value -= dot * component;
            }
        }
    };

    orthogonalize(&mut vector);
    if !normalize(&mut vector) {
        return (0.0, vec![0.0; n]);
    }

    let mut eigenvalue = 0.0;
    for _ in 0..POWER_ITERATIONS {
        let mut next: Vec<f64> = matrix
            .iter()
            .map(|row| row.iter().zip(&vector).map(|(a, b)| a * b).sum())
            .collect();
        orthogonalize(&mut next);

        // Rayleigh quotient keeps the sign, so negative eigenvalues are reported as such
        eigenvalue = next.iter().zip(&vector).map(|(a, b)| a * b).sum();

        if !normalize(&mut next) {
            return (0.0, vector);
        }
        vector = next;
    }

    (eigenvalue, vector)
}

fn normalize(vector: &mut [f64]) -> bool {
    let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm < 1e-12 {
        return false;
    }

    for value in vector.iter_mut() {
        *value /= norm;
    }
    true
}

/// Localized stress majorization (Gauss-Seidel updates) with weights `d^-2`
fn stress_majorization(targets: &[Vec<f64>], mut coords: Vec<Point>) -> Vec<Point> {
    let n = coords.len();
    let iterations = if n > LARGE_COMPONENT {
        LARGE_COMPONENT_ITERATIONS
    } else {
        MAX_ITERATIONS
    };

    for _ in 0..iterations {
        let mut largest_move: f64 = 0.0;

        for i in 0..n {
            let mut sum = Point::default();
            let mut weights = 0.0;

            for j in 0..n {
                if i == j {
                    continue;
                }

                let target = targets[i][j];
                let weight = 1.0 / (target * target);
                let dx = coords[i].x - coords[j].x;
                let dy = coords[i].y - coords[j].y;
                let distance = (dx * dx + dy * dy).sqrt();
                let (ux, uy) = if distance > 1e-9 {
                    (dx / distance, dy / distance)
                } else {
                    (1.0, 0.0)
                };

                sum.x += weight * (coords[j].x + target * ux);
                sum.y += weight * (coords[j].y + target * uy);
                weights += weight;
            }

            let updated = Point::new(sum.x / weights, sum.y / weights);
            largest_move = largest_move.max(updated.distance(&coords[i]));
            coords[i] = updated;
        }

        if largest_move < CONVERGENCE {
            break;
        }
    }

    coords
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::molecule::from_smiles;

    fn layout(smiles: &str) -> (Molecule, Vec<Point>) {
        let mol = from_smiles(smiles).unwrap();
        let rings = RingInfo::find(&mol);
        let coords = compute_2d_coords(&mol, &rings);
        (mol, coords)
    }

    fn assert_reasonable(mol: &Molecule, coords: &[Point]) {
        for bond in mol.bonds() {
            let length = coords[bond.begin].distance(&coords[bond.end]);
            assert!(
                (0.7..1.3).contains(&length),
                "bond {}-{} has length {}",
                bond.begin,
                bond.end,
                length
            );
        }

        for i in 0..coords.len() {
            for j in (i + 1)..coords.len() {
                assert!(
                    coords[i].distance(&coords[j]) > 0.5,
                    "atoms {} and {} overlap",
                    i,
                    j
                );
            }
        }
    }

    #[test]
    fn test_chain_distance() {
        assert!((chain_distance(1) - 1.0).abs() < 1e-9);
        assert!((chain_distance(2) - 3f64.sqrt()).abs() < 1e-9);
        assert!((chain_distance(3) - 7f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_ring_chord() {
        assert!((ring_chord(6, 1) - 1.0).abs() < 1e-9);
        assert!((ring_chord(6, 3) - 2.0).abs() < 1e-9);
        assert!((ring_chord(4, 2) - 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_single_atom() {
        let (_, coords) = layout("C");
        assert_eq!(coords, vec![Point::new(0.0, 0.0)]);
    }

    #[test]
    fn test_benzene_is_regular() {
        let (mol, coords) = layout("c1ccccc1");
        assert_reasonable(&mol, &coords);

        let center_x = coords.iter().map(|p| p.x).sum::<f64>() / 6.0;
        let center_y = coords.iter().map(|p| p.y).sum::<f64>() / 6.0;
        let center = Point::new(center_x, center_y);
        for point in &coords {
            assert!((point.distance(&center) - 1.0).abs() < 0.05);
        }
    }

    #[test]
    fn test_sample_molecule_layout() {
        let (mol, coords) = layout("C1=CC(=CC=C1C(=O)O)C(=O)O");
        assert_reasonable(&mol, &coords);
    }

    #[test]
    fn test_fused_rings_layout() {
        let (mol, coords) = layout("c1ccc2ccccc2c1");
        assert_reasonable(&mol, &coords);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let (_, first) = layout("CC(C)c1ccc(O)cc1C(=O)N");
        let (_, second) = layout("CC(C)c1ccc(O)cc1C(=O)N");
        assert_eq!(first, second);
    }

    #[test]
    fn test_components_do_not_overlap() {
        let (mol, coords) = layout("CCO.[Na+].c1ccccc1");
        let components = mol.components();
        assert_eq!(components.len(), 3);

        for pair in components.windows(2) {
            let left = pair[0].iter().map(|&a| coords[a].x).fold(f64::MIN, f64::max);
            let right = pair[1].iter().map(|&a| coords[a].x).fold(f64::MAX, f64::min);
            assert!(left < right);
        }
    }

    #[test]
    fn test_bounds() {
        let (min, max) = bounds(&[Point::new(-1.0, 2.0), Point::new(3.0, -4.0)]);
        assert_eq!(min, Point::new(-1.0, -4.0));
        assert_eq!(max, Point::new(3.0, 2.0));
    }
}
