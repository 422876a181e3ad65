//! Ring perception

use std::collections::{BTreeSet, VecDeque};

use super::graph::Molecule;

/// Smallest rings of a molecule.
///
/// For every bond the shortest cycle through it is collected; the distinct
/// cycles form a ring set that covers every ring bond. For the fused and
/// bridged systems that appear in small organic molecules this matches the
/// smallest set of smallest rings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RingInfo {
    /// Each ring lists its atoms in cycle order
    rings: Vec<Vec<usize>>,
    membership: Vec<Vec<usize>>,
}

impl RingInfo {
    pub fn find(mol: &Molecule) -> Self {
        let mut seen: BTreeSet<Vec<usize>> = BTreeSet::new();
        let mut rings = Vec::new();

        for (index, bond) in mol.bonds().iter().enumerate() {
            let Some(path) = shortest_path_avoiding(mol, bond.begin, bond.end, index) else {
                continue;
            };

            let mut key = path.clone();
            key.sort_unstable();

            if seen.insert(key) {
                rings.push(path);
            }
        }

        rings.sort_by(|a, b| {
            a.len()
                .cmp(&b.len())
                .then_with(|| a.iter().min().cmp(&b.iter().min()))
        });

        let mut membership = vec![Vec::new(); mol.num_atoms()];
        for (ring_index, ring) in rings.iter().enumerate() {
            for &atom in ring {
                membership[atom].push(ring_index);
            }
        }

        Self { rings, membership }
    }

    pub fn rings(&self) -> &[Vec<usize>] {
        &self.rings
    }

    pub fn num_rings(&self) -> usize {
        self.rings.len()
    }

    pub fn is_ring_atom(&self, atom: usize) -> bool {
        self.membership
            .get(atom)
            .is_some_and(|rings| !rings.is_empty())
    }

    /// Indices of the rings containing an atom, smallest ring first
    pub fn rings_of(&self, atom: usize) -> &[usize] {
        self.membership.get(atom).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Smallest ring containing both atoms
    pub fn smallest_common_ring(&self, a: usize, b: usize) -> Option<&[usize]> {
        self.rings_of(a)
            .iter()
            .find(|&&ring| self.rings_of(b).contains(&ring))
            .map(|&ring| self.rings[ring].as_slice())
    }
}

/// Breadth-first shortest path from `from` to `to` that does not use `excluded_bond`.
/// The returned path starts at `from` and ends at `to`.
fn shortest_path_avoiding(
    mol: &Molecule,
    from: usize,
    to: usize,
    excluded_bond: usize,
) -> Option<Vec<usize>> {
    let mut parent: Vec<Option<usize>> = vec![None; mol.num_atoms()];
    let mut visited = vec![false; mol.num_atoms()];
    let mut queue = VecDeque::from([from]);
    visited[from] = true;

    while let Some(atom) = queue.pop_front() {
        if atom == to {
            let mut path = vec![to];
            let mut current = to;

            while let Some(previous) = parent[current] {
                path.push(previous);
                current = previous;
            }

            path.reverse();
            return Some(path);
        }

        for &bond in mol.bonds_of(atom) {
            if bond == excluded_bond {
                continue;
            }

            let next = mol.bonds()[bond].other(atom);
            if !visited[next] {
                visited[next] = true;
                parent[next] = Some(atom);
                queue.push_back(next);
            }
        }
    }

    None
}
