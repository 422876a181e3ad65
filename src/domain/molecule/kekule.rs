//! Kekulé feasibility of aromatic systems
//!
//! An aromatic system is drawable only if its atoms that still lack a pi bond
//! can be paired up along aromatic bonds, each pair becoming one double bond.
//! `c1ccccc1` pairs up, `c1cccc1` leaves one carbon over.

use super::element::Element;
use super::graph::{BondOrder, Molecule};

/// Valence an aromatic atom must reach, adjusted for its charge
fn aromatic_target(element: Element, charge: i8) -> Option<i16> {
    let charge = i16::from(charge);

    let target = match element {
        Element::C => 4 - charge.abs(),
        Element::B => 3 - charge,
        Element::N | Element::P | Element::As => 3 + charge,
        Element::O | Element::S | Element::Se => 2 + charge,
        _ => return None,
    };

    Some(target)
}

/// Aromatic atoms whose valence is one short and so need a double bond
fn needs_double_bond(mol: &Molecule, atom: usize) -> bool {
    let a = mol.atom(atom);
    if !a.aromatic {
        return false;
    }

    let Some(target) = aromatic_target(a.element, a.charge) else {
        return false;
    };

    let used = i16::from(mol.bonding_valence(atom)) + i16::from(mol.hydrogen_count(atom));
    target - used >= 1
}

/// Returns the lowest atom index of the first aromatic system that admits
/// no Kekulé structure, or `None` when every system does.
pub(super) fn find_unkekulizable(mol: &Molecule) -> Option<usize> {
    let n = mol.num_atoms();
    let needy: Vec<bool> = (0..n).map(|atom| needs_double_bond(mol, atom)).collect();

    let mut partners: Vec<Vec<usize>> = vec![Vec::new(); n];
    for bond in mol.bonds() {
        if bond.order == BondOrder::Aromatic && needy[bond.begin] && needy[bond.end] {
            partners[bond.begin].push(bond.end);
            partners[bond.end].push(bond.begin);
        }
    }

    let mut seen = vec![false; n];
    let mut matched = vec![false; n];

    for start in 0..n {
        if !needy[start] || seen[start] {
            continue;
        }

        let mut system = Vec::new();
        let mut stack = vec![start];
        seen[start] = true;
        while let Some(atom) = stack.pop() {
            system.push(atom);
            for &next in &partners[atom] {
                if !seen[next] {
                    seen[next] = true;
                    stack.push(next);
                }
            }
        }

        if system.len() % 2 == 1 || !pair_up(&system, &partners, &mut matched) {
            return system.iter().min().copied();
        }
    }

    None
}

/// Backtracking perfect matching, always extending the most constrained atom
fn pair_up(system: &[usize], partners: &[Vec<usize>], matched: &mut [bool]) -> bool {
    let free_partners = |atom: usize, matched: &[bool]| {
        partners[atom].iter().filter(|&&p| !matched[p]).count()
    };

    let next = system
        .iter()
        .copied()
        .filter(|&atom| !matched[atom])
        .min_by_key(|&atom| free_partners(atom, matched));

    let Some(atom) = next else {
        return true;
    };

    matched[atom] = true;
    for &partner in &partners[atom] {
        if matched[partner] {
            continue;
        }

        matched[partner] = true;
        if pair_up(system, partners, matched) {
            return true;
        }
        matched[partner] = false;
    }
    matched[atom] = false;

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::molecule::parse_smiles;

    fn check(smiles: &str) -> Option<usize> {
        find_unkekulizable(&parse_smiles(smiles).unwrap())
    }

    #[test]
    fn test_common_aromatics_pair_up() {
        for smiles in [
            "c1ccccc1",
            "c1ccncc1",
            "c1ccc2ccccc2c1",
            "c1ccoc1",
            "c1ccsc1",
            "Cn1cccc1",
            "c1cc[nH]c1",
            "c1cc[se]c1",
            "O=c1cccc[nH]1",
            "C[n+]1ccccc1",
            "c1ccc2c(c1)ccc1ccccc12",
            "N=c1sc2c(C(=O)C(=O)C=O)nc(=O)c=2c1=O",
            "BrC1=C2C(=O)N=Cc3c2n2C(O1)NC(=N)c2c3",
        ] {
            assert_eq!(check(smiles), None, "{}", smiles);
        }
    }

    #[test]
    fn test_odd_carbon_ring() {
        assert_eq!(check("c1cccc1"), Some(0));
        assert_eq!(check("CCc1cccc1"), Some(2));
    }

    #[test]
    fn test_pyrrole_nitrogen_needs_hydrogen() {
        // without [nH] the nitrogen also wants a double bond
        assert_eq!(check("c1ccnc1"), Some(0));
    }

    #[test]
    fn test_fused_and_substituted_systems() {
        // N-substituted pyrrole ring next to a phenyl ring
        assert_eq!(check("c1cn(C)cc1-c1ccccc1"), None);
        // six-five fusion with nine carbons
        assert!(check("c1ccc2cccc2c1").is_some());
    }

    #[test]
    fn test_aromatic_target() {
        assert_eq!(aromatic_target(Element::C, 0), Some(4));
        assert_eq!(aromatic_target(Element::C, -1), Some(3));
        assert_eq!(aromatic_target(Element::N, 1), Some(4));
        assert_eq!(aromatic_target(Element::O, 1), Some(3));
        assert_eq!(aromatic_target(Element::Fe, 0), None);
    }
}
