//! Molecular graph - atoms, bonds and derived properties

use super::element::Element;

/// Tetrahedral chirality marker as written in a bracket atom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chirality {
    /// `@`
    CounterClockwise,
    /// `@@`
    Clockwise,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: Element,
    pub aromatic: bool,
    pub isotope: Option<u16>,
    pub charge: i8,
    /// Explicit hydrogen count from a bracket atom. `None` for organic-subset
    /// atoms, whose hydrogens are derived from the valence model.
    pub hydrogens: Option<u8>,
    pub class: Option<u32>,
    pub chirality: Option<Chirality>,
}

impl Atom {
    /// An organic-subset atom written without brackets
    pub fn organic(element: Element, aromatic: bool) -> Self {
        Self {
            element,
            aromatic,
            isotope: None,
            charge: 0,
            hydrogens: None,
            class: None,
            chirality: None,
        }
    }

    pub fn is_bracket(&self) -> bool {
        self.hydrogens.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Quadruple,
    Aromatic,
}

impl BondOrder {
    /// Contribution to the bonding valence of each endpoint; aromatic bonds
    /// count as single and the extra electron is accounted on the atom.
    pub fn valence_contribution(&self) -> u8 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            BondOrder::Quadruple => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bond {
    pub begin: usize,
    pub end: usize,
    pub order: BondOrder,
}

impl Bond {
    pub fn other(&self, atom: usize) -> usize {
        if self.begin == atom { self.end } else { self.begin }
    }

    pub fn contains(&self, atom: usize) -> bool {
        self.begin == atom || self.end == atom
    }
}

/// A molecule parsed from SMILES
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    adjacency: Vec<Vec<usize>>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_atom(&mut self, atom: Atom) -> usize {
        self.atoms.push(atom);
        self.adjacency.push(Vec::new());
        self.atoms.len() - 1
    }

    /// Adds a bond and returns its index. Callers guarantee both atoms exist
    /// and are distinct.
    pub fn add_bond(&mut self, begin: usize, end: usize, order: BondOrder) -> usize {
        let index = self.bonds.len();
        self.bonds.push(Bond { begin, end, order });
        self.adjacency[begin].push(index);
        self.adjacency[end].push(index);
        index
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn atom(&self, index: usize) -> &Atom {
        &self.atoms[index]
    }

    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn num_bonds(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn degree(&self, atom: usize) -> usize {
        self.adjacency[atom].len()
    }

    /// Bond indices incident to an atom, in insertion order
    pub fn bonds_of(&self, atom: usize) -> &[usize] {
        &self.adjacency[atom]
    }

    pub fn neighbors(&self, atom: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency[atom]
            .iter()
            .map(move |&bond| self.bonds[bond].other(atom))
    }

    pub fn bond_between(&self, a: usize, b: usize) -> Option<usize> {
        self.adjacency[a]
            .iter()
            .copied()
            .find(|&bond| self.bonds[bond].other(a) == b)
    }

    /// Sum of bond valence contributions, aromatic bonds counted as single
    pub fn bonding_valence(&self, atom: usize) -> u8 {
        self.adjacency[atom]
            .iter()
            .map(|&bond| self.bonds[bond].order.valence_contribution())
            .fold(0u8, u8::saturating_add)
    }

    fn has_multiple_bond(&self, atom: usize) -> bool {
        self.adjacency[atom].iter().any(|&bond| {
            matches!(
                self.bonds[bond].order,
                BondOrder::Double | BondOrder::Triple | BondOrder::Quadruple
            )
        })
    }

    /// Total hydrogen count.
    ///
    /// Bracket atoms carry an explicit count. Aliphatic organic-subset atoms
    /// take the lowest normal valence not below their bonding valence.
    /// Aromatic atoms only fill their lowest valence, with one unit reserved
    /// for the pi system unless an explicit multiple bond already provides it,
    /// so `c1ccoc1` and `Cn1cccc1` carry no hydrogen on the heteroatom.
    pub fn hydrogen_count(&self, atom: usize) -> u8 {
        let a = &self.atoms[atom];

        if let Some(explicit) = a.hydrogens {
            return explicit;
        }

        let bonded = self.bonding_valence(atom);
        let valences = a.element.default_valences();

        if a.aromatic {
            let pi = u8::from(!self.has_multiple_bond(atom));
            return valences
                .first()
                .map(|lowest| lowest.saturating_sub(bonded.saturating_add(pi)))
                .unwrap_or(0);
        }

        valences
            .iter()
            .find(|&&valence| valence >= bonded)
            .map(|&valence| valence - bonded)
            .unwrap_or(0)
    }

    /// Connected components as sorted atom index lists, ordered by their first atom
    pub fn components(&self) -> Vec<Vec<usize>> {
        let mut seen = vec![false; self.atoms.len()];
        let mut components = Vec::new();

        for start in 0..self.atoms.len() {
            if seen[start] {
                continue;
            }

            let mut component = Vec::new();
            let mut stack = vec![start];
            seen[start] = true;

            while let Some(atom) = stack.pop() {
                component.push(atom);

                for neighbor in self.neighbors(atom) {
                    if !seen[neighbor] {
                        seen[neighbor] = true;
                        stack.push(neighbor);
                    }
                }
            }

            component.sort_unstable();
            components.push(component);
        }

        components
    }
}
