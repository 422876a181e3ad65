//! SMILES reader
//!
//! Supports the OpenSMILES subset used for small organic molecules: organic
//! subset and bracket atoms, bond symbols, branches, ring closures (including
//! `%nn`) and dot-separated components. Stereo markers are accepted and
//! ignored beyond being recorded on the atom.

use std::collections::BTreeMap;

use thiserror::Error;

use super::element::Element;
use super::graph::{Atom, BondOrder, Chirality, Molecule};
use super::kekule::find_unkekulizable;
use super::rings::RingInfo;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmilesError {
    #[error("empty SMILES string")]
    Empty,

    #[error("unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    #[error("unknown element '{symbol}' at position {position}")]
    UnknownElement { symbol: String, position: usize },

    #[error("element '{symbol}' at position {position} must be written in brackets")]
    BracketRequired { symbol: String, position: usize },

    #[error("invalid bracket atom at position {position}: {message}")]
    InvalidBracketAtom { position: usize, message: String },

    #[error("unbalanced parenthesis at position {position}")]
    UnbalancedParenthesis { position: usize },

    #[error("bond at position {position} is not followed by an atom")]
    DanglingBond { position: usize },

    #[error("ring bond {ring} opened at position {position} is never closed")]
    UnclosedRing { ring: u16, position: usize },

    #[error("ring bond {ring} at position {position} has conflicting bond orders")]
    RingBondConflict { ring: u16, position: usize },

    #[error("ring closure at position {position} bonds an atom to itself")]
    SelfBond { position: usize },

    #[error("ring closure at position {position} duplicates an existing bond")]
    DuplicateBond { position: usize },

    #[error("atom {atom} ({element}) exceeds its allowed valence ({valence})")]
    Valence {
        atom: usize,
        element: Element,
        valence: u8,
    },

    #[error("atom {atom} ({element}) is marked aromatic but is not in a ring")]
    AromaticOutsideRing { atom: usize, element: Element },

    #[error("aromatic system containing atom {atom} has no Kekulé structure")]
    Kekulization { atom: usize },
}

/// Parses a SMILES string and checks the result is chemically sensible:
/// valences of organic-subset atoms, aromatic atoms in rings and a Kekulé
/// structure for every aromatic system.
pub fn from_smiles(smiles: &str) -> Result<Molecule, SmilesError> {
    let mol = parse_smiles(smiles)?;
    sanitize(&mol)?;
    Ok(mol)
}

/// Parses a SMILES string into a molecular graph without chemistry checks
pub fn parse_smiles(smiles: &str) -> Result<Molecule, SmilesError> {
    Parser::new(smiles).parse()
}

fn sanitize(mol: &Molecule) -> Result<(), SmilesError> {
    let rings = RingInfo::find(mol);

    for (index, atom) in mol.atoms().iter().enumerate() {
        if atom.aromatic && !rings.is_ring_atom(index) {
            return Err(SmilesError::AromaticOutsideRing {
                atom: index,
                element: atom.element,
            });
        }

        if atom.is_bracket() {
            continue;
        }

        let bonded = mol.bonding_valence(index);
        let max_valence = atom.element.max_unbracketed_valence().unwrap_or(u8::MAX);

        if bonded > max_valence {
            return Err(SmilesError::Valence {
                atom: index,
                element: atom.element,
                valence: bonded,
            });
        }
    }

    if let Some(atom) = find_unkekulizable(mol) {
        return Err(SmilesError::Kekulization { atom });
    }

    Ok(())
}

#[derive(Debug, Clone, Copy)]
struct OpenRing {
    atom: usize,
    bond: Option<BondOrder>,
    position: usize,
}

struct Parser<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    mol: Molecule,
    previous: Option<usize>,
    pending_bond: Option<(BondOrder, usize)>,
    branches: Vec<(Option<usize>, usize)>,
    open_rings: BTreeMap<u16, OpenRing>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            mol: Molecule::new(),
            previous: None,
            pending_bond: None,
            branches: Vec::new(),
            open_rings: BTreeMap::new(),
        }
    }

    fn parse(mut self) -> Result<Molecule, SmilesError> {
        if self.source.trim().is_empty() {
            return Err(SmilesError::Empty);
        }

        while let Some(&byte) = self.bytes.get(self.pos) {
            let start = self.pos;

            match byte {
                b'(' => self.open_branch(start)?,
                b')' => self.close_branch(start)?,
                b'.' => {
                    self.reject_pending_bond()?;
                    self.previous = None;
                    self.pos += 1;
                }
                b'-' | b'=' | b'#' | b'$' | b':' | b'/' | b'\\' => self.read_bond(byte, start)?,
                b'0'..=b'9' => {
                    self.pos += 1;
                    self.ring_bond(u16::from(byte - b'0'), start)?;
                }
                b'%' => {
                    let ring = self.read_percent_ring(start)?;
                    self.ring_bond(ring, start)?;
                }
                b'[' => {
                    let atom = self.read_bracket_atom(start)?;
                    self.attach(atom);
                }
                b'A'..=b'Z' | b'a'..=b'z' => {
                    let atom = self.read_organic_atom(start)?;
                    self.attach(atom);
                }
                _ => return Err(self.unexpected(start)),
            }
        }

        self.reject_pending_bond()?;

        if let Some(&(_, position)) = self.branches.last() {
            return Err(SmilesError::UnbalancedParenthesis { position });
        }

        if let Some((&ring, open)) = self.open_rings.iter().next() {
            return Err(SmilesError::UnclosedRing {
                ring,
                position: open.position,
            });
        }

        if self.mol.is_empty() {
            return Err(SmilesError::Empty);
        }

        Ok(self.mol)
    }

    fn unexpected(&self, position: usize) -> SmilesError {
        let character = self.source[position..].chars().next().unwrap_or('\0');
        SmilesError::UnexpectedCharacter {
            character,
            position,
        }
    }

    fn reject_pending_bond(&self) -> Result<(), SmilesError> {
        match self.pending_bond {
            Some((_, position)) => Err(SmilesError::DanglingBond { position }),
            None => Ok(()),
        }
    }

    fn open_branch(&mut self, start: usize) -> Result<(), SmilesError> {
        if self.previous.is_none() {
            return Err(self.unexpected(start));
        }
        self.reject_pending_bond()?;

        self.branches.push((self.previous, start));
        self.pos += 1;
        Ok(())
    }

    fn close_branch(&mut self, start: usize) -> Result<(), SmilesError> {
        self.reject_pending_bond()?;

        let (previous, _) = self
            .branches
            .pop()
            .ok_or(SmilesError::UnbalancedParenthesis { position: start })?;

        self.previous = previous;
        self.pos += 1;
        Ok(())
    }

    fn read_bond(&mut self, byte: u8, start: usize) -> Result<(), SmilesError> {
        if self.previous.is_none() || self.pending_bond.is_some() {
            return Err(self.unexpected(start));
        }

        let order = match byte {
            b'=' => BondOrder::Double,
            b'#' => BondOrder::Triple,
            b'$' => BondOrder::Quadruple,
            b':' => BondOrder::Aromatic,
            _ => BondOrder::Single,
        };

        self.pending_bond = Some((order, start));
        self.pos += 1;
        Ok(())
    }

    fn read_percent_ring(&mut self, start: usize) -> Result<u16, SmilesError> {
        let digits = self.bytes.get(start + 1..start + 3);

        match digits {
            Some([tens @ b'0'..=b'9', ones @ b'0'..=b'9']) => {
                self.pos = start + 3;
                Ok(u16::from(tens - b'0') * 10 + u16::from(ones - b'0'))
            }
            _ => Err(self.unexpected(start)),
        }
    }

    fn ring_bond(&mut self, ring: u16, start: usize) -> Result<(), SmilesError> {
        let Some(current) = self.previous else {
            return Err(self.unexpected(start));
        };

        let pending = self.pending_bond.take().map(|(order, _)| order);

        let Some(open) = self.open_rings.remove(&ring) else {
            self.open_rings.insert(
                ring,
                OpenRing {
                    atom: current,
                    bond: pending,
                    position: start,
                },
            );
            return Ok(());
        };

        let order = match (open.bond, pending) {
            (Some(a), Some(b)) if a != b => {
                return Err(SmilesError::RingBondConflict {
                    ring,
                    position: start,
                });
            }
            (Some(order), _) | (None, Some(order)) => order,
            (None, None) => self.default_bond(open.atom, current),
        };

        if open.atom == current {
            return Err(SmilesError::SelfBond { position: start });
        }

        if self.mol.bond_between(open.atom, current).is_some() {
            return Err(SmilesError::DuplicateBond { position: start });
        }

        self.mol.add_bond(open.atom, current, order);
        Ok(())
    }

    fn default_bond(&self, a: usize, b: usize) -> BondOrder {
        if self.mol.atom(a).aromatic && self.mol.atom(b).aromatic {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        }
    }

    fn attach(&mut self, atom: Atom) {
        let index = self.mol.add_atom(atom);

        if let Some(previous) = self.previous {
            let order = match self.pending_bond.take() {
                Some((order, _)) => order,
                None => self.default_bond(previous, index),
            };
            self.mol.add_bond(previous, index, order);
        }

        self.previous = Some(index);
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn read_organic_atom(&mut self, start: usize) -> Result<Atom, SmilesError> {
        let first = self.bytes[start];
        let second = self.bytes.get(start + 1).copied();

        let (element, aromatic, len) = match (first, second) {
            (b'B', Some(b'r')) => (Element::Br, false, 2),
            (b'C', Some(b'l')) => (Element::Cl, false, 2),
            (b'B', _) => (Element::B, false, 1),
            (b'C', _) => (Element::C, false, 1),
            (b'N', _) => (Element::N, false, 1),
            (b'O', _) => (Element::O, false, 1),
            (b'P', _) => (Element::P, false, 1),
            (b'S', _) => (Element::S, false, 1),
            (b'F', _) => (Element::F, false, 1),
            (b'I', _) => (Element::I, false, 1),
            (b'b', _) => (Element::B, true, 1),
            (b'c', _) => (Element::C, true, 1),
            (b'n', _) => (Element::N, true, 1),
            (b'o', _) => (Element::O, true, 1),
            (b'p', _) => (Element::P, true, 1),
            (b's', _) => (Element::S, true, 1),
            _ => {
                let symbol = (first as char).to_string();
                return Err(if Element::from_symbol(&symbol).is_some() {
                    SmilesError::BracketRequired {
                        symbol,
                        position: start,
                    }
                } else {
                    SmilesError::UnknownElement {
                        symbol,
                        position: start,
                    }
                });
            }
        };

        self.pos = start + len;
        Ok(Atom::organic(element, aromatic))
    }

    fn read_bracket_atom(&mut self, start: usize) -> Result<Atom, SmilesError> {
        self.pos = start + 1;

        let isotope = match self.read_number() {
            Some(value) => Some(u16::try_from(value).map_err(|_| {
                SmilesError::InvalidBracketAtom {
                    position: start,
                    message: "isotope out of range".to_string(),
                }
            })?),
            None => None,
        };

        let (element, aromatic) = self.read_bracket_symbol(start)?;
        let chirality = self.read_chirality();

        let hydrogens = if self.peek() == Some(b'H') {
            self.pos += 1;
            match self.read_number() {
                Some(count) => u8::try_from(count).map_err(|_| SmilesError::InvalidBracketAtom {
                    position: start,
                    message: "hydrogen count out of range".to_string(),
                })?,
                None => 1,
            }
        } else {
            0
        };

        let charge = self.read_charge(start)?;

        let class = if self.peek() == Some(b':') {
            self.pos += 1;
            Some(self.read_number().ok_or(SmilesError::InvalidBracketAtom {
                position: start,
                message: "missing atom class".to_string(),
            })?)
        } else {
            None
        };

        match self.peek() {
            Some(b']') => self.pos += 1,
            Some(_) => return Err(self.unexpected(self.pos)),
            None => {
                return Err(SmilesError::InvalidBracketAtom {
                    position: start,
                    message: "unterminated bracket atom".to_string(),
                });
            }
        }

        Ok(Atom {
            element,
            aromatic,
            isotope,
            charge,
            hydrogens: Some(hydrogens),
            class,
            chirality,
        })
    }

    fn read_bracket_symbol(&mut self, start: usize) -> Result<(Element, bool), SmilesError> {
        let position = self.pos;
        let rest = &self.bytes[position..];

        let Some(&first) = rest.first() else {
            return Err(SmilesError::InvalidBracketAtom {
                position: start,
                message: "unterminated bracket atom".to_string(),
            });
        };

        if first.is_ascii_lowercase() {
            let (element, len) = match rest {
                [b's', b'e', ..] => (Element::Se, 2),
                [b'a', b's', ..] => (Element::As, 2),
                [b'b', ..] => (Element::B, 1),
                [b'c', ..] => (Element::C, 1),
                [b'n', ..] => (Element::N, 1),
                [b'o', ..] => (Element::O, 1),
                [b'p', ..] => (Element::P, 1),
                [b's', ..] => (Element::S, 1),
                _ => {
                    return Err(SmilesError::UnknownElement {
                        symbol: (first as char).to_string(),
                        position,
                    });
                }
            };
            self.pos += len;
            return Ok((element, true));
        }

        if !first.is_ascii_uppercase() {
            return Err(self.unexpected(position));
        }

        if let Some(&second) = rest.get(1).filter(|b| b.is_ascii_lowercase()) {
            let symbol = [first as char, second as char].iter().collect::<String>();
            if let Some(element) = Element::from_symbol(&symbol) {
                self.pos += 2;
                return Ok((element, false));
            }
        }

        let symbol = (first as char).to_string();
        match Element::from_symbol(&symbol) {
            Some(element) => {
                self.pos += 1;
                Ok((element, false))
            }
            None => Err(SmilesError::UnknownElement { symbol, position }),
        }
    }

    fn read_chirality(&mut self) -> Option<Chirality> {
        if self.peek() != Some(b'@') {
            return None;
        }
        self.pos += 1;

        if self.peek() == Some(b'@') {
            self.pos += 1;
            return Some(Chirality::Clockwise);
        }

        // extended classes such as @TH1, @SP2 or @OH12
        let class = self.bytes.get(self.pos..self.pos + 2);
        if matches!(class, Some(b"TH" | b"AL" | b"SP" | b"TB" | b"OH")) {
            self.pos += 2;
            self.read_number();
        }

        Some(Chirality::CounterClockwise)
    }

    fn read_charge(&mut self, start: usize) -> Result<i8, SmilesError> {
        let sign: i32 = match self.peek() {
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return Ok(0),
        };
        let symbol = self.bytes[self.pos];
        self.pos += 1;

        let magnitude = match self.read_number() {
            Some(value) => i32::try_from(value).unwrap_or(i32::MAX),
            None => {
                let mut count = 1;
                while self.peek() == Some(symbol) {
                    self.pos += 1;
                    count += 1;
                }
                count
            }
        };

        i8::try_from(sign * magnitude).map_err(|_| SmilesError::InvalidBracketAtom {
            position: start,
            message: "charge out of range".to_string(),
        })
    }

    fn read_number(&mut self) -> Option<u32> {
        let begin = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }

        if begin == self.pos {
            return None;
        }

        // digits only, so parsing fails solely on overflow
        self.source[begin..self.pos].parse().ok().or(Some(u32::MAX))
    }
}
