//! Molecular structure toolkit: SMILES reading, ring perception, 2-D layout
//! and SVG depiction.

mod depiction;
mod element;
mod graph;
mod kekule;
mod layout;
mod rings;
mod smiles;

pub use depiction::{depict_svg, DepictionOptions};
pub use element::{Element, ParseElementError};
pub use graph::{Atom, Bond, BondOrder, Chirality, Molecule};
pub use layout::{compute_2d_coords, Point};
pub use rings::RingInfo;
pub use smiles::{from_smiles, parse_smiles, SmilesError};

/// Parses a SMILES string and renders it as an SVG document
pub fn depict_smiles(smiles: &str, options: &DepictionOptions) -> Result<String, SmilesError> {
    let mol = from_smiles(smiles)?;
    Ok(depict_svg(&mol, options))
}
