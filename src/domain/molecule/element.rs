//! Chemical elements known to the SMILES reader

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported element symbol: '{0}'")]
pub struct ParseElementError(String);

macro_rules! elements {
    ($($variant:ident = $number:literal),+ $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum Element {
            $($variant = $number),+
        }

        impl Element {
            #[cfg(test)]
            const ALL: &'static [Element] = &[$(Element::$variant),+];

            pub fn symbol(&self) -> &'static str {
                match self {
                    $(Element::$variant => stringify!($variant)),+
                }
            }

            /// Looks up an element by its case-sensitive symbol (`"Cl"`, not `"CL"`)
            pub fn from_symbol(symbol: &str) -> Option<Self> {
                match symbol {
                    $(stringify!($variant) => Some(Element::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

elements! {
    H = 1, He = 2, Li = 3, Be = 4, B = 5, C = 6, N = 7, O = 8, F = 9, Ne = 10,
    Na = 11, Mg = 12, Al = 13, Si = 14, P = 15, S = 16, Cl = 17, Ar = 18,
    K = 19, Ca = 20, Sc = 21, Ti = 22, V = 23, Cr = 24, Mn = 25, Fe = 26, Co = 27,
    Ni = 28, Cu = 29, Zn = 30, Ga = 31, Ge = 32, As = 33, Se = 34, Br = 35, Kr = 36,
    Rb = 37, Sr = 38, Y = 39, Zr = 40, Nb = 41, Mo = 42, Tc = 43, Ru = 44, Rh = 45,
    Pd = 46, Ag = 47, Cd = 48, In = 49, Sn = 50, Sb = 51, Te = 52, I = 53, Xe = 54,
    Cs = 55, Ba = 56, La = 57, Ce = 58, Pr = 59, Nd = 60, Pm = 61, Sm = 62, Eu = 63,
    Gd = 64, Tb = 65, Dy = 66, Ho = 67, Er = 68, Tm = 69, Yb = 70, Lu = 71,
    Hf = 72, Ta = 73, W = 74, Re = 75, Os = 76, Ir = 77, Pt = 78, Au = 79, Hg = 80,
    Tl = 81, Pb = 82, Bi = 83, Po = 84, At = 85, Rn = 86,
}

impl Element {
    pub fn atomic_number(&self) -> u8 {
        *self as u8
    }

    /// Normal valences used to derive implicit hydrogens for organic-subset atoms.
    /// Empty for elements that must be written in brackets.
    pub fn default_valences(&self) -> &'static [u8] {
        match self {
            Element::B => &[3],
            Element::C => &[4],
            Element::N => &[3, 5],
            Element::O => &[2],
            Element::P => &[3, 5],
            Element::S => &[2, 4, 6],
            Element::F | Element::Cl | Element::Br | Element::I => &[1],
            _ => &[],
        }
    }

    /// Highest valence accepted for a neutral atom written without brackets.
    /// Nitrogen is held to three; its pentavalent form needs a charge.
    pub fn max_unbracketed_valence(&self) -> Option<u8> {
        match self {
            Element::N => Some(3),
            _ => self.default_valences().last().copied(),
        }
    }

    pub fn is_organic_subset(&self) -> bool {
        !self.default_valences().is_empty()
    }

    /// Elements that may appear as lowercase aromatic symbols
    pub fn can_be_aromatic(&self) -> bool {
        matches!(
            self,
            Element::B
                | Element::C
                | Element::N
                | Element::O
                | Element::P
                | Element::S
                | Element::Se
                | Element::As
        )
    }

    /// Label color for depictions, loosely following the CPK scheme with
    /// light colors darkened for legibility on white.
    pub fn depiction_color(&self) -> &'static str {
        match self {
            Element::H | Element::C => "#222222",
            Element::N => "#3050F8",
            Element::O => "#E00000",
            Element::F | Element::Cl => "#1F9F1F",
            Element::Br => "#A62929",
            Element::I => "#940094",
            Element::S => "#B89A00",
            Element::P => "#FF8000",
            Element::B => "#D07070",
            Element::Li | Element::Na | Element::K | Element::Rb | Element::Cs => "#8F40D4",
            Element::Se => "#D08A00",
            Element::Si => "#A08060",
            _ => "#555555",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Element::from_symbol(s).ok_or_else(|| ParseElementError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_roundtrip() {
        for symbol in ["H", "C", "Cl", "Br", "Se", "Pt", "Rn"] {
            let element: Element = symbol.parse().unwrap();
            assert_eq!(element.symbol(), symbol);
        }
    }

    #[test]
    fn test_symbols_are_case_sensitive() {
        assert!("CL".parse::<Element>().is_err());
        assert!("cl".parse::<Element>().is_err());
        assert_eq!(
            "Xx".parse::<Element>().unwrap_err().to_string(),
            "invalid or unsupported element symbol: 'Xx'"
        );
    }

    #[test]
    fn test_atomic_numbers() {
        assert_eq!(Element::H.atomic_number(), 1);
        assert_eq!(Element::C.atomic_number(), 6);
        assert_eq!(Element::Br.atomic_number(), 35);
        assert_eq!(Element::Hg.atomic_number(), 80);
    }

    #[test]
    fn test_period_five_and_six_are_complete() {
        assert_eq!(Element::Tc.atomic_number(), 43);
        assert_eq!(Element::Gd.atomic_number(), 64);
        for number in 37..=86u8 {
            assert!(
                Element::ALL.iter().any(|e| e.atomic_number() == number),
                "no element with atomic number {}",
                number
            );
        }
        for symbol in ["Tc", "Ce", "Eu", "Ho", "Yb", "Lu"] {
            assert!(Element::from_symbol(symbol).is_some(), "missing {}", symbol);
        }
    }

    #[test]
    fn test_organic_subset() {
        assert!(Element::C.is_organic_subset());
        assert!(Element::Cl.is_organic_subset());
        assert!(!Element::H.is_organic_subset());
        assert!(!Element::Li.is_organic_subset());
        assert_eq!(Element::S.default_valences(), &[2, 4, 6]);
        assert_eq!(Element::N.max_unbracketed_valence(), Some(3));
        assert_eq!(Element::S.max_unbracketed_valence(), Some(6));
        assert_eq!(Element::Fe.max_unbracketed_valence(), None);
    }

    #[test]
    fn test_aromatic_elements() {
        assert!(Element::C.can_be_aromatic());
        assert!(Element::Se.can_be_aromatic());
        assert!(!Element::Cl.can_be_aromatic());
    }
}
