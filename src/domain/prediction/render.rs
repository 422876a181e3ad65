//! Turns a prediction payload into a displayable result

use serde::Serialize;

use super::entity::{format_potential, PredictionPayload, RedoxPotentials};
use crate::domain::molecule::{depict_svg, from_smiles, DepictionOptions};
use crate::domain::DomainError;

pub const LITHIUM_UNIT: &str = "V vs. Li/Li⁺";
pub const VACUUM_UNIT: &str = "V (ref to vacuum)";

/// One labeled, color-coded value of the result block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PotentialReading {
    pub label: &'static str,
    pub value: String,
    pub unit: &'static str,
    pub color: &'static str,
}

/// Everything the result block shows for one molecule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedResult {
    pub molecule: String,
    /// Rounded to three decimals
    pub potentials: RedoxPotentials,
    pub depiction_svg: String,
}

impl RenderedResult {
    pub fn readings(&self) -> [PotentialReading; 3] {
        [
            PotentialReading {
                label: "Lithium insertion potential",
                value: format_potential(self.potentials.lithium_insertion),
                unit: LITHIUM_UNIT,
                color: "green",
            },
            PotentialReading {
                label: "Molecule oxidation potential",
                value: format_potential(self.potentials.oxidation),
                unit: VACUUM_UNIT,
                color: "red",
            },
            PotentialReading {
                label: "Molecule reduction potential",
                value: format_potential(self.potentials.reduction),
                unit: VACUUM_UNIT,
                color: "blue",
            },
        ]
    }
}

/// Builds the result block for a molecule.
///
/// Payload shape errors and SMILES that fail to parse are returned as errors;
/// a result is never produced without both the values and the depiction.
pub fn render(
    payload: &PredictionPayload,
    molecule: &str,
    options: &DepictionOptions,
) -> Result<RenderedResult, DomainError> {
    let potentials = RedoxPotentials::from_payload(payload)?.rounded();
    // surrounding whitespace is not part of the structure
    let structure = from_smiles(molecule.trim())?;

    Ok(RenderedResult {
        molecule: molecule.to_string(),
        potentials,
        depiction_svg: depict_svg(&structure, options),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE: &str = "C1=CC(=CC=C1C(=O)O)C(=O)O";

    fn sample_payload() -> PredictionPayload {
        PredictionPayload::new(json!({"voltages": "1.5", "ox/red": ["2.0", "-0.5"]}))
    }

    #[test]
    fn test_render_sample() {
        let result = render(&sample_payload(), SAMPLE, &DepictionOptions::default()).unwrap();
        let readings = result.readings();

        assert_eq!(result.molecule, SAMPLE);
        assert_eq!(readings[0].value, "1.5");
        assert_eq!(readings[1].value, "2.0");
        assert_eq!(readings[2].value, "-0.5");
        assert!(result.depiction_svg.starts_with("<svg"));
    }

    #[test]
    fn test_readings_labels_and_colors() {
        let result = render(&sample_payload(), SAMPLE, &DepictionOptions::default()).unwrap();
        let readings = result.readings();

        assert_eq!(readings[0].color, "green");
        assert_eq!(readings[0].unit, LITHIUM_UNIT);
        assert_eq!(readings[1].color, "red");
        assert_eq!(readings[1].unit, VACUUM_UNIT);
        assert_eq!(readings[2].color, "blue");
        assert_eq!(readings[2].label, "Molecule reduction potential");
    }

    #[test]
    fn test_values_are_rounded() {
        let payload = PredictionPayload::new(json!({"voltages": 1.23456, "ox/red": [6.78901, "-0.0004"]}));
        let result = render(&payload, "CCO", &DepictionOptions::default()).unwrap();
        let readings = result.readings();

        assert_eq!(readings[0].value, "1.235");
        assert_eq!(readings[1].value, "6.789");
        assert_eq!(result.potentials.reduction.abs(), 0.0);
    }

    #[test]
    fn test_invalid_molecule_faults() {
        let err = render(&sample_payload(), "C1CC", &DepictionOptions::default()).unwrap_err();
        assert!(matches!(err, DomainError::Molecule(_)));
    }

    #[test]
    fn test_malformed_payload_faults_before_parsing() {
        let payload = PredictionPayload::new(json!({"voltages": "1.5"}));
        let err = render(&payload, "not a molecule", &DepictionOptions::default()).unwrap_err();
        assert!(matches!(err, DomainError::Payload { .. }));
    }
}
