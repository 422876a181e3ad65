//! SVG depiction writer

use super::element::Element;
use super::graph::{BondOrder, Molecule};
use super::layout::{bounds, compute_2d_coords, Point};
use super::rings::RingInfo;

const BOND_COLOR: &str = "#222222";

/// Rendering parameters for a depiction, in pixels
#[derive(Debug, Clone, PartialEq)]
pub struct DepictionOptions {
    pub width: u32,
    pub height: u32,
    pub padding: f64,
    /// Upper bound on the drawn bond length; small molecules are not blown up
    pub max_bond_length: f64,
    pub font_size: f64,
    pub line_width: f64,
    pub background: String,
}

impl Default for DepictionOptions {
    fn default() -> Self {
        Self {
            width: 350,
            height: 300,
            padding: 24.0,
            max_bond_length: 40.0,
            font_size: 15.0,
            line_width: 1.6,
            background: "#FFFFFF".to_string(),
        }
    }
}

/// Text shown for a labeled atom
#[derive(Debug, Clone, PartialEq)]
struct AtomLabel {
    isotope: Option<u16>,
    symbol: &'static str,
    hydrogens: u8,
    charge: i8,
    color: &'static str,
}

fn atom_label(mol: &Molecule, atom: usize) -> Option<AtomLabel> {
    let a = mol.atom(atom);
    let carbon = a.element == Element::C;

    if carbon && a.charge == 0 && a.isotope.is_none() && mol.degree(atom) > 0 {
        return None;
    }

    Some(AtomLabel {
        isotope: a.isotope,
        symbol: a.element.symbol(),
        hydrogens: mol.hydrogen_count(atom),
        charge: a.charge,
        color: a.element.depiction_color(),
    })
}

fn charge_text(charge: i8) -> String {
    let sign = if charge > 0 { "+" } else { "-" };
    match charge.unsigned_abs() {
        1 => sign.to_string(),
        n => format!("{}{}", n, sign),
    }
}

/// Maps layout coordinates onto the canvas, y pointing down
struct Viewport {
    scale: f64,
    center: Point,
    width: f64,
    height: f64,
}

impl Viewport {
    fn fit(coords: &[Point], options: &DepictionOptions) -> Self {
        let (min, max) = bounds(coords);
        let width = f64::from(options.width);
        let height = f64::from(options.height);
        let usable_x = (width - 2.0 * options.padding).max(1.0);
        let usable_y = (height - 2.0 * options.padding).max(1.0);

        let mut scale = options.max_bond_length;
        if max.x - min.x > 0.0 {
            scale = scale.min(usable_x / (max.x - min.x));
        }
        if max.y - min.y > 0.0 {
            scale = scale.min(usable_y / (max.y - min.y));
        }

        Self {
            scale,
            center: Point::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0),
            width,
            height,
        }
    }

    fn project(&self, p: Point) -> Point {
        Point::new(
            self.width / 2.0 + (p.x - self.center.x) * self.scale,
            self.height / 2.0 - (p.y - self.center.y) * self.scale,
        )
    }
}

/// Renders a molecule as a standalone SVG document
pub fn depict_svg(mol: &Molecule, options: &DepictionOptions) -> String {
    let rings = RingInfo::find(mol);
    let layout = compute_2d_coords(mol, &rings);
    let viewport = Viewport::fit(&layout, options);
    let points: Vec<Point> = layout.iter().map(|&p| viewport.project(p)).collect();
    let labels: Vec<Option<AtomLabel>> = (0..mol.num_atoms()).map(|a| atom_label(mol, a)).collect();

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = options.width,
        h = options.height
    ));
    svg.push_str(&format!(
        "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"{}\"/>\n",
        options.width, options.height, options.background
    ));

    let offset = (viewport.scale * 0.18).max(2.0);
    let label_gap = options.font_size * 0.55;

    svg.push_str(&format!(
        "<g stroke=\"{}\" stroke-width=\"{:.2}\" stroke-linecap=\"round\">\n",
        BOND_COLOR, options.line_width
    ));

    for bond in mol.bonds() {
        let mut from = points[bond.begin];
        let mut to = points[bond.end];

        if labels[bond.begin].is_some() {
            from = toward(from, to, label_gap);
        }
        if labels[bond.end].is_some() {
            to = toward(to, from, label_gap);
        }

        let ring_center = rings
            .smallest_common_ring(bond.begin, bond.end)
            .map(|ring| centroid(ring.iter().map(|&a| points[a])));

        match (bond.order, ring_center) {
            (BondOrder::Single, _) | (BondOrder::Aromatic, None) => {
                line(&mut svg, from, to, false);
            }
            (BondOrder::Double, Some(center)) => {
                line(&mut svg, from, to, false);
                let (a, b) = inner_line(from, to, center, offset);
                line(&mut svg, a, b, false);
            }
            (BondOrder::Aromatic, Some(center)) => {
                line(&mut svg, from, to, false);
                let (a, b) = inner_line(from, to, center, offset);
                line(&mut svg, a, b, true);
            }
            (BondOrder::Double, None) => {
                let (a1, b1) = shifted(from, to, offset / 2.0);
                let (a2, b2) = shifted(from, to, -offset / 2.0);
                line(&mut svg, a1, b1, false);
                line(&mut svg, a2, b2, false);
            }
            (BondOrder::Triple | BondOrder::Quadruple, _) => {
                line(&mut svg, from, to, false);
                let (a1, b1) = shifted(from, to, offset);
                let (a2, b2) = shifted(from, to, -offset);
                line(&mut svg, a1, b1, false);
                line(&mut svg, a2, b2, false);
            }
        }
    }

    svg.push_str("</g>\n");

    for (index, label) in labels.iter().enumerate() {
        if let Some(label) = label {
            write_label(&mut svg, label, points[index], options);
        }
    }

    svg.push_str("</svg>\n");
    svg
}

fn line(svg: &mut String, from: Point, to: Point, dashed: bool) {
    let dash = if dashed { " stroke-dasharray=\"4,3\"" } else { "" };
    svg.push_str(&format!(
        "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\"{}/>\n",
        from.x, from.y, to.x, to.y, dash
    ));
}

fn write_label(svg: &mut String, label: &AtomLabel, at: Point, options: &DepictionOptions) {
    let small = options.font_size * 0.7;

    svg.push_str(&format!(
        "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\"/>\n",
        at.x,
        at.y,
        options.font_size * 0.6,
        options.background
    ));
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" fill=\"{}\" font-family=\"sans-serif\" font-size=\"{:.1}\" text-anchor=\"middle\" dominant-baseline=\"central\">",
        at.x, at.y, label.color, options.font_size
    ));

    if let Some(isotope) = label.isotope {
        svg.push_str(&format!(
            "<tspan font-size=\"{:.1}\" baseline-shift=\"super\">{}</tspan>",
            small, isotope
        ));
    }

    svg.push_str(label.symbol);

    match label.hydrogens {
        0 => {}
        1 => svg.push('H'),
        n => svg.push_str(&format!(
            "H<tspan font-size=\"{:.1}\" baseline-shift=\"sub\">{}</tspan>",
            small, n
        )),
    }

    if label.charge != 0 {
        svg.push_str(&format!(
            "<tspan font-size=\"{:.1}\" baseline-shift=\"super\">{}</tspan>",
            small,
            charge_text(label.charge)
        ));
    }

    svg.push_str("</text>\n");
}

/// Moves `from` toward `to` by `distance`, never past the midpoint
fn toward(from: Point, to: Point, distance: f64) -> Point {
    let length = from.distance(&to);
    if length < 1e-9 {
        return from;
    }

    let t = (distance / length).min(0.45);
    Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t)
}

fn centroid(points: impl Iterator<Item = Point>) -> Point {
    let (sum, count) = points.fold((Point::default(), 0usize), |(sum, n), p| {
        (Point::new(sum.x + p.x, sum.y + p.y), n + 1)
    });

    if count == 0 {
        return sum;
    }
    Point::new(sum.x / count as f64, sum.y / count as f64)
}

/// The segment translated perpendicular to itself by `offset`
fn shifted(from: Point, to: Point, offset: f64) -> (Point, Point) {
    let length = from.distance(&to).max(1e-9);
    let nx = -(to.y - from.y) / length * offset;
    let ny = (to.x - from.x) / length * offset;
    (
        Point::new(from.x + nx, from.y + ny),
        Point::new(to.x + nx, to.y + ny),
    )
}

/// Second line of a ring double bond, on the ring side and trimmed at both ends
fn inner_line(from: Point, to: Point, center: Point, offset: f64) -> (Point, Point) {
    let (a, b) = shifted(from, to, offset);
    let midpoint = Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);

    let (a, b) = if midpoint.distance(&center) <= shifted_midpoint(from, to, -offset).distance(&center) {
        (a, b)
    } else {
        shifted(from, to, -offset)
    };

    let trim = a.distance(&b) * 0.15;
    (toward(a, b, trim), toward(b, a, trim))
}

fn shifted_midpoint(from: Point, to: Point, offset: f64) -> Point {
    let (a, b) = shifted(from, to, offset);
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::molecule::from_smiles;

    fn render(smiles: &str) -> String {
        depict_svg(&from_smiles(smiles).unwrap(), &DepictionOptions::default())
    }

    #[test]
    fn test_document_shape() {
        let svg = render("CCO");
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.contains("width=\"350\" height=\"300\""));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_carbon_is_unlabeled_and_heteroatoms_are() {
        let svg = render("CCO");
        assert_eq!(svg.matches("<text").count(), 1);
        assert!(svg.contains(">OH</text>"));
    }

    #[test]
    fn test_bond_line_counts() {
        // one single bond
        assert_eq!(render("CC").matches("<line").count(), 1);
        // chain double bond is two parallel lines
        assert_eq!(render("C=C").matches("<line").count(), 2);
        assert_eq!(render("C#C").matches("<line").count(), 3);
    }

    #[test]
    fn test_aromatic_ring_uses_dashed_inner_lines() {
        let svg = render("c1ccccc1");
        assert_eq!(svg.matches("<line").count(), 12);
        assert_eq!(svg.matches("stroke-dasharray").count(), 6);
    }

    #[test]
    fn test_sample_molecule_labels() {
        let svg = render("C1=CC(=CC=C1C(=O)O)C(=O)O");
        // two carbonyl oxygens and two hydroxyls
        assert_eq!(svg.matches(">O</text>").count(), 2);
        assert_eq!(svg.matches(">OH</text>").count(), 2);
        assert!(svg.contains("#E00000"));
    }

    #[test]
    fn test_charges_and_isolated_atoms() {
        let svg = render("[NH4+].[Cl-]");
        assert!(svg.contains("NH<tspan font-size=\"10.5\" baseline-shift=\"sub\">4</tspan>"));
        assert!(svg.contains("baseline-shift=\"super\">+</tspan>"));
        assert!(svg.contains("Cl<tspan font-size=\"10.5\" baseline-shift=\"super\">-</tspan>"));

        let methane = render("C");
        assert!(methane.contains("CH<tspan font-size=\"10.5\" baseline-shift=\"sub\">4</tspan>"));
    }

    #[test]
    fn test_charge_text() {
        assert_eq!(charge_text(1), "+");
        assert_eq!(charge_text(-1), "-");
        assert_eq!(charge_text(2), "2+");
        assert_eq!(charge_text(-3), "3-");
    }

    #[test]
    fn test_coordinates_stay_on_canvas() {
        let options = DepictionOptions {
            width: 200,
            height: 120,
            ..Default::default()
        };
        let mol = from_smiles("CCCCCCCCCCCCCCCCCCCC").unwrap();
        let svg = depict_svg(&mol, &options);

        for attribute in ["x1=\"", "x2=\""] {
            for part in svg.split(attribute).skip(1) {
                let value: f64 = part.split('"').next().unwrap().parse().unwrap();
                assert!((0.0..=200.0).contains(&value));
            }
        }
    }
}
