//! Plot-space coordinates for structure, normal force and bending moment diagrams
//!
//! Nothing is drawn here. Coordinates use `y = -z`, so positive y points up.

use serde::Serialize;
use std::f64::consts::FRAC_PI_2;
use std::iter;

use crate::elements::{Element, Orientation};

/// Number of interior samples along a moment curve
pub const DEFAULT_SAMPLES: usize = 20;

/// Fallback scale when every plotted value is zero
const FALLBACK_FACTOR: f64 = 0.1;

/// A point in plot space
pub type PlotPoint = (f64, f64);

/// Diagram data of one element
#[derive(Debug, Clone, Serialize)]
pub struct ElementDiagram {
    pub element: usize,
    pub outline: [PlotPoint; 2],
    pub normal_force: Option<[PlotPoint; 4]>,
    pub bending_moment: Option<Vec<PlotPoint>>,
    /// Moment at midspan, reported when the element carries a distributed load
    pub sagging_moment: Option<f64>,
}

impl ElementDiagram {
    /// Build all diagram data for an element
    pub fn new(element: &Element, normal_factor: f64, moment_factor: f64, samples: usize) -> Self {
        let sagging_moment = element.q_load().and_then(|_| element.midspan_moment());
        Self {
            element: element.id,
            outline: element_outline(element),
            normal_force: normal_force_outline(element, normal_factor),
            bending_moment: moment_curve(element, moment_factor, samples).map(|points| points.collect()),
            sagging_moment,
        }
    }
}

/// Diagram data for a set of solved elements, each scaled to a common factor
pub fn diagrams(elements: &[Element], samples: usize) -> Vec<ElementDiagram> {
    let normal_factor = normal_force_scale_factor(elements);
    let moment_factor = moment_scale_factor(elements);
    elements
        .iter()
        .map(|element| ElementDiagram::new(element, normal_factor, moment_factor, samples))
        .collect()
}

fn plot_point(element: &Element, node: usize) -> PlotPoint {
    let point = if node == 1 { element.point_1 } else { element.point_2 };
    (point.x, -point.z)
}

/// Unit normal used to offset diagram values from the element axis
fn offset_direction(element: &Element) -> PlotPoint {
    let angle = FRAC_PI_2 + element.alpha;
    (angle.cos(), angle.sin())
}

/// Element outline `[(x1, y1), (x2, y2)]`
pub fn element_outline(element: &Element) -> [PlotPoint; 2] {
    [plot_point(element, 1), plot_point(element, 2)]
}

/// Rectangle of the normal force, offset from the axis by `N * factor`
pub fn normal_force_outline(element: &Element, factor: f64) -> Option<[PlotPoint; 4]> {
    let n = element.normal_force()?;
    let (x1, y1) = plot_point(element, 1);
    let (x2, y2) = plot_point(element, 2);
    let (nx, ny) = offset_direction(element);
    let offset = n * factor;

    Some([
        (x1, y1),
        (x1 + offset * nx, y1 + offset * ny),
        (x2 + offset * nx, y2 + offset * ny),
        (x2, y2),
    ])
}

/// Sign applied to the end moments before offsetting, per orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MomentEndCase {
    Vertical,
    Point1Left,
    Point1Right,
}

impl MomentEndCase {
    fn of(element: &Element) -> Self {
        if element.orientation() == Orientation::Vertical {
            Self::Vertical
        } else if element.point_2.x - element.point_1.x > 0.0 {
            Self::Point1Left
        } else {
            Self::Point1Right
        }
    }

    /// Signs for the node 1 and node 2 offsets
    fn signs(self) -> (f64, f64) {
        match self {
            Self::Vertical | Self::Point1Left => (1.0, -1.0),
            Self::Point1Right => (-1.0, 1.0),
        }
    }
}

/// Bending moment curve of a solved element
///
/// Yields `samples + 2` points: the first element endpoint, `samples` points
/// interpolated between the offset end moments (plus the parabola of a
/// distributed load), and the second endpoint.
pub fn moment_curve(element: &Element, factor: f64, samples: usize) -> Option<impl Iterator<Item = PlotPoint>> {
    let (node_1, node_2) = (element.node_1()?, element.node_2()?);
    let start = plot_point(element, 1);
    let end = plot_point(element, 2);
    let (nx, ny) = offset_direction(element);
    let (sign_1, sign_2) = MomentEndCase::of(element).signs();

    let m1 = sign_1 * node_1.ty * factor;
    let m2 = sign_2 * node_2.ty * factor;
    let from = (start.0 + m1 * nx, start.1 + m1 * ny);
    let to = (end.0 + m2 * nx, end.1 + m2 * ny);

    let q = element.q_load().unwrap_or(0.0);
    let length = element.length;
    let cos_alpha = element.alpha.cos();

    let interior = (0..samples).map(move |i| {
        let t = if samples > 1 { i as f64 / (samples - 1) as f64 } else { 0.0 };
        let x = t * length;
        let parabola = 0.5 * q * x.powi(2) - 0.5 * q * length * x;
        (
            from.0 + t * (to.0 - from.0),
            from.1 + t * (to.1 - from.1) + cos_alpha * parabola * factor,
        )
    });

    Some(iter::once(start).chain(interior).chain(iter::once(end)))
}

fn scale_factor(max_value: f64) -> f64 {
    if max_value <= f64::EPSILON {
        FALLBACK_FACTOR
    } else {
        1.0 / max_value
    }
}

/// Scale factor mapping the largest moment onto unit length
pub fn moment_scale_factor(elements: &[Element]) -> f64 {
    let max_moment = elements
        .iter()
        .filter_map(|element| {
            let ends = element.max_end_moment()?;
            let midspan = element
                .q_load()
                .and_then(|_| element.midspan_moment())
                .map_or(0.0, f64::abs);
            Some(ends.max(midspan))
        })
        .fold(0.0, f64::max);
    scale_factor(max_moment)
}

/// Scale factor mapping the largest normal force onto unit length
pub fn normal_force_scale_factor(elements: &[Element]) -> f64 {
    let max_force = elements
        .iter()
        .filter_map(Element::normal_force)
        .map(f64::abs)
        .fold(0.0, f64::max);
    scale_factor(max_force)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::LoadSense;
    use crate::model::SystemElements;
    use approx::assert_relative_eq;

    fn simply_supported(q: f64, l: f64) -> SystemElements {
        let mut system = SystemElements::with_options(crate::analysis::AnalysisOptions::linear().quiet());
        system.add_element((0.0, 0.0), (l, 0.0), 1e6, 1e4).unwrap();
        system.add_support_hinged(1).unwrap();
        system.add_support_roll(2, crate::topology::Direction::Z).unwrap();
        system.q_load(1, q, LoadSense::Towards).unwrap();
        system.assemble_system_matrix();
        system.process_conditions().unwrap();
        system.solve().unwrap();
        system
    }

    #[test]
    fn test_outline_flips_z() {
        let mut system = SystemElements::new();
        system.add_element((1.0, 2.0), (4.0, -3.0), 1.0, 1.0).unwrap();
        let outline = element_outline(system.element(1).unwrap());
        assert_eq!(outline, [(1.0, -2.0), (4.0, 3.0)]);
    }

    #[test]
    fn test_moment_curve_has_parabola_at_midspan() {
        let (q, l) = (10.0, 4.0);
        let system = simply_supported(q, l);
        let element = system.element(1).unwrap();

        let factor = moment_scale_factor(system.elements());
        assert_relative_eq!(factor, 8.0 / (q * l * l), epsilon = 1e-9);

        let points: Vec<PlotPoint> = moment_curve(element, factor, 21).unwrap().collect();
        assert_eq!(points.len(), 23);
        assert_eq!(points[0], (0.0, 0.0));
        assert_eq!(points[22], (l, 0.0));

        // Sagging moment plots below the axis, scaled to unit length
        let (x, y) = points[11];
        assert_relative_eq!(x, l / 2.0, epsilon = 1e-9);
        assert_relative_eq!(y, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_unsolved_element_has_no_diagrams() {
        let mut system = SystemElements::new();
        system.add_element((0.0, 0.0), (3.0, 0.0), 1.0, 1.0).unwrap();
        let element = system.element(1).unwrap();
        assert!(moment_curve(element, 1.0, 5).is_none());
        assert!(normal_force_outline(element, 1.0).is_none());
    }

    #[test]
    fn test_scale_factor_fallback() {
        assert_eq!(scale_factor(0.0), FALLBACK_FACTOR);
        assert_eq!(scale_factor(4.0), 0.25);

        let system = simply_supported(0.0, 3.0);
        assert_eq!(normal_force_scale_factor(system.elements()), FALLBACK_FACTOR);
    }

    #[test]
    fn test_diagrams_cover_every_element() {
        let system = simply_supported(5.0, 6.0);
        let diagrams = diagrams(system.elements(), DEFAULT_SAMPLES);
        assert_eq!(diagrams.len(), 1);
        assert_relative_eq!(diagrams[0].sagging_moment.unwrap(), 5.0 * 36.0 / 8.0, epsilon = 1e-6);
        assert_eq!(diagrams[0].bending_moment.as_ref().unwrap().len(), DEFAULT_SAMPLES + 2);
    }
}
