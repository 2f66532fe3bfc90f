//! Geometric ("exact") low-voltage line model.
//!
//! Computes the full 4×4 impedance and shunt admittance matrices of a
//! 3-phase + neutral line from the physical conductor layout, at the fixed
//! network frequency. Series inductance uses the Carson-style logarithmic
//! approximation over geometric mean radii; shunt capacitance uses
//! image-conductor electrostatics: each conductor is mirrored across the
//! ground plane and the potential coefficient matrix is inverted into a
//! Maxwell capacitance matrix.
//!
//! Conductor positions are fixed fractions of the cable's external diameter
//! around the bundle axis. Heights are signed: overhead and twisted bundles
//! hang above ground (`h > 0`), buried cables sit below it (`h < 0`), which
//! keeps every image distance positive.

use num_complex::Complex64;

use crate::constants::{Insulator, LineType, Material, EPSILON_0, MU_0, OMEGA};
use crate::error::{ZykError, ZykResult};
use crate::matrix::{invert_real, SquareMatrix};
use crate::units::{Meters, SquareMillimeters};

use super::{LineDerivation, LineParameters};

/// Number of conductors: phases a, b, c and the neutral.
const N_COND: usize = 4;

/// 2-D conductor coordinates for the supported layouts.
///
/// Overhead and twisted bundles place the phases around the neutral at the
/// bundle axis; buried cables place all four conductors in a square around
/// the cable axis. Offsets are fixed fractions of the external diameter.
fn conductor_positions(line_type: LineType, height: f64, diameter: f64) -> [(f64, f64); N_COND] {
    match line_type {
        LineType::Overhead | LineType::Twisted => {
            let dx = f64::sqrt(3.0) / 8.0 * diameter;
            [
                (-dx, height + diameter / 8.0),
                (dx, height + diameter / 8.0),
                (0.0, height - diameter / 4.0),
                (0.0, height),
            ]
        }
        LineType::Underground => {
            let o = f64::sqrt(2.0) / 8.0 * diameter;
            [
                (-o, height - o),
                (o, height - o),
                (o, height + o),
                (-o, height + o),
            ]
        }
    }
}

impl LineParameters {
    /// Derive the 4×4 matrices of a phase + neutral line from its geometry.
    ///
    /// `section` applies to the three phase conductors, `section_neutral` to
    /// the neutral. `height` is the signed height of the bundle axis and
    /// `external_diameter` the overall cable diameter. The result is always
    /// a 4-conductor parameter set; 3-conductor lines come from sequence
    /// data instead.
    #[allow(clippy::too_many_arguments)]
    pub fn from_geometry(
        id: impl Into<String>,
        line_type: LineType,
        material: Material,
        insulator: Insulator,
        section: SquareMillimeters,
        section_neutral: SquareMillimeters,
        height: Meters,
        external_diameter: Meters,
    ) -> ZykResult<Self> {
        let id = id.into();

        let h = height.value();
        let below_ground = line_type == LineType::Underground;
        if below_ground && h >= 0.0 {
            return Err(ZykError::Domain(format!(
                "line {id:?}: an underground line must be buried (height < 0), got {height}"
            )));
        }
        if !below_ground && h <= 0.0 {
            return Err(ZykError::Domain(format!(
                "line {id:?}: an overhead or twisted line must hang above ground (height > 0), \
                 got {height}"
            )));
        }

        let epsilon = if below_ground {
            EPSILON_0 * insulator.relative_permittivity()
        } else {
            EPSILON_0
        };

        let positions = conductor_positions(line_type, h, external_diameter.value());

        // per-conductor radius and geometric mean radius (m)
        let sections_m2 = [
            section.to_square_meters(),
            section.to_square_meters(),
            section.to_square_meters(),
            section_neutral.to_square_meters(),
        ];
        let radii: Vec<f64> = sections_m2
            .iter()
            .map(|s| (s / std::f64::consts::PI).sqrt())
            .collect();
        let gmr: Vec<f64> = radii.iter().map(|r| r * (-0.25f64).exp()).collect();

        // direct distances and distances to the ground-plane images
        let mut dist = [[0.0; N_COND]; N_COND];
        let mut dist_prime = [[0.0; N_COND]; N_COND];
        for i in 0..N_COND {
            let (xi, yi) = positions[i];
            for j in 0..N_COND {
                let (xj, yj) = positions[j];
                dist[i][j] = f64::hypot(xi - xj, yi - yj);
                dist_prime[i][j] = f64::hypot(xi - xj, yi + yj);
            }
        }

        // series inductance (H/m) and potential coefficients (m/F)
        let mu_over_2pi = MU_0 / (2.0 * std::f64::consts::PI);
        let p_coeff = 1.0 / (2.0 * std::f64::consts::PI * epsilon);
        let mut inductance = [[0.0; N_COND]; N_COND];
        let mut lambda = vec![vec![0.0; N_COND]; N_COND];
        for i in 0..N_COND {
            for j in 0..N_COND {
                if i == j {
                    inductance[i][j] = mu_over_2pi * (1.0 / gmr[i]).ln();
                    lambda[i][j] = p_coeff * (dist_prime[i][i] / radii[i]).ln();
                } else {
                    inductance[i][j] = mu_over_2pi * (1.0 / dist[i][j]).ln();
                    lambda[i][j] = p_coeff * (dist_prime[i][j] / dist[i][j]).ln();
                }
            }
        }

        // Maxwell capacitance matrix is the inverse of the potential
        // coefficient matrix; its row structure gives the nodal capacitances.
        let maxwell = invert_real(&lambda).map_err(|err| {
            ZykError::Physical(format!(
                "line {id:?}: the potential coefficient matrix is not invertible ({err})"
            ))
        })?;

        let mut capacitance = [[0.0; N_COND]; N_COND];
        let mut conductance = [0.0; N_COND];
        for i in 0..N_COND {
            capacitance[i][i] = maxwell[i].iter().sum();
            for j in 0..N_COND {
                if j != i {
                    capacitance[i][j] = -maxwell[i][j];
                }
            }
            conductance[i] = insulator.loss_tangent() * capacitance[i][i] * OMEGA;
        }

        // per-meter series impedance and nodal admittance
        let mut z_line = SquareMatrix::zeros(N_COND);
        let mut y_nodal = SquareMatrix::zeros(N_COND);
        for i in 0..N_COND {
            for j in 0..N_COND {
                let resistance = if i == j {
                    material.resistivity() / sections_m2[i]
                } else {
                    0.0
                };
                let g = if i == j { conductance[i] } else { 0.0 };
                *z_line.get_mut(i, j) = Complex64::new(resistance, OMEGA * inductance[i][j]);
                *y_nodal.get_mut(i, j) = Complex64::new(g, OMEGA * capacitance[i][j]);
            }
        }

        // nodal admittance to π-model shunt admittance
        let mut y_shunt = SquareMatrix::zeros(N_COND);
        for i in 0..N_COND {
            let mut row_sum = Complex64::new(0.0, 0.0);
            for k in 0..N_COND {
                row_sum += y_nodal.get(i, k);
            }
            *y_shunt.get_mut(i, i) = row_sum;
            for j in 0..N_COND {
                if j != i {
                    *y_shunt.get_mut(i, j) = -y_nodal.get(i, j);
                }
            }
        }

        // per meter to per kilometer
        z_line.scale(1e3);
        y_shunt.scale(1e3);

        Ok(Self::new(id, LineDerivation::Geometric { z_line, y_shunt })?
            .with_line_type(line_type)
            .with_material(material)
            .with_insulator(insulator)
            .with_section(section)
            .with_section_neutral(section_neutral))
    }
}

#[cfg(test)]
mod tests {
    use crate::line::LineModel;

    use super::*;

    fn overhead_fixture() -> LineParameters {
        LineParameters::from_geometry(
            "geo_o",
            LineType::Overhead,
            Material::Aluminium,
            Insulator::Xlpe,
            SquareMillimeters(150.0),
            SquareMillimeters(70.0),
            Meters(10.0),
            Meters(0.04),
        )
        .unwrap()
    }

    #[test]
    fn test_model_and_shape() {
        let line = overhead_fixture();
        assert_eq!(line.model(), LineModel::LvExact);
        assert_eq!(line.order(), 4);
        assert!(line.with_shunt());
        assert_eq!(line.line_type(), Some(LineType::Overhead));
        assert_eq!(line.material(), Some(Material::Aluminium));
        assert_eq!(line.section(), Some(SquareMillimeters(150.0)));
    }

    #[test]
    fn test_series_resistances() {
        let line = overhead_fixture();
        // R = ρ / s, per km: 2.8264e-8 / 1.5e-4 * 1e3 ≈ 0.1884 Ω/km
        let r_phase = line.z_line().get(0, 0).re;
        assert!((r_phase - 0.18843).abs() < 1e-4, "got {r_phase}");
        // neutral: 2.8264e-8 / 7e-5 * 1e3 ≈ 0.4038 Ω/km
        let r_neutral = line.z_line().get(3, 3).re;
        assert!((r_neutral - 0.40377).abs() < 1e-4, "got {r_neutral}");
        // mutual terms carry no resistance
        assert_eq!(line.z_line().get(0, 1).re, 0.0);
    }

    #[test]
    fn test_phase_symmetry() {
        let line = overhead_fixture();
        let z = line.z_line();
        // phases a and b sit at the same height with the same section
        assert!((z.get(0, 0) - z.get(1, 1)).norm() < 1e-12);
        // the matrix is symmetric
        for i in 0..4 {
            for j in 0..4 {
                assert!((z.get(i, j) - z.get(j, i)).norm() < 1e-12);
            }
        }
    }

    #[test]
    fn test_mutual_reactance_from_layout() {
        let line = overhead_fixture();
        // conductors a and b are 2·(√3/8)·d apart
        let d_ab = f64::sqrt(3.0) / 4.0 * 0.04;
        let expected = OMEGA * MU_0 / (2.0 * std::f64::consts::PI) * (1.0 / d_ab).ln() * 1e3;
        let x_ab = line.z_line().get(0, 1).im;
        assert!((x_ab - expected).abs() < 1e-9, "got {x_ab}, want {expected}");
    }

    #[test]
    fn test_shunt_invariants() {
        let line = overhead_fixture();
        let y = line.y_shunt().unwrap();
        for i in 0..4 {
            // diagonal: positive dielectric losses, capacitive susceptance
            assert!(y.get(i, i).re >= 0.0);
            assert!(y.get(i, i).im > 0.0);
            for j in 0..4 {
                if i != j {
                    assert_eq!(y.get(i, j).re, 0.0);
                }
            }
        }
    }

    #[test]
    fn test_underground_permittivity_scaling() {
        let build = |insulator| {
            LineParameters::from_geometry(
                "geo_u",
                LineType::Underground,
                Material::Copper,
                insulator,
                SquareMillimeters(150.0),
                SquareMillimeters(70.0),
                Meters(-1.5),
                Meters(0.04),
            )
            .unwrap()
        };
        let xlpe = build(Insulator::Xlpe);
        let pvc = build(Insulator::Pvc);

        // capacitance scales linearly with εᵣ: PVC (6.5) vs XLPE (2.5)
        let ratio = pvc.y_shunt().unwrap().get(0, 0).im / xlpe.y_shunt().unwrap().get(0, 0).im;
        assert!((ratio - 6.5 / 2.5).abs() < 1e-9, "got {ratio}");

        // the series impedance does not depend on the insulator
        assert!(xlpe.z_line().approx_eq(pvc.z_line(), 1e-15));
    }

    #[test]
    fn test_twisted_matches_overhead_layout() {
        let twisted = LineParameters::from_geometry(
            "geo_t",
            LineType::Twisted,
            Material::Aluminium,
            Insulator::Xlpe,
            SquareMillimeters(150.0),
            SquareMillimeters(70.0),
            Meters(10.0),
            Meters(0.04),
        )
        .unwrap();
        let overhead = overhead_fixture();
        assert!(twisted.z_line().approx_eq(overhead.z_line(), 1e-15));
        assert!(twisted
            .y_shunt()
            .unwrap()
            .approx_eq(overhead.y_shunt().unwrap(), 1e-15));
    }

    #[test]
    fn test_determinism() {
        let a = overhead_fixture();
        let b = overhead_fixture();
        assert!(a.z_line().approx_eq(b.z_line(), 0.0));
        assert!(a.y_shunt().unwrap().approx_eq(b.y_shunt().unwrap(), 0.0));
    }

    #[test]
    fn test_wrong_side_of_ground_fails() {
        let buried_overhead = LineParameters::from_geometry(
            "geo_bad",
            LineType::Overhead,
            Material::Aluminium,
            Insulator::Xlpe,
            SquareMillimeters(150.0),
            SquareMillimeters(70.0),
            Meters(-10.0),
            Meters(0.04),
        );
        assert!(matches!(buried_overhead, Err(ZykError::Domain(_))));

        let floating_cable = LineParameters::from_geometry(
            "geo_bad",
            LineType::Underground,
            Material::Copper,
            Insulator::Pvc,
            SquareMillimeters(150.0),
            SquareMillimeters(70.0),
            Meters(1.5),
            Meters(0.04),
        );
        assert!(matches!(floating_cable, Err(ZykError::Domain(_))));
    }
}
