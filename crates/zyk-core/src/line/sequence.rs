//! Symmetrical-sequence to phase-domain conversion.
//!
//! Catalogue rows and vendor exports describe a balanced line through its
//! zero-sequence and direct-sequence impedance and admittance. This module
//! turns those into the full phase-domain matrices the solver needs, as a
//! circulant 3×3 pair optionally extended with a neutral row and column.
//!
//! Some vendor exports carry degenerate sequence data that makes the
//! balanced conversion singular. The conversion therefore walks an ordered
//! list of derivation strategies and keeps the first one whose impedance
//! matrix is invertible. The fallback keeps only the direct-sequence terms
//! (`zs = z1`, `zm = 0`); it discards the mutual coupling encoded in the
//! zero sequence, which is a modeling approximation, not recovered physics.

use num_complex::Complex64;
use tracing::{debug, warn};

use crate::error::{ZykError, ZykResult};
use crate::matrix::SquareMatrix;
use crate::units::{OhmsPerKilometer, SiemensPerKilometer};

use super::{LineDerivation, LineParameters};

/// Determinant magnitude below which an impedance matrix counts as singular.
const DET_ATOL: f64 = 1e-12;

/// Zero-sequence and direct-sequence data of a balanced line (per km).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SequenceData {
    /// Zero-sequence series resistance
    pub r0: OhmsPerKilometer,
    /// Zero-sequence series reactance
    pub x0: OhmsPerKilometer,
    /// Direct-sequence series resistance
    pub r1: OhmsPerKilometer,
    /// Direct-sequence series reactance
    pub x1: OhmsPerKilometer,
    /// Zero-sequence shunt conductance
    pub g0: SiemensPerKilometer,
    /// Zero-sequence shunt susceptance
    pub b0: SiemensPerKilometer,
    /// Direct-sequence shunt conductance
    pub g1: SiemensPerKilometer,
    /// Direct-sequence shunt susceptance
    pub b1: SiemensPerKilometer,
}

/// Neutral-conductor terms extending a sequence conversion to four wires
/// (per km).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NeutralSequence {
    /// Neutral series resistance
    pub rn: OhmsPerKilometer,
    /// Neutral series reactance
    pub xn: OhmsPerKilometer,
    /// Phase-to-neutral mutual reactance
    pub xpn: OhmsPerKilometer,
    /// Neutral shunt susceptance
    pub bn: SiemensPerKilometer,
    /// Phase-to-neutral shunt susceptance
    pub bpn: SiemensPerKilometer,
}

impl NeutralSequence {
    fn is_zero(&self) -> bool {
        self.rn.value() == 0.0
            && self.xn.value() == 0.0
            && self.xpn.value() == 0.0
            && self.bn.value() == 0.0
            && self.bpn.value() == 0.0
    }
}

/// One candidate way of turning sequence components into circulant entries.
struct Derivation {
    name: &'static str,
    zs: Complex64,
    zm: Complex64,
    ys: Complex64,
    ym: Complex64,
}

impl Derivation {
    /// Standard symmetrical-component inversion of a balanced circuit.
    fn balanced(z0: Complex64, z1: Complex64, y0: Complex64, y1: Complex64) -> Self {
        Self {
            name: "balanced",
            zs: (z0 + z1 * 2.0) / 3.0,
            zm: (z0 - z1) / 3.0,
            ys: (y0 + y1 * 2.0) / 3.0,
            ym: (y0 - y1) / 3.0,
        }
    }

    /// Direct-sequence-only fallback for degenerate source data.
    fn direct_only(z1: Complex64, y1: Complex64) -> Self {
        Self {
            name: "direct-sequence",
            zs: z1,
            zm: Complex64::new(0.0, 0.0),
            ys: y1,
            ym: Complex64::new(0.0, 0.0),
        }
    }

    /// Assemble the circulant matrices, extended with a neutral row and
    /// column when neutral terms are given.
    fn assemble(&self, neutral: Option<&NeutralSequence>) -> (SquareMatrix, SquareMatrix) {
        let order = if neutral.is_some() { 4 } else { 3 };
        let mut z = SquareMatrix::zeros(order);
        let mut y = SquareMatrix::zeros(order);

        for i in 0..3 {
            for j in 0..3 {
                *z.get_mut(i, j) = if i == j { self.zs } else { self.zm };
                *y.get_mut(i, j) = if i == j { self.ys } else { self.ym };
            }
        }

        if let Some(n) = neutral {
            let zn = Complex64::new(n.rn.value(), n.xn.value());
            let zpn = Complex64::new(0.0, n.xpn.value());
            let yn = Complex64::new(0.0, n.bn.value());
            let ypn = Complex64::new(0.0, n.bpn.value());
            *z.get_mut(3, 3) = zn;
            *y.get_mut(3, 3) = yn;
            for i in 0..3 {
                *z.get_mut(i, 3) = zpn;
                *z.get_mut(3, i) = zpn;
                *y.get_mut(i, 3) = ypn;
                *y.get_mut(3, i) = ypn;
            }
        }

        (z, y)
    }
}

impl LineParameters {
    /// Derive phase-domain matrices from sequence data.
    ///
    /// Supplying `neutral` requests a 4-conductor result; when every neutral
    /// term is zero, the request is downgraded to the 3-conductor form (this
    /// is the one documented, logged degradation of the crate). Candidate
    /// derivations are tried in order until one yields an invertible
    /// impedance matrix; if none does, the sequence data itself is
    /// inconsistent and a physical-invalidity error names the line.
    pub fn from_sym(
        id: impl Into<String>,
        data: &SequenceData,
        neutral: Option<NeutralSequence>,
    ) -> ZykResult<Self> {
        let id = id.into();

        let z0 = Complex64::new(data.r0.value(), data.x0.value());
        let z1 = Complex64::new(data.r1.value(), data.x1.value());
        let y0 = Complex64::new(data.g0.value(), data.b0.value());
        let y1 = Complex64::new(data.g1.value(), data.b1.value());

        let neutral = match neutral {
            Some(n) if n.is_zero() => {
                warn!(
                    line = %id,
                    "neutral sequence terms are all zero, downgrading to a 3-conductor model"
                );
                None
            }
            other => other,
        };

        let candidates = [
            Derivation::balanced(z0, z1, y0, y1),
            Derivation::direct_only(z1, y1),
        ];

        for candidate in &candidates {
            let (z_line, y_shunt) = candidate.assemble(neutral.as_ref());
            if z_line.det().norm() > DET_ATOL {
                if candidate.name != "balanced" {
                    debug!(
                        line = %id,
                        derivation = candidate.name,
                        "balanced sequence data is degenerate, using fallback derivation"
                    );
                }
                return Self::new(id, LineDerivation::Sequence { z_line, y_shunt });
            }
        }

        Err(ZykError::Physical(format!(
            "line {id:?}: the impedance matrix is singular for every sequence derivation; \
             the zero- and direct-sequence data are inconsistent"
        )))
    }
}
