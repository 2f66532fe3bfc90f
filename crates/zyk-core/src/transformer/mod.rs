//! Transformer parameter value objects.
//!
//! A [`TransformerParameters`] carries the nameplate of a three-phase MV/LV
//! transformer (rated power, voltages, no-load and short-circuit test
//! results, vector group) together with the equivalent-circuit quantities
//! derived from it once at construction: the series impedance `z2` referred
//! to the low-voltage side, the magnetizing admittance `ym`, the complex
//! transformation ratio `k` and the winding orientation sign.
//!
//! Only the nameplate is ever serialized; the derived quantities are
//! recomputed on load so they can never drift out of sync with the test
//! data that defines them.

pub mod windings;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{ZykError, ZykResult};
use crate::units::{PerUnit, VoltAmperes, Volts, Watts};

pub use windings::{phase_shift, VectorGroup};

/// Equivalent-circuit quantities of one transformer, referred to the
/// low-voltage side.
#[derive(Debug, Clone, Copy, PartialEq)]
struct EquivalentCircuit {
    z2: Complex64,
    ym: Complex64,
    k: Complex64,
    orientation: f64,
}

/// Validated parameters of a three-phase transformer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TransformerParametersDoc")]
pub struct TransformerParameters {
    id: String,
    /// Nominal apparent power (VA)
    sn: VoltAmperes,
    /// Nominal phase-to-phase voltage, high-voltage side (V)
    uhv: Volts,
    /// Nominal phase-to-phase voltage, low-voltage side (V)
    ulv: Volts,
    /// No-load (iron) losses (W)
    p0: Watts,
    /// No-load current, fraction of nominal
    i0: PerUnit,
    /// Short-circuit (copper) losses (W)
    psc: Watts,
    /// Short-circuit voltage, fraction of nominal
    vsc: PerUnit,
    /// Vector-group code (e.g. `Dyn11`)
    windings: String,
    #[serde(skip)]
    group: VectorGroup,
    #[serde(skip)]
    circuit: EquivalentCircuit,
}

impl TransformerParameters {
    /// Build and validate transformer parameters from nameplate data.
    ///
    /// Fails when `uhv ≤ ulv` (the high-voltage side must be the larger one
    /// by convention), when the vector group is not a standard winding
    /// combination, or when the short-circuit test values are mutually
    /// inconsistent.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        sn: VoltAmperes,
        uhv: Volts,
        ulv: Volts,
        p0: Watts,
        i0: PerUnit,
        psc: Watts,
        vsc: PerUnit,
        windings: &str,
    ) -> ZykResult<Self> {
        let id = id.into();

        if uhv.value() <= ulv.value() {
            return Err(ZykError::Domain(format!(
                "transformer {id:?}: the high-voltage side must have the larger nominal voltage, \
                 got uhv = {uhv} and ulv = {ulv}"
            )));
        }

        let group = VectorGroup::parse(windings)?;
        let circuit = to_zyk(&id, sn, uhv, ulv, p0, i0, psc, vsc, &group)?;

        Ok(Self {
            id,
            sn,
            uhv,
            ulv,
            p0,
            i0,
            psc,
            vsc,
            windings: windings.to_string(),
            group,
            circuit,
        })
    }

    /// Opaque identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Nominal apparent power (VA).
    pub fn sn(&self) -> VoltAmperes {
        self.sn
    }

    /// Nominal phase-to-phase voltage, high-voltage side (V).
    pub fn uhv(&self) -> Volts {
        self.uhv
    }

    /// Nominal phase-to-phase voltage, low-voltage side (V).
    pub fn ulv(&self) -> Volts {
        self.ulv
    }

    /// No-load losses (W).
    pub fn p0(&self) -> Watts {
        self.p0
    }

    /// No-load current, fraction of nominal.
    pub fn i0(&self) -> PerUnit {
        self.i0
    }

    /// Short-circuit losses (W).
    pub fn psc(&self) -> Watts {
        self.psc
    }

    /// Short-circuit voltage, fraction of nominal.
    pub fn vsc(&self) -> PerUnit {
        self.vsc
    }

    /// Vector-group code string.
    pub fn windings(&self) -> &str {
        &self.windings
    }

    /// High-voltage winding connection (e.g. `D`, `Yn`).
    pub fn winding1(&self) -> &str {
        self.group.winding1()
    }

    /// Low-voltage winding connection (e.g. `yn`, `zn`).
    pub fn winding2(&self) -> &str {
        self.group.winding2()
    }

    /// Clock number of the vector group.
    pub fn phase_displacement(&self) -> u8 {
        self.group.phase_displacement()
    }

    /// Series impedance referred to the low-voltage side (Ω).
    pub fn z2(&self) -> Complex64 {
        self.circuit.z2
    }

    /// Magnetizing admittance (S).
    pub fn ym(&self) -> Complex64 {
        self.circuit.ym
    }

    /// Complex transformation ratio: magnitude is the winding-corrected
    /// voltage ratio, phase is the clock shift.
    pub fn k(&self) -> Complex64 {
        self.circuit.k
    }

    /// Winding orientation: +1.0 for direct winding, −1.0 for reverse.
    pub fn orientation(&self) -> f64 {
        self.circuit.orientation
    }
}

// Equality is the nameplate: two transformers with the same id and test data
// are the same transformer, because everything else is derived from those.
impl PartialEq for TransformerParameters {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.sn == other.sn
            && self.uhv == other.uhv
            && self.ulv == other.ulv
            && self.p0 == other.p0
            && self.i0 == other.i0
            && self.psc == other.psc
            && self.vsc == other.vsc
            && self.windings == other.windings
    }
}

/// Derive the equivalent circuit from the factory test data.
///
/// The no-load test gives the magnetizing branch: the iron-loss resistance
/// from `p0`, plus a magnetizing inductance when the measured no-load
/// current exceeds what the iron losses alone explain. The short-circuit
/// test gives the series branch referred to the low-voltage side. The
/// voltage reference of each side is corrected for its winding connection
/// (phase voltage for wye, a third for zigzag) before forming the ratio.
#[allow(clippy::too_many_arguments)]
fn to_zyk(
    id: &str,
    sn: VoltAmperes,
    uhv: Volts,
    ulv: Volts,
    p0: Watts,
    i0: PerUnit,
    psc: Watts,
    vsc: PerUnit,
    group: &VectorGroup,
) -> ZykResult<EquivalentCircuit> {
    let sn = sn.value();
    let uhv = uhv.value();
    let ulv = ulv.value();
    let p0 = p0.value();
    let i0 = i0.value();
    let psc = psc.value();
    let vsc = vsc.value();

    // open-circuit test: iron losses, then the magnetizing reactive term
    // when the no-load current carries more than the iron losses explain
    let r_iron = uhv * uhv / p0;
    let i0_power = i0 * sn;
    let ym = if i0_power > p0 {
        let lm_omega = uhv * uhv / (i0_power * i0_power - p0 * p0).sqrt();
        Complex64::new(1.0 / r_iron, -1.0 / lm_omega)
    } else {
        Complex64::new(1.0 / r_iron, 0.0)
    };

    // short-circuit test, referred to the low-voltage side
    let r2 = psc * (ulv / sn) * (ulv / sn);
    let z2_norm = vsc * ulv * ulv / sn;
    let radicand = z2_norm * z2_norm - r2 * r2;
    if radicand < 0.0 {
        return Err(ZykError::Domain(format!(
            "transformer {id:?}: the short-circuit test values are inconsistent \
             (psc = {psc} W implies a resistance above the total impedance from vsc = {vsc})"
        )));
    }
    let z2 = Complex64::new(r2, radicand.sqrt());

    // winding reference correction: wye windings measure phase-to-phase
    // voltage √3 above the winding voltage, zigzag windings a factor 3
    let uhv = winding_reference(uhv, group.winding1());
    let ulv = winding_reference(ulv, group.winding2());

    let clock = group.phase_displacement();
    let k = match clock {
        0 | 5 | 6 | 11 => phase_shift(clock)? * (ulv / uhv),
        other => {
            return Err(ZykError::Other(format!(
                "transformer {id:?}: phase displacement {other} has no winding orientation; \
                 expected one of 0, 5, 6, 11"
            )))
        }
    };
    let orientation = if clock == 5 || clock == 6 { -1.0 } else { 1.0 };

    Ok(EquivalentCircuit {
        z2,
        ym,
        k,
        orientation,
    })
}

/// Reference voltage of one winding given its connection letter.
fn winding_reference(u: f64, winding: &str) -> f64 {
    match winding.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('y') => u / f64::sqrt(3.0),
        Some('z') => u / 3.0,
        _ => u,
    }
}

/// Wire shape of a serialized transformer parameter set: the nameplate only.
#[derive(Deserialize)]
struct TransformerParametersDoc {
    id: String,
    sn: VoltAmperes,
    uhv: Volts,
    ulv: Volts,
    p0: Watts,
    i0: PerUnit,
    psc: Watts,
    vsc: PerUnit,
    windings: String,
}

impl TryFrom<TransformerParametersDoc> for TransformerParameters {
    type Error = ZykError;

    fn try_from(doc: TransformerParametersDoc) -> Result<Self, Self::Error> {
        TransformerParameters::new(
            doc.id,
            doc.sn,
            doc.uhv,
            doc.ulv,
            doc.p0,
            doc.i0,
            doc.psc,
            doc.vsc,
            &doc.windings,
        )
    }
}
