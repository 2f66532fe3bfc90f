//! Line parameter value objects.
//!
//! A [`LineParameters`] aggregates the per-unit-length series impedance
//! matrix (Ω/km) and optional shunt admittance matrix (S/km) of a line,
//! together with a provenance tag ([`LineModel`]) and informative catalogue
//! metadata. It is immutable after construction and safe to share across
//! threads; the external load-flow solver consumes it as-is.
//!
//! Construction always goes through [`LineParameters::new`] with a
//! [`LineDerivation`] variant, so every path (sequence conversion, geometric
//! model, raw matrices, deserialization) funnels through the same invariant
//! checks.

pub mod catalogue;
pub mod geometry;
pub mod sequence;
pub mod validate;

use serde::{Deserialize, Serialize};

use crate::constants::{Insulator, LineType, Material};
use crate::error::{ZykError, ZykResult};
use crate::matrix::SquareMatrix;
use crate::units::{Amperes, SquareMillimeters};

pub use catalogue::CanonicalName;
pub use sequence::{NeutralSequence, SequenceData};
pub use validate::check_line_matrices;

/// Absolute tolerance for matrix equality between two line parameter sets.
const EQ_ATOL: f64 = 1e-9;

/// Provenance of a line parameter set.
///
/// Records which derivation produced the matrices and whether a neutral
/// conductor is modeled (order 4) or not (order 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineModel {
    /// Symmetrical-sequence conversion, three phase conductors
    Sym,
    /// Symmetrical-sequence conversion, phases plus neutral
    SymNeutral,
    /// Geometric low-voltage model, phases plus neutral
    LvExact,
    /// Raw impedance and shunt admittance matrices, three phase conductors
    Zy,
    /// Raw impedance and shunt admittance matrices, phases plus neutral
    ZyNeutral,
    /// Raw impedance matrix without a shunt branch, three phase conductors
    Z,
    /// Raw impedance matrix without a shunt branch, phases plus neutral
    ZNeutral,
}

impl LineModel {
    /// Does this model include a neutral conductor?
    pub const fn with_neutral(self) -> bool {
        matches!(
            self,
            LineModel::SymNeutral | LineModel::LvExact | LineModel::ZyNeutral | LineModel::ZNeutral
        )
    }

    /// Does this model carry a shunt branch?
    pub const fn with_shunt(self) -> bool {
        !matches!(self, LineModel::Z | LineModel::ZNeutral)
    }
}

impl std::fmt::Display for LineModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LineModel::Sym => "sym",
            LineModel::SymNeutral => "sym_neutral",
            LineModel::LvExact => "lv_exact",
            LineModel::Zy => "zy",
            LineModel::ZyNeutral => "zy_neutral",
            LineModel::Z => "z",
            LineModel::ZNeutral => "z_neutral",
        };
        write!(f, "{name}")
    }
}

/// The matrices produced by one of the derivation paths.
///
/// A closed set of variants rather than a free-form tag: each constructor
/// produces exactly one variant, and [`LineParameters::new`] maps the variant
/// to its [`LineModel`] from the matrix order alone, so tag and matrices can
/// never disagree.
#[derive(Debug, Clone)]
pub enum LineDerivation {
    /// Output of the symmetrical-sequence conversion
    Sequence {
        z_line: SquareMatrix,
        y_shunt: SquareMatrix,
    },
    /// Output of the geometric low-voltage model
    Geometric {
        z_line: SquareMatrix,
        y_shunt: SquareMatrix,
    },
    /// Caller-supplied matrices (catalogue rows, vendor exports)
    Raw {
        z_line: SquareMatrix,
        y_shunt: Option<SquareMatrix>,
    },
}

/// Validated per-unit-length electrical parameters of a line.
#[derive(Debug, Clone, Serialize)]
pub struct LineParameters {
    id: String,
    model: LineModel,
    z_line: SquareMatrix,
    #[serde(skip_serializing_if = "Option::is_none")]
    y_shunt: Option<SquareMatrix>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line_type: Option<LineType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    material: Option<Material>,
    #[serde(skip_serializing_if = "Option::is_none")]
    insulator: Option<Insulator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    section: Option<SquareMillimeters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    section_neutral: Option<SquareMillimeters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ampacity: Option<Amperes>,
}

impl LineParameters {
    /// Wrap derived matrices into a validated, immutable parameter set.
    ///
    /// This is the single construction point: the invariant checks of
    /// [`check_line_matrices`] run here, and the [`LineModel`] tag is derived
    /// from the variant and the matrix order.
    pub fn new(id: impl Into<String>, derivation: LineDerivation) -> ZykResult<Self> {
        let id = id.into();
        let (model, z_line, y_shunt) = match derivation {
            LineDerivation::Sequence { z_line, y_shunt } => {
                let model = if z_line.order() == 4 {
                    LineModel::SymNeutral
                } else {
                    LineModel::Sym
                };
                (model, z_line, Some(y_shunt))
            }
            LineDerivation::Geometric { z_line, y_shunt } => {
                (LineModel::LvExact, z_line, Some(y_shunt))
            }
            LineDerivation::Raw { z_line, y_shunt } => {
                let model = match (y_shunt.is_some(), z_line.order() == 4) {
                    (true, true) => LineModel::ZyNeutral,
                    (true, false) => LineModel::Zy,
                    (false, true) => LineModel::ZNeutral,
                    (false, false) => LineModel::Z,
                };
                (model, z_line, y_shunt)
            }
        };

        check_line_matrices(&id, &z_line, y_shunt.as_ref())?;

        Ok(Self {
            id,
            model,
            z_line,
            y_shunt,
            line_type: None,
            material: None,
            insulator: None,
            section: None,
            section_neutral: None,
            ampacity: None,
        })
    }

    /// Build from raw impedance and shunt admittance matrices.
    pub fn from_zy(
        id: impl Into<String>,
        z_line: SquareMatrix,
        y_shunt: SquareMatrix,
    ) -> ZykResult<Self> {
        Self::new(
            id,
            LineDerivation::Raw {
                z_line,
                y_shunt: Some(y_shunt),
            },
        )
    }

    /// Build from a raw impedance matrix without a shunt branch.
    pub fn from_z(id: impl Into<String>, z_line: SquareMatrix) -> ZykResult<Self> {
        Self::new(
            id,
            LineDerivation::Raw {
                z_line,
                y_shunt: None,
            },
        )
    }

    /// Opaque identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Provenance tag.
    pub fn model(&self) -> LineModel {
        self.model
    }

    /// Series impedance matrix (Ω/km).
    pub fn z_line(&self) -> &SquareMatrix {
        &self.z_line
    }

    /// Shunt admittance matrix (S/km), absent for impedance-only models.
    pub fn y_shunt(&self) -> Option<&SquareMatrix> {
        self.y_shunt.as_ref()
    }

    /// Matrix order: 3 (phases) or 4 (phases + neutral).
    pub fn order(&self) -> usize {
        self.z_line.order()
    }

    /// Does this parameter set carry a shunt branch?
    pub fn with_shunt(&self) -> bool {
        self.y_shunt.is_some()
    }

    /// Line construction type (informative metadata).
    pub fn line_type(&self) -> Option<LineType> {
        self.line_type
    }

    /// Conductor material (informative metadata).
    pub fn material(&self) -> Option<Material> {
        self.material
    }

    /// Insulation type (informative metadata).
    pub fn insulator(&self) -> Option<Insulator> {
        self.insulator
    }

    /// Phase conductor cross-section (informative metadata).
    pub fn section(&self) -> Option<SquareMillimeters> {
        self.section
    }

    /// Neutral conductor cross-section (informative metadata).
    pub fn section_neutral(&self) -> Option<SquareMillimeters> {
        self.section_neutral
    }

    /// Maximum allowed current (informative metadata).
    pub fn ampacity(&self) -> Option<Amperes> {
        self.ampacity
    }

    /// Attach the line construction type.
    pub fn with_line_type(mut self, line_type: LineType) -> Self {
        self.line_type = Some(line_type);
        self
    }

    /// Attach the conductor material.
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    /// Attach the insulation type.
    pub fn with_insulator(mut self, insulator: Insulator) -> Self {
        self.insulator = Some(insulator);
        self
    }

    /// Attach the phase conductor cross-section.
    pub fn with_section(mut self, section: SquareMillimeters) -> Self {
        self.section = Some(section);
        self
    }

    /// Attach the neutral conductor cross-section.
    pub fn with_section_neutral(mut self, section: SquareMillimeters) -> Self {
        self.section_neutral = Some(section);
        self
    }

    /// Attach an ampacity rating.
    pub fn with_ampacity(mut self, ampacity: Amperes) -> Self {
        self.ampacity = Some(ampacity);
        self
    }
}

// Equality is identity plus numerically close matrices: same id, same order,
// entries within tolerance, and matching shunt presence. Provenance and
// metadata are deliberately excluded.
impl PartialEq for LineParameters {
    fn eq(&self, other: &Self) -> bool {
        if self.id != other.id || self.z_line.order() != other.z_line.order() {
            return false;
        }
        if !self.z_line.approx_eq(&other.z_line, EQ_ATOL) {
            return false;
        }
        match (&self.y_shunt, &other.y_shunt) {
            (None, None) => true,
            (Some(a), Some(b)) => a.approx_eq(b, EQ_ATOL),
            _ => false,
        }
    }
}

/// Wire shape of a serialized line parameter set.
///
/// Deserialization re-runs the invariant checks, so a hand-edited document
/// with a non-passive matrix is rejected exactly like a bad derivation.
#[derive(Deserialize)]
struct LineParametersDoc {
    id: String,
    model: LineModel,
    z_line: SquareMatrix,
    #[serde(default)]
    y_shunt: Option<SquareMatrix>,
    #[serde(default)]
    line_type: Option<LineType>,
    #[serde(default)]
    material: Option<Material>,
    #[serde(default)]
    insulator: Option<Insulator>,
    #[serde(default)]
    section: Option<SquareMillimeters>,
    #[serde(default)]
    section_neutral: Option<SquareMillimeters>,
    #[serde(default)]
    ampacity: Option<Amperes>,
}

impl TryFrom<LineParametersDoc> for LineParameters {
    type Error = ZykError;

    fn try_from(doc: LineParametersDoc) -> Result<Self, Self::Error> {
        check_line_matrices(&doc.id, &doc.z_line, doc.y_shunt.as_ref())?;
        if doc.model.with_shunt() != doc.y_shunt.is_some()
            || doc.model.with_neutral() != (doc.z_line.order() == 4)
        {
            return Err(ZykError::Shape(format!(
                "line {:?}: model tag {} does not match the serialized matrices",
                doc.id, doc.model
            )));
        }
        Ok(Self {
            id: doc.id,
            model: doc.model,
            z_line: doc.z_line,
            y_shunt: doc.y_shunt,
            line_type: doc.line_type,
            material: doc.material,
            insulator: doc.insulator,
            section: doc.section,
            section_neutral: doc.section_neutral,
            ampacity: doc.ampacity,
        })
    }
}

impl<'de> Deserialize<'de> for LineParameters {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let doc = LineParametersDoc::deserialize(deserializer)?;
        LineParameters::try_from(doc).map_err(serde::de::Error::custom)
    }
}
