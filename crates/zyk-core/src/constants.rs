//! Physical constants and conductor/insulator property tables.
//!
//! Every derivation in this crate runs at the fixed European network
//! frequency of 50 Hz. The material and insulator tables are read-only,
//! process-wide data; concurrent unsynchronized reads are safe because
//! nothing here is ever mutated.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ZykError;
use crate::units::{Hertz, Meters};

/// Nominal network frequency (Hz)
pub const FREQUENCY: Hertz = Hertz(50.0);

/// Nominal network angular frequency ω = 2πf (rad/s)
pub const OMEGA: f64 = 2.0 * std::f64::consts::PI * 50.0;

/// Vacuum magnetic permeability μ₀ (H/m)
pub const MU_0: f64 = 4.0e-7 * std::f64::consts::PI;

/// Vacuum electric permittivity ε₀ (F/m)
pub const EPSILON_0: f64 = 8.854_187_812_8e-12;

/// Conductor material of a line.
///
/// The two-letter codes (`CU`, `AL`, `AM`, `AA`, `LA`) are the tokens used in
/// canonical catalogue names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    /// Copper (CU)
    Copper,
    /// Aluminium (AL)
    Aluminium,
    /// Almelec, an aluminium-magnesium-silicon alloy (AM)
    Almelec,
    /// Aluminium conductor, steel reinforced (AA)
    AluminiumSteel,
    /// Almelec conductor, steel reinforced (LA)
    AlmelecSteel,
}

impl Material {
    /// DC resistivity at 20 °C (Ω·m), IEC 60287 values
    pub const fn resistivity(self) -> f64 {
        match self {
            Material::Copper => 1.7241e-8,
            Material::Aluminium => 2.8264e-8,
            Material::Almelec => 3.26e-8,
            Material::AluminiumSteel => 4.0587e-8,
            Material::AlmelecSteel => 3.26e-8,
        }
    }

    /// Relative magnetic permeability μᵣ (dimensionless)
    ///
    /// All supported conductor materials are effectively non-magnetic; the
    /// steel-reinforced constructions carry their core's contribution.
    pub const fn relative_permeability(self) -> f64 {
        match self {
            Material::Copper => 0.999_994,
            Material::Aluminium => 1.000_022,
            Material::Almelec => 1.000_02,
            Material::AluminiumSteel => 1.000_05,
            Material::AlmelecSteel => 1.000_05,
        }
    }

    /// Skin depth δ = √(ρ / (π·f·μ₀·μᵣ)) at the network frequency (m)
    pub fn skin_depth(self) -> Meters {
        let mu = MU_0 * self.relative_permeability();
        Meters((self.resistivity() / (std::f64::consts::PI * FREQUENCY.value() * mu)).sqrt())
    }

    /// Canonical catalogue code
    pub const fn code(self) -> &'static str {
        match self {
            Material::Copper => "CU",
            Material::Aluminium => "AL",
            Material::Almelec => "AM",
            Material::AluminiumSteel => "AA",
            Material::AlmelecSteel => "LA",
        }
    }
}

impl FromStr for Material {
    type Err = ZykError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CU" => Ok(Material::Copper),
            "AL" => Ok(Material::Aluminium),
            "AM" => Ok(Material::Almelec),
            "AA" => Ok(Material::AluminiumSteel),
            "LA" => Ok(Material::AlmelecSteel),
            _ => Err(ZykError::Parse(format!(
                "unknown conductor material code {s:?}"
            ))),
        }
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Insulation surrounding a conductor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Insulator {
    /// Polyvinyl chloride
    Pvc,
    /// Cross-linked polyethylene
    Xlpe,
    /// Ethylene-propylene rubber
    Epr,
    /// High-density polyethylene
    Hdpe,
    /// Low-density polyethylene
    Ldpe,
    /// Mass-impregnated paper
    Paper,
    /// Bare conductor in air (overhead and twisted lines)
    Air,
}

impl Insulator {
    /// Relative permittivity εᵣ (dimensionless)
    pub const fn relative_permittivity(self) -> f64 {
        match self {
            Insulator::Pvc => 6.5,
            Insulator::Xlpe => 2.5,
            Insulator::Epr => 3.1,
            Insulator::Hdpe => 2.3,
            Insulator::Ldpe => 2.2,
            Insulator::Paper => 4.0,
            Insulator::Air => 1.0,
        }
    }

    /// Dielectric loss tangent tan δ (dimensionless)
    pub const fn loss_tangent(self) -> f64 {
        match self {
            Insulator::Pvc => 600e-4,
            Insulator::Xlpe => 40e-4,
            Insulator::Epr => 125e-4,
            Insulator::Hdpe => 10e-4,
            Insulator::Ldpe => 10e-4,
            Insulator::Paper => 70e-4,
            Insulator::Air => 0.0,
        }
    }
}

impl std::fmt::Display for Insulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Insulator::Pvc => "PVC",
            Insulator::Xlpe => "XLPE",
            Insulator::Epr => "EPR",
            Insulator::Hdpe => "HDPE",
            Insulator::Ldpe => "LDPE",
            Insulator::Paper => "IP",
            Insulator::Air => "air",
        };
        write!(f, "{name}")
    }
}

/// Physical construction of a line.
///
/// The single-letter codes (`O`, `T`, `U`) are the tokens used in canonical
/// catalogue names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    /// Bare conductors on poles or towers (O)
    Overhead,
    /// Twisted (aerial bundled) cable (T)
    Twisted,
    /// Buried cable (U)
    Underground,
}

impl LineType {
    /// Canonical catalogue code
    pub const fn code(self) -> &'static str {
        match self {
            LineType::Overhead => "O",
            LineType::Twisted => "T",
            LineType::Underground => "U",
        }
    }
}

impl FromStr for LineType {
    type Err = ZykError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "O" => Ok(LineType::Overhead),
            "T" => Ok(LineType::Twisted),
            "U" => Ok(LineType::Underground),
            _ => Err(ZykError::Parse(format!("unknown line type code {s:?}"))),
        }
    }
}

impl std::fmt::Display for LineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
