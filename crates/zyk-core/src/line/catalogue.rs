//! Canonical catalogue name parsing.
//!
//! Distribution catalogues identify a line build by a compact token such as
//! `U_AL_150`: an underground aluminium cable with 150 mm² phase conductors.
//! The token grammar is `<line_type>_<material>_<section>` with the
//! single-letter line type codes (`O`, `T`, `U`), the two-letter material
//! codes (`CU`, `AL`, `AM`, `AA`, `LA`) and a decimal section in mm².
//!
//! [`LineParameters::from_name`] turns such a token straight into a
//! geometric parameter set using the standard catalogue build: 40 mm
//! external diameter, neutral section equal to the phase section, buried
//! 1.5 m deep (PVC insulated) for underground cables, hung 10 m high (bare
//! in air) otherwise.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{Insulator, LineType, Material};
use crate::error::{ZykError, ZykResult};
use crate::units::{Meters, SquareMillimeters};

use super::LineParameters;

static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?P<type>[OTU])_(?P<material>CU|AL|AM|AA|LA)_(?P<section>[0-9]+(?:\.[0-9]+)?)$")
        .expect("canonical name pattern is valid")
});

/// Standard catalogue external diameter (m).
const DEFAULT_EXTERNAL_DIAMETER: Meters = Meters(0.04);
/// Standard burial depth of underground cables (m, below ground).
const DEFAULT_UNDERGROUND_HEIGHT: Meters = Meters(-1.5);
/// Standard hanging height of overhead and twisted lines (m).
const DEFAULT_OVERHEAD_HEIGHT: Meters = Meters(10.0);

/// A parsed canonical catalogue name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanonicalName {
    pub line_type: LineType,
    pub material: Material,
    pub section: SquareMillimeters,
}

impl CanonicalName {
    /// Parse a `<line_type>_<material>_<section>` token (case-insensitive).
    pub fn parse(token: &str) -> ZykResult<Self> {
        let captures = NAME_RE.captures(token).ok_or_else(|| {
            ZykError::Parse(format!(
                "cannot parse the canonical line name {token:?}; expected \
                 <line_type>_<material>_<section> such as \"U_AL_150\""
            ))
        })?;

        let line_type: LineType = captures["type"].parse()?;
        let material: Material = captures["material"].parse()?;
        let section: f64 = captures["section"]
            .parse()
            .map_err(|_| ZykError::Parse(format!("bad section in line name {token:?}")))?;

        Ok(Self {
            line_type,
            material,
            section: SquareMillimeters(section),
        })
    }
}

impl std::fmt::Display for CanonicalName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}_{}_{}",
            self.line_type.code(),
            self.material.code(),
            self.section.value()
        )
    }
}

impl LineParameters {
    /// Build geometric line parameters from a canonical catalogue name.
    ///
    /// The token doubles as the parameter id. Geometry not encoded in the
    /// name comes from the standard catalogue build documented on this
    /// module.
    pub fn from_name(name: &str) -> ZykResult<Self> {
        let parsed = CanonicalName::parse(name)?;
        let (insulator, height) = match parsed.line_type {
            LineType::Underground => (Insulator::Pvc, DEFAULT_UNDERGROUND_HEIGHT),
            LineType::Overhead | LineType::Twisted => (Insulator::Air, DEFAULT_OVERHEAD_HEIGHT),
        };
        Self::from_geometry(
            name,
            parsed.line_type,
            parsed.material,
            insulator,
            parsed.section,
            parsed.section,
            height,
            DEFAULT_EXTERNAL_DIAMETER,
        )
    }
}
