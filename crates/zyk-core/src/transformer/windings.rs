//! Vector-group codec for three-phase transformer windings.
//!
//! A vector group such as `Dyn11` encodes the high-voltage winding
//! connection (`D`), the low-voltage winding connection (`yn`) and the clock
//! number (`11`): the phase displacement between the two sides in multiples
//! of 30°. Winding letters are delta (`d`), wye (`y`) or zigzag (`z`), with
//! an optional `n` marking a distributed neutral; the high-voltage side is
//! written in upper case.
//!
//! Only the standard combinations exist: same-parity groups (Dd, Yy, Dz)
//! take even clock numbers, mixed groups (Dy, Yd, Yz) take odd ones, and
//! clocks 3 and 9 are not built. Anything else is a syntax error.

use num_complex::Complex64;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ZykError, ZykResult};

static VECTOR_GROUP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<w1>[DYZ]n?)(?P<w2>[dyz]n?)(?P<clock>[0-9]|1[01])$")
        .expect("vector group pattern is valid")
});

/// Clock numbers of the even (same-parity) vector groups.
const EVEN_CLOCKS: [u8; 6] = [0, 2, 4, 6, 8, 10];
/// Clock numbers of the odd (mixed) vector groups.
const ODD_CLOCKS: [u8; 4] = [1, 5, 7, 11];

/// A validated vector group: winding connections plus clock number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorGroup {
    winding1: String,
    winding2: String,
    phase_displacement: u8,
}

impl VectorGroup {
    /// Parse and validate a vector-group code such as `Dyn11`.
    pub fn parse(code: &str) -> ZykResult<Self> {
        let captures = VECTOR_GROUP_RE.captures(code).ok_or_else(|| {
            ZykError::Parse(format!("cannot parse the vector group {code:?}"))
        })?;

        let winding1 = captures["w1"].to_string();
        let winding2 = captures["w2"].to_string();
        let clock: u8 = captures["clock"]
            .parse()
            .expect("clock group only matches 0-11");

        let letter1 = winding1
            .chars()
            .next()
            .expect("winding group is non-empty")
            .to_ascii_lowercase();
        let letter2 = winding2.chars().next().expect("winding group is non-empty");

        let allowed: &[u8] = match (letter1, letter2) {
            ('d', 'd') | ('y', 'y') | ('d', 'z') => &EVEN_CLOCKS,
            ('d', 'y') | ('y', 'd') | ('y', 'z') => &ODD_CLOCKS,
            _ => &[],
        };
        if !allowed.contains(&clock) {
            return Err(ZykError::Parse(format!(
                "the vector group {code:?} is not a standard winding combination"
            )));
        }

        Ok(Self {
            winding1,
            winding2,
            phase_displacement: clock,
        })
    }

    /// High-voltage winding connection (e.g. `D`, `Yn`).
    pub fn winding1(&self) -> &str {
        &self.winding1
    }

    /// Low-voltage winding connection (e.g. `yn`, `zn`).
    pub fn winding2(&self) -> &str {
        &self.winding2
    }

    /// Clock number: phase displacement in multiples of 30°.
    pub fn phase_displacement(&self) -> u8 {
        self.phase_displacement
    }
}

impl std::fmt::Display for VectorGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.winding1, self.winding2, self.phase_displacement
        )
    }
}

/// Unit phasor of a clock number: `e^(−j·clock·π/6)`.
///
/// Defined for every buildable clock (0, 1, 2, 4, 5, 6, 7, 8, 10, 11);
/// clocks 3 and 9 do not correspond to any standard winding combination.
pub fn phase_shift(clock: u8) -> ZykResult<Complex64> {
    if !EVEN_CLOCKS.contains(&clock) && !ODD_CLOCKS.contains(&clock) {
        return Err(ZykError::Domain(format!(
            "no standard vector group has clock number {clock}"
        )));
    }
    Ok(Complex64::from_polar(
        1.0,
        -(clock as f64) * std::f64::consts::PI / 6.0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_common_groups() {
        let group = VectorGroup::parse("Dyn11").unwrap();
        assert_eq!(group.winding1(), "D");
        assert_eq!(group.winding2(), "yn");
        assert_eq!(group.phase_displacement(), 11);

        let group = VectorGroup::parse("Yzn11").unwrap();
        assert_eq!(group.winding1(), "Y");
        assert_eq!(group.winding2(), "zn");

        let group = VectorGroup::parse("Dd0").unwrap();
        assert_eq!(group.winding1(), "D");
        assert_eq!(group.winding2(), "d");
        assert_eq!(group.phase_displacement(), 0);

        let group = VectorGroup::parse("Yny0").unwrap();
        assert_eq!(group.winding1(), "Yn");
        assert_eq!(group.winding2(), "y");
    }

    #[test]
    fn test_parse_extended_clocks() {
        for code in ["Dd2", "Dd4", "Yy8", "Dz10", "Dy1", "Yd7"] {
            assert!(VectorGroup::parse(code).is_ok(), "rejected {code}");
        }
    }

    #[test]
    fn test_parse_rejects_bad_codes() {
        for code in [
            "Dyn3",  // clock 3 is never built
            "Dyn6",  // mixed group with even clock
            "Dd5",   // same-parity group with odd clock
            "Zd0",   // zigzag primary is not standard
            "Xyn11", // unknown winding letter
            "dyn11", // lower-case primary
            "DYN11", // upper-case secondary
            "Dyn12", // clock out of range
            "Dyn",   // missing clock
            "",
        ] {
            let err = VectorGroup::parse(code).unwrap_err();
            assert!(matches!(err, ZykError::Parse(_)), "accepted {code:?}");
        }
    }

    #[test]
    fn test_display_roundtrip() {
        for code in ["Dyn11", "Dyn5", "Yzn11", "Dd0", "Yny0"] {
            assert_eq!(VectorGroup::parse(code).unwrap().to_string(), code);
        }
    }

    #[test]
    fn test_phase_shift_phasors() {
        // clock 0: no shift
        assert!((phase_shift(0).unwrap() - Complex64::new(1.0, 0.0)).norm() < 1e-12);
        // clock 6: opposition
        assert!((phase_shift(6).unwrap() - Complex64::new(-1.0, 0.0)).norm() < 1e-12);
        // clock 11: −330° ≡ +30°
        let shift = phase_shift(11).unwrap();
        assert!((shift.re - f64::sqrt(3.0) / 2.0).abs() < 1e-12);
        assert!((shift.im - 0.5).abs() < 1e-12);
        // clock 5: −150°
        let shift = phase_shift(5).unwrap();
        assert!((shift.re + f64::sqrt(3.0) / 2.0).abs() < 1e-12);
        assert!((shift.im + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_phase_shift_rejects_unbuildable_clocks() {
        for clock in [3, 9, 12, 255] {
            assert!(matches!(phase_shift(clock), Err(ZykError::Domain(_))));
        }
    }
}
