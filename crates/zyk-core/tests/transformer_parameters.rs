//! End-to-end transformer parameter tests
//!
//! Covers the nameplate-to-equivalent-circuit derivation through the public
//! API, the winding orientation convention and the persistence contract
//! (nameplate only, derived quantities recomputed on load).

use zyk_core::units::{PerUnit, VoltAmperes, Volts, Watts};
use zyk_core::{phase_shift, TransformerParameters, VectorGroup, ZykError};

fn build(windings: &str) -> TransformerParameters {
    TransformerParameters::new(
        format!("t_{windings}"),
        VoltAmperes(160_000.0),
        Volts(20_000.0),
        Volts(400.0),
        Watts(460.0),
        PerUnit(0.023),
        Watts(2350.0),
        PerUnit(0.04),
        windings,
    )
    .unwrap()
}

#[test]
fn orientation_follows_the_clock_number() {
    assert_eq!(build("Dyn11").orientation(), 1.0);
    assert_eq!(build("Dyn5").orientation(), -1.0);
    assert_eq!(build("Yyn0").orientation(), 1.0);
    assert_eq!(build("Dd6").orientation(), -1.0);
}

#[test]
fn ratio_carries_the_clock_phase() {
    let tp = build("Dyn11");
    let shift = phase_shift(11).unwrap();
    let expected = shift * (400.0 / f64::sqrt(3.0) / 20_000.0);
    assert!((tp.k() - expected).norm() < 1e-12);
}

#[test]
fn derived_quantities_are_consistent_across_clock_numbers() {
    // the series and magnetizing branches come from the test data alone;
    // the clock only affects k and the orientation
    let a = build("Dyn11");
    let b = build("Dyn5");
    assert!((a.z2() - b.z2()).norm() < 1e-15);
    assert!((a.ym() - b.ym()).norm() < 1e-18);
    assert!((a.k().norm() - b.k().norm()).abs() < 1e-15);
    assert_ne!(a.orientation(), b.orientation());
}

#[test]
fn bad_voltage_ordering_always_fails() {
    for (uhv, ulv) in [
        (400.0, 400.0),
        (400.0, 20_000.0),
        (19_999.0, 20_000.0),
        (1.0, 1.0),
    ] {
        let result = TransformerParameters::new(
            "t_guard",
            VoltAmperes(160_000.0),
            Volts(uhv),
            Volts(ulv),
            Watts(460.0),
            PerUnit(0.023),
            Watts(2350.0),
            PerUnit(0.04),
            "Dyn11",
        );
        assert!(
            matches!(result, Err(ZykError::Domain(_))),
            "uhv = {uhv}, ulv = {ulv} must be rejected"
        );
    }
}

#[test]
fn nameplate_roundtrip_recomputes_equivalent_circuit() {
    let tp = build("Yzn11");
    let json = serde_json::to_string(&tp).unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let object = value.as_object().unwrap();
    // the wire shape is exactly the nameplate
    let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        ["i0", "id", "p0", "psc", "sn", "uhv", "ulv", "vsc", "windings"]
    );

    let back: TransformerParameters = serde_json::from_str(&json).unwrap();
    assert_eq!(tp, back);
    assert!((back.z2() - tp.z2()).norm() < 1e-15);
    assert!((back.ym() - tp.ym()).norm() < 1e-18);
    assert!((back.k() - tp.k()).norm() < 1e-15);
    assert_eq!(back.orientation(), tp.orientation());
}

#[test]
fn loading_a_catalogue_document_derives_everything() {
    let json = r#"{
        "id": "SE_Minera_A0Ak_100kVA",
        "sn": 100000.0,
        "uhv": 20000.0,
        "ulv": 400.0,
        "p0": 145.0,
        "i0": 0.018,
        "psc": 1250.0,
        "vsc": 0.04,
        "windings": "Dyn11"
    }"#;
    let tp: TransformerParameters = serde_json::from_str(json).unwrap();

    assert_eq!(tp.id(), "SE_Minera_A0Ak_100kVA");
    assert_eq!(tp.winding1(), "D");
    assert_eq!(tp.winding2(), "yn");
    assert_eq!(tp.phase_displacement(), 11);
    assert_eq!(tp.orientation(), 1.0);
    assert!(tp.z2().re > 0.0);
    assert!(tp.z2().im > 0.0);
    assert!(tp.ym().re > 0.0);
    assert!(tp.ym().im < 0.0);
}

#[test]
fn vector_group_parsing_matches_transformer_acceptance() {
    // whatever the codec accepts with clock in {0, 5, 6, 11} must build
    for code in ["Dyn11", "Dyn5", "Yyn0", "Yzn5", "Dd0", "Dd6", "Yy6", "Dzn0"] {
        assert!(VectorGroup::parse(code).is_ok(), "codec rejected {code}");
        let tp = TransformerParameters::new(
            "t_accept",
            VoltAmperes(160_000.0),
            Volts(20_000.0),
            Volts(400.0),
            Watts(460.0),
            PerUnit(0.023),
            Watts(2350.0),
            PerUnit(0.04),
            code,
        );
        assert!(tp.is_ok(), "transformer rejected {code}");
    }

    // an extended clock parses but has no winding orientation
    assert!(VectorGroup::parse("Dd2").is_ok());
    let result = TransformerParameters::new(
        "t_extended",
        VoltAmperes(160_000.0),
        Volts(20_000.0),
        Volts(400.0),
        Watts(460.0),
        PerUnit(0.023),
        Watts(2350.0),
        PerUnit(0.04),
        "Dd2",
    );
    assert!(matches!(result, Err(ZykError::Other(_))));
}
