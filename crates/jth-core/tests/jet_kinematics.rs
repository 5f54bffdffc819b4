use jth_core::{Jet, JthError};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

#[test]
fn massless_central_jet() {
    let jet = Jet::new(50.0, 0.0, 0.3, 0.0);
    assert!(close(jet.e(), 50.0));
    assert!(close(jet.et(), 50.0));
    assert!(close(jet.rapidity(), 0.0));
    assert!(close(jet.pz(), 0.0));
}

#[test]
fn massless_rapidity_equals_eta() {
    let jet = Jet::new(30.0, -1.7, 0.0, 0.0);
    assert!(close(jet.rapidity(), -1.7));
    assert!(close(jet.abs_rapidity(), 1.7));
    assert!(close(jet.abs_eta(), 1.7));
}

#[test]
fn massive_jet_kinematics() {
    let jet = Jet::new(40.0, 1.2, 2.0, 10.0);
    let p = 40.0 * 1.2f64.cosh();
    let e = (p * p + 100.0).sqrt();
    assert!(close(jet.p(), p));
    assert!(close(jet.e(), e));
    assert!(close(jet.et(), e * 40.0 / p));
    let pz = 40.0 * 1.2f64.sinh();
    assert!(close(jet.rapidity(), 0.5 * ((e + pz) / (e - pz)).ln()));
    // mass pulls rapidity below pseudorapidity
    assert!(jet.rapidity() < jet.eta());
    assert!(close(jet.px().hypot(jet.py()), 40.0));
}

#[test]
fn degenerate_jet_is_finite() {
    let jet = Jet::new(0.0, 0.0, 0.0, 0.0);
    assert_eq!(jet.et(), 0.0);
    assert_eq!(jet.rapidity(), 0.0);
}

#[test]
fn jet_at_rest_keeps_its_mass_for_any_eta() {
    let jet = Jet::new(0.0, 900.0, 0.0, 125.0);
    assert_eq!(jet.p(), 0.0);
    assert_eq!(jet.pz(), 0.0);
    assert_eq!(jet.e(), 125.0);
    assert_eq!(jet.eta(), 900.0);
    assert_eq!(jet.rapidity(), 0.0);
}

#[test]
fn auxiliary_attributes() {
    let jet = Jet::new(10.0, 0.0, 0.0, 0.0)
        .with_attribute("width", 0.12f32)
        .unwrap()
        .with_attribute("ntrk", 7i32)
        .unwrap();
    assert_eq!(jet.attribute::<f32>("width").unwrap(), 0.12f32);
    assert_eq!(jet.attribute::<i32>("ntrk").unwrap(), 7);
    assert_eq!(jet.attributes().len(), 2);

    let err = jet.attribute::<f32>("missing").unwrap_err();
    assert!(matches!(err, JthError::Attribute(_)));
    assert_eq!(err.code(), "key-not-found");
}
