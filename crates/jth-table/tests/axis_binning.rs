use jth_core::TableAxis;
use jth_table::BinAxis;
use proptest::prelude::*;

#[test]
fn root_bin_convention() {
    let axis = BinAxis::uniform(500, 0.0, 1000.0).unwrap();
    assert_eq!(axis.num_bins(), 500);
    assert_eq!(axis.find_bin(-0.1), 0);
    assert_eq!(axis.find_bin(0.0), 1);
    assert_eq!(axis.find_bin(1.999), 1);
    assert_eq!(axis.find_bin(2.0), 2);
    assert_eq!(axis.find_bin(512.3), 257);
    assert_eq!(axis.find_bin(999.999), 500);
    assert_eq!(axis.find_bin(1000.0), 501);
    assert_eq!(axis.find_bin(f64::INFINITY), 501);
    assert_eq!(axis.find_bin(f64::NEG_INFINITY), 0);
    assert_eq!(axis.find_bin(f64::NAN), 501);
}

#[test]
fn variable_edges() {
    let axis = BinAxis::variable(vec![0.0, 1.0, 5.0, 20.0]).unwrap();
    assert!(!axis.is_uniform());
    assert_eq!(axis.num_bins(), 3);
    assert_eq!(axis.bin_low_edge(2), 1.0);
    assert_eq!(axis.bin_width(3), 15.0);
    assert_eq!(axis.bin_up_edge(3), 20.0);
    assert_eq!(axis.bin_center(2), 3.0);
    assert_eq!(axis.find_bin(4.999), 2);
    assert_eq!(axis.find_bin(5.0), 3);
}

#[test]
fn invalid_axes_are_rejected() {
    for result in [
        BinAxis::uniform(0, 0.0, 1.0),
        BinAxis::uniform(4, 1.0, 1.0),
        BinAxis::uniform(4, 0.0, f64::INFINITY),
        BinAxis::variable(vec![1.0]),
        BinAxis::variable(vec![0.0, 2.0, 2.0]),
        BinAxis::variable(vec![0.0, f64::NAN]),
    ] {
        let err = result.unwrap_err();
        assert_eq!(err.code(), "invalid-axis");
    }
}

#[test]
fn axis_decode_validates() {
    let err = serde_json::from_str::<BinAxis>(r#"{"variable":{"edges":[3.0,1.0]}}"#).unwrap_err();
    assert!(err.to_string().contains("strictly increasing"));
    let axis: BinAxis =
        serde_json::from_str(r#"{"uniform":{"bins":4,"low":0.0,"high":2.0}}"#).unwrap();
    assert_eq!(axis.bin_width(1), 0.5);
}

proptest! {
    #[test]
    fn found_bin_contains_value(bins in 1usize..200, low in -1e3f64..1e3, span in 1e-2f64..1e4, frac in 0.0f64..1.0) {
        let axis = BinAxis::uniform(bins, low, low + span).unwrap();
        let x = low + frac * span;
        let bin = axis.find_bin(x);
        prop_assume!(bin >= 1 && bin <= bins);
        prop_assert!(axis.bin_low_edge(bin) <= x);
        prop_assert!(x < axis.bin_up_edge(bin) || bin == bins);
    }
}
