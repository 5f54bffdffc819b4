use jth_core::{LookupTable, TableAxis};
use jth_table::{BinAxis, Histogram};

fn index_histogram_1d() -> Histogram {
    let mut hist = Histogram::new("1D", vec![BinAxis::uniform(500, 0.0, 1000.0).unwrap()]).unwrap();
    hist.fill_with(|bins| bins[0] as f64);
    hist
}

#[test]
fn one_dimensional_linear_between_centres() {
    let hist = index_histogram_1d();
    // centres of bins 256 and 257 are 511 and 513
    let value = hist.interpolate(&[512.3]).unwrap();
    assert!((value - 256.65).abs() < 1e-9);
    assert_eq!(value.round() as usize, hist.axes()[0].find_bin(512.3));
}

#[test]
fn one_dimensional_constant_beyond_centres() {
    let hist = index_histogram_1d();
    assert_eq!(hist.interpolate(&[0.2]).unwrap(), 1.0);
    assert_eq!(hist.interpolate(&[-50.0]).unwrap(), 1.0);
    assert_eq!(hist.interpolate(&[999.5]).unwrap(), 500.0);
    assert_eq!(hist.interpolate(&[1e9]).unwrap(), 500.0);
}

#[test]
fn two_dimensional_bilinear() {
    let axes = vec![
        BinAxis::uniform(100, 0.0, 1000.0).unwrap(),
        BinAxis::uniform(100, 0.0, 1000.0).unwrap(),
    ];
    let mut hist = Histogram::new("2D", axes).unwrap();
    hist.fill_with(|bins| (bins[0] + bins[1]) as f64);
    // content is linear in both bin indices, so the interpolation is exact
    // between centres: centre of bin i is 10 i - 5
    let value = hist.interpolate(&[250.0, 730.0]).unwrap();
    let expected = (250.0 + 5.0) / 10.0 + (730.0 + 5.0) / 10.0;
    assert!((value - expected).abs() < 1e-9);
}

#[test]
fn three_dimensional_trilinear() {
    let axes = vec![
        BinAxis::uniform(4, 0.0, 4.0).unwrap(),
        BinAxis::uniform(3, 0.0, 3.0).unwrap(),
        BinAxis::variable(vec![0.0, 1.0, 3.0]).unwrap(),
    ];
    let mut hist = Histogram::new("3D", axes).unwrap();
    hist.fill_with(|bins| (bins[0] * 100 + bins[1] * 10 + bins[2]) as f64);
    assert_eq!(hist.dimensionality(), 3);
    // exact at a bin centre
    assert_eq!(hist.interpolate(&[1.5, 0.5, 2.0]).unwrap(), 212.0);
    // halfway along x between bins 2 and 3
    let value = hist.interpolate(&[2.0, 0.5, 0.5]).unwrap();
    assert!((value - 261.0).abs() < 1e-9);
}

#[test]
fn wrong_coordinate_count() {
    let hist = index_histogram_1d();
    let err = hist.interpolate(&[1.0, 2.0]).unwrap_err();
    assert_eq!(err.code(), "dimension-mismatch");
    assert_eq!(hist.interpolate(&[f64::NAN]).unwrap_err().code(), "nan-coordinate");
}

#[test]
fn construction_checks() {
    let axis = BinAxis::uniform(2, 0.0, 1.0).unwrap();
    let err = Histogram::with_contents("h", vec![axis.clone()], vec![1.0]).unwrap_err();
    assert_eq!(err.code(), "content-size");
    let err = Histogram::new("h", vec![]).unwrap_err();
    assert_eq!(err.code(), "unsupported-dimensionality");
    let err = Histogram::new("h", vec![axis.clone(), axis.clone(), axis.clone(), axis.clone()])
        .unwrap_err();
    assert_eq!(err.code(), "unsupported-dimensionality");

    let mut hist = Histogram::new("h", vec![axis]).unwrap();
    assert_eq!(hist.set_bin_content(&[0], 1.0).unwrap_err().code(), "bin-index");
    assert_eq!(hist.set_bin_content(&[3], 1.0).unwrap_err().code(), "bin-index");
    hist.set_bin_content(&[2], 4.0).unwrap();
    assert_eq!(hist.bin_content(&[2]).unwrap(), 4.0);
}
