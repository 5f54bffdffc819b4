use jth_core::{EventContext, Jet, JthError, TableAxis, TableRef};
use jth_input::{MultiAxisInput, VariableResolver, GEV};
use jth_table::{BinAxis, Histogram, MemorySource, TableContainer};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const FILE: &str = "jes.json";

/// 500 bins over [0, 1000) GeV where each bin holds its own index.
fn pt_histogram() -> Histogram {
    let mut hist = Histogram::new("pt_bins", vec![BinAxis::uniform(500, 0.0, 1000.0).expect("axis")])
        .expect("histogram");
    hist.fill_with(|bins| bins[0] as f64);
    hist
}

/// Linear in both bin centres, so bilinear interpolation reproduces it.
fn pt_eta_histogram() -> Histogram {
    let axes = vec![
        BinAxis::uniform(50, 0.0, 1000.0).expect("pt axis"),
        BinAxis::variable(vec![0.0, 0.8, 1.3, 2.1, 2.8, 3.6, 4.5]).expect("eta axis"),
    ];
    let mut hist = Histogram::new("pt_eta", axes.clone()).expect("histogram");
    hist.fill_with(|bins| axes[0].bin_center(bins[0]) + 10.0 * axes[1].bin_center(bins[1]));
    hist
}

fn mu_histogram() -> Histogram {
    let mut hist = Histogram::new("mu_bins", vec![BinAxis::uniform(40, 0.0, 80.0).expect("axis")])
        .expect("histogram");
    hist.fill_with(|bins| bins[0] as f64);
    hist
}

fn source() -> MemorySource {
    let mut container = TableContainer::new();
    container.insert_histogram(pt_histogram());
    container.insert_histogram(pt_eta_histogram());
    container.insert_histogram(mu_histogram());
    MemorySource::new().with_container(FILE, container)
}

fn pt_input() -> MultiAxisInput {
    let resolver = VariableResolver::new();
    let pt = resolver.create("pt", "float", true).expect("pt").with_scale(GEV);
    let mut input =
        MultiAxisInput::new("jes_pt", TableRef::new(FILE, "pt_bins"), vec![pt]).expect("input");
    input.initialize(&source()).expect("initialize");
    input
}

#[test]
fn single_axis_lookup_lands_in_the_expected_bin() {
    let input = pt_input();
    let jet = Jet::new(512_300.0, 0.4, 1.0, 5_000.0);
    let value = input.resolve(&jet, &EventContext::new()).expect("resolve");
    assert!((value - 257.0).abs() <= 1.0, "value {value}");
    assert!((value - 256.65).abs() < 1e-6);
}

#[test]
fn seeded_jets_track_the_bin_index() {
    let input = pt_input();
    let axis = BinAxis::uniform(500, 0.0, 1000.0).expect("axis");
    let ctx = EventContext::new();
    let mut rng = StdRng::seed_from_u64(43294);
    for _ in 0..1000 {
        let pt_gev: f64 = rng.gen_range(0.0..1000.0);
        let eta: f64 = rng.gen_range(-4.5..4.5);
        let jet = Jet::new(pt_gev * 1.0e3, eta, 0.0, 0.0);
        let value = input.resolve(&jet, &ctx).expect("resolve");
        let expected = axis.find_bin(pt_gev) as f64;
        assert!((value - expected).abs() <= 1.0, "pt {pt_gev}: {value} vs bin {expected}");
    }
}

#[test]
fn out_of_range_values_are_clamped_not_rejected() {
    let input = pt_input();
    let ctx = EventContext::new();
    let high = input.resolve(&Jet::new(7.0e6, 0.0, 0.0, 0.0), &ctx).expect("high");
    assert_eq!(high, 500.0);
    let low = input.resolve(&Jet::new(-50.0, 0.0, 0.0, 0.0), &ctx).expect("low");
    assert_eq!(low, 1.0);
    let zero = input.resolve(&Jet::new(0.0, 0.0, 0.0, 0.0), &ctx).expect("zero");
    assert_eq!(zero, 1.0);
}

#[test]
fn two_axis_lookup_is_bilinear() {
    let resolver = VariableResolver::new();
    let axes = vec![
        resolver.create("pt", "float", true).expect("pt").with_scale(GEV),
        resolver.create("abseta", "float", true).expect("abseta"),
    ];
    let mut input = MultiAxisInput::new("jes_pt_eta", TableRef::new(FILE, "pt_eta"), axes).expect("input");
    input.initialize(&source()).expect("initialize");

    let ctx = EventContext::new();
    let mut rng = StdRng::seed_from_u64(43294);
    for _ in 0..1000 {
        // stay between the outermost bin centres
        let pt_gev: f64 = rng.gen_range(10.0..990.0);
        let eta: f64 = rng.gen_range(0.4..4.05) * if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let jet = Jet::new(pt_gev * 1.0e3, eta, 0.0, 0.0);
        let value = input.resolve(&jet, &ctx).expect("resolve");
        let expected = pt_gev + 10.0 * eta.abs();
        assert!((value - expected).abs() < 1e-6, "({pt_gev}, {eta}): {value} vs {expected}");
    }

    // beyond the last eta centre the table is flat
    let edge = input.resolve(&Jet::new(500_000.0, 4.4, 0.0, 0.0), &ctx).expect("forward");
    assert!((edge - (500.0 + 40.5)).abs() < 1e-6);
}

#[test]
fn context_axes_read_the_event() {
    let resolver = VariableResolver::new();
    let mu = resolver.create("mu", "float", false).expect("mu");
    let mut input = MultiAxisInput::new("pileup", TableRef::new(FILE, "mu_bins"), vec![mu]).expect("input");
    input.initialize(&source()).expect("initialize");

    let jet = Jet::new(40_000.0, 0.0, 0.0, 0.0);
    let mut ctx = EventContext::new();
    ctx.set_value("mu", 33.0f32).expect("mu");
    // 33 sits on the centre of bin 17
    assert!((input.resolve(&jet, &ctx).expect("resolve") - 17.0).abs() < 1e-9);

    match input.resolve(&jet, &EventContext::new()).unwrap_err() {
        JthError::Context(info) => assert_eq!(info.code, "key-not-found"),
        other => panic!("unexpected {other:?}"),
    }

    let mut wrong_type = EventContext::new();
    wrong_type.set_value("mu", 33i32).expect("mu");
    assert_eq!(input.resolve(&jet, &wrong_type).unwrap_err().code(), "type-mismatch");
}

#[test]
fn ready_inputs_are_shared_across_threads() {
    let input = pt_input();
    std::thread::scope(|scope| {
        for worker in 0..4u64 {
            let input = &input;
            scope.spawn(move || {
                let ctx = EventContext::new();
                let mut rng = StdRng::seed_from_u64(worker);
                for _ in 0..100 {
                    let pt: f64 = rng.gen_range(0.0..1.0e6);
                    let value = input.resolve(&Jet::new(pt, 0.0, 0.0, 0.0), &ctx).expect("resolve");
                    assert!((1.0..=500.0).contains(&value));
                }
            });
        }
    });
}

fn energy_input() -> MultiAxisInput {
    let resolver = VariableResolver::new();
    let e = resolver.create("e", "float", true).expect("e");
    let mut input = MultiAxisInput::new("energy", TableRef::new(FILE, "pt_bins"), vec![e]).expect("input");
    input.initialize(&source()).expect("initialize");
    input
}

#[test]
fn energy_axis_lookup() {
    let input = energy_input();
    let ctx = EventContext::new();
    // massless and central, so e equals pt
    let value = input.resolve(&Jet::new(512.3, 0.0, 0.0, 0.0), &ctx).expect("resolve");
    assert!((value - 257.0).abs() <= 1.0, "value {value}");

    let axis = BinAxis::uniform(500, 0.0, 1000.0).expect("axis");
    let mut rng = StdRng::seed_from_u64(43294);
    for _ in 0..1000 {
        let e: f64 = rng.gen_range(0.0..=1000.0);
        let value = input.resolve(&Jet::new(e, 0.0, 0.0, 0.0), &ctx).expect("resolve");
        let expected = axis.find_bin(e).min(500) as f64;
        assert!((value - expected).abs() <= 1.0, "e {e}: {value} vs bin {expected}");
    }
}

#[test]
fn unset_context_key_is_a_context_error() {
    let resolver = VariableResolver::new();
    let k = resolver.create("k", "float", false).expect("k");
    let mut input = MultiAxisInput::new("k_input", TableRef::new(FILE, "pt_bins"), vec![k]).expect("input");
    input.initialize(&source()).expect("initialize");
    let err = input.resolve(&Jet::new(1.0, 0.0, 0.0, 0.0), &EventContext::new()).unwrap_err();
    assert!(matches!(&err, JthError::Context(info) if info.code == "key-not-found"));
    assert_eq!(err.info().context.get("key").map(String::as_str), Some("k"));
}

#[test]
fn energy_eta_grid_tracks_both_bin_indices() {
    let axes = vec![
        BinAxis::uniform(100, 0.0, 1000.0).expect("e axis"),
        BinAxis::uniform(100, 0.0, 1000.0).expect("eta axis"),
    ];
    let mut grid = Histogram::new("grid", axes.clone()).expect("histogram");
    grid.fill_with(|bins| (bins[0] + bins[1]) as f64);

    let resolver = VariableResolver::new();
    let variables = vec![
        resolver.create("e", "float", true).expect("e"),
        resolver.create("eta", "float", true).expect("eta"),
    ];
    let mut input = MultiAxisInput::new("grid", TableRef::new("grid.json", "grid"), variables).expect("input");
    input.initialize_with_table(Box::new(grid)).expect("initialize");

    let ctx = EventContext::new();
    let mut rng = StdRng::seed_from_u64(43294);
    for _ in 0..1000 {
        let e: f64 = rng.gen_range(0.0..1000.0);
        let eta: f64 = rng.gen_range(0.0..1000.0);
        // without transverse momentum the energy is the mass, whatever eta is
        let jet = Jet::new(0.0, eta, 0.0, e);
        let value = input.resolve(&jet, &ctx).expect("resolve");
        let expected = (axes[0].find_bin(e) + axes[1].find_bin(eta)) as f64;
        assert!((value - expected).abs() <= 2.0, "({e}, {eta}): {value} vs {expected}");
    }
}
