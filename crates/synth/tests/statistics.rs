use approx::assert_relative_eq;
use ndarray::{Axis, concatenate};
use tlaloc_ccdf::ccdf;
use tlaloc_exceedance::{LognormalClimatology, inverse_survival};
use tlaloc_synth::{
    DryTransition, InitialState, SynthConfig, SynthesisRequest, TimeSeriesBlock, synthesize,
    synthesize_blocks,
};

const MU: f64 = -0.5;
const SIGMA: f64 = 1.0;
const P_RAIN: f64 = 5.0;

fn provider(time_constant: f64) -> LognormalClimatology {
    LognormalClimatology::new(MU, SIGMA, P_RAIN)
        .unwrap()
        .with_time_constant(time_constant)
}

fn single_site(n_samples: usize, seed: u64) -> SynthesisRequest {
    SynthesisRequest::from_arrays(&[48.0], &[2.0], &[30.0], &[40.0], &[0.0], n_samples, 1.0)
        .unwrap()
        .with_seed(seed)
}

fn target(p: f64) -> f64 {
    (MU + SIGMA * inverse_survival(p / 100.0)).exp()
}

#[test]
fn empirical_ccdf_matches_target_curve() {
    let series = synthesize(&single_site(400_000, 31), &provider(1.0), &SynthConfig::new()).unwrap();
    let trace = series.site(0).to_vec();
    let result = ccdf(&trace, 300).unwrap();

    for p in [1.0, 0.1] {
        let got = result.attenuation_at(p).unwrap();
        let want = target(p);
        assert!(
            (got - want).abs() / want < 0.15,
            "at {p} %: got {got:.3} dB, want {want:.3} dB"
        );
    }
    // Fraction of wet samples.
    assert_relative_eq!(tlaloc_stats::percent_above(&trace, 0.0), P_RAIN, epsilon = 0.3);
}

#[test]
fn offset_transition_stays_below_step() {
    let step = synthesize(&single_site(20_000, 5), &provider(10.0), &SynthConfig::new()).unwrap();
    let offset = synthesize(
        &single_site(20_000, 5),
        &provider(10.0),
        &SynthConfig::new().with_dry_transition(DryTransition::Offset),
    )
    .unwrap();
    let shift = (MU + SIGMA * inverse_survival(P_RAIN / 100.0)).exp();
    for (&s, &o) in step.site(0).iter().zip(offset.site(0)) {
        if s > 0.0 {
            assert_relative_eq!(o, (s - shift).max(0.0), epsilon = 1e-9);
        } else {
            assert_eq!(o, 0.0);
        }
    }
}

#[test]
fn all_values_finite_and_non_negative() {
    let request = SynthesisRequest::from_arrays(
        &[45.0, 45.05, 45.5, 47.0],
        &[5.0, 5.05, 5.5, 8.0],
        &[12.0, 20.0, 30.0, 50.0],
        &[10.0, 30.0, 50.0, 89.0],
        &[0.0, 45.0, 90.0, 0.0],
        50_000,
        1.0,
    )
    .unwrap()
    .with_seed(8);
    let series = synthesize(&request, &provider(60.0), &SynthConfig::new()).unwrap();
    assert_eq!(series.values().dim(), (4, 50_000));
    assert!(series.values().iter().all(|a| a.is_finite() && *a >= 0.0));
}

#[test]
fn repeated_runs_are_identical() {
    let config = SynthConfig::new().with_initial_state(InitialState::Zero);
    let a = synthesize(&single_site(10_000, 1234), &provider(30.0), &config).unwrap();
    let b = synthesize(&single_site(10_000, 1234), &provider(30.0), &config).unwrap();
    assert_eq!(a, b);
    let c = synthesize(&single_site(10_000, 4321), &provider(30.0), &config).unwrap();
    assert_ne!(a, c);
}

#[test]
fn streamed_output_equals_in_memory_output() {
    let request = SynthesisRequest::from_arrays(
        &[45.0, 45.2, 46.0],
        &[5.0, 5.3, 6.0],
        &[20.0, 20.0, 20.0],
        &[35.0, 35.0, 35.0],
        &[0.0, 0.0, 0.0],
        25_000,
        2.0,
    )
    .unwrap()
    .with_seed(55);
    let config = SynthConfig::new().with_block_len(4096);
    let full = synthesize(&request, &provider(600.0), &config).unwrap();

    let blocks: Vec<TimeSeriesBlock> = synthesize_blocks(&request, &provider(600.0), &config, 1000)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(blocks.len(), 25);
    assert_eq!(blocks.last().unwrap().end(), 25_000);
    assert_eq!(blocks[3].time_s(0), 6000.0);
    let views: Vec<_> = blocks.iter().map(|b| b.values().view()).collect();
    let streamed = concatenate(Axis(1), &views).unwrap();
    assert_eq!(&streamed, full.values());
}

#[test]
fn dropping_stream_cancels_between_blocks() {
    let mut stream = synthesize_blocks(
        &single_site(1_000_000, 3),
        &provider(30.0),
        &SynthConfig::new(),
        10_000,
    )
    .unwrap();
    let first = stream.next().unwrap().unwrap();
    assert_eq!(first.len(), 10_000);
    assert_eq!(stream.remaining(), 990_000);
    drop(stream);
}
