//! Integration test: synthesized series through Parquet and JSON.

use tlaloc_ccdf::ccdf;
use tlaloc_exceedance::LognormalClimatology;
use tlaloc_io::{
    Compression, IoError, SiteCcdf, TimeSeriesWriter, WriterConfig, read_ccdf_json, read_parquet,
    write_ccdf_json, write_parquet,
};
use tlaloc_synth::{SynthConfig, SynthesisRequest, synthesize, synthesize_blocks};

fn provider() -> LognormalClimatology {
    LognormalClimatology::new(-0.5, 1.0, 8.0)
        .unwrap()
        .with_time_constant(20.0)
}

fn request(n_samples: usize) -> SynthesisRequest {
    SynthesisRequest::from_arrays(
        &[50.66, 50.70, 46.20],
        &[4.62, 4.60, 6.15],
        &[39.4, 39.4, 20.0],
        &[35.0, 35.0, 30.0],
        &[45.0, 45.0, 0.0],
        n_samples,
        2.0,
    )
    .unwrap()
    .with_seed(77)
}

#[test]
fn streamed_write_reads_back_as_in_memory_run() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("series.parquet");
    let config = SynthConfig::new();

    let expected = synthesize(&request(1_000), &provider(), &config).unwrap();

    let writer_config = WriterConfig::default()
        .with_compression(Compression::Zstd)
        .with_row_group_size(700);
    let mut writer = TimeSeriesWriter::create(&path, &writer_config).unwrap();
    for block in synthesize_blocks(&request(1_000), &provider(), &config, 128).unwrap() {
        writer.write_block(&block.unwrap()).unwrap();
    }
    assert_eq!(writer.samples_written(), 1_000);
    let rows = writer.finish().unwrap();
    assert_eq!(rows, 3_000);

    let stored = read_parquet(&path).unwrap();
    assert_eq!(stored.site_ids(), &[0, 1, 2]);
    assert_eq!(stored.n_samples(), 1_000);
    assert_eq!(stored.sampling_interval_s(), 2.0);
    assert_eq!(stored.values(), expected.values());
}

#[test]
fn in_memory_write_round_trip() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("series.parquet");
    let series = synthesize(&request(250), &provider(), &SynthConfig::new()).unwrap();

    let config = WriterConfig::default().with_compression(Compression::None);
    let rows = write_parquet(&path, &series, &config).unwrap();
    assert_eq!(rows, 750);

    let stored = read_parquet(&path).unwrap();
    for (id, trace) in stored.iter() {
        assert_eq!(trace, series.site(id as usize));
    }
}

#[test]
fn out_of_order_block_is_rejected() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("series.parquet");
    let mut blocks =
        synthesize_blocks(&request(100), &provider(), &SynthConfig::new(), 40).unwrap();
    let _first = blocks.next().unwrap().unwrap();
    let second = blocks.next().unwrap().unwrap();

    let mut writer = TimeSeriesWriter::create(&path, &WriterConfig::default()).unwrap();
    let err = writer.write_block(&second).unwrap_err();
    match err {
        IoError::Validation { details, .. } => {
            assert!(details.contains("block starts at sample 40, expected 0"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }
    assert_eq!(writer.rows_written(), 0);
}

#[test]
fn per_site_ccdf_json_round_trip() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("ccdf.json");
    let series = synthesize(&request(5_000), &provider(), &SynthConfig::new()).unwrap();

    let ccdfs: Vec<SiteCcdf> = (0..series.n_sites())
        .map(|s| {
            let trace = series.site(s).to_vec();
            SiteCcdf::new(s as u32, ccdf(&trace, 50).unwrap())
        })
        .collect();
    write_ccdf_json(&path, &ccdfs).unwrap();

    let back = read_ccdf_json(&path).unwrap();
    assert_eq!(back.len(), 3);
    for (a, b) in ccdfs.iter().zip(&back) {
        assert_eq!(a.site(), b.site());
        assert_eq!(a.ccdf().n_bins(), b.ccdf().n_bins());
        for (x, y) in a.ccdf().exceedance().iter().zip(b.ccdf().exceedance()) {
            assert!((x - y).abs() <= 1e-12 * x.abs().max(1.0));
        }
    }
}
