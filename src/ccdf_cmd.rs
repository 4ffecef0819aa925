//! CCDF command: per-site empirical exceedance of a stored series.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use tracing::{info, info_span};

use tlaloc_ccdf::CcdfAccumulator;
use tlaloc_io::{SiteCcdf, scan_parquet, write_ccdf_json};

use crate::cli::CcdfArgs;

/// Per-site `(min, max)` attenuation, keyed by site index.
pub type SiteRanges = BTreeMap<u32, (f64, f64)>;

/// Run the standalone CCDF computation.
///
/// The file is scanned twice: once for the per-site ranges, once to fill
/// the histograms. Only one record batch is resident at a time.
pub fn run(args: CcdfArgs) -> Result<()> {
    let _cmd = info_span!("ccdf").entered();

    info!(path = %args.input.display(), "scanning attenuation series");
    let ranges = site_ranges(&args.input)?;

    let output = args.output.unwrap_or_else(|| default_output(&args.input));
    write_site_ccdfs(&args.input, &ranges, args.bins, &output)
}

/// Grows the range of `site` to include `value`.
pub fn widen(ranges: &mut SiteRanges, site: u32, value: f64) {
    let range = ranges.entry(site).or_insert((value, value));
    range.0 = range.0.min(value);
    range.1 = range.1.max(value);
}

/// First pass: per-site minimum and maximum.
fn site_ranges(input: &Path) -> Result<SiteRanges> {
    let mut ranges = SiteRanges::new();
    scan_parquet(input, |site, a| widen(&mut ranges, site, a))
        .with_context(|| format!("failed to read Parquet: {}", input.display()))?;
    if ranges.is_empty() {
        bail!("{} contains no rows", input.display());
    }
    Ok(ranges)
}

/// Computes one CCDF per site of a stored series and writes them as JSON.
///
/// `ranges` must hold the extremes of every site in `input`, as collected
/// by [`widen`] while the file was written or on an earlier scan.
pub fn write_site_ccdfs(
    input: &Path,
    ranges: &SiteRanges,
    bins: usize,
    output: &Path,
) -> Result<()> {
    let mut accumulators = ranges
        .iter()
        .map(|(&site, &(lo, hi))| {
            CcdfAccumulator::new(lo, hi, bins)
                .map(|acc| (site, acc))
                .with_context(|| format!("CCDF failed for site {site}"))
        })
        .collect::<Result<BTreeMap<_, _>>>()?;

    let mut failure: Option<anyhow::Error> = None;
    scan_parquet(input, |site, a| {
        if failure.is_some() {
            return;
        }
        match accumulators.get_mut(&site) {
            Some(acc) => {
                if let Err(e) = acc.push(a) {
                    failure =
                        Some(anyhow::Error::new(e).context(format!("CCDF failed for site {site}")));
                }
            }
            None => failure = Some(anyhow!("site {site} has no recorded range")),
        }
    })
    .with_context(|| format!("failed to read Parquet: {}", input.display()))?;
    if let Some(e) = failure {
        return Err(e);
    }

    let mut ccdfs = Vec::with_capacity(accumulators.len());
    for (site, acc) in accumulators {
        let result = acc
            .finish()
            .with_context(|| format!("CCDF failed for site {site}"))?;
        info!(
            site,
            a_1pct = ?result.attenuation_at(1.0),
            a_01pct = ?result.attenuation_at(0.1),
            "site ccdf"
        );
        ccdfs.push(SiteCcdf::new(site, result));
    }

    write_ccdf_json(output, &ccdfs)
        .with_context(|| format!("failed to write CCDF JSON: {}", output.display()))?;
    info!(path = %output.display(), n_sites = ccdfs.len(), "ccdf written");
    Ok(())
}

/// `foo.parquet` -> `foo.ccdf.json`
fn default_output(input: &Path) -> PathBuf {
    input.with_extension("ccdf.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::cli::GenerateArgs;
    use crate::generate;

    #[test]
    fn default_output_replaces_extension() {
        assert_eq!(
            default_output(Path::new("runs/lln.parquet")),
            PathBuf::from("runs/lln.ccdf.json")
        );
    }

    #[test]
    fn widen_tracks_extremes() {
        let mut ranges = SiteRanges::new();
        for (site, a) in [(1, 2.0), (0, 0.5), (1, -1.0), (1, 4.0), (0, 0.5)] {
            widen(&mut ranges, site, a);
        }
        assert_eq!(ranges[&0], (0.5, 0.5));
        assert_eq!(ranges[&1], (-1.0, 4.0));
    }

    #[test]
    fn streamed_ccdf_matches_loaded_series() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("tlaloc.toml");
        std::fs::write(
            &config_path,
            r#"
[run]
n_samples = 5000

[climatology]
mu = 0.0
sigma = 1.0
rain_probability = 20.0
time_constant = 10.0

[[sites]]
latitude = 50.0
longitude = 4.0
frequency = 20.0
elevation = 35.0

[[sites]]
latitude = 50.1
longitude = 4.0
frequency = 20.0
elevation = 35.0

[output]
block_len = 700
"#,
        )
        .unwrap();
        let series = dir.path().join("run.parquet");
        generate::run(GenerateArgs {
            config: config_path,
            output: Some(series.clone()),
            seed: Some(11),
        })
        .unwrap();

        let output = dir.path().join("run.ccdf.json");
        run(CcdfArgs {
            input: series.clone(),
            bins: 25,
            output: Some(output.clone()),
        })
        .unwrap();

        let stored = tlaloc_io::read_parquet(&series).unwrap();
        let written = tlaloc_io::read_ccdf_json(&output).unwrap();
        assert_eq!(written.len(), 2);
        for (site_ccdf, (site, trace)) in written.iter().zip(stored.iter()) {
            assert_eq!(site_ccdf.site(), site);
            let expected = tlaloc_ccdf::ccdf(&trace.to_vec(), 25).unwrap();
            let got = site_ccdf.ccdf();
            for (a, b) in got.bin_edges().iter().zip(expected.bin_edges()) {
                assert_relative_eq!(*a, *b, epsilon = 1e-12);
            }
            for (a, b) in got.exceedance().iter().zip(expected.exceedance()) {
                assert_relative_eq!(*a, *b, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn range_pass_missing_file() {
        let err = site_ranges(Path::new("/nonexistent/run.parquet")).unwrap_err();
        assert!(err.to_string().contains("failed to read Parquet"));
    }
}
