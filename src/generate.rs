//! Generate command: synthesize and stream attenuation series to Parquet.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use tlaloc_io::TimeSeriesWriter;
use tlaloc_synth::synthesize_blocks;

use crate::ccdf_cmd::{self, SiteRanges};
use crate::cli::GenerateArgs;
use crate::config::TlalocConfig;
use crate::convert;

/// Run the full generation pipeline.
pub fn run(args: GenerateArgs) -> Result<()> {
    let _cmd = info_span!("generate").entered();

    // Step 1: Load config and resolve paths
    let toml_str = std::fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config file: {}", args.config.display()))?;
    let config: TlalocConfig = toml::from_str(&toml_str).context("failed to parse TOML config")?;

    let output = args
        .output
        .or_else(|| config.output.path.clone())
        .ok_or_else(|| {
            anyhow::anyhow!("no output path: set [output].path in config or use --output")
        })?;

    // Step 2: Build request and crate configs
    let request = convert::build_request(&config, args.seed)?;
    let provider = convert::build_provider(&config, &request)?;
    let synth_cfg = convert::build_synth_config(&config)?;
    let writer_cfg = convert::build_writer_config(&config.output)?;

    info!(
        n_sites = request.n_sites(),
        n_samples = request.n_samples(),
        sampling_interval_s = request.sampling_interval_s(),
        seed = ?request.seed(),
        "starting synthesis"
    );

    // Step 3: Stream blocks to Parquet
    let blocks = synthesize_blocks(&request, &*provider, &synth_cfg, synth_cfg.block_len())
        .context("failed to initialize synthesis")?;
    let mut writer = TimeSeriesWriter::create(&output, &writer_cfg)
        .with_context(|| format!("failed to create Parquet: {}", output.display()))?;
    let track_ranges = config.output.ccdf.is_some();
    let mut ranges = SiteRanges::new();
    for block in blocks {
        let block = block.context("synthesis failed")?;
        writer
            .write_block(&block)
            .with_context(|| format!("failed to write block at sample {}", block.start()))?;
        if track_ranges {
            for (site, row) in block.values().rows().into_iter().enumerate() {
                for &a in row {
                    ccdf_cmd::widen(&mut ranges, site as u32, a);
                }
            }
        }
    }
    let rows = writer
        .finish()
        .with_context(|| format!("failed to finalize Parquet: {}", output.display()))?;
    info!(path = %output.display(), rows, "time series written");

    // Step 4: Optional per-site CCDF, one streaming pass over the file
    if let Some(ref ccdf_path) = config.output.ccdf {
        ccdf_cmd::write_site_ccdfs(&output, &ranges, config.output.ccdf_bins, ccdf_path)?;
    }

    Ok(())
}
