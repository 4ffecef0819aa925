//! CCDF results as JSON.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tlaloc_ccdf::CcdfResult;
use tracing::debug;

use crate::error::IoError;

/// Empirical CCDF of one site's attenuation trace.
///
/// Serializes as `{"site": 0, "bin_edges": [...], "exceedance": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteCcdf {
    site: u32,
    #[serde(flatten)]
    ccdf: CcdfResult,
}

impl SiteCcdf {
    pub fn new(site: u32, ccdf: CcdfResult) -> Self {
        Self { site, ccdf }
    }

    pub fn site(&self) -> u32 {
        self.site
    }

    pub fn ccdf(&self) -> &CcdfResult {
        &self.ccdf
    }
}

/// Writes per-site CCDFs as a pretty-printed JSON array.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`IoError::Access`] | the file cannot be created or flushed |
/// | [`IoError::Json`] | serialization fails |
pub fn write_ccdf_json(path: &Path, ccdfs: &[SiteCcdf]) -> Result<(), IoError> {
    let access = |e: std::io::Error| IoError::Access {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };
    let file = File::create(path).map_err(access)?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, ccdfs)?;
    out.write_all(b"\n").map_err(access)?;
    out.flush().map_err(access)?;
    debug!(path = %path.display(), n_sites = ccdfs.len(), "wrote ccdf json");
    Ok(())
}

/// Reads per-site CCDFs written by [`write_ccdf_json`].
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`IoError::FileNotFound`] | `path` does not exist |
/// | [`IoError::Access`] | the file cannot be opened |
/// | [`IoError::Json`] | the content is not a CCDF array |
pub fn read_ccdf_json(path: &Path) -> Result<Vec<SiteCcdf>, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|e| IoError::Access {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattened_layout() {
        let ccdf = tlaloc_ccdf::ccdf_with_edges(&[0.5, 1.5], &[0.0, 1.0, 2.0]).unwrap();
        let json = serde_json::to_value(SiteCcdf::new(3, ccdf)).unwrap();
        assert_eq!(json["site"], 3);
        assert!(json["bin_edges"].is_array());
        assert!(json["exceedance"].is_array());
        assert!(json.get("ccdf").is_none());
    }

    #[test]
    fn missing_file() {
        let err = read_ccdf_json(Path::new("/nonexistent/ccdf.json")).unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }

    #[test]
    fn malformed_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{\"site\": 1}").unwrap();
        let err = read_ccdf_json(&path).unwrap_err();
        assert!(matches!(err, IoError::Json { .. }));
    }
}
