//! Static link parameters of one ground station.

use crate::error::SiteError;

/// One ground station's static link parameters.
///
/// Coordinates are geodetic degrees, frequency is in GHz, elevation and
/// polarization tilt are in degrees. Construction only checks finiteness and
/// geographic ranges; the frequency/elevation validity domain of the
/// propagation model is enforced by the synthesis configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SiteDescriptor {
    latitude: f64,
    longitude: f64,
    frequency_ghz: f64,
    elevation_deg: f64,
    tilt_deg: f64,
}

impl SiteDescriptor {
    /// Creates a new site descriptor.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`SiteError::NonFinite`] | any parameter is NaN or infinite |
    /// | [`SiteError::OutOfRange`] | latitude outside [-90, 90] or longitude outside [-180, 360] |
    pub fn new(
        latitude: f64,
        longitude: f64,
        frequency_ghz: f64,
        elevation_deg: f64,
        tilt_deg: f64,
    ) -> Result<Self, SiteError> {
        for (name, value) in [
            ("latitude", latitude),
            ("longitude", longitude),
            ("frequency", frequency_ghz),
            ("elevation", elevation_deg),
            ("tilt", tilt_deg),
        ] {
            if !value.is_finite() {
                return Err(SiteError::NonFinite { name, value });
            }
        }
        check_range("latitude", latitude, -90.0, 90.0)?;
        check_range("longitude", longitude, -180.0, 360.0)?;

        Ok(Self {
            latitude,
            longitude,
            frequency_ghz,
            elevation_deg,
            tilt_deg,
        })
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Carrier frequency in GHz.
    pub fn frequency_ghz(&self) -> f64 {
        self.frequency_ghz
    }

    /// Elevation angle in degrees.
    pub fn elevation_deg(&self) -> f64 {
        self.elevation_deg
    }

    /// Polarization tilt angle in degrees.
    pub fn tilt_deg(&self) -> f64 {
        self.tilt_deg
    }
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), SiteError> {
    if value < min || value > max {
        return Err(SiteError::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Builds site descriptors from per-site parallel arrays.
///
/// All arrays must have the same length as `latitude`. The error for a
/// length mismatch names the first offending field; the error for an
/// invalid site carries its index.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`SiteError::NoSites`] | `latitude` is empty |
/// | [`SiteError::LengthMismatch`] | any array length differs from `latitude.len()` |
/// | [`SiteError::AtSite`] | [`SiteDescriptor::new`] rejects a site |
pub fn sites_from_arrays(
    latitude: &[f64],
    longitude: &[f64],
    frequency_ghz: &[f64],
    elevation_deg: &[f64],
    tilt_deg: &[f64],
) -> Result<Vec<SiteDescriptor>, SiteError> {
    let n = latitude.len();
    for (field, len) in [
        ("longitude", longitude.len()),
        ("frequency", frequency_ghz.len()),
        ("elevation", elevation_deg.len()),
        ("tilt", tilt_deg.len()),
    ] {
        if len != n {
            return Err(SiteError::LengthMismatch {
                field,
                expected: n,
                got: len,
            });
        }
    }
    if n == 0 {
        return Err(SiteError::NoSites);
    }

    (0..n)
        .map(|i| {
            SiteDescriptor::new(
                latitude[i],
                longitude[i],
                frequency_ghz[i],
                elevation_deg[i],
                tilt_deg[i],
            )
            .map_err(|e| SiteError::AtSite {
                index: i,
                source: Box::new(e),
            })
        })
        .collect()
}
