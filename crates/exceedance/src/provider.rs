//! Climatology providers: the external source of per-site statistics.

use tlaloc_site::SiteDescriptor;

use crate::curve::ExceedanceCurve;
use crate::error::ExceedanceError;
use crate::fit::LognormalFit;
use crate::normal::inverse_survival;

/// Source of long-term rain-attenuation statistics for a site.
///
/// The synthesis engine queries a provider once per site before sampling
/// starts and never again. Closures of the form
/// `Fn(&SiteDescriptor) -> Result<ExceedanceCurve, ExceedanceError>` are
/// providers too.
pub trait ClimatologyProvider {
    /// Returns the exceedance curve for `site`.
    fn exceedance_curve(&self, site: &SiteDescriptor) -> Result<ExceedanceCurve, ExceedanceError>;

    /// Optional per-site time constant `β` (seconds) of the attenuation
    /// dynamics. `None` defers to the synthesis configuration.
    fn time_constant(&self, _site: &SiteDescriptor) -> Option<f64> {
        None
    }
}

impl<F> ClimatologyProvider for F
where
    F: Fn(&SiteDescriptor) -> Result<ExceedanceCurve, ExceedanceError>,
{
    fn exceedance_curve(&self, site: &SiteDescriptor) -> Result<ExceedanceCurve, ExceedanceError> {
        self(site)
    }
}

/// Provider backed by curves supplied up front.
///
/// Entries are keyed either on coordinates alone, matching any link at that
/// location, or on a full [`SiteDescriptor`], so co-located links at
/// different frequencies or elevations carry their own curves. A full match
/// takes precedence over a coordinate match.
///
/// Typically filled from a configuration file or from the output of an
/// external prediction tool.
#[derive(Debug, Clone, Default)]
pub struct TabulatedClimatology {
    entries: Vec<TabulatedEntry>,
    fallback: Option<ExceedanceCurve>,
}

#[derive(Debug, Clone)]
struct TabulatedEntry {
    latitude: f64,
    longitude: f64,
    /// `(frequency GHz, elevation °, tilt °)`; `None` matches any link.
    link: Option<(f64, f64, f64)>,
    curve: ExceedanceCurve,
    time_constant: Option<f64>,
}

impl TabulatedEntry {
    fn at_location(&self, site: &SiteDescriptor) -> bool {
        let tol = TabulatedClimatology::COORD_TOLERANCE_DEG;
        (self.latitude - site.latitude()).abs() <= tol
            && (self.longitude - site.longitude()).abs() <= tol
    }

    fn same_link(&self, site: &SiteDescriptor) -> bool {
        let tol = TabulatedClimatology::LINK_TOLERANCE;
        self.link.is_some_and(|(f, e, t)| {
            (f - site.frequency_ghz()).abs() <= tol
                && (e - site.elevation_deg()).abs() <= tol
                && (t - site.tilt_deg()).abs() <= tol
        })
    }
}

impl TabulatedClimatology {
    /// Coordinate tolerance in degrees used when matching sites.
    pub const COORD_TOLERANCE_DEG: f64 = 1e-6;

    /// Tolerance on frequency (GHz), elevation and tilt (degrees) for
    /// entries keyed on a full site.
    pub const LINK_TOLERANCE: f64 = 1e-9;

    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a curve for every link at (`latitude`, `longitude`).
    pub fn with_curve(mut self, latitude: f64, longitude: f64, curve: ExceedanceCurve) -> Self {
        self.entries.push(TabulatedEntry {
            latitude,
            longitude,
            link: None,
            curve,
            time_constant: None,
        });
        self
    }

    /// Adds a curve and a time constant (seconds) for every link at
    /// (`latitude`, `longitude`).
    pub fn with_curve_and_time_constant(
        mut self,
        latitude: f64,
        longitude: f64,
        curve: ExceedanceCurve,
        time_constant: f64,
    ) -> Self {
        self.entries.push(TabulatedEntry {
            latitude,
            longitude,
            link: None,
            curve,
            time_constant: Some(time_constant),
        });
        self
    }

    /// Adds a curve, and optionally a time constant (seconds), for exactly
    /// the link described by `site`.
    pub fn with_site_curve(
        mut self,
        site: SiteDescriptor,
        curve: ExceedanceCurve,
        time_constant: Option<f64>,
    ) -> Self {
        self.entries.push(TabulatedEntry {
            latitude: site.latitude(),
            longitude: site.longitude(),
            link: Some((site.frequency_ghz(), site.elevation_deg(), site.tilt_deg())),
            curve,
            time_constant,
        });
        self
    }

    /// Sets a curve returned for sites without a dedicated entry.
    pub fn with_fallback(mut self, curve: ExceedanceCurve) -> Self {
        self.fallback = Some(curve);
        self
    }

    /// Number of site-specific curves.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no site-specific curves are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, site: &SiteDescriptor) -> Option<&TabulatedEntry> {
        let mut here = self.entries.iter().filter(|e| e.at_location(site));
        let exact = here.clone().find(|e| e.same_link(site));
        exact.or_else(|| here.find(|e| e.link.is_none()))
    }
}

impl ClimatologyProvider for TabulatedClimatology {
    fn exceedance_curve(&self, site: &SiteDescriptor) -> Result<ExceedanceCurve, ExceedanceError> {
        self.lookup(site)
            .map(|e| e.curve.clone())
            .or_else(|| self.fallback.clone())
            .ok_or(ExceedanceError::NoCurveForSite {
                latitude: site.latitude(),
                longitude: site.longitude(),
            })
    }

    fn time_constant(&self, site: &SiteDescriptor) -> Option<f64> {
        self.lookup(site).and_then(|e| e.time_constant)
    }
}

/// Provider that returns the same analytic lognormal curve for every site.
///
/// Useful for sensitivity studies and for testing the synthesis engine
/// against a known target distribution.
#[derive(Debug, Clone, Copy)]
pub struct LognormalClimatology {
    fit: LognormalFit,
    time_constant: Option<f64>,
}

impl LognormalClimatology {
    /// Probability levels (%) at which the curve is tabulated, below `P_rain`.
    pub const LEVELS: [f64; 15] = [
        50.0, 30.0, 20.0, 10.0, 5.0, 3.0, 2.0, 1.0, 0.5, 0.3, 0.2, 0.1, 0.05, 0.01, 0.001,
    ];

    /// Creates a provider for `ln A ~ N(mu, sigma²)` given rain, raining
    /// `rain_probability` % of the time.
    ///
    /// # Errors
    ///
    /// Propagates [`LognormalFit::new`] validation errors.
    pub fn new(mu: f64, sigma: f64, rain_probability: f64) -> Result<Self, ExceedanceError> {
        Ok(Self {
            fit: LognormalFit::new(mu, sigma, rain_probability)?,
            time_constant: None,
        })
    }

    /// Sets the time constant (seconds) reported for every site.
    pub fn with_time_constant(mut self, seconds: f64) -> Self {
        self.time_constant = Some(seconds);
        self
    }

    /// The underlying lognormal parameters.
    pub fn fit(&self) -> LognormalFit {
        self.fit
    }
}

impl ClimatologyProvider for LognormalClimatology {
    fn exceedance_curve(&self, _site: &SiteDescriptor) -> Result<ExceedanceCurve, ExceedanceError> {
        let p_rain = self.fit.rain_probability();
        let probs: Vec<f64> = std::iter::once(p_rain)
            .chain(Self::LEVELS.iter().copied().filter(|&p| p < p_rain))
            .collect();
        let atts: Vec<f64> = probs
            .iter()
            .map(|&p| (self.fit.mu() + self.fit.sigma() * inverse_survival(p / 100.0)).exp())
            .collect();
        ExceedanceCurve::from_pairs(&probs, &atts)?.with_rain_probability(p_rain)
    }

    fn time_constant(&self, _site: &SiteDescriptor) -> Option<f64> {
        self.time_constant
    }
}
