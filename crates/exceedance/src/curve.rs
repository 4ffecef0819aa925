//! Validated long-term exceedance curve.

use crate::error::ExceedanceError;

/// A long-term rain-attenuation exceedance curve for one site.
///
/// Point `i` states that attenuation `attenuations[i]` dB is exceeded
/// `probabilities[i]` % of the time. Probabilities are strictly descending
/// in (0, 100]; attenuations are finite, non-negative and non-decreasing
/// along the curve.
///
/// The percentage of time with measurable rain (`P_rain`) can be given
/// explicitly with [`ExceedanceCurve::with_rain_probability`]; otherwise it
/// is the highest listed probability whose attenuation is positive.
#[derive(Debug, Clone, PartialEq)]
pub struct ExceedanceCurve {
    probabilities: Vec<f64>,
    attenuations: Vec<f64>,
    rain_probability: Option<f64>,
}

impl ExceedanceCurve {
    /// Minimum number of points in a curve.
    pub const MIN_POINTS: usize = 2;

    /// Builds a curve from parallel probability (%) and attenuation (dB)
    /// slices.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`ExceedanceError::LengthMismatch`] | slices differ in length |
    /// | [`ExceedanceError::TooFewPoints`] | fewer than [`Self::MIN_POINTS`] points |
    /// | [`ExceedanceError::InvalidProbability`] | probability outside (0, 100] |
    /// | [`ExceedanceError::NotDescending`] | probabilities not strictly descending |
    /// | [`ExceedanceError::InvalidAttenuation`] | attenuation negative or non-finite |
    /// | [`ExceedanceError::NotMonotone`] | attenuation decreases along the curve |
    pub fn from_pairs(probabilities: &[f64], attenuations: &[f64]) -> Result<Self, ExceedanceError> {
        if probabilities.len() != attenuations.len() {
            return Err(ExceedanceError::LengthMismatch {
                probabilities: probabilities.len(),
                attenuations: attenuations.len(),
            });
        }
        if probabilities.len() < Self::MIN_POINTS {
            return Err(ExceedanceError::TooFewPoints {
                n: probabilities.len(),
                min: Self::MIN_POINTS,
            });
        }

        for (index, (&p, &a)) in probabilities.iter().zip(attenuations).enumerate() {
            if !p.is_finite() || p <= 0.0 || p > 100.0 {
                return Err(ExceedanceError::InvalidProbability { index, value: p });
            }
            if !a.is_finite() || a < 0.0 {
                return Err(ExceedanceError::InvalidAttenuation { index, value: a });
            }
            if index > 0 {
                if p >= probabilities[index - 1] {
                    return Err(ExceedanceError::NotDescending { index });
                }
                if a < attenuations[index - 1] {
                    return Err(ExceedanceError::NotMonotone { index });
                }
            }
        }

        Ok(Self {
            probabilities: probabilities.to_vec(),
            attenuations: attenuations.to_vec(),
            rain_probability: None,
        })
    }

    /// Sets an explicit rain probability `P_rain` (% of time).
    ///
    /// # Errors
    ///
    /// Returns [`ExceedanceError::InvalidRainProbability`] if `p` is not in
    /// (0, 100].
    pub fn with_rain_probability(mut self, p: f64) -> Result<Self, ExceedanceError> {
        if !p.is_finite() || p <= 0.0 || p > 100.0 {
            return Err(ExceedanceError::InvalidRainProbability { value: p });
        }
        self.rain_probability = Some(p);
        Ok(self)
    }

    /// Exceedance probabilities in %, strictly descending.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Attenuation thresholds in dB, parallel to [`Self::probabilities`].
    pub fn attenuations(&self) -> &[f64] {
        &self.attenuations
    }

    /// Iterates over `(probability %, attenuation dB)` pairs.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.probabilities
            .iter()
            .copied()
            .zip(self.attenuations.iter().copied())
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// Always false for a validated curve; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// The explicitly configured rain probability, if any.
    pub fn explicit_rain_probability(&self) -> Option<f64> {
        self.rain_probability
    }

    /// Percentage of time with measurable rain.
    ///
    /// The explicit value if set, else the highest listed probability with a
    /// positive attenuation. `None` if the curve is dry everywhere.
    pub fn rain_probability(&self) -> Option<f64> {
        self.rain_probability.or_else(|| {
            self.points()
                .find(|&(_, a)| a > 0.0)
                .map(|(p, _)| p)
        })
    }

    /// Attenuation exceeded `p` % of the time, by log-linear interpolation
    /// in probability between tabulated points.
    ///
    /// Returns `None` when `p` lies outside the tabulated probability range.
    pub fn attenuation_at(&self, p: f64) -> Option<f64> {
        let first = *self.probabilities.first()?;
        let last = *self.probabilities.last()?;
        if !(last..=first).contains(&p) {
            return None;
        }
        // probabilities are descending: find the first point with prob <= p
        let hi = self.probabilities.partition_point(|&q| q > p);
        if self.probabilities[hi] == p || hi == 0 {
            return Some(self.attenuations[hi]);
        }
        let (p0, a0) = (self.probabilities[hi - 1], self.attenuations[hi - 1]);
        let (p1, a1) = (self.probabilities[hi], self.attenuations[hi]);
        let t = (p.ln() - p0.ln()) / (p1.ln() - p0.ln());
        Some(a0 + t * (a1 - a0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn curve() -> ExceedanceCurve {
        ExceedanceCurve::from_pairs(&[10.0, 5.0, 1.0, 0.1], &[0.0, 0.3, 2.0, 10.0]).unwrap()
    }

    #[test]
    fn accessors() {
        let c = curve();
        assert_eq!(c.len(), 4);
        assert!(!c.is_empty());
        assert_eq!(c.probabilities(), &[10.0, 5.0, 1.0, 0.1]);
        assert_eq!(c.attenuations(), &[0.0, 0.3, 2.0, 10.0]);
        assert_eq!(c.points().count(), 4);
    }

    #[test]
    fn implicit_rain_probability() {
        assert_eq!(curve().rain_probability(), Some(5.0));
        assert_eq!(curve().explicit_rain_probability(), None);
    }

    #[test]
    fn explicit_rain_probability() {
        let c = curve().with_rain_probability(7.5).unwrap();
        assert_eq!(c.rain_probability(), Some(7.5));
        assert!(curve().with_rain_probability(0.0).is_err());
        assert!(curve().with_rain_probability(100.5).is_err());
        assert!(curve().with_rain_probability(f64::NAN).is_err());
    }

    #[test]
    fn dry_curve_has_no_rain_probability() {
        let c = ExceedanceCurve::from_pairs(&[1.0, 0.1], &[0.0, 0.0]).unwrap();
        assert_eq!(c.rain_probability(), None);
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = ExceedanceCurve::from_pairs(&[1.0, 0.1], &[1.0]).unwrap_err();
        assert!(matches!(err, ExceedanceError::LengthMismatch { .. }));
    }

    #[test]
    fn rejects_single_point() {
        let err = ExceedanceCurve::from_pairs(&[1.0], &[1.0]).unwrap_err();
        assert_eq!(err, ExceedanceError::TooFewPoints { n: 1, min: 2 });
    }

    #[test]
    fn rejects_bad_probability() {
        let err = ExceedanceCurve::from_pairs(&[101.0, 1.0], &[0.0, 1.0]).unwrap_err();
        assert!(matches!(err, ExceedanceError::InvalidProbability { index: 0, .. }));
        let err = ExceedanceCurve::from_pairs(&[1.0, 0.0], &[0.0, 1.0]).unwrap_err();
        assert!(matches!(err, ExceedanceError::InvalidProbability { index: 1, .. }));
    }

    #[test]
    fn rejects_ascending_probabilities() {
        let err = ExceedanceCurve::from_pairs(&[0.1, 1.0], &[1.0, 2.0]).unwrap_err();
        assert_eq!(err, ExceedanceError::NotDescending { index: 1 });
    }

    #[test]
    fn rejects_negative_attenuation() {
        let err = ExceedanceCurve::from_pairs(&[1.0, 0.1], &[-0.1, 2.0]).unwrap_err();
        assert!(matches!(err, ExceedanceError::InvalidAttenuation { index: 0, .. }));
    }

    #[test]
    fn rejects_decreasing_attenuation() {
        let err = ExceedanceCurve::from_pairs(&[1.0, 0.1], &[3.0, 2.0]).unwrap_err();
        assert_eq!(err, ExceedanceError::NotMonotone { index: 1 });
    }

    #[test]
    fn attenuation_at_nodes_and_between() {
        let c = curve();
        assert_relative_eq!(c.attenuation_at(1.0).unwrap(), 2.0);
        assert_relative_eq!(c.attenuation_at(10.0).unwrap(), 0.0);
        assert_relative_eq!(c.attenuation_at(0.1).unwrap(), 10.0);
        // geometric midpoint of 1 % and 0.1 %
        let mid = (1.0_f64 * 0.1).sqrt();
        assert_relative_eq!(c.attenuation_at(mid).unwrap(), 6.0, epsilon = 1e-12);
        assert!(c.attenuation_at(0.01).is_none());
        assert!(c.attenuation_at(50.0).is_none());
    }
}
