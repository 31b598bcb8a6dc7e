use gausscheck_core::{FiniteDistribution, GpError, Process};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::style::{RibbonStyle, SampleStyle};

/// Mean curve with a ± one-standard-deviation band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RibbonSeries {
    pub x: Vec<f64>,
    pub mean: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub style: RibbonStyle,
}

/// A bundle of sample paths over a common index range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSeries {
    pub x: Vec<f64>,
    pub paths: Vec<Vec<f64>>,
    pub style: SampleStyle,
}

/// Mean ± one-standard-deviation ribbon of `process` restricted to `xs`.
///
/// A variance entry that dips below zero by round-off is clamped before the
/// square root.
pub fn mean_ribbon_series<P: Process>(
    process: &P,
    xs: &[f64],
    noise_variance: f64,
    style: &RibbonStyle,
) -> Result<RibbonSeries, GpError> {
    let fx = process.at(xs, noise_variance)?;
    let (mean, var) = fx.mean_and_var();
    let std: Vec<f64> = var.iter().map(|v| v.max(0.0).sqrt()).collect();
    let lower = mean.iter().zip(&std).map(|(m, s)| m - s).collect();
    let upper = mean.iter().zip(&std).map(|(m, s)| m + s).collect();
    tracing::debug!(points = xs.len(), "built mean-ribbon series");
    Ok(RibbonSeries {
        x: xs.to_vec(),
        mean,
        lower,
        upper,
        style: style.clone(),
    })
}

/// `style.sample_count` sample paths of `process` restricted to `xs`.
pub fn sample_path_series<P, R>(
    process: &P,
    xs: &[f64],
    noise_variance: f64,
    rng: &mut R,
    style: &SampleStyle,
) -> Result<SampleSeries, GpError>
where
    P: Process,
    R: Rng + ?Sized,
{
    let fx = process.at(xs, noise_variance)?;
    let block = fx.sample_n(rng, style.sample_count)?;
    let paths: Vec<Vec<f64>> = (0..style.sample_count).map(|j| block.col(j)).collect();
    tracing::debug!(
        points = xs.len(),
        paths = style.sample_count,
        "built sample-path series"
    );
    Ok(SampleSeries {
        x: xs.to_vec(),
        paths,
        style: style.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gausscheck_reference::{ExactGp, SquaredExponential};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn prior() -> ExactGp<SquaredExponential> {
        ExactGp::new(1.0, SquaredExponential::new(0.25, 0.5).unwrap())
    }

    #[test]
    fn ribbon_is_mean_plus_minus_one_std() {
        let xs = [0.0, 0.5, 1.0];
        let series = mean_ribbon_series(&prior(), &xs, 0.0, &RibbonStyle::default()).unwrap();
        assert_eq!(series.x, xs);
        // Prior: mean 1, variance 0.25 everywhere, so the band is mean ± 0.5.
        for i in 0..3 {
            assert!((series.mean[i] - 1.0).abs() < 1e-12);
            assert!((series.lower[i] - 0.5).abs() < 1e-12);
            assert!((series.upper[i] - 1.5).abs() < 1e-12);
        }
    }

    #[test]
    fn ribbon_band_tightens_around_observations() {
        use gausscheck_core::FiniteDistribution as _;
        let p = prior();
        let fx = p.at(&[0.5], 1e-8).unwrap();
        let posterior = fx.condition(&[2.0]).unwrap();
        let series =
            mean_ribbon_series(&posterior, &[0.5, 3.0], 0.0, &RibbonStyle::default()).unwrap();
        let width_at_data = series.upper[0] - series.lower[0];
        let width_far_away = series.upper[1] - series.lower[1];
        assert!(width_at_data < 1e-3, "band width {width_at_data} should collapse at the data");
        assert!(width_far_away > 0.9, "band width {width_far_away} should revert to the prior");
    }

    #[test]
    fn sample_series_honors_the_configured_count() {
        let style = SampleStyle {
            sample_count: 4,
            ..SampleStyle::default()
        };
        let xs = [0.0, 0.3, 0.6, 0.9];
        let mut rng = StdRng::seed_from_u64(9);
        let series = sample_path_series(&prior(), &xs, 1e-9, &mut rng, &style).unwrap();
        assert_eq!(series.paths.len(), 4);
        assert!(series.paths.iter().all(|p| p.len() == xs.len()));
    }

    #[test]
    fn empty_index_range_is_rejected() {
        let err = mean_ribbon_series(&prior(), &[], 0.0, &RibbonStyle::default()).unwrap_err();
        assert!(matches!(err, GpError::EmptyIndexSet));
    }

    #[test]
    fn series_round_trip_through_json() {
        let xs = [0.0, 1.0];
        let series = mean_ribbon_series(&prior(), &xs, 0.0, &RibbonStyle::default()).unwrap();
        let raw = serde_json::to_string(&series).unwrap();
        let back: RibbonSeries = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, series);
    }
}
