use approx::assert_relative_eq;
use tlaloc_site::{SiteDescriptor, great_circle_km};
use tlaloc_spatial::{CorrelationModel, SpatialConfig, SpatialError, correlation_factor};

fn site(lat: f64, lon: f64) -> SiteDescriptor {
    SiteDescriptor::new(lat, lon, 30.0, 35.0, 0.0).unwrap()
}

#[test]
fn identical_coordinates_fully_correlated() {
    let sites = [site(50.66, 4.62), site(50.66, 4.62)];
    let f = correlation_factor(&sites, &SpatialConfig::new()).unwrap();
    assert!(!f.regularized());
    let c = f.reconstruct();
    assert_relative_eq!(c[[0, 1]], 1.0, epsilon = 1e-12);
}

#[test]
fn factor_reproduces_model_correlation() {
    let sites = [
        site(50.66, 4.62),
        site(50.85, 4.35),
        site(51.20, 3.20),
        site(46.20, 6.15),
    ];
    let config = SpatialConfig::new();
    let f = correlation_factor(&sites, &config).unwrap();
    let c = f.reconstruct();
    for i in 0..sites.len() {
        for j in 0..sites.len() {
            let expected = config
                .model()
                .correlation(great_circle_km(&sites[i], &sites[j]));
            assert_relative_eq!(c[[i, j]], expected, epsilon = 1e-10);
        }
    }
}

#[test]
fn far_sites_nearly_uncorrelated() {
    // ~500 km along a meridian.
    let sites = [site(45.0, 5.0), site(45.0 + 500.0 / 111.195, 5.0)];
    let f = correlation_factor(&sites, &SpatialConfig::new()).unwrap();
    let c = f.reconstruct();
    assert!(c[[0, 1]] < 0.025);
    assert!(c[[0, 1]] > 0.0);
}

#[test]
fn empty_site_list() {
    let err = correlation_factor(&[], &SpatialConfig::new()).unwrap_err();
    assert_eq!(err, SpatialError::EmptyMatrix);
}

#[test]
fn invalid_model_rejected_before_factorization() {
    let config = SpatialConfig::new().with_model(CorrelationModel::new().with_long_range(0.06, -1.0));
    let err = correlation_factor(&[site(0.0, 0.0)], &config).unwrap_err();
    assert!(matches!(err, SpatialError::InvalidConfig { .. }));
}
