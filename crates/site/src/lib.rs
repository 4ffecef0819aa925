//! # tlaloc-site
//!
//! Ground-station descriptors for rain-attenuation synthesis.
//!
//! A [`SiteDescriptor`] carries the static link parameters of one ground
//! station: coordinates, carrier frequency, elevation angle and polarization
//! tilt. Multi-site callers usually hold these as parallel arrays;
//! [`sites_from_arrays`] validates and zips them.
//!
//! ```
//! use tlaloc_site::{SiteDescriptor, great_circle_km};
//!
//! let lln = SiteDescriptor::new(50.66, 4.62, 39.4, 35.0, 45.0).unwrap();
//! let gva = SiteDescriptor::new(46.20, 6.15, 39.4, 35.0, 45.0).unwrap();
//! let d = great_circle_km(&lln, &gva);
//! assert!(d > 500.0 && d < 520.0);
//! ```

mod descriptor;
mod error;
mod geometry;

pub use descriptor::{SiteDescriptor, sites_from_arrays};
pub use error::SiteError;
pub use geometry::{EARTH_RADIUS_KM, great_circle_km, haversine_km};
