//! Device location for the lookup flow.
//!
//! A terminal has no GPS, so the [`LocationSource`] capability is backed by
//! IP geolocation (IpApi), fixed coordinates from `config.toml`, or nothing
//! at all. Failures are reported with the same numeric codes a platform
//! location API would use (see [`PositionError`]).

use std::future::Future;
use std::time::Duration;

use ipgeolocate::{Locator, Service};
use tracing::{error, info};

use crate::config::{LocationConfig, SourceKind};
use crate::error::PositionError;
use crate::models::Coordinate;

/// Something that can report where the device is.
pub trait LocationSource {
    /// Whether this environment can report a position at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Single-shot position request.
    fn current_position(&self) -> impl Future<Output = Result<Coordinate, PositionError>> + Send;
}

/// Resolves the caller's approximate location via IP geolocation.
pub struct IpLocationSource {
    ip_address: String,
    timeout: Duration,
}

impl IpLocationSource {
    /// An empty `ip_address` asks the service about our own public address.
    pub fn new(ip_address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            ip_address: ip_address.into(),
            timeout,
        }
    }
}

impl LocationSource for IpLocationSource {
    fn current_position(&self) -> impl Future<Output = Result<Coordinate, PositionError>> + Send {
        async move {
            let lookup = Locator::get(&self.ip_address, Service::IpApi);
            let loc = match tokio::time::timeout(self.timeout, lookup).await {
                Ok(Ok(loc)) => loc,
                Ok(Err(e)) => {
                    error!("Error using geolocation service: {}", e);
                    return Err(PositionError::unavailable(e.to_string()));
                }
                Err(_) => {
                    error!("Geolocation timed out after {:?}", self.timeout);
                    return Err(PositionError::timeout("geolocation service timed out"));
                }
            };

            match (loc.latitude.parse::<f64>(), loc.longitude.parse::<f64>()) {
                (Ok(lat), Ok(lon)) => {
                    info!("Geolocation successful - ({}, {})", lat, lon);
                    Ok(Coordinate::new(lat, lon))
                }
                _ => {
                    error!(
                        "Geolocation returned unparseable coordinates ({:?}, {:?})",
                        loc.latitude, loc.longitude
                    );
                    Err(PositionError::unavailable("unparseable coordinates"))
                }
            }
        }
    }
}

/// Always reports the same coordinate.
pub struct FixedLocationSource {
    coordinate: Coordinate,
}

impl FixedLocationSource {
    pub fn new(coordinate: Coordinate) -> Self {
        Self { coordinate }
    }
}

impl LocationSource for FixedLocationSource {
    fn current_position(&self) -> impl Future<Output = Result<Coordinate, PositionError>> + Send {
        let coordinate = self.coordinate;
        async move { Ok(coordinate) }
    }
}

/// The location source selected in `config.toml`.
pub enum ConfiguredSource {
    Ip(IpLocationSource),
    Fixed(FixedLocationSource),
    Disabled,
}

impl ConfiguredSource {
    pub fn from_config(config: &LocationConfig) -> Self {
        match config.source {
            SourceKind::Ip => ConfiguredSource::Ip(IpLocationSource::new(
                config.ip_address.clone(),
                Duration::from_secs(config.timeout_seconds),
            )),
            SourceKind::Manual => ConfiguredSource::Fixed(FixedLocationSource::new(Coordinate::new(
                config.manual_lat,
                config.manual_lon,
            ))),
            SourceKind::Disabled => ConfiguredSource::Disabled,
        }
    }
}

impl LocationSource for ConfiguredSource {
    fn is_available(&self) -> bool {
        !matches!(self, ConfiguredSource::Disabled)
    }

    fn current_position(&self) -> impl Future<Output = Result<Coordinate, PositionError>> + Send {
        async move {
            match self {
                ConfiguredSource::Ip(source) => source.current_position().await,
                ConfiguredSource::Fixed(source) => source.current_position().await,
                ConfiguredSource::Disabled => Err(PositionError::unavailable("location source disabled")),
            }
        }
    }
}
