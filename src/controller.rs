//! One user-triggered lookup cycle: reset the display, find the device,
//! name the place, render the outcome.

use tracing::{info, warn};

use crate::api::GeocodingClient;
use crate::display::{format_degrees, DisplaySurface, Slot};
use crate::error::LookupError;
use crate::location::LocationSource;
use crate::models::{Coordinate, PlaceName};

/// What a finished cycle found. Failures have already been rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    pub coordinate: Coordinate,
    pub place: PlaceName,
}

pub struct LookupController<L> {
    location: L,
    geocoder: GeocodingClient,
}

impl<L: LocationSource> LookupController<L> {
    pub fn new(location: L, geocoder: GeocodingClient) -> Self {
        Self { location, geocoder }
    }

    /// Runs a full cycle against `display`.
    ///
    /// Every failure is rendered into `display` before it is returned, so
    /// callers only need the result for logging. Nothing guards against a
    /// second cycle running concurrently; whichever finishes last wins.
    pub async fn on_activate<D: DisplaySurface>(&self, display: &mut D) -> Result<Lookup, LookupError> {
        display.set_latitude(Slot::Loading);
        display.set_longitude(Slot::Loading);
        display.set_city(Slot::Idle);
        display.set_town(Slot::Idle);
        display.hide_error();

        if !self.location.is_available() {
            warn!("No location capability available");
            let err = LookupError::LocationUnsupported;
            display.show_error(&err.to_string());
            return Err(err);
        }

        let coordinate = match self.location.current_position().await {
            Ok(coordinate) => coordinate,
            Err(e) => {
                warn!("Position request failed: {}", e);
                let err = LookupError::from(e);
                display.show_error(&err.to_string());
                return Err(err);
            }
        };

        display.set_latitude(Slot::Value(format_degrees(coordinate.latitude)));
        display.set_longitude(Slot::Value(format_degrees(coordinate.longitude)));

        let place = self.resolve_place(coordinate, display).await?;
        Ok(Lookup { coordinate, place })
    }

    async fn resolve_place<D: DisplaySurface>(
        &self,
        coordinate: Coordinate,
        display: &mut D,
    ) -> Result<PlaceName, LookupError> {
        if !self.geocoder.is_configured() {
            let err = LookupError::ServiceMisconfigured;
            display.show_error(&err.to_string());
            display.set_city(Slot::ConfigError);
            display.set_town(Slot::ConfigError);
            return Err(err);
        }

        display.set_city(Slot::Loading);
        display.set_town(Slot::Loading);

        match self.geocoder.resolve(coordinate).await {
            Ok(place) => {
                info!(
                    "Resolved place - city: {:?}, town: {:?}",
                    place.city, place.sub_locality
                );
                display.set_city(Slot::from_name(place.city.clone()));
                display.set_town(Slot::from_name(place.sub_locality.clone()));
                Ok(place)
            }
            Err(err) => {
                display.show_error(&err.to_string());
                let failed = if err == LookupError::ServiceMisconfigured {
                    Slot::ConfigError
                } else {
                    Slot::RetrievalFailed
                };
                display.set_city(failed.clone());
                display.set_town(failed);
                Err(err)
            }
        }
    }
}
