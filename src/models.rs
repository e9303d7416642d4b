use serde::Deserialize;

/// Component types consulted when naming a place.
pub const LOCALITY: &str = "locality";
pub const SUBLOCALITY_LEVEL_1: &str = "sublocality_level_1";
pub const SUBLOCALITY_LEVEL_2: &str = "sublocality_level_2";

/// A point on Earth in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// The `latlng` query value. Full precision, never the rounded display text.
    pub fn to_query(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// City and sub-locality names resolved for a coordinate.
///
/// `None` means the service answered but had no such component, which is
/// rendered differently from a failed lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceName {
    pub city: Option<String>,
    pub sub_locality: Option<String>,
}

impl PlaceName {
    /// Picks the city from `locality` and the town from `sublocality_level_1`,
    /// falling back to `sublocality_level_2`.
    pub fn from_components(components: &[AddressComponent]) -> Self {
        let named = |kind: &str| find_address_component(components, kind).filter(|s| !s.is_empty());

        Self {
            city: named(LOCALITY).map(str::to_string),
            sub_locality: named(SUBLOCALITY_LEVEL_1)
                .or_else(|| named(SUBLOCALITY_LEVEL_2))
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// `address_components` and `types` are required: an `OK` body without them
/// is unusable and must fail to decode.
#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub address_components: Vec<AddressComponent>,
    #[serde(default)]
    pub formatted_address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    pub types: Vec<String>,
}

/// Returns the `long_name` of the first component tagged with `kind`.
pub fn find_address_component<'a>(components: &'a [AddressComponent], kind: &str) -> Option<&'a str> {
    components
        .iter()
        .find(|c| c.types.iter().any(|t| t == kind))
        .map(|c| c.long_name.as_str())
}
