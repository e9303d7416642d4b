//! The rendered projection of a lookup cycle.
//!
//! The controller never touches the terminal. It writes [`DisplayUpdate`]s to
//! a [`DisplaySurface`], and [`DisplayState`] is the surface the UI draws from.

/// Marker for a slot with nothing to show.
pub const IDLE_MARKER: &str = "-";
/// Marker for a slot whose value is being fetched.
pub const LOADING_MARKER: &str = "取得中...";
pub const NOT_RETRIEVABLE: &str = "not retrievable";
pub const RETRIEVAL_FAILED: &str = "retrieval failed";
pub const CONFIG_ERROR: &str = "configuration error";

/// State of one text slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Slot {
    #[default]
    Idle,
    Loading,
    Value(String),
    /// The lookup succeeded but had no value for this slot.
    NotRetrievable,
    RetrievalFailed,
    ConfigError,
}

impl Slot {
    pub fn text(&self) -> &str {
        match self {
            Slot::Idle => IDLE_MARKER,
            Slot::Loading => LOADING_MARKER,
            Slot::Value(v) => v,
            Slot::NotRetrievable => NOT_RETRIEVABLE,
            Slot::RetrievalFailed => RETRIEVAL_FAILED,
            Slot::ConfigError => CONFIG_ERROR,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Slot::Loading)
    }

    /// A value or `NotRetrievable` when the name is absent.
    pub fn from_name(name: Option<String>) -> Self {
        name.map(Slot::Value).unwrap_or(Slot::NotRetrievable)
    }
}

/// Formats a coordinate part with exactly six decimals.
///
/// Exact halfway values round away from zero and negative zero prints
/// without a sign, the same as JavaScript's `toFixed(6)`.
pub fn format_degrees(value: f64) -> String {
    let magnitude = value.abs();
    let digits = if is_sixth_decimal_tie(magnitude) {
        // The exact expansion stops at a trailing 5 in the seventh place.
        let exact = format!("{:.7}", magnitude);
        increment_last_digit(&exact[..exact.len() - 1])
    } else {
        format!("{:.6}", magnitude)
    };

    if value < 0.0 {
        format!("-{digits}")
    } else {
        digits
    }
}

/// True when `magnitude * 10^6` has a fractional part of exactly one half.
///
/// That happens only for odd multiples of 2^-7: the value is
/// `mantissa * 2^exponent`, and `2 * 10^6 = 15625 * 2^7`.
fn is_sixth_decimal_tie(magnitude: f64) -> bool {
    if !magnitude.is_finite() || magnitude == 0.0 {
        return false;
    }

    let bits = magnitude.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    };

    mantissa.trailing_zeros() as i32 + exponent == -7
}

/// Adds one unit in the last place of a plain decimal string, carrying left.
fn increment_last_digit(digits: &str) -> String {
    let mut chars: Vec<char> = digits.chars().collect();
    for c in chars.iter_mut().rev() {
        match *c {
            '.' => continue,
            '9' => *c = '0',
            d => {
                *c = char::from(d as u8 + 1);
                return chars.into_iter().collect();
            }
        }
    }
    std::iter::once('1').chain(chars).collect()
}

/// One write to the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayUpdate {
    Latitude(Slot),
    Longitude(Slot),
    City(Slot),
    Town(Slot),
    ShowError(String),
    HideError,
}

/// Write-only view of the display.
pub trait DisplaySurface {
    fn apply(&mut self, update: DisplayUpdate);

    fn set_latitude(&mut self, slot: Slot) {
        self.apply(DisplayUpdate::Latitude(slot));
    }

    fn set_longitude(&mut self, slot: Slot) {
        self.apply(DisplayUpdate::Longitude(slot));
    }

    fn set_city(&mut self, slot: Slot) {
        self.apply(DisplayUpdate::City(slot));
    }

    fn set_town(&mut self, slot: Slot) {
        self.apply(DisplayUpdate::Town(slot));
    }

    /// Shows `message` in the banner. Latitude and longitude go back to idle.
    fn show_error(&mut self, message: &str) {
        self.set_latitude(Slot::Idle);
        self.set_longitude(Slot::Idle);
        self.apply(DisplayUpdate::ShowError(message.to_string()));
    }

    fn hide_error(&mut self) {
        self.apply(DisplayUpdate::HideError);
    }
}

/// The four slots and the error banner, as drawn by the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayState {
    pub latitude: Slot,
    pub longitude: Slot,
    pub city: Slot,
    pub town: Slot,
    /// Banner text; `None` while hidden.
    pub error: Option<String>,
}

impl DisplayState {
    pub fn is_busy(&self) -> bool {
        [&self.latitude, &self.longitude, &self.city, &self.town]
            .iter()
            .any(|s| s.is_loading())
    }

    pub fn error_visible(&self) -> bool {
        self.error.is_some()
    }
}

impl DisplaySurface for DisplayState {
    fn apply(&mut self, update: DisplayUpdate) {
        match update {
            DisplayUpdate::Latitude(s) => self.latitude = s,
            DisplayUpdate::Longitude(s) => self.longitude = s,
            DisplayUpdate::City(s) => self.city = s,
            DisplayUpdate::Town(s) => self.town = s,
            DisplayUpdate::ShowError(message) => self.error = Some(message),
            DisplayUpdate::HideError => self.error = None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degrees_have_six_decimals() {
        assert_eq!(format_degrees(35.6580339), "35.658034");
        assert_eq!(format_degrees(139.7016358), "139.701636");
        assert_eq!(format_degrees(-33.8688), "-33.868800");
        assert_eq!(format_degrees(0.0), "0.000000");
        assert_eq!(format_degrees(12.0000004), "12.000000");
    }

    #[test]
    fn exact_halves_round_up() {
        // 35 + 1/128 and 1/128 are exactly representable halfway cases.
        assert_eq!(format_degrees(35.0078125), "35.007813");
        assert_eq!(format_degrees(0.0078125), "0.007813");
        assert_eq!(format_degrees(0.9921875), "0.992188");
        assert_eq!(format_degrees(-139.0078125), "-139.007813");
    }

    #[test]
    fn near_halves_follow_the_binary_value() {
        // Not a multiple of 2^-7, so never an exact half.
        assert_eq!(format_degrees(0.1234565), format!("{:.6}", 0.1234565));
        assert_eq!(format_degrees(0.5), "0.500000");
    }

    #[test]
    fn signs() {
        assert_eq!(format_degrees(-0.0), "0.000000");
        assert_eq!(format_degrees(-0.0000001), "-0.000000");
    }

    #[test]
    fn increment_carries_through_nines() {
        assert_eq!(increment_last_digit("35.007812"), "35.007813");
        assert_eq!(increment_last_digit("0.999999"), "1.000000");
        assert_eq!(increment_last_digit("9.999999"), "10.000000");
    }

    #[test]
    fn show_error_blanks_coordinates() {
        let mut state = DisplayState::default();
        state.set_latitude(Slot::Value("35.000000".into()));
        state.set_longitude(Slot::Value("139.000000".into()));
        state.set_city(Slot::Value("Shibuya".into()));

        state.show_error("location access is not permitted");

        assert_eq!(state.latitude.text(), IDLE_MARKER);
        assert_eq!(state.longitude.text(), IDLE_MARKER);
        assert_eq!(state.city.text(), "Shibuya");
        assert_eq!(state.error.as_deref(), Some("location access is not permitted"));
    }

    #[test]
    fn hide_error_clears_banner() {
        let mut state = DisplayState::default();
        state.show_error("boom");
        state.hide_error();
        assert!(!state.error_visible());
    }

    #[test]
    fn slot_vocabulary() {
        assert_eq!(Slot::Idle.text(), "-");
        assert_eq!(Slot::Loading.text(), "取得中...");
        assert_eq!(Slot::from_name(None).text(), "not retrievable");
        assert_eq!(Slot::from_name(Some("Shibuya".into())).text(), "Shibuya");
        assert_eq!(Slot::RetrievalFailed.text(), "retrieval failed");
        assert_eq!(Slot::ConfigError.text(), "configuration error");
    }

    #[test]
    fn busy_while_any_slot_loads() {
        let mut state = DisplayState::default();
        assert!(!state.is_busy());
        state.set_town(Slot::Loading);
        assert!(state.is_busy());
    }
}
