//! Request options for the Distance Matrix API
//!
//! Each option is a closed enum parsed from its wire string, so an unknown value
//! is rejected the moment it is parsed and can never reach an outgoing request.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ApiError;

/// Travel mode used for the calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Driving,
    Walking,
    Bicycling,
    Transit,
}

/// Unit system for the `text` fields of the response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Units {
    Metric,
    Imperial,
}

/// Route feature the calculation should avoid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Avoid {
    Tolls,
    Highways,
    Ferries,
}

/// Assumption used when predicting time in traffic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficModel {
    BestGuess,
    Pessimistic,
    Optimistic,
}

/// Departure time, required by the API before it honours a traffic model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepartureTime {
    Now,
    /// Seconds since the unix epoch
    At(u64),
}

/// Declares the wire names of a unit-only option enum.
macro_rules! wire_names {
    ($ty:ident, $option:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Value as sent in the query string
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ApiError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok($ty::$variant),)+
                    _ => Err(ApiError::InvalidOption {
                        option: $option,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

wire_names!(TravelMode, "mode", {
    Driving => "driving",
    Walking => "walking",
    Bicycling => "bicycling",
    Transit => "transit",
});

wire_names!(Units, "units", {
    Metric => "metric",
    Imperial => "imperial",
});

wire_names!(Avoid, "avoid", {
    Tolls => "tolls",
    Highways => "highways",
    Ferries => "ferries",
});

wire_names!(TrafficModel, "traffic_model", {
    BestGuess => "best_guess",
    Pessimistic => "pessimistic",
    Optimistic => "optimistic",
});

impl Display for DepartureTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DepartureTime::Now => write!(f, "now"),
            DepartureTime::At(timestamp) => write!(f, "{}", timestamp),
        }
    }
}

impl FromStr for DepartureTime {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("now") {
            return Ok(DepartureTime::Now);
        }
        trimmed
            .parse::<u64>()
            .map(DepartureTime::At)
            .map_err(|_| ApiError::InvalidOption {
                option: "departure_time",
                value: s.to_string(),
            })
    }
}

/// Locale code such as `en`, `fr-CA` or `zh_TW`
///
/// Only constructed through [`parse_language`], so a held value is always valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Language(String);

impl Language {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Language {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_language(s)
    }
}

impl TryFrom<String> for Language {
    type Error = ApiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_language(&value)
    }
}

impl From<Language> for String {
    fn from(value: Language) -> Self {
        value.0
    }
}

/// Validates a locale code: non-empty ASCII letters, digits, `-` or `_`
pub fn parse_language(code: &str) -> Result<Language, ApiError> {
    let code = code.trim();
    let valid = !code.is_empty()
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(Language(code.to_string()))
    } else {
        Err(ApiError::InvalidOption {
            option: "language",
            value: code.to_string(),
        })
    }
}

/// A set of request options, any of which may be left unset
///
/// The client keeps one of these as its instance defaults; callers may pass
/// another per call. Unset fields never appear in the outgoing query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOptions {
    pub mode: Option<TravelMode>,
    pub units: Option<Units>,
    pub language: Option<Language>,
    pub avoid: Option<Avoid>,
    pub traffic_model: Option<TrafficModel>,
    pub departure_time: Option<DepartureTime>,
}

impl RequestOptions {
    /// Options applied when nothing else is configured: driving, metric, English
    pub fn defaults() -> Self {
        Self {
            mode: Some(TravelMode::Driving),
            units: Some(Units::Metric),
            language: Some(Language("en".to_string())),
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: TravelMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = Some(units);
        self
    }

    /// Sets the language, rejecting codes that are not a plain locale tag
    pub fn with_language(mut self, language: &str) -> Result<Self, ApiError> {
        self.language = Some(parse_language(language)?);
        Ok(self)
    }

    pub fn with_avoid(mut self, avoid: Avoid) -> Self {
        self.avoid = Some(avoid);
        self
    }

    pub fn with_traffic_model(mut self, traffic_model: TrafficModel) -> Self {
        self.traffic_model = Some(traffic_model);
        self
    }

    pub fn with_departure_time(mut self, departure_time: DepartureTime) -> Self {
        self.departure_time = Some(departure_time);
        self
    }

    /// Overlays `overrides` on top of `self`; set fields in `overrides` win
    pub fn merged_with(&self, overrides: &RequestOptions) -> RequestOptions {
        RequestOptions {
            mode: overrides.mode.or(self.mode),
            units: overrides.units.or(self.units),
            language: overrides
                .language
                .clone()
                .or_else(|| self.language.clone()),
            avoid: overrides.avoid.or(self.avoid),
            traffic_model: overrides.traffic_model.or(self.traffic_model),
            departure_time: overrides.departure_time.or(self.departure_time),
        }
    }

    /// Set options as query parameters, in canonical key order
    pub fn to_params(&self) -> BTreeMap<&'static str, String> {
        let mut params = BTreeMap::new();
        if let Some(mode) = self.mode {
            params.insert("mode", mode.to_string());
        }
        if let Some(units) = self.units {
            params.insert("units", units.to_string());
        }
        if let Some(language) = &self.language {
            params.insert("language", language.to_string());
        }
        if let Some(avoid) = self.avoid {
            params.insert("avoid", avoid.to_string());
        }
        if let Some(traffic_model) = self.traffic_model {
            params.insert("traffic_model", traffic_model.to_string());
        }
        if let Some(departure_time) = self.departure_time {
            params.insert("departure_time", departure_time.to_string());
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode_values() {
        assert_eq!("driving".parse::<TravelMode>().unwrap(), TravelMode::Driving);
        assert_eq!("Walking".parse::<TravelMode>().unwrap(), TravelMode::Walking);
        assert_eq!(" transit ".parse::<TravelMode>().unwrap(), TravelMode::Transit);
    }

    #[test]
    fn test_parse_invalid_mode() {
        let err = "flying".parse::<TravelMode>().unwrap_err();
        assert!(matches!(
            err,
            ApiError::InvalidOption { option: "mode", ref value } if value == "flying"
        ));
    }

    #[test]
    fn test_parse_traffic_model_and_avoid() {
        assert_eq!(
            "best_guess".parse::<TrafficModel>().unwrap(),
            TrafficModel::BestGuess
        );
        assert_eq!("ferries".parse::<Avoid>().unwrap(), Avoid::Ferries);
        assert!("indoor".parse::<Avoid>().is_err());
        assert!("kilometric".parse::<Units>().is_err());
    }

    #[test]
    fn test_parse_departure_time() {
        assert_eq!("now".parse::<DepartureTime>().unwrap(), DepartureTime::Now);
        assert_eq!(
            "1700000000".parse::<DepartureTime>().unwrap(),
            DepartureTime::At(1_700_000_000)
        );
        assert!("tomorrow".parse::<DepartureTime>().is_err());
    }

    #[test]
    fn test_parse_language() {
        assert_eq!(parse_language("fr-CA").unwrap().as_str(), "fr-CA");
        assert!(parse_language("").is_err());
        assert!(parse_language("en; drop").is_err());
    }

    #[test]
    fn test_with_language_rejects_invalid_code() {
        let err = RequestOptions::default().with_language("en; drop").unwrap_err();
        assert!(matches!(err, ApiError::InvalidOption { option: "language", .. }));

        let options = RequestOptions::default().with_language(" pt-BR ").unwrap();
        assert_eq!(options.to_params()["language"], "pt-BR");
    }

    #[test]
    fn test_deserialized_language_is_validated() {
        let parsed: Result<RequestOptions, _> =
            serde_json::from_str(r#"{"language": "en&key=stolen"}"#);
        assert!(parsed.is_err());

        let parsed: RequestOptions = serde_json::from_str(r#"{"language": "de"}"#).unwrap();
        assert_eq!(parsed.language.as_ref().map(Language::as_str), Some("de"));
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let base = RequestOptions::defaults().with_avoid(Avoid::Tolls);
        let overrides = RequestOptions::default()
            .with_mode(TravelMode::Walking)
            .with_language("de")
            .unwrap();

        let merged = base.merged_with(&overrides);

        assert_eq!(merged.mode, Some(TravelMode::Walking));
        assert_eq!(merged.units, Some(Units::Metric));
        assert_eq!(merged.language.as_ref().map(Language::as_str), Some("de"));
        assert_eq!(merged.avoid, Some(Avoid::Tolls));
        assert_eq!(merged.traffic_model, None);
    }

    #[test]
    fn test_params_skip_unset_fields() {
        let params = RequestOptions::defaults().to_params();

        assert_eq!(params.len(), 3);
        assert_eq!(params["mode"], "driving");
        assert_eq!(params["units"], "metric");
        assert_eq!(params["language"], "en");
        assert!(!params.contains_key("avoid"));
    }

    #[test]
    fn test_params_order_is_canonical() {
        let a = RequestOptions::default()
            .with_traffic_model(TrafficModel::Pessimistic)
            .with_mode(TravelMode::Driving);
        let b = RequestOptions::default()
            .with_mode(TravelMode::Driving)
            .with_traffic_model(TrafficModel::Pessimistic);

        let keys_a: Vec<_> = a.to_params().into_keys().collect();
        let keys_b: Vec<_> = b.to_params().into_keys().collect();

        assert_eq!(keys_a, vec!["mode", "traffic_model"]);
        assert_eq!(keys_a, keys_b);
    }
}
