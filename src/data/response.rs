//! Read-only view over a decoded Distance Matrix payload

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Reads an explicit `null` the same way as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Human-readable text paired with its numeric value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextValue {
    pub text: String,
    /// Meters for distances, seconds for durations
    pub value: u64,
}

/// Outcome of a single origin/destination pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementStatus {
    Ok,
    NotFound,
    ZeroResults,
    MaxRouteLengthExceeded,
    /// Missing or unrecognized status
    #[default]
    #[serde(other)]
    Unknown,
}

impl ElementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementStatus::Ok => "OK",
            ElementStatus::NotFound => "NOT_FOUND",
            ElementStatus::ZeroResults => "ZERO_RESULTS",
            ElementStatus::MaxRouteLengthExceeded => "MAX_ROUTE_LENGTH_EXCEEDED",
            ElementStatus::Unknown => "UNKNOWN",
        }
    }

    pub fn is_ok(&self) -> bool {
        *self == ElementStatus::Ok
    }
}

/// One cell of the matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ElementStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<TextValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<TextValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_in_traffic: Option<TextValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Row {
    #[serde(default, deserialize_with = "null_as_default")]
    pub elements: Vec<Element>,
}

/// A successful OK cell together with its resolved addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceRecord<'a> {
    pub origin_index: usize,
    pub destination_index: usize,
    pub origin: &'a str,
    pub destination: &'a str,
    pub distance: &'a TextValue,
    pub duration: &'a TextValue,
}

/// Structured result of one Distance Matrix call
///
/// Constructed once from the decoded payload (fresh or cached) and never
/// modified afterwards. Every accessor tolerates out-of-range indices and
/// missing fields by returning `None` or an empty slice.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatrixResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    origin_addresses: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    destination_addresses: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    rows: Vec<Row>,
}

impl MatrixResponse {
    /// Builds a response from a decoded JSON payload
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Re-encodes the response into its JSON payload form
    pub fn raw(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Top-level status reported by the API
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Origin addresses as resolved by the service
    pub fn origins(&self) -> &[String] {
        &self.origin_addresses
    }

    /// Destination addresses as resolved by the service
    pub fn destinations(&self) -> &[String] {
        &self.destination_addresses
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// (number of origins, number of destinations)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.origin_addresses.len(), self.destination_addresses.len())
    }

    pub fn element(&self, origin: usize, destination: usize) -> Option<&Element> {
        self.rows.get(origin)?.elements.get(destination)
    }

    pub fn element_status(&self, origin: usize, destination: usize) -> Option<ElementStatus> {
        self.element(origin, destination).map(|e| e.status)
    }

    fn ok_element(&self, origin: usize, destination: usize) -> Option<&Element> {
        self.element(origin, destination)
            .filter(|e| e.status.is_ok())
    }

    /// Distance for the cell, absent unless the cell is OK
    pub fn distance(&self, origin: usize, destination: usize) -> Option<&TextValue> {
        self.ok_element(origin, destination)?.distance.as_ref()
    }

    /// Duration for the cell, absent unless the cell is OK
    pub fn duration(&self, origin: usize, destination: usize) -> Option<&TextValue> {
        self.ok_element(origin, destination)?.duration.as_ref()
    }

    /// Traffic-aware duration, only present when a departure time was requested
    pub fn duration_in_traffic(&self, origin: usize, destination: usize) -> Option<&TextValue> {
        self.ok_element(origin, destination)?
            .duration_in_traffic
            .as_ref()
    }

    pub fn formatted_distance(&self, origin: usize, destination: usize) -> Option<&str> {
        self.distance(origin, destination).map(|d| d.text.as_str())
    }

    pub fn formatted_duration(&self, origin: usize, destination: usize) -> Option<&str> {
        self.duration(origin, destination).map(|d| d.text.as_str())
    }

    pub fn distance_meters(&self, origin: usize, destination: usize) -> Option<u64> {
        self.distance(origin, destination).map(|d| d.value)
    }

    pub fn duration_seconds(&self, origin: usize, destination: usize) -> Option<u64> {
        self.duration(origin, destination).map(|d| d.value)
    }

    /// True when every cell of the origins × destinations grid is OK
    ///
    /// A grid with missing rows or cells is incomplete. An empty grid is complete.
    pub fn is_complete(&self) -> bool {
        let (origins, destinations) = self.dimensions();
        let grid_filled = (0..origins).all(|i| {
            self.rows
                .get(i)
                .is_some_and(|row| row.elements.len() >= destinations)
        });

        grid_filled
            && self
                .rows
                .iter()
                .flat_map(|row| row.elements.iter())
                .all(|e| e.status.is_ok())
    }

    /// Every OK cell in row-major order; failed cells are skipped
    pub fn all_distances(&self) -> Vec<DistanceRecord<'_>> {
        (0..self.rows.len())
            .flat_map(|i| self.row_records(i))
            .collect()
    }

    /// Closest OK destination for the given origin, first one wins on ties
    pub fn find_nearest_destination(&self, origin: usize) -> Option<DistanceRecord<'_>> {
        self.row_records(origin)
            .min_by_key(|record| record.distance.value)
    }

    fn row_records(&self, origin: usize) -> impl Iterator<Item = DistanceRecord<'_>> + '_ {
        let elements = self
            .rows
            .get(origin)
            .map(|row| row.elements.as_slice())
            .unwrap_or_default();

        elements
            .iter()
            .enumerate()
            .filter_map(move |(j, element)| {
                if !element.status.is_ok() {
                    return None;
                }
                Some(DistanceRecord {
                    origin_index: origin,
                    destination_index: j,
                    origin: address_at(&self.origin_addresses, origin),
                    destination: address_at(&self.destination_addresses, j),
                    distance: element.distance.as_ref()?,
                    duration: element.duration.as_ref()?,
                })
            })
    }
}

fn address_at(addresses: &[String], index: usize) -> &str {
    addresses.get(index).map(String::as_str).unwrap_or_default()
}
