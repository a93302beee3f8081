use std::sync::Arc;

use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

// ---------------------------------------------------------------------------
// RawRecord – one object exactly as the source delivers it
// ---------------------------------------------------------------------------

/// A record as it arrives from the API or a local dump.
///
/// The public endpoint serialises every scalar as a string, while local
/// exports tend to use real numbers, so each field accepts either and keeps
/// the text form. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub nametype: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub recclass: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub mass: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub fall: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub reclat: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub reclong: Option<String>,
    #[serde(default)]
    pub geolocation: Option<RawGeolocation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGeolocation {
    #[serde(default, deserialize_with = "lenient_text")]
    pub latitude: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub longitude: Option<String>,
}

/// Accept strings, numbers and booleans as text; `null` becomes `None`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(value.and_then(json_to_text))
}

pub(crate) fn json_to_text(value: JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Record – one meteorite observation
// ---------------------------------------------------------------------------

/// Recorded coordinates of a fall or find.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// A single meteorite (one row of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: Option<String>,
    /// Opaque identifier, not guaranteed to be numeric.
    pub id: String,
    pub nametype: Option<String>,
    /// Composition classification, e.g. `L6` or `H5`.
    pub recclass: Option<String>,
    /// Mass in grams. `None` when unknown or unparseable.
    pub mass: Option<f64>,
    /// `Fell` or `Found`.
    pub fall: String,
    /// Date-like text; only the calendar year is meaningful.
    pub year: Option<String>,
    pub location: Option<Location>,
}

impl From<RawRecord> for Record {
    fn from(raw: RawRecord) -> Self {
        let location = parse_location(raw.reclat.as_deref(), raw.reclong.as_deref()).or_else(|| {
            raw.geolocation.as_ref().and_then(|geo| {
                parse_location(geo.latitude.as_deref(), geo.longitude.as_deref())
            })
        });

        Record {
            name: non_empty(raw.name),
            id: raw.id.unwrap_or_default(),
            nametype: non_empty(raw.nametype),
            recclass: non_empty(raw.recclass),
            mass: raw.mass.as_deref().and_then(parse_mass),
            fall: raw.fall.unwrap_or_default(),
            year: non_empty(raw.year),
            location,
        }
    }
}

impl Record {
    /// Calendar year taken from the first four characters of `year`.
    pub fn calendar_year(&self) -> Option<i32> {
        self.year.as_deref().and_then(parse_calendar_year)
    }
}

/// Parse a mass in grams. Empty, non-numeric and non-finite text is absent.
pub fn parse_mass(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|mass| mass.is_finite())
}

/// Parse the leading four characters of a date-like string as a year.
///
/// `"1880-01-01T00:00:00.000"` → `Some(1880)`; anything shorter or
/// non-numeric → `None`.
pub fn parse_calendar_year(text: &str) -> Option<i32> {
    text.trim().get(..4).and_then(|head| head.parse::<i32>().ok())
}

fn parse_location(lat: Option<&str>, lon: Option<&str>) -> Option<Location> {
    let latitude = lat?.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
    let longitude = lon?.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(Location {
        latitude,
        longitude,
    })
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|s| !s.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded record set
// ---------------------------------------------------------------------------

/// The full parsed dataset, in source order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<Record>,
}

/// Read-only handle shared between the application state and the views.
pub type SharedDataset = Arc<Dataset>;

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Dataset { records }
    }

    pub fn from_raw(raw: Vec<RawRecord>) -> Self {
        Self::from_records(raw.into_iter().map(Record::from).collect())
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use rstest::rstest;

    use super::*;

    /// Compact constructor for tests across the data layer.
    pub(crate) fn record(
        name: Option<&str>,
        recclass: Option<&str>,
        mass: Option<f64>,
        year: Option<&str>,
    ) -> Record {
        Record {
            name: name.map(str::to_string),
            id: "1".to_string(),
            nametype: Some("Valid".to_string()),
            recclass: recclass.map(str::to_string),
            mass,
            fall: "Fell".to_string(),
            year: year.map(str::to_string),
            location: None,
        }
    }

    #[rstest]
    #[case("21", Some(21.0))]
    #[case(" 107000 ", Some(107000.0))]
    #[case("0.15", Some(0.15))]
    #[case("", None)]
    #[case("unknown", None)]
    #[case("NaN", None)]
    #[case("inf", None)]
    fn parses_mass_leniently(#[case] text: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_mass(text), expected);
    }

    #[rstest]
    #[case("1880-01-01T00:00:00.000", Some(1880))]
    #[case("2000", Some(2000))]
    #[case("0860-01-01T00:00:00.000", Some(860))]
    #[case("199", None)]
    #[case("abcd-01-01", None)]
    #[case("", None)]
    fn extracts_calendar_year(#[case] text: &str, #[case] expected: Option<i32>) {
        assert_eq!(parse_calendar_year(text), expected);
    }

    #[test]
    fn converts_api_object_with_string_scalars() {
        let json = r#"{
            "name": "Aachen", "id": "1", "nametype": "Valid", "recclass": "L5",
            "mass": "21", "fall": "Fell", "year": "1880-01-01T00:00:00.000",
            "reclat": "50.775000", "reclong": "6.083330",
            "geolocation": {"latitude": "50.775", "longitude": "6.08333"}
        }"#;
        let raw: RawRecord = serde_json::from_str(json).unwrap();
        let rec = Record::from(raw);

        assert_eq!(rec.name.as_deref(), Some("Aachen"));
        assert_eq!(rec.id, "1");
        assert_eq!(rec.recclass.as_deref(), Some("L5"));
        assert_eq!(rec.mass, Some(21.0));
        assert_eq!(rec.fall, "Fell");
        assert_eq!(rec.calendar_year(), Some(1880));
        let loc = rec.location.unwrap();
        assert!((loc.latitude - 50.775).abs() < 1e-9);
        assert!((loc.longitude - 6.08333).abs() < 1e-9);
    }

    #[test]
    fn converts_numeric_scalars_and_missing_fields() {
        let json = r#"{"name": "Nowhere", "id": 42, "mass": 3.5, "extra": [1, 2]}"#;
        let raw: RawRecord = serde_json::from_str(json).unwrap();
        let rec = Record::from(raw);

        assert_eq!(rec.id, "42");
        assert_eq!(rec.mass, Some(3.5));
        assert_eq!(rec.recclass, None);
        assert_eq!(rec.year, None);
        assert_eq!(rec.fall, "");
        assert_eq!(rec.location, None);
    }

    #[test]
    fn falls_back_to_geolocation_when_reclat_missing() {
        let json = r#"{"name": "X", "geolocation": {"latitude": "-33.5", "longitude": 151.25}}"#;
        let rec = Record::from(serde_json::from_str::<RawRecord>(json).unwrap());
        assert_eq!(
            rec.location,
            Some(Location {
                latitude: -33.5,
                longitude: 151.25
            })
        );
    }

    #[test]
    fn blank_strings_become_absent() {
        let json = r#"{"name": "  ", "recclass": "", "mass": "", "year": null}"#;
        let rec = Record::from(serde_json::from_str::<RawRecord>(json).unwrap());
        assert_eq!(rec.name, None);
        assert_eq!(rec.recclass, None);
        assert_eq!(rec.mass, None);
        assert_eq!(rec.year, None);
    }
}
