use super::model::Record;

/// Column headers, in display order.
pub const COLUMNS: [&str; 9] = [
    "Name",
    "ID",
    "Name type",
    "Class",
    "Mass (g)",
    "Fall",
    "Year",
    "Latitude",
    "Longitude",
];

/// Display strings for one record. Absent values render as `""`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub name: String,
    pub id: String,
    pub nametype: String,
    pub recclass: String,
    pub mass: String,
    pub fall: String,
    pub year: String,
    pub latitude: String,
    pub longitude: String,
}

impl TableRow {
    pub fn from_record(record: &Record) -> Self {
        let (latitude, longitude) = match record.location {
            Some(loc) => (
                format!("{:.3}", loc.latitude),
                format!("{:.3}", loc.longitude),
            ),
            None => (String::new(), String::new()),
        };

        TableRow {
            name: record.name.clone().unwrap_or_default(),
            id: record.id.clone(),
            nametype: record.nametype.clone().unwrap_or_default(),
            recclass: record.recclass.clone().unwrap_or_default(),
            mass: record.mass.map(format_mass).unwrap_or_default(),
            fall: record.fall.clone(),
            year: record
                .calendar_year()
                .map(|y| y.to_string())
                .unwrap_or_default(),
            latitude,
            longitude,
        }
    }

    /// Cells in [`COLUMNS`] order.
    pub fn cells(&self) -> [&str; 9] {
        [
            &self.name,
            &self.id,
            &self.nametype,
            &self.recclass,
            &self.mass,
            &self.fall,
            &self.year,
            &self.latitude,
            &self.longitude,
        ]
    }
}

/// Up to two decimals, without trailing zeros: `21`, `0.15`, `1914.5`.
fn format_mass(mass: f64) -> String {
    let text = format!("{mass:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    text.to_string()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::data::model::{Location, RawRecord};

    #[test]
    fn renders_full_record() {
        let json = r#"{
            "name": "Aachen", "id": "1", "nametype": "Valid", "recclass": "L5",
            "mass": "21", "fall": "Fell", "year": "1880-01-01T00:00:00.000",
            "reclat": "50.775000", "reclong": "6.083330"
        }"#;
        let rec = Record::from(serde_json::from_str::<RawRecord>(json).unwrap());
        let row = TableRow::from_record(&rec);
        assert_eq!(
            row.cells(),
            ["Aachen", "1", "Valid", "L5", "21", "Fell", "1880", "50.775", "6.083"]
        );
    }

    #[test]
    fn absent_values_are_blank() {
        let rec = Record::from(RawRecord::default());
        let row = TableRow::from_record(&rec);
        assert!(row.cells().iter().all(|cell| cell.is_empty()));
    }

    #[test]
    fn coordinates_round_to_three_places() {
        let mut rec = Record::from(RawRecord::default());
        rec.location = Some(Location {
            latitude: -84.0001,
            longitude: 168.38456,
        });
        let row = TableRow::from_record(&rec);
        assert_eq!(row.latitude, "-84.000");
        assert_eq!(row.longitude, "168.385");
    }

    #[rstest]
    #[case(21.0, "21")]
    #[case(0.15, "0.15")]
    #[case(1914.5, "1914.5")]
    #[case(107000.0, "107000")]
    #[case(2.456, "2.46")]
    fn mass_formatting(#[case] mass: f64, #[case] expected: &str) {
        assert_eq!(format_mass(mass), expected);
    }
}
