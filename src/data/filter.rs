use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Filter parameters
// ---------------------------------------------------------------------------

/// How records with an unknown mass are treated by the mass bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MassBoundPolicy {
    /// Both bounds let unknown masses through only while `mass_min == 0`.
    #[default]
    KeyedOnMinimum,
    /// Each bound lets unknown masses through only while that bound is at
    /// its non-restrictive default (`0` for the minimum, `+∞` for the maximum).
    Independent,
}

/// One submission of the search form.
///
/// `None` (or an empty string) disables the corresponding clause.
/// `mass_min <= mass_max` is the caller's responsibility.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterParams {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub recclass: Option<String>,
    pub mass_min: f64,
    pub mass_max: f64,
    pub mass_policy: MassBoundPolicy,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            name: None,
            year: None,
            recclass: None,
            mass_min: 0.0,
            mass_max: f64::INFINITY,
            mass_policy: MassBoundPolicy::default(),
        }
    }
}

impl FilterParams {
    /// Whether a single record passes every active clause.
    pub fn matches(&self, record: &Record) -> bool {
        self.matches_name(record)
            && self.matches_recclass(record)
            && self.matches_mass_min(record)
            && self.matches_mass_max(record)
            && self.matches_year(record)
    }

    fn matches_name(&self, record: &Record) -> bool {
        match active(&self.name) {
            None => true,
            Some(needle) => record
                .name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&needle.to_lowercase())),
        }
    }

    fn matches_recclass(&self, record: &Record) -> bool {
        match active(&self.recclass) {
            None => true,
            Some(wanted) => record
                .recclass
                .as_deref()
                .is_some_and(|class| class.to_lowercase() == wanted.to_lowercase()),
        }
    }

    fn matches_mass_min(&self, record: &Record) -> bool {
        match record.mass {
            Some(mass) => mass >= self.mass_min,
            None => self.mass_min == 0.0,
        }
    }

    fn matches_mass_max(&self, record: &Record) -> bool {
        match record.mass {
            Some(mass) => mass <= self.mass_max,
            None => match self.mass_policy {
                MassBoundPolicy::KeyedOnMinimum => self.mass_min == 0.0,
                MassBoundPolicy::Independent => self.mass_max == f64::INFINITY,
            },
        }
    }

    fn matches_year(&self, record: &Record) -> bool {
        match self.year {
            None => true,
            Some(year) => record.calendar_year() == Some(year),
        }
    }
}

fn active(text: &Option<String>) -> Option<&str> {
    text.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return the records that pass all active filters, in source order.
pub fn filter<'a>(dataset: &'a Dataset, params: &FilterParams) -> Vec<&'a Record> {
    dataset.iter().filter(|rec| params.matches(rec)).collect()
}
