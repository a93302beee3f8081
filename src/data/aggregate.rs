use std::collections::BTreeMap;

use super::model::Record;

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

/// Headline numbers shown above the table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryMetrics {
    pub total_count: usize,
    /// Mean of known masses in grams, rounded to two decimals.
    pub average_mass: f64,
}

impl SummaryMetrics {
    pub fn total_count_text(&self) -> String {
        self.total_count.to_string()
    }

    pub fn average_mass_text(&self) -> String {
        format!("{:.2}", self.average_mass)
    }
}

/// Compute both summary scalars for a record set.
pub fn summarize<'a, I>(records: I) -> SummaryMetrics
where
    I: IntoIterator<Item = &'a Record>,
    I::IntoIter: Clone,
{
    let iter = records.into_iter();
    SummaryMetrics {
        total_count: total_strikes(iter.clone()),
        average_mass: average_mass(iter),
    }
}

/// Number of records.
pub fn total_strikes<'a, I>(records: I) -> usize
where
    I: IntoIterator<Item = &'a Record>,
{
    records.into_iter().count()
}

/// Arithmetic mean of the known, non-zero masses, rounded to two decimals.
///
/// Returns exactly `0.0` when no record has a usable mass.
pub fn average_mass<'a, I>(records: I) -> f64
where
    I: IntoIterator<Item = &'a Record>,
{
    let (sum, count) = records
        .into_iter()
        .filter_map(|rec| rec.mass)
        .filter(|mass| mass.is_finite() && *mass != 0.0)
        .fold((0.0f64, 0usize), |(sum, count), mass| (sum + mass, count + 1));

    if count == 0 {
        return 0.0;
    }
    round_to_cents(sum / count as f64)
}

/// `f64::round` rounds half away from zero, which is the rule we want.
fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Year histogram
// ---------------------------------------------------------------------------

/// A contiguous span of calendar years `[range_start, range_end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearBin {
    pub range_start: i32,
    pub range_end: i32,
    pub count: usize,
}

impl YearBin {
    pub fn width(&self) -> i32 {
        self.range_end - self.range_start
    }

    pub fn label(&self) -> String {
        if self.width() == 1 {
            self.range_start.to_string()
        } else {
            format!("{}–{}", self.range_start, self.range_end - 1)
        }
    }
}

/// Strikes-per-year histogram.
///
/// The single-bin case is its own variant because the chart stretches that
/// bin across the full width instead of dividing by the bin count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearHistogram {
    Empty,
    Single(YearBin),
    Binned(Vec<YearBin>),
}

impl YearHistogram {
    pub fn bins(&self) -> &[YearBin] {
        match self {
            YearHistogram::Empty => &[],
            YearHistogram::Single(bin) => std::slice::from_ref(bin),
            YearHistogram::Binned(bins) => bins,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, YearHistogram::Empty)
    }

    /// Total number of records that landed in a bin.
    pub fn total(&self) -> usize {
        self.bins().iter().map(|b| b.count).sum()
    }

    /// Width of one bar when the bins share `plot_width` evenly.
    pub fn bar_width(&self, plot_width: f64) -> f64 {
        match self {
            YearHistogram::Empty => 0.0,
            YearHistogram::Single(_) => plot_width,
            YearHistogram::Binned(bins) => plot_width / bins.len() as f64,
        }
    }
}

/// Bucket records by calendar year using Sturges' rule.
///
/// `k = ceil(log2 n) + 1` bins of equal integer width cover
/// `[min_year, max_year]`. Records without a usable year are skipped.
pub fn histogram_by_year<'a, I>(records: I) -> YearHistogram
where
    I: IntoIterator<Item = &'a Record>,
{
    let years: Vec<i32> = records
        .into_iter()
        .filter_map(Record::calendar_year)
        .collect();

    let (Some(&min), Some(&max)) = (years.iter().min(), years.iter().max()) else {
        return YearHistogram::Empty;
    };

    if min == max {
        return YearHistogram::Single(YearBin {
            range_start: min,
            range_end: min + 1,
            count: years.len(),
        });
    }

    let bin_count = sturges_bin_count(years.len());
    let span = i64::from(max) - i64::from(min) + 1;
    let width = (span + bin_count as i64 - 1) / bin_count as i64;
    let width = width.max(1) as i32;

    let mut bins = Vec::with_capacity(bin_count);
    let mut start = min;
    while start <= max {
        bins.push(YearBin {
            range_start: start,
            range_end: start + width,
            count: 0,
        });
        start += width;
    }

    for year in years {
        let slot = ((year - min) / width) as usize;
        bins[slot].count += 1;
    }

    YearHistogram::Binned(bins)
}

fn sturges_bin_count(n: usize) -> usize {
    (n as f64).log2().ceil() as usize + 1
}

// ---------------------------------------------------------------------------
// Composition histogram
// ---------------------------------------------------------------------------

/// Number of strikes for one composition class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBin {
    pub category: String,
    pub count: usize,
}

/// Count strikes per exact `recclass` string, sorted by class ascending.
///
/// Grouping is case-sensitive: `L6` and `l6` are separate bins.
pub fn histogram_by_composition<'a, I>(records: I) -> Vec<CategoryBin>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for class in records.into_iter().filter_map(|r| r.recclass.as_deref()) {
        *counts.entry(class).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(category, count)| CategoryBin {
            category: category.to_string(),
            count,
        })
        .collect()
}

/// Like [`histogram_by_composition`] but merges classes that differ only in
/// case. Each bin is labelled with the first spelling encountered and the
/// bins are ordered by their lowercase key.
pub fn histogram_by_composition_folded<'a, I>(records: I) -> Vec<CategoryBin>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut counts: BTreeMap<String, CategoryBin> = BTreeMap::new();
    for class in records.into_iter().filter_map(|r| r.recclass.as_deref()) {
        counts
            .entry(class.to_lowercase())
            .or_insert_with(|| CategoryBin {
                category: class.to_string(),
                count: 0,
            })
            .count += 1;
    }
    counts.into_values().collect()
}
