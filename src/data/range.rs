// ---------------------------------------------------------------------------
// Dual-handle range selector
// ---------------------------------------------------------------------------

/// Which of the two handles is drawn above the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stacking {
    LowOnTop,
    /// Keeps the high handle grabbable when both sit at the minimum.
    HighOnTop,
}

/// Highlighted portion of the track, as fractions of its length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillSpan {
    pub start: f32,
    pub end: f32,
}

/// State behind the mass-range widget: a slider and a text box per handle.
///
/// Edits that would cross the handles are corrected on the side being
/// edited, so `lo <= hi` holds after every call.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeSelector {
    min: i64,
    max: i64,
    lo: i64,
    hi: i64,
    /// Contents of the precise low input.
    pub lo_text: String,
    /// Contents of the precise high input.
    pub hi_text: String,
    fill: FillSpan,
    stacking: Stacking,
}

impl RangeSelector {
    /// A selector spanning `[min, max]` with both handles at the extremes.
    /// Reversed bounds are swapped.
    pub fn new(min: i64, max: i64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let mut selector = Self {
            min,
            max,
            lo: min,
            hi: max,
            lo_text: String::new(),
            hi_text: String::new(),
            fill: FillSpan { start: 0.0, end: 0.0 },
            stacking: Stacking::LowOnTop,
        };
        selector.refresh();
        selector
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn lo(&self) -> i64 {
        self.lo
    }

    pub fn hi(&self) -> i64 {
        self.hi
    }

    pub fn fill(&self) -> FillSpan {
        self.fill
    }

    pub fn stacking(&self) -> Stacking {
        self.stacking
    }

    /// Move the low handle. Values above `hi` snap to `hi`.
    pub fn on_low_changed(&mut self, new_lo: i64) {
        let new_lo = self.clamp(new_lo);
        self.lo = new_lo.min(self.hi);
        self.refresh();
    }

    /// Move the high handle. Values below `lo` snap to `lo`.
    pub fn on_high_changed(&mut self, new_hi: i64) {
        let new_hi = self.clamp(new_hi);
        self.hi = new_hi.max(self.lo);
        self.refresh();
    }

    /// Apply whatever is typed into the low input.
    pub fn on_low_input(&mut self, text: &str) {
        let value = parse_truncated(text).unwrap_or(self.min);
        self.on_low_changed(value);
    }

    /// Apply whatever is typed into the high input.
    pub fn on_high_input(&mut self, text: &str) {
        let value = parse_truncated(text).unwrap_or(self.min);
        self.on_high_changed(value);
    }

    /// Apply both text inputs, low first, as a form submission does.
    pub fn apply_text_inputs(&mut self) {
        let (lo_text, hi_text) = (self.lo_text.clone(), self.hi_text.clone());
        self.on_low_input(&lo_text);
        self.on_high_input(&hi_text);
    }

    /// Put both handles back at the extremes.
    pub fn reset(&mut self) {
        self.lo = self.min;
        self.hi = self.max;
        self.refresh();
    }

    /// Current bounds for the mass filter. A high handle parked at the
    /// maximum means "no upper limit".
    pub fn mass_bounds(&self) -> (f64, f64) {
        let upper = if self.hi >= self.max {
            f64::INFINITY
        } else {
            self.hi as f64
        };
        (self.lo as f64, upper)
    }

    fn clamp(&self, value: i64) -> i64 {
        value.clamp(self.min, self.max)
    }

    fn refresh(&mut self) {
        self.lo_text = self.lo.to_string();
        self.hi_text = self.hi.to_string();

        let distance = (self.max - self.min) as f64;
        self.fill = if distance <= 0.0 {
            FillSpan { start: 0.0, end: 0.0 }
        } else {
            FillSpan {
                start: ((self.lo - self.min) as f64 / distance) as f32,
                end: ((self.hi - self.min) as f64 / distance) as f32,
            }
        };

        self.stacking = if self.hi <= 0 {
            Stacking::HighOnTop
        } else {
            Stacking::LowOnTop
        };
    }
}

/// Parse the leading integer of `text`, truncating any fraction or suffix.
///
/// `"12.9"` → 12, `"  -4kg"` → -4, `"kg"` → `None`. Overflow saturates.
pub fn parse_truncated(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let digit_count = digits.bytes().take_while(u8::is_ascii_digit).count();
    if digit_count == 0 {
        return None;
    }

    let magnitude = digits[..digit_count]
        .parse::<i64>()
        .unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[test]
    fn starts_at_extremes() {
        let sel = RangeSelector::new(0, 1000);
        assert_eq!((sel.lo(), sel.hi()), (0, 1000));
        assert_eq!(sel.lo_text, "0");
        assert_eq!(sel.hi_text, "1000");
        assert_eq!(sel.fill(), FillSpan { start: 0.0, end: 1.0 });
        assert_eq!(sel.stacking(), Stacking::LowOnTop);
        assert_eq!(sel.mass_bounds(), (0.0, f64::INFINITY));
    }

    #[test]
    fn low_above_high_snaps_to_high() {
        let mut sel = RangeSelector::new(0, 1000);
        sel.on_high_changed(400);
        sel.on_low_changed(700);
        assert_eq!((sel.lo(), sel.hi()), (400, 400));
        assert_eq!(sel.lo_text, "400");
    }

    #[test]
    fn high_below_low_snaps_to_low() {
        let mut sel = RangeSelector::new(0, 1000);
        sel.on_low_changed(300);
        sel.on_high_changed(100);
        assert_eq!((sel.lo(), sel.hi()), (300, 300));
        assert_eq!(sel.hi_text, "300");
        assert_eq!(sel.mass_bounds(), (300.0, 300.0));
    }

    #[test]
    fn fill_tracks_handles() {
        let mut sel = RangeSelector::new(0, 200);
        sel.on_low_changed(50);
        sel.on_high_changed(150);
        assert_eq!(sel.fill(), FillSpan { start: 0.25, end: 0.75 });
    }

    #[test]
    fn zero_width_track_has_empty_fill() {
        let sel = RangeSelector::new(5, 5);
        assert_eq!(sel.fill(), FillSpan { start: 0.0, end: 0.0 });
    }

    #[test]
    fn high_handle_on_top_at_zero() {
        let mut sel = RangeSelector::new(0, 100);
        sel.on_high_changed(0);
        assert_eq!(sel.stacking(), Stacking::HighOnTop);
        sel.on_high_changed(1);
        assert_eq!(sel.stacking(), Stacking::LowOnTop);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let mut sel = RangeSelector::new(0, 100);
        sel.on_high_changed(5_000);
        assert_eq!(sel.hi(), 100);
        sel.on_low_changed(-20);
        assert_eq!(sel.lo(), 0);
    }

    #[test]
    fn text_input_falls_back_to_minimum() {
        let mut sel = RangeSelector::new(10, 100);
        sel.on_low_input("50");
        assert_eq!(sel.lo(), 50);
        sel.on_low_input("heavy");
        assert_eq!(sel.lo(), 10);
        sel.on_high_input("");
        assert_eq!(sel.hi(), 10);
        sel.on_high_input("75.8");
        assert_eq!(sel.hi(), 75);
        assert_eq!(sel.mass_bounds(), (10.0, 75.0));
    }

    #[test]
    fn pending_text_is_applied_in_order() {
        let mut sel = RangeSelector::new(0, 1000);
        sel.lo_text = "500".into();
        sel.hi_text = "100".into();
        sel.apply_text_inputs();
        assert_eq!((sel.lo(), sel.hi()), (500, 500));
        assert_eq!(sel.hi_text, "500");
    }

    #[test]
    fn reset_restores_extremes() {
        let mut sel = RangeSelector::new(0, 100);
        sel.on_low_changed(30);
        sel.on_high_changed(60);
        sel.reset();
        assert_eq!(sel, RangeSelector::new(0, 100));
    }

    #[rstest]
    #[case("12", Some(12))]
    #[case("12.9", Some(12))]
    #[case("  40kg", Some(40))]
    #[case("-7", Some(-7))]
    #[case("+3", Some(3))]
    #[case("", None)]
    #[case("-", None)]
    #[case("abc", None)]
    #[case("99999999999999999999999", Some(i64::MAX))]
    fn truncating_parse(#[case] text: &str, #[case] expected: Option<i64>) {
        assert_eq!(parse_truncated(text), expected);
    }

    #[derive(Debug, Clone)]
    enum Edit {
        Low(i64),
        High(i64),
        LowText(String),
        HighText(String),
    }

    fn arb_edit() -> impl Strategy<Value = Edit> {
        prop_oneof![
            (-500i64..1500).prop_map(Edit::Low),
            (-500i64..1500).prop_map(Edit::High),
            "[-0-9a-z.]{0,6}".prop_map(Edit::LowText),
            "[-0-9a-z.]{0,6}".prop_map(Edit::HighText),
        ]
    }

    proptest! {
        #[test]
        fn handles_never_cross(edits in proptest::collection::vec(arb_edit(), 0..30)) {
            let mut sel = RangeSelector::new(0, 1000);
            for edit in edits {
                match edit {
                    Edit::Low(v) => sel.on_low_changed(v),
                    Edit::High(v) => sel.on_high_changed(v),
                    Edit::LowText(t) => sel.on_low_input(&t),
                    Edit::HighText(t) => sel.on_high_input(&t),
                }
                prop_assert!(sel.lo() <= sel.hi());
                prop_assert!(sel.min() <= sel.lo() && sel.hi() <= sel.max());
                let fill = sel.fill();
                prop_assert!(fill.start <= fill.end);
            }
        }
    }
}
