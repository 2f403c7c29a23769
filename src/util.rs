use unicode_display_width::width as display_width;

/// Clamps `value` into `[low, high]`, checking `low` first.
///
/// Unlike [`Ord::clamp`] this does not panic when `low > high`; the result is
/// then `high`, which is what viewport arithmetic on empty lists needs.
pub fn clamp(low: i64, high: i64, value: i64) -> i64 {
    if value < low {
        return low.min(high);
    }
    value.min(high)
}

/// Terminal cell width of `text`
pub fn str_width(text: &str) -> usize {
    display_width(text) as usize
}
