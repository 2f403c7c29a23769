/// Orientation of the list relative to the query field
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuiLayout {
    /// Query on top, first match right below it
    #[default]
    Forward,
    /// Query at the bottom, first match right above it
    Reverse,
}

impl TuiLayout {
    /// Layout matching the `reverse` flag
    pub fn from_reverse(reverse: bool) -> Self {
        if reverse { Self::Reverse } else { Self::Forward }
    }

    /// Whether index 0 is drawn at the bottom
    pub fn is_reverse(self) -> bool {
        self == Self::Reverse
    }
}
