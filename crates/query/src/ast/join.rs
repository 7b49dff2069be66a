//! Join types.

use core::fmt;

/// Join type carried by join plan nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
    /// Joins each left row with the most recent matching right row.
    Last,
    /// Positional concatenation of two row streams of equal length.
    Concat,
}

impl JoinType {
    /// Returns true when unmatched left rows are emitted, padding right columns with nulls.
    ///
    /// `Last` keeps every left row whether or not a right row matches.
    pub fn preserves_left(&self) -> bool {
        matches!(self, JoinType::Left | JoinType::Full | JoinType::Last)
    }

    /// Returns true when unmatched right rows are emitted, padding left columns with nulls.
    pub fn preserves_right(&self) -> bool {
        matches!(self, JoinType::Right | JoinType::Full)
    }

    /// Returns the display name.
    pub fn name(&self) -> &'static str {
        match self {
            JoinType::Inner => "InnerJoin",
            JoinType::Left => "LeftJoin",
            JoinType::Right => "RightJoin",
            JoinType::Full => "FullJoin",
            JoinType::Cross => "CrossJoin",
            JoinType::Last => "LastJoin",
            JoinType::Concat => "ConcatJoin",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outer_sides() {
        assert!(JoinType::Left.preserves_left());
        assert!(!JoinType::Left.preserves_right());
        assert!(JoinType::Full.preserves_left() && JoinType::Full.preserves_right());
        assert!(JoinType::Last.preserves_left());
        assert!(!JoinType::Last.preserves_right());
        assert!(!JoinType::Concat.preserves_left() && !JoinType::Concat.preserves_right());
    }
}
