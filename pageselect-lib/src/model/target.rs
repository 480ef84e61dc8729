//! Selection target

/// The user's desired total selection size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionTarget {
    /// Desired number of selected rows.
    pub count: usize,
    /// `true` while the target is not yet satisfied and more pages may help.
    pub auto_fill_pending: bool,
}

impl SelectionTarget {
    /// Creates a target from user input, clamping negative counts to zero.
    pub fn from_input(n: i64) -> Self {
        Self {
            count: usize::try_from(n).unwrap_or(0),
            auto_fill_pending: false,
        }
    }

    /// Returns how many more rows are needed given `selected` rows.
    pub fn remaining(&self, selected: usize) -> usize {
        self.count.saturating_sub(selected)
    }

    /// Returns `true` if `selected` rows satisfy the target.
    pub fn is_met(&self, selected: usize) -> bool {
        selected >= self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_input_clamps() {
        assert_eq!(SelectionTarget::from_input(-4).count, 0);
        assert_eq!(SelectionTarget::from_input(20).count, 20);
    }

    #[test]
    fn test_remaining() {
        let target = SelectionTarget::from_input(20);
        assert_eq!(target.remaining(12), 8);
        assert_eq!(target.remaining(25), 0);
        assert!(target.is_met(20));
        assert!(!target.is_met(19));
    }
}
