//! Hierarchical account masks like `7.1.2.3.1.04.01`, as they appear in chart-of-accounts exports.
//!
//! Exports print a mask once and leave it blank on the detail rows below it, so masks need to be
//! rebuilt before rows can be classified and compared across groups.

/// The two chart-of-accounts groups that are reconciled against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Group {
    /// Debit controls, tracked by their debit leg.
    Seven,
    /// Credit controls, tracked by their credit leg.
    Eight,
}

impl Group {
    /// Return the group `mask` belongs to, judged by its leading digit only.
    ///
    /// Masks of any other group yield `None`, which excludes their rows.
    pub fn of(mask: &str) -> Option<Self> {
        match mask.as_bytes().first()? {
            b'7' => Some(Group::Seven),
            b'8' => Some(Group::Eight),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Seven => "7",
            Group::Eight => "8",
        }
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Forward-fill `cells`, yielding the mask that is in effect for each row in order.
///
/// A present, non-blank cell becomes the new mask (trimmed), every other row inherits the previous one.
/// Rows before the first mask yield `None`.
pub fn reconstruct<S: AsRef<str>>(
    cells: impl IntoIterator<Item = Option<S>>,
) -> impl Iterator<Item = Option<String>> {
    cells.into_iter().scan(None::<String>, |last, cell| {
        if let Some(mask) = cell.as_ref().map(|c| c.as_ref().trim()).filter(|m| !m.is_empty()) {
            *last = Some(mask.to_owned());
        }
        Some(last.clone())
    })
}

/// Strip the group from `mask` and keep at most `depth` of the segments that follow,
/// so that `7.1.2.3` and `8.1.2.3` both become `1.2.3`.
///
/// A mask without children normalizes to the empty string.
pub fn normalize(mask: &str, depth: usize) -> String {
    mask.split('.').skip(1).take(depth).collect::<Vec<_>>().join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_is_judged_by_the_first_character() {
        assert_eq!(Group::of("7.1.2"), Some(Group::Seven));
        assert_eq!(Group::of("8"), Some(Group::Eight));
        assert_eq!(Group::of("9.1.2"), None);
        assert_eq!(Group::of("17.1"), None);
        assert_eq!(Group::of(""), None);
    }

    #[test]
    fn normalize_keeps_trailing_empty_segments() {
        assert_eq!(normalize("7.1.", 5), "1.");
        assert_eq!(normalize("", 5), "");
        assert_eq!(normalize("8.1.2", 0), "");
    }
}
