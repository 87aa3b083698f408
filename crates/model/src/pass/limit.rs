use std::{fmt, num::NonZeroUsize};

/// Per-source cap on the records handled in one pass.
///
/// A disabled source never fetches; its windows still advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchLimit {
    Disabled,
    Max(NonZeroUsize),
}

impl BatchLimit {
    /// `None` for zero. Disabling a source has to be spelled out.
    pub fn max(count: usize) -> Option<Self> {
        NonZeroUsize::new(count).map(BatchLimit::Max)
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, BatchLimit::Max(_))
    }

    pub fn get(&self) -> Option<NonZeroUsize> {
        match self {
            BatchLimit::Max(count) => Some(*count),
            BatchLimit::Disabled => None,
        }
    }
}

impl fmt::Display for BatchLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchLimit::Max(count) => write!(f, "{count}"),
            BatchLimit::Disabled => f.write_str("disabled"),
        }
    }
}
