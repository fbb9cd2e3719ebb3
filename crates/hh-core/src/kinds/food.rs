//! Food: items that restore HP when eaten.

/// Something a character can eat to recover HP.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Food {
    /// HP restored when eaten.
    pub restores: i32,
}
