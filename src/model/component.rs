//! Third-party components found by composition analysis.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A component discovered by software composition analysis.
///
/// Identity is the component name: equality and hashing ignore the flags,
/// so collecting into a set de-duplicates by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaComponent {
    name: String,
    #[serde(default)]
    blacklisted: bool,
    #[serde(default)]
    is_new: bool,
    #[serde(default)]
    violates_policy: bool,
}

impl ScaComponent {
    pub fn new(
        name: impl Into<String>,
        blacklisted: bool,
        is_new: bool,
        violates_policy: bool,
    ) -> Self {
        Self {
            name: name.into(),
            blacklisted,
            is_new,
            violates_policy,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn is_blacklisted(&self) -> bool {
        self.blacklisted
    }

    /// Whether the component first appeared in this build.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.is_new
    }

    #[must_use]
    pub const fn violates_policy(&self) -> bool {
        self.violates_policy
    }

    /// Copy of this component with the new-since-last-build flag replaced.
    #[must_use]
    pub fn with_new_flag(&self, is_new: bool) -> Self {
        Self {
            is_new,
            ..self.clone()
        }
    }
}

impl PartialEq for ScaComponent {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ScaComponent {}

impl Hash for ScaComponent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}
