//! Verse configuration

use serde::{Deserialize, Serialize};

/// Configuration for a [`Verse`](crate::Verse)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerseConfig {
    /// Name used in logs and diagnostics; generated from the verse identity
    /// when absent
    pub name: Option<String>,
    /// Number of associations to reserve room for up front
    pub initial_capacity: usize,
}

impl VerseConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With verse name
    #[inline]
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// With initial association capacity
    #[inline]
    #[must_use]
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}
