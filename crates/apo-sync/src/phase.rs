//! Loading phases of a resource binding.

/// Where a binding is in its loading lifecycle.
///
/// `Loading` is reserved for the very first fetch; subsequent refreshes run
/// as `Updating` so screens keep rendering the data they already have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// Bound but not yet fetching (the caller opted out of auto-load).
    Idle,
    /// First fetch in flight; no data has ever been published.
    Loading,
    /// Background refresh in flight; last-good data is still shown.
    Updating,
    /// A response has been published.
    Ready,
    /// The first fetch failed; data is still the caller-supplied initial
    /// value.
    Error,
}

impl LoadPhase {
    /// Whether a fetch is currently in flight.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Loading | Self::Updating)
    }

    /// Whether the binding has reached a terminal phase for its current
    /// trigger.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Ready | Self::Error)
    }

    /// The wire/display name of the phase.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Updating => "updating",
            Self::Ready => "ready",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for LoadPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
