//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so release
//! builds remain quiet. Every read site is additionally gated by `cfg(debug_assertions)`.

pub struct DebugFlags {
    /// Emit UI interaction logs (e.g., navigation, toggles, manual actions).
    pub print_ui_interactions: bool,
    /// Emit one line per outgoing REST request and its outcome.
    pub print_requests: bool,
    /// Emit a line every time the backtest result poller fires.
    pub print_poll_ticks: bool,
    /// Emit details of UI state serialization/deserialization.
    pub print_state_serde: bool,
    /// Emit shutdown app messages.
    pub print_shutdown: bool,
}

pub const DEBUG_FLAGS: DebugFlags = DebugFlags {
    print_ui_interactions: true,
    print_requests: false,
    print_poll_ticks: false,
    print_state_serde: false,
    print_shutdown: false,
};
