//! Platform-specific terminal integrations.

#[cfg(unix)]
pub mod terminal_mode;

#[cfg(unix)]
pub use terminal_mode::{
    apply_profile, get_termios, set_raw, set_standard, ModeProfile, TermField, TermFlag,
    TerminalModeGuard,
};
