//! Line-discipline control for terminal descriptors.
//!
//! Modes are expressed as [`ModeProfile`]s: a list of [`TermFlag`]s to clear followed by a
//! list to set. Applying a profile reads the current attributes, edits only those flags
//! and writes them back with `TCSANOW` (no drain of pending output).

use std::os::fd::RawFd;

use libc::{self, c_int, tcflag_t};

use crate::error::{Result, SessionSyncError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermField {
    Input,
    Output,
    Control,
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermFlag {
    /// `IGNBRK`
    IgnoreBreak,
    /// `BRKINT`
    BreakInterrupt,
    /// `PARMRK`
    MarkParityErrors,
    /// `ISTRIP`
    StripEighthBit,
    /// `INLCR`
    MapNlToCr,
    /// `IGNCR`
    IgnoreCr,
    /// `ICRNL`
    MapCrToNl,
    /// `IXON`
    FlowControl,
    /// `OPOST`
    PostProcessOutput,
    /// `CSIZE` (the whole character-size field)
    CharSizeMask,
    /// `CS8`
    EightBitChars,
    /// `PARENB`
    ParityEnable,
    /// `ECHO`
    Echo,
    /// `ECHONL`
    EchoNl,
    /// `ICANON`
    Canonical,
    /// `ISIG`
    Signals,
    /// `IEXTEN`
    ExtendedInput,
}

impl TermFlag {
    #[must_use]
    pub fn field(self) -> TermField {
        match self {
            Self::IgnoreBreak
            | Self::BreakInterrupt
            | Self::MarkParityErrors
            | Self::StripEighthBit
            | Self::MapNlToCr
            | Self::IgnoreCr
            | Self::MapCrToNl
            | Self::FlowControl => TermField::Input,
            Self::PostProcessOutput => TermField::Output,
            Self::CharSizeMask | Self::EightBitChars | Self::ParityEnable => TermField::Control,
            Self::Echo
            | Self::EchoNl
            | Self::Canonical
            | Self::Signals
            | Self::ExtendedInput => TermField::Local,
        }
    }

    #[must_use]
    pub fn bits(self) -> tcflag_t {
        match self {
            Self::IgnoreBreak => libc::IGNBRK,
            Self::BreakInterrupt => libc::BRKINT,
            Self::MarkParityErrors => libc::PARMRK,
            Self::StripEighthBit => libc::ISTRIP,
            Self::MapNlToCr => libc::INLCR,
            Self::IgnoreCr => libc::IGNCR,
            Self::MapCrToNl => libc::ICRNL,
            Self::FlowControl => libc::IXON,
            Self::PostProcessOutput => libc::OPOST,
            Self::CharSizeMask => libc::CSIZE,
            Self::EightBitChars => libc::CS8,
            Self::ParityEnable => libc::PARENB,
            Self::Echo => libc::ECHO,
            Self::EchoNl => libc::ECHONL,
            Self::Canonical => libc::ICANON,
            Self::Signals => libc::ISIG,
            Self::ExtendedInput => libc::IEXTEN,
        }
    }

    fn slot(self, termios: &mut libc::termios) -> &mut tcflag_t {
        match self.field() {
            TermField::Input => &mut termios.c_iflag,
            TermField::Output => &mut termios.c_oflag,
            TermField::Control => &mut termios.c_cflag,
            TermField::Local => &mut termios.c_lflag,
        }
    }

    pub fn clear(self, termios: &mut libc::termios) {
        *self.slot(termios) &= !self.bits();
    }

    pub fn set(self, termios: &mut libc::termios) {
        *self.slot(termios) |= self.bits();
    }

    #[must_use]
    pub fn is_set(self, termios: &libc::termios) -> bool {
        let value = match self.field() {
            TermField::Input => termios.c_iflag,
            TermField::Output => termios.c_oflag,
            TermField::Control => termios.c_cflag,
            TermField::Local => termios.c_lflag,
        };
        value & self.bits() == self.bits()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeProfile {
    pub clear: &'static [TermFlag],
    pub set: &'static [TermFlag],
}

impl ModeProfile {
    /// Unbuffered, unechoed, 8-bit clean; control characters arrive as plain bytes.
    pub const RAW: Self = Self {
        clear: &[
            TermFlag::IgnoreBreak,
            TermFlag::BreakInterrupt,
            TermFlag::MarkParityErrors,
            TermFlag::StripEighthBit,
            TermFlag::MapNlToCr,
            TermFlag::IgnoreCr,
            TermFlag::MapCrToNl,
            TermFlag::FlowControl,
            TermFlag::PostProcessOutput,
            TermFlag::CharSizeMask,
            TermFlag::ParityEnable,
            TermFlag::Echo,
            TermFlag::EchoNl,
            TermFlag::Canonical,
            TermFlag::Signals,
            TermFlag::ExtendedInput,
        ],
        set: &[TermFlag::EightBitChars],
    };

    pub const STANDARD_ECHO: Self = Self {
        clear: &[
            TermFlag::MapNlToCr,
            TermFlag::MapCrToNl,
            TermFlag::IgnoreCr,
            TermFlag::PostProcessOutput,
        ],
        set: &[
            TermFlag::Canonical,
            TermFlag::Signals,
            TermFlag::ExtendedInput,
            TermFlag::Echo,
        ],
    };

    pub const STANDARD_NO_ECHO: Self = Self {
        clear: &[
            TermFlag::MapNlToCr,
            TermFlag::MapCrToNl,
            TermFlag::IgnoreCr,
            TermFlag::PostProcessOutput,
            TermFlag::Echo,
        ],
        set: &[
            TermFlag::Canonical,
            TermFlag::Signals,
            TermFlag::ExtendedInput,
        ],
    };

    #[must_use]
    pub fn standard(echo: bool) -> Self {
        if echo {
            Self::STANDARD_ECHO
        } else {
            Self::STANDARD_NO_ECHO
        }
    }

    /// Clears first, then sets, so a mask such as `CSIZE` can be replaced by `CS8`.
    pub fn apply(&self, termios: &mut libc::termios) {
        for flag in self.clear {
            flag.clear(termios);
        }
        for flag in self.set {
            flag.set(termios);
        }
    }
}

/// Switches `fd` to raw mode.
pub fn set_raw(fd: RawFd) -> Result<()> {
    apply_profile(fd, &ModeProfile::RAW)
}

/// Switches `fd` back to canonical input with the standard translations suppressed,
/// echoing input only when `echo` is true.
pub fn set_standard(fd: RawFd, echo: bool) -> Result<()> {
    apply_profile(fd, &ModeProfile::standard(echo))
}

pub fn apply_profile(fd: RawFd, profile: &ModeProfile) -> Result<()> {
    let mut termios = get_termios(fd)?;
    profile.apply(&mut termios);
    set_termios(fd, &termios)?;
    log::trace!("applied terminal profile {profile:?} to fd {fd}");
    Ok(())
}

/// Snapshot of a descriptor's attributes, written back on [`restore`](Self::restore)
/// or drop.
pub struct TerminalModeGuard {
    fd: RawFd,
    original: Option<libc::termios>,
}

impl TerminalModeGuard {
    pub fn capture(fd: RawFd) -> Result<Self> {
        Ok(Self {
            fd,
            original: Some(get_termios(fd)?),
        })
    }

    #[must_use]
    pub fn fd(&self) -> RawFd {
        self.fd
    }

    pub fn restore(mut self) -> Result<()> {
        self.restore_original()
    }

    fn restore_original(&mut self) -> Result<()> {
        if let Some(original) = self.original.take() {
            set_termios(self.fd, &original)?;
        }
        Ok(())
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        if let Err(err) = self.restore_original() {
            log::warn!("failed to restore terminal attributes: {err}");
        }
    }
}

pub fn get_termios(fd: c_int) -> Result<libc::termios> {
    let mut termios = unsafe { std::mem::zeroed::<libc::termios>() };
    let result = unsafe { libc::tcgetattr(fd, &mut termios) };
    if result != 0 {
        return Err(SessionSyncError::terminal(
            "tcgetattr",
            fd,
            std::io::Error::last_os_error(),
        ));
    }
    Ok(termios)
}

fn set_termios(fd: c_int, termios: &libc::termios) -> Result<()> {
    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, termios) };
    if result != 0 {
        return Err(SessionSyncError::terminal(
            "tcsetattr",
            fd,
            std::io::Error::last_os_error(),
        ));
    }
    Ok(())
}
