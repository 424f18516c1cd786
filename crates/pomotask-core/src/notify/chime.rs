use std::io::Write;

use crate::error::NotifyError;

/// Audible cue played when a session ends.
pub trait Chime {
    fn play(&self) -> Result<(), NotifyError>;
}

/// Rings the terminal bell on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl Chime for TerminalBell {
    fn play(&self) -> Result<(), NotifyError> {
        let mut err = std::io::stderr().lock();
        err.write_all(b"\x07")?;
        err.flush()?;
        Ok(())
    }
}

/// Plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentChime;

impl Chime for SilentChime {
    fn play(&self) -> Result<(), NotifyError> {
        Ok(())
    }
}
