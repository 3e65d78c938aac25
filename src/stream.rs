//! Stream handles used in place of a file path for inputs and outputs.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Capability interface of an externally owned stream.
///
/// A source must report `readable()` and a sink must report `writable()`; anything else is
/// rejected when registered. Sources are paused on registration so that no data flows until
/// whoever executes the command resumes them. The builder never reads, writes or closes a
/// stream itself.
#[cfg_attr(test, mockall::automock)]
pub trait MediaStream {
    fn readable(&self) -> bool {
        false
    }

    fn writable(&self) -> bool {
        false
    }

    /// Suspend data flow until the consumer resumes it
    fn pause(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PipeDirection {
    Stdin,
    Stdout,
}

/// The process's own stdin or stdout, as used by `-` on the command line
pub struct StdioPipe {
    direction: PipeDirection,
    paused: AtomicBool,
}

impl StdioPipe {
    pub fn stdin() -> Self {
        Self {
            direction: PipeDirection::Stdin,
            paused: AtomicBool::new(false),
        }
    }

    pub fn stdout() -> Self {
        Self {
            direction: PipeDirection::Stdout,
            paused: AtomicBool::new(false),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}

impl MediaStream for StdioPipe {
    fn readable(&self) -> bool {
        self.direction == PipeDirection::Stdin
    }

    fn writable(&self) -> bool {
        self.direction == PipeDirection::Stdout
    }

    fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }
}

impl fmt::Debug for StdioPipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdioPipe")
            .field("direction", &self.direction)
            .field("paused", &self.is_paused())
            .finish()
    }
}
