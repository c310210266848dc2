//! Channel sequencing, the channel array and the RAID orchestrator.

pub mod array;
pub mod channel;
pub mod controller;

use std::fmt;

/// Access is the direction of a transaction or channel request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    Read,
    Write,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Read => "read",
            Self::Write => "write",
        })
    }
}
