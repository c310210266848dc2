//! Blocking bus master that polls the adapter internally.

#[cfg(test)]
mod host_tests;

use crate::bus::adapter::{BusAdapter, Request};
use crate::device::SpiDevice;
use crate::error::BusError;
use crate::layout::mapping::{RaidMode, Word};

/// Default number of ticks a host waits for an acknowledge.
pub const DEFAULT_TICK_BUDGET: u64 = 10_000;

/// Host issues one request at a time and clocks the adapter until it is acknowledged.
pub struct Host<S> {
    adapter: BusAdapter<S>,
    budget: u64,
}

impl<S: SpiDevice> Host<S> {
    pub const fn new(adapter: BusAdapter<S>, budget: u64) -> Self {
        Self { adapter, budget }
    }

    /// # Errors
    /// The bus error carried by the acknowledge, or `BusError::Timeout`.
    pub fn read(&mut self, addr: u32) -> Result<Word, BusError> {
        self.transact(Request::read(addr))
    }

    /// # Errors
    /// See [`Host::read`].
    pub fn write(&mut self, addr: u32, data: Word) -> Result<(), BusError> {
        self.transact(Request::write(addr, data)).map(|_| ())
    }

    /// An abandoned request is retired before `request` is presented, so an
    /// identical retry always starts its own transaction.
    fn transact(&mut self, request: Request) -> Result<u32, BusError> {
        let mut ticks = 0;
        while self.adapter.pending() && ticks < self.budget {
            ticks += 1;
            if let Some(stale) = self.adapter.tick(None) {
                tracing::debug!(addr = format_args!("{:#010x}", stale.request.addr), "dropped acknowledge of an abandoned request");
            }
        }
        while ticks < self.budget {
            ticks += 1;
            if let Some(response) = self.adapter.tick(Some(&request)) {
                return response.into_result();
            }
        }
        tracing::warn!(addr = format_args!("{:#010x}", request.addr), ticks = self.budget, "bus request timed out");
        Err(BusError::Timeout { ticks: self.budget })
    }

    /// Reads the data word at region `offset`.
    ///
    /// # Errors
    /// See [`Host::read`].
    pub fn read_data(&mut self, offset: u32) -> Result<Word, BusError> {
        let addr = self.adapter.regmap().data(offset);
        self.read(addr)
    }

    /// # Errors
    /// See [`Host::read`].
    pub fn write_data(&mut self, offset: u32, word: Word) -> Result<(), BusError> {
        let addr = self.adapter.regmap().data(offset);
        self.write(addr, word)
    }

    /// # Errors
    /// See [`Host::read`]; an unknown encoding yields `BusError::InvalidMode`.
    pub fn mode(&mut self) -> Result<RaidMode, BusError> {
        let addr = self.adapter.regmap().mode();
        let value = self.read(addr)?;
        RaidMode::from_encoding(value).ok_or(BusError::InvalidMode(value))
    }

    /// # Errors
    /// See [`Host::read`].
    pub fn set_mode(&mut self, mode: RaidMode) -> Result<(), BusError> {
        let addr = self.adapter.regmap().mode();
        self.write(addr, mode.encoding())
    }

    /// # Errors
    /// See [`Host::read`].
    pub fn status(&mut self) -> Result<u32, BusError> {
        let addr = self.adapter.regmap().status();
        self.read(addr)
    }

    /// Clocks the bus with no request presented.
    pub fn idle(&mut self, ticks: u64) {
        for _ in 0..ticks {
            let _ = self.adapter.tick(None);
        }
    }

    #[must_use]
    pub const fn budget(&self) -> u64 {
        self.budget
    }

    pub const fn set_budget(&mut self, budget: u64) {
        self.budget = budget;
    }

    #[must_use]
    pub const fn adapter(&self) -> &BusAdapter<S> {
        &self.adapter
    }

    pub const fn adapter_mut(&mut self) -> &mut BusAdapter<S> {
        &mut self.adapter
    }
}
