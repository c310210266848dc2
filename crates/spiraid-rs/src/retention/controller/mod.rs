//! RAID orchestrator: spreads a transaction over the array and waits for every channel.


use crate::device::SpiDevice;
use crate::error::{Fault, IntegrityFault};
use crate::layout::mapping::{self, CHANNELS, RaidMode, Readback, Word};
use crate::metrics::{self, RaidOp};
use crate::retention::Access;
use crate::retention::array::Array;

/// State of the orchestrator. Anything but `Idle` means a transaction is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Idle,
    Dispatch,
    Wait,
    Complete,
}

/// Transaction is one host word access, alive from accept until the return to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transaction {
    pub access: Access,
    pub address: u32,
    pub word: Word,
    pub mode: RaidMode,
}

/// Completion is the host-visible result of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub access: Access,
    pub address: u32,
    pub mode: RaidMode,
    /// Reassembled word for reads, the written word for writes.
    pub word: Word,
    pub parity_fault: bool,
    pub integrity: Option<IntegrityFault>,
    /// Ticks from accept to completion.
    pub ticks: u64,
}

pub type Outcome = Result<Completion, Fault>;

/// Controller drives the IDLE -> DISPATCH -> WAIT -> COMPLETE -> IDLE cycle.
///
/// Each `tick` first clocks every channel, then advances the state machine, so
/// `busy` drops exactly one tick after the last channel retires.
pub struct Controller<S> {
    array: Array<S, CHANNELS>,
    state: State,
    current: Option<Transaction>,
    latched: Word,
    dispatch_fault: Option<Fault>,
    outcome: Option<Outcome>,
    now: u64,
    accepted_at: u64,
}

impl<S: SpiDevice> Controller<S> {
    pub const fn new(array: Array<S, CHANNELS>) -> Self {
        Self {
            array,
            state: State::Idle,
            current: None,
            latched: 0,
            dispatch_fault: None,
            outcome: None,
            now: 0,
            accepted_at: 0,
        }
    }

    /// # Errors
    /// `Fault::InvalidState` while a transaction is in flight, `Fault::Protocol`
    /// if the word's span does not fit the devices. Nothing changes on error.
    pub fn write(&mut self, address: u32, word: Word, mode: RaidMode) -> Result<(), Fault> {
        self.accept(Transaction {
            access: Access::Write,
            address,
            word,
            mode,
        })
    }

    /// # Errors
    /// See [`Controller::write`].
    pub fn read(&mut self, address: u32, mode: RaidMode) -> Result<(), Fault> {
        self.accept(Transaction {
            access: Access::Read,
            address,
            word: 0,
            mode,
        })
    }

    fn accept(&mut self, tx: Transaction) -> Result<(), Fault> {
        if self.busy() {
            return Err(Fault::InvalidState);
        }
        self.array.check(tx.address, tx.mode.lane_width())?;
        tracing::debug!(
            access = %tx.access,
            address = format_args!("{:#06x}", tx.address),
            mode = %tx.mode,
            "transaction accepted"
        );
        self.latched = tx.word;
        self.current = Some(tx);
        self.dispatch_fault = None;
        self.outcome = None;
        self.accepted_at = self.now;
        self.state = State::Dispatch;
        Ok(())
    }

    /// Advances the channels and the state machine by one clock.
    pub fn tick(&mut self) {
        self.now += 1;
        self.array.tick();
        match self.state {
            State::Idle => {}
            State::Dispatch => self.dispatch(),
            State::Wait => {
                if self.array.idle() {
                    self.state = State::Complete;
                }
            }
            State::Complete => self.complete(),
        }
    }

    fn dispatch(&mut self) {
        let Some(tx) = self.current else {
            self.state = State::Idle;
            return;
        };
        if tx.access == Access::Write {
            self.array.load_outbound(mapping::split(tx.mode, self.latched));
        }
        if let Err(fault) = self
            .array
            .request(tx.access, tx.address, tx.mode.lane_width())
        {
            self.dispatch_fault = Some(fault);
        }
        self.state = State::Wait;
    }

    fn complete(&mut self) {
        let Some(tx) = self.current.take() else {
            self.state = State::Idle;
            return;
        };
        let ticks = self.now - self.accepted_at;
        let failure = self.dispatch_fault.take().or_else(|| {
            self.array
                .fault()
                .map(|(channel, fault)| Fault::Protocol { channel, fault })
        });

        let outcome = match failure {
            Some(fault) => Err(fault),
            None => {
                let readback = match tx.access {
                    Access::Read => mapping::join(tx.mode, self.array.inbound()),
                    Access::Write => Readback {
                        word: self.latched,
                        parity_fault: false,
                        integrity: None,
                    },
                };
                Ok(Completion {
                    access: tx.access,
                    address: tx.address,
                    mode: tx.mode,
                    word: readback.word,
                    parity_fault: readback.parity_fault,
                    integrity: readback.integrity,
                    ticks,
                })
            }
        };

        match &outcome {
            Ok(done) => {
                if let Some(integrity) = done.integrity {
                    tracing::warn!(address = done.address, mode = %done.mode, %integrity, "integrity check failed");
                }
                tracing::debug!(access = %done.access, word = format_args!("{:#010x}", done.word), ticks, "transaction complete");
            }
            Err(fault) => tracing::warn!(access = %tx.access, %fault, "transaction failed"),
        }
        metrics::record_raid_op(RaidOp {
            op: tx.access,
            mode: tx.mode,
            bytes: std::mem::size_of::<Word>() as u64,
            ticks,
            error: outcome.is_err(),
            integrity_fault: outcome.as_ref().is_ok_and(|c| c.integrity.is_some()),
        });

        self.array.clear();
        self.latched = 0;
        self.outcome = Some(outcome);
        self.state = State::Idle;
    }

    /// Takes the outcome of the last completed transaction.
    pub const fn take_outcome(&mut self) -> Option<Outcome> {
        self.outcome.take()
    }

    /// Ticks until idle and returns the outcome of the transaction in flight, if any.
    pub fn settle(&mut self) -> Option<Outcome> {
        while self.busy() {
            self.tick();
        }
        self.take_outcome()
    }

    #[must_use]
    pub fn busy(&self) -> bool {
        self.state != State::Idle
    }

    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    #[must_use]
    pub const fn transaction(&self) -> Option<&Transaction> {
        self.current.as_ref()
    }

    /// Word held for the transaction in flight; zero when idle.
    #[must_use]
    pub const fn latched(&self) -> Word {
        self.latched
    }

    /// Ticks since construction.
    #[must_use]
    pub const fn now(&self) -> u64 {
        self.now
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.array.capacity()
    }

    #[must_use]
    pub const fn array(&self) -> &Array<S, CHANNELS> {
        &self.array
    }

    pub const fn array_mut(&mut self) -> &mut Array<S, CHANNELS> {
        &mut self.array
    }
}
