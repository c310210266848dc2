//! Cycle-level bus slave in front of the orchestrator.


use crate::bus::regmap::{Register, RegisterMap, STATUS_INTEGRITY};
use crate::device::SpiDevice;
use crate::error::{BusError, Fault};
use crate::layout::mapping::RaidMode;
use crate::retention::Access;
use crate::retention::controller::{Completion, Controller};

/// Request is what the host drives on the bus. It is held until acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub addr: u32,
    pub we: bool,
    pub data: u32,
}

impl Request {
    #[must_use]
    pub const fn read(addr: u32) -> Self {
        Self {
            addr,
            we: false,
            data: 0,
        }
    }

    #[must_use]
    pub const fn write(addr: u32, data: u32) -> Self {
        Self {
            addr,
            we: true,
            data,
        }
    }
}

/// Response accompanies the one-tick acknowledge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    /// Request being acknowledged.
    pub request: Request,
    pub data: u32,
    pub error: Option<BusError>,
}

impl Response {
    const fn ok(request: Request, data: u32) -> Self {
        Self {
            request,
            data,
            error: None,
        }
    }

    const fn err(request: Request, error: BusError) -> Self {
        Self {
            request,
            data: 0,
            error: Some(error),
        }
    }

    /// # Errors
    /// Returns the bus error carried by the acknowledge.
    pub const fn into_result(self) -> Result<u32, BusError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.data),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    /// Data access handed to the orchestrator.
    InFlight(Request),
    /// Outcome known; acknowledge on the next tick.
    Ready(Response),
}

/// BusAdapter maps one bus transaction onto at most one orchestrator transaction.
///
/// The acknowledge is asserted for exactly one tick, one tick after the access
/// is known to be satisfiable, and never while the orchestrator is busy.
pub struct BusAdapter<S> {
    controller: Controller<S>,
    regmap: RegisterMap,
    mode: RaidMode,
    status: u32,
    phase: Phase,
}

impl<S: SpiDevice> BusAdapter<S> {
    pub const fn new(controller: Controller<S>, regmap: RegisterMap) -> Self {
        Self {
            controller,
            regmap,
            mode: RaidMode::Mirror,
            status: 0,
            phase: Phase::Idle,
        }
    }

    /// Clocks the adapter and the orchestrator once.
    ///
    /// # Returns
    /// `Some(response)` on the acknowledge tick, `None` otherwise.
    pub fn tick(&mut self, request: Option<&Request>) -> Option<Response> {
        self.controller.tick();
        match self.phase {
            Phase::Ready(response) => {
                self.phase = Phase::Idle;
                return Some(response);
            }
            Phase::InFlight(req) => {
                if !self.controller.busy() {
                    let response = match self.controller.take_outcome() {
                        Some(Ok(done)) => Response::ok(req, self.retire(&done)),
                        Some(Err(fault)) => Response::err(req, fault.into()),
                        // Outcome was taken by another caller of the controller.
                        None => Response::err(req, Fault::InvalidState.into()),
                    };
                    self.phase = Phase::Ready(response);
                }
            }
            Phase::Idle => {
                if let Some(req) = request {
                    self.accept(*req);
                }
            }
        }
        None
    }

    fn accept(&mut self, req: Request) {
        self.phase = match self.regmap.decode(req.addr) {
            Some(Register::Data(offset)) => {
                if self.controller.busy() {
                    return;
                }
                let started = if req.we {
                    self.controller.write(offset, req.data, self.mode)
                } else {
                    self.controller.read(offset, self.mode)
                };
                match started {
                    Ok(()) => Phase::InFlight(req),
                    Err(fault) => Phase::Ready(Response::err(req, fault.into())),
                }
            }
            Some(Register::Mode) if req.we => {
                if self.controller.busy() {
                    tracing::trace!("mode write deferred until the transaction completes");
                    return;
                }
                match RaidMode::from_encoding(req.data) {
                    Some(mode) => {
                        tracing::debug!(%mode, "raid mode changed");
                        self.mode = mode;
                        Phase::Ready(Response::ok(req, 0))
                    }
                    None => Phase::Ready(Response::err(req, BusError::InvalidMode(req.data))),
                }
            }
            Some(Register::Mode) => Phase::Ready(Response::ok(req, self.mode.encoding())),
            Some(Register::Status) if req.we => {
                Phase::Ready(Response::err(req, BusError::ReadOnly(req.addr)))
            }
            Some(Register::Status) => Phase::Ready(Response::ok(req, self.status)),
            None => Phase::Ready(Response::err(req, BusError::Unmapped(req.addr))),
        };
    }

    /// Updates the status register from a finished transaction and returns the bus data.
    fn retire(&mut self, done: &Completion) -> u32 {
        match done.access {
            Access::Write => 0,
            Access::Read => {
                if done.mode.checks_integrity() {
                    if done.integrity.is_some() || done.parity_fault {
                        self.status |= STATUS_INTEGRITY;
                    } else {
                        self.status &= !STATUS_INTEGRITY;
                    }
                }
                done.word
            }
        }
    }

    #[must_use]
    pub const fn mode(&self) -> RaidMode {
        self.mode
    }

    #[must_use]
    pub const fn status(&self) -> u32 {
        self.status
    }

    #[must_use]
    pub const fn regmap(&self) -> &RegisterMap {
        &self.regmap
    }

    /// True while a request has been taken but not yet acknowledged.
    #[must_use]
    pub fn pending(&self) -> bool {
        self.phase != Phase::Idle
    }

    #[must_use]
    pub const fn controller(&self) -> &Controller<S> {
        &self.controller
    }

    pub const fn controller_mut(&mut self) -> &mut Controller<S> {
        &mut self.controller
    }
}
