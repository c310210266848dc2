
use std::fmt::Write;
use std::path::Path;

use anyhow::Context;

use crate::device::SpiDevice;
use crate::device::fram::Fram;
use crate::device::image::Image;
use crate::error::{Fault, ProtocolFault};
use crate::retention::Access;
use crate::retention::channel::Channel;
use crate::spi::mode::SpiMode;

/// Array is the set of channels a transaction is spread over.
pub struct Array<S, const D: usize>(pub [Channel<S>; D]);

impl<const D: usize> Array<Fram, D> {
    /// Builds FRAM channels of `capacity` bytes, backed by `channel-{i}.img`
    /// under `dir` when given, in memory otherwise.
    ///
    /// # Errors
    /// Returns an error if an image file cannot be created or mapped.
    pub fn init_array(dir: Option<&Path>, mode: SpiMode, capacity: usize) -> anyhow::Result<Self> {
        let mut devices = Vec::with_capacity(D);
        for i in 0..D {
            let image = match dir {
                Some(dir) => {
                    let path = dir.join(format!("channel-{i}.img"));
                    Image::open_prealloc(&path, capacity)
                        .with_context(|| format!("opening channel image {}", path.display()))?
                }
                None => Image::in_memory(capacity),
            };
            devices.push(Fram::with_image(image));
        }
        let devices: [Fram; D] = devices
            .try_into()
            .map_err(|_| anyhow::anyhow!("expected {D} channel devices"))?;
        Ok(Self::new(devices, mode))
    }

    /// Flushes every mapped image.
    ///
    /// # Errors
    /// Returns the first flush failure.
    pub fn flush(&self) -> anyhow::Result<()> {
        for ch in &self.0 {
            ch.device()
                .image()
                .flush()
                .with_context(|| format!("flushing channel {}", ch.index()))?;
        }
        Ok(())
    }
}

impl<S: SpiDevice, const D: usize> Array<S, D> {
    pub fn new(devices: [S; D], mode: SpiMode) -> Self {
        let mut index = 0;
        Self(devices.map(|device| {
            let ch = Channel::new(index, device, mode);
            index += 1;
            ch
        }))
    }

    /// Smallest device capacity in the array.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.0.iter().map(Channel::capacity).min().unwrap_or(0)
    }

    /// `check` validates a request against every channel without starting it.
    ///
    /// # Errors
    /// See [`Channel::request`].
    pub fn check(&self, address: u32, width: usize) -> Result<(), Fault> {
        if self.busy() {
            return Err(Fault::InvalidState);
        }
        let last = u64::from(address) + width.saturating_sub(1) as u64;
        for ch in &self.0 {
            if last >= ch.capacity() as u64 {
                return Err(Fault::Protocol {
                    channel: ch.index(),
                    fault: ProtocolFault::AddressOutOfRange {
                        address: u32::try_from(last).unwrap_or(u32::MAX),
                        capacity: ch.capacity(),
                    },
                });
            }
        }
        Ok(())
    }

    /// Starts the same request on every channel in the same tick.
    ///
    /// # Errors
    /// Fails before any channel starts if one of them would reject the request.
    pub fn request(&mut self, access: Access, address: u32, width: usize) -> Result<(), Fault> {
        self.check(address, width)?;
        for ch in &mut self.0 {
            ch.request(access, address, width)?;
        }
        Ok(())
    }

    pub fn tick(&mut self) {
        for ch in &mut self.0 {
            ch.tick();
        }
    }

    #[must_use]
    pub fn busy(&self) -> bool {
        self.0.iter().any(Channel::busy)
    }

    /// True once every channel has retired its request.
    #[must_use]
    pub fn idle(&self) -> bool {
        !self.busy()
    }

    pub fn load_outbound(&mut self, lanes: [u32; D]) {
        for (ch, lane) in self.0.iter_mut().zip(lanes) {
            ch.set_outbound(lane);
        }
    }

    #[must_use]
    pub fn outbound(&self) -> [u32; D] {
        std::array::from_fn(|i| self.0[i].outbound())
    }

    #[must_use]
    pub fn inbound(&self) -> [u32; D] {
        std::array::from_fn(|i| self.0[i].inbound())
    }

    /// First channel, by index, whose request faulted.
    #[must_use]
    pub fn fault(&self) -> Option<(usize, ProtocolFault)> {
        self.0
            .iter()
            .find_map(|ch| ch.fault().map(|f| (ch.index(), f)))
    }

    pub fn clear(&mut self) {
        for ch in &mut self.0 {
            ch.clear();
        }
    }

    #[must_use]
    pub fn status_string(&self) -> String {
        let mut out = String::new();
        for ch in &self.0 {
            let state = match (ch.busy(), ch.fault()) {
                (true, _) => "BUSY".to_string(),
                (false, Some(fault)) => format!("FAULT ({fault})"),
                (false, None) => "IDLE".to_string(),
            };
            let _ = writeln!(
                out,
                "channel {}: {state} (op={:?}, wel={}, capacity={})",
                ch.index(),
                ch.engine().op(),
                ch.engine().write_enabled(),
                ch.capacity()
            );
        }
        out
    }
}
