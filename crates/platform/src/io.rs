use std::collections::HashMap;

/// A device reachable through x86 port I/O (`in`/`out`).
pub trait PortIoDevice {
    fn read(&mut self, port: u16, size: u8) -> u32;
    fn write(&mut self, port: u16, size: u8, value: u32);

    /// Reset the device back to its power-on state.
    fn reset(&mut self) {}
}

/// Value an unmapped (floating) ISA bus returns for an access of `size` bytes.
pub fn io_all_ones(size: u8) -> u32 {
    match size {
        0 => 0,
        1 => 0xFF,
        2 => 0xFFFF,
        _ => 0xFFFF_FFFF,
    }
}

/// Host I/O port routing table.
///
/// Each port maps to at most one handler. Devices that decode several ports (index/data pairs)
/// register one wrapper per port that shares the underlying state, see
/// [`Self::register_shared_range`].
pub struct IoPortBus {
    devices: HashMap<u16, Box<dyn PortIoDevice>>,
}

impl IoPortBus {
    pub fn new() -> Self {
        Self {
            devices: HashMap::new(),
        }
    }

    /// Map `device` at `port`, replacing any handler previously registered there.
    pub fn register(&mut self, port: u16, device: Box<dyn PortIoDevice>) {
        if self.devices.insert(port, device).is_some() {
            tracing::debug!(port, "replaced I/O port handler at {port:#06x}");
        }
    }

    /// Unregister an I/O port handler, returning the removed device (if any).
    pub fn unregister(&mut self, port: u16) -> Option<Box<dyn PortIoDevice>> {
        self.devices.remove(&port)
    }

    /// Register one handler per port over a contiguous range.
    ///
    /// The factory is invoked once per port, so callers can hand out per-port wrappers around a
    /// single `Rc<RefCell<...>>` device. Ports wrap at `0xFFFF`, matching x86 semantics.
    pub fn register_shared_range<F>(&mut self, start: u16, len: u16, mut make: F)
    where
        F: FnMut(u16) -> Box<dyn PortIoDevice>,
    {
        for offset in 0..len {
            let port = start.wrapping_add(offset);
            self.register(port, make(port));
        }
    }

    /// Unregister every exact-port handler in a contiguous range.
    pub fn unregister_range(&mut self, start: u16, len: u16) -> usize {
        (0..len)
            .filter_map(|offset| self.unregister(start.wrapping_add(offset)))
            .count()
    }

    pub fn is_mapped(&self, port: u16) -> bool {
        self.devices.contains_key(&port)
    }

    pub fn read(&mut self, port: u16, size: u8) -> u32 {
        // Zero-sized accesses are not representable by the ISA; treat them as no-ops.
        if size == 0 {
            return 0;
        }

        // x86 port I/O only supports sizes {1,2,4}. Anything else floats high and is never
        // forwarded to a device model.
        if !matches!(size, 1 | 2 | 4) {
            return 0xFFFF_FFFF;
        }

        match self.devices.get_mut(&port) {
            Some(dev) => dev.read(port, size),
            None => {
                tracing::trace!(port, size, "read from unmapped I/O port {port:#06x}");
                io_all_ones(size)
            }
        }
    }

    pub fn write(&mut self, port: u16, size: u8, value: u32) {
        if !matches!(size, 1 | 2 | 4) {
            return;
        }

        match self.devices.get_mut(&port) {
            Some(dev) => dev.write(port, size, value),
            None => {
                tracing::trace!(
                    port,
                    size,
                    value,
                    "write to unmapped I/O port {port:#06x} value={value:#x}"
                );
            }
        }
    }

    pub fn read_u8(&mut self, port: u16) -> u8 {
        self.read(port, 1) as u8
    }

    pub fn write_u8(&mut self, port: u16, value: u8) {
        self.write(port, 1, u32::from(value));
    }

    pub fn reset(&mut self) {
        for dev in self.devices.values_mut() {
            dev.reset();
        }
    }
}

impl Default for IoPortBus {
    fn default() -> Self {
        Self::new()
    }
}
