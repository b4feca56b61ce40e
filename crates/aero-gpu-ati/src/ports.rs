use aero_platform::io::{io_all_ones, PortIoDevice};

use crate::color_mode::{ColorMode, SharedColorMode};
use crate::regs::RegisterFile;
use crate::setup::SharedAtiRage;
use crate::timing::CrtcTiming;
use crate::{AtiRageConfig, ATI_EXT_DATA_PORT, ATI_EXT_INDEX_PORT};

/// ATI Rage extended register block (index port + data port).
#[derive(Debug)]
pub struct AtiRage {
    config: AtiRageConfig,
    regs: RegisterFile,
}

impl AtiRage {
    pub fn new(timing: Box<dyn CrtcTiming>) -> Self {
        Self::new_with_config(AtiRageConfig::default(), timing)
    }

    pub fn new_with_config(config: AtiRageConfig, timing: Box<dyn CrtcTiming>) -> Self {
        Self {
            config,
            regs: RegisterFile::new(config.chip_id, timing),
        }
    }

    pub fn config(&self) -> AtiRageConfig {
        self.config
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.regs
    }

    pub fn index(&self) -> u8 {
        self.regs.index()
    }

    pub fn color_mode(&self) -> ColorMode {
        self.regs.color_mode()
    }

    /// Stored value of `index` without re-sampling CRTC timing. `None` for unmodeled registers.
    pub fn register(&self, index: u8) -> Option<u32> {
        self.regs.peek(index)
    }

    pub fn set_color_mode_sink(&mut self, sink: SharedColorMode) {
        self.regs.attach_color_mode_sink(sink);
    }

    pub fn index_read(&self) -> u32 {
        u32::from(self.regs.index())
    }

    pub fn index_write(&mut self, value: u32) {
        self.regs.set_index(value as u8);
    }

    pub fn data_read(&mut self) -> u32 {
        let index = self.regs.index();
        self.regs.get(index)
    }

    /// The chip latches one byte per data-port write, whatever the access width.
    pub fn data_write(&mut self, value: u32) {
        let index = self.regs.index();
        self.regs.set(index, u32::from(value as u8));
    }
}

impl PortIoDevice for AtiRage {
    fn read(&mut self, port: u16, size: u8) -> u32 {
        if size == 0 {
            return 0;
        }
        let value = match port {
            ATI_EXT_INDEX_PORT => self.index_read(),
            ATI_EXT_DATA_PORT => self.data_read(),
            _ => return io_all_ones(size),
        };
        // `in al`/`in ax` only see the low lanes of the register.
        value & io_all_ones(size)
    }

    fn write(&mut self, port: u16, size: u8, value: u32) {
        if size == 0 {
            return;
        }
        match port {
            ATI_EXT_INDEX_PORT => self.index_write(value),
            ATI_EXT_DATA_PORT => self.data_write(value),
            _ => {}
        }
    }

    fn reset(&mut self) {
        self.regs.reset(self.config.chip_id);
    }
}

/// Per-port bus handler sharing one [`AtiRage`] between the index and data ports.
pub struct AtiRagePort {
    dev: SharedAtiRage,
}

impl AtiRagePort {
    pub fn new(dev: SharedAtiRage) -> Self {
        Self { dev }
    }
}

impl PortIoDevice for AtiRagePort {
    fn read(&mut self, port: u16, size: u8) -> u32 {
        self.dev.borrow_mut().read(port, size)
    }

    fn write(&mut self, port: u16, size: u8, value: u32) {
        self.dev.borrow_mut().write(port, size, value);
    }

    fn reset(&mut self) {
        self.dev.borrow_mut().reset();
    }
}
