//! ATI Rage (Mach64 family) extended register interface.
//!
//! Guests reach the chip's extended registers through an index/data port pair at
//! `0x1CE`/`0x1CF`: a byte written to the index port selects a register, and subsequent data-port
//! accesses read or write that register. The index persists across accesses.
//!
//! Only a handful of registers are modeled:
//! - `CRTC_H_TOTAL_DISP` / `CRTC_V_TOTAL_DISP` mirror the live CRTC timing of the host VGA model
//!   (see [`CrtcTiming`]); every read re-samples the timing source.
//! - `CRTC_GEN_CNTL` carries the pixel width field. Writing it re-derives the [`ColorMode`] that
//!   the scanout/rendering side consumes.
//! - `CONFIG_CHIP_ID` identifies the chip to drivers probing for a Rage.
//!
//! Every other index reads as zero and ignores writes; such accesses are reported through
//! `tracing` at `debug` level and never surface as an error to the guest.
//!
//! This crate does not own VRAM, rendering, or timing generation. The machine wires it up with
//! [`setup_ati_rage`], which also applies the chip's default VRAM size policy.

#![forbid(unsafe_code)]

mod color_mode;
mod error;
mod ports;
mod regs;
mod setup;
mod timing;

#[cfg(test)]
mod test_util;

pub use color_mode::{color_mode_for_gen_cntl, ColorMode, SharedColorMode};
pub use error::AtiRageError;
pub use ports::{AtiRage, AtiRagePort};
pub use regs::{
    RegisterFile, CONFIG_CHIP_ID, CRTC_GEN_CNTL, CRTC_H_TOTAL_DISP, CRTC_PIX_WIDTH_MASK,
    CRTC_PIX_WIDTH_SHIFT, CRTC_V_TOTAL_DISP,
};
pub use setup::{
    apply_default_vram_size, register_ati_rage, setup_ati_rage, unregister_ati_rage,
    SharedAtiRage,
};
pub use timing::{CrtcTiming, CrtcTimingLatch};

/// ATI extended register index port.
pub const ATI_EXT_INDEX_PORT: u16 = 0x01CE;
/// ATI extended register data port.
pub const ATI_EXT_DATA_PORT: u16 = 0x01CF;
/// First port of the ATI extended register I/O decode range.
pub const ATI_EXT_IO_START: u16 = ATI_EXT_INDEX_PORT;
/// Last port (inclusive) of the ATI extended register I/O decode range.
pub const ATI_EXT_IO_END: u16 = ATI_EXT_DATA_PORT;
/// Length of [`ATI_EXT_IO_START`]..=[`ATI_EXT_IO_END`] in I/O ports.
pub const ATI_EXT_IO_LEN: u16 = ATI_EXT_IO_END - ATI_EXT_IO_START + 1;

/// Value reported by `CONFIG_CHIP_ID` (Rage II+ DVD, "GU" chip code in the low word).
pub const ATI_RAGE_CHIP_ID: u32 = 0x3A00_4755;

/// VRAM size applied when the machine has not configured one (2MiB).
pub const ATI_RAGE_DEFAULT_VRAM_SIZE: usize = 2 * 1024 * 1024;

/// Configuration for [`AtiRage`].
///
/// The defaults match a stock 2MiB Rage board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtiRageConfig {
    /// VRAM size applied by [`setup_ati_rage`] when the machine's size is still unset (zero).
    pub default_vram_size: usize,
    /// Power-on value of `CONFIG_CHIP_ID`.
    pub chip_id: u32,
}

impl Default for AtiRageConfig {
    fn default() -> Self {
        Self {
            default_vram_size: ATI_RAGE_DEFAULT_VRAM_SIZE,
            chip_id: ATI_RAGE_CHIP_ID,
        }
    }
}
