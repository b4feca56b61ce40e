use crate::color_mode::{color_mode_for_gen_cntl, ColorMode, SharedColorMode};
use crate::timing::CrtcTiming;
use crate::{AtiRageError, ATI_EXT_DATA_PORT};

/// Extended register indices reachable through [`crate::ATI_EXT_DATA_PORT`].
pub const CRTC_H_TOTAL_DISP: u8 = 0x00;
pub const CRTC_V_TOTAL_DISP: u8 = 0x08;
pub const CRTC_GEN_CNTL: u8 = 0x1C;
pub const CONFIG_CHIP_ID: u8 = 0xE0;

/// `CRTC_GEN_CNTL` pixel width field (bits 8..=10).
pub const CRTC_PIX_WIDTH_SHIFT: u32 = 8;
pub const CRTC_PIX_WIDTH_MASK: u32 = 0x7;

/// Index register plus the modeled subset of the extended register file.
pub struct RegisterFile {
    index: u8,
    crtc_h_total_disp: u32,
    crtc_v_total_disp: u32,
    crtc_gen_cntl: u32,
    config_chip_id: u32,

    /// Derived from `crtc_gen_cntl`; only updated when that register is written.
    color_mode: ColorMode,
    color_mode_sink: Option<SharedColorMode>,

    timing: Box<dyn CrtcTiming>,
}

impl std::fmt::Debug for RegisterFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterFile")
            .field("index", &self.index)
            .field("crtc_h_total_disp", &self.crtc_h_total_disp)
            .field("crtc_v_total_disp", &self.crtc_v_total_disp)
            .field("crtc_gen_cntl", &self.crtc_gen_cntl)
            .field("config_chip_id", &self.config_chip_id)
            .field("color_mode", &self.color_mode)
            .finish_non_exhaustive()
    }
}

impl RegisterFile {
    /// All registers zeroed except `CONFIG_CHIP_ID`.
    pub fn new(chip_id: u32, timing: Box<dyn CrtcTiming>) -> Self {
        Self {
            index: 0,
            crtc_h_total_disp: 0,
            crtc_v_total_disp: 0,
            crtc_gen_cntl: 0,
            config_chip_id: chip_id,
            color_mode: ColorMode::default(),
            color_mode_sink: None,
            timing,
        }
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn set_index(&mut self, index: u8) {
        self.index = index;
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    /// Publish the derived color mode to `sink`, now and on every later change.
    pub fn attach_color_mode_sink(&mut self, sink: SharedColorMode) {
        sink.set(self.color_mode);
        self.color_mode_sink = Some(sink);
    }

    /// Stored value of a modeled register, without sampling the timing source.
    pub fn peek(&self, index: u8) -> Option<u32> {
        match index {
            CRTC_H_TOTAL_DISP => Some(self.crtc_h_total_disp),
            CRTC_V_TOTAL_DISP => Some(self.crtc_v_total_disp),
            CRTC_GEN_CNTL => Some(self.crtc_gen_cntl),
            CONFIG_CHIP_ID => Some(self.config_chip_id),
            _ => None,
        }
    }

    pub fn try_get(&mut self, index: u8) -> Result<u32, AtiRageError> {
        match index {
            CRTC_H_TOTAL_DISP => {
                self.crtc_h_total_disp = self.timing.horizontal_total();
                Ok(self.crtc_h_total_disp)
            }
            CRTC_V_TOTAL_DISP => {
                self.crtc_v_total_disp = self.timing.vertical_total();
                Ok(self.crtc_v_total_disp)
            }
            CRTC_GEN_CNTL => Ok(self.crtc_gen_cntl),
            CONFIG_CHIP_ID => Ok(self.config_chip_id),
            _ => Err(AtiRageError::UnhandledRegister {
                port: ATI_EXT_DATA_PORT,
                index,
                value: None,
            }),
        }
    }

    pub fn try_set(&mut self, index: u8, value: u32) -> Result<(), AtiRageError> {
        match index {
            CRTC_H_TOTAL_DISP => self.crtc_h_total_disp = value,
            CRTC_V_TOTAL_DISP => self.crtc_v_total_disp = value,
            CRTC_GEN_CNTL => {
                self.crtc_gen_cntl = value;
                self.update_color_mode();
            }
            CONFIG_CHIP_ID => self.config_chip_id = value,
            _ => {
                return Err(AtiRageError::UnhandledRegister {
                    port: ATI_EXT_DATA_PORT,
                    index,
                    value: Some(value),
                })
            }
        }
        Ok(())
    }

    /// Reads register `index`. Unmodeled registers read as zero.
    pub fn get(&mut self, index: u8) -> u32 {
        match self.try_get(index) {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(port = ATI_EXT_DATA_PORT, index, "{err}");
                0
            }
        }
    }

    /// Writes register `index`. Writes to unmodeled registers are dropped.
    pub fn set(&mut self, index: u8, value: u32) {
        if let Err(err) = self.try_set(index, value) {
            tracing::debug!(port = ATI_EXT_DATA_PORT, index, value, "{err}");
        }
    }

    /// Power-on state: index 0, registers cleared, chip id restored to `chip_id`.
    pub fn reset(&mut self, chip_id: u32) {
        self.index = 0;
        self.crtc_h_total_disp = 0;
        self.crtc_v_total_disp = 0;
        self.crtc_gen_cntl = 0;
        self.config_chip_id = chip_id;
        self.update_color_mode();
    }

    fn update_color_mode(&mut self) {
        match color_mode_for_gen_cntl(self.crtc_gen_cntl) {
            Some(mode) => {
                if mode != self.color_mode {
                    tracing::trace!(
                        ?mode,
                        gen_cntl = self.crtc_gen_cntl,
                        "ATI Rage color mode change"
                    );
                }
                self.color_mode = mode;
            }
            // Reserved pixel width: keep whatever mode was active.
            None => {}
        }
        if let Some(sink) = &self.color_mode_sink {
            sink.set(self.color_mode);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::capture_logs;
    use crate::timing::CrtcTimingLatch;
    use std::cell::Cell;
    use std::rc::Rc;

    fn regs_with_timing() -> (RegisterFile, Rc<CrtcTimingLatch>) {
        let timing = Rc::new(CrtcTimingLatch::new(0x4F, 0x1DF));
        let regs = RegisterFile::new(0x3A00_4755, Box::new(timing.clone()));
        (regs, timing)
    }

    #[test]
    fn power_on_state() {
        let (regs, _) = regs_with_timing();
        assert_eq!(regs.index(), 0);
        assert_eq!(regs.peek(CRTC_H_TOTAL_DISP), Some(0));
        assert_eq!(regs.peek(CRTC_V_TOTAL_DISP), Some(0));
        assert_eq!(regs.peek(CRTC_GEN_CNTL), Some(0));
        assert_eq!(regs.peek(CONFIG_CHIP_ID), Some(0x3A00_4755));
        assert_eq!(regs.peek(0x14), None);
        assert_eq!(regs.color_mode(), ColorMode::Bpp1);
    }

    #[test]
    fn gen_cntl_write_derives_color_mode_in_the_same_call() {
        let (mut regs, _) = regs_with_timing();
        regs.set(CRTC_GEN_CNTL, 0x500);
        assert_eq!(regs.get(CRTC_GEN_CNTL), 0x500);
        assert_eq!(regs.color_mode(), ColorMode::Lin24);

        regs.set(CRTC_GEN_CNTL, 0x200);
        assert_eq!(regs.color_mode(), ColorMode::Bpp8);
    }

    #[test]
    fn reserved_pixel_width_keeps_previous_mode() {
        let (mut regs, _) = regs_with_timing();
        regs.set(CRTC_GEN_CNTL, 0x300);
        assert_eq!(regs.color_mode(), ColorMode::Lin15);

        regs.set(CRTC_GEN_CNTL, 0x700);
        assert_eq!(regs.get(CRTC_GEN_CNTL), 0x700);
        assert_eq!(regs.color_mode(), ColorMode::Lin15);
    }

    #[test]
    fn timing_registers_resample_on_every_read() {
        let (mut regs, timing) = regs_with_timing();

        assert_eq!(regs.get(CRTC_H_TOTAL_DISP), 0x4F);
        assert_eq!(regs.peek(CRTC_H_TOTAL_DISP), Some(0x4F));
        timing.set_horizontal_total(0x63);
        assert_eq!(regs.get(CRTC_H_TOTAL_DISP), 0x63);

        assert_eq!(regs.get(CRTC_V_TOTAL_DISP), 0x1DF);
        timing.set_vertical_total(0x20C);
        assert_eq!(regs.get(CRTC_V_TOTAL_DISP), 0x20C);
    }

    #[test]
    fn timing_register_write_is_only_a_cache() {
        let (mut regs, _) = regs_with_timing();
        regs.set(CRTC_H_TOTAL_DISP, 0x12);
        assert_eq!(regs.peek(CRTC_H_TOTAL_DISP), Some(0x12));
        // The next read refreshes from the live source.
        assert_eq!(regs.get(CRTC_H_TOTAL_DISP), 0x4F);
    }

    #[test]
    fn unknown_index_is_reported_and_not_stored() {
        let (mut regs, _) = regs_with_timing();
        assert_eq!(
            regs.try_get(0x14),
            Err(AtiRageError::UnhandledRegister {
                port: ATI_EXT_DATA_PORT,
                index: 0x14,
                value: None,
            })
        );
        assert_eq!(
            regs.try_set(0x90, 1),
            Err(AtiRageError::UnhandledRegister {
                port: ATI_EXT_DATA_PORT,
                index: 0x90,
                value: Some(1),
            })
        );

        let (value, logs) = capture_logs(|| {
            regs.set(0xBB, 0x42);
            regs.get(0xBB)
        });
        assert_eq!(value, 0);
        assert_eq!(regs.peek(0xBB), None);
        assert_eq!(regs.peek(CRTC_GEN_CNTL), Some(0));
        assert!(logs.contains("index=0xbb"), "{logs}");
        assert!(logs.contains("val=0x42"), "{logs}");
        assert!(logs.contains("read port=0x1cf"), "{logs}");
    }

    #[test]
    fn sink_tracks_every_gen_cntl_write() {
        let (mut regs, _) = regs_with_timing();
        let sink: SharedColorMode = Rc::new(Cell::new(ColorMode::Lin32));
        regs.attach_color_mode_sink(sink.clone());
        assert_eq!(sink.get(), ColorMode::Bpp1);

        regs.set(CRTC_GEN_CNTL, 0x600);
        assert_eq!(sink.get(), ColorMode::Lin32);
        regs.set(CRTC_GEN_CNTL, 0x700);
        assert_eq!(sink.get(), ColorMode::Lin32);
    }

    #[test]
    fn reset_restores_power_on_values() {
        let (mut regs, _) = regs_with_timing();
        regs.set_index(CONFIG_CHIP_ID);
        regs.set(CONFIG_CHIP_ID, 0x55);
        regs.set(CRTC_GEN_CNTL, 0x400);
        regs.get(CRTC_V_TOTAL_DISP);

        regs.reset(0x3A00_4755);
        assert_eq!(regs.index(), 0);
        assert_eq!(regs.peek(CONFIG_CHIP_ID), Some(0x3A00_4755));
        assert_eq!(regs.peek(CRTC_GEN_CNTL), Some(0));
        assert_eq!(regs.peek(CRTC_V_TOTAL_DISP), Some(0));
        assert_eq!(regs.color_mode(), ColorMode::Bpp1);
    }
}
