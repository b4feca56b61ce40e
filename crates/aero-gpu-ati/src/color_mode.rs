use std::cell::Cell;
use std::rc::Rc;

use crate::regs::{CRTC_PIX_WIDTH_MASK, CRTC_PIX_WIDTH_SHIFT};

/// Pixel format selected by `CRTC_GEN_CNTL`'s pixel width field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// 1bpp monochrome.
    #[default]
    Bpp1,
    /// 4bpp packed (16 colours).
    Bpp4,
    /// 8bpp packed (256 colours).
    Bpp8,
    /// 15bpp linear (RGB555).
    Lin15,
    /// 16bpp linear (RGB565).
    Lin16,
    /// 24bpp linear (RGB888).
    Lin24,
    /// 32bpp linear (xRGB8888).
    Lin32,
}

impl ColorMode {
    pub fn bits_per_pixel(self) -> u8 {
        match self {
            Self::Bpp1 => 1,
            Self::Bpp4 => 4,
            Self::Bpp8 => 8,
            Self::Lin15 => 15,
            Self::Lin16 => 16,
            Self::Lin24 => 24,
            Self::Lin32 => 32,
        }
    }

    /// Direct-colour modes addressed as a linear framebuffer.
    pub fn is_linear(self) -> bool {
        matches!(
            self,
            Self::Lin15 | Self::Lin16 | Self::Lin24 | Self::Lin32
        )
    }
}

/// Color mode attribute shared with the scanout/rendering side.
pub type SharedColorMode = Rc<Cell<ColorMode>>;

/// Decodes the pixel width field (bits 8..=10) of a `CRTC_GEN_CNTL` value.
///
/// Returns `None` for the reserved encoding `7`; callers must keep their current mode in that
/// case rather than fall back to a default.
pub fn color_mode_for_gen_cntl(gen_cntl: u32) -> Option<ColorMode> {
    match (gen_cntl >> CRTC_PIX_WIDTH_SHIFT) & CRTC_PIX_WIDTH_MASK {
        0 => Some(ColorMode::Bpp1),
        1 => Some(ColorMode::Bpp4),
        2 => Some(ColorMode::Bpp8),
        3 => Some(ColorMode::Lin15),
        4 => Some(ColorMode::Lin16),
        5 => Some(ColorMode::Lin24),
        6 => Some(ColorMode::Lin32),
        // Reserved.
        _ => None,
    }
}
