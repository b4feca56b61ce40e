use std::cell::Cell;
use std::rc::Rc;

/// Live CRTC timing, owned by the host VGA model.
///
/// The extended `CRTC_H_TOTAL_DISP`/`CRTC_V_TOTAL_DISP` registers are views of this state; the
/// register file samples it on every read.
pub trait CrtcTiming {
    fn horizontal_total(&self) -> u32;
    fn vertical_total(&self) -> u32;
}

impl<T: CrtcTiming + ?Sized> CrtcTiming for Rc<T> {
    fn horizontal_total(&self) -> u32 {
        (**self).horizontal_total()
    }

    fn vertical_total(&self) -> u32 {
        (**self).vertical_total()
    }
}

/// Cell-backed timing source.
///
/// A host CRTC model can push its programmed totals here after each mode set and hand an
/// `Rc<CrtcTimingLatch>` to [`crate::AtiRage`].
#[derive(Debug, Default)]
pub struct CrtcTimingLatch {
    horizontal_total: Cell<u32>,
    vertical_total: Cell<u32>,
}

impl CrtcTimingLatch {
    pub fn new(horizontal_total: u32, vertical_total: u32) -> Self {
        Self {
            horizontal_total: Cell::new(horizontal_total),
            vertical_total: Cell::new(vertical_total),
        }
    }

    pub fn set_horizontal_total(&self, value: u32) {
        self.horizontal_total.set(value);
    }

    pub fn set_vertical_total(&self, value: u32) {
        self.vertical_total.set(value);
    }
}

impl CrtcTiming for CrtcTimingLatch {
    fn horizontal_total(&self) -> u32 {
        self.horizontal_total.get()
    }

    fn vertical_total(&self) -> u32 {
        self.vertical_total.get()
    }
}
