use std::cell::RefCell;
use std::rc::Rc;

use aero_platform::io::IoPortBus;

use crate::ports::{AtiRage, AtiRagePort};
use crate::timing::CrtcTiming;
use crate::{AtiRageConfig, ATI_EXT_IO_LEN, ATI_EXT_IO_START};

/// Shared device handle; the machine keeps one and the I/O bus holds one per decoded port.
pub type SharedAtiRage = Rc<RefCell<AtiRage>>;

/// Applies the board's VRAM size policy: an unset (zero) size becomes `default_size`.
///
/// Returns the effective size.
pub fn apply_default_vram_size(vram_size: &mut usize, default_size: usize) -> usize {
    if *vram_size == 0 {
        *vram_size = default_size;
    }
    *vram_size
}

/// Attach an ATI Rage extended register block to the machine.
///
/// `vram_size` is the machine's video memory size; it is only touched when still unset.
pub fn setup_ati_rage(
    bus: &mut IoPortBus,
    vram_size: &mut usize,
    timing: Box<dyn CrtcTiming>,
    config: AtiRageConfig,
) -> SharedAtiRage {
    let vram_size = apply_default_vram_size(vram_size, config.default_vram_size);
    let dev = Rc::new(RefCell::new(AtiRage::new_with_config(config, timing)));
    register_ati_rage(bus, dev.clone());

    tracing::debug!(
        vram_size,
        chip_id = config.chip_id,
        "ATI Rage extended registers mapped at {ATI_EXT_IO_START:#x}..+{ATI_EXT_IO_LEN}"
    );
    dev
}

/// Map `dev` on both the index and data ports.
pub fn register_ati_rage(bus: &mut IoPortBus, dev: SharedAtiRage) {
    bus.register_shared_range(ATI_EXT_IO_START, ATI_EXT_IO_LEN, |_port| {
        Box::new(AtiRagePort::new(dev.clone()))
    });
}

/// Remove the index/data port handlers. Returns `true` if anything was mapped.
pub fn unregister_ati_rage(bus: &mut IoPortBus) -> bool {
    bus.unregister_range(ATI_EXT_IO_START, ATI_EXT_IO_LEN) != 0
}
