//! One-shot hardware peripheral initialization.
//!
//! Configures the gate I/O lines and the Stop interrupt using raw ESP-IDF
//! sys calls, and mounts the SPIFFS partition that holds `config.json`.
//! The encoder pins are left to `esp-idf-hal` pin drivers.  Called once
//! from `main()` before the control loop starts.
//!
//! On non-espidf targets every call is a simulation stub.  Output levels
//! are kept in an atomic bitmask there so read-back behaves like the
//! input/output pads on the board.

use core::sync::atomic::{AtomicBool, Ordering};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;
#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// ESP-IDF call that failed during bring-up, with its `esp_err_t` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
    IsrHandlerFailed(i32),
    SpiffsMountFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
            Self::IsrHandlerFailed(rc) => write!(f, "Stop ISR handler add failed (rc={})", rc),
            Self::SpiffsMountFailed(rc) => write!(f, "SPIFFS mount failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before any task is spawned.
    unsafe {
        init_gpio_inputs()?;
        init_gpio_outputs()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO Inputs ───────────────────────────────────────────────

/// Apply one `gpio_config_t` shape to every pin in `gpios`.
#[cfg(target_os = "espidf")]
unsafe fn configure(
    gpios: &[i32],
    mode: gpio_mode_t,
    pull_down: bool,
    intr: gpio_int_type_t,
) -> Result<(), HwInitError> {
    let pin_bit_mask = gpios.iter().fold(0u64, |acc, &pin| acc | (1u64 << pin));
    let cfg = gpio_config_t {
        pin_bit_mask,
        mode,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: if pull_down {
            gpio_pulldown_t_GPIO_PULLDOWN_ENABLE
        } else {
            gpio_pulldown_t_GPIO_PULLDOWN_DISABLE
        },
        intr_type: intr,
    };
    match unsafe { gpio_config(&cfg) } {
        ret if ret == ESP_OK as i32 => Ok(()),
        ret => Err(HwInitError::GpioConfigFailed(ret)),
    }
}

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    let gate_inputs = [
        pins::IN_OPEN_GPIO,
        pins::IN_CLOSE_GPIO,
        pins::IN_OPEN_LIMIT_GPIO,
        pins::IN_CLOSE_LIMIT_GPIO,
    ];
    unsafe {
        configure(
            &gate_inputs,
            gpio_mode_t_GPIO_MODE_INPUT,
            true,
            gpio_int_type_t_GPIO_INTR_DISABLE,
        )?;

        // Stop interrupts on the rising edge but stays masked until the
        // stop task arms it.
        configure(
            &[pins::IN_STOP_GPIO],
            gpio_mode_t_GPIO_MODE_INPUT,
            true,
            gpio_int_type_t_GPIO_INTR_POSEDGE,
        )?;
        gpio_intr_disable(pins::IN_STOP_GPIO);
    }

    info!("hw_init: {} gate inputs + stop configured", gate_inputs.len());
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured pin; safe from any task.
    (unsafe { gpio_get_level(pin) }) != 0
}

/// Simulation: inputs rest low (pull-down), outputs read back their level.
#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(pin: i32) -> bool {
    sim::level(pin)
}

// ── GPIO Outputs ──────────────────────────────────────────────

/// Outputs are configured input/output so `gpio_get_level` returns the
/// driven level.  All start low.
#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let gate_outputs = [
        pins::OUT_OPEN_GPIO,
        pins::OUT_CLOSE_GPIO,
        pins::OUT_STOP_GPIO,
        pins::OUT_COUNTER_GPIO,
        pins::OUT_O4_GPIO,
    ];
    unsafe {
        configure(
            &gate_outputs,
            gpio_mode_t_GPIO_MODE_INPUT_OUTPUT,
            false,
            gpio_int_type_t_GPIO_INTR_DISABLE,
        )?;
        for pin in gate_outputs {
            gpio_set_level(pin, 0);
        }
    }

    info!("hw_init: {} gate outputs driven low", gate_outputs.len());
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin.
    // Each output is written by exactly one task.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) {
    sim::set_level(pin, high);
}

// ── Stop interrupt ────────────────────────────────────────────

/// Set by the Stop ISR, consumed by the stop task.
static STOP_EDGE_PENDING: AtomicBool = AtomicBool::new(false);

/// Record a Stop edge.  Lock-free; safe from interrupt context.
pub fn stop_isr_handler() {
    STOP_EDGE_PENDING.store(true, Ordering::Release);
}

/// Consume the pending Stop edge, if any.
pub fn take_stop_edge() -> bool {
    STOP_EDGE_PENDING.swap(false, Ordering::AcqRel)
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn stop_gpio_isr(_arg: *mut core::ffi::c_void) {
    stop_isr_handler();
}

/// Install the per-pin GPIO ISR service and register the Stop handler.
/// The interrupt is left masked; [`set_stop_interrupt`] arms it.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed.  The handler only stores an atomic.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        let ret = gpio_isr_handler_add(
            pins::IN_STOP_GPIO,
            Some(stop_gpio_isr),
            core::ptr::null_mut(),
        );
        if ret != ESP_OK as i32 {
            return Err(HwInitError::IsrHandlerFailed(ret));
        }
    }
    info!("hw_init: ISR service installed (stop)");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn set_stop_interrupt(enabled: bool) {
    // SAFETY: interrupt enable bits of an already-configured pin; only the
    // stop task calls this after init.
    unsafe {
        if enabled {
            gpio_intr_enable(pins::IN_STOP_GPIO);
        } else {
            gpio_intr_disable(pins::IN_STOP_GPIO);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn set_stop_interrupt(enabled: bool) {
    sim::STOP_INTR_ENABLED.store(enabled, Ordering::Release);
}

/// Whether the Stop interrupt is armed (simulation only).
#[cfg(not(target_os = "espidf"))]
pub fn stop_interrupt_enabled() -> bool {
    sim::STOP_INTR_ENABLED.load(Ordering::Acquire)
}

// ── SPIFFS ───────────────────────────────────────────────────

/// VFS mount point of the storage partition.
pub const SPIFFS_BASE_PATH: &str = "/spiffs";

/// Mount the default SPIFFS partition at [`SPIFFS_BASE_PATH`], formatting
/// it on first boot.
#[cfg(target_os = "espidf")]
pub fn mount_spiffs() -> Result<(), HwInitError> {
    let conf = esp_vfs_spiffs_conf_t {
        base_path: c"/spiffs".as_ptr(),
        partition_label: core::ptr::null(),
        max_files: 4,
        format_if_mount_failed: true,
    };
    // SAFETY: conf outlives the call; the path literal is 'static.
    let ret = unsafe { esp_vfs_spiffs_register(&conf) };
    if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
        return Err(HwInitError::SpiffsMountFailed(ret));
    }
    info!("hw_init: SPIFFS mounted at {}", SPIFFS_BASE_PATH);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn mount_spiffs() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): SPIFFS mount skipped");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};

    /// One bit per GPIO number.
    static LEVELS: AtomicU64 = AtomicU64::new(0);
    pub(super) static STOP_INTR_ENABLED: AtomicBool = AtomicBool::new(false);

    fn mask(pin: i32) -> u64 {
        1u64.checked_shl(pin as u32).unwrap_or(0)
    }

    pub(super) fn level(pin: i32) -> bool {
        LEVELS.load(Ordering::Acquire) & mask(pin) != 0
    }

    pub(super) fn set_level(pin: i32, high: bool) {
        if high {
            LEVELS.fetch_or(mask(pin), Ordering::AcqRel);
        } else {
            LEVELS.fetch_and(!mask(pin), Ordering::AcqRel);
        }
    }
}
