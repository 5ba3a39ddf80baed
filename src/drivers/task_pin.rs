//! Background tasks of the gate controller.
//!
//! | Task      | Core | Priority | Body                     |
//! |-----------|------|----------|--------------------------|
//! | `stop`    | App  | 10       | `StopCoordinator::run`   |
//! | `encoder` | Pro  | 6        | `RotaryEncoder::run`     |
//! | main      | App  | 5        | `Controller::run`        |
//!
//! The stop task outranks the main loop so a press is handled while the
//! main loop sits in a countdown or a held `write_pin`.
//!
//! On ESP-IDF, `esp_pthread_set_cfg()` configures the next
//! `pthread_create()` from the calling thread, so a spawn must not be
//! interleaved with other thread creation.  Host builds ignore core and
//! priority.

/// CPU core of the dual-core ESP32.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Core {
    /// Core 0 (PRO_CPU).
    Pro = 0,
    /// Core 1 (APP_CPU), control loop and stop handling.
    App = 1,
}

/// Placement of one background task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSpec {
    /// NUL-terminated, handed to FreeRTOS as-is.
    pub name: &'static str,
    pub core: Core,
    pub priority: u8,
    pub stack_kb: usize,
}

impl TaskSpec {
    /// Name without the trailing NUL.
    pub fn label(&self) -> &'static str {
        self.name.trim_end_matches('\0')
    }
}

/// Stop handling: debounce, indicator, signal raise.
pub const STOP_TASK: TaskSpec = TaskSpec {
    name: "stop\0",
    core: Core::App,
    priority: 10,
    stack_kb: 4,
};

/// Encoder pin sampler.
pub const ENCODER_TASK: TaskSpec = TaskSpec {
    name: "encoder\0",
    core: Core::Pro,
    priority: 6,
    stack_kb: 4,
};

/// Start `f` on its own thread placed as `spec` says.
pub fn spawn(
    spec: TaskSpec,
    f: impl FnOnce() + Send + 'static,
) -> std::io::Result<std::thread::JoinHandle<()>> {
    pin_next_thread(&spec)?;
    log::info!(
        "task '{}': core {:?}, pri {}, {} KB stack",
        spec.label(),
        spec.core,
        spec.priority,
        spec.stack_kb
    );

    std::thread::Builder::new()
        .name(spec.label().into())
        .stack_size(spec.stack_kb * 1024)
        .spawn(f)
}

#[cfg(target_os = "espidf")]
fn pin_next_thread(spec: &TaskSpec) -> std::io::Result<()> {
    // SAFETY: the config struct is copied by esp_pthread_set_cfg; the
    // name pointer is 'static and NUL-terminated.
    let ret = unsafe {
        let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
        cfg.pin_to_core = spec.core as i32;
        cfg.prio = i32::from(spec.priority);
        cfg.stack_size = (spec.stack_kb * 1024) as i32;
        cfg.thread_name = spec.name.as_ptr().cast();
        esp_idf_sys::esp_pthread_set_cfg(&cfg)
    };
    if ret == esp_idf_sys::ESP_OK as i32 {
        Ok(())
    } else {
        Err(std::io::Error::other(format!(
            "esp_pthread_set_cfg({}) failed: {ret}",
            spec.label()
        )))
    }
}

#[cfg(not(target_os = "espidf"))]
fn pin_next_thread(_spec: &TaskSpec) -> std::io::Result<()> {
    Ok(())
}
