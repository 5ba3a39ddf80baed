//! Rotary-encoder driven LCD menus.
//!
//! ```text
//!   MainMenu ──[select TIMERS]──▶ TimerEditor ──[select row]──▶ edit mode
//!      ▲                              │                            │
//!      └──────────[stop signal]───────┴────────────────────────────┘
//! ```
//!
//! Both screens are built on [`cursor::MenuCursor`]; the editor pairs two
//! of them (keys and values) through [`paired::PairedCursor`].  Every loop
//! here re-checks the stop signal once per iteration and returns when it
//! is raised; nothing else leaves a menu.

pub mod cursor;
pub mod editor;
pub mod main_menu;
pub mod paired;

pub use cursor::MenuCursor;
pub use editor::TimerEditor;
pub use main_menu::MainMenu;
pub use paired::PairedCursor;

/// Pause between menu loop iterations (ms).
pub const MENU_POLL_MS: u32 = 20;
/// Pause after the first draw of a menu screen (ms).
pub const MENU_SETTLE_MS: u32 = 300;
/// Pause after entering edit mode (ms).
pub const EDIT_ENTER_MS: u32 = 500;
/// Pause after a commit (ms).
pub const COMMIT_SETTLE_MS: u32 = 300;
/// Minimum interval between value field redraws while editing (ms).
pub const EDIT_REDRAW_MS: u64 = 200;

/// The operator panel: character display plus rotary encoder.
pub struct Panel<D, E> {
    pub display: D,
    pub encoder: E,
}

impl<D, E> Panel<D, E> {
    pub fn new(display: D, encoder: E) -> Self {
        Self { display, encoder }
    }
}
