//! Cancellable on-screen countdown.

use crate::app::ports::{Clock, DisplayPort, GpioPort};
use crate::app::screen::{COUNTDOWN_BLANK, COUNTDOWN_COL, COUNTDOWN_ROW, lcd_line};
use crate::io::DigitalIo;

const SECOND_MS: u64 = 1000;

/// Count `secs` down to 1, one display update per second.
///
/// Each second is rendered before the stop signal is checked, and the
/// sleep covers whatever is left of that second after rendering.  Returns
/// `false` if the stop signal cut the countdown short.  The field is blank
/// on return either way.
pub fn count_down<G: GpioPort, C: Clock, D: DisplayPort>(
    io: &mut DigitalIo<'_, G, C>,
    display: &mut D,
    secs: u16,
) -> bool {
    let mut completed = true;

    for remaining in (1..=secs).rev() {
        let start = io.now_ms();
        display.write_line(
            &lcd_line(format_args!("{remaining:<4}")),
            COUNTDOWN_ROW,
            COUNTDOWN_COL,
        );

        if io.stop_signal().is_raised() {
            completed = false;
            break;
        }

        let left = SECOND_MS.saturating_sub(io.clock().elapsed_ms(start));
        io.sleep_ms(u32::try_from(left).unwrap_or(u32::MAX));
    }

    display.write_line(COUNTDOWN_BLANK, COUNTDOWN_ROW, COUNTDOWN_COL);
    completed
}
