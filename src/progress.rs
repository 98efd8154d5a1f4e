//! Spinners shown while waiting on the API.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Start a spinner with a message; hidden when `visible` is false.
pub fn spinner(msg: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Run `f` under a spinner, clearing it afterwards.
pub fn with_spinner<T>(msg: &str, visible: bool, f: impl FnOnce() -> T) -> T {
    let pb = spinner(msg, visible);
    let result = f();
    pb.finish_and_clear();
    result
}
