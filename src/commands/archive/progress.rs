use std::io::IsTerminal;
use std::time::Duration;

use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};

use super::retry::CooldownNotice;

const TEMPLATE: &str = "{pos} downloaded.";

enum Lines {
    /// Printed above the visible counter.
    AboveBar,
    /// Printed plainly to stderr.
    Plain,
    #[cfg(test)]
    Captured(std::cell::RefCell<Vec<String>>),
}

/// Running download counter, redrawn in place on stderr.
///
/// When stderr is not a terminal the counter is hidden and status lines are
/// printed plainly instead.
pub struct Progress {
    bar: ProgressBar,
    lines: Lines,
}

impl Progress {
    /// Counter on stderr, visible only when stderr is a terminal.
    pub fn stderr() -> Self {
        if std::io::stderr().is_terminal() {
            let style = ProgressStyle::with_template(TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            let bar = ProgressBar::new_spinner().with_style(style);
            bar.tick();
            Self {
                bar,
                lines: Lines::AboveBar,
            }
        } else {
            Self::hidden()
        }
    }

    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            lines: Lines::Plain,
        }
    }

    /// Hidden counter that keeps status lines for inspection.
    #[cfg(test)]
    pub fn capturing() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            lines: Lines::Captured(Default::default()),
        }
    }

    #[cfg(test)]
    pub fn captured(&self) -> Vec<String> {
        match &self.lines {
            Lines::Captured(lines) => lines.borrow().clone(),
            _ => Vec::new(),
        }
    }

    /// Count one more archived issue.
    pub fn inc(&self) {
        self.bar.inc(1);
    }

    #[cfg(test)]
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Print a line without disturbing the counter.
    pub fn status(&self, message: &str) {
        match &self.lines {
            Lines::AboveBar => self.bar.println(message),
            Lines::Plain => eprintln!("{message}"),
            #[cfg(test)]
            Lines::Captured(lines) => lines.borrow_mut().push(message.to_string()),
        }
    }

    /// Stop redrawing, leaving the final count on screen.
    pub fn finish(&self) {
        self.bar.finish();
    }
}

impl CooldownNotice for Progress {
    fn cooling_down(&self, _attempt: u32, cooldown: Duration) {
        self.status(&cooldown_message(
            &Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            cooldown,
        ));
    }
}

fn cooldown_message(now: &str, cooldown: Duration) -> String {
    let secs = cooldown.as_secs();
    let wait = if secs >= 60 && secs % 60 == 0 {
        format!("{} minutes", secs / 60)
    } else {
        format!("{secs} seconds")
    };
    format!("[{now}] Rate limit error. Sleeping for {wait}.")
}
