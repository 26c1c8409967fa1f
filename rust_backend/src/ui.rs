//! User-facing feedback sink.
//!
//! The OB generator reports what it does through [`Ui`]: log lines (plain or preformatted
//! tables), a progress fraction during submission, and info/warning pop-ups.

/// Feedback sink of the OB generator.
pub trait Ui {
    /// Append to the log. `formatted` is false for preformatted blocks such as
    /// parameter tables, which should be shown verbatim.
    fn add_to_log(&mut self, message: &str, formatted: bool);

    fn set_progress(&mut self, fraction: f64);

    fn show_info_message(&mut self, message: &str);

    fn show_warning_message(&mut self, message: &str);
}

/// Forwards everything to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogUi;

impl Ui for LogUi {
    fn add_to_log(&mut self, message: &str, formatted: bool) {
        if formatted {
            log::info!("{}", message);
        } else {
            log::debug!("\n{}", message);
        }
    }

    fn set_progress(&mut self, fraction: f64) {
        log::debug!("progress {:.0}%", fraction * 100.0);
    }

    fn show_info_message(&mut self, message: &str) {
        log::info!("{}", message);
    }

    fn show_warning_message(&mut self, message: &str) {
        log::warn!("{}", message);
    }
}

/// Keeps every message, for inspection in tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingUi {
    pub log: Vec<String>,
    pub progress: Vec<f64>,
    pub infos: Vec<String>,
    pub warnings: Vec<String>,
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_contains(&self, needle: &str) -> bool {
        self.log.iter().any(|line| line.contains(needle))
    }
}

impl Ui for RecordingUi {
    fn add_to_log(&mut self, message: &str, _formatted: bool) {
        self.log.push(message.to_string());
    }

    fn set_progress(&mut self, fraction: f64) {
        self.progress.push(fraction);
    }

    fn show_info_message(&mut self, message: &str) {
        self.infos.push(message.to_string());
    }

    fn show_warning_message(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }
}
