//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion.
//!
//! # Example
//!
//! ```
//! use preflight::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//!
//! // Use ui in code under test...
//! ui.message("Currently installed runtimes:");
//! ui.success("Done!");
//!
//! // Assert on captured interactions
//! assert!(ui.messages().contains(&"Currently installed runtimes:".to_string()));
//! assert!(ui.successes().contains(&"Done!".to_string()));
//! ```

use std::sync::{Arc, Mutex};

use super::{OutputMode, SpinnerHandle, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    pauses: Vec<String>,
    spinners: Vec<Arc<Mutex<MockSpinnerState>>>,
}

/// Status of a mock spinner when finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerStatus {
    /// Finished successfully.
    Success,
    /// Finished with error.
    Error,
}

#[derive(Debug, Default)]
struct MockSpinnerState {
    start_message: String,
    messages: Vec<String>,
    finish_message: Option<String>,
    status: Option<SpinnerStatus>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Get all captured messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get all captured success messages.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Get all captured warning messages.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Get all captured error messages.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Get all captured headers.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Get the messages of every pause requested.
    pub fn pauses(&self) -> &[String] {
        &self.pauses
    }

    /// Get all spinner messages that were started.
    pub fn spinners(&self) -> Vec<String> {
        self.spinners
            .iter()
            .filter_map(|s| s.lock().ok().map(|s| s.start_message.clone()))
            .collect()
    }

    /// Final message and status of each spinner, in start order.
    pub fn spinner_results(&self) -> Vec<(Option<String>, Option<SpinnerStatus>)> {
        self.spinners
            .iter()
            .filter_map(|s| {
                s.lock()
                    .ok()
                    .map(|s| (s.finish_message.clone(), s.status))
            })
            .collect()
    }

    /// Check if a message containing `needle` was shown through any channel.
    ///
    /// Spinner start, progress and finish messages are included.
    pub fn has_output(&self, needle: &str) -> bool {
        let shown = self
            .messages
            .iter()
            .chain(&self.successes)
            .chain(&self.warnings)
            .chain(&self.errors)
            .chain(&self.headers)
            .any(|m| m.contains(needle));
        shown
            || self.spinners.iter().any(|s| {
                s.lock().is_ok_and(|s| {
                    s.start_message.contains(needle)
                        || s.messages.iter().any(|m| m.contains(needle))
                        || s.finish_message.as_deref().is_some_and(|m| m.contains(needle))
                })
            })
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        let state = Arc::new(Mutex::new(MockSpinnerState {
            start_message: message.to_string(),
            ..Default::default()
        }));
        self.spinners.push(Arc::clone(&state));
        Box::new(MockSpinner { state })
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn pause(&mut self, message: &str) {
        self.pauses.push(message.to_string());
    }
}

/// Spinner handed out by [`MockUI`]; its state stays visible to the UI.
#[derive(Debug)]
pub struct MockSpinner {
    state: Arc<Mutex<MockSpinnerState>>,
}

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, msg: &str) {
        if let Ok(mut s) = self.state.lock() {
            s.messages.push(msg.to_string());
        }
    }

    fn finish_success(&mut self, msg: &str) {
        if let Ok(mut s) = self.state.lock() {
            s.finish_message = Some(msg.to_string());
            s.status = Some(SpinnerStatus::Success);
        }
    }

    fn finish_error(&mut self, msg: &str) {
        if let Ok(mut s) = self.state.lock() {
            s.finish_message = Some(msg.to_string());
            s.status = Some(SpinnerStatus::Error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_ui_captures_messages() {
        let mut ui = MockUI::new();
        ui.message("Hello");
        ui.success("Done");
        ui.warning("Careful");
        ui.error("Oops");
        assert_eq!(ui.messages(), &["Hello"]);
        assert_eq!(ui.successes(), &["Done"]);
        assert_eq!(ui.warnings(), &["Careful"]);
        assert_eq!(ui.errors(), &["Oops"]);
    }

    #[test]
    fn mock_ui_captures_headers_and_pauses() {
        let mut ui = MockUI::new();
        ui.show_header("TcNo Account Switcher");
        ui.pause("Press any key");
        assert_eq!(ui.headers(), &["TcNo Account Switcher"]);
        assert_eq!(ui.pauses(), &["Press any key"]);
    }

    #[test]
    fn mock_ui_tracks_spinner_outcome() {
        let mut ui = MockUI::new();
        let mut spinner = ui.start_spinner("Downloading WebView2");
        spinner.set_message("Installing WebView2");
        spinner.finish_error("failed");

        assert_eq!(ui.spinners(), vec!["Downloading WebView2"]);
        assert_eq!(
            ui.spinner_results(),
            vec![(Some("failed".to_string()), Some(SpinnerStatus::Error))]
        );
    }

    #[test]
    fn has_output_includes_spinner_progress() {
        let mut ui = MockUI::new();
        let mut spinner = ui.start_spinner("Downloading WebView2");
        spinner.set_message("Installing WebView2 Runtime...");
        assert!(ui.has_output("Installing WebView2"));
        assert!(!ui.has_output("Desktop"));
    }

    #[test]
    fn has_output_searches_all_channels() {
        let mut ui = MockUI::with_mode(OutputMode::Quiet);
        ui.warning("Missing: WebView2 Runtime");
        assert!(ui.has_output("WebView2"));
        assert!(!ui.has_output("Desktop"));
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }
}
