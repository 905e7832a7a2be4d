use colored::Colorize;
use meetflow::{Notifier, Severity};

/// Renders notifications as colored terminal lines.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Success => println!("{} {message}", "ok".green().bold()),
            Severity::Info => println!("{} {message}", "info".blue().bold()),
            Severity::Warning => eprintln!("{} {message}", "warn".yellow().bold()),
            Severity::Error => eprintln!("{} {message}", "error".red().bold()),
        }
    }
}
