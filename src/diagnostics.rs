//! Warning aggregation and diagnostic summaries.

/// Details about an item that was skipped.
#[derive(Debug, Clone)]
pub struct SkippedItem {
    /// Item name or path.
    pub(crate) name: String,
    /// Reason the item was skipped.
    pub(crate) reason: String,
}

/// Aggregates warnings and skipped items for a command run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    /// Whether verbose detail lines are printed.
    verbose: bool,
    /// Collected warning messages.
    warnings: Vec<String>,
    /// Collected skipped item records.
    skipped: Vec<SkippedItem>,
}

impl Diagnostics {
    /// Create a new diagnostics collector.
    pub(crate) fn new(verbose: bool) -> Self {
        Self {
            verbose,
            warnings: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Record a warning and print it immediately.
    pub(crate) fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        eprintln!("Warning: {message}");
        self.warnings.push(message);
    }

    /// Print a detail line when running verbosely.
    pub(crate) fn detail(&self, message: impl Into<String>) {
        if self.verbose {
            eprintln!("{}", message.into());
        }
    }

    /// Record a skipped item and emit the warning.
    pub(crate) fn warn_skipped(&mut self, name: impl Into<String>, reason: impl Into<String>) {
        let name = name.into();
        let reason = reason.into();
        self.warn(format!("{name} - {reason}"));
        self.skipped.push(SkippedItem { name, reason });
    }

    /// Return the skipped items recorded so far.
    #[cfg(test)]
    pub(crate) fn skipped(&self) -> &[SkippedItem] {
        &self.skipped
    }

    /// Print a summary for skipped items if any were recorded.
    pub(crate) fn print_skipped_summary(&self) {
        if self.skipped.is_empty() {
            return;
        }

        eprintln!("Skipped {} item(s):", self.skipped.len());
        for skipped in &self.skipped {
            eprintln!("  - {}: {}", skipped.name, skipped.reason);
        }
    }

    /// Print a warning summary when warnings were emitted.
    pub(crate) fn print_warning_summary(&self) {
        if self.warnings.is_empty() {
            return;
        }

        eprintln!("Completed with {} warning(s).", self.warnings.len());
    }
}
