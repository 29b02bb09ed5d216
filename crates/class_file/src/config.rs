/// Class file major version of Java 11, the newest release this runtime
/// accepts by default.
pub const MAX_JAVA_VERSION_RAW: u16 = 55;

/// Read-only knobs threaded into the parser and the format checker. Passing
/// these by value keeps the pipeline re-entrant; there is no process-wide
/// state behind them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfig {
    /// Highest `major_version` accepted, in raw class file terms.
    pub max_java_version_raw: u16,
    /// Emit a trace line for every class that passes the format check.
    pub trace_format_check: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_java_version_raw: MAX_JAVA_VERSION_RAW,
            trace_format_check: false,
        }
    }
}
