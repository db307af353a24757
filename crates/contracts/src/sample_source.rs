//! SampleSource trait - Sample data source abstraction
//!
//! Decouples the detector from where readings come from: a live sensor driver,
//! a CSV replay file, an in-memory vector or a synthetic generator.

use crate::{ContractError, Reading};

/// Sample data source trait
///
/// The detector pulls exactly one reading per processing step and performs
/// no retry or buffering of its own. Any blocking or polling belongs to the
/// implementation.
///
/// # Example
///
/// ```ignore
/// let mut source: Box<dyn SampleSource> = open_source();
/// while let Some(reading) = source.next_reading() {
///     let reading = reading?;
///     detector.process(&reading);
/// }
/// ```
pub trait SampleSource {
    /// Identifier used in logs and errors
    fn source_id(&self) -> &str;

    /// Pull the next reading
    ///
    /// Returns `None` once the source is exhausted. An `Err` item reports a
    /// sample the source could not produce; callers decide whether to stop.
    fn next_reading(&mut self) -> Option<Result<Reading, ContractError>>;
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn source_id(&self) -> &str {
        (**self).source_id()
    }

    fn next_reading(&mut self) -> Option<Result<Reading, ContractError>> {
        (**self).next_reading()
    }
}
