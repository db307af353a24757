//! In-memory sample source

use contracts::{ContractError, Reading, SampleSource};

/// Replays a fixed vector of readings
#[derive(Debug, Clone)]
pub struct VecSource {
    source_id: String,
    readings: std::vec::IntoIter<Reading>,
}

impl VecSource {
    pub fn new(source_id: impl Into<String>, readings: Vec<Reading>) -> Self {
        Self {
            source_id: source_id.into(),
            readings: readings.into_iter(),
        }
    }

    /// Readings not yet handed out
    pub fn remaining(&self) -> usize {
        self.readings.len()
    }
}

impl FromIterator<Reading> for VecSource {
    fn from_iter<I: IntoIterator<Item = Reading>>(iter: I) -> Self {
        Self::new("memory", iter.into_iter().collect())
    }
}

impl SampleSource for VecSource {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn next_reading(&mut self) -> Option<Result<Reading, ContractError>> {
        self.readings.next().map(Ok)
    }
}
