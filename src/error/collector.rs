//! Accumulation of lexical errors
//!
//! The lexer never aborts on a bad character; it records the problem here and
//! keeps scanning so a single pass reports every lexical error.

use super::{NahualError, NahualResult};

#[derive(Debug, Default, Clone)]
pub struct ErrorCollector {
    errors: Vec<NahualError>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: NahualError) {
        tracing::debug!(%error, "lexical error");
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[NahualError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<NahualError> {
        self.errors
    }

    /// Report the collected errors as one batch.
    ///
    /// The first error is returned with the remaining ones attached as
    /// related errors.
    pub fn into_result(self) -> NahualResult<()> {
        let mut errors = self.errors.into_iter();
        match errors.next() {
            None => Ok(()),
            Some(first) => Err(first.with_related(errors.collect())),
        }
    }
}
