/*!
Custom Snafu error printer
*/

use std::error::Error as StdError;

/// Error type of `main`. Its `Debug` output is what the process prints on
/// failure: the error itself followed by its numbered causes.
pub struct Report(Box<dyn StdError>);

impl Report {
    /// Causes of the error, outermost first.
    pub fn causes(&self) -> impl Iterator<Item = &(dyn StdError + 'static)> {
        std::iter::successors(self.0.source(), |&e| e.source())
    }
}

impl std::fmt::Debug for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.0)?;

        let mut causes = self.causes().enumerate().peekable();
        if causes.peek().is_some() {
            writeln!(f, "\nCaused by:")?;
        }
        for (i, e) in causes {
            writeln!(f, "  {}: {}", i, e)?;
        }

        Ok(())
    }
}

impl<E: Into<Box<dyn StdError>>> From<E> for Report {
    fn from(e: E) -> Self {
        Report(e.into())
    }
}
