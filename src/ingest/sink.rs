use crate::errors::AppResult;
use crate::models::reading::Reading;

/// Destination of decoded readings.
///
/// A sink receives whole batches and either stores all of them or fails;
/// it never sees a partially decoded chunk. Duplicates are accepted.
pub trait ReadingSink {
    fn write_batch(&mut self, batch: &[Reading]) -> AppResult<()>;
}

/// In-memory sink, mostly useful for dry runs and tests.
impl ReadingSink for Vec<Reading> {
    fn write_batch(&mut self, batch: &[Reading]) -> AppResult<()> {
        self.extend_from_slice(batch);
        Ok(())
    }
}

impl<S: ReadingSink + ?Sized> ReadingSink for &mut S {
    fn write_batch(&mut self, batch: &[Reading]) -> AppResult<()> {
        (**self).write_batch(batch)
    }
}
