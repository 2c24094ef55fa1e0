//! Receive monitor
//!
//! One call to [`Monitor::render`] is one iteration of the firmware's main
//! loop: every slot is read once and pushed to the display sink with the
//! configured label. The firmware calls it forever; there is no exit.

use crate::config::MonitorConfig;
use crate::sampler::SampleReader;
use crate::traits::{DisplayError, DisplaySink};

/// Renders receive slots to a display
pub struct Monitor<'a, const N: usize> {
    reader: SampleReader<'a, N>,
    config: MonitorConfig,
}

impl<'a, const N: usize> Monitor<'a, N> {
    /// Create a monitor over a sampler's read-only view
    pub fn new(reader: SampleReader<'a, N>, config: MonitorConfig) -> Self {
        Self { reader, config }
    }

    /// Get the configuration
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Render every slot once
    ///
    /// Slots that do not fit on the screen are skipped. Stops at the first
    /// display error; the next pass starts again from slot 0.
    pub fn render<D: DisplaySink>(&self, display: &mut D) -> Result<(), DisplayError> {
        for (index, value) in self.reader.iter() {
            if let Some((half, line)) = self.config.placement(index) {
                display.message(half, line, self.config.label, i32::from(value))?;
            }
        }
        Ok(())
    }
}
