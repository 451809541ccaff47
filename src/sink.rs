use std::io;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::constants::CHANNELS;

/// Delivery target for processed audio.
///
/// The pipeline converts to the sink's preferred sample format before
/// writing: float sinks receive normalized f32, the rest get 16-bit PCM.
pub trait AudioSink: Send {
    /// Whether the sink wants f32 samples (true) or 16-bit PCM (false).
    fn prefers_float(&self) -> bool {
        true
    }

    fn write_float(&mut self, samples: &[f32]) -> io::Result<()>;

    fn write_s16(&mut self, samples: &[i16]) -> io::Result<()>;
}

/// Discards everything it is given.
pub struct NullSink;

impl AudioSink for NullSink {
    fn write_float(&mut self, _samples: &[f32]) -> io::Result<()> {
        Ok(())
    }

    fn write_s16(&mut self, _samples: &[i16]) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Default)]
struct MemoryBuffers {
    float_samples: Vec<f32>,
    s16_samples: Vec<i16>,
}

/// Appends into shared in-memory buffers that stay inspectable through any
/// clone of the sink, including after the pipeline has consumed one.
#[derive(Clone)]
pub struct MemorySink {
    shared: Arc<Mutex<MemoryBuffers>>,
    prefer_float: bool,
}

impl MemorySink {
    /// A sink that asks for f32 samples.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(MemoryBuffers::default())),
            prefer_float: true,
        }
    }

    /// A sink that asks for 16-bit PCM.
    pub fn with_s16_output() -> Self {
        Self {
            prefer_float: false,
            ..Self::new()
        }
    }

    pub fn float_samples(&self) -> Vec<f32> {
        self.shared.lock().float_samples.clone()
    }

    pub fn s16_samples(&self) -> Vec<i16> {
        self.shared.lock().s16_samples.clone()
    }

    /// Total frames captured so far, across both formats.
    pub fn frames(&self) -> usize {
        let buffers = self.shared.lock();
        (buffers.float_samples.len() + buffers.s16_samples.len()) / CHANNELS
    }

    pub fn clear(&self) {
        let mut buffers = self.shared.lock();
        buffers.float_samples.clear();
        buffers.s16_samples.clear();
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSink for MemorySink {
    fn prefers_float(&self) -> bool {
        self.prefer_float
    }

    fn write_float(&mut self, samples: &[f32]) -> io::Result<()> {
        self.shared.lock().float_samples.extend_from_slice(samples);
        Ok(())
    }

    fn write_s16(&mut self, samples: &[i16]) -> io::Result<()> {
        self.shared.lock().s16_samples.extend_from_slice(samples);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_same_buffers() {
        let handle = MemorySink::new();
        let mut sink = handle.clone();

        sink.write_float(&[0.1, -0.1, 0.2, -0.2]).unwrap();
        assert_eq!(handle.float_samples(), vec![0.1, -0.1, 0.2, -0.2]);
        assert_eq!(handle.frames(), 2);
    }

    #[test]
    fn format_preference_follows_the_constructor() {
        assert!(MemorySink::new().prefers_float());
        assert!(!MemorySink::with_s16_output().prefers_float());
    }

    #[test]
    fn clear_empties_both_buffers() {
        let handle = MemorySink::with_s16_output();
        let mut sink = handle.clone();
        sink.write_s16(&[100, -100]).unwrap();
        sink.write_float(&[0.5, 0.5]).unwrap();

        handle.clear();
        assert_eq!(handle.frames(), 0);
        assert!(handle.s16_samples().is_empty());
    }

    #[test]
    fn null_sink_swallows_writes() {
        let mut sink = NullSink;
        assert!(sink.write_float(&[0.0; 64]).is_ok());
        assert!(sink.write_s16(&[0; 64]).is_ok());
    }
}
