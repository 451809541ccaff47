use crate::constants::CHANNELS;

/// Fixed-capacity ring of interleaved stereo frames, shared by the delay
/// based effects (echo, chorus, vibrato).
///
/// The cursor marks the slot written this frame; `read_back(n)` looks `n`
/// frames into the past, with `read_back(0)` returning the cursor slot
/// itself. Callers advance the cursor exactly once per processed frame.
pub struct DelayRing {
    buf: Vec<f32>,
    capacity: usize,
    cursor: usize,
}

impl DelayRing {
    /// Allocate a zeroed ring of `frames` stereo frames. Callers validate
    /// `frames > 0` before construction.
    pub fn new(frames: usize) -> Self {
        Self {
            buf: vec![0.0; frames * CHANNELS],
            capacity: frames,
            cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The frame at the cursor.
    pub fn frame(&self) -> [f32; 2] {
        let i = self.cursor * CHANNELS;
        [self.buf[i], self.buf[i + 1]]
    }

    /// Overwrite the frame at the cursor.
    pub fn store(&mut self, left: f32, right: f32) {
        let i = self.cursor * CHANNELS;
        self.buf[i] = left;
        self.buf[i + 1] = right;
    }

    /// Step the cursor forward one frame, wrapping at capacity.
    pub fn advance(&mut self) {
        self.cursor += 1;
        if self.cursor == self.capacity {
            self.cursor = 0;
        }
    }

    /// The frame `behind` frames before the cursor, wrapping. `behind` must
    /// be less than the capacity.
    pub fn read_back(&self, behind: usize) -> [f32; 2] {
        debug_assert!(behind < self.capacity);
        let idx = (self.cursor + self.capacity - behind) % self.capacity;
        let i = idx * CHANNELS;
        [self.buf[i], self.buf[i + 1]]
    }

    /// Zero the contents and rewind the cursor; capacity is preserved.
    pub fn clear(&mut self) {
        self.buf.fill(0.0);
        self.cursor = 0;
    }
}
