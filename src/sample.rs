/// Default number of bytes sampled from a reader.
pub const DEFAULT_SAMPLE_BYTES: usize = 64 * 1024;

/// Default size of the chunks fed to the detector.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Sample size configuration for sniffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleSize {
    /// Sample at most this many bytes.
    Bytes(usize),
    /// Read the entire input.
    ///
    /// Input is streamed in chunks, so memory use stays bounded, but a large
    /// file with no early confirmation is read to the end.
    All,
}

impl Default for SampleSize {
    fn default() -> Self {
        SampleSize::Bytes(DEFAULT_SAMPLE_BYTES)
    }
}

impl SampleSize {
    /// Returns the byte limit, or None for All.
    pub fn bytes(&self) -> Option<usize> {
        match self {
            SampleSize::Bytes(n) => Some(*n),
            SampleSize::All => None,
        }
    }
}
