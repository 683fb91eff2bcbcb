//! Compression effort settings accepted by the zlib writer.

use flate2::Compression;

/// Compression effort applied by [`ZlibOutStream`](crate::ZlibOutStream).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompressionLevel {
    /// zlib's default balance between speed and ratio.
    Default,
    /// An explicit zlib level in the range `0..=9`, where `0` stores data
    /// uncompressed and higher values trade throughput for ratio.
    Precise(u8),
}

impl CompressionLevel {
    /// Normalizes an arbitrary integer into a valid level.
    ///
    /// Values inside `0..=9` become [`CompressionLevel::Precise`]; anything
    /// else quietly falls back to [`CompressionLevel::Default`]. Callers
    /// rely on any integer being safe to pass, so out-of-range requests are
    /// never an error.
    #[must_use]
    pub fn from_numeric(level: i32) -> Self {
        if (0..=9).contains(&level) {
            Self::Precise(level as u8)
        } else {
            Self::Default
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::Default
    }
}

impl From<CompressionLevel> for Compression {
    fn from(level: CompressionLevel) -> Self {
        match level {
            CompressionLevel::Default => Compression::default(),
            // Precise values outside 0..=9 cannot come from `from_numeric`,
            // but a hand-built variant is still clamped into zlib's range.
            CompressionLevel::Precise(value) => Compression::new(u32::from(value.min(9))),
        }
    }
}
