//! Audio format extraction from raw-PCM MIME descriptors
//!
//! Gemini returns audio as e.g. `audio/L16;codec=pcm;rate=24000`. Anything
//! that cannot be read falls back to the 16-bit / 24 kHz / mono default;
//! there is no failure mode.

/// Descriptor assumed when the upstream sends none
pub const DEFAULT_MIME_TYPE: &str = "audio/L16;rate=24000";

const DEFAULT_BITS_PER_SAMPLE: u16 = 16;
const DEFAULT_SAMPLE_RATE: u32 = 24_000;
const CHANNELS: u16 = 1;

/// Raw PCM format parameters needed for a WAV header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self {
            channels: CHANNELS,
            sample_rate: DEFAULT_SAMPLE_RATE,
            bits_per_sample: DEFAULT_BITS_PER_SAMPLE,
        }
    }
}

impl AudioFormat {
    /// Read the format from a MIME descriptor, substituting defaults
    pub fn from_mime_type(mime_type: Option<&str>) -> Self {
        let descriptor = mime_type
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE);

        let mut segments = descriptor.split(';').map(str::trim);
        let essence = segments.next().unwrap_or_default();

        let bits_per_sample = essence
            .split_once('/')
            .and_then(|(_, subtype)| bits_from_subtype(subtype))
            .unwrap_or(DEFAULT_BITS_PER_SAMPLE);

        let sample_rate = segments
            .filter_map(|param| param.split_once('='))
            .filter(|(key, _)| key.trim().eq_ignore_ascii_case("rate"))
            .filter_map(|(_, value)| value.trim().parse::<u32>().ok())
            .filter(|rate| *rate > 0)
            .next_back()
            .unwrap_or(DEFAULT_SAMPLE_RATE);

        Self {
            channels: CHANNELS,
            sample_rate,
            bits_per_sample,
        }
    }

    pub const fn bytes_per_sample(&self) -> u16 {
        self.bits_per_sample / 8
    }

    pub const fn block_align(&self) -> u16 {
        self.channels * self.bytes_per_sample()
    }

    pub fn byte_rate(&self) -> u32 {
        self.sample_rate.saturating_mul(u32::from(self.block_align()))
    }
}

/// `L16` -> 16, `l8` -> 8, anything else -> None
fn bits_from_subtype(subtype: &str) -> Option<u16> {
    let digits = subtype.strip_prefix('L').or_else(|| subtype.strip_prefix('l'))?;
    digits.parse::<u16>().ok().filter(|bits| *bits > 0 && bits % 8 == 0)
}
