/// Sample rate of the `pcm_24000` output format.
pub const PCM_SAMPLE_RATE: u32 = 24_000;

/// Turns a stream of little-endian 16-bit mono PCM chunks into samples.
///
/// Network chunks do not respect sample boundaries; an odd trailing byte is
/// held back and joined with the first byte of the next chunk.
#[derive(Debug, Default)]
pub struct PcmDecoder {
    carry: Option<u8>,
}

impl PcmDecoder {
    pub fn decode(&mut self, chunk: &[u8]) -> Vec<i16> {
        let mut samples = Vec::with_capacity(chunk.len().div_ceil(2));
        let mut bytes = chunk;

        if let Some(low) = self.carry.take() {
            match bytes.split_first() {
                Some((&high, rest)) => {
                    samples.push(i16::from_le_bytes([low, high]));
                    bytes = rest;
                }
                None => {
                    self.carry = Some(low);
                    return samples;
                }
            }
        }

        let mut pairs = bytes.chunks_exact(2);
        samples.extend(pairs.by_ref().map(|pair| i16::from_le_bytes([pair[0], pair[1]])));
        self.carry = pairs.remainder().first().copied();
        samples
    }

    /// True when half a sample is still waiting for its second byte.
    pub fn has_remainder(&self) -> bool {
        self.carry.is_some()
    }
}
