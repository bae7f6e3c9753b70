//! RIFF/WAV framing for raw synthesis output.

use crate::error::VoiceError;
use std::io::Cursor;

/// Size of the canonical PCM WAV header.
pub const WAV_HEADER_LEN: usize = 44;

/// Wraps mono signed 16-bit little-endian PCM in a WAV container so the
/// telephony gateway can play it from a URL.
///
/// A trailing odd byte is not a whole sample and is dropped.
pub fn wrap_pcm_s16le(pcm: &[u8], sample_rate: u32) -> Result<Vec<u8>, VoiceError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut wav = Cursor::new(Vec::with_capacity(WAV_HEADER_LEN + pcm.len()));
    let mut writer = hound::WavWriter::new(&mut wav, spec)
        .map_err(|e| VoiceError::Synthesis(format!("failed to create WAV writer: {}", e)))?;
    for sample in pcm.chunks_exact(2) {
        writer
            .write_sample(i16::from_le_bytes([sample[0], sample[1]]))
            .map_err(|e| VoiceError::Synthesis(format!("failed to write WAV sample: {}", e)))?;
    }
    writer
        .finalize()
        .map_err(|e| VoiceError::Synthesis(format!("failed to finalize WAV: {}", e)))?;

    Ok(wav.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u16_at(buf: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes([buf[offset], buf[offset + 1]])
    }

    fn u32_at(buf: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
    }

    #[test]
    fn header_describes_payload() {
        let pcm: Vec<u8> = (0..1600u32).map(|i| (i % 251) as u8).collect();
        let wav = wrap_pcm_s16le(&pcm, 8000).unwrap();

        assert_eq!(wav.len(), WAV_HEADER_LEN + pcm.len());
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(u32_at(&wav, 4), 36 + 1600);
        assert_eq!(u16_at(&wav, 20), 1); // PCM
        assert_eq!(u16_at(&wav, 22), 1);
        assert_eq!(u32_at(&wav, 24), 8000);
        assert_eq!(u32_at(&wav, 28), 16000);
        assert_eq!(u16_at(&wav, 34), 16);
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(u32_at(&wav, 40), 1600);
        assert_eq!(&wav[WAV_HEADER_LEN..], &pcm[..]);
    }

    #[test]
    fn output_reads_back_as_mono_pcm() {
        let samples: [i16; 4] = [0, 1200, -1200, i16::MAX];
        let pcm: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        let wav = wrap_pcm_s16le(&pcm, 16000).unwrap();

        let mut reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.spec().sample_rate, 16000);
        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded, samples);
    }

    #[test]
    fn odd_trailing_byte_is_dropped() {
        let wav = wrap_pcm_s16le(&[1, 2, 3], 8000).unwrap();
        assert_eq!(wav.len(), WAV_HEADER_LEN + 2);
        assert_eq!(u32_at(&wav, 40), 2);
    }
}
