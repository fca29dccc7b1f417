//! Container sniffing and WAV handling.

use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

/// Output sample width the asset tree standardizes on.
pub const PCM_BITS: u16 = 16;

/// The container a byte stream actually is, regardless of its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Wav,
    Mp3,
    Ogg,
    Flac,
    Unknown,
}

impl AudioFormat {
    /// Identify a container from its leading magic bytes.
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WAVE" {
            AudioFormat::Wav
        } else if bytes.starts_with(b"ID3")
            || (bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] & 0xE0 == 0xE0)
        {
            AudioFormat::Mp3
        } else if bytes.starts_with(b"OggS") {
            AudioFormat::Ogg
        } else if bytes.starts_with(b"fLaC") {
            AudioFormat::Flac
        } else {
            AudioFormat::Unknown
        }
    }

    /// Read just enough of a file to [`detect`](Self::detect) its container.
    pub fn sniff_file(path: &Path) -> std::io::Result<Self> {
        let mut head = Vec::with_capacity(12);
        File::open(path)?.take(12).read_to_end(&mut head)?;
        Ok(Self::detect(&head))
    }

    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "wav" | "wave" => AudioFormat::Wav,
            "mp3" => AudioFormat::Mp3,
            "ogg" | "oga" | "opus" => AudioFormat::Ogg,
            "flac" => AudioFormat::Flac,
            _ => AudioFormat::Unknown,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AudioFormat::Wav => "WAV",
            AudioFormat::Mp3 => "MP3",
            AudioFormat::Ogg => "Ogg",
            AudioFormat::Flac => "FLAC",
            AudioFormat::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Header facts of a WAV stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavInfo {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    /// Samples per channel.
    pub frames: u32,
}

impl WavInfo {
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames as f64 / self.sample_rate as f64
    }
}

pub fn probe_wav<R: Read>(reader: R) -> Result<WavInfo, hound::Error> {
    let wav = hound::WavReader::new(reader)?;
    let spec = wav.spec();
    Ok(WavInfo {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bits_per_sample: spec.bits_per_sample,
        frames: wav.duration(),
    })
}

pub fn probe_wav_file(path: &Path) -> Result<WavInfo, hound::Error> {
    probe_wav(BufReader::new(File::open(path)?))
}

/// Encode mono f32 samples in [-1, 1] as 16-bit PCM WAV.
pub fn encode_pcm16(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, hound::Error> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: PCM_BITS,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for &sample in samples {
            writer.write_sample((sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

/// Re-encode a WAV payload as 16-bit mono PCM, downmixing by averaging.
///
/// The sample rate is kept as is. Payloads that already conform are returned
/// untouched.
pub fn normalize_wav(bytes: &[u8]) -> Result<Cow<'_, [u8]>, hound::Error> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();
    if spec.channels == 1
        && spec.bits_per_sample == PCM_BITS
        && spec.sample_format == hound::SampleFormat::Int
    {
        return Ok(Cow::Borrowed(bytes));
    }

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()?
        }
    };

    let channels = usize::from(spec.channels.max(1));
    let mono: Vec<f32> = samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect();

    log::debug!(
        "Normalized {}ch {}-bit WAV to mono 16-bit ({} frames)",
        spec.channels,
        spec.bits_per_sample,
        mono.len()
    );
    encode_pcm16(&mono, spec.sample_rate).map(Cow::Owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float_stereo_wav(sample_rate: u32, frames: usize) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for i in 0..frames {
                let v = (i as f32 / frames as f32) - 0.5;
                writer.write_sample(v).unwrap();
                writer.write_sample(v).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn detects_containers_by_magic_bytes() {
        let wav = encode_pcm16(&[0.0; 10], 22050).unwrap();
        assert_eq!(AudioFormat::detect(&wav), AudioFormat::Wav);
        assert_eq!(AudioFormat::detect(b"ID3\x04\x00rest"), AudioFormat::Mp3);
        assert_eq!(AudioFormat::detect(&[0xFF, 0xFB, 0x90, 0x64]), AudioFormat::Mp3);
        assert_eq!(AudioFormat::detect(b"OggS\x00"), AudioFormat::Ogg);
        assert_eq!(AudioFormat::detect(b"fLaC\x00"), AudioFormat::Flac);
        assert_eq!(AudioFormat::detect(b"RIFF\x00\x00\x00\x00AVI "), AudioFormat::Unknown);
        assert_eq!(AudioFormat::detect(b""), AudioFormat::Unknown);
    }

    #[test]
    fn sniffs_files_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.wav");
        std::fs::write(&path, b"ID3\x03\x00\x00\x00\x00\x00\x00").unwrap();
        assert_eq!(AudioFormat::sniff_file(&path).unwrap(), AudioFormat::Mp3);
    }

    #[test]
    fn encodes_sixteen_bit_mono() {
        let bytes = encode_pcm16(&vec![0.25; 22050], 22050).unwrap();
        let info = probe_wav(Cursor::new(&bytes)).unwrap();
        assert_eq!(info.channels, 1);
        assert_eq!(info.bits_per_sample, 16);
        assert_eq!(info.frames, 22050);
        assert!((info.duration_secs() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn normalizes_float_stereo_to_pcm16_mono() {
        let input = float_stereo_wav(24000, 4800);
        let output = normalize_wav(&input).unwrap();
        assert!(matches!(output, Cow::Owned(_)));

        let info = probe_wav(Cursor::new(output.as_ref())).unwrap();
        assert_eq!(
            info,
            WavInfo {
                sample_rate: 24000,
                channels: 1,
                bits_per_sample: 16,
                frames: 4800,
            }
        );
    }

    #[test]
    fn conforming_wav_passes_through_unchanged() {
        let input = encode_pcm16(&[0.1, -0.1, 0.2], 44100).unwrap();
        let output = normalize_wav(&input).unwrap();
        assert!(matches!(output, Cow::Borrowed(_)));
        assert_eq!(output.as_ref(), input.as_slice());
    }

    #[test]
    fn non_wav_payload_fails_normalization() {
        assert!(normalize_wav(b"ID3\x04\x00\x00\x00\x00\x00\x00").is_err());
    }
}
