use std::f32::consts::TAU;

use crate::error::SynthesisError;
use crate::{SpeechStyle, SynthesisEngine, SynthesisResult};

/// Parameters for the placeholder tone engine.
#[derive(Debug, Clone)]
pub struct ToneParams {
    pub sample_rate: u32,
    pub frequency_hz: f32,
    pub amplitude: f32,
    /// Length of a zero-character utterance.
    pub base_secs: f32,
    pub secs_per_char: f32,
    /// Duration multiplier for [`SpeechStyle::Slow`].
    pub slow_factor: f32,
    pub max_secs: f32,
}

impl Default for ToneParams {
    fn default() -> Self {
        Self {
            sample_rate: 22050,
            frequency_hz: 440.0,
            amplitude: 0.3,
            base_secs: 0.25,
            secs_per_char: 0.06,
            slow_factor: 1.6,
            max_secs: 20.0,
        }
    }
}

/// In-process stand-in that renders a sine tone whose length follows the
/// text length.
///
/// Produces a complete, format-conforming asset tree without any speech
/// software installed, for dry runs of the generate/check/validate stages.
#[derive(Default)]
pub struct ToneEngine {
    params: ToneParams,
}

impl ToneEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: ToneParams) -> Self {
        Self { params }
    }

    fn duration_secs(&self, text: &str, style: SpeechStyle) -> f32 {
        let p = &self.params;
        let mut secs = p.base_secs + p.secs_per_char * text.chars().count() as f32;
        if style == SpeechStyle::Slow {
            secs *= p.slow_factor;
        }
        secs.min(p.max_secs)
    }

    fn render(&self, secs: f32) -> Vec<f32> {
        let p = &self.params;
        let rate = p.sample_rate as f32;
        let total = (secs * rate).round() as usize;
        // 10 ms ramps keep the edges click-free.
        let ramp = ((0.01 * rate) as usize).max(1);
        (0..total)
            .map(|i| {
                let envelope = (i.min(total - 1 - i) as f32 / ramp as f32).min(1.0);
                (TAU * p.frequency_hz * i as f32 / rate).sin() * p.amplitude * envelope
            })
            .collect()
    }
}

impl SynthesisEngine for ToneEngine {
    fn name(&self) -> &str {
        "tone"
    }

    fn synthesize(
        &mut self,
        text: &str,
        style: SpeechStyle,
    ) -> Result<SynthesisResult, SynthesisError> {
        let samples = self.render(self.duration_secs(text, style));
        SynthesisResult::from_samples(&samples, self.params.sample_rate)
            .map_err(|e| SynthesisError::new(text, e.into()))
    }
}
