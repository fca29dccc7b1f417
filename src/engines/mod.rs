//! Speech synthesis engines.
//!
//! Every engine implements [`SynthesisEngine`](crate::SynthesisEngine) and is
//! interchangeable from the generator's point of view. They differ in the
//! container they produce, which each [`SynthesisResult`](crate::SynthesisResult)
//! reports truthfully.
//!
//! # Available Engines
//!
//! - [`espeak`] - espeak-ng subprocess, 22050 Hz mono 16-bit WAV
//! - [`command`] - any CLI program described by an argument template
//!   (gTTS, piper, ...); output format depends on the program
//! - [`tone`] - in-process placeholder tones for dry runs

pub mod command;
pub mod espeak;
mod process;
pub mod tone;

