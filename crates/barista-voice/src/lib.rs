//! Best-effort speech synthesis.
//!
//! Synthesis failures degrade to a silent (no-audio) response; they never
//! abort the conversation turn that requested them.

pub mod synth;

pub use synth::{synthesize_best_effort, HttpSpeech, SpeechSynthesizer, VoiceError};
