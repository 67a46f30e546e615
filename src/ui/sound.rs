/// Sound engine: procedural chip-style effects via rodio.
///
/// Every effect is synthesised once at startup into an in-memory WAV buffer.
/// Playback is fire-and-forget through a detached Sink.
///
/// Build without the "sound" feature to drop rodio; the stub engine below
/// keeps the same API and does nothing.

use crate::sim::event::{GameEvent, LevelEvent};

#[cfg(feature = "sound")]
mod inner {
    use std::f32::consts::PI;
    use std::io::Cursor;
    use std::sync::Arc;

    use log::warn;
    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_hop: Arc<Vec<u8>>,
        sfx_flip: Arc<Vec<u8>>,
        sfx_fall: Arc<Vec<u8>>,
        sfx_hit: Arc<Vec<u8>>,
        sfx_clear: Arc<Vec<u8>>,
        sfx_one_up: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("no audio output: {}", e);
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_hop: Arc::new(make_wav(&gen_hop())),
                sfx_flip: Arc::new(make_wav(&gen_flip())),
                sfx_fall: Arc::new(make_wav(&gen_fall())),
                sfx_hit: Arc::new(make_wav(&gen_hit())),
                sfx_clear: Arc::new(make_wav(&gen_clear())),
                sfx_one_up: Arc::new(make_wav(&gen_one_up())),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach();
                }
            }
        }

        pub fn play_hop(&self) { self.play(&self.sfx_hop); }
        pub fn play_flip(&self) { self.play(&self.sfx_flip); }
        pub fn play_fall(&self) { self.play(&self.sfx_fall); }
        pub fn play_hit(&self) { self.play(&self.sfx_hit); }
        pub fn play_clear(&self) { self.play(&self.sfx_clear); }
        pub fn play_one_up(&self) { self.play(&self.sfx_one_up); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators, mono f32 samples
    // ════════════════════════════════════════════════════════════

    fn tone(freq: f32, i: usize) -> f32 {
        (i as f32 / SAMPLE_RATE as f32 * freq * 2.0 * PI).sin()
    }

    fn samples_for(duration: f32) -> usize {
        (SAMPLE_RATE as f32 * duration) as usize
    }

    /// Hop: short upward chirp.
    fn gen_hop() -> Vec<f32> {
        let n = samples_for(0.07);
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 300.0 + t * 500.0;
                tone(freq, i) * (1.0 - t) * 0.2
            })
            .collect()
    }

    /// Flip: bright two-harmonic blip.
    fn gen_flip() -> Vec<f32> {
        let n = samples_for(0.06);
        (0..n)
            .map(|i| {
                let env = 1.0 - (i as f32 / n as f32).powf(0.5);
                (tone(1319.0, i) * 0.7 + tone(1319.0 * 3.0, i) * 0.3) * env * 0.25
            })
            .collect()
    }

    /// Off the edge: long descending whistle.
    fn gen_fall() -> Vec<f32> {
        let n = samples_for(0.6);
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 900.0 - t * 700.0;
                tone(freq, i) * (1.0 - t).powf(0.6) * 0.25
            })
            .collect()
    }

    /// Hit: noisy crunch over a falling tone.
    fn gen_hit() -> Vec<f32> {
        let n = samples_for(0.25);
        let mut lcg: u32 = 12345;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                lcg = lcg.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (lcg as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let freq = 220.0 - t * 120.0;
                (tone(freq, i) * 0.5 + noise * 0.5) * (1.0 - t) * 0.3
            })
            .collect()
    }

    /// Level clear: ascending arpeggio with a held top note.
    fn gen_clear() -> Vec<f32> {
        let mut samples = Vec::new();
        for &freq in &[523.0_f32, 659.0, 784.0, 1047.0] {
            let n = samples_for(0.1);
            for i in 0..n {
                let env = 1.0 - (i as f32 / n as f32) * 0.3;
                samples.push((tone(freq, i) * 0.6 + tone(freq * 2.0, i) * 0.4) * env * 0.3);
            }
        }
        let n = samples_for(0.3);
        for i in 0..n {
            let env = 1.0 - i as f32 / n as f32;
            samples.push(tone(1047.0, i) * env * 0.3);
        }
        samples
    }

    /// Extra life: quick major triad.
    fn gen_one_up() -> Vec<f32> {
        let mut samples = Vec::new();
        for &freq in &[1047.0_f32, 1319.0, 1568.0, 2093.0] {
            let n = samples_for(0.05);
            for i in 0..n {
                let env = 1.0 - (i as f32 / n as f32).powf(0.5);
                samples.push(tone(freq, i) * env * 0.25);
            }
        }
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: 16-bit mono PCM
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let bits_per_sample: u16 = 16;
        let block_align: u16 = bits_per_sample / 8;
        let byte_rate = SAMPLE_RATE * block_align as u32;
        let data_size = samples.len() as u32 * block_align as u32;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&1u16.to_le_bytes()); // mono
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }
        buf
    }

}

// ════════════════════════════════════════════════════════════
//  Public API, no-ops when the sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_hop(&self) {}
    pub fn play_flip(&self) {}
    pub fn play_fall(&self) {}
    pub fn play_hit(&self) {}
    pub fn play_clear(&self) {}
    pub fn play_one_up(&self) {}
}

/// Play whatever the events call for. Enemy events stay silent.
pub fn play_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for ev in events {
        match ev {
            GameEvent::PlayerHopped => sfx.play_hop(),
            GameEvent::LifeGained => sfx.play_one_up(),
            GameEvent::GameOver { .. } => sfx.play_hit(),
            GameEvent::Level(LevelEvent::PlayerFlipped { .. }) => sfx.play_flip(),
            GameEvent::Level(LevelEvent::PlayerDroppedOff { .. }) => sfx.play_fall(),
            GameEvent::Level(LevelEvent::PlayerHit { .. }) => sfx.play_hit(),
            GameEvent::Level(LevelEvent::LevelCleared) => sfx.play_clear(),
            _ => {}
        }
    }
}
