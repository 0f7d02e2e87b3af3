//! "Time's up" feedback: a descending tone cue plus a vibration pattern.

use std::{
    io::{self, IsTerminal, Write},
    panic::{self, AssertUnwindSafe},
    sync::Arc,
    time::Duration,
};

use tracing::debug;

use crate::error::CapabilityError;

/// A single note of the cue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration: Duration,
}

const fn tone(frequency_hz: f32, millis: u64) -> Tone {
    Tone {
        frequency_hz,
        duration: Duration::from_millis(millis),
    }
}

/// D5, C5, A4 then a held F4.
pub const TIMES_UP_CUE: [Tone; 4] = [
    tone(587.33, 150),
    tone(523.25, 150),
    tone(440.0, 150),
    tone(349.23, 400),
];

/// Buzz, pause, buzz, pause, long buzz.
pub const VIBRATION_PATTERN: [Duration; 5] = [
    Duration::from_millis(200),
    Duration::from_millis(100),
    Duration::from_millis(200),
    Duration::from_millis(100),
    Duration::from_millis(400),
];

/// Plays a sequence of tones.
pub trait ToneSink: Send + Sync {
    fn play(&self, tones: &[Tone]) -> Result<(), CapabilityError>;
}

/// Vibrates following an on/off pattern.
pub trait Vibrator: Send + Sync {
    fn vibrate(&self, pattern: &[Duration]) -> Result<(), CapabilityError>;
}

/// Best-effort alert. Missing or failing capabilities are skipped silently.
#[derive(Clone, Default)]
pub struct AlertFeedback {
    tones: Option<Arc<dyn ToneSink>>,
    vibrator: Option<Arc<dyn Vibrator>>,
}

impl AlertFeedback {
    /// Alert without any capability attached.
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn with_tones(mut self, sink: Arc<dyn ToneSink>) -> Self {
        self.tones = Some(sink);
        self
    }

    pub fn with_vibrator(mut self, vibrator: Arc<dyn Vibrator>) -> Self {
        self.vibrator = Some(vibrator);
        self
    }

    /// Play the cue and vibrate. Never fails and never panics outward.
    pub fn fire(&self) {
        if let Some(sink) = &self.tones {
            attempt("audio", || sink.play(&TIMES_UP_CUE));
        }
        if let Some(vibrator) = &self.vibrator {
            attempt("vibration", || vibrator.vibrate(&VIBRATION_PATTERN));
        }
    }
}

fn attempt(capability: &'static str, effect: impl FnOnce() -> Result<(), CapabilityError>) {
    match panic::catch_unwind(AssertUnwindSafe(effect)) {
        Ok(Ok(())) => {}
        Ok(Err(err)) => debug!(capability, error = %err, "alert capability unavailable"),
        Err(_) => debug!(capability, "alert capability panicked"),
    }
}

/// Rings the terminal bell once per tone; unsupported when stdout is not a terminal.
#[derive(Debug, Default)]
pub struct TerminalBell;

impl ToneSink for TerminalBell {
    fn play(&self, tones: &[Tone]) -> Result<(), CapabilityError> {
        let stdout = io::stdout();
        if !stdout.is_terminal() {
            return Err(CapabilityError::Unsupported);
        }
        let mut out = stdout.lock();
        for _ in tones {
            out.write_all(b"\x07").map_err(CapabilityError::Device)?;
        }
        out.flush().map_err(CapabilityError::Device)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    struct CountingSink {
        plays: AtomicUsize,
    }

    impl ToneSink for CountingSink {
        fn play(&self, tones: &[Tone]) -> Result<(), CapabilityError> {
            assert_eq!(tones.len(), TIMES_UP_CUE.len());
            self.plays.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct NoAudio;

    impl ToneSink for NoAudio {
        fn play(&self, _tones: &[Tone]) -> Result<(), CapabilityError> {
            Err(CapabilityError::Unsupported)
        }
    }

    struct BrokenMotor;

    impl Vibrator for BrokenMotor {
        fn vibrate(&self, _pattern: &[Duration]) -> Result<(), CapabilityError> {
            panic!("motor driver crashed");
        }
    }

    #[derive(Default)]
    struct CountingVibrator {
        calls: AtomicUsize,
    }

    impl Vibrator for CountingVibrator {
        fn vibrate(&self, pattern: &[Duration]) -> Result<(), CapabilityError> {
            assert_eq!(pattern, VIBRATION_PATTERN);
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn cue_descends() {
        assert!(
            TIMES_UP_CUE
                .windows(2)
                .all(|pair| pair[0].frequency_hz > pair[1].frequency_hz)
        );
    }

    #[test]
    fn fire_plays_and_vibrates_once() {
        let sink = Arc::new(CountingSink::default());
        let vibrator = Arc::new(CountingVibrator::default());
        let alert = AlertFeedback::silent()
            .with_tones(sink.clone())
            .with_vibrator(vibrator.clone());

        alert.fire();

        assert_eq!(sink.plays.load(Ordering::SeqCst), 1);
        assert_eq!(vibrator.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failing_audio_still_vibrates() {
        let vibrator = Arc::new(CountingVibrator::default());
        let alert = AlertFeedback::silent()
            .with_tones(Arc::new(NoAudio))
            .with_vibrator(vibrator.clone());

        alert.fire();

        assert_eq!(vibrator.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_capability_is_contained() {
        let sink = Arc::new(CountingSink::default());
        let alert = AlertFeedback::silent()
            .with_tones(sink.clone())
            .with_vibrator(Arc::new(BrokenMotor));

        alert.fire();

        assert_eq!(sink.plays.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn silent_alert_is_a_no_op() {
        AlertFeedback::silent().fire();
    }
}
