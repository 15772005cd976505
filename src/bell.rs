//! Audible bell
//!
//! BEL must never block the byte stream. Each ring plays on a background
//! thread; while one alert is still sounding further rings are dropped, not
//! queued. Completion is polled with [`JoinHandle::is_finished`], so ringing
//! never waits.

use std::io::Write;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::config::BellConfig;

/// Something that makes the alert sound. Runs on the bell thread.
pub trait Chime: Send + Sync + 'static {
    /// Play the alert, returning when it is done
    fn play(&self);
}

/// Default chime: terminal BEL on stderr, then hold for `duration`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleChime {
    pub duration: Duration,
}

impl Default for ConsoleChime {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(150),
        }
    }
}

impl Chime for ConsoleChime {
    fn play(&self) {
        let mut stderr = std::io::stderr();
        if let Err(e) = stderr.write_all(b"\x07").and_then(|()| stderr.flush()) {
            tracing::debug!("bell write failed: {e}");
        }
        thread::sleep(self.duration);
    }
}

impl From<&BellConfig> for ConsoleChime {
    fn from(config: &BellConfig) -> Self {
        Self {
            duration: Duration::from_millis(config.duration_ms),
        }
    }
}

/// Fire-and-forget alert with single-in-flight suppression
pub struct Bell {
    chime: Arc<dyn Chime>,
    in_flight: Option<JoinHandle<()>>,
    enabled: bool,
    rung: u64,
    suppressed: u64,
}

impl std::fmt::Debug for Bell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bell")
            .field("in_flight", &self.is_ringing())
            .field("enabled", &self.enabled)
            .field("rung", &self.rung)
            .field("suppressed", &self.suppressed)
            .finish()
    }
}

impl Default for Bell {
    fn default() -> Self {
        Self::new(ConsoleChime::default())
    }
}

impl Bell {
    pub fn new(chime: impl Chime) -> Self {
        Self {
            chime: Arc::new(chime),
            in_flight: None,
            enabled: true,
            rung: 0,
            suppressed: 0,
        }
    }

    pub fn from_config(config: &BellConfig) -> Self {
        let mut bell = Self::new(ConsoleChime::from(config));
        bell.enabled = config.enabled;
        bell
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether an alert is still playing
    pub fn is_ringing(&self) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Start the alert unless one is already playing.
    ///
    /// Returns whether a new alert was started.
    pub fn ring(&mut self) -> bool {
        if !self.enabled {
            return false;
        }
        if self.is_ringing() {
            self.suppressed += 1;
            tracing::debug!("bell already ringing, dropped");
            return false;
        }

        let chime = Arc::clone(&self.chime);
        let spawned = thread::Builder::new()
            .name("bell".into())
            .spawn(move || chime.play());
        match spawned {
            Ok(handle) => {
                self.in_flight = Some(handle);
                self.rung += 1;
                true
            }
            Err(e) => {
                tracing::warn!("failed to start bell thread: {e}");
                false
            }
        }
    }

    /// Alerts started so far
    pub fn rung(&self) -> u64 {
        self.rung
    }

    /// Rings dropped because an alert was still playing
    pub fn suppressed(&self) -> u64 {
        self.suppressed
    }

    /// Block until the current alert, if any, has finished
    pub fn wait(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            if handle.join().is_err() {
                tracing::warn!("bell thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc::{self, Receiver, Sender};
    use std::sync::Mutex;

    use super::*;

    /// Chime that plays until the test releases it
    struct GatedChime {
        plays: Arc<AtomicUsize>,
        release: Mutex<Receiver<()>>,
    }

    impl Chime for GatedChime {
        fn play(&self) {
            self.plays.fetch_add(1, Ordering::SeqCst);
            if let Ok(release) = self.release.lock() {
                let _ = release.recv();
            }
        }
    }

    fn gated() -> (Bell, Arc<AtomicUsize>, Sender<()>) {
        let plays = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel();
        let chime = GatedChime {
            plays: Arc::clone(&plays),
            release: Mutex::new(rx),
        };
        (Bell::new(chime), plays, tx)
    }

    #[test]
    fn test_second_ring_is_dropped_while_playing() {
        let (mut bell, plays, release) = gated();

        assert!(bell.ring());
        assert!(bell.is_ringing());
        assert!(!bell.ring());
        assert!(!bell.ring());
        assert_eq!(bell.rung(), 1);
        assert_eq!(bell.suppressed(), 2);

        release.send(()).unwrap();
        bell.wait();
        assert!(!bell.is_ringing());
        assert_eq!(plays.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_ring_again_after_finish() {
        let (mut bell, plays, release) = gated();

        assert!(bell.ring());
        release.send(()).unwrap();
        bell.wait();

        assert!(bell.ring());
        release.send(()).unwrap();
        bell.wait();

        assert_eq!(bell.rung(), 2);
        assert_eq!(bell.suppressed(), 0);
        assert_eq!(plays.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_disabled_bell_is_silent() {
        let (mut bell, plays, _release) = gated();
        bell.set_enabled(false);
        assert!(!bell.ring());
        assert_eq!(bell.rung(), 0);
        assert_eq!(plays.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_from_config() {
        let config = BellConfig {
            enabled: false,
            duration_ms: 20,
        };
        let chime = ConsoleChime::from(&config);
        assert_eq!(chime.duration, Duration::from_millis(20));
        assert!(!Bell::from_config(&config).is_enabled());
    }
}
