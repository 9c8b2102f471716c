use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use idlemon::engine::ControlFlags;
use idlemon::errors::{IdlemonError, Result};
use idlemon::idle::{IdleSample, IdleSource};

/// A fake idle source that plays back scripted samples.
///
/// When the script runs out it either repeats the last sample or, if built
/// with `shutdown_when_done`, requests shutdown and keeps repeating so the
/// runtime stops at the top of its next tick.
#[derive(Debug, Clone)]
pub struct FakeIdleSource {
    samples: Arc<Mutex<VecDeque<IdleSample>>>,
    last: IdleSample,
    queries: Arc<Mutex<usize>>,
    shutdown: Option<Arc<ControlFlags>>,
    fail: bool,
}

impl FakeIdleSource {
    pub fn new(samples: impl IntoIterator<Item = IdleSample>) -> Self {
        Self {
            samples: Arc::new(Mutex::new(samples.into_iter().collect())),
            last: IdleSample::default(),
            queries: Arc::new(Mutex::new(0)),
            shutdown: None,
            fail: false,
        }
    }

    /// Shorthand: idle for each of `ms`, screensaver off.
    pub fn idle(ms: impl IntoIterator<Item = u64>) -> Self {
        Self::new(ms.into_iter().map(|idle_ms| IdleSample {
            idle_ms,
            active: false,
        }))
    }

    /// Fails every query, as a lost X connection would.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn shutdown_when_done(mut self, flags: Arc<ControlFlags>) -> Self {
        self.shutdown = Some(flags);
        self
    }

    pub fn queries(&self) -> usize {
        *self.queries.lock().unwrap()
    }
}

impl IdleSource for FakeIdleSource {
    fn query(&mut self) -> Result<IdleSample> {
        *self.queries.lock().unwrap() += 1;
        if self.fail {
            return Err(IdlemonError::IdleSource("scripted failure".to_string()));
        }

        let next = self.samples.lock().unwrap().pop_front();
        match next {
            Some(sample) => self.last = sample,
            None => {
                if let Some(flags) = &self.shutdown {
                    flags.request_shutdown();
                }
            }
        }
        Ok(self.last)
    }
}
