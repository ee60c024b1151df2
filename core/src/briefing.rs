//! Mission briefings fetched off the tick path.
//!
//! A scan drafts its offers on the engine thread, then hands the
//! difficulties to a worker thread that asks the narrator for one
//! briefing each. The engine polls for the reply on later ticks, so a
//! slow or hung narrator never holds up the clock.

use crate::narrative::{briefing_or_fallback, Narrator, BRIEFING_FALLBACK};
use std::sync::{
    mpsc::{self, Receiver, TryRecvError},
    Arc,
};
use std::thread;

pub struct BriefingJob {
    replies:  Receiver<Vec<String>>,
    expected: usize,
}

impl BriefingJob {
    /// Start fetching one briefing per difficulty.
    pub fn spawn(narrator: Arc<dyn Narrator>, difficulties: Vec<u32>) -> Self {
        let (reply_tx, replies) = mpsc::sync_channel(1);
        let expected = difficulties.len();

        let spawned = thread::Builder::new()
            .name("briefings".into())
            .spawn(move || {
                let texts = difficulties
                    .iter()
                    .map(|difficulty| briefing_or_fallback(narrator.as_ref(), *difficulty))
                    .collect();
                // The engine may have reset and dropped the job already.
                let _ = reply_tx.send(texts);
            });
        if let Err(e) = spawned {
            // The closure and its sender are gone; polling sees a
            // disconnect and falls back.
            log::warn!("briefing worker could not start: {e}");
        }

        Self { replies, expected }
    }

    /// Some(texts) once the worker has answered or died.
    pub fn poll(&self) -> Option<Vec<String>> {
        match self.replies.try_recv() {
            Ok(texts) => Some(texts),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(self.fallbacks()),
        }
    }

    /// Block until the worker answers.
    pub fn wait(&self) -> Vec<String> {
        self.replies.recv().unwrap_or_else(|_| self.fallbacks())
    }

    fn fallbacks(&self) -> Vec<String> {
        log::warn!("briefing worker exited without a reply");
        vec![BRIEFING_FALLBACK.to_string(); self.expected]
    }
}
