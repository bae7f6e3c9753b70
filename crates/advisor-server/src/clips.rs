//! In-memory store for synthesized audio served back to the gateway.

use advisor_voice::wav::wrap_pcm_s16le;
use advisor_voice::VoiceError;
use axum::body::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use uuid::Uuid;

struct Clip {
    wav: Bytes,
    created_at: Instant,
}

#[derive(Default)]
struct Clips {
    by_id: HashMap<String, Clip>,
    /// Insertion order, oldest first.
    order: VecDeque<String>,
}

/// Short-lived WAV clips keyed by random id.
///
/// The gateway fetches each clip once, right after the TwiML that names it,
/// so clips only need to outlive a single turn.
pub struct ClipStore {
    clips: Mutex<Clips>,
    ttl: Duration,
    max_clips: usize,
    sample_rate: u32,
}

impl ClipStore {
    pub fn new(ttl: Duration, max_clips: usize, sample_rate: u32) -> Self {
        Self {
            clips: Mutex::new(Clips::default()),
            ttl,
            max_clips: max_clips.max(1),
            sample_rate,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Clips> {
        match self.clips.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("clip store lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Wraps raw PCM as WAV, stores it and returns the clip id.
    pub fn insert(&self, pcm: &[u8]) -> Result<String, VoiceError> {
        let wav = wrap_pcm_s16le(pcm, self.sample_rate)?;
        let id = Uuid::new_v4().to_string();
        let clip = Clip {
            wav: Bytes::from(wav),
            created_at: Instant::now(),
        };

        let mut clips = self.lock();
        while clips.by_id.len() >= self.max_clips {
            let Some(oldest) = clips.order.pop_front() else {
                break;
            };
            clips.by_id.remove(&oldest);
        }
        clips.order.push_back(id.clone());
        clips.by_id.insert(id.clone(), clip);
        Ok(id)
    }

    /// Returns a clip's WAV bytes unless it is unknown or expired.
    pub fn get(&self, id: &str) -> Option<Bytes> {
        let clips = self.lock();
        clips
            .by_id
            .get(id)
            .filter(|clip| clip.created_at.elapsed() <= self.ttl)
            .map(|clip| clip.wav.clone())
    }

    /// Drops expired clips. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut clips = self.lock();
        let before = clips.by_id.len();
        let ttl = self.ttl;
        clips.by_id.retain(|_, clip| clip.created_at.elapsed() <= ttl);
        let Clips { by_id, order } = &mut *clips;
        order.retain(|id| by_id.contains_key(id));
        before - by_id.len()
    }

    pub fn len(&self) -> usize {
        self.lock().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_voice::wav::WAV_HEADER_LEN;

    #[test]
    fn stored_clips_are_wav() {
        let store = ClipStore::new(Duration::from_secs(60), 10, 8000);
        let id = store.insert(&[0u8; 160]).unwrap();
        let wav = store.get(&id).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(wav.len(), WAV_HEADER_LEN + 160);
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn oldest_clip_is_evicted_at_capacity() {
        let store = ClipStore::new(Duration::from_secs(60), 2, 8000);
        let first = store.insert(&[1]).unwrap();
        let second = store.insert(&[2]).unwrap();
        let third = store.insert(&[3]).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.get(&first).is_none());
        assert!(store.get(&second).is_some());
        assert!(store.get(&third).is_some());
    }

    #[test]
    fn expired_clips_are_hidden_and_purged() {
        let store = ClipStore::new(Duration::ZERO, 10, 8000);
        let id = store.insert(&[0u8; 4]).unwrap();
        std::thread::sleep(Duration::from_millis(5));
        assert!(store.get(&id).is_none());
        assert_eq!(store.purge_expired(), 1);
        assert!(store.is_empty());
    }
}
