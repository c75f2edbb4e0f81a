//! Sound pools and the inverse-volume limiter used by the backend.
//!
//! Each cue plays round-robin across a small pool of aliases of the same
//! clip so rapid triggers can overlap, and the per-frame master volume falls
//! off with the number of recently played sounds.
//!
//! Without the crate's `audio` feature the bank is inert: it still rolls the
//! limiter counters but never touches an audio device, so the backend code
//! is identical in both configurations.

#[cfg(feature = "audio")]
use anyhow::Context;
use anyhow::Result;
use box_siege_rendering::SoundCue;
#[cfg(feature = "audio")]
use macroquad::audio::{load_sound, play_sound, PlaySoundParams, Sound};

use crate::assets::AssetCatalog;
#[cfg(feature = "audio")]
use crate::assets::AssetKey;

/// Ceiling applied to the per-frame master volume.
const MAX_VOLUME: f32 = 0.75;

/// Number of aliases kept for the hit clip.
#[cfg(feature = "audio")]
const HIT_ALIASES: usize = 3;

/// Number of aliases kept for the death clip.
#[cfg(feature = "audio")]
const DEATH_ALIASES: usize = 2;

/// Fixed pool of clip aliases played round-robin.
#[cfg(feature = "audio")]
#[derive(Debug)]
struct SoundPool {
    clips: Vec<Sound>,
    next: usize,
}

#[cfg(feature = "audio")]
impl SoundPool {
    fn new(clip: Sound, aliases: usize) -> Self {
        Self {
            clips: vec![clip; aliases.max(1)],
            next: 0,
        }
    }

    fn play(&mut self, volume: f32) {
        play_sound(
            self.clips[self.next],
            PlaySoundParams {
                looped: false,
                volume,
            },
        );
        self.next = (self.next + 1) % self.clips.len();
    }
}

/// Tracks recent play counts and derives the per-frame master volume.
#[derive(Debug, Default)]
pub(crate) struct VolumeLimiter {
    previous_plays: u32,
    plays: u32,
}

impl VolumeLimiter {
    /// Rolls the play counters and returns this frame's master volume,
    /// `min(0.75, 2 / recent plays)`.
    pub(crate) fn begin_frame(&mut self) -> f32 {
        let recent = self.previous_plays + self.plays;
        let volume = if recent == 0 {
            MAX_VOLUME
        } else {
            (2.0 / recent as f32).min(MAX_VOLUME)
        };
        self.previous_plays = self.plays;
        self.plays = 0;
        volume
    }

    pub(crate) fn register_play(&mut self) {
        self.plays = self.plays.saturating_add(1);
    }
}

/// Pre-loaded clips plus the limiter state for one session.
#[cfg(feature = "audio")]
#[derive(Debug)]
pub(crate) struct SoundBank {
    hits: SoundPool,
    deaths: SoundPool,
    limiter: VolumeLimiter,
    frame_volume: f32,
}

#[cfg(feature = "audio")]
impl SoundBank {
    /// Loads both clips through the asset catalog.
    pub(crate) async fn load(catalog: &AssetCatalog) -> Result<Self> {
        let hit = load_clip(catalog, AssetKey::HitClip).await?;
        let death = load_clip(catalog, AssetKey::DeathClip).await?;
        Ok(Self {
            hits: SoundPool::new(hit, HIT_ALIASES),
            deaths: SoundPool::new(death, DEATH_ALIASES),
            limiter: VolumeLimiter::default(),
            frame_volume: MAX_VOLUME,
        })
    }

    /// Rolls the limiter at the top of a frame.
    pub(crate) fn begin_frame(&mut self) {
        self.frame_volume = self.limiter.begin_frame();
    }

    /// Plays the cue at this frame's master volume.
    pub(crate) fn play(&mut self, cue: SoundCue) {
        match cue {
            SoundCue::Hit => self.hits.play(self.frame_volume),
            SoundCue::Death => self.deaths.play(self.frame_volume),
        }
        self.limiter.register_play();
    }
}

/// Inert bank compiled when the `audio` feature is disabled.
#[cfg(not(feature = "audio"))]
#[derive(Debug)]
pub(crate) struct SoundBank {
    limiter: VolumeLimiter,
}

#[cfg(not(feature = "audio"))]
impl SoundBank {
    pub(crate) async fn load(_catalog: &AssetCatalog) -> Result<Self> {
        Ok(Self {
            limiter: VolumeLimiter::default(),
        })
    }

    pub(crate) fn begin_frame(&mut self) {
        let _ = self.limiter.begin_frame();
    }

    pub(crate) fn play(&mut self, _cue: SoundCue) {
        self.limiter.register_play();
    }
}

#[cfg(feature = "audio")]
async fn load_clip(catalog: &AssetCatalog, key: AssetKey) -> Result<Sound> {
    let path = catalog.path(key)?;
    let path_str = path
        .to_str()
        .with_context(|| format!("asset path for {key:?} is not valid UTF-8"))?;
    load_sound(path_str)
        .await
        .with_context(|| format!("failed to load sound {key:?} from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_plays_at_the_ceiling() {
        let mut limiter = VolumeLimiter::default();
        assert_eq!(limiter.begin_frame(), MAX_VOLUME);
        assert_eq!(limiter.begin_frame(), MAX_VOLUME);
    }

    #[test]
    fn volume_falls_off_with_recent_plays() {
        let mut limiter = VolumeLimiter::default();
        let _ = limiter.begin_frame();
        for _ in 0..8 {
            limiter.register_play();
        }

        // Last frame played 8 sounds: 2 / 8.
        assert_eq!(limiter.begin_frame(), 0.25);

        // The window covers the two most recent frames.
        for _ in 0..2 {
            limiter.register_play();
        }
        assert_eq!(limiter.begin_frame(), 0.2);

        // Counters roll off once the noise stops.
        assert_eq!(limiter.begin_frame(), MAX_VOLUME);
    }

    #[test]
    fn sparse_plays_stay_clamped_to_the_ceiling() {
        let mut limiter = VolumeLimiter::default();
        let _ = limiter.begin_frame();
        limiter.register_play();
        assert_eq!(limiter.begin_frame(), MAX_VOLUME);
    }
}
