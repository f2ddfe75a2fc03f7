//! The music the "Play Music" button starts.

#[cfg(feature = "audio")]
mod engine;
#[cfg(feature = "audio")]
pub mod melody;

#[cfg(feature = "audio")]
pub use engine::AudioEngineHandle;

use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use anyhow::Result;
use log::info;

/// External audio player the celebration hands control to.
pub trait MusicPlayer: Send + Sync + 'static {
    fn play(&self) -> Result<()>;
    fn pause(&self) -> Result<()>;
    fn stop(&self) -> Result<()>;
    fn is_playing(&self) -> bool;
}

/// The rodio player when audio output is compiled in, [`SilentPlayer`]
/// otherwise.
pub fn default_player(track: Option<PathBuf>) -> Arc<dyn MusicPlayer> {
    #[cfg(feature = "audio")]
    {
        Arc::new(AudioEngineHandle::new(track))
    }

    #[cfg(not(feature = "audio"))]
    {
        if let Some(track) = track {
            info!("ignoring music track {} (built without audio)", track.display());
        }
        Arc::new(SilentPlayer::new())
    }
}

/// Player for builds without audio output. Tracks play state and logs.
#[derive(Debug, Default)]
pub struct SilentPlayer {
    playing: AtomicBool,
}

impl SilentPlayer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MusicPlayer for SilentPlayer {
    fn play(&self) -> Result<()> {
        if !self.playing.swap(true, Ordering::SeqCst) {
            info!("music requested (no audio output in this build)");
        }
        Ok(())
    }

    fn pause(&self) -> Result<()> {
        self.playing.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        self.playing.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }
}
