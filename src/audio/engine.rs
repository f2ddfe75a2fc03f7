use std::{
    fs::File,
    io::BufReader,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Sender},
        Arc, Mutex,
    },
    thread,
};

use anyhow::{anyhow, Context, Result};
use log::{error, warn};
use rodio::{Decoder, OutputStream, Sink};

use super::{melody::BirthdayMelody, MusicPlayer};

enum AudioCommand {
    Play,
    Pause,
    Stop,
}

/// rodio output owned by a dedicated thread; this handle only sends commands.
pub struct AudioEngineHandle {
    tx: Arc<Mutex<Option<Sender<AudioCommand>>>>,
    track: Option<PathBuf>,
    is_playing: Arc<AtomicBool>,
}

impl AudioEngineHandle {
    /// `track` is any file rodio can decode. Without one, or if it fails to
    /// decode, the built-in melody plays instead.
    pub fn new(track: Option<PathBuf>) -> Self {
        Self {
            tx: Arc::new(Mutex::new(None)),
            track,
            is_playing: Arc::new(AtomicBool::new(false)),
        }
    }

    fn send(&self, command: AudioCommand) -> Result<()> {
        let tx = self.ensure_thread()?;
        tx.send(command)
            .map_err(|err| anyhow!("audio thread is gone: {err}"))
    }

    fn ensure_thread(&self) -> Result<Sender<AudioCommand>> {
        let mut guard = self
            .tx
            .lock()
            .map_err(|_| anyhow!("audio handle lock poisoned"))?;
        if let Some(tx) = guard.as_ref() {
            return Ok(tx.clone());
        }

        let (tx, rx) = mpsc::channel::<AudioCommand>();
        let is_playing = Arc::clone(&self.is_playing);
        let track = self.track.clone();

        // OutputStream is not Send, so it lives and dies on this thread.
        thread::Builder::new()
            .name("birthday-audio".to_string())
            .spawn(move || {
                let mut _stream: Option<OutputStream> = None;
                let mut sink: Option<Sink> = None;

                while let Ok(command) = rx.recv() {
                    match command {
                        AudioCommand::Play => match sink {
                            Some(ref s) => {
                                s.play();
                                is_playing.store(true, Ordering::SeqCst);
                            }
                            None => start(&mut _stream, &mut sink, track.as_ref(), &is_playing),
                        },
                        AudioCommand::Pause => {
                            if let Some(ref s) = sink {
                                s.pause();
                                is_playing.store(false, Ordering::SeqCst);
                            }
                        }
                        AudioCommand::Stop => {
                            if let Some(old) = sink.take() {
                                old.stop();
                            }
                            _stream = None;
                            is_playing.store(false, Ordering::SeqCst);
                        }
                    }
                }
            })
            .context("failed to spawn audio thread")?;

        *guard = Some(tx.clone());
        Ok(tx)
    }
}

fn start(
    stream: &mut Option<OutputStream>,
    sink: &mut Option<Sink>,
    track: Option<&PathBuf>,
    is_playing: &AtomicBool,
) {
    if let Some(old) = sink.take() {
        old.stop();
    }
    *stream = None;

    match open_sink(track) {
        Ok((new_stream, new_sink)) => {
            *stream = Some(new_stream);
            *sink = Some(new_sink);
            is_playing.store(true, Ordering::SeqCst);
        }
        Err(err) => {
            error!("failed to start music: {err:#}");
            is_playing.store(false, Ordering::SeqCst);
        }
    }
}

fn open_sink(track: Option<&PathBuf>) -> Result<(OutputStream, Sink)> {
    let (stream, handle) =
        OutputStream::try_default().context("failed to open audio output stream")?;
    let sink = Sink::try_new(&handle).context("failed to create audio sink")?;

    match track.map(|path| decode(path)) {
        Some(Ok(decoder)) => sink.append(decoder),
        Some(Err(err)) => {
            warn!("{err:#}; playing the built-in melody");
            sink.append(BirthdayMelody::new());
        }
        None => sink.append(BirthdayMelody::new()),
    }

    Ok((stream, sink))
}

fn decode(path: &PathBuf) -> Result<Decoder<BufReader<File>>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open music track {}", path.display()))?;
    Decoder::new(BufReader::new(file))
        .with_context(|| format!("failed to decode music track {}", path.display()))
}

impl MusicPlayer for AudioEngineHandle {
    /// Opens the output and starts the track if nothing is loaded, resumes
    /// otherwise.
    fn play(&self) -> Result<()> {
        self.send(AudioCommand::Play)
    }

    fn pause(&self) -> Result<()> {
        self.send(AudioCommand::Pause)
    }

    fn stop(&self) -> Result<()> {
        if let Ok(Some(tx)) = self.tx.lock().map(|guard| guard.clone()) {
            let _ = tx.send(AudioCommand::Stop);
        }
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.is_playing.load(Ordering::SeqCst)
    }
}
