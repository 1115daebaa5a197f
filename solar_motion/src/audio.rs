// Background music session: a four-state machine over one media element.
// Autoplay rejection is an expected outcome of the browser policy, absorbed as a move to Paused.

use std::cell::Cell;
use std::future::Future;

use tracing::debug;

use crate::error::PlaybackRejected;
use crate::types::AudioMode;

/// Playback state of the background music.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioState {
    #[default]
    Unstarted,
    PlayingMuted,
    PlayingAudible,
    Paused,
}

impl AudioState {
    pub fn is_playing(self) -> bool {
        matches!(self, AudioState::PlayingMuted | AudioState::PlayingAudible)
    }

    /// Icon shown on the toggle button.
    pub fn label(self) -> &'static str {
        match self {
            AudioState::Unstarted | AudioState::Paused => "🔇",
            AudioState::PlayingMuted => "🔈",
            AudioState::PlayingAudible => "🔊",
        }
    }
}

/// The media element, as far as the session needs it.
pub trait MediaPlayer {
    /// Resolves once playback started; rejects when the browser refuses.
    fn play(&self) -> impl Future<Output = Result<(), PlaybackRejected>>;
    fn pause(&self);
    fn set_muted(&self, muted: bool);
    fn set_volume(&self, volume: f64);
    fn set_looping(&self, looping: bool);
}

/// Drives a [`MediaPlayer`] through the session states.
///
/// Methods take `&self` so a click can be handled while an earlier play promise is still
/// pending; state lives in a `Cell` and is never borrowed across an await.
#[derive(Debug)]
pub struct AudioController<P> {
    player: P,
    mode: AudioMode,
    state: Cell<AudioState>,
}

impl<P: MediaPlayer> AudioController<P> {
    pub fn new(player: P, mode: AudioMode, volume: f64) -> Self {
        player.set_volume(volume.clamp(0.0, 1.0));
        player.set_looping(true);
        AudioController {
            player,
            mode,
            state: Cell::new(AudioState::Unstarted),
        }
    }

    pub fn state(&self) -> AudioState {
        self.state.get()
    }

    pub fn mode(&self) -> AudioMode {
        self.mode
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    /// Load-time autoplay attempt: muted in `MuteToggle` mode, audible in `PauseToggle` mode.
    pub async fn autoplay(&self) -> AudioState {
        if self.state.get() != AudioState::Unstarted {
            return self.state.get();
        }
        let (muted, playing) = match self.mode {
            AudioMode::MuteToggle => (true, AudioState::PlayingMuted),
            AudioMode::PauseToggle => (false, AudioState::PlayingAudible),
        };
        self.player.set_muted(muted);
        let outcome = self.player.play().await;
        if self.state.get() != AudioState::Unstarted {
            // A click settled the session while the promise was pending.
            return self.state.get();
        }
        let next = match outcome {
            Ok(()) => playing,
            Err(err) => {
                debug!(error = %err, "autoplay blocked; waiting for a click");
                self.player.pause();
                self.player.set_muted(true);
                AudioState::Paused
            }
        };
        self.state.set(next);
        next
    }

    /// User clicked the toggle button.
    pub async fn toggle(&self) -> AudioState {
        let next = match self.state.get() {
            AudioState::Unstarted | AudioState::Paused => self.start_from_gesture().await,
            playing @ (AudioState::PlayingMuted | AudioState::PlayingAudible) => match self.mode {
                AudioMode::MuteToggle => {
                    let unmute = playing == AudioState::PlayingMuted;
                    self.player.set_muted(!unmute);
                    if unmute {
                        AudioState::PlayingAudible
                    } else {
                        AudioState::PlayingMuted
                    }
                }
                AudioMode::PauseToggle => {
                    self.player.pause();
                    AudioState::Paused
                }
            },
        };
        self.state.set(next);
        next
    }

    /// Audible play, falling back to muted play, falling back to staying paused.
    async fn start_from_gesture(&self) -> AudioState {
        self.player.set_muted(false);
        match self.player.play().await {
            Ok(()) => return AudioState::PlayingAudible,
            Err(err) => debug!(error = %err, "audible play refused; retrying muted"),
        }

        self.player.set_muted(true);
        match self.player.play().await {
            Ok(()) => AudioState::PlayingMuted,
            Err(err) => {
                debug!(error = %err, "muted play refused; staying paused");
                self.player.pause();
                AudioState::Paused
            }
        }
    }

    /// Page visibility changed. Playback is left alone either way.
    pub fn on_visibility(&self, hidden: bool) -> AudioState {
        debug!(hidden, state = ?self.state.get(), "visibility changed");
        self.state.get()
    }
}

/// Shows the audio button when scrolling up or near the top, hides it while scrolling down.
#[derive(Debug, Clone)]
pub struct ScrollAffordance {
    last_scroll: f64,
    hide_after: f64,
    visible: bool,
}

impl ScrollAffordance {
    pub fn new(initial_scroll: f64, hide_after: f64) -> Self {
        ScrollAffordance {
            last_scroll: initial_scroll.max(0.0),
            hide_after,
            visible: true,
        }
    }

    /// Feed the current scroll offset; returns whether the button should be visible.
    pub fn on_scroll(&mut self, current: f64) -> bool {
        self.visible = !(current > self.last_scroll && current > self.hide_after);
        self.last_scroll = current.max(0.0);
        self.visible
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Inline `(opacity, pointer-events)` for the current visibility.
    pub fn css(&self) -> [(&'static str, &'static str); 2] {
        if self.visible {
            [("opacity", "1"), ("pointer-events", "auto")]
        } else {
            [("opacity", "0"), ("pointer-events", "none")]
        }
    }
}

#[cfg(test)]
pub(crate) mod scripted {
    //! Media player whose play promises resolve from a script.

    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::future::{ready, Future};

    use super::*;

    #[derive(Debug, Default)]
    pub struct ScriptedPlayer {
        outcomes: RefCell<VecDeque<bool>>,
        pub muted: Cell<bool>,
        pub paused: Cell<bool>,
        pub volume: Cell<f64>,
        pub looping: Cell<bool>,
        /// Muted flag at the time of each play attempt.
        pub attempts: RefCell<Vec<bool>>,
    }

    impl ScriptedPlayer {
        /// `outcomes[i]` decides whether the i-th `play()` succeeds; later calls succeed.
        pub fn new(outcomes: &[bool]) -> Self {
            ScriptedPlayer {
                outcomes: RefCell::new(outcomes.iter().copied().collect()),
                paused: Cell::new(true),
                ..Default::default()
            }
        }
    }

    impl MediaPlayer for ScriptedPlayer {
        fn play(&self) -> impl Future<Output = Result<(), PlaybackRejected>> {
            self.attempts.borrow_mut().push(self.muted.get());
            let ok = self.outcomes.borrow_mut().pop_front().unwrap_or(true);
            if ok {
                self.paused.set(false);
                ready(Ok(()))
            } else {
                ready(Err(PlaybackRejected("NotAllowedError".to_string())))
            }
        }

        fn pause(&self) {
            self.paused.set(true);
        }

        fn set_muted(&self, muted: bool) {
            self.muted.set(muted);
        }

        fn set_volume(&self, volume: f64) {
            self.volume.set(volume);
        }

        fn set_looping(&self, looping: bool) {
            self.looping.set(looping);
        }
    }
}
