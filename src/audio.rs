//! Audio collaborator
//!
//! The game only fires two events: a jump blip and the background theme at
//! round start. Sinks report failures as [`AudioError`]; the lifecycle logs
//! them and carries on, so a broken speaker never stops a round.

use thiserror::Error;

/// Audio playback failures (always non-fatal)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    #[error("audio output unavailable: {0}")]
    Unavailable(&'static str),
    #[error("playback failed: {0}")]
    Playback(String),
    /// The browser refused to play after accepting the request (e.g. autoplay policy)
    #[error("{sound} playback rejected: {reason}")]
    Rejected { sound: &'static str, reason: String },
}

/// Receives fire-and-forget sound events
pub trait AudioSink {
    /// Bird jumped
    fn on_jump(&mut self) -> Result<(), AudioError>;

    /// Round started: (re)start the background theme at `volume` (0.0 - 1.0)
    fn on_round_start(&mut self, volume: f32) -> Result<(), AudioError>;
}

/// Headless sink that only logs
#[derive(Debug, Default)]
pub struct LogAudio {
    jumps: u64,
}

impl LogAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump sounds requested so far
    pub fn jumps(&self) -> u64 {
        self.jumps
    }
}

impl AudioSink for LogAudio {
    fn on_jump(&mut self) -> Result<(), AudioError> {
        self.jumps += 1;
        log::trace!("audio: jump");
        Ok(())
    }

    fn on_round_start(&mut self, volume: f32) -> Result<(), AudioError> {
        log::debug!("audio: theme at volume {:.2}", volume.clamp(0.0, 1.0));
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

    use super::{AudioError, AudioSink};

    /// Browser audio: `<audio>` elements when the page has them, otherwise a
    /// synthesized chirp for jumps
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        theme: Option<HtmlAudioElement>,
        jump: Option<HtmlAudioElement>,
        sfx_volume: f32,
    }

    impl WebAudio {
        /// Look up `#background-audio` and `#jump-sound`; either may be missing
        pub fn new(sfx_volume: f32) -> Self {
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - synthesized sounds disabled");
            }
            let document = web_sys::window().and_then(|w| w.document());
            let find = |id: &str| {
                document
                    .as_ref()
                    .and_then(|d| d.get_element_by_id(id))
                    .and_then(|el| el.dyn_into::<HtmlAudioElement>().ok())
            };
            Self {
                ctx,
                theme: find("background-audio"),
                jump: find("jump-sound"),
                sfx_volume: sfx_volume.clamp(0.0, 1.0),
            }
        }

        /// Start playback and log a later rejection of the returned promise
        fn start_playback(el: &HtmlAudioElement, sound: &'static str) -> Result<(), AudioError> {
            let promise = el
                .play()
                .map_err(|e| AudioError::Playback(format!("{e:?}")))?;
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(reason) = JsFuture::from(promise).await {
                    let err = AudioError::Rejected {
                        sound,
                        reason: format!("{reason:?}"),
                    };
                    log::warn!("{err}");
                }
            });
            Ok(())
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Jump - quick rising chirp
        fn synth_jump(&self) -> Result<(), AudioError> {
            let ctx = self
                .ctx
                .as_ref()
                .ok_or(AudioError::Unavailable("no AudioContext"))?;
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            let (osc, gain) = Self::create_osc(ctx, 300.0, OscillatorType::Square)
                .ok_or(AudioError::Unavailable("oscillator"))?;
            let t = ctx.current_time();

            gain.gain().set_value_at_time(self.sfx_volume * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency().set_value_at_time(300.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(900.0, t + 0.1)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
            Ok(())
        }
    }

    impl AudioSink for WebAudio {
        fn on_jump(&mut self) -> Result<(), AudioError> {
            match &self.jump {
                Some(el) => {
                    el.set_volume(f64::from(self.sfx_volume));
                    el.set_current_time(0.0);
                    Self::start_playback(el, "jump")
                }
                None => self.synth_jump(),
            }
        }

        fn on_round_start(&mut self, volume: f32) -> Result<(), AudioError> {
            let theme = self
                .theme
                .as_ref()
                .ok_or(AudioError::Unavailable("no #background-audio element"))?;
            theme.set_volume(f64::from(volume.clamp(0.0, 1.0)));
            Self::start_playback(theme, "theme")
        }
    }
}
