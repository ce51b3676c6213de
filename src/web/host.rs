// Browser implementation of `game::Host`: setTimeout timers, <audio> cues,
// navigator.vibrate and the play-surface DOM.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlAudioElement, window};

use crate::config::GameConfig;
use crate::game::{Feedback, Haptic, Host, Sound, TimerHandle};

use super::dom::Surface;

pub(crate) struct BrowserHost {
    next_id: i32,
    // our handle -> window.setTimeout id
    timeouts: HashMap<i32, i32>,
    sounds: Vec<(Sound, HtmlAudioElement)>,
    pub(crate) surface: Surface,
}

impl BrowserHost {
    pub(crate) fn new(config: &GameConfig, surface: Surface) -> Self {
        let mut sounds = Vec::with_capacity(Sound::ALL.len());
        for sound in Sound::ALL {
            match HtmlAudioElement::new_with_src(&config.sound_url(sound)) {
                Ok(el) => {
                    el.set_preload("auto");
                    sounds.push((sound, el));
                }
                Err(err) => log::warn!("could not create audio for {}: {:?}", sound.name(), err),
            }
        }
        Self { next_id: 0, timeouts: HashMap::new(), sounds, surface }
    }

    /// Called from the timeout closure; false if the timer was cancelled meanwhile.
    pub(crate) fn take_fired(&mut self, handle: TimerHandle) -> bool {
        self.timeouts.remove(&handle.0).is_some()
    }

    fn play(&self, sound: Sound) {
        let Some((_, el)) = self.sounds.iter().find(|(s, _)| *s == sound) else {
            return;
        };
        el.set_current_time(0.0);
        // play() rejects when autoplay is blocked; nothing to do about it.
        if let Ok(promise) = el.play() {
            wasm_bindgen_futures::spawn_local(async move {
                let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
            });
        }
    }
}

impl Host for BrowserHost {
    fn schedule(&mut self, delay_ms: u32) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        let Some(win) = window() else {
            return handle;
        };
        let cb = Closure::once(move || super::fire_timer(handle));
        match win.set_timeout_with_callback_and_timeout_and_arguments_0(
            cb.as_ref().unchecked_ref(),
            delay_ms.min(i32::MAX as u32) as i32,
        ) {
            Ok(id) => {
                self.timeouts.insert(handle.0, id);
                cb.forget();
            }
            Err(err) => log::error!("setTimeout failed: {:?}", err),
        }
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(id) = self.timeouts.remove(&handle.0) {
            if let Some(win) = window() {
                win.clear_timeout_with_handle(id);
            }
        }
    }

    fn present(&mut self, feedback: Feedback) {
        let effect = feedback.effect();
        if let Some(sound) = effect.sound {
            self.play(sound);
        }
        if let Some(haptic) = effect.haptic {
            vibrate(haptic);
        }
        self.surface.show_feedback(&feedback);
    }
}

/// Vibrate if the device supports it; silently do nothing otherwise.
fn vibrate(haptic: Haptic) {
    let Some(nav) = window().map(|w| w.navigator()) else {
        return;
    };
    let supported = js_sys::Reflect::get(&nav, &JsValue::from_str("vibrate"))
        .map(|f| f.is_function())
        .unwrap_or(false);
    if !supported {
        return;
    }
    let pattern: js_sys::Array = haptic.pattern().iter().map(|&ms| JsValue::from(ms)).collect();
    let _ = nav.vibrate_with_pattern(&pattern);
}
