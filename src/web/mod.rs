//! Browser front end. Builds the play surface, wires pointer and button events
//! into the round state machine and backs its timers with `setTimeout`.
//!
//! All state lives in a thread-local `App`; every callback (DOM event, timer,
//! clipboard promise) borrows it for the duration of one transition only.

mod dom;
mod host;

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, window};

use crate::config::GameConfig;
use crate::game::{Game, GameError, Mode, SeededRandom, TimerHandle};
use crate::share;

use dom::Surface;
use host::BrowserHost;

struct App {
    game: Game<SeededRandom>,
    host: BrowserHost,
}

impl App {
    fn render(&self) {
        self.host.surface.render(self.game.session());
    }
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

pub(crate) fn start(config: GameConfig) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    // Elements are reused by id, so a second start only swaps the session.
    let surface = Surface::build(&doc)?;
    let root = surface.root.clone();
    let mut buttons = Vec::with_capacity(6);
    for el in [&surface.normal_button, &surface.advanced_button] {
        buttons.push((el.clone(), Action::Select(mode_of(el)?)));
    }
    buttons.extend([
        (surface.retry_button.clone(), Action::Retry),
        (surface.back_button.clone(), Action::Back),
        (surface.copy_button.clone(), Action::CopyShare),
        (surface.tweet_button.clone(), Action::TweetShare),
    ]);

    let rng = SeededRandom::from_entropy_or(crate::performance_now().to_bits());
    let host = BrowserHost::new(&config, surface);
    let app = App { game: Game::new(config, rng), host };
    app.render();
    if let Some(mut old) = APP.with(|cell| cell.borrow_mut().replace(app)) {
        old.game.abandon(&mut old.host);
        log::info!("game restarted");
        return Ok(());
    }

    // Play surface: any press is a reaction (or an early press).
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::PointerEvent| {
            let now = crate::performance_now();
            with_app(|app| app.game.click(now, &mut app.host));
        }) as Box<dyn FnMut(_)>);
        root.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    for (el, action) in buttons {
        listen_button(&el, action)?;
    }
    log::info!("reflex game ready");
    Ok(())
}

#[derive(Clone, Copy, Debug)]
enum Action {
    Select(Mode),
    Retry,
    Back,
    CopyShare,
    TweetShare,
}

fn mode_of(el: &Element) -> Result<Mode, JsValue> {
    el.get_attribute("data-mode")
        .as_deref()
        .and_then(Mode::from_name)
        .ok_or_else(|| JsValue::from_str(&format!("#{} has no valid data-mode", el.id())))
}

/// Actions run on `click`: only a completed click counts as user activation on
/// touch devices, which clipboard writes and `window.open` require.
fn listen_button(el: &Element, action: Action) -> Result<(), JsValue> {
    // Buttons sit on the play surface; keep their presses from counting as taps.
    let stop = Closure::wrap(Box::new(move |evt: web_sys::PointerEvent| {
        evt.stop_propagation();
    }) as Box<dyn FnMut(_)>);
    el.add_event_listener_with_callback("pointerdown", stop.as_ref().unchecked_ref())?;
    stop.forget();

    let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
        evt.stop_propagation();
        match action {
            Action::Select(mode) => with_app(|app| app.game.select_mode(mode, &mut app.host)),
            Action::Retry => with_app(|app| app.game.retry(&mut app.host)),
            Action::Back => with_app(|app| app.game.back_to_start(&mut app.host)),
            Action::CopyShare => copy_share(),
            Action::TweetShare => tweet_share(),
        }
    }) as Box<dyn FnMut(_)>);
    el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Run one transition against the installed app and refresh the DOM.
fn with_app(f: impl FnOnce(&mut App) -> Result<(), GameError>) {
    APP.with(|cell| {
        if let Some(app) = cell.borrow_mut().as_mut() {
            if let Err(err) = f(app) {
                log::debug!("{}", err);
            }
            app.render();
        }
    });
}

/// Entry point for every `setTimeout` the host schedules.
pub(crate) fn fire_timer(handle: TimerHandle) {
    let now = crate::performance_now();
    APP.with(|cell| {
        if let Some(app) = cell.borrow_mut().as_mut() {
            if !app.host.take_fired(handle) {
                return;
            }
            app.game.on_timer(handle, now, &mut app.host);
            app.render();
        }
    });
}

fn current_share_text() -> Option<String> {
    APP.with(|cell| {
        cell.borrow().as_ref().map(|app| {
            share::share_text(app.game.session().score(), &app.game.config().share_url)
        })
    })
}

fn alert(msg: &str) {
    if let Some(win) = window() {
        let _ = win.alert_with_message(msg);
    }
}

/// Copy the result to the clipboard; show the fallback notice on any failure.
fn copy_share() {
    let Some(text) = current_share_text() else {
        return;
    };
    wasm_bindgen_futures::spawn_local(async move {
        match write_clipboard(&text).await {
            Ok(()) => alert(share::COPY_OK_NOTICE),
            Err(err) => {
                log::warn!("clipboard write failed: {:?}", err);
                alert(share::COPY_FAILED_NOTICE);
            }
        }
    });
}

async fn write_clipboard(text: &str) -> Result<(), JsValue> {
    let nav = window()
        .ok_or_else(|| JsValue::from_str("no window"))?
        .navigator();
    // Looked up dynamically: insecure contexts have no navigator.clipboard.
    let clipboard = js_sys::Reflect::get(&nav, &JsValue::from_str("clipboard"))?;
    let write_text: js_sys::Function =
        js_sys::Reflect::get(&clipboard, &JsValue::from_str("writeText"))?.dyn_into()?;
    let promise: js_sys::Promise = write_text
        .call1(&clipboard, &JsValue::from_str(text))?
        .dyn_into()?;
    wasm_bindgen_futures::JsFuture::from(promise).await?;
    Ok(())
}

fn tweet_share() {
    let Some(text) = current_share_text() else {
        return;
    };
    let url = share::intent_url(&text);
    if let Some(win) = window() {
        if let Err(err) = win.open_with_url_and_target(&url, "_blank") {
            log::warn!("could not open share window: {:?}", err);
        }
    }
}
