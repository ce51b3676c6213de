// DOM for the play surface. Elements are created once on start (or reused if
// the page already has them) and updated after every event.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use crate::game::{Feedback, GameSession, Outcome, Phase};

pub(crate) const ROOT_ID: &str = "rc-root";

const ROOT_STYLE: &str = "position:fixed; inset:0; display:flex; flex-direction:column; align-items:center; justify-content:center; text-align:center; transition:background-color 200ms; user-select:none; font-family:'Noto Sans JP', sans-serif;";
const BUTTON_STYLE: &str = "display:block; margin:10px auto; padding:12px 24px; min-width:220px; border:none; border-radius:6px; color:#fff; font-size:16px; cursor:pointer;";
const PANEL_STYLE: &str = "background:#fff; padding:32px; border-radius:10px; box-shadow:0 0 32px 0 rgba(0,0,0,0.18); color:#1f2937;";

/// Handles to every element the game touches.
pub(crate) struct Surface {
    pub(crate) root: Element,
    menu: Element,
    play: Element,
    message: Element,
    counters: Element,
    result: Element,
    result_score: Element,
    result_rank: Element,
    result_misses: Element,
    pub(crate) normal_button: Element,
    pub(crate) advanced_button: Element,
    pub(crate) retry_button: Element,
    pub(crate) back_button: Element,
    pub(crate) copy_button: Element,
    pub(crate) tweet_button: Element,
}

fn ensure(doc: &Document, parent: &Element, tag: &str, id: &str, style: &str) -> Result<Element, JsValue> {
    if let Some(el) = doc.get_element_by_id(id) {
        return Ok(el);
    }
    let el = doc.create_element(tag)?;
    el.set_id(id);
    if !style.is_empty() {
        el.set_attribute("style", style)?;
    }
    parent.append_child(&el)?;
    Ok(el)
}

fn button(doc: &Document, parent: &Element, id: &str, label: &str, color: &str) -> Result<Element, JsValue> {
    let el = ensure(doc, parent, "button", id, &format!("{} background:{};", BUTTON_STYLE, color))?;
    if el.text_content().unwrap_or_default().is_empty() {
        el.set_text_content(Some(label));
    }
    Ok(el)
}

impl Surface {
    pub(crate) fn build(doc: &Document) -> Result<Self, JsValue> {
        let body: Element = doc.body().ok_or_else(|| JsValue::from_str("no body"))?.into();
        let root = ensure(doc, &body, "div", ROOT_ID, ROOT_STYLE)?;

        // Mode selection
        let menu = ensure(doc, &root, "div", "rc-menu", "")?;
        let title = ensure(doc, &menu, "h1", "rc-menu-title", "font-size:24px; font-weight:bold; margin-bottom:8px;")?;
        title.set_text_content(Some("モードを選んでね"));
        let normal_button = button(doc, &menu, "rc-normal", "通常モード", "#2563eb")?;
        normal_button.set_attribute("data-mode", "normal")?;
        let advanced_button = button(doc, &menu, "rc-advanced", "上級モード", "#9333ea")?;
        advanced_button.set_attribute("data-mode", "advanced")?;

        // In-game message + counters
        let play = ensure(doc, &root, "div", "rc-play", "")?;
        let message = ensure(doc, &play, "h1", "rc-message", "font-weight:bold; margin-bottom:16px;")?;
        let counters = ensure(doc, &play, "p", "rc-counters", "")?;

        // Result panel
        let result = ensure(doc, &root, "div", "rc-result", PANEL_STYLE)?;
        let heading = ensure(doc, &result, "h2", "rc-result-title", "font-size:28px; font-weight:bold; margin-bottom:16px;")?;
        heading.set_text_content(Some("結果発表！"));
        let result_score = ensure(doc, &result, "p", "rc-result-score", "font-size:20px;")?;
        let result_rank = ensure(doc, &result, "p", "rc-result-rank", "font-size:20px;")?;
        let result_misses = ensure(doc, &result, "p", "rc-result-misses", "font-size:20px; color:#dc2626; margin-bottom:24px;")?;
        let retry_button = button(doc, &result, "rc-retry", "リトライ", "#2563eb")?;
        let back_button = button(doc, &result, "rc-back", "モード選択へ戻る", "#4b5563")?;
        let copy_button = button(doc, &result, "rc-share-copy", "シェア（コピー）", "#16a34a")?;
        let tweet_button = button(doc, &result, "rc-share-x", "Xでシェア", "#000000")?;

        let surface = Self {
            root,
            menu,
            play,
            message,
            counters,
            result,
            result_score,
            result_rank,
            result_misses,
            normal_button,
            advanced_button,
            retry_button,
            back_button,
            copy_button,
            tweet_button,
        };
        surface.show_feedback(&Feedback::new(Outcome::Ready));
        Ok(surface)
    }

    pub(crate) fn show_feedback(&self, feedback: &Feedback) {
        let effect = feedback.effect();
        self.root.set_class_name(effect.background);
        self.message.set_class_name(effect.animation);
        self.message.set_text_content(Some(&feedback.message()));
    }

    /// Sync panel visibility and counters with the session.
    pub(crate) fn render(&self, session: &GameSession) {
        let phase = session.phase();
        set_visible(&self.menu, phase == Phase::Idle);
        set_visible(&self.play, matches!(phase, Phase::Starting | Phase::Waiting | Phase::Cue));
        set_visible(&self.result, phase == Phase::Finished);

        self.counters.set_inner_html(&format!(
            "スコア: {} / ラウンド: {} / <span style='color:#dc2626;'>ミス: {}</span>",
            session.score(),
            session.round(),
            session.misses()
        ));
        if phase == Phase::Finished {
            self.result_score.set_text_content(Some(&format!("スコア: {}", session.score())));
            self.result_rank.set_text_content(Some(&format!("ランク: {}", session.rank().label())));
            self.result_misses.set_text_content(Some(&format!("ミス: {}", session.misses())));
        }
    }
}

fn set_visible(el: &Element, visible: bool) {
    if visible {
        let _ = el.remove_attribute("hidden");
    } else {
        let _ = el.set_attribute("hidden", "");
    }
}
