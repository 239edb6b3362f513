//! Card shell: section routing, overlay timing, DOM construction and the
//! canvas adapter for the plaque-scrub mini-game.
//!
//! The narrative is linear: hero -> checkup quiz (with two memory cutscenes)
//! -> gallery -> teeth cleaning -> letter. All durable state lives in a
//! single thread-local [`CardState`]; DOM events and a
//! `request_animation_frame` tick mutate it and patch the DOM to match. The
//! testable logic (scrub engine, quiz flow, rng) lives in the submodules and
//! stays free of web APIs.

pub mod audio;
pub mod quiz;
pub mod rng;
pub mod scrub;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlAudioElement, HtmlCanvasElement, ImageData,
    window,
};

use crate::{
    BACKGROUND_MUSIC, FINAL_MEMORY_AUDIO, FINAL_MEMORY_IMAGE, LETTER_MUSIC, LETTER_PARAGRAPHS,
    LETTER_SIGNOFF, LETTER_TITLE, PARTNER_NAME, PHOTOS, PROFILE_PICTURE, QUIZ_QUESTIONS,
    TEETH_IMAGE_SRC, TERRACE_MEMORY_IMAGE,
};
use audio::MusicPlayer;
use quiz::{MemoryKind, QuizAdvance, QuizState};
use rng::Rng64;
use scrub::PlaqueMask;

// --- Sections & timing -------------------------------------------------------

/// The card's linear narrative stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Hero,
    Quiz,
    Gallery,
    Cleaning,
    Letter,
}

/// Mouth overlay: close over the old section, swap while shut, reopen.
const MOUTH_CLOSE_MS: f64 = 750.0;
const MOUTH_HOLD_MS: f64 = 500.0;

/// Toothbrush wiggle stops this long after the last pointer move.
const SCRUB_DECAY_MS: f64 = 100.0;

/// Plaque layer tints: base yellow, darker grime where blemishes stacked.
const PLAQUE_TINT: [u8; 3] = [253, 224, 71];
const GRIME_TINT: [u8; 3] = [234, 179, 8];
/// Alpha above the base fill means a blemish stamp landed there.
const GRIME_ALPHA: u8 = 160;

/// A pending section swap hidden behind the mouth transition.
struct MouthSwap {
    started_ms: f64,
    target: Section,
    swapped: bool,
}

/// An active fullscreen memory cutscene.
struct MemoryOverlay {
    kind: MemoryKind,
    started_ms: f64,
}

/// Runtime card state.
struct CardState {
    section: Section,
    swap: Option<MouthSwap>,
    memory: Option<MemoryOverlay>,
    quiz: QuizState,
    // --- Cleaning mini-game ---
    mask: PlaqueMask,
    mask_dirty: bool,
    clean_revealed: bool,
    canvas: Option<HtmlCanvasElement>,
    ctx: Option<CanvasRenderingContext2d>,
    frame: Vec<u8>, // scratch RGBA buffer reused between blits
    scrubbing: bool,
    last_scrub_ms: f64,
    // --- Audio ---
    music: MusicPlayer,
    memory_audio: HtmlAudioElement,
}

thread_local! {
    static CARD_STATE: RefCell<Option<CardState>> = RefCell::new(None);
}

type FrameCallback = std::rc::Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

// --- Entry -------------------------------------------------------------------

pub fn start_card() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    inject_styles(&doc)?;
    build_chrome(&doc)?;

    let memory_audio = HtmlAudioElement::new_with_src(FINAL_MEMORY_AUDIO)?;
    let mut state = CardState {
        section: Section::Hero,
        swap: None,
        memory: None,
        quiz: QuizState::new(QUIZ_QUESTIONS),
        mask: PlaqueMask::new(),
        mask_dirty: false,
        clean_revealed: false,
        canvas: None,
        ctx: None,
        frame: Vec::new(),
        scrubbing: false,
        last_scrub_ms: 0.0,
        music: MusicPlayer::new(&BACKGROUND_MUSIC)?,
        memory_audio,
    };
    render_section(&doc, &mut state)?;
    CARD_STATE.with(|cell| cell.replace(Some(state)));

    // Delegated click handling: one listener, dispatch on `sc-` element ids.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let Some(id) = find_action_id(&evt) else {
                return;
            };
            CARD_STATE.with(|cell| {
                if let Some(state) = cell.borrow_mut().as_mut() {
                    if let Some(doc) = window().and_then(|w| w.document()) {
                        handle_click(&doc, state, &id).ok();
                    }
                }
            });
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Window resizes re-measure the cleaning surface; the mask restarts from
    // a fresh raster (progress is intentionally not carried over).
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            CARD_STATE.with(|cell| {
                if let Some(state) = cell.borrow_mut().as_mut() {
                    if state.section == Section::Cleaning {
                        if let Some(doc) = window().and_then(|w| w.document()) {
                            size_cleaning_surface(&doc, state);
                        }
                    }
                }
            });
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    start_card_loop();
    Ok(())
}

fn start_card_loop() {
    let f: FrameCallback = std::rc::Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        CARD_STATE.with(|cell| {
            if let Some(state) = cell.borrow_mut().as_mut() {
                if let Some(doc) = window().and_then(|w| w.document()) {
                    card_tick(&doc, state, ts);
                }
            }
        });
        if let Some(w) = window() {
            let _ =
                w.request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(w) = window() {
        let _ = w.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

// --- Tick --------------------------------------------------------------------

fn card_tick(doc: &Document, state: &mut CardState, now: f64) {
    // Mouth swap milestones: content swaps while the jaws are shut.
    let mut swap_target = None;
    let mut swap_finished = false;
    if let Some(swap) = &state.swap {
        let elapsed = now - swap.started_ms;
        if !swap.swapped && elapsed >= MOUTH_CLOSE_MS {
            swap_target = Some(swap.target);
        }
        if elapsed >= MOUTH_CLOSE_MS + MOUTH_HOLD_MS {
            swap_finished = true;
        }
    }
    if let Some(target) = swap_target {
        if let Some(swap) = state.swap.as_mut() {
            swap.swapped = true;
        }
        state.section = target;
        render_section(doc, state).ok();
    }
    if swap_finished {
        set_jaws(doc, false);
        state.swap = None;
    }

    // Memory cutscene expiry resumes the quiz flow.
    let expired = state
        .memory
        .as_ref()
        .filter(|m| now - m.started_ms >= m.kind.duration_ms())
        .map(|m| m.kind);
    if let Some(kind) = expired {
        state.memory = None;
        if let Some(el) = doc.get_element_by_id("sc-memory") {
            el.remove();
        }
        if kind.has_audio() {
            state.memory_audio.pause().ok();
            state.music.play();
        }
        match state.quiz.resume_after_memory(kind) {
            QuizAdvance::NextQuestion => {
                render_section(doc, state).ok();
            }
            QuizAdvance::Complete => {
                state.section = Section::Gallery;
                render_section(doc, state).ok();
            }
            QuizAdvance::Memory(_) => {}
        }
    }

    // Toothbrush wiggle decays shortly after the pointer stops.
    if state.scrubbing && now - state.last_scrub_ms > SCRUB_DECAY_MS {
        state.scrubbing = false;
        if let Some(brush) = doc.get_element_by_id("sc-brush") {
            brush.set_class_name("");
        }
    }

    if state.section == Section::Cleaning {
        if state.mask_dirty {
            blit_mask(state).ok();
            state.mask_dirty = false;
        }
        // One-shot completion reveal once the mask latches clean.
        if state.mask.is_clean() && !state.clean_revealed {
            state.clean_revealed = true;
            reveal_clean(doc);
        }
    }

    sync_audio_widget(doc, state);
}

// --- Click dispatch ----------------------------------------------------------

/// Walk from the click target up to the nearest ancestor carrying one of our
/// action ids.
fn find_action_id(evt: &web_sys::MouseEvent) -> Option<String> {
    let mut cur = evt.target().and_then(|t| t.dyn_into::<Element>().ok());
    while let Some(el) = cur {
        let id = el.id();
        if is_action_id(&id) {
            return Some(id);
        }
        cur = el.parent_element();
    }
    None
}

fn is_action_id(id: &str) -> bool {
    matches!(
        id,
        "sc-start"
            | "sc-next"
            | "sc-continue"
            | "sc-letter-btn"
            | "sc-album-close"
            | "sc-audio-toggle"
            | "sc-audio-mute"
    ) || id
        .strip_prefix("sc-opt-")
        .is_some_and(|n| n.parse::<usize>().is_ok())
        || id
            .strip_prefix("sc-album-")
            .is_some_and(|n| n.parse::<usize>().is_ok())
}

fn handle_click(doc: &Document, state: &mut CardState, id: &str) -> Result<(), JsValue> {
    match id {
        "sc-start" => {
            if state.section == Section::Hero && state.swap.is_none() {
                // First user gesture; autoplay is allowed from here.
                state.music.play();
                set_jaws(doc, true);
                state.swap = Some(MouthSwap {
                    started_ms: now_ms(),
                    target: Section::Quiz,
                    swapped: false,
                });
            }
        }
        "sc-next" => {
            if state.section == Section::Quiz {
                match state.quiz.advance() {
                    Some(QuizAdvance::Memory(kind)) => show_memory(doc, state, kind)?,
                    Some(QuizAdvance::NextQuestion) => render_section(doc, state)?,
                    Some(QuizAdvance::Complete) => {
                        state.section = Section::Gallery;
                        render_section(doc, state)?;
                    }
                    None => {}
                }
            }
        }
        "sc-continue" => {
            if state.section == Section::Gallery {
                state.music.set_song(&LETTER_MUSIC);
                state.music.play();
                state.section = Section::Cleaning;
                render_section(doc, state)?;
            }
        }
        "sc-letter-btn" => {
            if state.section == Section::Cleaning {
                state.section = Section::Letter;
                render_section(doc, state)?;
            }
        }
        "sc-album-close" => {
            if let Some(el) = doc.get_element_by_id("sc-album-view") {
                el.remove();
            }
        }
        "sc-audio-toggle" => state.music.toggle(),
        "sc-audio-mute" => state.music.toggle_mute(),
        _ => {
            if let Some(n) = id.strip_prefix("sc-opt-").and_then(|n| n.parse().ok()) {
                if state.section == Section::Quiz && state.quiz.select(n).is_some() {
                    render_section(doc, state)?;
                }
            } else if let Some(n) = id.strip_prefix("sc-album-").and_then(|n| n.parse().ok()) {
                if state.section == Section::Gallery {
                    open_album(doc, n)?;
                }
            }
        }
    }
    Ok(())
}

// --- Memory cutscenes --------------------------------------------------------

fn show_memory(doc: &Document, state: &mut CardState, kind: MemoryKind) -> Result<(), JsValue> {
    let overlay = doc.create_element("div")?;
    overlay.set_id("sc-memory");
    overlay.set_attribute(
        "style",
        "position:fixed; inset:0; z-index:120; background:#000; display:flex; \
         align-items:center; justify-content:center; overflow:hidden;",
    )?;
    overlay.set_inner_html(&memory_html(kind));
    body_append(doc, &overlay)?;

    if kind.has_audio() {
        state.music.pause();
        state.memory_audio.set_current_time(0.0);
        state.memory_audio.set_volume(1.0);
        let _ = state.memory_audio.play();
    }
    state.memory = Some(MemoryOverlay {
        kind,
        started_ms: now_ms(),
    });
    Ok(())
}

fn memory_html(kind: MemoryKind) -> String {
    let (image, icon, title, subtitle, zoom_s) = match kind {
        MemoryKind::Terrace => (
            TERRACE_MEMORY_IMAGE,
            "🌙",
            "It all started under the moon...",
            "Just you, me, and the stars.",
            12,
        ),
        MemoryKind::Final => (
            FINAL_MEMORY_IMAGE,
            "❤️",
            "And our journey continues...",
            "Every moment with you is a gift.",
            17,
        ),
    };
    // Zoom runs slightly longer than the overlay so it never finishes early.
    format!(
        "<img src='{image}' alt='Special Memory' style=\"position:absolute; inset:0; \
         width:100%; height:100%; object-fit:cover; opacity:0.8; \
         animation:sc-kenburns {zoom_s}s linear forwards;\"/>\
         <div style='position:absolute; inset:0; \
         background:linear-gradient(to top, rgba(0,0,0,0.8), transparent 40%, rgba(0,0,0,0.4));'></div>\
         <div style='position:relative; z-index:1; text-align:center; padding:32px; max-width:32rem;'>\
         <div class='sc-float' style='font-size:64px; margin-bottom:24px;'>{icon}</div>\
         <h2 class='sc-script' style='font-size:2.6rem; color:#fff; margin:0 0 16px;'>{title}</h2>\
         <p style='color:#e2e8f0; font-size:1.1rem; font-style:italic; margin:0;'>{subtitle}</p>\
         </div>"
    )
}

// --- Cleaning mini-game adapter ----------------------------------------------

/// Look up the freshly rendered canvas, wire pointer listeners and build the
/// first plaque raster at the container's rendered size.
fn setup_cleaning(doc: &Document, state: &mut CardState) -> Result<(), JsValue> {
    let canvas: HtmlCanvasElement = doc
        .get_element_by_id("sc-plaque")
        .ok_or_else(|| JsValue::from_str("no plaque canvas"))?
        .dyn_into()?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    // Mouse and touch funnel into the same scrub path so the engine sees one
    // ordered stream of erase coordinates.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let (x, y) = (f64::from(evt.offset_x()), f64::from(evt.offset_y()));
            CARD_STATE.with(|cell| {
                if let Some(state) = cell.borrow_mut().as_mut() {
                    handle_scrub(state, x, y);
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let canvas_touch = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::TouchEvent| {
            evt.prevent_default();
            if let Some(touch) = evt.touches().get(0) {
                let rect = canvas_touch.get_bounding_client_rect();
                let x = f64::from(touch.client_x()) - rect.left();
                let y = f64::from(touch.client_y()) - rect.top();
                CARD_STATE.with(|cell| {
                    if let Some(state) = cell.borrow_mut().as_mut() {
                        handle_scrub(state, x, y);
                    }
                });
            }
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            if let Some(doc) = window().and_then(|w| w.document()) {
                if let Some(brush) = doc.get_element_by_id("sc-brush") {
                    hide(&brush);
                }
            }
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    state.canvas = Some(canvas);
    state.ctx = Some(ctx);
    state.clean_revealed = false;
    size_cleaning_surface(doc, state);
    Ok(())
}

/// Match the canvas resolution to the container and start a fresh raster.
/// Zero dimensions (layout not settled) leave the mask uninitialized; the
/// next resize retries.
fn size_cleaning_surface(doc: &Document, state: &mut CardState) {
    let Some(container) = doc.get_element_by_id("sc-mouth") else {
        return;
    };
    let rect = container.get_bounding_client_rect();
    let (w, h) = (rect.width().round() as i32, rect.height().round() as i32);
    if let Some(canvas) = &state.canvas {
        canvas.set_width(w.max(0) as u32);
        canvas.set_height(h.max(0) as u32);
    }
    let mut rng = Rng64::from_entropy();
    state.mask.initialize(w, h, &mut rng);
    state.mask_dirty = true;
}

/// One pointer move: update the toothbrush cursor and carve the mask.
fn handle_scrub(state: &mut CardState, x: f64, y: f64) {
    let now = now_ms();
    state.scrubbing = true;
    state.last_scrub_ms = now;
    if let Some(doc) = window().and_then(|w| w.document()) {
        if let Some(brush) = doc.get_element_by_id("sc-brush") {
            if state.mask.is_clean() {
                hide(&brush);
            } else {
                brush.set_class_name("sc-scrub");
                brush
                    .set_attribute(
                        "style",
                        &format!(
                            "position:absolute; left:{x:.0}px; top:{y:.0}px; z-index:30; \
                             font-size:48px; pointer-events:none; \
                             transform:translate(-50%,-50%); \
                             filter:drop-shadow(0 8px 8px rgba(0,0,0,0.3));"
                        ),
                    )
                    .ok();
            }
        }
    }
    if !state.mask.is_clean() {
        // The one-shot return is folded into the tick's latch check.
        let _ = state.mask.erase_at(x.round() as i32, y.round() as i32);
        state.mask_dirty = true;
    }
}

/// Copy the alpha raster onto the canvas: plaque tint everywhere the mask is
/// set, the darker grime tint where blemish stamps raised it.
fn blit_mask(state: &mut CardState) -> Result<(), JsValue> {
    let Some(ctx) = &state.ctx else {
        return Ok(());
    };
    if !state.mask.is_initialized() {
        return Ok(());
    }
    let (w, h) = (state.mask.width(), state.mask.height());
    let frame = &mut state.frame;
    frame.clear();
    frame.reserve(w * h * 4);
    for &a in state.mask.alpha() {
        let tint = if a > GRIME_ALPHA { GRIME_TINT } else { PLAQUE_TINT };
        frame.extend_from_slice(&[tint[0], tint[1], tint[2], a]);
    }
    let image =
        ImageData::new_with_u8_clamped_array_and_sh(Clamped(frame.as_slice()), w as u32, h as u32)?;
    ctx.put_image_data(&image, 0.0, 0.0)?;
    Ok(())
}

/// Fade the plaque layer out and show the completion affordance. Runs once.
fn reveal_clean(doc: &Document) {
    if let Some(canvas) = doc.get_element_by_id("sc-plaque") {
        canvas
            .set_attribute(
                "style",
                "position:absolute; inset:0; z-index:10; transition:opacity 1s; opacity:0; \
                 pointer-events:none;",
            )
            .ok();
    }
    if let Some(brush) = doc.get_element_by_id("sc-brush") {
        hide(&brush);
    }
    if let Some(sparkle) = doc.get_element_by_id("sc-sparkle") {
        sparkle
            .set_attribute(
                "style",
                "position:absolute; inset:0; z-index:20; pointer-events:none; display:block;",
            )
            .ok();
    }
    if let Some(done) = doc.get_element_by_id("sc-clean-done") {
        done.set_attribute(
            "style",
            "margin-top:32px; text-align:center; transition:all 0.7s; opacity:1; \
             transform:translateY(0);",
        )
        .ok();
    }
}

// --- Gallery -----------------------------------------------------------------

fn open_album(doc: &Document, index: usize) -> Result<(), JsValue> {
    let Some(photo) = PHOTOS.get(index) else {
        return Ok(());
    };
    let overlay = doc.create_element("div")?;
    overlay.set_id("sc-album-view");
    overlay.set_attribute(
        "style",
        "position:fixed; inset:0; z-index:110; background:rgba(0,0,0,0.95); \
         overflow-y:auto; padding:80px 16px;",
    )?;
    let mut images = String::new();
    for url in std::iter::once(&photo.cover_url).chain(photo.album_urls.iter()) {
        images.push_str(&format!(
            "<div style='border-radius:8px; overflow:hidden; box-shadow:0 25px 50px rgba(0,0,0,0.5); \
             margin-bottom:16px;'><img src='{url}' style='width:100%; display:block;'/></div>"
        ));
    }
    overlay.set_inner_html(&format!(
        "<div style='position:fixed; top:0; left:0; right:0; display:flex; align-items:center; \
         justify-content:space-between; padding:16px; \
         background:linear-gradient(to bottom, rgba(0,0,0,0.8), transparent); z-index:1;'>\
         <button id='sc-album-close' style='width:40px; height:40px; border:none; border-radius:50%; \
         background:rgba(255,255,255,0.1); color:#fff; font-size:20px; cursor:pointer;'>‹</button>\
         <h3 style='color:#fff; margin:0; font-size:1.1rem;'>{caption}</h3>\
         <div style='width:40px;'></div></div>\
         <div style='max-width:28rem; margin:0 auto;'>{images}\
         <p style='text-align:center; color:rgba(255,255,255,0.5); font-size:0.9rem;'>End of album</p></div>",
        caption = photo.caption,
    ));
    body_append(doc, &overlay)
}

// --- Section rendering -------------------------------------------------------

fn render_section(doc: &Document, state: &mut CardState) -> Result<(), JsValue> {
    let root = doc
        .get_element_by_id("sc-root")
        .ok_or_else(|| JsValue::from_str("no card root"))?;
    // Leaving the cleaning screen discards the surface with it.
    if state.section != Section::Cleaning {
        state.canvas = None;
        state.ctx = None;
    }
    match state.section {
        Section::Hero => root.set_inner_html(&hero_html()),
        Section::Quiz => root.set_inner_html(&quiz_html(&state.quiz)),
        Section::Gallery => root.set_inner_html(&gallery_html()),
        Section::Cleaning => {
            root.set_inner_html(&cleaning_html());
            setup_cleaning(doc, state)?;
        }
        Section::Letter => root.set_inner_html(&letter_html()),
    }
    if let Some(win) = window() {
        win.scroll_to_with_x_and_y(0.0, 0.0);
    }
    Ok(())
}

fn hero_html() -> String {
    format!(
        "<div style='display:flex; flex-direction:column; align-items:center; \
         justify-content:center; min-height:85vh; text-align:center; padding:24px; \
         position:relative; overflow:hidden;'>\
         <div class='sc-float' style='position:absolute; top:40px; left:24px; font-size:40px; \
         opacity:0.5;'>❤️</div>\
         <div class='sc-float' style='position:absolute; top:80px; right:48px; font-size:44px; \
         opacity:0.4; animation-delay:1s;'>🦷</div>\
         <div class='sc-float' style='position:absolute; bottom:140px; left:32px; font-size:32px; \
         opacity:0.4; animation-delay:3s;'>🦷</div>\
         <div style='position:relative; margin-bottom:32px;'>\
         <div style='width:192px; height:192px; border-radius:50%; overflow:hidden; \
         border:4px solid #fff; box-shadow:0 20px 40px rgba(0,0,0,0.15); background:#fff;'>\
         <img src='{profile}' alt='Profile' style='width:100%; height:100%; object-fit:cover;'/></div>\
         <div style='position:absolute; bottom:-8px; right:-8px; background:#fff; \
         border-radius:50%; padding:8px; border:2px solid #5eead4; \
         box-shadow:0 4px 8px rgba(0,0,0,0.1); font-size:22px;'>🦷</div></div>\
         <h1 class='sc-script' style='font-size:2.4rem; margin:0 0 8px; color:#1e293b;'>\
         Hey there, <span style='color:#f43f5e;'>{partner}</span></h1>\
         <p style='color:#475569; max-width:20rem; margin:0 0 40px; line-height:1.6;'>\
         You've filled the cavity in my heart.<br/>Before we extract some memories, \
         let's take an X-ray of our relationship!</p>\
         <button id='sc-start' style='padding:12px 32px; border:none; border-radius:9999px; \
         background:linear-gradient(to right, #2dd4bf, #14b8a6); color:#fff; font-weight:bold; \
         font-size:1rem; cursor:pointer; box-shadow:0 10px 25px rgba(45,212,191,0.4);'>\
         🦷 Start The Checkup</button>\
         <div class='sc-float' style='margin-top:32px; font-size:44px; opacity:0.6;'>🎸</div>\
         </div>",
        profile = PROFILE_PICTURE,
        partner = PARTNER_NAME,
    )
}

fn quiz_html(quiz: &QuizState) -> String {
    let question = quiz.current();
    let answered = quiz.selected().is_some();
    let progress = quiz.index() as f64 / quiz.len() as f64 * 100.0;

    let mut options = String::new();
    for (i, option) in question.options.iter().enumerate() {
        let base = "width:100%; padding:16px; border-radius:12px; text-align:left; \
                    font-weight:500; font-size:1rem; margin-bottom:12px; cursor:pointer; \
                    transition:all 0.3s; border:2px solid;";
        let (look, marker) = if !answered {
            ("background:#fff; border-color:#fff; color:#334155;", "")
        } else if i == question.correct {
            ("background:#f0fdf4; border-color:#4ade80; color:#166534;", " ✔")
        } else if Some(i) == quiz.selected() {
            ("background:#fef2f2; border-color:#f87171; color:#991b1b;", " ✘")
        } else {
            (
                "background:#f1f5f9; border-color:transparent; color:#94a3b8; opacity:0.5;",
                "",
            )
        };
        let disabled = if answered { " disabled" } else { "" };
        options.push_str(&format!(
            "<button id='sc-opt-{i}' style='{base}{look}'{disabled}>{option}{marker}</button>"
        ));
    }

    let feedback = if answered {
        let correct = quiz.answered_correctly() == Some(true);
        let (verdict, accent) = if correct {
            ("Spot on! ✨", "#22c55e")
        } else {
            ("Needs scaling!", "#ef4444")
        };
        let next_label = if quiz.index() + 1 == quiz.len() {
            "Finish Checkup →"
        } else {
            "Next Question →"
        };
        format!(
            "<div style='border-radius:12px; padding:16px; margin-bottom:16px; \
             border-left:4px solid {accent}; background:#fff; box-shadow:0 1px 3px rgba(0,0,0,0.08);'>\
             <p style='margin:0; color:#334155; font-style:italic;'>\
             <b style='font-style:normal; color:#0f172a;'>{verdict}</b> {message}</p></div>\
             <button id='sc-next' style='width:100%; padding:16px; border:none; border-radius:12px; \
             background:#1e293b; color:#fff; font-weight:bold; font-size:1rem; cursor:pointer; \
             box-shadow:0 10px 20px rgba(0,0,0,0.15);'>{next_label}</button>",
            message = question.success_message,
        )
    } else {
        String::new()
    };

    format!(
        "<div style='padding:24px; max-width:28rem; margin:0 auto; min-height:70vh; \
         display:flex; flex-direction:column; justify-content:center;'>\
         <div style='margin-bottom:32px;'>\
         <div style='display:flex; justify-content:space-between; align-items:flex-end; \
         margin-bottom:8px;'>\
         <span style='color:#0d9488; font-size:0.8rem; font-weight:bold; \
         letter-spacing:0.1em; text-transform:uppercase;'>Question {num} / {total}</span>\
         <span style='color:#94a3b8; font-size:0.75rem;'>🦷 Score: {score}</span></div>\
         <div style='width:100%; background:#e2e8f0; height:12px; border-radius:9999px; \
         overflow:hidden;'><div style='background:linear-gradient(to right, #2dd4bf, #5eead4); \
         height:100%; width:{progress:.0}%; transition:width 0.5s;'></div></div>\
         <h2 style='font-size:1.5rem; font-weight:bold; color:#1e293b; margin:24px 0 0; \
         line-height:1.3;'>{question}</h2></div>\
         <div>{options}</div>{feedback}</div>",
        num = quiz.index() + 1,
        total = quiz.len(),
        score = quiz.score(),
        question = question.question,
    )
}

fn gallery_html() -> String {
    let mut albums = String::new();
    for (i, photo) in PHOTOS.iter().enumerate() {
        // Every third album spans the full row, like a highlight strip.
        let span = if i % 3 == 0 {
            "grid-column:span 2; aspect-ratio:16/9;"
        } else {
            "aspect-ratio:1/1;"
        };
        albums.push_str(&format!(
            "<button id='sc-album-{i}' style='position:relative; border:none; padding:0; \
             border-radius:12px; overflow:hidden; cursor:pointer; background:#f1f5f9; \
             box-shadow:0 10px 20px rgba(0,0,0,0.12); {span}'>\
             <img src='{cover}' alt='{caption}' style='width:100%; height:100%; object-fit:cover;'/>\
             <div style='position:absolute; inset:0; background:rgba(0,0,0,0.2);'></div>\
             <div style='position:absolute; bottom:0; left:0; right:0; padding:12px; \
             text-align:left; background:linear-gradient(to top, rgba(0,0,0,0.8), transparent);'>\
             <p style='margin:0; color:#fff; font-weight:bold; font-size:0.85rem;'>{caption}</p>\
             <p style='margin:0; color:rgba(255,255,255,0.8); font-size:0.7rem;'>{count} photos</p>\
             </div></button>",
            cover = photo.cover_url,
            caption = photo.caption,
            count = photo.album_urls.len() + 1,
        ));
    }
    format!(
        "<div style='padding:24px; text-align:center; border-bottom:1px solid #e2e8f0; \
         background:rgba(255,255,255,0.6);'>\
         <h1 class='sc-script' style='font-size:1.9rem; color:#f43f5e; margin:0;'>Smiles We Share</h1></div>\
         <div style='padding:32px 16px; max-width:28rem; margin:0 auto;'>\
         <h2 class='sc-script' style='font-size:1.9rem; color:#0d9488; margin:0 0 8px; \
         text-align:center;'>Our Memories</h2>\
         <p style='text-align:center; color:#94a3b8; font-size:0.85rem; margin:0 0 24px;'>\
         Tap an album to see more</p>\
         <div style='display:grid; grid-template-columns:1fr 1fr; gap:12px;'>{albums}</div>\
         <div style='margin-top:48px; display:flex; justify-content:center;'>\
         <button id='sc-continue' style='padding:16px 32px; border:none; border-radius:9999px; \
         background:linear-gradient(to right, #14b8a6, #0d9488); color:#fff; font-weight:bold; \
         font-size:1rem; cursor:pointer; box-shadow:0 20px 30px rgba(20,184,166,0.3);'>\
         Continue →</button></div></div>",
    )
}

fn cleaning_html() -> String {
    format!(
        "<div style='display:flex; flex-direction:column; align-items:center; \
         justify-content:center; min-height:85vh; padding:16px; max-width:32rem; margin:0 auto;'>\
         <h2 class='sc-script' style='font-size:1.9rem; color:#0d9488; margin:0 0 8px; \
         text-align:center;'>Time to Brush!</h2>\
         <p style='color:#64748b; font-size:0.9rem; text-align:center; margin:0 0 32px;'>\
         Scrub thoroughly!<br/><b style='color:#14b8a6;'>Remove all the plaque to reveal the \
         smile.</b></p>\
         <div id='sc-mouth' style='position:relative; width:100%; aspect-ratio:16/9; \
         background:#fff; border-radius:24px; border:4px solid #f1f5f9; overflow:hidden; \
         cursor:none; touch-action:none; box-shadow:0 20px 40px rgba(0,0,0,0.12);'>\
         <img src='{teeth}' alt='Teeth' style='position:absolute; inset:0; width:100%; \
         height:100%; object-fit:cover; pointer-events:none; user-select:none;'/>\
         <canvas id='sc-plaque' style='position:absolute; inset:0; z-index:10; \
         transition:opacity 1s;'></canvas>\
         <div id='sc-brush' style='display:none;'>🪥</div>\
         <div id='sc-sparkle' style='display:none;'>\
         <span style='position:absolute; top:25%; left:25%; font-size:44px;'>✨</span>\
         <span style='position:absolute; bottom:33%; right:33%; font-size:52px;'>✨</span>\
         <span style='position:absolute; top:50%; right:25%; font-size:30px;'>✨</span></div></div>\
         <div id='sc-clean-done' style='margin-top:32px; text-align:center; transition:all 0.7s; \
         opacity:0; transform:translateY(40px); pointer-events:none;'>\
         <p style='color:#0d9488; font-weight:bold; font-size:1.4rem; margin:0 0 16px;'>\
         ✨ Pearl White!</p>\
         <button id='sc-letter-btn' style='padding:16px 40px; border:none; border-radius:9999px; \
         background:linear-gradient(to right, #f43f5e, #e11d48); color:#fff; font-weight:bold; \
         font-size:1.05rem; cursor:pointer; pointer-events:auto; \
         box-shadow:0 20px 30px rgba(244,63,94,0.3);'>Read My Letter →</button></div></div>",
        teeth = TEETH_IMAGE_SRC,
    )
}

fn letter_html() -> String {
    let mut paragraphs = String::new();
    for p in LETTER_PARAGRAPHS {
        paragraphs.push_str(&format!(
            "<p style='margin:0 0 16px; color:#334155; line-height:1.7; font-size:0.95rem;'>{p}</p>"
        ));
    }
    format!(
        "<div style='display:flex; flex-direction:column; align-items:center; \
         justify-content:center; min-height:85vh; padding:24px;'>\
         <div style='background:#fff; padding:32px; border-radius:16px; \
         box-shadow:0 25px 50px rgba(0,0,0,0.15); border:2px solid #ffe4e6; position:relative; \
         max-width:24rem; width:100%; transform:rotate(1deg);'>\
         <div style='position:absolute; top:-12px; left:50%; transform:translateX(-50%) \
         rotate(-2deg); width:96px; height:24px; background:rgba(94,234,212,0.5);'></div>\
         <h2 class='sc-script' style='font-size:2.2rem; color:#e11d48; margin:0 0 24px; \
         text-align:center;'>{title}</h2>\
         {paragraphs}\
         <p class='sc-script' style='font-size:1.8rem; text-align:right; color:#0d9488; \
         margin:24px 0 0;'>{signoff}</p>\
         <div class='sc-float' style='position:absolute; bottom:-16px; right:-16px; \
         font-size:44px;'>❤️</div></div>\
         <p style='margin-top:48px; color:#94a3b8; font-size:0.85rem;'>Forever &amp; Always</p>\
         </div>",
        title = LETTER_TITLE,
        signoff = LETTER_SIGNOFF,
    )
}

// --- Fixed chrome: styles, mouth overlay, audio widget -----------------------

fn inject_styles(doc: &Document) -> Result<(), JsValue> {
    if doc.get_element_by_id("sc-style").is_some() {
        return Ok(());
    }
    let style = doc.create_element("style")?;
    style.set_id("sc-style");
    style.set_text_content(Some(
        "body { margin:0; background:#f8fafc; color:#1e293b; \
         font-family:'Segoe UI', 'Helvetica Neue', sans-serif; }\
         .sc-script { font-family:'Brush Script MT', 'Segoe Script', cursive; }\
         .sc-float { animation: sc-float 8s ease-in-out infinite; }\
         .sc-spin { animation: sc-spin 8s linear infinite; }\
         .sc-scrub { animation: sc-scrub 0.2s linear infinite; }\
         @keyframes sc-float { 0% { translate:0 0; } 50% { translate:0 -14px; } \
         100% { translate:0 0; } }\
         @keyframes sc-spin { from { rotate:0deg; } to { rotate:360deg; } }\
         @keyframes sc-scrub { 0% { transform:translate(-50%,-50%) rotate(-15deg); } \
         50% { transform:translate(-50%,-50%) rotate(15deg); } \
         100% { transform:translate(-50%,-50%) rotate(-15deg); } }\
         @keyframes sc-kenburns { 0% { scale:1; } 100% { scale:1.15; } }",
    ));
    doc.head()
        .map(|h| h.append_child(&style))
        .transpose()?;
    Ok(())
}

fn build_chrome(doc: &Document) -> Result<(), JsValue> {
    // Content root
    if doc.get_element_by_id("sc-root").is_none() {
        let root = doc.create_element("div")?;
        root.set_id("sc-root");
        root.set_attribute(
            "style",
            "position:relative; max-width:32rem; margin:0 auto; min-height:100vh; \
             padding-bottom:120px;",
        )?;
        body_append(doc, &root)?;
    }

    // Mouth transition jaws, parked off-screen (open) until a swap runs.
    if doc.get_element_by_id("sc-jaw-top").is_none() {
        let top = doc.create_element("div")?;
        top.set_id("sc-jaw-top");
        top.set_attribute("style", &jaw_style(true, false))?;
        top.set_inner_html(&teeth_row_html(true));
        body_append(doc, &top)?;

        let msg = doc.create_element("div")?;
        msg.set_id("sc-mouth-msg");
        msg.set_attribute("style", &mouth_msg_style(false))?;
        msg.set_inner_html(
            "<div style='background:rgba(255,255,255,0.9); padding:16px 32px; \
             border-radius:9999px; border:4px solid #f472b6; \
             box-shadow:0 20px 40px rgba(0,0,0,0.2);'>\
             <h2 class='sc-script' style='margin:0; font-size:2.2rem; color:#e11d48; \
             white-space:nowrap;'>Open Wide! 🦷</h2></div>",
        );
        body_append(doc, &msg)?;

        let bottom = doc.create_element("div")?;
        bottom.set_id("sc-jaw-bottom");
        bottom.set_attribute("style", &jaw_style(false, false))?;
        bottom.set_inner_html(&teeth_row_html(false));
        body_append(doc, &bottom)?;
    }

    // Persistent audio widget
    if doc.get_element_by_id("sc-audio").is_none() {
        let widget = doc.create_element("div")?;
        widget.set_id("sc-audio");
        widget.set_attribute(
            "style",
            "position:fixed; bottom:16px; left:16px; right:16px; max-width:28rem; \
             margin:0 auto; z-index:50; background:rgba(255,255,255,0.85); \
             backdrop-filter:blur(8px); border:1px solid rgba(255,255,255,0.5); \
             border-radius:16px; padding:12px; box-shadow:0 20px 40px rgba(0,0,0,0.15); \
             display:flex; align-items:center; gap:12px;",
        )?;
        widget.set_inner_html(&format!(
            "<div id='sc-audio-cover' style='width:48px; height:48px; border-radius:50%; \
             overflow:hidden; border:2px solid #fda4af; flex-shrink:0;'>\
             <img src='{cover}' alt='Album Art' style='width:100%; height:100%; \
             object-fit:cover;'/></div>\
             <div style='flex:1; min-width:0;'>\
             <h3 id='sc-audio-title' style='margin:0; font-size:0.85rem; font-weight:bold; \
             color:#1e293b; white-space:nowrap; overflow:hidden; \
             text-overflow:ellipsis;'>{title}</h3>\
             <p id='sc-audio-artist' style='margin:0; font-size:0.75rem; color:#64748b; \
             white-space:nowrap; overflow:hidden; text-overflow:ellipsis;'>{artist}</p></div>\
             <button id='sc-audio-mute' style='border:none; background:none; font-size:18px; \
             cursor:pointer; padding:8px;'>🔊</button>\
             <button id='sc-audio-toggle' style='width:40px; height:40px; border:none; \
             border-radius:50%; background:#fb7185; color:#fff; font-size:16px; cursor:pointer; \
             box-shadow:0 10px 20px rgba(251,113,133,0.4);'>▶</button>",
            cover = BACKGROUND_MUSIC.cover_url,
            title = BACKGROUND_MUSIC.title,
            artist = BACKGROUND_MUSIC.artist,
        ));
        body_append(doc, &widget)?;
    }
    Ok(())
}

fn teeth_row_html(top: bool) -> String {
    let radius = if top {
        "border-radius:0 0 14px 14px;"
    } else {
        "border-radius:14px 14px 0 0;"
    };
    let mut teeth = String::new();
    for _ in 0..20 {
        teeth.push_str(&format!(
            "<div style='width:32px; height:40px; background:#f8fafc; margin:0 2px; \
             border:1px solid #e2e8f0; box-shadow:inset 0 2px 4px rgba(0,0,0,0.06); \
             flex-shrink:0; {radius}'></div>"
        ));
    }
    let align = if top {
        "align-items:flex-end;"
    } else {
        "align-items:flex-start;"
    };
    format!("<div style='display:flex; justify-content:center; width:120%; {align}'>{teeth}</div>")
}

fn jaw_style(top: bool, closed: bool) -> String {
    let (anchor, border, transform) = if top {
        (
            "top:0;",
            "border-bottom:8px solid #f472b6;",
            if closed { "translateY(0)" } else { "translateY(-120%)" },
        )
    } else {
        (
            "bottom:0;",
            "border-top:8px solid #f472b6;",
            if closed { "translateY(0)" } else { "translateY(120%)" },
        )
    };
    let align = if top {
        "align-items:flex-end;"
    } else {
        "align-items:flex-start;"
    };
    format!(
        "position:fixed; left:0; right:0; {anchor} height:50vh; background:#f9a8d4; {border} \
         z-index:130; pointer-events:none; display:flex; {align} justify-content:center; \
         overflow:hidden; box-shadow:0 0 40px rgba(0,0,0,0.25); \
         transition:transform 0.7s ease-in-out; transform:{transform};"
    )
}

fn mouth_msg_style(visible: bool) -> String {
    let look = if visible {
        "opacity:1; scale:1;"
    } else {
        "opacity:0; scale:0.5;"
    };
    format!(
        "position:fixed; top:50%; left:50%; transform:translate(-50%,-50%); z-index:131; \
         pointer-events:none; transition:all 0.5s 0.3s; {look}"
    )
}

fn set_jaws(doc: &Document, closed: bool) {
    if let Some(top) = doc.get_element_by_id("sc-jaw-top") {
        top.set_attribute("style", &jaw_style(true, closed)).ok();
    }
    if let Some(bottom) = doc.get_element_by_id("sc-jaw-bottom") {
        bottom.set_attribute("style", &jaw_style(false, closed)).ok();
    }
    if let Some(msg) = doc.get_element_by_id("sc-mouth-msg") {
        msg.set_attribute("style", &mouth_msg_style(closed)).ok();
    }
}

fn sync_audio_widget(doc: &Document, state: &CardState) {
    if let Some(cover) = doc.get_element_by_id("sc-audio-cover") {
        let spinning = cover.class_name() == "sc-spin";
        if state.music.is_playing() != spinning {
            cover.set_class_name(if state.music.is_playing() { "sc-spin" } else { "" });
        }
    }
    if let Some(toggle) = doc.get_element_by_id("sc-audio-toggle") {
        let glyph = if state.music.is_playing() { "⏸" } else { "▶" };
        if toggle.text_content().as_deref() != Some(glyph) {
            toggle.set_text_content(Some(glyph));
        }
    }
    if let Some(mute) = doc.get_element_by_id("sc-audio-mute") {
        let glyph = if state.music.is_muted() { "🔇" } else { "🔊" };
        if mute.text_content().as_deref() != Some(glyph) {
            mute.set_text_content(Some(glyph));
        }
    }
    if let Some(title) = doc.get_element_by_id("sc-audio-title") {
        let song = state.music.song();
        if title.text_content().as_deref() != Some(song.title) {
            title.set_text_content(Some(song.title));
            if let Some(artist) = doc.get_element_by_id("sc-audio-artist") {
                artist.set_text_content(Some(song.artist));
            }
            if let Some(cover) = doc.get_element_by_id("sc-audio-cover") {
                cover.set_inner_html(&format!(
                    "<img src='{}' alt='Album Art' style='width:100%; height:100%; \
                     object-fit:cover;'/>",
                    song.cover_url
                ));
            }
        }
    }
}

// --- Small helpers -----------------------------------------------------------

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn body_append(doc: &Document, el: &Element) -> Result<(), JsValue> {
    doc.body()
        .ok_or_else(|| JsValue::from_str("no body"))?
        .append_child(el)?;
    Ok(())
}

fn hide(el: &Element) {
    el.set_attribute("style", "display:none;").ok();
}
