//! Persistent background music player.
//!
//! Wraps a looping `HtmlAudioElement` created off-DOM. Autoplay policies mean
//! `play()` can be rejected until the first user gesture; playback requests
//! therefore ignore the returned promise and the widget simply reflects the
//! intended state.

use wasm_bindgen::JsValue;
use web_sys::HtmlAudioElement;

use crate::Song;

pub struct MusicPlayer {
    element: HtmlAudioElement,
    song: &'static Song,
    playing: bool,
    muted: bool,
}

impl MusicPlayer {
    pub fn new(song: &'static Song) -> Result<Self, JsValue> {
        let element = HtmlAudioElement::new_with_src(song.url)?;
        element.set_loop(true);
        Ok(Self {
            element,
            song,
            playing: false,
            muted: false,
        })
    }

    pub fn song(&self) -> &'static Song {
        self.song
    }

    pub const fn is_playing(&self) -> bool {
        self.playing
    }

    pub const fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn play(&mut self) {
        self.playing = true;
        let _ = self.element.play();
    }

    pub fn pause(&mut self) {
        self.playing = false;
        self.element.pause().ok();
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        self.element.set_muted(self.muted);
    }

    /// Switch tracks, reloading the element and resuming if we were playing.
    pub fn set_song(&mut self, song: &'static Song) {
        if std::ptr::eq(self.song, song) {
            return;
        }
        self.song = song;
        self.element.set_src(song.url);
        self.element.load();
        if self.playing {
            let _ = self.element.play();
        }
    }
}
