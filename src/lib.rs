//! Dental Valentine core crate.
//!
//! A single-session interactive greeting card for a future dentist: hero
//! screen, trivia "checkup" quiz with two embedded memory cutscenes, photo
//! gallery, a teeth-cleaning canvas mini-game and a closing love letter, with
//! a persistent background music player and a mouth open/close transition.
//! The testable game logic (plaque scrub engine, quiz flow) is pure Rust so
//! it runs under native `cargo test`; the thin web adapter in `card` wires it
//! to the DOM and canvas via `start_card()`.

use wasm_bindgen::prelude::*;

mod card;

pub use card::Section;
pub use card::quiz::{MemoryKind, QuizAdvance, QuizState, TERRACE_QUESTION_ID};
pub use card::rng::Rng64;
pub use card::scrub::PlaqueMask;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// Card content data. Everything personal lives in these tables so the card can
// be re-dedicated by editing constants only.
// -----------------------------------------------------------------------------

/// One trivia question of the checkup quiz.
#[derive(Debug, Clone, Copy)]
pub struct QuizQuestion {
    pub id: u32,
    pub question: &'static str,
    pub options: [&'static str; 4],
    /// Index into `options`.
    pub correct: usize,
    /// Shown after answering, right or wrong.
    pub success_message: &'static str,
}

/// A track for the background player.
#[derive(Debug, Clone, Copy)]
pub struct Song {
    pub title: &'static str,
    pub artist: &'static str,
    pub url: &'static str,
    pub cover_url: &'static str,
}

/// A gallery album: cover plus the images shown in the fullscreen view.
#[derive(Debug, Clone, Copy)]
pub struct Photo {
    pub caption: &'static str,
    pub cover_url: &'static str,
    pub album_urls: [&'static str; 3],
}

pub const PARTNER_NAME: &str = "My Favorite Future Dentist";

pub const PROFILE_PICTURE: &str = "https://picsum.photos/400/400?random=1";

/// Clean teeth revealed underneath the plaque layer of the mini-game.
pub const TEETH_IMAGE_SRC: &str =
    "https://img.freepik.com/free-vector/human-mouth-with-teeth_1308-44445.jpg?w=800";

// Songs are `static` so the player can compare tracks by address.
pub static BACKGROUND_MUSIC: Song = Song {
    title: "Can't Help Falling in Love",
    artist: "Elvis Presley",
    url: "https://upload.wikimedia.org/wikipedia/commons/e/e6/Clair_de_lune_%28Debussy%29_Suite_bergamasque.ogg",
    cover_url: "https://picsum.photos/100/100?grayscale",
};

/// Plays from the cleaning section onwards.
pub static LETTER_MUSIC: Song = Song {
    title: "A Thousand Years",
    artist: "Christina Perri",
    url: "https://cdn.pixabay.com/download/audio/2022/02/07/audio_142759d5b4.mp3?filename=piano-moment-11143.mp3",
    cover_url: "https://picsum.photos/100/100?blur=5",
};

// Memory cutscene assets. The terrace moment is visual-only (10 s); the final
// surprise (15 s) pauses the background music and plays its own track.
pub const TERRACE_MEMORY_IMAGE: &str = "./terrace_memory.png";
pub const FINAL_MEMORY_IMAGE: &str = "https://picsum.photos/600/800?random=99";
pub const FINAL_MEMORY_AUDIO: &str =
    "https://cdn.pixabay.com/download/audio/2022/05/27/audio_1808fbf07a.mp3?filename=music-for-videos-piano-moment-11143.mp3";

pub const PHOTOS: &[Photo] = &[
    Photo {
        caption: "The brightest smile",
        cover_url: "./assets/cover1.jpg",
        album_urls: [
            "https://picsum.photos/600/800?random=101",
            "https://picsum.photos/600/800?random=102",
            "https://picsum.photos/600/800?random=103",
        ],
    },
    Photo {
        caption: "Our sweet memories",
        cover_url: "./assets/cover2.jpg",
        album_urls: [
            "https://picsum.photos/600/800?random=201",
            "https://picsum.photos/600/800?random=202",
            "https://picsum.photos/600/800?random=203",
        ],
    },
    Photo {
        caption: "Studying hard",
        cover_url: "./assets/cover3.jpg",
        album_urls: [
            "https://picsum.photos/600/800?random=301",
            "https://picsum.photos/600/800?random=302",
            "https://picsum.photos/600/800?random=303",
        ],
    },
    Photo {
        caption: "Date night",
        cover_url: "./assets/cover4.jpg",
        album_urls: [
            "https://picsum.photos/600/800?random=401",
            "https://picsum.photos/600/800?random=402",
            "https://picsum.photos/600/800?random=403",
        ],
    },
    Photo {
        caption: "Adventures together",
        cover_url: "./assets/cover5.jpg",
        album_urls: [
            "https://picsum.photos/600/800?random=501",
            "https://picsum.photos/600/800?random=502",
            "https://picsum.photos/600/800?random=503",
        ],
    },
];

pub const QUIZ_QUESTIONS: &[QuizQuestion] = &[
    QuizQuestion {
        id: 1,
        question: "Which of these is sweet, but 100% cavity-free?",
        options: ["Chocolate", "Ice Cream", "My love for you", "Soda"],
        correct: 2,
        success_message: "Sugar-free and pure love!",
    },
    QuizQuestion {
        id: 2,
        question: "What's the 'Root' cause of my happiness?",
        options: ["Video Games", "You", "Pizza", "Sleep"],
        correct: 1,
        success_message: "You are the crown jewel of my life.",
    },
    QuizQuestion {
        id: 3,
        question: "If our love was a procedure, what would it be?",
        options: [
            "A simple cleaning",
            "A root canal",
            "An implant (forever)",
            "A checkup",
        ],
        correct: 2,
        success_message: "Because I want you in my life permanently!",
    },
    QuizQuestion {
        id: 4,
        question: "Where did we first meet?",
        options: ["At the Dental Clinic", "My terrace", "Coffee Shop", "College Library"],
        correct: 1,
        success_message: "The view was nice, but looking at you was better!",
    },
    QuizQuestion {
        id: 5,
        question: "When is our anniversary?",
        options: ["14/02/2023", "11/6/2023", "25/12/2023", "11/07/2023"],
        correct: 1,
        success_message: "Best day ever!",
    },
    QuizQuestion {
        id: 6,
        question: "What was the first song I sang for you?",
        options: ["Choo Lo", "Pehli Nazar Mein", "Tum Hi Ho", "Agar Tum Sath Ho"],
        correct: 1,
        success_message: "Baby I love you...",
    },
];

pub const LETTER_TITLE: &str = "My Dearest...";

pub const LETTER_PARAGRAPHS: &[&str] = &[
    "From the moment we met, you became the reason my world is brighter. Like a \
     perfectly polished smile, you light up every room you enter, and I find \
     myself lucky just to be in your orbit.",
    "I admire your dedication, your kindness, and the way you care for others. \
     You are my cavity-free sweetness in a sometimes bitter world, my permanent \
     implant that I never want to lose.",
    "Thank you for every laugh, every song, and every memory we've built. I \
     promise to always keep our love fresh, strong, and plaque-free. You are \
     not just my Valentine, but my best friend and my future.",
    "I love you more than words (or dental puns) could ever say.",
];

pub const LETTER_SIGNOFF: &str = "Happy Valentine's Day! ❤️";

// -----------------------------------------------------------------------------
// Unified entrypoint
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_card() -> Result<(), JsValue> {
    card::start_card()
}
