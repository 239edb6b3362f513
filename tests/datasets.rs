//! Sanity checks over the card's content tables.

use dental_valentine::{
    BACKGROUND_MUSIC, LETTER_MUSIC, LETTER_PARAGRAPHS, LETTER_SIGNOFF, LETTER_TITLE, PHOTOS,
    QUIZ_QUESTIONS, TERRACE_QUESTION_ID,
};

#[test]
fn quiz_questions_are_well_formed() {
    assert_eq!(QUIZ_QUESTIONS.len(), 6);
    for q in QUIZ_QUESTIONS {
        assert!(!q.question.is_empty());
        assert!(q.correct < q.options.len(), "question {} correct index", q.id);
        for opt in q.options {
            assert!(!opt.is_empty(), "question {} has an empty option", q.id);
        }
        assert!(!q.success_message.is_empty());
    }
}

#[test]
fn quiz_question_ids_are_unique() {
    let mut ids: Vec<u32> = QUIZ_QUESTIONS.iter().map(|q| q.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), QUIZ_QUESTIONS.len());
}

#[test]
fn terrace_question_exists() {
    assert!(
        QUIZ_QUESTIONS.iter().any(|q| q.id == TERRACE_QUESTION_ID),
        "the terrace cutscene needs its trigger question"
    );
}

#[test]
fn albums_have_covers_and_photos() {
    assert_eq!(PHOTOS.len(), 5);
    for photo in PHOTOS {
        assert!(!photo.caption.is_empty());
        assert!(!photo.cover_url.is_empty());
        for url in photo.album_urls {
            assert!(!url.is_empty(), "album '{}' has an empty url", photo.caption);
        }
    }
}

#[test]
fn songs_are_complete() {
    for song in [&BACKGROUND_MUSIC, &LETTER_MUSIC] {
        assert!(!song.title.is_empty());
        assert!(!song.artist.is_empty());
        assert!(!song.url.is_empty());
        assert!(!song.cover_url.is_empty());
    }
}

#[test]
fn letter_has_content() {
    assert!(!LETTER_TITLE.is_empty());
    assert!(!LETTER_PARAGRAPHS.is_empty());
    assert!(LETTER_PARAGRAPHS.iter().all(|p| !p.is_empty()));
    assert!(!LETTER_SIGNOFF.is_empty());
}
