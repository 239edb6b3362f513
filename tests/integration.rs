//! Native tests for the pure game logic: plaque scrub engine and quiz flow.

use dental_valentine::{
    MemoryKind, PlaqueMask, QUIZ_QUESTIONS, QuizAdvance, QuizState, Rng64, TERRACE_QUESTION_ID,
};

const W: i32 = 400;
const H: i32 = 300;

fn fresh_mask(seed: u64) -> PlaqueMask {
    let mut mask = PlaqueMask::new();
    let mut rng = Rng64::from_seed(seed);
    mask.initialize(W, H, &mut rng);
    mask
}

#[test]
fn fresh_mask_is_almost_fully_dirty() {
    let mut mask = fresh_mask(7);
    assert!(!mask.is_clean());
    let ratio = mask.evaluate_coverage();
    assert!(ratio >= 0.95, "fresh ratio was {ratio}");
}

#[test]
fn single_scrub_leaves_mask_dirty() {
    let mut mask = fresh_mask(7);
    mask.erase_at(10, 10);
    let ratio = mask.evaluate_coverage();
    assert!(ratio > 0.9, "ratio after one scrub was {ratio}");
    assert!(!mask.is_clean());
}

#[test]
fn dense_scrub_grid_reaches_clean_exactly_once() {
    let mut mask = fresh_mask(42);
    // Brush radius 20 over a 20px lattice (endpoints included) covers every
    // pixel of the surface.
    let mut completions = 0;
    for y in (0..=H).step_by(20) {
        for x in (0..=W).step_by(20) {
            if mask.erase_at(x, y) {
                completions += 1;
            }
        }
    }
    assert!(mask.is_clean());
    assert_eq!(completions, 1, "completion must fire exactly once");
    assert!(mask.evaluate_coverage() < 0.02);

    // Latched: further scrubbing and re-evaluation change nothing.
    assert!(!mask.erase_at(50, 50));
    assert!(mask.evaluate_coverage() < 0.02);
    assert!(mask.is_clean());
}

#[test]
fn coverage_never_increases_while_scrubbing() {
    let mut mask = fresh_mask(3);
    let mut rng = Rng64::from_seed(99);
    let mut last = mask.evaluate_coverage();
    for _ in 0..200 {
        let x = rng.range_f64(0.0, f64::from(W)) as i32;
        let y = rng.range_f64(0.0, f64::from(H)) as i32;
        mask.erase_at(x, y);
        let ratio = mask.evaluate_coverage();
        assert!(ratio <= last, "ratio rose from {last} to {ratio}");
        last = ratio;
    }
}

#[test]
fn reinitialize_resets_a_clean_mask() {
    let mut mask = fresh_mask(11);
    for y in (0..=H).step_by(20) {
        for x in (0..=W).step_by(20) {
            mask.erase_at(x, y);
        }
    }
    assert!(mask.is_clean());

    let mut rng = Rng64::from_seed(12);
    mask.initialize(W, H, &mut rng);
    assert!(!mask.is_clean());
    assert!(mask.evaluate_coverage() >= 0.95);
}

#[test]
fn zero_sized_surface_stays_inert() {
    let mut mask = PlaqueMask::new();
    let mut rng = Rng64::from_seed(1);
    mask.initialize(0, 0, &mut rng);
    assert!(!mask.is_initialized());
    assert!(!mask.erase_at(5, 5));
    // Without a surface the coverage reads fully dirty and never latches.
    assert!(mask.evaluate_coverage() >= 1.0);
    assert!(!mask.is_clean());
}

#[test]
fn out_of_bounds_scrubs_are_harmless() {
    let mut mask = fresh_mask(5);
    mask.erase_at(-100, -100);
    mask.erase_at(W + 500, H + 500);
    assert!(mask.evaluate_coverage() >= 0.9);
}

// --- Quiz flow ---------------------------------------------------------------

#[test]
fn full_checkup_walkthrough() {
    let mut quiz = QuizState::new(QUIZ_QUESTIONS);
    assert!(quiz.advance().is_none(), "cannot advance before answering");

    let mut memories = Vec::new();
    loop {
        let correct = quiz.current().correct;
        assert_eq!(quiz.select(correct), Some(true));
        match quiz.advance() {
            Some(QuizAdvance::NextQuestion) => {}
            Some(QuizAdvance::Memory(kind)) => {
                memories.push(kind);
                match quiz.resume_after_memory(kind) {
                    QuizAdvance::NextQuestion => {}
                    QuizAdvance::Complete => break,
                    QuizAdvance::Memory(_) => unreachable!(),
                }
            }
            Some(QuizAdvance::Complete) => break,
            None => unreachable!("answered question must advance"),
        }
    }
    assert_eq!(quiz.score(), QUIZ_QUESTIONS.len() as u32);
    assert_eq!(memories, [MemoryKind::Terrace, MemoryKind::Final]);
}

#[test]
fn terrace_memory_follows_the_terrace_question() {
    let mut quiz = QuizState::new(QUIZ_QUESTIONS);
    while quiz.current().id != TERRACE_QUESTION_ID {
        quiz.select(quiz.current().correct);
        assert!(matches!(quiz.advance(), Some(QuizAdvance::NextQuestion)));
    }
    let before = quiz.index();
    quiz.select(0);
    assert!(matches!(
        quiz.advance(),
        Some(QuizAdvance::Memory(MemoryKind::Terrace))
    ));
    // The cutscene itself does not move the quiz forward.
    assert_eq!(quiz.index(), before);
    assert!(matches!(
        quiz.resume_after_memory(MemoryKind::Terrace),
        QuizAdvance::NextQuestion
    ));
    assert_eq!(quiz.index(), before + 1);
}

#[test]
fn first_selection_locks_in() {
    let mut quiz = QuizState::new(QUIZ_QUESTIONS);
    let wrong = (quiz.current().correct + 1) % 4;
    assert_eq!(quiz.select(wrong), Some(false));
    assert_eq!(quiz.score(), 0);
    // Follow-up clicks are ignored; the first answer stands.
    assert_eq!(quiz.select(quiz.current().correct), None);
    assert_eq!(quiz.score(), 0);
    assert_eq!(quiz.selected(), Some(wrong));
    assert_eq!(quiz.answered_correctly(), Some(false));
}

#[test]
fn wrong_answers_still_finish_the_checkup() {
    let mut quiz = QuizState::new(QUIZ_QUESTIONS);
    loop {
        let wrong = (quiz.current().correct + 1) % 4;
        quiz.select(wrong);
        match quiz.advance() {
            Some(QuizAdvance::Memory(kind)) => {
                if matches!(quiz.resume_after_memory(kind), QuizAdvance::Complete) {
                    break;
                }
            }
            Some(QuizAdvance::Complete) => break,
            Some(QuizAdvance::NextQuestion) => {}
            None => unreachable!(),
        }
    }
    assert_eq!(quiz.score(), 0);
}

// --- Memory overlay timing ----------------------------------------------------

#[test]
fn memory_kinds_carry_their_own_duration_and_audio() {
    assert_eq!(MemoryKind::Terrace.duration_ms(), 10_000.0);
    assert_eq!(MemoryKind::Final.duration_ms(), 15_000.0);
    assert!(!MemoryKind::Terrace.has_audio());
    assert!(MemoryKind::Final.has_audio());
}
