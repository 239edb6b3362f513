//! Checkup quiz flow (pure logic).
//!
//! Linear question sequence with two memory cutscenes spliced in: a
//! visual-only "terrace" moment after the question about where the couple
//! first met, and a longer "final" moment with its own audio after the last
//! question. The shell renders DOM from this state and calls back in on
//! clicks and cutscene expiry.

use crate::QuizQuestion;

/// Question id that triggers the terrace memory when advanced past.
pub const TERRACE_QUESTION_ID: u32 = 4;

/// Cutscenes embedded in the quiz flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryKind {
    Terrace,
    Final,
}

impl MemoryKind {
    /// Fullscreen overlay duration in milliseconds.
    pub const fn duration_ms(self) -> f64 {
        match self {
            Self::Terrace => 10_000.0,
            Self::Final => 15_000.0,
        }
    }

    /// Whether the cutscene pauses the background music for its own track.
    pub const fn has_audio(self) -> bool {
        matches!(self, Self::Final)
    }
}

/// What happens after the player presses "next".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizAdvance {
    /// Show a memory overlay; the flow resumes via
    /// [`QuizState::resume_after_memory`] when it expires.
    Memory(MemoryKind),
    /// Step to the next question.
    NextQuestion,
    /// The quiz is over.
    Complete,
}

/// Current position, selection and score within the question list.
#[derive(Debug, Clone)]
pub struct QuizState {
    questions: &'static [QuizQuestion],
    index: usize,
    selected: Option<usize>,
    score: u32,
}

impl QuizState {
    pub const fn new(questions: &'static [QuizQuestion]) -> Self {
        Self {
            questions,
            index: 0,
            selected: None,
            score: 0,
        }
    }

    pub fn current(&self) -> &'static QuizQuestion {
        &self.questions[self.index]
    }

    pub const fn index(&self) -> usize {
        self.index
    }

    pub const fn len(&self) -> usize {
        self.questions.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub const fn score(&self) -> u32 {
        self.score
    }

    pub const fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Whether the locked-in selection was the correct one.
    pub fn answered_correctly(&self) -> Option<bool> {
        self.selected.map(|s| s == self.current().correct)
    }

    /// Lock in an option. The first valid selection wins; repeats and
    /// out-of-range indices are ignored. Returns whether it was correct.
    pub fn select(&mut self, option: usize) -> Option<bool> {
        if self.selected.is_some() || option >= self.current().options.len() {
            return None;
        }
        self.selected = Some(option);
        let correct = option == self.current().correct;
        if correct {
            self.score += 1;
        }
        Some(correct)
    }

    /// Move past the answered question. Returns `None` when nothing is
    /// selected yet (the next button is not live before an answer).
    pub fn advance(&mut self) -> Option<QuizAdvance> {
        self.selected?;
        if self.current().id == TERRACE_QUESTION_ID {
            return Some(QuizAdvance::Memory(MemoryKind::Terrace));
        }
        if self.index + 1 >= self.questions.len() {
            return Some(QuizAdvance::Memory(MemoryKind::Final));
        }
        self.step();
        Some(QuizAdvance::NextQuestion)
    }

    /// Resume the flow when a memory overlay expires. Returns what the shell
    /// does next: the terrace leads into the following question, the final
    /// memory completes the quiz.
    pub fn resume_after_memory(&mut self, kind: MemoryKind) -> QuizAdvance {
        match kind {
            MemoryKind::Terrace => {
                if self.index + 1 < self.questions.len() {
                    self.step();
                    QuizAdvance::NextQuestion
                } else {
                    QuizAdvance::Complete
                }
            }
            MemoryKind::Final => QuizAdvance::Complete,
        }
    }

    fn step(&mut self) {
        self.index += 1;
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QUIZ_QUESTIONS;

    #[test]
    fn first_selection_locks_in_and_scores() {
        let mut quiz = QuizState::new(QUIZ_QUESTIONS);
        let correct = quiz.current().correct;
        assert_eq!(quiz.select(correct), Some(true));
        assert_eq!(quiz.score(), 1);
        // later clicks on the same question are ignored
        assert_eq!(quiz.select(0), None);
        assert_eq!(quiz.score(), 1);
        assert_eq!(quiz.answered_correctly(), Some(true));
    }

    #[test]
    fn wrong_answer_does_not_score_but_still_advances() {
        let mut quiz = QuizState::new(QUIZ_QUESTIONS);
        let wrong = (quiz.current().correct + 1) % 4;
        assert_eq!(quiz.select(wrong), Some(false));
        assert_eq!(quiz.score(), 0);
        assert_eq!(quiz.advance(), Some(QuizAdvance::NextQuestion));
        assert_eq!(quiz.index(), 1);
        assert_eq!(quiz.selected(), None);
    }

    #[test]
    fn advance_requires_a_selection() {
        let mut quiz = QuizState::new(QUIZ_QUESTIONS);
        assert_eq!(quiz.advance(), None);
        assert_eq!(quiz.index(), 0);
    }

    #[test]
    fn terrace_memory_triggers_after_the_meeting_question() {
        let mut quiz = QuizState::new(QUIZ_QUESTIONS);
        while quiz.current().id != TERRACE_QUESTION_ID {
            quiz.select(quiz.current().correct);
            assert_eq!(quiz.advance(), Some(QuizAdvance::NextQuestion));
        }
        quiz.select(quiz.current().correct);
        assert_eq!(
            quiz.advance(),
            Some(QuizAdvance::Memory(MemoryKind::Terrace))
        );
        // overlay expiry moves on to the next question
        assert_eq!(
            quiz.resume_after_memory(MemoryKind::Terrace),
            QuizAdvance::NextQuestion
        );
        assert_eq!(quiz.selected(), None);
    }

    #[test]
    fn final_memory_triggers_on_the_last_question_and_completes() {
        let mut quiz = QuizState::new(QUIZ_QUESTIONS);
        loop {
            quiz.select(quiz.current().correct);
            match quiz.advance().expect("answered") {
                QuizAdvance::NextQuestion => {}
                QuizAdvance::Memory(MemoryKind::Terrace) => {
                    assert_eq!(
                        quiz.resume_after_memory(MemoryKind::Terrace),
                        QuizAdvance::NextQuestion
                    );
                }
                QuizAdvance::Memory(MemoryKind::Final) => break,
                QuizAdvance::Complete => unreachable!("final memory comes first"),
            }
        }
        assert_eq!(quiz.index(), quiz.len() - 1);
        assert_eq!(
            quiz.resume_after_memory(MemoryKind::Final),
            QuizAdvance::Complete
        );
        assert_eq!(quiz.score(), quiz.len() as u32);
    }

    #[test]
    fn memory_durations_match_the_cutscene_kinds() {
        assert!((MemoryKind::Terrace.duration_ms() - 10_000.0).abs() < f64::EPSILON);
        assert!((MemoryKind::Final.duration_ms() - 15_000.0).abs() < f64::EPSILON);
        assert!(!MemoryKind::Terrace.has_audio());
        assert!(MemoryKind::Final.has_audio());
    }
}
