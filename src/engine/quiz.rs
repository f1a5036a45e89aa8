//! Quiz gate: an action that only takes effect after a question is answered
//!
//! Answering and confirming are separate steps. `answer` records and
//! classifies the choice immediately (so the UI can show feedback), while
//! `confirm` hands back the gated payload exactly once.

use crate::activity::question::Question;
use serde::{Deserialize, Serialize};

/// Running answer accuracy, independent of any streak
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accuracy {
    pub correct: u32,
    pub total: u32,
}

impl Accuracy {
    pub fn record(&mut self, correct: bool) {
        self.total += 1;
        if correct {
            self.correct += 1;
        }
    }

    /// Whole-number percentage, 0 when nothing has been answered
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            0
        } else {
            self.correct * 100 / self.total
        }
    }
}

/// A question currently blocking a gated action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuiz<T> {
    pub question: Question,
    pub payload: T,
    /// `(chosen index, was correct)` once answered
    pub answer: Option<(usize, bool)>,
}

/// Result of confirming an answered question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResolution<T> {
    pub question_id: String,
    pub payload: T,
    pub correct: bool,
}

#[derive(Debug, Clone)]
pub struct QuizGate<T> {
    pending: Option<PendingQuiz<T>>,
    accuracy: Accuracy,
}

impl<T> Default for QuizGate<T> {
    fn default() -> Self {
        Self {
            pending: None,
            accuracy: Accuracy::default(),
        }
    }
}

impl<T> QuizGate<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingQuiz<T>> {
        self.pending.as_ref()
    }

    pub fn accuracy(&self) -> Accuracy {
        self.accuracy
    }

    /// Block `payload` behind `question`. Refused while another is pending.
    pub fn open(&mut self, question: Question, payload: T) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(PendingQuiz {
            question,
            payload,
            answer: None,
        });
        true
    }

    /// Record an answer and return whether it was correct.
    ///
    /// Only the first valid answer per question counts; later calls, calls
    /// with no open question, and out-of-range indices return None.
    pub fn answer(&mut self, index: usize) -> Option<bool> {
        let pending = self.pending.as_mut()?;
        if pending.answer.is_some() || index >= pending.question.answers.len() {
            return None;
        }
        let correct = pending.question.is_correct(index);
        pending.answer = Some((index, correct));
        self.accuracy.record(correct);
        Some(correct)
    }

    /// Release the payload of an answered question, clearing the gate.
    ///
    /// A second confirm finds nothing pending and returns None.
    pub fn confirm(&mut self) -> Option<QuizResolution<T>> {
        let (_, correct) = self.pending.as_ref()?.answer?;
        let pending = self.pending.take()?;
        Some(QuizResolution {
            question_id: pending.question.id,
            payload: pending.payload,
            correct,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> Question {
        Question::new("q", "Pick b", &["a", "b", "c"], 1)
    }

    #[test]
    fn test_answer_then_confirm() {
        let mut gate = QuizGate::new();
        assert!(gate.open(question(), "payload"));
        assert_eq!(gate.answer(1), Some(true));
        assert!(gate.is_open());

        let resolution = gate.confirm().unwrap();
        assert!(resolution.correct);
        assert_eq!(resolution.payload, "payload");
        assert!(!gate.is_open());
    }

    #[test]
    fn test_confirm_requires_answer() {
        let mut gate = QuizGate::new();
        gate.open(question(), ());
        assert!(gate.confirm().is_none());
        assert!(gate.is_open());
    }

    #[test]
    fn test_double_confirm_is_noop() {
        let mut gate = QuizGate::new();
        gate.open(question(), ());
        gate.answer(0);
        assert!(gate.confirm().is_some());
        assert!(gate.confirm().is_none());
    }

    #[test]
    fn test_only_first_answer_counts() {
        let mut gate = QuizGate::new();
        gate.open(question(), ());
        assert_eq!(gate.answer(0), Some(false));
        assert_eq!(gate.answer(1), None);
        assert_eq!(gate.accuracy(), Accuracy { correct: 0, total: 1 });
        assert!(!gate.confirm().unwrap().correct);
    }

    #[test]
    fn test_out_of_range_answer_ignored() {
        let mut gate = QuizGate::new();
        gate.open(question(), ());
        assert_eq!(gate.answer(9), None);
        assert_eq!(gate.accuracy().total, 0);
    }

    #[test]
    fn test_cannot_open_twice() {
        let mut gate = QuizGate::new();
        assert!(gate.open(question(), 1));
        assert!(!gate.open(question(), 2));
        gate.answer(1);
        assert_eq!(gate.confirm().unwrap().payload, 1);
    }

    #[test]
    fn test_accuracy_percent() {
        let mut acc = Accuracy::default();
        assert_eq!(acc.percent(), 0);
        acc.record(true);
        acc.record(false);
        acc.record(true);
        assert_eq!(acc.percent(), 66);
    }
}
