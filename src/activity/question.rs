//! Question pool shared by every quiz-gated mechanic

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub answers: Vec<String>,
    pub correct_index: usize,
}

impl Question {
    pub fn new(id: &str, prompt: &str, answers: &[&str], correct_index: usize) -> Self {
        Self {
            id: id.to_string(),
            prompt: prompt.to_string(),
            answers: answers.iter().map(|a| a.to_string()).collect(),
            correct_index,
        }
    }

    /// Substituted when a pool is empty, so play never stalls
    pub fn fallback() -> Self {
        Self::new("fallback", "Ready to continue?", &["Yes", "Not yet"], 0)
    }

    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }

    pub fn correct_answer(&self) -> &str {
        &self.answers[self.correct_index]
    }

    /// Best-effort parse of one authored question.
    ///
    /// Accepts the field spellings the authoring tool has used over time.
    /// Returns None when there is no prompt, no answers, or the correct
    /// answer cannot be located.
    pub fn from_value(value: &Value, position: usize) -> Option<Self> {
        let prompt = first_str(value, &["prompt", "question", "text"])?.trim();
        if prompt.is_empty() {
            return None;
        }

        let answers: Vec<String> = ["answers", "options", "choices"]
            .iter()
            .find_map(|key| value.get(*key).and_then(Value::as_array))?
            .iter()
            .filter_map(|a| match a {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Object(_) => a.get("text").and_then(Value::as_str).map(String::from),
                _ => None,
            })
            .collect();
        if answers.is_empty() {
            return None;
        }

        let correct_index = ["correctIndex", "correct_index", "correct", "answer"]
            .iter()
            .find_map(|key| match value.get(*key)? {
                Value::Number(n) => n.as_u64().map(|n| n as usize),
                Value::String(s) => answers
                    .iter()
                    .position(|a| a == s)
                    .or_else(|| s.trim().parse::<usize>().ok()),
                _ => None,
            })
            .filter(|&i| i < answers.len())?;

        let id = match value.get("id") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => format!("q{}", position + 1),
        };

        Some(Self {
            id,
            prompt: prompt.to_string(),
            answers,
            correct_index,
        })
    }
}

fn first_str<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| value.get(*k).and_then(Value::as_str))
}

/// Ordered pool drawn from in sequence, wrapping around when exhausted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionPool {
    questions: Vec<Question>,
    #[serde(skip)]
    cursor: usize,
}

impl QuestionPool {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            cursor: 0,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Next question in rotation, or the fallback if the pool is empty
    pub fn draw(&mut self) -> Question {
        if self.questions.is_empty() {
            tracing::debug!("Question pool empty, substituting fallback question");
            return Question::fallback();
        }
        let question = self.questions[self.cursor % self.questions.len()].clone();
        self.cursor = (self.cursor + 1) % self.questions.len();
        question
    }
}
