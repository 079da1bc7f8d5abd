//! Emotional assessment — fixed question bank and per-question ratings.

use serde::Serialize;

use crate::error::StepError;

/// Number of questions in the assessment.
pub const QUESTION_COUNT: usize = 5;

/// Lowest and highest accepted rating.
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// One fixed wellness question.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AssessmentQuestion {
    pub prompt: &'static str,
    pub subtitle: Option<&'static str>,
    /// Label for ratings 1 through 5, in order.
    pub labels: [&'static str; 5],
}

/// The question bank, in presentation order.
pub static QUESTIONS: [AssessmentQuestion; QUESTION_COUNT] = [
    AssessmentQuestion {
        prompt: "How often does stress control your life?",
        subtitle: Some("Be honest, this shapes your personal plan"),
        labels: ["Very Low", "Low", "Moderate", "High", "Very High"],
    },
    AssessmentQuestion {
        prompt: "How would you rate your sleep quality?",
        subtitle: Some("Sleep has a big effect on how you feel"),
        labels: ["Very Poor", "Poor", "Fair", "Good", "Excellent"],
    },
    AssessmentQuestion {
        prompt: "How has your mood been lately?",
        subtitle: None,
        labels: ["Very Sad", "Sad", "Neutral", "Happy", "Very Happy"],
    },
    AssessmentQuestion {
        prompt: "How are your energy levels?",
        subtitle: None,
        labels: ["Exhausted", "Tired", "Neutral", "Energetic", "Very Energetic"],
    },
    AssessmentQuestion {
        prompt: "How satisfied are you with your life currently?",
        subtitle: Some("This is where your journey begins"),
        labels: [
            "Very Unsatisfied",
            "Unsatisfied",
            "Neutral",
            "Satisfied",
            "Very Satisfied",
        ],
    },
];

/// Display label for `rating` on question `question`, if both are in range.
pub fn rating_label(question: usize, rating: u8) -> Option<&'static str> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return None;
    }
    QUESTIONS
        .get(question)
        .map(|q| q.labels[usize::from(rating - MIN_RATING)])
}

/// Ratings collected for the question bank.
///
/// A slot is "visited" once it has been rated or explicitly skipped. Leaving
/// the assessment step only needs every slot visited; `all_answered` is the
/// stricter check that every slot carries a rating.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssessmentResponses {
    ratings: [Option<u8>; QUESTION_COUNT],
    visited: [bool; QUESTION_COUNT],
    current: usize,
}

impl AssessmentResponses {
    /// Record `rating` for `index`, overwriting any earlier value.
    pub fn set_response(&mut self, index: usize, rating: u8) -> Result<(), StepError> {
        if index >= QUESTION_COUNT {
            return Err(StepError::QuestionOutOfRange {
                index,
                count: QUESTION_COUNT,
            });
        }
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(StepError::RatingOutOfRange {
                rating: rating.into(),
            });
        }
        self.ratings[index] = Some(rating);
        self.visited[index] = true;
        Ok(())
    }

    /// Skip the current question: it is marked visited but keeps no rating,
    /// and the pointer moves on.
    ///
    /// Skipping a question that was already rated clears the rating.
    pub fn skip(&mut self) {
        self.ratings[self.current] = None;
        self.visited[self.current] = true;
        self.next_question();
    }

    /// Move the pointer to the next question without touching any slot.
    /// Stays on the last question once reached.
    pub fn next_question(&mut self) {
        if self.current + 1 < QUESTION_COUNT {
            self.current += 1;
        }
    }

    /// Index of the question currently presented.
    pub fn current_question(&self) -> usize {
        self.current
    }

    pub fn is_question_answered(&self, index: usize) -> bool {
        self.ratings.get(index).is_some_and(Option::is_some)
    }

    pub fn is_question_visited(&self, index: usize) -> bool {
        self.visited.get(index).copied().unwrap_or(false)
    }

    /// True when every question has a rating.
    pub fn all_answered(&self) -> bool {
        self.ratings.iter().all(Option::is_some)
    }

    /// True when every question has been rated or skipped.
    pub fn all_visited(&self) -> bool {
        self.visited.iter().all(|v| *v)
    }

    pub fn answered_count(&self) -> usize {
        self.ratings.iter().filter(|r| r.is_some()).count()
    }

    /// Questions neither rated nor skipped yet.
    pub fn remaining(&self) -> usize {
        self.visited.iter().filter(|v| !**v).count()
    }

    /// One entry per question; `None` for unset or skipped slots.
    pub fn responses(&self) -> &[Option<u8>; QUESTION_COUNT] {
        &self.ratings
    }
}
