use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    #[error("Expected {expected} responses, got {got}")]
    WrongLength { expected: usize, got: usize },

    #[error("Response {index} is {value}, outside 0..={max}")]
    OutOfRange { index: usize, value: u8, max: u8 },
}

#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("Cannot finalize survey: {0}")]
    Incomplete(#[from] ScoreError),
}
