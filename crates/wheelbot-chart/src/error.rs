use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Got {values} values for {labels} labels")]
    Mismatch { values: usize, labels: usize },

    #[error("No values to draw")]
    Empty,

    #[error("Failed to create chart file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Drawing failed: {0}")]
    Draw(String),
}
