use mindmap_category::CategoryError;
use mindmap_graph::GraphError;
use mindmap_text::TextError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Text(#[from] TextError),

    #[error(transparent)]
    Category(#[from] CategoryError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Invalid options: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
