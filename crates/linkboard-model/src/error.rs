pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("invalid row data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("table {table}: `{field}` must not be empty")]
    EmptyField { table: String, field: &'static str },
}
