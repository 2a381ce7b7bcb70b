use thiserror::Error;

use crate::model::ChartError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No chart loaded")]
    NoChart,

    #[error(transparent)]
    Chart(#[from] ChartError),
}
