pub mod extract;
pub mod load;
pub mod pipeline;
pub mod transform;

pub use crate::domain::model::{FlowMetrics, RunReport, RunStatus};
pub use crate::domain::ports::{DocumentSink, SalesDatabase};
pub use crate::utils::error::Result;
