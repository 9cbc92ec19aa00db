pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::{HttpDocumentSink, PgSalesDatabase};
pub use crate::config::{CliConfig, EtlConfig};
pub use crate::core::extract::Extractor;
pub use crate::core::load::Loader;
pub use crate::core::pipeline::{EtlPipeline, FlowKind, PipelineState};
pub use crate::domain::model::{FlowMetrics, RunReport, RunStatus};
pub use crate::utils::error::{EtlError, Result};
