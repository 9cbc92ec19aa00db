use crate::core::extract::Extractor;
use crate::core::load::Loader;
use crate::core::transform;
use crate::domain::model::{FlowMetrics, RunReport, RunStatus};
use crate::domain::ports::{DocumentSink, SalesDatabase};
use crate::utils::error::Result;
use chrono::{Local, Utc};
use std::collections::BTreeMap;
use std::time::Instant;

/// The fixed set of extract→transform→load flows, executed in declaration
/// order. Dispatch is a match, not a table of callables, so each flow keeps
/// its own concrete types end to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    ProductProfile,
    CommonProducts,
    Orders,
}

impl FlowKind {
    pub const ALL: [FlowKind; 3] = [
        FlowKind::ProductProfile,
        FlowKind::CommonProducts,
        FlowKind::Orders,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FlowKind::ProductProfile => "product_profile",
            FlowKind::CommonProducts => "common_products",
            FlowKind::Orders => "orders",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Running,
    Completed(RunStatus),
}

/// Orchestrates one batch run: every flow sequentially, per-stage timing,
/// consolidated report. A flow's `success` flag is exactly its load result;
/// extraction and transform errors are not caught per flow, they abort the
/// remaining flows and surface as a failed run.
pub struct EtlPipeline<D: SalesDatabase, S: DocumentSink> {
    extractor: Extractor<D>,
    loader: Loader<S>,
    state: PipelineState,
}

impl<D: SalesDatabase, S: DocumentSink> EtlPipeline<D, S> {
    pub fn new(extractor: Extractor<D>, loader: Loader<S>) -> Self {
        Self {
            extractor,
            loader,
            state: PipelineState::Idle,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub async fn run(&mut self) -> RunReport {
        self.state = PipelineState::Running;
        let started_at = Local::now();
        let clock = Instant::now();
        tracing::info!("🚀 Starting ETL pipeline at {}", started_at.to_rfc3339());

        let mut metrics = BTreeMap::new();
        let outcome = self.run_flows(&mut metrics).await;

        let ended_at = Local::now();
        let total_duration = clock.elapsed().as_secs_f64();

        let report = match outcome {
            Ok(()) => {
                let status = if metrics.values().all(|flow| flow.success) {
                    RunStatus::Success
                } else {
                    RunStatus::PartialSuccess
                };
                tracing::info!("✅ ETL pipeline completed in {:.2} seconds", total_duration);
                RunReport {
                    status,
                    start_time: started_at.to_rfc3339(),
                    end_time: ended_at.to_rfc3339(),
                    total_duration_seconds: total_duration,
                    metrics,
                    error: None,
                    error_details: None,
                }
            }
            Err(e) => {
                let details = e.chain_to_string();
                tracing::error!("❌ ETL pipeline failed: {}\n{}", e, details);
                RunReport {
                    status: RunStatus::Failed,
                    start_time: started_at.to_rfc3339(),
                    end_time: ended_at.to_rfc3339(),
                    total_duration_seconds: total_duration,
                    metrics,
                    error: Some(e.to_string()),
                    error_details: Some(details),
                }
            }
        };

        self.state = PipelineState::Completed(report.status);
        report
    }

    async fn run_flows(&self, metrics: &mut BTreeMap<String, FlowMetrics>) -> Result<()> {
        for flow in FlowKind::ALL {
            tracing::info!("▶️ Running flow: {}", flow.name());
            let flow_metrics = match flow {
                FlowKind::ProductProfile => self.run_product_profile().await?,
                FlowKind::CommonProducts => self.run_common_products().await?,
                FlowKind::Orders => self.run_orders().await?,
            };
            if !flow_metrics.success {
                tracing::warn!("🔶 Flow {} completed but its load failed", flow.name());
            }
            metrics.insert(flow.name().to_string(), flow_metrics);
        }
        Ok(())
    }

    async fn run_product_profile(&self) -> Result<FlowMetrics> {
        let extract_started = Instant::now();
        let rows = self.extractor.fetch_transaction_products().await?;
        let extract_duration = extract_started.elapsed().as_secs_f64();
        let records_extracted = rows.len();

        let transform_started = Instant::now();
        let report = transform::product_predominant_profile(&rows, Local::now().date_naive());
        let transform_duration = transform_started.elapsed().as_secs_f64();

        let load_started = Instant::now();
        let success = self.loader.load_predominant_profile(&report).await;
        let load_duration = load_started.elapsed().as_secs_f64();

        Ok(FlowMetrics {
            extract_duration,
            transform_duration,
            load_duration,
            records_extracted,
            success,
        })
    }

    async fn run_common_products(&self) -> Result<FlowMetrics> {
        let extract_started = Instant::now();
        let pairs = self.extractor.fetch_frequency_itemsets().await?;
        let extract_duration = extract_started.elapsed().as_secs_f64();
        let records_extracted = pairs.len();

        let transform_started = Instant::now();
        let report = transform::most_common_products(&pairs, Local::now().date_naive());
        let transform_duration = transform_started.elapsed().as_secs_f64();

        let load_started = Instant::now();
        let success = self.loader.load_most_common_products(&report).await;
        let load_duration = load_started.elapsed().as_secs_f64();

        Ok(FlowMetrics {
            extract_duration,
            transform_duration,
            load_duration,
            records_extracted,
            success,
        })
    }

    async fn run_orders(&self) -> Result<FlowMetrics> {
        let extract_started = Instant::now();
        let orders = self.extractor.fetch_orders_with_items().await?;
        let extract_duration = extract_started.elapsed().as_secs_f64();
        let records_extracted = orders.len();

        let transform_started = Instant::now();
        let report =
            transform::complete_orders_to_dw(&orders, Local::now().date_naive(), Utc::now());
        let transform_duration = transform_started.elapsed().as_secs_f64();

        let load_started = Instant::now();
        let success = self.loader.load_orders(&report).await;
        let load_duration = load_started.elapsed().as_secs_f64();

        Ok(FlowMetrics {
            extract_duration,
            transform_duration,
            load_duration,
            records_extracted,
            success,
        })
    }
}
