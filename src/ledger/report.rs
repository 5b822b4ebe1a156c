//! Report ledger - append-only store of content reports

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::ledger::store::KeyValueStore;

const COMMAND_BUFFER: usize = 64;

/// Persisted report record. Immutable audit record; no delete operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportItem {
    pub id: String,
    /// Reported image; may already be deleted, no referential check
    pub image_id: String,
    pub prompt: String,
    /// Epoch milliseconds
    pub timestamp: i64,
}

/// Report as submitted by the caller; the ledger stamps the id
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    pub image_id: String,
    pub prompt: String,
    pub timestamp: i64,
}

enum ReportCommand {
    Add {
        report: NewReport,
        reply: oneshot::Sender<Result<ReportItem>>,
    },
    List {
        reply: oneshot::Sender<Result<Vec<ReportItem>>>,
    },
}

/// Handle to a report ledger actor
#[derive(Clone)]
pub struct ReportLedger {
    id: String,
    tx: mpsc::Sender<ReportCommand>,
}

impl ReportLedger {
    pub fn spawn(id: impl Into<String>, store: Box<dyn KeyValueStore>) -> Self {
        let id = id.into();
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);

        tokio::spawn(run(id.clone(), store, rx));

        Self { id, tx }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Persist a report under a freshly generated id
    pub async fn add_report(&self, report: NewReport) -> Result<ReportItem> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(ReportCommand::Add {
                report,
                reply: reply_tx,
            })
            .await
            .map_err(|_| AppError::Ledger("Report ledger is unavailable".to_string()))?;
        reply_rx
            .await
            .map_err(|_| AppError::Ledger("Report ledger dropped the request".to_string()))?
    }

    /// All reports, newest first
    pub async fn list_reports(&self) -> Result<Vec<ReportItem>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(ReportCommand::List { reply: reply_tx })
            .await
            .map_err(|_| AppError::Ledger("Report ledger is unavailable".to_string()))?;
        reply_rx
            .await
            .map_err(|_| AppError::Ledger("Report ledger dropped the request".to_string()))?
    }
}

async fn run(
    ledger_id: String,
    store: Box<dyn KeyValueStore>,
    mut rx: mpsc::Receiver<ReportCommand>,
) {
    debug!(ledger = %ledger_id, "Report ledger started");

    while let Some(command) = rx.recv().await {
        match command {
            ReportCommand::Add { report, reply } => {
                let result = add_report(&ledger_id, store.as_ref(), report).await;
                let _ = reply.send(result);
            }
            ReportCommand::List { reply } => {
                let result = list_reports(&ledger_id, store.as_ref()).await;
                let _ = reply.send(result);
            }
        }
    }

    debug!(ledger = %ledger_id, "Report ledger stopped");
}

async fn add_report(
    ledger_id: &str,
    store: &dyn KeyValueStore,
    report: NewReport,
) -> Result<ReportItem> {
    let item = ReportItem {
        id: Uuid::new_v4().to_string(),
        image_id: report.image_id,
        prompt: report.prompt,
        timestamp: report.timestamp,
    };

    let encoded = serde_json::to_vec(&item)?;
    store.put(&item.id, &encoded).await?;

    info!(ledger = %ledger_id, report = %item.id, "Stored content report");
    Ok(item)
}

async fn list_reports(ledger_id: &str, store: &dyn KeyValueStore) -> Result<Vec<ReportItem>> {
    let mut reports = Vec::new();

    for value in store.list().await? {
        match serde_json::from_slice::<ReportItem>(&value) {
            Ok(report) => reports.push(report),
            Err(e) => {
                warn!(ledger = %ledger_id, error = %e, "Skipping unreadable report record");
            }
        }
    }

    reports.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(reports)
}
