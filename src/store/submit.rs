use log::{error, info};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::endpoint::StoreEndpoint;
use super::order::{OrderNumber, OrderRequest};

/// Delivery state of the last submitted order, as seen by the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    NotSent,
    Pending,
    Delivered { message: Option<String> },
    Failed { reason: String },
}

impl SubmissionStatus {
    /// Short name used in the page markup.
    pub fn state(&self) -> &'static str {
        match self {
            SubmissionStatus::NotSent => "not_sent",
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Delivered { .. } => "delivered",
            SubmissionStatus::Failed { .. } => "failed",
        }
    }
}

/// An order on its way to the remote sheet.
pub struct PendingSubmission {
    order_number: OrderNumber,
    handle: JoinHandle<SubmissionStatus>,
}

impl PendingSubmission {
    pub fn order_number(&self) -> &OrderNumber {
        &self.order_number
    }

    /// Blocks until the POST has completed.
    pub fn wait(self) -> SubmissionStatus {
        match self.handle.join() {
            Ok(status) => status,
            Err(_) => {
                error!("Order submission worker panicked ({})", self.order_number);
                SubmissionStatus::Failed {
                    reason: "submission worker panicked".to_string(),
                }
            }
        }
    }
}

/// Sends `request` on a worker thread and returns immediately.
///
/// Failures are only logged and reported through the returned status.
pub fn dispatch(endpoint: Arc<dyn StoreEndpoint>, request: OrderRequest) -> PendingSubmission {
    let order_number = request.order_number.clone();
    let handle = thread::spawn(move || match endpoint.submit_order(&request) {
        Ok(receipt) => {
            info!("Order {} delivered", request.order_number);
            SubmissionStatus::Delivered {
                message: receipt.message,
            }
        }
        Err(e) => {
            error!("Failed to submit order {}: {e}", request.order_number);
            SubmissionStatus::Failed {
                reason: e.to_string(),
            }
        }
    });
    PendingSubmission {
        order_number,
        handle,
    }
}
