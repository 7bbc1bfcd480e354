use std::sync::Mutex;

use super::catalog::InventoryLevels;
use super::endpoint::{EndpointError, StoreEndpoint, SubmitReceipt, parse_inventory_response};
use super::order::OrderRequest;

/// In-memory endpoint used across the crate's tests.
pub struct FakeEndpoint {
    inventory: Result<String, String>,
    accept_orders: bool,
    pub received: Mutex<Vec<OrderRequest>>,
}

impl FakeEndpoint {
    pub fn with_inventory_body(body: &str) -> Self {
        Self {
            inventory: Ok(body.to_string()),
            accept_orders: true,
            received: Mutex::new(Vec::new()),
        }
    }

    /// Answers every call with a rejection, as a sheet that is down would.
    pub fn failing() -> Self {
        Self {
            inventory: Err("inventory sheet unavailable".to_string()),
            accept_orders: false,
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting_orders(mut self) -> Self {
        self.accept_orders = false;
        self
    }
}

impl StoreEndpoint for FakeEndpoint {
    fn fetch_inventory(&self) -> Result<InventoryLevels, EndpointError> {
        match &self.inventory {
            Ok(body) => parse_inventory_response(body),
            Err(reason) => Err(EndpointError::Rejected(reason.clone())),
        }
    }

    fn submit_order(&self, request: &OrderRequest) -> Result<SubmitReceipt, EndpointError> {
        self.received.lock().unwrap().push(request.clone());
        if self.accept_orders {
            Ok(SubmitReceipt {
                message: Some("Pedido registrado".to_string()),
            })
        } else {
            Err(EndpointError::Rejected("sheet is read-only".to_string()))
        }
    }
}
