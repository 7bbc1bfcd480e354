use log::debug;
use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

use super::catalog::InventoryLevels;
use super::order::OrderRequest;

/// Script URL the bakery publishes its spreadsheet through.
pub const DEFAULT_ENDPOINT: &str = "https://script.google.com/macros/s/AKfycbyiRd-DyOX83OqalzAyeT_XCIJik6iNyGjORM4tTJFlWSrThMiJFteSdbbu7mZBaBsxug/exec";

pub const GET_INVENTORY_ACTION: &str = "getInventory";

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("Request to store endpoint failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Malformed response from store endpoint: {0}")]
    MalformedResponse(#[from] serde_json::Error),
    #[error("Store endpoint rejected the request: {0}")]
    Rejected(String),
}

/// Acknowledgement returned by a successful `submitOrder` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub message: Option<String>,
}

/// The two calls the storefront makes against the remote spreadsheet script.
pub trait StoreEndpoint: Send + Sync {
    fn fetch_inventory(&self) -> Result<InventoryLevels, EndpointError>;
    fn submit_order(&self, request: &OrderRequest) -> Result<SubmitReceipt, EndpointError>;
}

#[derive(Debug, Deserialize)]
struct InventoryEntry {
    disponible: f64,
}

#[derive(Debug, Deserialize)]
struct InventoryResponse {
    #[serde(default)]
    success: bool,
    inventory: Option<HashMap<String, InventoryEntry>>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    success: bool,
    message: Option<String>,
}

/// Spreadsheet cells come back as JSON numbers; keep the whole, non-negative part.
fn stock_count(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.trunc().min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

pub fn parse_inventory_response(body: &str) -> Result<InventoryLevels, EndpointError> {
    let response: InventoryResponse = serde_json::from_str(body)?;
    let inventory = match (response.success, response.inventory) {
        (true, Some(inventory)) => inventory,
        (true, None) => {
            return Err(EndpointError::Rejected(
                "response has no inventory".to_string(),
            ));
        }
        (false, _) => {
            return Err(EndpointError::Rejected(
                response
                    .message
                    .unwrap_or_else(|| "success flag not set".to_string()),
            ));
        }
    };

    let mut levels = InventoryLevels::new();
    for (key, entry) in inventory {
        match key.trim().parse::<u32>() {
            Ok(id) => {
                levels.insert(id, stock_count(entry.disponible));
            }
            Err(_) => debug!("Ignoring inventory row with non-numeric id {key:?}"),
        }
    }
    Ok(levels)
}

pub fn parse_submit_response(body: &str) -> Result<SubmitReceipt, EndpointError> {
    let response: SubmitResponse = serde_json::from_str(body)?;
    if response.success {
        Ok(SubmitReceipt {
            message: response.message,
        })
    } else {
        Err(EndpointError::Rejected(
            response
                .message
                .unwrap_or_else(|| "no message".to_string()),
        ))
    }
}

/// Blocking HTTP client for the spreadsheet script.
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    client: Client,
    url: Url,
}

impl HttpEndpoint {
    pub fn new(url: Url) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl StoreEndpoint for HttpEndpoint {
    fn fetch_inventory(&self) -> Result<InventoryLevels, EndpointError> {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("action", GET_INVENTORY_ACTION);
        debug!("GET {url}");
        let body = self.client.get(url).send()?.text()?;
        parse_inventory_response(&body)
    }

    fn submit_order(&self, request: &OrderRequest) -> Result<SubmitReceipt, EndpointError> {
        // The script reads the raw post body, so the JSON goes out as plain text.
        let payload = serde_json::to_string(request)?;
        debug!("POST {} ({})", self.url, request.order_number);
        let body = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "text/plain;charset=utf-8")
            .body(payload)
            .send()?
            .text()?;
        parse_submit_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inventory_response_success() {
        let body = r#"{
            "success": true,
            "inventory": {
                "1": { "disponible": 0 },
                "2": { "disponible": 5.0 },
                "3": { "disponible": 2.7 }
            }
        }"#;
        let levels = parse_inventory_response(body).expect("inventory should parse");
        assert_eq!(levels.get(&1), Some(&0));
        assert_eq!(levels.get(&2), Some(&5));
        assert_eq!(levels.get(&3), Some(&2));
    }

    #[test]
    fn test_parse_inventory_response_clamps_and_skips_bad_ids() {
        let body = r#"{
            "success": true,
            "inventory": {
                "1": { "disponible": -4 },
                "encabezado": { "disponible": 9 }
            }
        }"#;
        let levels = parse_inventory_response(body).expect("inventory should parse");
        assert_eq!(levels.len(), 1);
        assert_eq!(levels.get(&1), Some(&0));
    }

    #[test]
    fn test_parse_inventory_response_failures() {
        let not_successful = parse_inventory_response(r#"{ "success": false, "message": "hoja bloqueada" }"#);
        assert!(matches!(not_successful, Err(EndpointError::Rejected(m)) if m == "hoja bloqueada"));

        let missing_flag = parse_inventory_response(r#"{ "inventory": {} }"#);
        assert!(matches!(missing_flag, Err(EndpointError::Rejected(_))));

        let missing_inventory = parse_inventory_response(r#"{ "success": true }"#);
        assert!(matches!(missing_inventory, Err(EndpointError::Rejected(_))));

        let malformed_entry =
            parse_inventory_response(r#"{ "success": true, "inventory": { "1": { "stock": 3 } } }"#);
        assert!(matches!(malformed_entry, Err(EndpointError::MalformedResponse(_))));

        let html = parse_inventory_response("<html>Sign in</html>");
        assert!(matches!(html, Err(EndpointError::MalformedResponse(_))));
    }

    #[test]
    fn test_parse_submit_response() {
        let ok = parse_submit_response(r#"{ "success": true, "message": "Pedido guardado" }"#)
            .expect("submission should be accepted");
        assert_eq!(ok.message.as_deref(), Some("Pedido guardado"));

        let rejected = parse_submit_response(r#"{ "success": false }"#).unwrap_err();
        assert_eq!(
            rejected.to_string(),
            "Store endpoint rejected the request: no message"
        );
    }

    #[test]
    fn test_unreachable_endpoint_reports_transport_error() {
        let endpoint = HttpEndpoint::new(Url::parse("http://127.0.0.1:9/exec").unwrap());
        let err = endpoint.fetch_inventory().unwrap_err();
        assert!(matches!(err, EndpointError::Transport(_)));
    }
}
