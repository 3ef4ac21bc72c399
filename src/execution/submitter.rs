use std::time::Duration;

use anyhow::Result;
use log::{info, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;

use super::errors::FlowError;
use crate::domain::{OrderReceipt, OrderRequest};

// ==================================================
// ORDER SUBMITTER
// ==================================================

/// Posts one order to the order-creation service. One attempt, no retries.
#[derive(Clone)]
pub struct OrderSubmitter {
    http: Client,
}

impl OrderSubmitter {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    pub async fn submit(
        &self,
        endpoint: &str,
        order: &OrderRequest,
    ) -> Result<OrderReceipt, FlowError> {
        let body = serde_json::to_string(order)
            .map_err(|e| FlowError::Transport(format!("could not encode order: {}", e)))?;

        info!("📤 Posting order to {}", endpoint);
        info!(
            "   sell {} {} -> buy {}",
            order.sell_amount, order.sell_token, order.buy_token
        );

        let resp = self
            .http
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| FlowError::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| FlowError::Transport(e.to_string()))?;

        if !status.is_success() {
            warn!("❌ Order rejected by order service");
            warn!("   Status: {}", status);
            warn!("   Response: {}", text);
            return Err(FlowError::OrderRejected {
                status: status.as_u16(),
                body: text,
            });
        }

        let receipt = parse_receipt(&text)?;
        info!("✅ Order accepted! ID: {}", receipt.order_id);
        Ok(receipt)
    }
}

fn parse_receipt(body: &str) -> Result<OrderReceipt, FlowError> {
    let json: Value = serde_json::from_str(body)
        .map_err(|e| FlowError::MalformedResponse(format!("body is not JSON ({}): {}", e, body)))?;

    json.get("orderId")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(|id| OrderReceipt {
            order_id: id.to_string(),
        })
        .ok_or_else(|| FlowError::MalformedResponse(format!("no orderId in {}", body)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::errors::FlowErrorKind;

    #[test]
    fn reads_order_id() {
        let receipt = parse_receipt(r#"{"orderId":"abc123","status":"open"}"#).unwrap();
        assert_eq!(receipt.order_id, "abc123");
    }

    #[test]
    fn missing_or_wrong_order_id_is_malformed() {
        for body in [
            r#"{"status":"open"}"#,
            r#"{"orderId":""}"#,
            r#"{"orderId":42}"#,
            r#"[]"#,
            "created",
            "",
        ] {
            let err = parse_receipt(body).unwrap_err();
            assert_eq!(err.kind(), FlowErrorKind::MalformedResponse, "body {:?}", body);
        }
    }
}
