use serde::{Deserialize, Serialize};

/// Stripe's `payment_status` value for a completed payment.
pub const PAID_STATUS: &str = "paid";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub name: String,
    pub description: String,
    pub currency: String,
    /// Amount in the currency's smallest unit
    pub unit_amount: u64,
    pub quantity: u32,
}

impl LineItem {
    /// The single flat-rate product sold by this service.
    pub fn download_access() -> Self {
        Self {
            name: "Download Access".to_string(),
            description: "Pay $1 for download access".to_string(),
            currency: "usd".to_string(),
            unit_amount: 100,
            quantity: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub line_item: LineItem,
    pub success_url: String,
    pub cancel_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
}

/// The subset of a retrieved checkout session this service reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    #[serde(default)]
    pub payment_status: Option<String>,
}

impl SessionRecord {
    pub fn is_paid(&self) -> bool {
        self.payment_status.as_deref() == Some(PAID_STATUS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentStatus {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PaymentStatus {
    pub fn confirmed() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn not_confirmed() -> Self {
        Self {
            success: false,
            message: Some("Payment not confirmed".to_string()),
        }
    }
}
