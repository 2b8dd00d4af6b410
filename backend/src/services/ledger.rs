//! Seller ledger service: balances and debt payments (amortización)

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{validate_debt_payment, DebtPayment, Seller};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppResult;
use crate::external::BackofficeApi;
use crate::middleware::Session;

/// A seller together with the credit they have left
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerBalance {
    #[serde(flatten)]
    pub seller: Seller,
    pub available_credit: Decimal,
}

impl From<Seller> for SellerBalance {
    fn from(seller: Seller) -> Self {
        let available_credit = seller.available_credit();
        Self {
            seller,
            available_credit,
        }
    }
}

#[derive(Clone)]
pub struct LedgerService {
    api: Arc<dyn BackofficeApi>,
}

impl LedgerService {
    pub fn new(api: Arc<dyn BackofficeApi>) -> Self {
        Self { api }
    }

    pub async fn seller_balance(&self, session: &Session, seller_id: Uuid) -> AppResult<SellerBalance> {
        let seller = self.api.get_seller(session, seller_id).await?;
        Ok(seller.into())
    }

    /// Record a payment against the seller's current debt
    pub async fn record_payment(
        &self,
        session: &Session,
        seller_id: Uuid,
        payment: DebtPayment,
    ) -> AppResult<SellerBalance> {
        payment.validate()?;

        let seller = self.api.get_seller(session, seller_id).await?;
        validate_debt_payment(payment.amount, seller.current_debt)?;

        let updated = self.api.record_payment(session, seller_id, &payment).await?;

        tracing::info!(
            seller_id = %seller_id,
            amount = %payment.amount,
            debt_after = %updated.debt(),
            operator = session.operator_label(),
            "Debt payment recorded"
        );

        Ok(updated.into())
    }
}
