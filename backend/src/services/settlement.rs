//! Settlement (liquidación) service
//!
//! Reconciles an open daily load against returns, asset conditions and the
//! seller's payment, then closes it upstream exactly once.

use std::sync::Arc;

use dashmap::DashSet;
use serde::{Deserialize, Serialize};
use shared::{
    DailyLoad, DailyLoadStatus, ReconciliationError, SettlementDraft, SettlementInput,
    SettlementPreview, SettlementSummary,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppResult;
use crate::external::BackofficeApi;
use crate::middleware::Session;

/// Loads with a close request currently in flight, shared by all requests
#[derive(Clone)]
pub struct CloseGuard(Arc<DashSet<Uuid>>);

impl Default for CloseGuard {
    fn default() -> Self {
        Self(Arc::new(DashSet::new()))
    }
}

impl CloseGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `load_id`; `None` if another request already holds it
    pub fn try_acquire(&self, load_id: Uuid) -> Option<CloseTicket> {
        if self.0.insert(load_id) {
            Some(CloseTicket {
                in_flight: self.0.clone(),
                load_id,
            })
        } else {
            None
        }
    }
}

/// Releases the load when dropped, whether the close succeeded or not
pub struct CloseTicket {
    in_flight: Arc<DashSet<Uuid>>,
    load_id: Uuid,
}

impl Drop for CloseTicket {
    fn drop(&mut self) {
        self.in_flight.remove(&self.load_id);
    }
}

/// Result of a successful close
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementOutcome {
    pub load: DailyLoad,
    pub summary: SettlementSummary,
}

/// Settlement service for closing daily loads
#[derive(Clone)]
pub struct SettlementService {
    api: Arc<dyn BackofficeApi>,
    guard: CloseGuard,
}

impl SettlementService {
    pub fn new(api: Arc<dyn BackofficeApi>, guard: CloseGuard) -> Self {
        Self { api, guard }
    }

    /// Open loads, optionally for one seller
    pub async fn list_open_loads(
        &self,
        session: &Session,
        seller_id: Option<Uuid>,
    ) -> AppResult<Vec<DailyLoad>> {
        let loads = self
            .api
            .list_daily_loads(session, Some(DailyLoadStatus::Open), seller_id)
            .await?;
        Ok(loads
            .into_iter()
            .filter(|l| l.is_open() && seller_id.map_or(true, |id| l.seller_id == id))
            .collect())
    }

    /// Build a draft from the current load, seller debt and order status
    pub async fn open_draft(&self, session: &Session, load_id: Uuid) -> AppResult<SettlementDraft> {
        let load = self.api.get_daily_load(session, load_id).await?;
        if !load.is_open() {
            return Err(ReconciliationError::LoadClosed.into());
        }
        let seller = self.api.get_seller(session, load.seller_id).await?;
        let order = self.api.get_order(session, load.order.id).await?;

        Ok(SettlementDraft::open(load, seller.current_debt, order.status)?)
    }

    /// Compute the settlement summary without writing anything
    pub async fn preview(
        &self,
        session: &Session,
        load_id: Uuid,
        input: SettlementInput,
    ) -> AppResult<SettlementPreview> {
        input.validate()?;
        let mut draft = self.open_draft(session, load_id).await?;
        draft.apply(&input)?;
        Ok(SettlementPreview::from(&draft))
    }

    /// Validate and close the load.
    ///
    /// A load already being closed by another request is refused with
    /// `CloseInProgress`, so concurrent submits produce one upstream close.
    pub async fn close(
        &self,
        session: &Session,
        load_id: Uuid,
        input: SettlementInput,
    ) -> AppResult<SettlementOutcome> {
        input.validate()?;

        let _ticket = self
            .guard
            .try_acquire(load_id)
            .ok_or(ReconciliationError::CloseInProgress)?;

        let mut draft = self.open_draft(session, load_id).await?;
        draft.apply(&input)?;

        for item in draft.over_returned_items() {
            tracing::warn!(
                load_id = %load_id,
                product_id = %item.product_id,
                quantity_out = item.quantity_out,
                quantity_returned = item.quantity_returned,
                "Returns exceed dispatched quantity"
            );
        }

        let summary = draft.summary();
        let request = draft.begin_close()?;

        match self.api.close_daily_load(session, load_id, &request).await {
            Ok(closed) => {
                draft.complete_close(closed);
                tracing::info!(
                    load_id = %load_id,
                    seller_id = %request.seller_id,
                    payment = %summary.payment_amount,
                    debt_after = %summary.debt_after,
                    units_sold = summary.units_sold,
                    final_settlement = summary.final_settlement,
                    operator = session.operator_label(),
                    "Daily load closed"
                );
                Ok(SettlementOutcome {
                    load: draft.load().clone(),
                    summary,
                })
            }
            Err(e) => {
                draft.abort_close();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_guard_releases_on_drop() {
        let guard = CloseGuard::new();
        let load_id = Uuid::new_v4();

        let ticket = guard.try_acquire(load_id);
        assert!(ticket.is_some());
        assert!(guard.clone().try_acquire(load_id).is_none());
        assert!(guard.try_acquire(Uuid::new_v4()).is_some());

        drop(ticket);
        assert!(guard.try_acquire(load_id).is_some());
    }
}
