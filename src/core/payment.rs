//! Payment business logic - recording and querying the payments sub-ledger.
//!
//! Amounts are strictly positive; the ledger never stores refunds. The
//! payment method is stored exactly as given and only normalized when
//! reports are built.

use crate::{
    entities::{Payment, payment},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Records a payment against an order.
///
/// The amount must be strictly positive and finite. The date defaults to
/// today when not given. The method string is stored verbatim.
pub async fn record_payment(
    db: &DatabaseConnection,
    order_id: i64,
    amount: f64,
    method: Option<String>,
    payment_date: Option<NaiveDate>,
) -> Result<payment::Model> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }

    crate::core::order::get_order_by_id(db, order_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "Order",
            id: order_id.to_string(),
        })?;

    let date = payment_date.unwrap_or_else(|| chrono::Utc::now().date_naive());

    let payment = payment::ActiveModel {
        order_id: Set(order_id),
        payment_date: Set(date),
        amount: Set(amount),
        payment_method: Set(method),
        ..Default::default()
    };

    payment.insert(db).await.map_err(Into::into)
}

/// Retrieves all payments for an order, newest first.
pub async fn payments_for_order(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<Vec<payment::Model>> {
    Payment::find()
        .filter(payment::Column::OrderId.eq(order_id))
        .order_by_desc(payment::Column::PaymentDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Same query over any connection; used by balance computations that may run
/// inside a transaction.
pub async fn payments_for_order_on<C>(conn: &C, order_id: i64) -> Result<Vec<payment::Model>>
where
    C: ConnectionTrait,
{
    Payment::find()
        .filter(payment::Column::OrderId.eq(order_id))
        .all(conn)
        .await
        .map_err(Into::into)
}
