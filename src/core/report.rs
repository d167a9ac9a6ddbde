//! Period report aggregation.
//!
//! Fetches the orders and payments whose dates fall inside a closed interval
//! and computes grouped sums over them: overall summary, status breakdown,
//! top clients, top employees, and payments by normalized method. All
//! aggregate functions are pure over the fetched slices so they can be
//! tested without a database.
//!
//! The estimated receivable is an approximation by design: period order
//! volume minus period payment volume. A payment can settle an order from a
//! different period, so this is not a ledger-accurate accounts-receivable
//! figure and must not be silently "fixed" into one.

use crate::{
    entities::{Client, Employee, Order, Payment, order, payment},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{QuerySelect, prelude::*};
use std::collections::{BTreeMap, HashMap};

/// Row cap per fetched set, mirroring the reference behavior.
pub const FETCH_LIMIT: u64 = 10_000;

/// Ranked breakdowns are truncated to this many rows.
pub const TOP_LIMIT: usize = 20;

/// Placeholder name used when an order's reference cannot be resolved.
pub const MISSING_NAME: &str = "—";

/// Canonical payment method after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PaymentMethod {
    /// Cash payment
    Cash,
    /// Card / cashless payment
    Card,
}

impl PaymentMethod {
    /// Normalizes a raw method string to a canonical method.
    ///
    /// Lower-cases and trims, then maps the known synonyms (including the
    /// localized spellings) onto the two canonical keys. Anything else is
    /// unrecognized and returns `None`; such payments are dropped from
    /// method breakdowns but still count toward the payments sum.
    #[must_use]
    pub fn normalize(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "cash" | "наличный" | "наличные" => Some(Self::Cash),
            "card" | "безналичный" | "безналичные" => Some(Self::Card),
            _ => None,
        }
    }

    /// The canonical key for this method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
        }
    }

    /// Human-readable label used in exported sheets.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Card => "Card",
        }
    }
}

/// One order row in the report slice, with display names joined on.
#[derive(Debug, Clone)]
pub struct ReportOrder {
    /// Order id
    pub id: i64,
    /// Order date (inside the requested interval)
    pub order_date: NaiveDate,
    /// Stored status string
    pub status: String,
    /// Stored derived total
    pub total_amount: f64,
    /// Owning client's display name
    pub client_name: String,
    /// Managing employee's display name
    pub employee_name: String,
}

/// One payment row in the report slice.
#[derive(Debug, Clone)]
pub struct ReportPayment {
    /// Payment id
    pub id: i64,
    /// Payment date (inside the requested interval)
    pub payment_date: NaiveDate,
    /// Paid amount
    pub amount: f64,
    /// Raw method string as stored
    pub payment_method: Option<String>,
}

/// Overall period summary.
#[derive(Debug, Clone)]
pub struct PeriodSummary {
    /// Number of orders in the period
    pub orders_count: usize,
    /// Sum of order totals
    pub orders_sum: f64,
    /// Number of payments in the period
    pub payments_count: usize,
    /// Sum of payment amounts
    pub payments_sum: f64,
    /// `clamp(payments_sum / orders_sum, 0, 1)`; 0 when orders_sum <= 0
    pub paid_ratio: f64,
    /// `max(0, orders_sum - payments_sum)`; an approximation by design
    pub estimated_receivable: f64,
    /// Order count per status, sorted descending by count
    pub status_breakdown: Vec<(String, u64)>,
}

/// One row of a ranked breakdown (top clients / top employees).
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRow {
    /// 1-based rank after sorting
    pub rank: usize,
    /// Group name (client or employee)
    pub name: String,
    /// Number of orders in the group
    pub count: u64,
    /// Sum of order totals in the group
    pub sum: f64,
}

/// The complete computed report for one period.
#[derive(Debug, Clone)]
pub struct PeriodReport {
    /// Interval start (inclusive)
    pub date_from: NaiveDate,
    /// Interval end (inclusive)
    pub date_to: NaiveDate,
    /// Overall summary
    pub summary: PeriodSummary,
    /// Top clients by order sum
    pub top_clients: Vec<RankedRow>,
    /// Top employees by order count
    pub top_employees: Vec<RankedRow>,
    /// Payment sums per normalized method, descending by sum
    pub by_method: Vec<(PaymentMethod, f64)>,
}

/// Fetches the orders whose `order_date` falls in `[from, to]`, with client
/// and employee names joined on in memory.
pub async fn fetch_report_orders(
    db: &DatabaseConnection,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<ReportOrder>> {
    let orders = Order::find()
        .filter(order::Column::OrderDate.gte(from))
        .filter(order::Column::OrderDate.lte(to))
        .limit(FETCH_LIMIT)
        .all(db)
        .await?;

    // Reference tables are small; one pass each beats a per-order lookup.
    let clients: HashMap<i64, String> = Client::find()
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    let employees: HashMap<i64, String> = Employee::find()
        .all(db)
        .await?
        .into_iter()
        .map(|e| (e.id, e.name))
        .collect();

    Ok(orders
        .into_iter()
        .map(|o| ReportOrder {
            id: o.id,
            order_date: o.order_date,
            status: o.status,
            total_amount: o.total_amount,
            client_name: clients
                .get(&o.client_id)
                .cloned()
                .unwrap_or_else(|| MISSING_NAME.to_string()),
            employee_name: employees
                .get(&o.employee_id)
                .cloned()
                .unwrap_or_else(|| MISSING_NAME.to_string()),
        })
        .collect())
}

/// Fetches the payments whose `payment_date` falls in `[from, to]`.
pub async fn fetch_report_payments(
    db: &DatabaseConnection,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<ReportPayment>> {
    let payments = Payment::find()
        .filter(payment::Column::PaymentDate.gte(from))
        .filter(payment::Column::PaymentDate.lte(to))
        .limit(FETCH_LIMIT)
        .all(db)
        .await?;

    Ok(payments
        .into_iter()
        .map(|p| ReportPayment {
            id: p.id,
            payment_date: p.payment_date,
            amount: p.amount,
            payment_method: p.payment_method,
        })
        .collect())
}

/// Computes the overall summary over the fetched slices.
#[must_use]
pub fn summarize(orders: &[ReportOrder], payments: &[ReportPayment]) -> PeriodSummary {
    let orders_sum: f64 = orders.iter().map(|o| o.total_amount).sum();
    let payments_sum: f64 = payments.iter().map(|p| p.amount).sum();

    let paid_ratio = if orders_sum <= 0.0 {
        0.0
    } else {
        (payments_sum / orders_sum).clamp(0.0, 1.0)
    };

    let mut by_status: BTreeMap<&str, u64> = BTreeMap::new();
    for o in orders {
        *by_status.entry(o.status.as_str()).or_insert(0) += 1;
    }
    let mut status_breakdown: Vec<(String, u64)> = by_status
        .into_iter()
        .map(|(status, count)| (status.to_string(), count))
        .collect();
    status_breakdown.sort_by(|a, b| b.1.cmp(&a.1));

    PeriodSummary {
        orders_count: orders.len(),
        orders_sum,
        payments_count: payments.len(),
        payments_sum,
        paid_ratio,
        estimated_receivable: (orders_sum - payments_sum).max(0.0),
        status_breakdown,
    }
}

/// Groups orders by a name key, producing per-group count and sum.
fn group_orders<F>(orders: &[ReportOrder], key: F) -> BTreeMap<String, (u64, f64)>
where
    F: Fn(&ReportOrder) -> &str,
{
    let mut groups: BTreeMap<String, (u64, f64)> = BTreeMap::new();
    for o in orders {
        let entry = groups.entry(key(o).to_string()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += o.total_amount;
    }
    groups
}

fn ranked(groups: BTreeMap<String, (u64, f64)>, by_sum: bool) -> Vec<RankedRow> {
    let mut rows: Vec<RankedRow> = groups
        .into_iter()
        .map(|(name, (count, sum))| RankedRow {
            rank: 0,
            name,
            count,
            sum,
        })
        .collect();

    if by_sum {
        rows.sort_by(|a, b| b.sum.total_cmp(&a.sum));
    } else {
        rows.sort_by(|a, b| b.count.cmp(&a.count));
    }

    rows.truncate(TOP_LIMIT);
    for (idx, row) in rows.iter_mut().enumerate() {
        row.rank = idx + 1;
    }
    rows
}

/// Top clients: grouped by client name, sorted descending by order sum.
#[must_use]
pub fn top_clients(orders: &[ReportOrder]) -> Vec<RankedRow> {
    ranked(group_orders(orders, |o| o.client_name.as_str()), true)
}

/// Top employees: grouped by employee name, sorted descending by order
/// count. The count-vs-sum asymmetry against [`top_clients`] is intentional
/// reference behavior (manager workload, not revenue).
#[must_use]
pub fn top_employees(orders: &[ReportOrder]) -> Vec<RankedRow> {
    ranked(group_orders(orders, |o| o.employee_name.as_str()), false)
}

/// Payment sums per normalized method, sorted descending by sum.
///
/// Payments with an unrecognized or missing method are excluded here but
/// still count toward [`PeriodSummary::payments_sum`].
#[must_use]
pub fn payments_by_method(payments: &[ReportPayment]) -> Vec<(PaymentMethod, f64)> {
    let mut by_method: BTreeMap<PaymentMethod, f64> = BTreeMap::new();
    for p in payments {
        let Some(method) = p.payment_method.as_deref().and_then(PaymentMethod::normalize) else {
            continue;
        };
        *by_method.entry(method).or_insert(0.0) += p.amount;
    }

    let mut rows: Vec<(PaymentMethod, f64)> = by_method.into_iter().collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));
    rows
}

/// Fetches both slices for the period and computes the complete report.
pub async fn build_period_report(
    db: &DatabaseConnection,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<PeriodReport> {
    let orders = fetch_report_orders(db, from, to).await?;
    let payments = fetch_report_payments(db, from, to).await?;

    Ok(PeriodReport {
        date_from: from,
        date_to: to,
        summary: summarize(&orders, &payments),
        top_clients: top_clients(&orders),
        top_employees: top_employees(&orders),
        by_method: payments_by_method(&payments),
    })
}
