//! Aggregation reporters behind the dashboard.
//!
//! Every reporter is a pure function over the office snapshot. Bucketing
//! follows a fixed arithmetic rule per period; records that fall outside
//! every bucket are silently dropped, and empty input always yields the full
//! labeled bucket list with zero values, never an empty list.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::MovementKind;
use crate::office::BackOffice;

const WEEK_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const MONTH_LABELS: [&str; 4] = ["Week 1", "Week 2", "Week 3", "Week 4"];
const QUARTER_LABELS: [&str; 3] = ["Month 1", "Month 2", "Month 3"];
const YEAR_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Time grain for the bucketed reporters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Week,
    Month,
    Quarter,
    Year,
}

impl Period {
    pub fn labels(self) -> &'static [&'static str] {
        match self {
            Period::Week => &WEEK_LABELS,
            Period::Month => &MONTH_LABELS,
            Period::Quarter => &QUARTER_LABELS,
            Period::Year => &YEAR_LABELS,
        }
    }

    /// Bucket index for a date, or `None` when the date falls outside every
    /// bucket (days 29..31 in the month grain).
    pub fn bucket(self, date: NaiveDate) -> Option<usize> {
        match self {
            Period::Week => Some(date.weekday().num_days_from_monday() as usize),
            Period::Month => {
                let week = (date.day() as usize - 1) / 7;
                (week < MONTH_LABELS.len()).then_some(week)
            }
            Period::Quarter => Some(date.month0() as usize % 3),
            Period::Year => Some(date.month0() as usize),
        }
    }
}

/// One labeled value in a bucketed series.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub label: &'static str,
    pub value: f64,
}

/// Income and expense side by side for one bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct CashFlowBucket {
    pub label: &'static str,
    pub income: f64,
    pub expense: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub total_sales: f64,
    pub total_clients: usize,
    pub total_products: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryExpense {
    pub category: String,
    pub amount: f64,
}

/// Distinct orders settled through one treasury account.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentMethodRank {
    pub account: String,
    pub orders: usize,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductStat {
    pub article: String,
    pub units: i64,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyMetric {
    pub day: NaiveDate,
    pub orders: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSeverity {
    Warning,
    Success,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub title: &'static str,
    pub message: String,
}

const LOW_STOCK_THRESHOLD: i64 = 10;
const SALES_TARGET: f64 = 50_000.0;
const RECENT_WINDOW_DAYS: i64 = 30;

pub struct DashboardService;

impl DashboardService {
    /// Sale totals bucketed by the period grain.
    pub fn sales_by_period(office: &BackOffice, period: Period) -> Vec<Bucket> {
        Self::bucketize(
            period,
            office
                .sales
                .iter()
                .map(|sale| (sale.date.date_naive(), sale.total)),
        )
    }

    /// Cash-movement totals per bucket, split by direction.
    pub fn income_vs_expense_by_period(office: &BackOffice, period: Period) -> Vec<CashFlowBucket> {
        let labels = period.labels();
        let mut income = vec![0.0; labels.len()];
        let mut expense = vec![0.0; labels.len()];
        for movement in &office.movements {
            let Some(idx) = period.bucket(movement.moved_at.date_naive()) else {
                continue;
            };
            match movement.kind {
                MovementKind::Ingress => income[idx] += movement.amount,
                MovementKind::Egress => expense[idx] += movement.amount,
            }
        }
        labels
            .iter()
            .enumerate()
            .map(|(idx, label)| CashFlowBucket {
                label,
                income: income[idx],
                expense: expense[idx],
            })
            .collect()
    }

    /// Ingress-only trend line over the period grain.
    pub fn profit_trend_by_period(office: &BackOffice, period: Period) -> Vec<Bucket> {
        Self::bucketize(
            period,
            office
                .movements
                .iter()
                .filter(|movement| movement.kind == MovementKind::Ingress)
                .map(|movement| (movement.moved_at.date_naive(), movement.amount)),
        )
    }

    pub fn summary(office: &BackOffice) -> DashboardSummary {
        DashboardSummary {
            total_sales: office.sales.iter().map(|sale| sale.total).sum(),
            total_clients: office.clients.len(),
            total_products: office.variants.len(),
        }
    }

    /// Employee-expense totals grouped by category, largest first.
    pub fn expenses_by_category(office: &BackOffice) -> Vec<CategoryExpense> {
        let mut totals: HashMap<Uuid, f64> = HashMap::new();
        for expense in &office.expenses {
            *totals.entry(expense.category_id).or_default() += expense.amount;
        }
        let mut rows: Vec<CategoryExpense> = totals
            .into_iter()
            .map(|(category_id, amount)| CategoryExpense {
                category: office
                    .expense_category(category_id)
                    .map(|category| category.description.clone())
                    .unwrap_or_else(|| "Unspecified".to_string()),
                amount,
            })
            .collect();
        rows.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        rows
    }

    /// Treasury accounts ranked by the number of distinct orders they
    /// settled. An order split across two accounts counts once for each.
    pub fn payment_method_ranking(office: &BackOffice) -> Vec<PaymentMethodRank> {
        let mut orders_per_account: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
        for sale in &office.sales {
            for payment in &sale.payments {
                orders_per_account
                    .entry(payment.treasury_account_id)
                    .or_default()
                    .insert(sale.id);
            }
        }
        let mut ranking: Vec<(String, usize)> = orders_per_account
            .into_iter()
            .map(|(account_id, orders)| {
                let account = office
                    .treasury_account(account_id)
                    .map(|account| account.description.clone())
                    .unwrap_or_else(|| "Unspecified".to_string());
                (account, orders.len())
            })
            .collect();
        ranking.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranking
            .into_iter()
            .enumerate()
            .map(|(idx, (account, orders))| PaymentMethodRank {
                account,
                orders,
                position: idx + 1,
            })
            .collect()
    }

    /// Top five articles by units sold. Line revenue is scaled by the
    /// order-level discount factor (order total over the undiscounted sum of
    /// its lines).
    pub fn top_products(office: &BackOffice) -> Vec<ProductStat> {
        struct Acc {
            article: String,
            units: i64,
            revenue: f64,
            cost: f64,
        }
        let mut by_article: HashMap<Uuid, Acc> = HashMap::new();

        for sale in &office.sales {
            let gross: f64 = sale
                .lines
                .iter()
                .map(|line| line.unit_price * line.quantity as f64)
                .sum();
            let discount_factor = if gross > 0.0 { sale.total / gross } else { 1.0 };

            for line in &sale.lines {
                let Some(article) = office.article(line.article_id) else {
                    continue;
                };
                let acc = by_article.entry(line.article_id).or_insert_with(|| Acc {
                    article: article.description.clone(),
                    units: 0,
                    revenue: 0.0,
                    cost: 0.0,
                });
                acc.units += line.quantity;
                acc.revenue += line.unit_price * discount_factor * line.quantity as f64;
                acc.cost += article.cost_price * line.quantity as f64;
            }
        }

        let mut stats: Vec<ProductStat> = by_article
            .into_values()
            .map(|acc| ProductStat {
                article: acc.article,
                units: acc.units,
                revenue: acc.revenue,
                cost: acc.cost,
                profit: acc.revenue - acc.cost,
            })
            .collect();
        stats.sort_by(|a, b| b.units.cmp(&a.units).then_with(|| a.article.cmp(&b.article)));
        stats.truncate(5);
        stats
    }

    /// Order counts per calendar day across the observed date range,
    /// including zero-order days in between. Empty when there are no sales.
    pub fn daily_metrics(office: &BackOffice) -> Vec<DailyMetric> {
        let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for sale in &office.sales {
            *per_day.entry(sale.date.date_naive()).or_default() += 1;
        }
        let (Some((&first, _)), Some((&last, _))) =
            (per_day.iter().next(), per_day.iter().next_back())
        else {
            return Vec::new();
        };

        let mut metrics = Vec::new();
        let mut day = first;
        while day <= last {
            metrics.push(DailyMetric {
                day,
                orders: per_day.get(&day).copied().unwrap_or(0),
            });
            day += Duration::days(1);
        }
        metrics
    }

    /// Operational alerts: low stock, recent sales over target, and new
    /// clients in the last 30 days.
    pub fn alerts(office: &BackOffice, now: DateTime<Utc>) -> Vec<Alert> {
        let mut alerts = Vec::new();
        let window_start = now - Duration::days(RECENT_WINDOW_DAYS);

        let low_stock = office
            .variants
            .iter()
            .filter(|variant| variant.stock < LOW_STOCK_THRESHOLD)
            .count();
        if low_stock > 0 {
            alerts.push(Alert {
                severity: AlertSeverity::Warning,
                title: "Low stock",
                message: format!("{low_stock} products below the stock threshold"),
            });
        }

        let recent_sales: f64 = office
            .sales
            .iter()
            .filter(|sale| sale.date >= window_start && sale.date <= now)
            .map(|sale| sale.total)
            .sum();
        if recent_sales > SALES_TARGET {
            alerts.push(Alert {
                severity: AlertSeverity::Success,
                title: "Target exceeded",
                message: format!("Sales of the last 30 days reached {recent_sales:.2}"),
            });
        }

        let new_clients = office
            .clients
            .iter()
            .filter(|client| client.created_at >= window_start)
            .count();
        if new_clients > 0 {
            alerts.push(Alert {
                severity: AlertSeverity::Info,
                title: "New clients",
                message: format!("{new_clients} new clients this month"),
            });
        }

        alerts
    }

    fn bucketize(period: Period, records: impl Iterator<Item = (NaiveDate, f64)>) -> Vec<Bucket> {
        let labels = period.labels();
        let mut values = vec![0.0; labels.len()];
        for (date, amount) in records {
            if let Some(idx) = period.bucket(date) {
                values[idx] += amount;
            }
        }
        labels
            .iter()
            .zip(values)
            .map(|(label, value)| Bucket { label, value })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CashMovement, Client, SaleLine, SaleOrder, TreasuryAccount};

    fn on(date: NaiveDate) -> DateTime<Utc> {
        date.and_hms_opt(12, 0, 0).unwrap().and_utc()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_input_yields_labeled_zero_buckets() {
        let office = BackOffice::new("Shop");
        let buckets = DashboardService::sales_by_period(&office, Period::Week);
        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].label, "Mon");
        assert_eq!(buckets[6].label, "Sun");
        assert!(buckets.iter().all(|bucket| bucket.value == 0.0));
    }

    #[test]
    fn tuesday_sale_lands_in_the_tuesday_bucket() {
        let mut office = BackOffice::new("Shop");
        // 2024-06-11 is a Tuesday.
        office.sales.push(SaleOrder::new(on(day(2024, 6, 11)), 500.0));

        let buckets = DashboardService::sales_by_period(&office, Period::Week);
        assert_eq!(buckets[1].label, "Tue");
        assert_eq!(buckets[1].value, 500.0);
        let rest: f64 = buckets
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != 1)
            .map(|(_, bucket)| bucket.value)
            .sum();
        assert_eq!(rest, 0.0);
    }

    #[test]
    fn sunday_maps_to_the_last_weekday_bucket() {
        // 2024-06-09 is a Sunday.
        assert_eq!(Period::Week.bucket(day(2024, 6, 9)), Some(6));
    }

    #[test]
    fn month_grain_drops_the_fifth_week() {
        assert_eq!(Period::Month.bucket(day(2024, 6, 1)), Some(0));
        assert_eq!(Period::Month.bucket(day(2024, 6, 28)), Some(3));
        assert_eq!(Period::Month.bucket(day(2024, 6, 29)), None);
        assert_eq!(Period::Month.bucket(day(2024, 5, 31)), None);
    }

    #[test]
    fn quarter_grain_wraps_months() {
        assert_eq!(Period::Quarter.bucket(day(2024, 1, 10)), Some(0));
        assert_eq!(Period::Quarter.bucket(day(2024, 5, 10)), Some(1));
        assert_eq!(Period::Quarter.bucket(day(2024, 12, 10)), Some(2));
    }

    #[test]
    fn income_and_expense_split_by_direction() {
        let mut office = BackOffice::new("Shop");
        let account = Uuid::new_v4();
        let batch = Uuid::new_v4();
        let monday = on(day(2024, 6, 10));

        let mut ingress = CashMovement::ingress(batch, account, 300.0);
        ingress.moved_at = monday;
        let mut egress = CashMovement::egress(batch, account, 120.0);
        egress.moved_at = monday;
        office.movements.push(ingress);
        office.movements.push(egress);

        let buckets = DashboardService::income_vs_expense_by_period(&office, Period::Week);
        assert_eq!(buckets[0].income, 300.0);
        assert_eq!(buckets[0].expense, 120.0);

        let trend = DashboardService::profit_trend_by_period(&office, Period::Week);
        assert_eq!(trend[0].value, 300.0);
    }

    #[test]
    fn expenses_grouped_by_category_largest_first() {
        let mut office = BackOffice::new("Shop");
        let rent = crate::domain::ExpenseCategory::new("Rent");
        let supplies = crate::domain::ExpenseCategory::new("Supplies");
        let rent_id = rent.id;
        let supplies_id = supplies.id;
        office.expense_categories.push(rent);
        office.expense_categories.push(supplies);

        let when = on(day(2024, 6, 10));
        office
            .expenses
            .push(crate::domain::EmployeeExpense::new(supplies_id, 80.0, when));
        office
            .expenses
            .push(crate::domain::EmployeeExpense::new(rent_id, 900.0, when));
        office
            .expenses
            .push(crate::domain::EmployeeExpense::new(supplies_id, 40.0, when));
        // Expense whose category row is gone.
        office
            .expenses
            .push(crate::domain::EmployeeExpense::new(Uuid::new_v4(), 15.0, when));

        let rows = DashboardService::expenses_by_category(&office);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].category, "Rent");
        assert_eq!(rows[0].amount, 900.0);
        assert_eq!(rows[1].category, "Supplies");
        assert_eq!(rows[1].amount, 120.0);
        assert_eq!(rows[2].category, "Unspecified");
        assert_eq!(rows[2].amount, 15.0);
    }

    #[test]
    fn payment_ranking_counts_distinct_orders() {
        let mut office = BackOffice::new("Shop");
        let cash = office.add_treasury_account(TreasuryAccount::new("Cash"));
        let card = office.add_treasury_account(TreasuryAccount::new("Card"));

        // Two orders through cash, one of them split with card.
        let mut first = SaleOrder::new(on(day(2024, 6, 10)), 100.0);
        first.payments.push(crate::domain::OrderPayment {
            treasury_account_id: cash,
            amount: 60.0,
        });
        first.payments.push(crate::domain::OrderPayment {
            treasury_account_id: card,
            amount: 40.0,
        });
        let mut second = SaleOrder::new(on(day(2024, 6, 11)), 80.0);
        second.payments.push(crate::domain::OrderPayment {
            treasury_account_id: cash,
            amount: 80.0,
        });
        office.sales.push(first);
        office.sales.push(second);

        let ranking = DashboardService::payment_method_ranking(&office);
        assert_eq!(ranking[0].account, "Cash");
        assert_eq!(ranking[0].orders, 2);
        assert_eq!(ranking[0].position, 1);
        assert_eq!(ranking[1].account, "Card");
        assert_eq!(ranking[1].orders, 1);
    }

    #[test]
    fn top_products_apply_order_discount_factor() {
        let mut office = BackOffice::new("Shop");
        let mut article = crate::domain::Article::new("Jacket", 100.0, Uuid::new_v4());
        article.cost_price = 40.0;
        let article_id = article.id;
        office.articles.push(article);

        // Two units at 100 each but the order total is 180: 10% discount.
        let mut sale = SaleOrder::new(on(day(2024, 6, 10)), 180.0);
        sale.lines.push(SaleLine {
            article_id,
            quantity: 2,
            unit_price: 100.0,
        });
        office.sales.push(sale);

        let stats = DashboardService::top_products(&office);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].units, 2);
        assert!((stats[0].revenue - 180.0).abs() < 1e-9);
        assert!((stats[0].profit - 100.0).abs() < 1e-9);
    }

    #[test]
    fn daily_metrics_fill_gaps_in_the_range() {
        let mut office = BackOffice::new("Shop");
        office.sales.push(SaleOrder::new(on(day(2024, 6, 10)), 50.0));
        office.sales.push(SaleOrder::new(on(day(2024, 6, 12)), 70.0));

        let metrics = DashboardService::daily_metrics(&office);
        assert_eq!(metrics.len(), 3);
        assert_eq!(metrics[1].day, day(2024, 6, 11));
        assert_eq!(metrics[1].orders, 0);
    }

    #[test]
    fn alerts_flag_new_clients_and_stay_quiet_otherwise() {
        let mut office = BackOffice::new("Shop");
        assert!(DashboardService::alerts(&office, Utc::now()).is_empty());

        office.add_client(Client::new("Fresh Buyer", "DNI", "123"));
        let alerts = DashboardService::alerts(&office, Utc::now());
        assert!(alerts
            .iter()
            .any(|alert| alert.severity == AlertSeverity::Info));
    }
}
