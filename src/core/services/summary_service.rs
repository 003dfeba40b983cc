//! Read-only aggregations over the reservation and expense ledgers.

use std::collections::BTreeSet;

use crate::calendar::days_in_month;
use crate::ledger::{DayLedger, ExpenseLedger, ReservationLedger};

#[derive(Debug, Clone, PartialEq)]
pub struct PropertySummary {
    pub property: String,
    pub occupied_days: usize,
    /// Each distinct client's amount counted once, not once per day.
    pub income: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthBalance {
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyStat {
    pub property: String,
    pub occupied_days: usize,
    pub days_in_month: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClientTotals {
    pub client_count: usize,
    pub income: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewCell {
    pub client: String,
    pub color: String,
}

/// One property's month, one cell per day starting at day 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewRow {
    pub property: String,
    pub days: Vec<Option<OverviewCell>>,
}

pub struct SummaryService;

impl SummaryService {
    pub fn property_summary(
        reservations: &ReservationLedger,
        properties: &[String],
        month: &str,
        year: i32,
    ) -> Vec<PropertySummary> {
        properties
            .iter()
            .map(|property| {
                let days = reservations.day_ledger(property, month, year);
                PropertySummary {
                    property: property.clone(),
                    occupied_days: days.len(),
                    income: distinct_client_income(days),
                }
            })
            .collect()
    }

    pub fn month_balance(
        reservations: &ReservationLedger,
        expenses: &ExpenseLedger,
        properties: &[String],
        month: &str,
        year: i32,
    ) -> MonthBalance {
        let income = Self::property_summary(reservations, properties, month, year)
            .iter()
            .map(|summary| summary.income)
            .sum();
        let expenses = expenses.expenses(month, year).total();
        MonthBalance {
            income,
            expenses,
            balance: income - expenses,
        }
    }

    pub fn occupancy(
        reservations: &ReservationLedger,
        properties: &[String],
        month: &str,
        year: i32,
    ) -> Vec<OccupancyStat> {
        let days_in_month = days_in_month(month, year);
        properties
            .iter()
            .map(|property| {
                let occupied_days = reservations.day_ledger(property, month, year).len();
                OccupancyStat {
                    property: property.clone(),
                    occupied_days,
                    days_in_month,
                    percentage: occupied_days as f64 / f64::from(days_in_month) * 100.0,
                }
            })
            .collect()
    }

    /// Client count and income across all properties, each client once.
    pub fn client_totals(reservations: &ReservationLedger, month: &str, year: i32) -> ClientTotals {
        let grouped = reservations.group_by_client(month, year);
        ClientTotals {
            client_count: grouped.len(),
            income: grouped.values().map(|stay| stay.total).sum(),
        }
    }

    pub fn unique_clients(
        reservations: &ReservationLedger,
        properties: &[String],
        month: &str,
        year: i32,
    ) -> usize {
        properties
            .iter()
            .flat_map(|property| {
                reservations
                    .day_ledger(property, month, year)
                    .clients()
                    .into_iter()
                    .map(|(client, _)| client)
            })
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn month_overview(
        reservations: &ReservationLedger,
        properties: &[String],
        month: &str,
        year: i32,
    ) -> Vec<OverviewRow> {
        let days_in_month = days_in_month(month, year);
        properties
            .iter()
            .map(|property| {
                let ledger = reservations.day_ledger(property, month, year);
                OverviewRow {
                    property: property.clone(),
                    days: (1..=days_in_month)
                        .map(|day| {
                            ledger.get(day).filter(|b| b.is_occupied()).map(|b| OverviewCell {
                                client: b.client.clone(),
                                color: b.color.clone(),
                            })
                        })
                        .collect(),
                }
            })
            .collect()
    }
}

fn distinct_client_income(days: &DayLedger) -> f64 {
    let mut seen = BTreeSet::new();
    days.iter()
        .filter(|(_, booking)| booking.is_occupied() && seen.insert(booking.client.as_str()))
        .map(|(_, booking)| booking.amount_paid)
        .sum()
}
