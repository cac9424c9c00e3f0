//! Delivery-date façade: city text in, delivery estimate out.

use std::sync::Arc;

use chrono::{Datelike, NaiveDateTime, Weekday};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cycle::next_delivery;
use crate::model::DeliveryEstimate;
use crate::ports::RouteRow;
use crate::resolver::{CityResolver, Resolution};
use crate::route::{RouteEntry, RouteTables};

/// Spanish weekday label used in estimates and emails.
#[must_use]
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Lunes",
        Weekday::Tue => "Martes",
        Weekday::Wed => "Miércoles",
        Weekday::Thu => "Jueves",
        Weekday::Fri => "Viernes",
        Weekday::Sat => "Sábado",
        Weekday::Sun => "Domingo",
    }
}

#[derive(Debug, Clone)]
/// Computes delivery estimates over one immutable route table snapshot.
pub struct DeliveryScheduler {
    tables: Arc<RouteTables>,
}

impl DeliveryScheduler {
    /// Scheduler over the given tables.
    #[must_use]
    pub fn new(tables: Arc<RouteTables>) -> Self {
        Self { tables }
    }

    /// Scheduler over the built-in routing table.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(Arc::new(RouteTables::builtin()))
    }

    /// Tables this scheduler reads.
    #[must_use]
    pub fn tables(&self) -> &Arc<RouteTables> {
        &self.tables
    }

    /// Route serving `city`, if any.
    #[must_use]
    pub fn resolve(&self, city: &str) -> Option<Resolution<'_>> {
        CityResolver::new(&self.tables).resolve(city)
    }

    /// Next delivery for `city` as seen at `now`. Never fails: unknown
    /// localities produce a not-found estimate.
    #[must_use]
    pub fn estimate(&self, city: &str, now: NaiveDateTime) -> DeliveryEstimate {
        let Some(found) = self.resolve(city) else {
            debug!(city, "no route for city");
            return DeliveryEstimate::not_found();
        };

        match next_delivery(found.entry, now) {
            Some(date) => {
                debug!(
                    city,
                    key = found.entry.key(),
                    table = %found.table,
                    %date,
                    "delivery estimated"
                );
                DeliveryEstimate::on(date, weekday_name(date.weekday()))
            }
            None => {
                warn!(city, key = found.entry.key(), %now, "delivery date out of range");
                DeliveryEstimate::not_found()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
/// Outcome of merging route sheet rows into the live tables.
pub struct ReloadReport {
    /// Rows turned into route entries.
    pub accepted: usize,
    /// Rows skipped as malformed.
    pub rejected: usize,
    /// Whether the live tables were replaced.
    pub applied: bool,
}

/// Route tables shared across request handlers.
///
/// Readers take an `Arc` snapshot; a reload builds new tables and swaps the
/// pointer, so an estimate in flight never sees a half-merged table.
#[derive(Debug)]
pub struct SharedScheduler {
    current: RwLock<Arc<RouteTables>>,
}

impl SharedScheduler {
    /// Shared handle starting from `tables`.
    #[must_use]
    pub fn new(tables: RouteTables) -> Self {
        Self {
            current: RwLock::new(Arc::new(tables)),
        }
    }

    /// Shared handle over the built-in routing table.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(RouteTables::builtin())
    }

    /// Scheduler bound to the current tables.
    #[must_use]
    pub fn snapshot(&self) -> DeliveryScheduler {
        DeliveryScheduler::new(self.tables())
    }

    /// Current tables.
    #[must_use]
    pub fn tables(&self) -> Arc<RouteTables> {
        Arc::clone(&self.current.read())
    }

    /// Swap in new tables.
    pub fn replace(&self, tables: RouteTables) {
        *self.current.write() = Arc::new(tables);
    }

    /// Estimate against the current tables.
    #[must_use]
    pub fn estimate(&self, city: &str, now: NaiveDateTime) -> DeliveryEstimate {
        self.snapshot().estimate(city, now)
    }

    /// Merge sheet rows into the current tables.
    ///
    /// Malformed rows are skipped. When no row survives, the tables are left
    /// untouched.
    pub fn apply_rows(&self, rows: &[RouteRow]) -> ReloadReport {
        let mut entries = Vec::with_capacity(rows.len());
        let mut rejected = 0;
        for row in rows {
            match RouteEntry::from_row(row) {
                Ok(entry) => entries.push(entry),
                Err(err) => {
                    rejected += 1;
                    warn!(locality = %row.locality, error = %err, "skipping route row");
                }
            }
        }

        let accepted = entries.len();
        if accepted == 0 {
            warn!(rejected, "route sheet had no usable rows, keeping current table");
            return ReloadReport {
                accepted,
                rejected,
                applied: false,
            };
        }

        let mut current = self.current.write();
        let merged = current.merged(entries);
        info!(
            accepted,
            rejected,
            biweekly = merged.biweekly().len(),
            weekly = merged.weekly().len(),
            "route table reloaded"
        );
        *current = Arc::new(merged);

        ReloadReport {
            accepted,
            rejected,
            applied: true,
        }
    }
}

impl Default for SharedScheduler {
    fn default() -> Self {
        Self::builtin()
    }
}
