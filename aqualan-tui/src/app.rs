use std::sync::Arc;

use aqualan_core::{
    CycleKind, DeliveryEstimate, MatchKind, ReloadReport, RouteEntry, RouteTableSource,
    SharedScheduler,
};
use chrono::NaiveDateTime;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Lookup,
    Routes,
}

/// Outcome of the last city lookup.
#[derive(Debug, Clone)]
pub(crate) struct Lookup {
    pub city: String,
    pub estimate: DeliveryEstimate,
    pub key: Option<String>,
    pub table: Option<CycleKind>,
    pub matched_by: Option<MatchKind>,
}

pub(crate) struct App {
    pub scheduler: Arc<SharedScheduler>,
    pub source: Option<Arc<dyn RouteTableSource>>,

    pub screen: Screen,
    pub city_input: String,
    pub lookup: Option<Lookup>,

    pub route_table: CycleKind,
    pub route_list_index: usize,

    pub is_loading: bool,
    pub info_message: Option<String>,
    pub error_message: Option<String>,
}

impl App {
    pub(crate) fn new(
        scheduler: Arc<SharedScheduler>,
        source: Option<Arc<dyn RouteTableSource>>,
    ) -> Self {
        Self {
            scheduler,
            source,
            screen: Screen::Lookup,
            city_input: String::new(),
            lookup: None,
            route_table: CycleKind::Biweekly,
            route_list_index: 0,
            is_loading: false,
            info_message: None,
            error_message: None,
        }
    }

    /// Estimate the typed city as of `now`.
    pub(crate) fn run_lookup(&mut self, now: NaiveDateTime) {
        let city = self.city_input.trim().to_owned();
        let snapshot = self.scheduler.snapshot();
        let estimate = snapshot.estimate(&city, now);
        let resolution = snapshot.resolve(&city);
        self.lookup = Some(Lookup {
            key: resolution.map(|found| found.entry.key().to_owned()),
            table: resolution.map(|found| found.table),
            matched_by: resolution.map(|found| found.matched_by),
            city,
            estimate,
        });
    }

    /// Entries of the table shown on the routes screen.
    pub(crate) fn visible_routes(&self) -> Vec<RouteEntry> {
        self.scheduler
            .tables()
            .table(self.route_table)
            .iter()
            .cloned()
            .collect()
    }

    pub(crate) fn toggle_route_table(&mut self) {
        self.route_table = match self.route_table {
            CycleKind::Biweekly => CycleKind::Weekly,
            CycleKind::Weekly => CycleKind::Biweekly,
        };
        self.route_list_index = 0;
    }

    pub(crate) fn apply_reload(&mut self, result: Result<ReloadReport, String>) {
        self.is_loading = false;
        match result {
            Ok(report) if report.applied => {
                self.error_message = None;
                self.info_message = Some(format!(
                    "Reloaded: {} rows merged, {} skipped",
                    report.accepted, report.rejected
                ));
            }
            Ok(report) => {
                self.info_message = None;
                self.error_message = Some(format!(
                    "Sheet had no usable rows ({} skipped), table unchanged",
                    report.rejected
                ));
            }
            Err(err) => {
                warn!(error = %err, "route reload failed");
                self.info_message = None;
                self.error_message = Some(format!("Reload failed: {err}"));
            }
        }
        self.route_list_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use aqualan_core::cycle::REFERENCE_ANCHOR;
    use chrono::NaiveTime;

    use super::*;

    fn noon() -> NaiveDateTime {
        REFERENCE_ANCHOR.and_time(NaiveTime::from_hms_opt(12, 0, 0).expect("valid time"))
    }

    #[test]
    fn lookup_reports_match_details() {
        let mut app = App::new(Arc::new(SharedScheduler::builtin()), None);
        app.city_input = "  Leioa, Bizkaia ".to_owned();
        app.run_lookup(noon());

        let lookup = app.lookup.expect("lookup");
        assert_eq!(lookup.city, "Leioa, Bizkaia");
        assert!(lookup.estimate.found);
        assert_eq!(lookup.key.as_deref(), Some("leioa-erandio"));
        assert_eq!(lookup.table, Some(CycleKind::Weekly));
        assert_eq!(lookup.matched_by, Some(MatchKind::TokenOverlap));
    }

    #[test]
    fn lookup_of_unknown_city() {
        let mut app = App::new(Arc::new(SharedScheduler::builtin()), None);
        app.city_input = "Madrid".to_owned();
        app.run_lookup(noon());

        let lookup = app.lookup.expect("lookup");
        assert!(!lookup.estimate.found);
        assert_eq!(lookup.key, None);
        assert_eq!(lookup.table, None);
    }

    #[test]
    fn toggling_switches_tables() {
        let mut app = App::new(Arc::new(SharedScheduler::builtin()), None);
        let biweekly = app.visible_routes();
        app.route_list_index = 3;
        app.toggle_route_table();
        assert_eq!(app.route_table, CycleKind::Weekly);
        assert_eq!(app.route_list_index, 0);
        assert_ne!(app.visible_routes(), biweekly);
    }

    #[test]
    fn reload_outcomes_set_messages() {
        let mut app = App::new(Arc::new(SharedScheduler::builtin()), None);
        app.apply_reload(Ok(ReloadReport {
            accepted: 0,
            rejected: 2,
            applied: false,
        }));
        assert!(app.error_message.is_some());

        app.apply_reload(Ok(ReloadReport {
            accepted: 4,
            rejected: 1,
            applied: true,
        }));
        assert_eq!(app.error_message, None);
        assert_eq!(
            app.info_message.as_deref(),
            Some("Reloaded: 4 rows merged, 1 skipped")
        );

        app.apply_reload(Err("connection refused".to_owned()));
        assert_eq!(
            app.error_message.as_deref(),
            Some("Reload failed: connection refused")
        );
    }
}
