//! Route tables mapping localities to the truck's delivery cadence.

use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize, Serializer};

use crate::ports::RouteRow;

/// Weekdays a delivery column in the route sheet stands for, Monday first.
pub const DELIVERY_WEEKDAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Reasons a route entry cannot be built.
pub enum RouteError {
    /// The locality key is blank after normalization.
    #[error("Route key is empty")]
    EmptyKey,
    /// No delivery weekday was given.
    #[error("Route {0} has no delivery days")]
    NoDeliveryDays(String),
    /// Trucks do not run on weekends.
    #[error("Route {key} lists weekend day {day}")]
    WeekendDay {
        /// Offending route key.
        key: String,
        /// Offending weekday.
        day: Weekday,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Half of the two-week cycle a biweekly route fires in.
pub enum Parity {
    /// First half, the weeks between two `WeekB` weeks.
    WeekA,
    /// Second half; the reference anchor week is a `WeekB` week.
    WeekB,
}

impl Parity {
    /// The other half of the cycle.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Parity::WeekA => Parity::WeekB,
            Parity::WeekB => Parity::WeekA,
        }
    }

    /// Read a "WEEK A" / "SEMANA B" style period label.
    ///
    /// Returns `None` when the label carries no marker, or both of them,
    /// which means the locality is served every week.
    #[must_use]
    pub fn from_period_label(label: &str) -> Option<Self> {
        let upper = label.to_uppercase();
        let tokens: Vec<&str> = upper
            .split(|ch: char| !ch.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .collect();

        let marks = |letter: &str| {
            tokens == [letter]
                || tokens.windows(2).any(|pair| {
                    matches!(pair, [prefix, mark] if *mark == letter
                        && matches!(*prefix, "WEEK" | "SEMANA" | "SEM"))
                })
        };

        match (marks("A"), marks("B")) {
            (true, false) => Some(Parity::WeekA),
            (false, true) => Some(Parity::WeekB),
            _ => None,
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Parity::WeekA => "WEEK A",
            Parity::WeekB => "WEEK B",
        };
        write!(formatter, "{label}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Which cycle model a route follows, and which table it lives in.
pub enum CycleKind {
    /// Served every week on each listed weekday.
    Weekly,
    /// Served every other week on a single weekday.
    Biweekly,
}

impl fmt::Display for CycleKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CycleKind::Weekly => "weekly",
            CycleKind::Biweekly => "biweekly",
        };
        write!(formatter, "{label}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Delivery cadence of a route; biweekly routes always carry their parity.
pub enum Cadence {
    /// Every week.
    Weekly,
    /// Every other week, in the given half of the cycle.
    Biweekly(Parity),
}

impl Cadence {
    /// Cycle model of this cadence.
    #[must_use]
    pub fn kind(self) -> CycleKind {
        match self {
            Cadence::Weekly => CycleKind::Weekly,
            Cadence::Biweekly(_) => CycleKind::Biweekly,
        }
    }

    /// Parity of a biweekly cadence.
    #[must_use]
    pub fn parity(self) -> Option<Parity> {
        match self {
            Cadence::Weekly => None,
            Cadence::Biweekly(parity) => Some(parity),
        }
    }
}

/// Lower-case and trim free text the way route keys are stored.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A locality (or hyphen-joined group of localities) and when the truck gets there.
pub struct RouteEntry {
    key: String,
    cadence: Cadence,
    weekdays: Vec<Weekday>,
}

impl RouteEntry {
    /// Build a validated entry. Weekdays are sorted Monday first and deduplicated.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] for a blank key, an empty weekday set, or weekend days.
    pub fn new<I>(key: &str, cadence: Cadence, weekdays: I) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = Weekday>,
    {
        let key = normalize(key);
        if key.is_empty() {
            return Err(RouteError::EmptyKey);
        }

        let mut days: Vec<Weekday> = weekdays.into_iter().collect();
        if let Some(day) = days
            .iter()
            .copied()
            .find(|day| matches!(day, Weekday::Sat | Weekday::Sun))
        {
            return Err(RouteError::WeekendDay { key, day });
        }
        days.sort_by_key(Weekday::num_days_from_monday);
        days.dedup();
        if days.is_empty() {
            return Err(RouteError::NoDeliveryDays(key));
        }

        Ok(Self {
            key,
            cadence,
            weekdays: days,
        })
    }

    /// Weekly route on the given days.
    ///
    /// # Errors
    ///
    /// See [`RouteEntry::new`].
    pub fn weekly<I>(key: &str, weekdays: I) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = Weekday>,
    {
        Self::new(key, Cadence::Weekly, weekdays)
    }

    /// Biweekly route firing in `parity` weeks.
    ///
    /// # Errors
    ///
    /// See [`RouteEntry::new`].
    pub fn biweekly<I>(key: &str, parity: Parity, weekdays: I) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = Weekday>,
    {
        Self::new(key, Cadence::Biweekly(parity), weekdays)
    }

    /// Convert a route sheet row.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] when the row has no locality or no ticked weekday.
    pub fn from_row(row: &RouteRow) -> Result<Self, RouteError> {
        let cadence =
            Parity::from_period_label(&row.period).map_or(Cadence::Weekly, Cadence::Biweekly);
        let days = DELIVERY_WEEKDAYS
            .iter()
            .zip(row.days)
            .filter_map(|(day, ticked)| ticked.then_some(*day));
        Self::new(&row.locality, cadence, days)
    }

    /// Normalized lookup key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Delivery cadence.
    #[must_use]
    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Cycle model, shorthand for `cadence().kind()`.
    #[must_use]
    pub fn kind(&self) -> CycleKind {
        self.cadence.kind()
    }

    /// Delivery weekdays, Monday first.
    #[must_use]
    pub fn weekdays(&self) -> &[Weekday] {
        &self.weekdays
    }

    /// Earliest delivery weekday; the only one biweekly routes use.
    #[must_use]
    pub fn first_weekday(&self) -> Weekday {
        self.weekdays.first().copied().unwrap_or(Weekday::Mon)
    }
}

#[derive(Debug, Clone, Default)]
/// Route entries keyed by locality, in insertion order.
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    index: HashMap<String, usize>,
}

impl RouteTable {
    /// Empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table; a repeated key overwrites the earlier entry in its original slot.
    #[must_use]
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = RouteEntry>,
    {
        let mut table = Self::new();
        for entry in entries {
            table.upsert(entry);
        }
        table
    }

    /// New table holding these entries merged over `self`.
    #[must_use]
    pub fn merged<I>(&self, entries: I) -> Self
    where
        I: IntoIterator<Item = RouteEntry>,
    {
        let mut table = self.clone();
        for entry in entries {
            table.upsert(entry);
        }
        table
    }

    /// New table without the given keys, remaining entries keep their order.
    #[must_use]
    pub fn without(&self, keys: &HashSet<&str>) -> Self {
        if keys.is_empty() {
            return self.clone();
        }
        Self::from_entries(
            self.entries
                .iter()
                .filter(|entry| !keys.contains(entry.key()))
                .cloned(),
        )
    }

    /// Look up an entry by key; the key is normalized first.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RouteEntry> {
        self.index
            .get(&normalize(key))
            .and_then(|slot| self.entries.get(*slot))
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn upsert(&mut self, entry: RouteEntry) {
        if let Some(existing) = self
            .index
            .get(entry.key())
            .and_then(|slot| self.entries.get_mut(*slot))
        {
            *existing = entry;
        } else {
            self.index.insert(entry.key.clone(), self.entries.len());
            self.entries.push(entry);
        }
    }
}

impl Serialize for RouteTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.entries)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
/// The biweekly and weekly tables, consulted in that order.
pub struct RouteTables {
    biweekly: RouteTable,
    weekly: RouteTable,
}

impl RouteTables {
    /// Bundle two tables.
    #[must_use]
    pub fn new(biweekly: RouteTable, weekly: RouteTable) -> Self {
        Self { biweekly, weekly }
    }

    /// Tables in lookup priority order.
    #[must_use]
    pub fn in_priority_order(&self) -> [(CycleKind, &RouteTable); 2] {
        [
            (CycleKind::Biweekly, &self.biweekly),
            (CycleKind::Weekly, &self.weekly),
        ]
    }

    /// The biweekly table.
    #[must_use]
    pub fn biweekly(&self) -> &RouteTable {
        &self.biweekly
    }

    /// The weekly table.
    #[must_use]
    pub fn weekly(&self) -> &RouteTable {
        &self.weekly
    }

    /// Table holding routes of the given kind.
    #[must_use]
    pub fn table(&self, kind: CycleKind) -> &RouteTable {
        match kind {
            CycleKind::Biweekly => &self.biweekly,
            CycleKind::Weekly => &self.weekly,
        }
    }

    /// Total entries across both tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.biweekly.len() + self.weekly.len()
    }

    /// Whether both tables are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.biweekly.is_empty() && self.weekly.is_empty()
    }

    /// New tables with each entry merged into the table matching its cadence.
    #[must_use]
    pub fn merged<I>(&self, entries: I) -> Self
    where
        I: IntoIterator<Item = RouteEntry>,
    {
        let (biweekly, weekly): (Vec<_>, Vec<_>) = entries
            .into_iter()
            .partition(|entry| entry.kind() == CycleKind::Biweekly);
        // A key moving cadence leaves its old table.
        let kept_biweekly = self.biweekly.without(&moved_keys(&weekly, &biweekly));
        let kept_weekly = self.weekly.without(&moved_keys(&biweekly, &weekly));
        Self {
            biweekly: kept_biweekly.merged(biweekly),
            weekly: kept_weekly.merged(weekly),
        }
    }

    /// The routing table the drivers work from when no sheet is loaded.
    #[must_use]
    pub fn builtin() -> Self {
        let biweekly = BUILTIN_BIWEEKLY
            .iter()
            .filter_map(|(key, parity, days)| {
                RouteEntry::biweekly(key, *parity, days.iter().copied()).ok()
            });
        let weekly = BUILTIN_WEEKLY
            .iter()
            .filter_map(|(key, days)| RouteEntry::weekly(key, days.iter().copied()).ok());
        Self::new(
            RouteTable::from_entries(biweekly),
            RouteTable::from_entries(weekly),
        )
    }
}

fn moved_keys<'a>(incoming: &'a [RouteEntry], staying: &[RouteEntry]) -> HashSet<&'a str> {
    incoming
        .iter()
        .map(RouteEntry::key)
        .filter(|key| staying.iter().all(|entry| entry.key() != *key))
        .collect()
}

const BUILTIN_BIWEEKLY: &[(&str, Parity, &[Weekday])] = &[
    ("getxo", Parity::WeekB, &[Weekday::Wed]),
    ("bermeo-mundaka", Parity::WeekA, &[Weekday::Tue]),
    ("gernika-lumo", Parity::WeekA, &[Weekday::Thu]),
    ("mungia", Parity::WeekB, &[Weekday::Mon]),
    ("durango-amorebieta", Parity::WeekB, &[Weekday::Thu]),
    ("lekeitio-ondarroa", Parity::WeekA, &[Weekday::Fri]),
    ("balmaseda-zalla", Parity::WeekB, &[Weekday::Tue]),
    ("laredo", Parity::WeekA, &[Weekday::Mon, Weekday::Wed]),
];

// Getxo shows up here too; the biweekly entry wins.
const BUILTIN_WEEKLY: &[(&str, &[Weekday])] = &[
    ("bilbao", &[Weekday::Mon, Weekday::Wed, Weekday::Fri]),
    ("barakaldo", &[Weekday::Tue, Weekday::Thu]),
    ("getxo", &[Weekday::Mon]),
    ("leioa-erandio", &[Weekday::Tue, Weekday::Thu]),
    ("basauri-galdakao", &[Weekday::Wed]),
    ("sestao-portugalete-santurtzi", &[Weekday::Mon, Weekday::Thu]),
    ("sopela-berango", &[Weekday::Fri]),
    ("derio-zamudio-lezama", &[Weekday::Wed]),
    ("etxebarri", &[Weekday::Tue]),
    ("donostia", &[Weekday::Thu]),
    ("vitoria-gasteiz", &[Weekday::Wed]),
];
