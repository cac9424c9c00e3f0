//! Fuzzy resolution of a free-text city to a route entry.

use serde::Serialize;

use crate::route::{CycleKind, RouteEntry, RouteTable, RouteTables, normalize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
/// Which heuristic matched the input.
pub enum MatchKind {
    /// The key contains the input or the input contains the key.
    Substring,
    /// A key token appears in the input or an input word appears in the key.
    TokenOverlap,
}

#[derive(Debug, Clone, Copy)]
/// A resolved route together with where it came from.
pub struct Resolution<'a> {
    /// Matched entry.
    pub entry: &'a RouteEntry,
    /// Table the entry was found in.
    pub table: CycleKind,
    /// Heuristic that produced the match.
    pub matched_by: MatchKind,
}

/// Resolves city text against route tables.
///
/// Order is part of the contract: substring then token overlap against the
/// biweekly table, then the same two passes against the weekly table. Within
/// a pass the first entry in insertion order wins.
pub struct CityResolver<'a> {
    tables: &'a RouteTables,
}

impl<'a> CityResolver<'a> {
    /// Resolver over the given tables.
    #[must_use]
    pub fn new(tables: &'a RouteTables) -> Self {
        Self { tables }
    }

    /// Resolve `city`; `None` means the locality is not on any route.
    #[must_use]
    pub fn resolve(&self, city: &str) -> Option<Resolution<'a>> {
        let input = normalize(city);
        if input.is_empty() {
            return None;
        }
        let words: Vec<&str> = input.split_whitespace().collect();

        self.tables
            .in_priority_order()
            .into_iter()
            .find_map(|(kind, table)| {
                substring_match(table, &input)
                    .map(|entry| (entry, MatchKind::Substring))
                    .or_else(|| {
                        token_match(table, &input, &words)
                            .map(|entry| (entry, MatchKind::TokenOverlap))
                    })
                    .map(|(entry, matched_by)| Resolution {
                        entry,
                        table: kind,
                        matched_by,
                    })
            })
    }
}

fn substring_match<'t>(table: &'t RouteTable, input: &str) -> Option<&'t RouteEntry> {
    table
        .iter()
        .find(|entry| input.contains(entry.key()) || entry.key().contains(input))
}

fn token_match<'t>(table: &'t RouteTable, input: &str, words: &[&str]) -> Option<&'t RouteEntry> {
    table.iter().find(|entry| {
        let key = entry.key();
        key.split('-')
            .filter(|token| !token.is_empty())
            .any(|token| input.contains(token))
            || words.iter().any(|word| key.contains(word))
    })
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;

    use super::*;
    use crate::route::Parity;

    fn resolve_key(tables: &RouteTables, city: &str) -> Option<(String, CycleKind, MatchKind)> {
        CityResolver::new(tables)
            .resolve(city)
            .map(|found| (found.entry.key().to_owned(), found.table, found.matched_by))
    }

    #[test]
    fn biweekly_beats_weekly() {
        let tables = RouteTables::builtin();
        let (key, table, matched_by) = resolve_key(&tables, "Getxo").expect("known city");
        assert_eq!(key, "getxo");
        assert_eq!(table, CycleKind::Biweekly);
        assert_eq!(matched_by, MatchKind::Substring);
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        let tables = RouteTables::builtin();
        assert_eq!(
            resolve_key(&tables, "   BILBAO  ").map(|found| found.0),
            Some("bilbao".to_owned())
        );
    }

    #[test]
    fn substring_in_both_directions() {
        let tables = RouteTables::builtin();
        // key inside input
        assert_eq!(
            resolve_key(&tables, "Las Arenas, Getxo (Bizkaia)").map(|found| found.0),
            Some("getxo".to_owned())
        );
        // input inside key
        assert_eq!(
            resolve_key(&tables, "Santurtzi").map(|found| (found.0, found.2)),
            Some((
                "sestao-portugalete-santurtzi".to_owned(),
                MatchKind::Substring
            ))
        );
    }

    #[test]
    fn token_overlap_on_grouped_keys() {
        let tables = RouteTables::builtin();
        assert_eq!(
            resolve_key(&tables, "Leioa, Bizkaia"),
            Some((
                "leioa-erandio".to_owned(),
                CycleKind::Weekly,
                MatchKind::TokenOverlap
            ))
        );
        assert_eq!(
            resolve_key(&tables, "Amorebieta Etxano").map(|found| (found.0, found.1)),
            Some(("durango-amorebieta".to_owned(), CycleKind::Biweekly))
        );
    }

    #[test]
    fn unknown_or_blank_input_is_not_found() {
        let tables = RouteTables::builtin();
        for city in ["", "   ", "Madrid", "Zaragoza", "Sevilla"] {
            assert!(resolve_key(&tables, city).is_none(), "{city:?}");
        }
    }

    #[test]
    fn first_entry_in_insertion_order_wins() {
        let tables = RouteTables::default().merged([
            RouteEntry::weekly("bilbao-norte", [Weekday::Mon]).expect("valid"),
            RouteEntry::weekly("bilbao-sur", [Weekday::Tue]).expect("valid"),
        ]);
        for _ in 0..10 {
            assert_eq!(
                resolve_key(&tables, "bilbao").map(|found| found.0),
                Some("bilbao-norte".to_owned())
            );
        }
    }

    #[test]
    fn punctuation_stays_part_of_input_words() {
        let tables = RouteTables::builtin();
        // "getx.)" is not inside "getxo", so the weekly substring pass decides
        assert_eq!(
            resolve_key(&tables, "Bilbao (cerca de Getx.)"),
            Some((
                "bilbao".to_owned(),
                CycleKind::Weekly,
                MatchKind::Substring
            ))
        );
        assert!(resolve_key(&tables, "teiz,").is_none());
        assert!(resolve_key(&tables, "Gasteiz,").is_some());
    }

    #[test]
    fn weekly_substring_does_not_beat_biweekly_token_overlap() {
        let tables = RouteTables::default().merged([
            RouteEntry::biweekly("uribe-kosta", Parity::WeekA, [Weekday::Fri]).expect("valid"),
            RouteEntry::weekly("kosta uribe", [Weekday::Mon]).expect("valid"),
        ]);
        let (key, table, matched_by) = resolve_key(&tables, "kosta uribe").expect("match");
        assert_eq!(key, "uribe-kosta");
        assert_eq!(table, CycleKind::Biweekly);
        assert_eq!(matched_by, MatchKind::TokenOverlap);
    }
}
