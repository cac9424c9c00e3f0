//! Next-delivery date calculation for weekly and biweekly routes.
//!
//! Both strategies are pure functions of the route and the current local
//! date/time. They return `None` only when the result would fall outside
//! chrono's representable calendar.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Timelike, Weekday};

use crate::route::{Cadence, Parity, RouteEntry};

/// Monday starting a `WeekB` week; parity is counted in whole weeks from here.
pub const REFERENCE_ANCHOR: NaiveDate = match NaiveDate::from_ymd_opt(2025, 1, 6) {
    Some(date) => date,
    None => panic!("reference anchor is not a valid date"),
};

/// Orders placed before this hour still catch a same-day weekly delivery.
pub const SAME_DAY_CUTOFF_HOUR: u32 = 10;

/// Monday of the week containing `date`.
#[must_use]
pub fn week_monday(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(
        date.weekday().num_days_from_monday(),
    )))
}

/// Which half of the biweekly cycle the week containing `date` belongs to.
#[must_use]
pub fn current_parity(date: NaiveDate) -> Parity {
    let monday = week_monday(date).unwrap_or(date);
    let weeks = (monday - REFERENCE_ANCHOR).num_days().div_euclid(7);
    if weeks.rem_euclid(2) == 0 {
        Parity::WeekB
    } else {
        Parity::WeekA
    }
}

/// Next delivery of a weekly route.
///
/// A delivery day later this week wins; today counts only before the
/// same-day cutoff. Otherwise the first delivery day of next week.
#[must_use]
pub fn next_weekly(weekdays: &[Weekday], now: NaiveDateTime) -> Option<NaiveDate> {
    let first = weekdays.first()?.num_days_from_monday();
    let today = now.weekday().num_days_from_monday();
    let before_cutoff = now.hour() < SAME_DAY_CUTOFF_HOUR;

    let days_ahead = weekdays
        .iter()
        .map(Weekday::num_days_from_monday)
        .find(|day| *day > today || (*day == today && before_cutoff))
        .map_or(7 - today + first, |day| day - today);

    now.date().checked_add_days(Days::new(u64::from(days_ahead)))
}

/// Next delivery of a biweekly route firing on `weekday` of `parity` weeks.
///
/// The time of day is not consulted: a route due today is delivered today.
#[must_use]
pub fn next_biweekly(parity: Parity, weekday: Weekday, today: NaiveDate) -> Option<NaiveDate> {
    let monday = week_monday(today)?;
    let offset = weekday.num_days_from_monday();

    let weeks_ahead = if parity != current_parity(today) {
        1
    } else if today.weekday().num_days_from_monday() <= offset {
        0
    } else {
        2
    };

    monday.checked_add_days(Days::new(u64::from(weeks_ahead * 7 + offset)))
}

/// Next delivery date for `entry`, dispatching on its cadence.
///
/// Biweekly routes only use their earliest weekday.
#[must_use]
pub fn next_delivery(entry: &RouteEntry, now: NaiveDateTime) -> Option<NaiveDate> {
    match entry.cadence() {
        Cadence::Weekly => next_weekly(entry.weekdays(), now),
        Cadence::Biweekly(parity) => next_biweekly(parity, entry.first_weekday(), now.date()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveTime};

    use super::*;

    fn at(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
        date.and_time(NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time"))
    }

    fn day(offset: i64) -> NaiveDate {
        REFERENCE_ANCHOR + Duration::days(offset)
    }

    #[test]
    fn anchor_is_a_week_b_monday() {
        assert_eq!(REFERENCE_ANCHOR.weekday(), Weekday::Mon);
        assert_eq!(current_parity(REFERENCE_ANCHOR), Parity::WeekB);
        assert_eq!(current_parity(day(-7)), Parity::WeekA);
        assert_eq!(current_parity(day(7)), Parity::WeekA);
        assert_eq!(current_parity(day(14)), Parity::WeekB);
    }

    #[test]
    fn parity_holds_for_the_whole_week() {
        for offset in 0..7 {
            assert_eq!(current_parity(day(offset)), Parity::WeekB, "offset {offset}");
            assert_eq!(current_parity(day(offset - 7)), Parity::WeekA, "offset {offset}");
        }
    }

    #[test]
    fn parity_before_the_anchor_uses_floor_division() {
        // Sunday right before the anchor belongs to the previous (WeekA) week.
        assert_eq!(current_parity(day(-1)), Parity::WeekA);
        assert_eq!(current_parity(day(-14)), Parity::WeekB);
        assert_eq!(current_parity(day(-365 * 3)), current_parity(day(-365 * 3 + 14)));
    }

    #[test]
    fn weekly_cutoff_boundary() {
        let wednesday = day(2);
        assert_eq!(
            next_weekly(&[Weekday::Wed], at(wednesday, 9, 59)),
            Some(wednesday)
        );
        assert_eq!(
            next_weekly(&[Weekday::Wed], at(wednesday, 10, 0)),
            Some(day(9))
        );
    }

    #[test]
    fn weekly_picks_next_day_in_week() {
        let days = [Weekday::Mon, Weekday::Wed, Weekday::Fri];
        // Tuesday afternoon -> Wednesday
        assert_eq!(next_weekly(&days, at(day(1), 15, 0)), Some(day(2)));
        // Wednesday after cutoff -> Friday
        assert_eq!(next_weekly(&days, at(day(2), 11, 30)), Some(day(4)));
        // Friday after cutoff -> next Monday
        assert_eq!(next_weekly(&days, at(day(4), 18, 0)), Some(day(7)));
    }

    #[test]
    fn weekly_weekend_wraps_to_next_week() {
        let days = [Weekday::Tue, Weekday::Thu];
        assert_eq!(next_weekly(&days, at(day(5), 8, 0)), Some(day(8)));
        assert_eq!(next_weekly(&days, at(day(6), 23, 0)), Some(day(8)));
        assert_eq!(next_weekly(&[], at(day(6), 23, 0)), None);
    }

    #[test]
    fn weekly_result_is_a_delivery_day_and_never_in_the_past() {
        let schedules: [&[Weekday]; 4] = [
            &[Weekday::Mon],
            &[Weekday::Wed],
            &[Weekday::Tue, Weekday::Thu],
            &[Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri],
        ];
        for days in schedules {
            for offset in -20..20 {
                for hour in [0, 9, 10, 23] {
                    let now = at(day(offset), hour, 0);
                    let next = next_weekly(days, now).expect("in range");
                    assert!(days.contains(&next.weekday()), "{days:?} at {now}");
                    assert!(next >= now.date(), "{days:?} at {now}");
                    assert!(next - now.date() <= Duration::days(7), "{days:?} at {now}");
                }
            }
        }
    }

    #[test]
    fn biweekly_matches_worked_examples() {
        // WeekB route on Wednesdays, asked on the anchor Monday.
        assert_eq!(
            next_biweekly(Parity::WeekB, Weekday::Wed, REFERENCE_ANCHOR),
            Some(day(2))
        );
        // Same week, Thursday: this week's run is gone, next one is two weeks out.
        assert_eq!(
            next_biweekly(Parity::WeekB, Weekday::Wed, day(3)),
            Some(day(16))
        );
        // Delivery day itself counts.
        assert_eq!(
            next_biweekly(Parity::WeekB, Weekday::Wed, day(2)),
            Some(day(2))
        );
    }

    #[test]
    fn biweekly_off_week_goes_to_next_week() {
        assert_eq!(
            next_biweekly(Parity::WeekA, Weekday::Wed, REFERENCE_ANCHOR),
            Some(day(9))
        );
        assert_eq!(
            next_biweekly(Parity::WeekA, Weekday::Mon, day(6)),
            Some(day(7))
        );
    }

    #[test]
    fn biweekly_is_stable_over_a_full_cycle() {
        for parity in [Parity::WeekA, Parity::WeekB] {
            for weekday in [Weekday::Mon, Weekday::Wed, Weekday::Fri] {
                for offset in -30..30 {
                    let today = day(offset);
                    let next = next_biweekly(parity, weekday, today).expect("in range");
                    assert_eq!(next_biweekly(parity, weekday, today), Some(next));
                    assert_eq!(next.weekday(), weekday);
                    assert_eq!(current_parity(next), parity);
                    assert!(next >= today);
                    assert!(next - today < Duration::days(14));

                    let cycle_later = next + Duration::days(14);
                    assert_eq!(
                        next_biweekly(parity, weekday, cycle_later),
                        Some(cycle_later)
                    );
                }
            }
        }
    }

    #[test]
    fn next_delivery_uses_first_weekday_for_biweekly() {
        let entry = RouteEntry::biweekly("laredo", Parity::WeekA, [Weekday::Wed, Weekday::Mon])
            .expect("valid entry");
        // WeekA week starts at day(7); Tuesday is past Monday so the next run is two weeks out.
        assert_eq!(next_delivery(&entry, at(day(8), 8, 0)), Some(day(21)));
    }
}
