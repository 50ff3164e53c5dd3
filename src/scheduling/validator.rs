//! Availability validation.
//!
//! Pure checks over a candidate availability window. The repository
//! layer fetches the shift configuration, the directory rows and the
//! professor's existing records, calls [`validate`] inside its write
//! transaction, and persists only on success. Checks run in a fixed
//! order and stop at the first failure, so identical bad input always
//! produces the same error.

use sqlx::types::Uuid;

use crate::db::models::{
    AvailabilityRecord, DirectoryUser, ShiftConfiguration, TeachingPeriod, UserRole, Weekday,
};

use super::error::ScheduleError;
use super::slots::{compute_day_slots, describe_slot_boundaries, ShiftSlots};
use super::time::TimeOfDay;

/// A candidate availability window, already resolved to the professor it
/// targets (self-service callers are pinned to their own id before this
/// point).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityCandidate {
    pub professor_id: Uuid,
    pub period_id: Uuid,
    pub day_of_week: Weekday,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

/// Validates `candidate` against the window invariants:
///
/// 1. `end > start`
/// 2. the teaching period exists and is active
/// 3. the targeted user exists and is a professor
/// 4. `[start, end)` exactly covers a contiguous slot run of one shift
/// 5. no stored window for the same professor/period/day overlaps
///
/// `exclude_id` skips the record being updated in the conflict scan.
pub fn validate(
    candidate: &AvailabilityCandidate,
    period: Option<&TeachingPeriod>,
    professor: Option<&DirectoryUser>,
    config: Option<&ShiftConfiguration>,
    existing: &[AvailabilityRecord],
    exclude_id: Option<Uuid>,
) -> Result<(), ScheduleError> {
    if candidate.end_time <= candidate.start_time {
        return Err(ScheduleError::InvalidRange);
    }

    let period = period.ok_or_else(|| ScheduleError::NotFound("teaching period".to_string()))?;
    if !period.is_active() {
        return Err(ScheduleError::InactivePeriod(period.label()));
    }

    let professor =
        professor.ok_or_else(|| ScheduleError::NotFound("professor".to_string()))?;
    if professor.role != UserRole::Professor {
        return Err(ScheduleError::RoleMismatch(professor.name.clone()));
    }

    let config = config.ok_or_else(|| {
        ScheduleError::Configuration("no shift configuration has been set".to_string())
    })?;
    let day_slots = compute_day_slots(config)?;
    if !window_is_slot_aligned(&day_slots, candidate.start_time, candidate.end_time) {
        return Err(ScheduleError::SlotMisalignment {
            boundaries: describe_slot_boundaries(&day_slots),
        });
    }

    if let Some(conflicting) = find_conflicting(candidate, existing, exclude_id) {
        return Err(ScheduleError::ScheduleConflict {
            day: conflicting.day_of_week.to_string(),
            start: conflicting.start_time.to_string(),
            end: conflicting.end_time.to_string(),
        });
    }

    Ok(())
}

/// Whether `[start, end)` is exactly one slot or a maximal contiguous
/// run of slots within a single shift. Slots of one shift are contiguous
/// by construction, so it suffices to find a slot starting at `start`
/// and walk forward until one ends at `end`.
fn window_is_slot_aligned(day_slots: &[ShiftSlots], start: TimeOfDay, end: TimeOfDay) -> bool {
    for shift in day_slots {
        let Some(first) = shift.slots.iter().position(|slot| slot.start == start) else {
            continue;
        };
        for slot in &shift.slots[first..] {
            if slot.end == end {
                return true;
            }
            if slot.end > end {
                break;
            }
        }
    }
    false
}

/// Scans stored records for an overlap with the candidate window under
/// open-interval semantics: touching endpoints do not conflict. The
/// three intersection shapes are checked explicitly.
fn find_conflicting<'a>(
    candidate: &AvailabilityCandidate,
    existing: &'a [AvailabilityRecord],
    exclude_id: Option<Uuid>,
) -> Option<&'a AvailabilityRecord> {
    existing
        .iter()
        .filter(|record| Some(record.id) != exclude_id)
        .filter(|record| {
            record.professor_id == candidate.professor_id
                && record.period_id == candidate.period_id
                && record.day_of_week == candidate.day_of_week
        })
        .find(|record| {
            windows_intersect(
                record.start_time,
                record.end_time,
                candidate.start_time,
                candidate.end_time,
            )
        })
}

fn windows_intersect(
    existing_start: TimeOfDay,
    existing_end: TimeOfDay,
    start: TimeOfDay,
    end: TimeOfDay,
) -> bool {
    // New window starts inside an existing one.
    let starts_inside = existing_start <= start && existing_end > start;
    // New window ends inside an existing one.
    let ends_inside = existing_start < end && existing_end >= end;
    // New window fully contains an existing one.
    let contains = existing_start >= start && existing_end <= end;

    starts_inside || ends_inside || contains
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{AvailabilityStatus, PeriodStatus};
    use time::OffsetDateTime;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn config() -> ShiftConfiguration {
        let now = OffsetDateTime::now_utc();
        ShiftConfiguration {
            id: Uuid::now_v7(),
            lesson_duration_minutes: 50,
            lessons_per_shift: 2,
            morning_start: t("07:30"),
            afternoon_start: t("13:30"),
            evening_start: t("19:00"),
            created_at: now,
            updated_at: now,
        }
    }

    fn period(status: PeriodStatus) -> TeachingPeriod {
        let now = OffsetDateTime::now_utc();
        TeachingPeriod {
            id: Uuid::now_v7(),
            year: 2025,
            semester: 1,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    fn user(role: UserRole) -> DirectoryUser {
        let now = OffsetDateTime::now_utc();
        DirectoryUser {
            id: Uuid::now_v7(),
            name: "Ana Lima".to_string(),
            email: "ana.lima@example.edu".to_string(),
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn candidate(
        professor: &DirectoryUser,
        period: &TeachingPeriod,
        day: Weekday,
        start: &str,
        end: &str,
    ) -> AvailabilityCandidate {
        AvailabilityCandidate {
            professor_id: professor.id,
            period_id: period.id,
            day_of_week: day,
            start_time: t(start),
            end_time: t(end),
        }
    }

    fn record(c: &AvailabilityCandidate, start: &str, end: &str) -> AvailabilityRecord {
        let now = OffsetDateTime::now_utc();
        AvailabilityRecord {
            id: Uuid::now_v7(),
            professor_id: c.professor_id,
            period_id: c.period_id,
            day_of_week: c.day_of_week,
            start_time: t(start),
            end_time: t(end),
            status: AvailabilityStatus::Available,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn accepts_a_single_slot_window() {
        let (cfg, p, prof) = (config(), period(PeriodStatus::Active), user(UserRole::Professor));
        let c = candidate(&prof, &p, Weekday::Monday, "07:30", "08:20");
        assert_eq!(validate(&c, Some(&p), Some(&prof), Some(&cfg), &[], None), Ok(()));
    }

    #[test]
    fn accepts_a_contiguous_slot_run() {
        let (cfg, p, prof) = (config(), period(PeriodStatus::Active), user(UserRole::Professor));
        let c = candidate(&prof, &p, Weekday::Monday, "07:30", "09:10");
        assert_eq!(validate(&c, Some(&p), Some(&prof), Some(&cfg), &[], None), Ok(()));
    }

    #[test]
    fn every_computed_slot_validates() {
        let (cfg, p, prof) = (config(), period(PeriodStatus::Active), user(UserRole::Professor));
        for shift in compute_day_slots(&cfg).unwrap() {
            for slot in shift.slots {
                let c = AvailabilityCandidate {
                    professor_id: prof.id,
                    period_id: p.id,
                    day_of_week: Weekday::Wednesday,
                    start_time: slot.start,
                    end_time: slot.end,
                };
                assert_eq!(
                    validate(&c, Some(&p), Some(&prof), Some(&cfg), &[], None),
                    Ok(())
                );
            }
        }
    }

    #[test]
    fn rejects_inverted_or_empty_ranges() {
        let (cfg, p, prof) = (config(), period(PeriodStatus::Active), user(UserRole::Professor));
        let inverted = candidate(&prof, &p, Weekday::Monday, "09:10", "07:30");
        assert_eq!(
            validate(&inverted, Some(&p), Some(&prof), Some(&cfg), &[], None),
            Err(ScheduleError::InvalidRange)
        );
        let empty = candidate(&prof, &p, Weekday::Monday, "07:30", "07:30");
        assert_eq!(
            validate(&empty, Some(&p), Some(&prof), Some(&cfg), &[], None),
            Err(ScheduleError::InvalidRange)
        );
    }

    #[test]
    fn rejects_missing_or_inactive_period() {
        let (cfg, prof) = (config(), user(UserRole::Professor));
        let p = period(PeriodStatus::Inactive);
        let c = candidate(&prof, &p, Weekday::Monday, "07:30", "08:20");
        assert_eq!(
            validate(&c, None, Some(&prof), Some(&cfg), &[], None),
            Err(ScheduleError::NotFound("teaching period".to_string()))
        );
        assert_eq!(
            validate(&c, Some(&p), Some(&prof), Some(&cfg), &[], None),
            Err(ScheduleError::InactivePeriod("2025/1".to_string()))
        );
    }

    #[test]
    fn rejects_missing_or_non_professor_user() {
        let (cfg, p) = (config(), period(PeriodStatus::Active));
        let coordinator = user(UserRole::Coordinator);
        let c = candidate(&coordinator, &p, Weekday::Monday, "07:30", "08:20");
        assert_eq!(
            validate(&c, Some(&p), None, Some(&cfg), &[], None),
            Err(ScheduleError::NotFound("professor".to_string()))
        );
        assert_eq!(
            validate(&c, Some(&p), Some(&coordinator), Some(&cfg), &[], None),
            Err(ScheduleError::RoleMismatch("Ana Lima".to_string()))
        );
    }

    #[test]
    fn rejects_window_starting_mid_slot() {
        let (cfg, p, prof) = (config(), period(PeriodStatus::Active), user(UserRole::Professor));
        let c = candidate(&prof, &p, Weekday::Monday, "07:45", "08:30");
        match validate(&c, Some(&p), Some(&prof), Some(&cfg), &[], None) {
            Err(ScheduleError::SlotMisalignment { boundaries }) => {
                assert!(boundaries.contains("07:30-08:20"));
                assert!(boundaries.contains("19:50-20:40"));
            }
            other => panic!("expected SlotMisalignment, got {other:?}"),
        }
    }

    #[test]
    fn rejects_window_ending_mid_slot_or_spanning_shifts() {
        let (cfg, p, prof) = (config(), period(PeriodStatus::Active), user(UserRole::Professor));
        // Starts on a boundary but ends inside the second slot.
        let partial = candidate(&prof, &p, Weekday::Monday, "07:30", "08:40");
        assert!(matches!(
            validate(&partial, Some(&p), Some(&prof), Some(&cfg), &[], None),
            Err(ScheduleError::SlotMisalignment { .. })
        ));
        // Morning start through afternoon end crosses the midday gap.
        let spanning = candidate(&prof, &p, Weekday::Monday, "07:30", "14:20");
        assert!(matches!(
            validate(&spanning, Some(&p), Some(&prof), Some(&cfg), &[], None),
            Err(ScheduleError::SlotMisalignment { .. })
        ));
    }

    #[test]
    fn rejects_when_configuration_is_missing() {
        let (p, prof) = (period(PeriodStatus::Active), user(UserRole::Professor));
        let c = candidate(&prof, &p, Weekday::Monday, "07:30", "08:20");
        assert!(matches!(
            validate(&c, Some(&p), Some(&prof), None, &[], None),
            Err(ScheduleError::Configuration(_))
        ));
    }

    #[test]
    fn detects_overlap_with_existing_window() {
        let (cfg, p, prof) = (config(), period(PeriodStatus::Active), user(UserRole::Professor));
        let c = candidate(&prof, &p, Weekday::Monday, "08:20", "09:10");
        let stored = record(&c, "07:30", "08:20");

        // 08:00-09:00 is not slot aligned, so exercise the overlap check
        // directly with the three shapes against 07:30-08:20.
        assert!(windows_intersect(t("07:30"), t("08:20"), t("08:00"), t("09:00")));
        assert!(windows_intersect(t("07:30"), t("08:20"), t("07:00"), t("07:45")));
        assert!(windows_intersect(t("07:30"), t("08:20"), t("07:00"), t("09:00")));

        // Touching windows pass full validation.
        assert_eq!(
            validate(&c, Some(&p), Some(&prof), Some(&cfg), &[stored], None),
            Ok(())
        );
    }

    #[test]
    fn conflict_error_names_the_stored_window() {
        let (cfg, p, prof) = (config(), period(PeriodStatus::Active), user(UserRole::Professor));
        let c = candidate(&prof, &p, Weekday::Monday, "07:30", "09:10");
        let stored = record(&c, "08:20", "09:10");
        assert_eq!(
            validate(&c, Some(&p), Some(&prof), Some(&cfg), &[stored], None),
            Err(ScheduleError::ScheduleConflict {
                day: "monday".to_string(),
                start: "08:20".to_string(),
                end: "09:10".to_string(),
            })
        );
    }

    #[test]
    fn conflict_check_is_symmetric_and_ignores_touching() {
        let a = (t("07:30"), t("08:20"));
        let b = (t("08:00"), t("09:00"));
        assert_eq!(
            windows_intersect(a.0, a.1, b.0, b.1),
            windows_intersect(b.0, b.1, a.0, a.1)
        );

        let touching = (t("08:20"), t("09:10"));
        assert!(!windows_intersect(a.0, a.1, touching.0, touching.1));
        assert!(!windows_intersect(touching.0, touching.1, a.0, a.1));
    }

    #[test]
    fn other_days_and_excluded_records_do_not_conflict() {
        let (cfg, p, prof) = (config(), period(PeriodStatus::Active), user(UserRole::Professor));
        let c = candidate(&prof, &p, Weekday::Monday, "07:30", "08:20");

        let mut other_day = record(&c, "07:30", "08:20");
        other_day.day_of_week = Weekday::Tuesday;
        assert_eq!(
            validate(&c, Some(&p), Some(&prof), Some(&cfg), &[other_day], None),
            Ok(())
        );

        // Updating a record in place must not conflict with itself.
        let own = record(&c, "07:30", "08:20");
        let own_id = own.id;
        assert_eq!(
            validate(&c, Some(&p), Some(&prof), Some(&cfg), &[own], Some(own_id)),
            Ok(())
        );
    }

    #[test]
    fn checks_fail_in_declared_order() {
        let cfg = config();
        let p = period(PeriodStatus::Inactive);
        let prof = user(UserRole::Coordinator);
        // Inverted range plus inactive period plus wrong role: the range
        // check wins.
        let c = candidate(&prof, &p, Weekday::Monday, "09:00", "08:00");
        assert_eq!(
            validate(&c, Some(&p), Some(&prof), Some(&cfg), &[], None),
            Err(ScheduleError::InvalidRange)
        );
        // Fix the range: the period check wins over the role check.
        let c = candidate(&prof, &p, Weekday::Monday, "07:30", "08:20");
        assert_eq!(
            validate(&c, Some(&p), Some(&prof), Some(&cfg), &[], None),
            Err(ScheduleError::InactivePeriod("2025/1".to_string()))
        );
    }
}
