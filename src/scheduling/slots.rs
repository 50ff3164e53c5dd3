//! Slot computation.
//!
//! Expands the institution-wide shift configuration into the discrete
//! lesson slots a professor can declare availability for. Slot
//! boundaries depend only on the configuration, never on the weekday:
//! the same three shift sequences apply to every teaching day.

use serde::Serialize;

use crate::db::models::ShiftConfiguration;

use super::error::ScheduleError;
use super::time::TimeOfDay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    Morning,
    Afternoon,
    Evening,
}

impl Shift {
    pub const ALL: [Shift; 3] = [Shift::Morning, Shift::Afternoon, Shift::Evening];
}

/// One bookable lesson window, half-open `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl Slot {
    pub fn duration_minutes(&self) -> i32 {
        self.start.minutes_until(self.end)
    }
}

/// The computed slot sequence of one shift, plus the shift's end time
/// (the end of its last slot).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftSlots {
    pub shift: Shift,
    pub slots: Vec<Slot>,
    pub end: TimeOfDay,
}

/// Expands one shift of `config` into `lessons_per_shift` contiguous
/// slots of `lesson_duration_minutes` each, starting at the shift's
/// configured start time.
pub fn compute_shift_slots(
    config: &ShiftConfiguration,
    shift: Shift,
) -> Result<ShiftSlots, ScheduleError> {
    if config.lesson_duration_minutes <= 0 {
        return Err(ScheduleError::Configuration(format!(
            "lesson duration must be positive, got {}",
            config.lesson_duration_minutes
        )));
    }
    if config.lessons_per_shift <= 0 {
        return Err(ScheduleError::Configuration(format!(
            "lessons per shift must be positive, got {}",
            config.lessons_per_shift
        )));
    }

    let start = match shift {
        Shift::Morning => config.morning_start,
        Shift::Afternoon => config.afternoon_start,
        Shift::Evening => config.evening_start,
    };

    let mut slots = Vec::with_capacity(config.lessons_per_shift as usize);
    let mut cursor = start;
    for _ in 0..config.lessons_per_shift {
        let end = cursor
            .add_minutes(config.lesson_duration_minutes)
            .ok_or_else(|| {
                ScheduleError::Configuration(format!(
                    "slots starting at {start} run past midnight"
                ))
            })?;
        slots.push(Slot { start: cursor, end });
        cursor = end;
    }

    Ok(ShiftSlots {
        shift,
        slots,
        end: cursor,
    })
}

/// All three shifts in Morning, Afternoon, Evening order.
pub fn compute_day_slots(config: &ShiftConfiguration) -> Result<Vec<ShiftSlots>, ScheduleError> {
    Shift::ALL
        .into_iter()
        .map(|shift| compute_shift_slots(config, shift))
        .collect()
}

/// Formats every slot of every shift as `start-end` pairs, used by the
/// misalignment error message to point the caller at valid windows.
pub fn describe_slot_boundaries(day_slots: &[ShiftSlots]) -> String {
    day_slots
        .iter()
        .flat_map(|shift| shift.slots.iter())
        .map(|slot| format!("{}-{}", slot.start, slot.end))
        .collect::<Vec<_>>()
        .join(", ")
}
