//! The scheduling core: clock-time values, slot computation from the
//! shift configuration, availability validation, and the authorization
//! policy. Everything in here is pure; persistence lives in `db`.

mod error;
pub mod policy;
pub mod slots;
mod time;
pub mod validator;

pub use self::error::ScheduleError;
pub use self::policy::{authorize, resolve_target_professor, Action, AuthContext};
pub use self::slots::{compute_day_slots, compute_shift_slots, Shift, ShiftSlots, Slot};
pub use self::time::TimeOfDay;
pub use self::validator::{validate, AvailabilityCandidate};
