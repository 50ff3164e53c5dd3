//! Authorization policy.
//!
//! A single table of `(role, action, scope)` grants replaces scattered
//! per-endpoint role checks. Handlers resolve the target professor,
//! then ask [`authorize`] once.

use sqlx::types::Uuid;

use crate::db::models::UserRole;

use super::error::ScheduleError;

/// The authenticated caller, as resolved by the gateway-trusting
/// middleware.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub role: UserRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create, update or delete an availability record.
    SubmitAvailability,
    /// Read availability records scoped to a professor.
    ReadAvailability,
    /// Read availability across a whole teaching period.
    ReadPeriodAvailability,
    ReadShiftConfiguration,
    ManageShiftConfiguration,
    ListSlots,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Only when the target professor is the caller (or no specific
    /// professor is targeted).
    Own,
    Any,
}

const POLICY: &[(UserRole, Action, Scope)] = &[
    (UserRole::Professor, Action::SubmitAvailability, Scope::Own),
    (UserRole::Professor, Action::ReadAvailability, Scope::Own),
    (UserRole::Professor, Action::ListSlots, Scope::Any),
    (UserRole::Coordinator, Action::ReadAvailability, Scope::Any),
    (UserRole::Coordinator, Action::ReadPeriodAvailability, Scope::Any),
    (UserRole::Coordinator, Action::ListSlots, Scope::Any),
    (UserRole::Director, Action::SubmitAvailability, Scope::Any),
    (UserRole::Director, Action::ReadAvailability, Scope::Any),
    (UserRole::Director, Action::ReadPeriodAvailability, Scope::Any),
    (UserRole::Director, Action::ReadShiftConfiguration, Scope::Any),
    (UserRole::Director, Action::ManageShiftConfiguration, Scope::Any),
    (UserRole::Director, Action::ListSlots, Scope::Any),
    (UserRole::Admin, Action::SubmitAvailability, Scope::Any),
    (UserRole::Admin, Action::ReadAvailability, Scope::Any),
    (UserRole::Admin, Action::ReadPeriodAvailability, Scope::Any),
    (UserRole::Admin, Action::ReadShiftConfiguration, Scope::Any),
    (UserRole::Admin, Action::ManageShiftConfiguration, Scope::Any),
    (UserRole::Admin, Action::ListSlots, Scope::Any),
];

/// Checks the caller against the policy table. `target_professor` is the
/// professor whose data the action touches; `None` means the action is
/// not scoped to one professor.
pub fn authorize(
    ctx: &AuthContext,
    action: Action,
    target_professor: Option<Uuid>,
) -> Result<(), ScheduleError> {
    let allowed = POLICY
        .iter()
        .filter(|(role, granted, _)| *role == ctx.role && *granted == action)
        .any(|(_, _, scope)| match scope {
            Scope::Any => true,
            Scope::Own => target_professor.is_none_or(|target| target == ctx.user_id),
        });

    if allowed {
        Ok(())
    } else {
        Err(ScheduleError::Permission)
    }
}

/// The professor a submission applies to. Professors always act on
/// themselves, whatever id the payload carries; elevated roles may act
/// on the requested professor.
pub fn resolve_target_professor(ctx: &AuthContext, requested: Uuid) -> Uuid {
    if ctx.role == UserRole::Professor {
        ctx.user_id
    } else {
        requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(role: UserRole) -> AuthContext {
        AuthContext {
            user_id: Uuid::now_v7(),
            role,
        }
    }

    #[test]
    fn professor_submits_only_for_self() {
        let professor = ctx(UserRole::Professor);
        assert!(authorize(
            &professor,
            Action::SubmitAvailability,
            Some(professor.user_id)
        )
        .is_ok());
        assert_eq!(
            authorize(&professor, Action::SubmitAvailability, Some(Uuid::now_v7())),
            Err(ScheduleError::Permission)
        );
    }

    #[test]
    fn elevated_roles_submit_for_anyone() {
        for role in [UserRole::Director, UserRole::Admin] {
            assert!(authorize(&ctx(role), Action::SubmitAvailability, Some(Uuid::now_v7())).is_ok());
        }
    }

    #[test]
    fn coordinator_reads_but_never_writes() {
        let coordinator = ctx(UserRole::Coordinator);
        assert!(authorize(&coordinator, Action::ReadAvailability, Some(Uuid::now_v7())).is_ok());
        assert!(authorize(&coordinator, Action::ReadPeriodAvailability, None).is_ok());
        assert_eq!(
            authorize(&coordinator, Action::SubmitAvailability, Some(coordinator.user_id)),
            Err(ScheduleError::Permission)
        );
    }

    #[test]
    fn configuration_is_director_and_admin_only() {
        for role in [UserRole::Professor, UserRole::Coordinator] {
            assert_eq!(
                authorize(&ctx(role), Action::ManageShiftConfiguration, None),
                Err(ScheduleError::Permission)
            );
            assert_eq!(
                authorize(&ctx(role), Action::ReadShiftConfiguration, None),
                Err(ScheduleError::Permission)
            );
        }
        for role in [UserRole::Director, UserRole::Admin] {
            assert!(authorize(&ctx(role), Action::ManageShiftConfiguration, None).is_ok());
        }
    }

    #[test]
    fn every_role_may_list_slots() {
        for role in [
            UserRole::Professor,
            UserRole::Coordinator,
            UserRole::Director,
            UserRole::Admin,
        ] {
            assert!(authorize(&ctx(role), Action::ListSlots, None).is_ok());
        }
    }

    #[test]
    fn self_service_submissions_are_pinned_to_the_caller() {
        let professor = ctx(UserRole::Professor);
        let someone_else = Uuid::now_v7();
        assert_eq!(
            resolve_target_professor(&professor, someone_else),
            professor.user_id
        );

        let admin = ctx(UserRole::Admin);
        assert_eq!(resolve_target_professor(&admin, someone_else), someone_else);
    }
}
