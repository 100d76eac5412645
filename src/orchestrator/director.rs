//! Notification decisions
//!
//! Pure functions mapping (last count, current count, flags, session) to one
//! action per category. Rules are tried top to bottom and the first match
//! wins; later rules assume every earlier one failed.

use crate::models::NotificationAction;

/// Inputs shared by both categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionInputs {
    pub last: u32,
    pub current: u32,
    pub always_notify: bool,
    pub session_active: bool,
}

/// Regular-category outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub action: NotificationAction,
    /// Target state of the logout trigger marker
    pub marker_present: bool,
    /// Wait out the grace interval before dispatching `action`
    pub grace_delay: bool,
}

impl Decision {
    fn notify(clear_prior: bool, marker_present: bool) -> Self {
        Self {
            action: NotificationAction::NotifyPending { clear_prior },
            marker_present,
            grace_delay: clear_prior,
        }
    }

    fn quiet(marker_present: bool) -> Self {
        Self {
            action: NotificationAction::None,
            marker_present,
            grace_delay: false,
        }
    }
}

/// Decide the regular-category action and marker state.
///
/// The marker target depends only on the counts; `session_active` only
/// affects whether the always-notify reminder fires.
pub fn decide_regular(inputs: DecisionInputs) -> Decision {
    let DecisionInputs {
        last,
        current,
        always_notify,
        session_active,
    } = inputs;

    if current > last {
        return Decision::notify(false, true);
    }
    if current == 0 && last > 0 {
        return Decision::notify(true, false);
    }
    if current == 0 {
        return Decision::quiet(false);
    }
    if session_active && always_notify {
        return Decision::notify(false, true);
    }
    // Still pending with nothing new to say; logout install must still fire
    Decision::quiet(true)
}

/// Decide the OS-update action. Never touches the marker.
///
/// Only evaluated when the notifier integration is enabled and someone is
/// logged in at the console; otherwise the answer is always `None`.
pub fn decide_os_updates(inputs: DecisionInputs, notifier_enabled: bool) -> NotificationAction {
    let DecisionInputs {
        last,
        current,
        always_notify,
        session_active,
    } = inputs;

    if !notifier_enabled || !session_active {
        return NotificationAction::None;
    }

    if current == 0 && last > 0 {
        NotificationAction::NotifyOsUpdatesPending { clear_prior: true }
    } else if current > last {
        NotificationAction::NotifyOsUpdatesPending { clear_prior: false }
    } else if current > 0 && always_notify {
        NotificationAction::NotifyOsUpdatesPending { clear_prior: false }
    } else {
        NotificationAction::None
    }
}
