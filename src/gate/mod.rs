use uuid::Uuid;

use crate::store::Task;

/// Capability level carried by a requester. `Admin` is the elevated
/// "manage-any" capability; ordinary users only ever touch their own tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    User,
    Admin,
}

impl Access {
    pub fn as_str(&self) -> &'static str {
        match self {
            Access::User => "user",
            Access::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "admin" => Access::Admin,
            _ => Access::User,
        }
    }
}

/// The authenticated identity a decision is made for. Always passed
/// explicitly; there is no ambient "current user" anywhere in this crate.
#[derive(Debug, Clone, Copy)]
pub struct Requester {
    pub user_id: Uuid,
    pub access: Access,
}

/// Actions the gate can rule on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ListAll,
    ListOwn,
    Create,
    Read,
    Update,
    Delete,
}

/// Outcome of an authorization check.
///
/// `NotFound` and `Deny` are deliberately distinct: a missing id must never
/// be distinguishable from an id the requester simply cannot see, so the
/// existence check runs before any ownership comparison and callers map the
/// two outcomes to different status codes (404 vs 403).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
    NotFound,
}

/// Decide whether `requester` may perform `action` against `target`.
///
/// Pure function over its inputs: no I/O, no side effects, never fails.
/// `target` is `None` for actions that do not reference an existing task
/// (list/create) or when the lookup found nothing.
pub fn authorize(requester: &Requester, action: Action, target: Option<&Task>) -> Decision {
    match action {
        // Viewing every user's tasks requires the elevated capability.
        Action::ListAll => match requester.access {
            Access::Admin => Decision::Allow,
            Access::User => Decision::Deny,
        },

        // Any authenticated requester may list their own tasks or create a
        // new one; owner filtering (and owner assignment) is the store's job.
        Action::ListOwn | Action::Create => Decision::Allow,

        Action::Read | Action::Update | Action::Delete => {
            let task = match target {
                Some(task) => task,
                None => return Decision::NotFound,
            };

            if task.owner_id == requester.user_id || requester.access == Access::Admin {
                Decision::Allow
            } else {
                Decision::Deny
            }
        }
    }
}
