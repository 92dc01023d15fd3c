//! # Permission & Role Evaluator
//!
//! Pure functions over an application and one of its topics. Nothing here
//! mutates state; the registry calls these and enforces the answer.
//!
//! | Access level | Read | Write |
//! |--------------|------|-------|
//! | `Public` | anyone | anyone |
//! | `PublicLimited` | anyone | application members |
//! | `Private` | grant >= Read or topic admin | grant >= Write or topic admin |

use super::entities::{Application, Topic};
use super::value_objects::{AccessLevel, PermissionLevel};
use shared_types::Address;

/// True iff `actor` is the topic owner, holds an explicit `Admin` grant, holds
/// the application `Admin` role, or owns the application.
#[must_use]
pub fn is_topic_admin(app: &Application, topic: &Topic, actor: &Address) -> bool {
    debug_assert_eq!(app.id, topic.app_id);
    *actor == topic.owner
        || topic.permission_of(actor) == PermissionLevel::Admin
        || app.is_admin(actor)
}

/// Read check.
#[must_use]
pub fn can_read(app: &Application, topic: &Topic, actor: &Address) -> bool {
    match topic.access_level {
        AccessLevel::Public | AccessLevel::PublicLimited => true,
        AccessLevel::Private => {
            topic.permission_of(actor) >= PermissionLevel::Read
                || is_topic_admin(app, topic, actor)
        }
    }
}

/// Write check.
#[must_use]
pub fn can_write(app: &Application, topic: &Topic, actor: &Address) -> bool {
    match topic.access_level {
        AccessLevel::Public => true,
        AccessLevel::PublicLimited => app.is_member(actor),
        AccessLevel::Private => {
            topic.permission_of(actor) >= PermissionLevel::Write
                || is_topic_admin(app, topic, actor)
        }
    }
}

/// Effective level: `Admin` for anyone with admin standing, otherwise the
/// explicit grant.
#[must_use]
pub fn effective_permission(app: &Application, topic: &Topic, actor: &Address) -> PermissionLevel {
    if is_topic_admin(app, topic, actor) {
        PermissionLevel::Admin
    } else {
        topic.permission_of(actor)
    }
}
