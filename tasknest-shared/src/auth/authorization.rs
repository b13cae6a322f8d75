/// Ownership checks
///
/// Tasks are private to their owner. There is no sharing and no role model,
/// so authorization reduces to one predicate applied before every read or
/// write of a single task.

use uuid::Uuid;

use crate::models::task::Task;
use crate::models::user::User;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthzError {
    /// Resource belongs to another user
    #[error("Not enough permissions")]
    NotOwner { user_id: Uuid, resource_id: Uuid },
}

/// Fails unless `user` owns `task`
pub fn ensure_owner(user: &User, task: &Task) -> Result<(), AuthzError> {
    if task.is_owned_by(user.id) {
        Ok(())
    } else {
        Err(AuthzError::NotOwner {
            user_id: user.id,
            resource_id: task.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::NewTask;
    use crate::models::user::NewUser;

    fn user(name: &str) -> User {
        User::new(NewUser {
            email: format!("{}@example.com", name),
            username: name.to_string(),
            password_hash: "hash".to_string(),
            full_name: None,
            disabled: false,
        })
    }

    #[test]
    fn test_ensure_owner() {
        let alice = user("alice");
        let bob = user("bob");
        let task = Task::new(
            alice.id,
            NewTask {
                title: "private".to_string(),
                ..Default::default()
            },
        );

        assert!(ensure_owner(&alice, &task).is_ok());
        assert_eq!(
            ensure_owner(&bob, &task),
            Err(AuthzError::NotOwner {
                user_id: bob.id,
                resource_id: task.id,
            })
        );
    }
}
