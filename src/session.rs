use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use teloxide::types::UserId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Waiting,
    Success,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserSession {
    pub phone: String,
    pub status: Status,
}

impl UserSession {
    pub fn waiting(phone: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            status: Status::Waiting,
        }
    }
}

/// Rental sessions keyed by renter. One phone per user, later writes win.
pub trait SessionStore: Send + Sync {
    fn get(&self, user: UserId) -> Option<UserSession>;

    fn set(&self, user: UserId, session: UserSession);

    fn delete(&self, user: UserId) -> Option<UserSession>;

    /// Returns `false` and changes nothing when `user` has no session.
    fn set_status(&self, user: UserId, status: Status) -> bool;
}

#[derive(Default)]
pub struct InMemSessionStore {
    sessions: Mutex<HashMap<UserId, UserSession>>,
}

impl InMemSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<UserId, UserSession>> {
        // a panic while holding the lock cannot leave a half-written entry
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for InMemSessionStore {
    fn get(&self, user: UserId) -> Option<UserSession> {
        self.lock().get(&user).cloned()
    }

    fn set(&self, user: UserId, session: UserSession) {
        self.lock().insert(user, session);
    }

    fn delete(&self, user: UserId) -> Option<UserSession> {
        self.lock().remove(&user)
    }

    fn set_status(&self, user: UserId, status: Status) -> bool {
        match self.lock().get_mut(&user) {
            Some(session) => {
                session.status = status;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_phone_overwrites_earlier() {
        let store = InMemSessionStore::new();
        store.set(UserId(7), UserSession::waiting("+100"));
        store.set_status(UserId(7), Status::Success);
        store.set(UserId(7), UserSession::waiting("+200"));

        assert_eq!(store.get(UserId(7)), Some(UserSession::waiting("+200")));
    }

    #[test]
    fn set_status_on_unknown_user_is_a_no_op() {
        let store = InMemSessionStore::new();
        assert!(!store.set_status(UserId(1), Status::Failed));
        assert_eq!(store.get(UserId(1)), None);
    }

    #[test]
    fn delete_removes_entry() {
        let store = InMemSessionStore::new();
        store.set(UserId(3), UserSession::waiting("+300"));
        assert_eq!(store.delete(UserId(3)), Some(UserSession::waiting("+300")));
        assert_eq!(store.get(UserId(3)), None);
        assert_eq!(store.delete(UserId(3)), None);
    }

    #[test]
    fn sessions_of_different_users_are_independent() {
        let store = InMemSessionStore::new();
        store.set(UserId(1), UserSession::waiting("+1"));
        store.set(UserId(2), UserSession::waiting("+2"));
        assert!(store.set_status(UserId(2), Status::Failed));

        assert_eq!(store.get(UserId(1)).unwrap().status, Status::Waiting);
        assert_eq!(store.get(UserId(2)).unwrap().status, Status::Failed);
    }
}
