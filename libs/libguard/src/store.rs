//! Observable state containers over the typed client. Each container
//! holds the last-fetched collection; every mutation is a full-state
//! replacement published to subscribers (single-writer,
//! last-write-wins, no cross-tab sync).

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::watch;

use api::request::Login;
use api::response::{Alert, Incident, User};

use crate::Client;

/// Explicit publish/subscribe state holder: a value plus a set of
/// listeners, nothing more.
pub struct Store<S> {
    tx: watch::Sender<S>,
}

impl<S: Clone> Store<S> {
    pub fn new(initial: S) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    pub fn get(&self) -> S {
        self.tx.borrow().clone()
    }

    pub fn set(&self, state: S) {
        self.tx.send_replace(state);
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    fn publish(&self, apply: impl FnOnce(&mut S)) {
        let mut next = self.get();
        apply(&mut next);
        self.set(next);
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AlertsState {
    pub alerts: Vec<Alert>,
    pub is_loading: bool,
    pub error: Option<String>,
}

pub struct AlertsStore {
    client: Arc<Client>,
    state: Store<AlertsState>,
}

impl AlertsStore {
    pub fn new(client: Arc<Client>) -> Self {
        Self {
            client,
            state: Store::new(AlertsState::default()),
        }
    }

    pub fn state(&self) -> AlertsState {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<AlertsState> {
        self.state.subscribe()
    }

    pub async fn fetch(&self) {
        self.state.publish(|state| {
            state.is_loading = true;
            state.error = None;
        });
        match self.client.alerts().await {
            Ok(alerts) => self.state.set(AlertsState {
                alerts,
                is_loading: false,
                error: None,
            }),
            Err(err) => self.state.set(AlertsState {
                alerts: Vec::new(),
                is_loading: false,
                error: Some(err.to_string()),
            }),
        }
    }

    /// Prepends a locally known alert, newest first.
    pub fn add(&self, alert: Alert) {
        self.state.publish(|state| state.alerts.insert(0, alert));
    }

    /// Replaces the entry with a matching id; everything else is left
    /// untouched.
    pub fn update(&self, updated: Alert) {
        self.state.publish(|state| {
            if let Some(slot) = state.alerts.iter_mut().find(|a| a.id == updated.id) {
                *slot = updated;
            }
        });
    }

    pub fn remove(&self, alert_id: &str) {
        self.state
            .publish(|state| state.alerts.retain(|a| a.id != alert_id));
    }

    pub async fn acknowledge(&self, alert_id: &str) -> Result<()> {
        let alert = self.client.acknowledge_alert(alert_id).await?;
        self.update(alert);
        Ok(())
    }

    pub async fn assign(&self, alert_id: &str, guard_id: &str) -> Result<Incident> {
        let assigned = self.client.assign_alert(alert_id, guard_id).await?;
        self.update(assigned.alert);
        Ok(assigned.incident)
    }

    pub fn clear_error(&self) {
        self.state.publish(|state| state.error = None);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            // Starts loading until the first check_auth resolves.
            is_loading: true,
        }
    }
}

pub struct AuthStore {
    client: Arc<Client>,
    state: Store<AuthState>,
}

impl AuthStore {
    pub fn new(client: Arc<Client>) -> Self {
        Self {
            client,
            state: Store::new(AuthState::default()),
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        self.state.publish(|state| state.is_loading = true);
        match self
            .client
            .login(&Login {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await
        {
            Ok(login) => {
                self.state.set(AuthState {
                    user: Some(login.user),
                    is_authenticated: true,
                    is_loading: false,
                });
                Ok(())
            }
            Err(err) => {
                self.state.set(AuthState {
                    user: None,
                    is_authenticated: false,
                    is_loading: false,
                });
                Err(err)
            }
        }
    }

    pub async fn logout(&self) {
        let _ = self.client.logout().await;
        self.state.set(AuthState {
            user: None,
            is_authenticated: false,
            is_loading: false,
        });
    }

    pub async fn check_auth(&self) {
        self.state.publish(|state| state.is_loading = true);
        match self.client.current_user().await {
            Ok(user) => self.state.set(AuthState {
                user: Some(user),
                is_authenticated: true,
                is_loading: false,
            }),
            Err(_) => self.state.set(AuthState {
                user: None,
                is_authenticated: false,
                is_loading: false,
            }),
        }
    }

    pub fn set_user(&self, user: User) {
        self.state.set(AuthState {
            user: Some(user),
            is_authenticated: true,
            is_loading: false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_alert(id: &str, status: &str) -> Alert {
        serde_json::from_value(json!({
            "id": id,
            "type": "suspicious_activity",
            "severity": "medium",
            "title": "Loitering",
            "description": "",
            "location": "gate 1",
            "status": status,
            "premiseId": "p1",
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap()
    }

    fn alerts_store() -> AlertsStore {
        let client = Arc::new(Client::new("http://127.0.0.1:1".to_string()).unwrap());
        AlertsStore::new(client)
    }

    #[test]
    fn add_prepends_newest_first() {
        let store = alerts_store();
        store.add(sample_alert("a1", "pending"));
        store.add(sample_alert("a2", "pending"));
        let state = store.state();
        assert_eq!(state.alerts[0].id, "a2");
        assert_eq!(state.alerts[1].id, "a1");
    }

    #[test]
    fn update_replaces_only_matching_entry() {
        let store = alerts_store();
        store.add(sample_alert("a1", "pending"));
        store.add(sample_alert("a2", "pending"));
        let untouched = store.state().alerts[0].clone();

        store.update(sample_alert("a1", "acknowledged"));

        let state = store.state();
        let a1 = state.alerts.iter().find(|a| a.id == "a1").unwrap();
        let a2 = state.alerts.iter().find(|a| a.id == "a2").unwrap();
        assert_eq!(a1.status, api::response::AlertStatus::Acknowledged);
        assert_eq!(*a2, untouched);
    }

    #[test]
    fn remove_filters_by_id() {
        let store = alerts_store();
        store.add(sample_alert("a1", "pending"));
        store.add(sample_alert("a2", "pending"));
        store.remove("a1");
        let state = store.state();
        assert_eq!(state.alerts.len(), 1);
        assert_eq!(state.alerts[0].id, "a2");
    }

    #[tokio::test]
    async fn subscribers_observe_full_state_replacements() {
        let store = alerts_store();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());
        store.add(sample_alert("a1", "pending"));
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();
        store.clear_error();
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn auth_state_starts_loading() {
        let client = Arc::new(Client::new("http://127.0.0.1:1".to_string()).unwrap());
        let store = AuthStore::new(client);
        let state = store.state();
        assert!(state.is_loading);
        assert!(!state.is_authenticated);
        assert!(state.user.is_none());
    }
}
