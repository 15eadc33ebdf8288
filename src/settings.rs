use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

/// The signed-in account. Authentication itself happens against the hosted
/// identity provider; the desktop shell only caches the resolved profile and
/// scopes every query by its id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserSettings {
    account: Option<AccountProfile>,
    tracking_enabled: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            account: None,
            tracking_enabled: true,
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn account(&self) -> Option<AccountProfile> {
        self.data.read().unwrap().account.clone()
    }

    /// The account id every repository query is scoped by. Err when nobody
    /// is signed in; commands surface that as-is.
    pub fn require_account_id(&self) -> Result<String> {
        self.account()
            .map(|profile| profile.id)
            .ok_or_else(|| anyhow::anyhow!("No active account; sign in first"))
    }

    pub fn update_account(&self, account: Option<AccountProfile>) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.account = account;
        self.persist(&guard)
    }

    pub fn tracking_enabled(&self) -> bool {
        self.data.read().unwrap().tracking_enabled
    }

    pub fn set_tracking_enabled(&self, enabled: bool) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.tracking_enabled = enabled;
        self.persist(&guard)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn settings_round_trip_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");

        let store = SettingsStore::new(path.clone()).unwrap();
        assert!(store.account().is_none());
        assert!(store.tracking_enabled());

        store
            .update_account(Some(AccountProfile {
                id: "acct-1".into(),
                name: "Taylor Seller".into(),
                email: "taylor@example.com".into(),
            }))
            .unwrap();
        store.set_tracking_enabled(false).unwrap();

        let reopened = SettingsStore::new(path).unwrap();
        assert_eq!(reopened.require_account_id().unwrap(), "acct-1");
        assert!(!reopened.tracking_enabled());
    }
}
