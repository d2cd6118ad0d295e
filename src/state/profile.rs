//! Profile view: identity card, edit form and reading statistics.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use crate::net::profile::ProfileApi;
use crate::net::types::{ProfilePatch, UserDashboard, UserProfile};
use crate::routes::{Route, Router};

pub const SAVE_ERROR: &str = "Failed to update profile. Please try again.";

#[derive(Clone, Debug, Default)]
pub struct ProfileState {
    pub profile: Option<UserProfile>,
    pub dashboard: Option<UserDashboard>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct ProfileController {
    api: ProfileApi,
    router: Router,
    state: ProfileState,
}

impl ProfileController {
    #[must_use]
    pub fn new(api: ProfileApi, router: Router) -> Self {
        Self { api, router, state: ProfileState::default() }
    }

    #[must_use]
    pub fn state(&self) -> &ProfileState {
        &self.state
    }

    /// Load the profile. Any failure sends the user to the login view.
    pub async fn load(&mut self) {
        self.state.loading = true;
        match self.api.profile().await {
            Ok(Some(profile)) => self.state.profile = Some(profile),
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(%error, "profile load failed");
                self.router.navigate(Route::Login);
            }
        }
        self.state.loading = false;
    }

    pub async fn load_dashboard(&mut self) {
        match self.api.dashboard().await {
            Ok(Some(dashboard)) => self.state.dashboard = Some(dashboard),
            Ok(None) => {}
            Err(error) => tracing::warn!(%error, "profile statistics load failed"),
        }
    }

    /// Save a display name and email. The first word becomes the first
    /// name, the rest the last name.
    pub async fn save(&mut self, full_name: &str, email: &str) {
        if self.state.profile.is_none() {
            return;
        }
        self.state.error = None;
        let patch = ProfilePatch::from_display_name(full_name, email);
        match self.api.update_profile(&patch).await {
            Ok(Some(profile)) => self.state.profile = Some(profile),
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(%error, "profile update failed");
                self.state.error = Some(SAVE_ERROR.to_owned());
            }
        }
    }

    /// Uppercase initials of the display name.
    #[must_use]
    pub fn initials(&self) -> String {
        self.state.profile.as_ref().map_or_else(String::new, |profile| {
            profile
                .display_name()
                .split_whitespace()
                .filter_map(|word| word.chars().next())
                .collect::<String>()
                .to_uppercase()
        })
    }
}
