//! Per-profile run registry.
//!
//! One `RunController` per builtin profile, each owning its own run state
//! (no cross-run sharing), plus a selected-profile pointer. This is the
//! engine-side shape of "one current tab's data out of a table keyed by
//! configuration id".

use std::collections::HashMap;

use anyhow::Result;

use crate::config::BenchConfig;
use crate::profile::{self, Profile};
use crate::run::RunController;

pub struct Session {
    runs: HashMap<&'static str, RunController>,
    selected: Profile,
}

impl Session {
    /// Builds one controller per builtin profile; the first profile starts
    /// selected.
    pub fn new(cfg: &BenchConfig) -> Self {
        let runs = profile::PROFILES
            .iter()
            .map(|p| (p.id, RunController::new(*p, cfg)))
            .collect();
        Self {
            runs,
            selected: profile::PROFILES[0],
        }
    }

    /// Switches the selected profile. Unknown ids are rejected and leave the
    /// selection unchanged.
    pub fn select(&mut self, id: &str) -> Result<()> {
        let Some(p) = profile::find(id) else {
            anyhow::bail!("unknown profile: {}", id);
        };
        self.selected = p;
        Ok(())
    }

    pub fn selected_profile(&self) -> Profile {
        self.selected
    }

    /// Controller for the currently selected profile.
    pub fn selected(&self) -> &RunController {
        &self.runs[self.selected.id]
    }

    /// Controller for a specific profile id.
    pub fn controller(&self, id: &str) -> Option<&RunController> {
        self.runs.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_controller_per_builtin_profile() {
        let session = Session::new(&BenchConfig::default());
        for p in profile::PROFILES {
            assert!(session.controller(p.id).is_some());
        }
        assert_eq!(session.selected_profile().id, "baseline");
    }

    #[test]
    fn select_switches_and_rejects_unknown() {
        let mut session = Session::new(&BenchConfig::default());
        session.select("accel-cached").unwrap();
        assert_eq!(session.selected_profile().id, "accel-cached");
        assert!(session.select("tab5").is_err());
        assert_eq!(session.selected_profile().id, "accel-cached");
    }

    #[test]
    fn runs_are_independent() {
        let mut session = Session::new(&BenchConfig::default());
        // Fresh controllers: every run starts empty and inactive.
        let a = session.selected().snapshot();
        assert!(a.attempts.is_empty() && !a.active);
        session.select("cached").unwrap();
        let b = session.selected().snapshot();
        assert!(b.attempts.is_empty() && !b.active);
    }
}
