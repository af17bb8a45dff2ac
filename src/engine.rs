//! Activation engine
//!
//! Owns the activation records: for every active context, the launcher instances
//! that opened its items, kept so that `close` can undo exactly what `activate`
//! did. The engine is an explicit value created by the caller; nothing here is
//! global.
//!
//! Activation and close never fail outward. Every automation problem is contained
//! by the launcher or terminal path that hit it and comes back in the report.

use crate::context::Context;
use crate::family::{FamilyId, FamilyKind, FamilyResolver, Partition};
use crate::item::ContextItem;
use crate::launcher::{launcher_for, LaunchFailure, LaunchOutcome, Launcher, LauncherSettings};
use crate::library::ContextLibrary;
use crate::platform::Platform;
use crate::terminal::{self, SessionOutcome, SessionStatus};
use crate::types::{ContextId, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// What to do with already active contexts when another one is activated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchPolicy {
    /// Close every active context first; one context active at a time.
    #[default]
    Replace,
    /// Leave active contexts open alongside the new one.
    Additive,
}

impl std::fmt::Display for SwitchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwitchPolicy::Replace => f.write_str("replace"),
            SwitchPolicy::Additive => f.write_str("additive"),
        }
    }
}

impl std::str::FromStr for SwitchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(SwitchPolicy::Replace),
            "additive" => Ok(SwitchPolicy::Additive),
            other => Err(format!(
                "Unknown switch policy '{}'; expected replace or additive",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationStatus {
    Activated,
    /// Additive activation of a context that was already active; nothing was opened.
    AlreadyActive,
    ContextNotFound,
}

/// Result of one launcher's `open` or `close`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketReport {
    pub family: FamilyId,
    pub kind: FamilyKind,
    pub items: usize,
    pub outcome: LaunchOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationReport {
    pub context_id: ContextId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_name: Option<String>,
    pub status: ActivationStatus,
    pub policy: SwitchPolicy,
    /// Contexts closed first under [`SwitchPolicy::Replace`].
    pub closed: Vec<CloseReport>,
    pub buckets: Vec<BucketReport>,
    /// Items whose family could not be resolved; they were not opened.
    pub unresolved: Vec<ItemId>,
    pub terminals: Vec<SessionOutcome>,
}

impl ActivationReport {
    fn empty(context_id: ContextId, status: ActivationStatus, policy: SwitchPolicy) -> Self {
        Self {
            context_id,
            context_name: None,
            status,
            policy,
            closed: Vec::new(),
            buckets: Vec::new(),
            unresolved: Vec::new(),
            terminals: Vec::new(),
        }
    }

    /// Every launcher and terminal failure of this activation.
    pub fn failures(&self) -> Vec<LaunchFailure> {
        let mut failures: Vec<LaunchFailure> = self
            .buckets
            .iter()
            .flat_map(|b| b.outcome.failures.iter().cloned())
            .collect();
        for session in &self.terminals {
            if let SessionStatus::Failed(reason) = &session.status {
                failures.push(LaunchFailure {
                    item_id: Some(session.item_id),
                    reason: reason.clone(),
                });
            }
        }
        failures
    }

    pub fn is_clean(&self) -> bool {
        self.failures().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseReport {
    pub context_id: ContextId,
    /// False when there was no activation record to close.
    pub was_active: bool,
    pub buckets: Vec<BucketReport>,
}

impl CloseReport {
    pub fn is_clean(&self) -> bool {
        self.buckets.iter().all(|b| b.outcome.is_clean())
    }
}

fn bucket_report(launcher: &dyn Launcher, outcome: LaunchOutcome) -> BucketReport {
    BucketReport {
        family: launcher.family().clone(),
        kind: launcher.kind(),
        items: launcher.items().len(),
        outcome,
    }
}

pub struct ActivationEngine {
    platform: Platform,
    resolver: FamilyResolver,
    settings: LauncherSettings,
    records: HashMap<ContextId, Vec<Box<dyn Launcher>>>,
    /// Active contexts in activation order.
    active: Vec<ContextId>,
}

impl ActivationEngine {
    pub fn new(platform: Platform, settings: LauncherSettings) -> Self {
        let resolver = FamilyResolver::new(platform.workspace.clone());
        Self {
            platform,
            resolver,
            settings,
            records: HashMap::new(),
            active: Vec::new(),
        }
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn is_active(&self, id: ContextId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn active_context_ids(&self) -> &[ContextId] {
        &self.active
    }

    /// Families of the launchers held for an active context, in open order.
    pub fn launcher_families(&self, id: ContextId) -> Option<Vec<FamilyId>> {
        self.records
            .get(&id)
            .map(|launchers| launchers.iter().map(|l| l.family().clone()).collect())
    }

    /// Family partition of a context's items as activation would compute it now.
    pub fn plan(&self, context: &Context) -> Partition {
        self.resolver.partition(context.items())
    }

    /// Activate the context with `id` from `library`. An unknown id is a no-op.
    pub fn activate(
        &mut self,
        library: &ContextLibrary,
        id: ContextId,
        policy: SwitchPolicy,
    ) -> ActivationReport {
        match library.get(id) {
            Some(context) => self.open_context(context, policy),
            None => {
                debug!(context_id = %id, "Activation skipped: context not found");
                ActivationReport::empty(id, ActivationStatus::ContextNotFound, policy)
            }
        }
    }

    /// Open every item of `context` and record the launchers used.
    pub fn open_context(&mut self, context: &Context, policy: SwitchPolicy) -> ActivationReport {
        let mut report = ActivationReport::empty(context.id, ActivationStatus::Activated, policy);
        report.context_name = Some(context.name.clone());

        match policy {
            SwitchPolicy::Additive if self.is_active(context.id) => {
                debug!(context_id = %context.id, "Context already active");
                report.status = ActivationStatus::AlreadyActive;
                return report;
            }
            SwitchPolicy::Additive => {}
            SwitchPolicy::Replace => report.closed = self.close_all(),
        }

        info!(
            context_id = %context.id,
            context = %context.name,
            policy = %policy,
            items = context.items().len(),
            "Activating context"
        );

        let partition = self.resolver.partition(context.items());
        for item in &partition.unresolved {
            debug!(
                context_id = %context.id,
                item_id = %item.id(),
                "No application family for item; skipped"
            );
        }
        report.unresolved = partition.unresolved.iter().map(ContextItem::id).collect();

        let mut launchers = Vec::with_capacity(partition.buckets.len());
        for (family, items) in partition.buckets {
            let mut launcher = launcher_for(family, items, &self.platform, &self.settings);
            let outcome = launcher.open();
            report.buckets.push(bucket_report(launcher.as_ref(), outcome));
            launchers.push(launcher);
        }

        report.terminals = terminal::run_sessions(&self.platform, &partition.terminals);

        self.records.insert(context.id, launchers);
        self.active.push(context.id);

        let failures = report.failures().len();
        if failures > 0 {
            warn!(context_id = %context.id, failures, "Context activated with failures");
        } else {
            info!(context_id = %context.id, "Context activated");
        }
        report
    }

    /// Close what the activation of `id` opened. Closing an inactive context is a
    /// no-op.
    pub fn close(&mut self, id: ContextId) -> CloseReport {
        let Some(mut launchers) = self.records.remove(&id) else {
            debug!(context_id = %id, "Close skipped: context not active");
            return CloseReport {
                context_id: id,
                was_active: false,
                buckets: Vec::new(),
            };
        };
        self.active.retain(|active| *active != id);

        let buckets = launchers
            .iter_mut()
            .map(|launcher| {
                let outcome = launcher.close();
                bucket_report(&**launcher, outcome)
            })
            .collect();
        info!(context_id = %id, "Context closed");
        CloseReport {
            context_id: id,
            was_active: true,
            buckets,
        }
    }

    /// Close every active context, oldest activation first.
    pub fn close_all(&mut self) -> Vec<CloseReport> {
        let ids = self.active.clone();
        ids.into_iter().map(|id| self.close(id)).collect()
    }

    /// Drop the activation record of `id` without closing anything.
    pub fn forget(&mut self, id: ContextId) -> bool {
        self.active.retain(|active| *active != id);
        self.records.remove(&id).is_some()
    }

    /// Open one item on its own. Nothing is recorded, so it is not closed with any
    /// context.
    pub fn open_item(&self, item: &ContextItem) -> LaunchOutcome {
        if let ContextItem::TerminalSession(session) = item {
            let mut outcome = LaunchOutcome::default();
            match terminal::run_session(&self.platform, session).status {
                SessionStatus::Started => outcome.completed = 1,
                SessionStatus::Skipped => {}
                SessionStatus::Failed(reason) => outcome.failures.push(LaunchFailure {
                    item_id: Some(session.id),
                    reason,
                }),
            }
            return outcome;
        }

        match self.resolver.resolve(item) {
            Some(family) => {
                let mut launcher =
                    launcher_for(family, vec![item.clone()], &self.platform, &self.settings);
                launcher.open()
            }
            None => {
                debug!(item_id = %item.id(), "No application family for item");
                LaunchOutcome {
                    completed: 0,
                    failures: vec![LaunchFailure {
                        item_id: Some(item.id()),
                        reason: "No application is responsible for this item".to_string(),
                    }],
                }
            }
        }
    }
}

impl std::fmt::Debug for ActivationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivationEngine")
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}
