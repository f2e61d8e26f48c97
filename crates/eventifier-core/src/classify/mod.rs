//! Change classification.
//!
//! Folds the verdicts of [`rules`] over a user's change list into labels,
//! retained changes and side buckets.
//!
//! ## Guarantees
//!
//! - **Pure**: the same changes and context always classify identically
//! - **Justified labels**: every retained change drove at least one label, so
//!   a non-empty change list never comes with an empty label list
//! - **Deduplicated labels**: each label appears once, in first-produced order
//! - **Moves never surface**: a location move is only reported through
//!   [`Classification::move_rejected`]
//! - **Noise last**: external noise labels appear only when no other label
//!   was produced

pub mod rules;

use crate::diff::path::Container;
use crate::model::change::Change;
use crate::model::label::EventLabel;
pub use rules::{evaluate, LocationTransition, RuleContext, UnknownReason, Verdict};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Field-level changes of one container item, keyed by item field
pub type ItemChanges = BTreeMap<String, Change>;

/// Result of classifying one user's changes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub labels: Vec<EventLabel>,
    /// Changes that drove a label, in input order
    pub changes: Vec<Change>,
    /// Changes no rule recognised (or whose values could not be read)
    pub unknown: Vec<Change>,
    /// Recognised but deliberately unlabelled (timestamps, blank locations,
    /// suppressed noise)
    pub ignored: Vec<Change>,
    pub projects: BTreeMap<usize, ItemChanges>,
    pub achievements: BTreeMap<usize, ItemChanges>,
    /// Project indices whose `retriable_at` changed
    pub retry_projects: BTreeSet<usize>,
    /// `(old, new)` status per project index
    pub project_status: BTreeMap<usize, (Value, Value)>,
    pub move_rejected: bool,
}

impl Classification {
    /// Classification of a user with no baseline
    pub fn first_seen() -> Self {
        Self {
            labels: vec![EventLabel::NewSeen],
            ..Self::default()
        }
    }

    /// An entry is only written when at least one label was produced
    pub fn is_reportable(&self) -> bool {
        !self.labels.is_empty()
    }

    pub fn has_label(&self, label: EventLabel) -> bool {
        self.labels.contains(&label)
    }

    fn push_label(&mut self, label: EventLabel) {
        if !self.labels.contains(&label) {
            self.labels.push(label);
        }
    }

    fn retain(&mut self, label: EventLabel, change: Change) {
        self.push_label(label);
        self.changes.push(change);
    }
}

/// Classify a user's changes.
///
/// With no baseline the result is always `[new_seen]` and `changes` is
/// ignored.
pub fn classify(baseline_present: bool, changes: &[Change], ctx: &RuleContext) -> Classification {
    if !baseline_present {
        return Classification::first_seen();
    }

    let mut out = Classification::default();
    let mut noise_location = Vec::new();
    let mut noise_wallet = Vec::new();

    for change in changes {
        match evaluate(change, ctx) {
            Verdict::Dropped => {}
            Verdict::Ignored => out.ignored.push(change.clone()),
            Verdict::Location(LocationTransition::Connection) => {
                out.retain(EventLabel::Connection, change.clone())
            }
            Verdict::Location(LocationTransition::Disconnection) => {
                out.retain(EventLabel::Disconnection, change.clone())
            }
            Verdict::Location(LocationTransition::Move) => out.move_rejected = true,
            Verdict::Location(LocationTransition::Blank) => out.ignored.push(change.clone()),
            Verdict::ExternalLocation => noise_location.push(change.clone()),
            Verdict::ExternalWallet => noise_wallet.push(change.clone()),
            Verdict::Wallet { delta } => {
                out.retain(EventLabel::Wallet, change.clone().with_delta(delta))
            }
            Verdict::CorrectionPoint { delta } => {
                let label = if delta.as_f64().is_some_and(|d| d < 0.0) {
                    EventLabel::Evaluation
                } else {
                    EventLabel::Correction
                };
                out.retain(label, change.clone().with_delta(delta));
            }
            Verdict::ContainerItem {
                container,
                index,
                field,
            } => {
                let label = match container {
                    Container::ProjectsUsers => {
                        if field == "retriable_at" {
                            out.retry_projects.insert(index);
                        }
                        if field == "status" {
                            out.project_status
                                .insert(index, (change.old.clone(), change.new.clone()));
                        }
                        out.projects
                            .entry(index)
                            .or_default()
                            .insert(field, change.clone());
                        EventLabel::Project
                    }
                    Container::Achievements => {
                        out.achievements
                            .entry(index)
                            .or_default()
                            .insert(field, change.clone());
                        EventLabel::Achievement
                    }
                };
                out.retain(label, change.clone());
            }
            Verdict::Identity { .. } => out.retain(EventLabel::NameChange, change.clone()),
            Verdict::Unknown(_) => out.unknown.push(change.clone()),
        }
    }

    let nothing_else = out.labels.is_empty();
    for (label, noise) in [
        (EventLabel::ExternalLocation, noise_location),
        (EventLabel::ExternalWallet, noise_wallet),
    ] {
        if noise.is_empty() {
            continue;
        }
        if nothing_else {
            out.push_label(label);
            out.changes.extend(noise);
        } else {
            out.ignored.extend(noise);
        }
    }

    out
}
