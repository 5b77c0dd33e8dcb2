//! End-of-game score reconciliation.
//!
//! After the last round the total is saved under the player's nickname. The server may
//! already hold older records for that nickname; exactly one of them (or the new one) is
//! then marked active and shown on the leaderboard. How that record is chosen depends on
//! [`ReconciliationMode`].
//!
//! Looking up prior records and creating the new one are two separate requests, so two
//! sessions finishing at the same moment under one nickname can both see "no prior
//! records" and both submit as active. The server is the arbiter; nothing here masks it.

use crate::core::network::{NetError, ScoreService};
use crate::gameplay::scores::{RecordId, ScoreRecord};
use log::{debug, info, warn};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconciliationMode {
    /// No prompt: the previously active record stays active.
    AutoKeepActive,
    /// Prompt with the highest score preselected.
    PromptHighestDefault,
    /// Prompt with nothing preselected.
    PromptNoDefault,
    /// Overwrite the nickname's score on the server, no lookup and no prompt.
    ReplaceOutright,
}

impl ReconciliationMode {
    pub const ALL: [ReconciliationMode; 4] = [
        ReconciliationMode::AutoKeepActive,
        ReconciliationMode::PromptHighestDefault,
        ReconciliationMode::PromptNoDefault,
        ReconciliationMode::ReplaceOutright,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReconciliationMode::AutoKeepActive => "auto-keep-active",
            ReconciliationMode::PromptHighestDefault => "prompt-highest-default",
            ReconciliationMode::PromptNoDefault => "prompt-no-default",
            ReconciliationMode::ReplaceOutright => "replace-outright",
        }
    }
}

impl FromStr for ReconciliationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown reconciliation mode '{wanted}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OptionKind {
    Previous,
    Active,
    New,
}

impl OptionKind {
    pub fn label(&self) -> &'static str {
        match self {
            OptionKind::New => "new result",
            OptionKind::Active => "current on leaderboard",
            OptionKind::Previous => "previous result",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOption {
    pub id: RecordId,
    pub score: u32,
    pub kind: OptionKind,
}

/// The "which score should count" prompt. The new record always comes first.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub options: Vec<ScoreOption>,
    pub selected: Option<usize>,
    pub last_error: Option<String>,
}

impl Choice {
    pub fn confirm_enabled(&self) -> bool {
        self.selected.is_some()
    }

    pub fn selected_option(&self) -> Option<&ScoreOption> {
        self.selected.and_then(|i| self.options.get(i))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Saved, and `active_id` is the record the leaderboard shows.
    Reconciled { displayed_total: u32, active_id: RecordId },
    /// Lookup or save failed. The computed total is kept and the save can be retried.
    Unsaved { displayed_total: u32, error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReconcilePhase {
    Pending,
    Choosing(Choice),
    Done(Outcome),
}

pub struct ScoreReconciler {
    mode: ReconciliationMode,
    nickname: String,
    total: u32,
    phase: ReconcilePhase,
}

fn build_options(new_id: RecordId, total: u32, prior: &[ScoreRecord]) -> Vec<ScoreOption> {
    let mut options = Vec::with_capacity(prior.len() + 1);
    options.push(ScoreOption { id: new_id, score: total, kind: OptionKind::New });
    options.extend(prior.iter().map(|r| ScoreOption {
        id: r.id.clone(),
        score: r.score,
        kind: if r.is_active { OptionKind::Active } else { OptionKind::Previous },
    }));
    options
}

// First option with the greatest key wins.
fn best_by<K: Ord>(options: &[ScoreOption], key: impl Fn(&ScoreOption) -> Option<K>) -> Option<usize> {
    let mut best: Option<(usize, K)> = None;
    for (i, option) in options.iter().enumerate() {
        let Some(k) = key(option) else { continue };
        if best.as_ref().is_none_or(|(_, b)| k > *b) {
            best = Some((i, k));
        }
    }
    best.map(|(i, _)| i)
}

/// Preselected option for a prompt.
pub fn default_selection(mode: ReconciliationMode, options: &[ScoreOption]) -> Option<usize> {
    match mode {
        ReconciliationMode::AutoKeepActive => {
            best_by(options, |o| (o.kind == OptionKind::Active).then_some(o.score))
                // no active prior: the new record takes over
                .or_else(|| (!options.is_empty()).then_some(0))
        }
        ReconciliationMode::PromptHighestDefault => best_by(options, |o| Some((o.score, o.kind))),
        ReconciliationMode::PromptNoDefault | ReconciliationMode::ReplaceOutright => None,
    }
}

impl ScoreReconciler {
    pub fn new(mode: ReconciliationMode, nickname: &str, total: u32) -> Self {
        Self {
            mode,
            nickname: nickname.to_string(),
            total,
            phase: ReconcilePhase::Pending,
        }
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn phase(&self) -> &ReconcilePhase {
        &self.phase
    }

    pub fn is_done(&self) -> bool {
        matches!(self.phase, ReconcilePhase::Done(_))
    }

    /// The score to show next to the nickname: the activated record's score once
    /// reconciled, the just-played total otherwise.
    pub fn displayed_total(&self) -> u32 {
        match &self.phase {
            ReconcilePhase::Done(Outcome::Reconciled { displayed_total, .. }) => *displayed_total,
            _ => self.total,
        }
    }

    pub fn can_retry_save(&self) -> bool {
        matches!(self.phase, ReconcilePhase::Done(Outcome::Unsaved { .. }))
    }

    /// Saves the total and resolves the active record as far as the mode allows without
    /// user input. Allowed from `Pending`, or to retry after an unsaved outcome.
    pub fn run(&mut self, service: &dyn ScoreService) -> &ReconcilePhase {
        if !matches!(self.phase, ReconcilePhase::Pending) && !self.can_retry_save() {
            debug!("Ignoring save request in phase {:?}", self.phase);
            return &self.phase;
        }

        if self.mode == ReconciliationMode::ReplaceOutright {
            self.phase = match service.replace_score(&self.nickname, self.total) {
                Ok(id) => {
                    info!("Replaced score for '{}' with {} (id {}).", self.nickname, self.total, id);
                    ReconcilePhase::Done(Outcome::Reconciled { displayed_total: self.total, active_id: id })
                }
                Err(e) => self.unsaved("replace score", e),
            };
            return &self.phase;
        }

        let prior = match service.scores_for(&self.nickname) {
            Ok(prior) => prior,
            Err(e) => {
                self.phase = self.unsaved("look up previous scores", e);
                return &self.phase;
            }
        };

        let first_ever = prior.is_empty();
        let new_id = match service.submit_score(&self.nickname, self.total, first_ever) {
            Ok(id) => id,
            Err(e) => {
                self.phase = self.unsaved("submit score", e);
                return &self.phase;
            }
        };

        if first_ever {
            info!("First score for '{}' saved as active (id {}).", self.nickname, new_id);
            self.phase = ReconcilePhase::Done(Outcome::Reconciled { displayed_total: self.total, active_id: new_id });
            return &self.phase;
        }

        let options = build_options(new_id, self.total, &prior);
        let selected = default_selection(self.mode, &options);
        info!(
            "'{}' has {} earlier score(s); {} to resolve.",
            self.nickname,
            prior.len(),
            if self.mode == ReconciliationMode::AutoKeepActive { "auto" } else { "prompting" }
        );
        self.phase = ReconcilePhase::Choosing(Choice { options, selected, last_error: None });

        if self.mode == ReconciliationMode::AutoKeepActive && self.confirm(service).is_err() {
            info!("Automatic activation failed; leaving the choice to the player.");
        }
        &self.phase
    }

    /// Returns false if there is no prompt or the index is out of range.
    pub fn select(&mut self, index: usize) -> bool {
        match &mut self.phase {
            ReconcilePhase::Choosing(choice) if index < choice.options.len() => {
                choice.selected = Some(index);
                true
            }
            _ => false,
        }
    }

    /// Activates the selected option. On failure the prompt stays up, selection intact,
    /// with the error recorded, so it can be confirmed again.
    pub fn confirm(&mut self, service: &dyn ScoreService) -> Result<(), NetError> {
        let (id, score) = match &self.phase {
            ReconcilePhase::Choosing(choice) => match choice.selected_option() {
                Some(option) => (option.id.clone(), option.score),
                None => {
                    debug!("Ignoring confirm with nothing selected");
                    return Ok(());
                }
            },
            _ => {
                debug!("Ignoring confirm in phase {:?}", self.phase);
                return Ok(());
            }
        };

        match service.activate(&self.nickname, &id) {
            Ok(()) => {
                info!("Activated score {} (id {}) for '{}'.", score, id, self.nickname);
                self.phase = ReconcilePhase::Done(Outcome::Reconciled { displayed_total: score, active_id: id });
                Ok(())
            }
            Err(e) => {
                warn!("Failed to activate score {} for '{}': {}", id, self.nickname, e);
                if let ReconcilePhase::Choosing(choice) = &mut self.phase {
                    choice.last_error = Some(e.to_string());
                }
                Err(e)
            }
        }
    }

    fn unsaved(&self, what: &str, e: NetError) -> ReconcilePhase {
        warn!("Failed to {} for '{}': {}", what, self.nickname, e);
        ReconcilePhase::Done(Outcome::Unsaved { displayed_total: self.total, error: e.to_string() })
    }
}

impl fmt::Display for ReconciliationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
