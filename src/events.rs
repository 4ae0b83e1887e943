//! Reconciliation of a subgraph's event handlers against a contract ABI.
//!
//! The subgraph manifest records one handler per event signature. When a
//! contract is recompiled, the event signatures derived from its new ABI are
//! compared against the recorded ones. Any drift in either direction means the
//! manifest, and the mapping code behind it, need a human to reconcile them
//! before code generation is allowed to run again.

use std::fmt::{self, Display, Formatter};

/// The kind of change between two event signature sets.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Change {
    /// Both sets contain exactly the same signatures.
    Unchanged,
    /// The new ABI only adds events.
    Added,
    /// The new ABI only removes events.
    Removed,
    /// Events were both added and removed, for example when an event is
    /// renamed or its parameters change.
    Replaced,
}

/// The result of comparing the events handled by a subgraph data source with
/// the events of a new contract ABI.
#[derive(Clone, Debug)]
pub struct EventDiff {
    current: Vec<String>,
    new: Vec<String>,
    removed: Vec<String>,
    added: Vec<String>,
}

impl EventDiff {
    /// Compares the current handler event signatures with the new ones.
    pub fn new(current: Vec<String>, new: Vec<String>) -> Self {
        let removed = difference(&current, &new);
        let added = difference(&new, &current);

        Self {
            current,
            new,
            removed,
            added,
        }
    }

    /// Returns `true` if the event sets diverge in any way.
    ///
    /// A length mismatch counts as a change even when both differences are
    /// empty, which can only happen when one side lists a signature twice.
    pub fn changed(&self) -> bool {
        self.current.len() != self.new.len() || !self.removed.is_empty() || !self.added.is_empty()
    }

    /// Classifies the change.
    pub fn change(&self) -> Change {
        match (self.removed.is_empty(), self.added.is_empty()) {
            (true, true) if !self.changed() => Change::Unchanged,
            (true, false) => Change::Added,
            (false, true) => Change::Removed,
            _ => Change::Replaced,
        }
    }

    /// Signatures handled by the subgraph that the new ABI no longer has.
    pub fn removed(&self) -> &[String] {
        &self.removed
    }

    /// Signatures of the new ABI that the subgraph does not handle.
    pub fn added(&self) -> &[String] {
        &self.added
    }

    pub fn current(&self) -> &[String] {
        &self.current
    }

    pub fn new_events(&self) -> &[String] {
        &self.new
    }
}

/// Renders the warning shown when events have changed. Both lists are printed
/// verbatim so that the manifest can be fixed by hand.
impl Display for EventDiff {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "Contract events have been changed!")?;
        writeln!(f)?;
        writeln!(f, "Current events:")?;
        writeln!(f, "{}", self.current.join("\n"))?;
        writeln!(f)?;
        writeln!(f, "New events:")?;
        writeln!(f, "{}", self.new.join("\n"))?;
        writeln!(f)?;
        write!(
            f,
            "Please address the change in your subgraph.yaml and run graph codegen \
             and graph build from the subgraph folder!",
        )
    }
}

/// Returns the signatures of `a` that are not in `b`, in the order they
/// appear in `a`.
pub fn difference(a: &[String], b: &[String]) -> Vec<String> {
    a.iter().filter(|&x| !b.contains(x)).cloned().collect()
}
