//! Elapsed-time-over-budget indicators.
//!
//! An indicator is a pure function of two timestamps and a target duration in
//! minutes. It does not tick: callers recompute it whenever they need a fresh
//! reading.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::support_ticket::TicketPriority;
use crate::domain::work_order::WorkOrderPriority;

/// Targets attached to one priority level, in minutes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SlaTarget {
    pub first_response_minutes: u32,
    pub resolution_minutes: u32,
}

impl SlaTarget {
    pub const fn new(first_response_minutes: u32, resolution_minutes: u32) -> Self {
        Self {
            first_response_minutes,
            resolution_minutes,
        }
    }
}

/// Priority-keyed lookup table of [`SlaTarget`]s.
#[derive(Clone, Debug, PartialEq)]
pub struct SlaPolicy<P: Eq + Hash> {
    targets: HashMap<P, SlaTarget>,
}

impl<P: Eq + Hash> SlaPolicy<P> {
    pub fn new() -> Self {
        Self {
            targets: HashMap::new(),
        }
    }

    pub fn with_target(mut self, priority: P, target: SlaTarget) -> Self {
        self.targets.insert(priority, target);
        self
    }

    pub fn target(&self, priority: &P) -> Option<SlaTarget> {
        self.targets.get(priority).copied()
    }
}

impl<P: Eq + Hash> Default for SlaPolicy<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl SlaPolicy<TicketPriority> {
    /// First response / resolution budgets used by the support desk.
    pub fn support_desk() -> Self {
        Self::new()
            .with_target(TicketPriority::Urgent, SlaTarget::new(15, 60))
            .with_target(TicketPriority::High, SlaTarget::new(60, 240))
            .with_target(TicketPriority::Normal, SlaTarget::new(240, 1440))
            .with_target(TicketPriority::Low, SlaTarget::new(480, 2880))
    }
}

impl SlaPolicy<WorkOrderPriority> {
    /// Response / completion budgets used by the maintenance desk.
    pub fn maintenance() -> Self {
        Self::new()
            .with_target(WorkOrderPriority::Critical, SlaTarget::new(30, 240))
            .with_target(WorkOrderPriority::High, SlaTarget::new(120, 480))
            .with_target(WorkOrderPriority::Medium, SlaTarget::new(480, 1440))
            .with_target(WorkOrderPriority::Low, SlaTarget::new(1440, 4320))
    }
}

/// Share of a time budget consumed so far.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SlaIndicator {
    pub elapsed_minutes: f64,
    pub target_minutes: f64,
    /// Clamped to `0..=100`.
    pub percent_used: f64,
    /// Strictly more than the whole budget has elapsed.
    pub breached: bool,
}

impl SlaIndicator {
    /// Measures the time between `started_at` and `now` against the budget.
    pub fn evaluate(started_at: NaiveDateTime, now: NaiveDateTime, target_minutes: u32) -> Self {
        let elapsed_ms = (now - started_at).num_milliseconds();
        Self::from_elapsed(elapsed_ms as f64 / 60_000.0, f64::from(target_minutes))
    }

    /// Builds the indicator from an already computed elapsed duration.
    ///
    /// Negative elapsed time (clock skew) counts as zero. A zero budget is
    /// breached as soon as any time has elapsed.
    pub fn from_elapsed(elapsed_minutes: f64, target_minutes: f64) -> Self {
        let elapsed_minutes = elapsed_minutes.max(0.0);

        if target_minutes <= 0.0 {
            let breached = elapsed_minutes > 0.0;
            return Self {
                elapsed_minutes,
                target_minutes,
                percent_used: if breached { 100.0 } else { 0.0 },
                breached,
            };
        }

        let ratio = elapsed_minutes / target_minutes;
        Self {
            elapsed_minutes,
            target_minutes,
            percent_used: (ratio * 100.0).min(100.0),
            breached: ratio > 1.0,
        }
    }
}
