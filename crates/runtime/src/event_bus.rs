use serde::Serialize;

/// Which kind of entity a transition happened on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Vis,
    LayerGroup,
    Layer,
    Legend,
    Dataview,
    AnalysisNode,
}

/// The single lifecycle step an updater finished with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Derived fields replaced; the entity has no lifecycle of its own.
    Updated,
    Ok,
    Error,
    /// A dataview received a new URL together with its refresh trigger.
    Refreshed,
}

/// One published transition.
///
/// Updaters mutate all fields of an entity first and publish exactly one of
/// these afterwards, so collaborators never observe a half-applied entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub pass: u64,
    pub entity: EntityKind,
    pub id: String,
    pub transition: Transition,
}

/// Passes whose events a bus keeps unless told otherwise.
pub const DEFAULT_RETAINED_PASSES: u64 = 8;

/// Ordered log of transitions, grouped by pass.
///
/// Only the most recent `retained_passes` passes are kept; starting a pass
/// drops events that fall out of that window. Consumers that need every event
/// call [`drain`](Self::drain) after each pass.
#[derive(Debug)]
pub struct EventBus {
    pass: u64,
    retained_passes: u64,
    events: Vec<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_retained_passes(DEFAULT_RETAINED_PASSES)
    }

    /// A bus keeping the events of the last `passes` passes (at least one).
    pub fn with_retained_passes(passes: u64) -> Self {
        Self {
            pass: 0,
            retained_passes: passes.max(1),
            events: Vec::new(),
        }
    }

    /// Starts a new synchronization or error-reporting pass and returns its number.
    pub fn begin_pass(&mut self) -> u64 {
        self.pass += 1;
        let oldest_kept = (self.pass + 1).saturating_sub(self.retained_passes);
        self.events.retain(|e| e.pass >= oldest_kept);
        self.pass
    }

    pub fn pass(&self) -> u64 {
        self.pass
    }

    pub fn emit(&mut self, entity: EntityKind, id: impl Into<String>, transition: Transition) {
        self.events.push(Event {
            pass: self.pass,
            entity,
            id: id.into(),
            transition,
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events published during `pass`, in emission order.
    pub fn events_in_pass(&self, pass: u64) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.pass == pass)
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::{EntityKind, EventBus, Transition};
    use pretty_assertions::assert_eq;

    #[test]
    fn records_events_with_pass_number() {
        let mut bus = EventBus::new();
        let pass = bus.begin_pass();
        bus.emit(EntityKind::Layer, "l1", Transition::Ok);
        assert_eq!(pass, 1);
        assert_eq!(bus.events().len(), 1);
        assert_eq!(bus.events()[0].pass, 1);
        assert_eq!(bus.events()[0].id, "l1");
    }

    #[test]
    fn events_in_pass_filters_older_passes() {
        let mut bus = EventBus::new();
        bus.begin_pass();
        bus.emit(EntityKind::Vis, "vis", Transition::Ok);
        let second = bus.begin_pass();
        bus.emit(EntityKind::Dataview, "dv1", Transition::Refreshed);
        let ids: Vec<_> = bus.events_in_pass(second).map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["dv1"]);
    }

    #[test]
    fn drain_clears_events_but_keeps_pass_counter() {
        let mut bus = EventBus::new();
        bus.begin_pass();
        bus.emit(EntityKind::Legend, "l1/bubble", Transition::Error);
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.events().is_empty());
        assert_eq!(bus.pass(), 1);
    }

    #[test]
    fn old_passes_fall_out_of_the_retention_window() {
        let mut bus = EventBus::with_retained_passes(2);
        for id in ["dv1", "dv2", "dv3"] {
            bus.begin_pass();
            bus.emit(EntityKind::Dataview, id, Transition::Refreshed);
        }
        let kept: Vec<_> = bus.events().iter().map(|e| (e.pass, e.id.as_str())).collect();
        assert_eq!(kept, vec![(2, "dv2"), (3, "dv3")]);
    }
}
