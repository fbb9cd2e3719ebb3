use crossbeam_channel::{Receiver, Sender};
use hh_core::InstanceId;

/// What kind of simulation event occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEventKind {
    // Combat
    /// An attack landed.
    AttackHit {
        /// The character attacking.
        attacker: InstanceId,
        /// The character attacked.
        target: InstanceId,
        /// Name of the attack used.
        attack: String,
        /// Damage actually dealt after armour.
        damage: i32,
    },
    /// An attack was attempted and missed.
    AttackMissed {
        /// The character attacking.
        attacker: InstanceId,
        /// The character attacked.
        target: InstanceId,
        /// Name of the attack used.
        attack: String,
    },
    /// A character stopped fighting an opponent that is gone or dead.
    Disengaged {
        /// The character that stopped.
        character: InstanceId,
        /// The opponent it forgot.
        opponent: InstanceId,
    },

    // Lifecycle
    /// A character died and was removed from its location.
    Died {
        /// The dead character.
        character: InstanceId,
    },
    /// A dead character's inventory fell to the floor.
    Dropped {
        /// The dead character.
        character: InstanceId,
        /// What fell, in inventory order.
        objects: Vec<InstanceId>,
    },

    // World
    /// An object changed holder or location.
    Moved {
        /// The object that moved.
        object: InstanceId,
        /// ID of the location it left.
        from: String,
        /// ID of the location it arrived in.
        to: String,
    },
    /// A door was unlocked with a key.
    DoorUnlocked {
        /// ID of the door.
        door: String,
        /// The key used.
        key: InstanceId,
    },

    // Custom
    /// A user-defined event.
    Custom {
        /// A label identifying the custom event type.
        label: String,
        /// The objects involved in this custom event.
        objects: Vec<InstanceId>,
    },
}

impl SimEventKind {
    /// Check whether a given object is involved in this event.
    pub fn involves(&self, id: InstanceId) -> bool {
        match self {
            Self::AttackHit {
                attacker, target, ..
            }
            | Self::AttackMissed {
                attacker, target, ..
            } => *attacker == id || *target == id,
            Self::Disengaged {
                character,
                opponent,
            } => *character == id || *opponent == id,
            Self::Died { character } => *character == id,
            Self::Dropped { character, objects } => *character == id || objects.contains(&id),
            Self::Moved { object, .. } => *object == id,
            Self::DoorUnlocked { key, .. } => *key == id,
            Self::Custom { objects, .. } => objects.contains(&id),
        }
    }
}

/// A record of something that happened during simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimEvent {
    /// The simulation tick when this event occurred.
    pub tick: u64,
    /// The specific kind of event that occurred.
    pub kind: SimEventKind,
    /// Narration line for the event.
    pub description: String,
}

impl SimEvent {
    /// Create a new simulation event with the given tick, kind, and description.
    pub fn new(tick: u64, kind: SimEventKind, description: impl Into<String>) -> Self {
        Self {
            tick,
            kind,
            description: description.into(),
        }
    }
}

/// Accumulates events during a simulation run and forwards each one to
/// every live subscriber.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
    max_events: usize,
    subscribers: Vec<Sender<SimEvent>>,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
            subscribers: Vec::new(),
        }
    }

    /// Open a new subscription. The receiver sees every event pushed after
    /// this call. Dropping the receiver ends the subscription.
    pub fn subscribe(&mut self) -> Receiver<SimEvent> {
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.subscribers.push(sender);
        receiver
    }

    /// Number of subscriptions still open as of the last push.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Append an event, dropping the oldest events if the log exceeds its capacity.
    pub fn push(&mut self, event: SimEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());

        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Return a slice of all recorded events.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Return all events that occurred at the given tick.
    pub fn events_at_tick(&self, tick: u64) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.tick == tick).collect()
    }

    /// Return all events involving the given object.
    pub fn events_for_object(&self, id: InstanceId) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.kind.involves(id)).collect()
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove all recorded events. Subscriptions stay open.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn died(tick: u64, character: InstanceId) -> SimEvent {
        SimEvent::new(tick, SimEventKind::Died { character }, "test")
    }

    #[test]
    fn event_log_push_and_query() {
        let mut log = EventLog::new(0);
        let id = InstanceId::new();
        log.push(died(1, id));
        assert_eq!(log.len(), 1);
        assert_eq!(log.events_at_tick(1).len(), 1);
        assert_eq!(log.events_for_object(id).len(), 1);
        assert!(log.events_for_object(InstanceId::new()).is_empty());
    }

    #[test]
    fn event_log_max_events_trims() {
        let mut log = EventLog::new(2);
        let id = InstanceId::new();
        for i in 0..5 {
            log.push(died(i, id));
        }
        assert_eq!(log.len(), 2);
        assert_eq!(log.events()[0].tick, 3);
        assert_eq!(log.events()[1].tick, 4);
    }

    #[test]
    fn event_kind_involves_object() {
        let a = InstanceId::new();
        let b = InstanceId::new();
        let c = InstanceId::new();

        let kind = SimEventKind::AttackHit {
            attacker: a,
            target: b,
            attack: "punch".into(),
            damage: 3,
        };
        assert!(kind.involves(a));
        assert!(kind.involves(b));
        assert!(!kind.involves(c));

        let kind = SimEventKind::Dropped {
            character: a,
            objects: vec![b],
        };
        assert!(kind.involves(b));
        assert!(!kind.involves(c));

        let kind = SimEventKind::Moved {
            object: c,
            from: "hall".into(),
            to: "vault".into(),
        };
        assert!(kind.involves(c));
        assert!(!kind.involves(a));
    }

    #[test]
    fn subscribers_receive_every_event() {
        let mut log = EventLog::new(1);
        let first = log.subscribe();
        let second = log.subscribe();
        let id = InstanceId::new();

        log.push(died(1, id));
        log.push(died(2, id));

        let ticks: Vec<u64> = first.try_iter().map(|e| e.tick).collect();
        assert_eq!(ticks, vec![1, 2]);
        assert_eq!(second.try_iter().count(), 2);
        // The log itself is bounded, the channel is not.
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut log = EventLog::new(0);
        let kept = log.subscribe();
        drop(log.subscribe());
        assert_eq!(log.subscriber_count(), 2);

        log.push(died(1, InstanceId::new()));
        assert_eq!(log.subscriber_count(), 1);
        assert_eq!(kept.try_iter().count(), 1);
    }

    #[test]
    fn event_log_clear() {
        let mut log = EventLog::new(0);
        log.push(died(1, InstanceId::new()));
        assert!(!log.is_empty());
        log.clear();
        assert!(log.is_empty());
    }
}
