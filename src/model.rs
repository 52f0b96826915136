use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Unix milliseconds — the only time type.
pub type Ms = i64;

/// A meeting's time window `[start, end]`. Invariant: `start < end`,
/// enforced at request validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: Ms,
    pub end: Ms,
}

impl Window {
    pub fn new(start: Ms, end: Ms) -> Self {
        debug_assert!(start < end, "Window start must be before end");
        Self { start, end }
    }

    pub fn duration_ms(&self) -> Ms {
        self.end - self.start
    }

    /// Inclusive containment of an instant.
    pub fn contains(&self, t: Ms) -> bool {
        self.start <= t && t <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub name: String,
}

/// A committed meeting. Immutable once committed — there is no
/// reschedule or cancel operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: i64,
    pub name: String,
    pub window: Window,
    pub room_id: i64,
}

/// Join row linking a meeting to one invited person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    pub meeting_id: i64,
    pub person_id: i64,
}

/// The event types — flat, no nesting. This is the WAL record format.
///
/// A booking is a single event carrying the meeting and its whole attendee
/// list, so the multi-row commit is atomic by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    PersonAdded {
        id: i64,
        name: String,
    },
    RoomAdded {
        id: i64,
        name: String,
    },
    MeetingBooked {
        id: i64,
        name: String,
        window: Window,
        room_id: i64,
        attendees: Vec<i64>,
    },
}

/// The four relations plus the meeting id sequence. Lives behind the
/// engine's lock; all mutation goes through `apply`.
#[derive(Debug, Clone)]
pub struct CalendarState {
    pub persons: HashMap<i64, Person>,
    pub rooms: HashMap<i64, Room>,
    pub meetings: BTreeMap<i64, Meeting>,
    pub attendees: Vec<Attendance>,
    next_meeting_id: i64,
}

impl Default for CalendarState {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarState {
    pub fn new() -> Self {
        Self {
            persons: HashMap::new(),
            rooms: HashMap::new(),
            meetings: BTreeMap::new(),
            attendees: Vec::new(),
            next_meeting_id: 1,
        }
    }

    /// The id the next committed meeting will receive.
    pub fn next_meeting_id(&self) -> i64 {
        self.next_meeting_id
    }

    /// Apply an event. Used both for live commits and WAL replay.
    pub fn apply(&mut self, event: &Event) {
        match event {
            Event::PersonAdded { id, name } => {
                self.persons.insert(*id, Person { id: *id, name: name.clone() });
            }
            Event::RoomAdded { id, name } => {
                self.rooms.insert(*id, Room { id: *id, name: name.clone() });
            }
            Event::MeetingBooked { id, name, window, room_id, attendees } => {
                self.meetings.insert(
                    *id,
                    Meeting {
                        id: *id,
                        name: name.clone(),
                        window: *window,
                        room_id: *room_id,
                    },
                );
                for pid in attendees {
                    self.attendees.push(Attendance {
                        meeting_id: *id,
                        person_id: *pid,
                    });
                }
                self.next_meeting_id = self.next_meeting_id.max(id + 1);
            }
        }
    }

    /// All committed meetings hosted by a room.
    pub fn meetings_in_room(&self, room_id: i64) -> impl Iterator<Item = &Meeting> {
        self.meetings.values().filter(move |m| m.room_id == room_id)
    }

    /// All committed meetings a person attends (attendance join).
    pub fn meetings_for_person(&self, person_id: i64) -> impl Iterator<Item = &Meeting> {
        self.attendees
            .iter()
            .filter(move |a| a.person_id == person_id)
            .filter_map(|a| self.meetings.get(&a.meeting_id))
    }

    /// Attendee ids of one meeting, in commit order.
    pub fn attendees_of(&self, meeting_id: i64) -> Vec<i64> {
        self.attendees
            .iter()
            .filter(|a| a.meeting_id == meeting_id)
            .map(|a| a.person_id)
            .collect()
    }
}

/// What the driver hands to the scheduler. Timestamps stay raw ISO-8601
/// strings here; the scheduler's validation step parses them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRequest {
    pub name: String,
    pub start: String,
    pub end: String,
    pub room_id: i64,
    pub person_ids: Vec<i64>,
}

// ── Query result types ───────────────────────────────────────────

/// One meeting row for dump/export, attendees included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeetingRow {
    pub id: i64,
    pub name: String,
    pub start: Ms,
    pub end: Ms,
    pub room_id: i64,
    pub attendees: Vec<i64>,
}
