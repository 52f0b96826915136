mod availability;
mod error;
mod overlap;

pub use availability::{attendees_available, room_conflict};
pub use error::ScheduleError;
pub use overlap::overlaps;

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tokio::sync::RwLock;
use tracing::info;

use crate::model::{CalendarState, Event, MeetingRow, Ms, Person, Room, ScheduleRequest, Window};
use crate::observability;
use crate::store::Store;

/// The scheduling core: in-memory relations behind one lock, plus the
/// injected durable store. `schedule` is the sole booking entry point.
///
/// The whole check-then-commit sequence runs under a single write guard,
/// which serializes every in-flight `schedule` call — the simple global
/// serialization point this low-throughput core needs to never
/// double-book a room or a person.
pub struct Engine {
    state: RwLock<CalendarState>,
    store: Arc<dyn Store>,
}

/// Parse an ISO-8601 timestamp into Unix milliseconds. Accepts RFC 3339,
/// `YYYY-MM-DDTHH:MM[:SS]`, and bare dates; naive forms are read as UTC.
fn parse_ts(s: &str) -> Option<Ms> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Request shape validation — the step that keeps malformed input away
/// from the store. Duplicate attendee ids are dropped, first occurrence
/// kept, so a booking writes one attendance row per (meeting, person).
fn validate(req: &ScheduleRequest) -> Result<(Window, Vec<i64>), ScheduleError> {
    if req.name.is_empty() {
        return Err(ScheduleError::InvalidRequest("meeting name is empty"));
    }
    let start = parse_ts(&req.start)
        .ok_or(ScheduleError::InvalidRequest("unparseable start timestamp"))?;
    let end = parse_ts(&req.end)
        .ok_or(ScheduleError::InvalidRequest("unparseable end timestamp"))?;
    if start >= end {
        return Err(ScheduleError::InvalidRequest("start must be before end"));
    }

    let mut attendees: Vec<i64> = Vec::with_capacity(req.person_ids.len());
    for &pid in &req.person_ids {
        if !attendees.contains(&pid) {
            attendees.push(pid);
        }
    }
    Ok((Window::new(start, end), attendees))
}

impl Engine {
    /// Replay the store's event history and start serving.
    pub async fn open(store: Arc<dyn Store>) -> Result<Self, ScheduleError> {
        let events = store
            .replay()
            .await
            .map_err(|e| ScheduleError::Storage(e.to_string()))?;
        let mut state = CalendarState::new();
        for event in &events {
            state.apply(event);
        }
        info!(
            persons = state.persons.len(),
            rooms = state.rooms.len(),
            meetings = state.meetings.len(),
            "calendar state replayed"
        );
        Ok(Self {
            state: RwLock::new(state),
            store,
        })
    }

    /// Book a meeting, or say why it cannot be booked.
    ///
    /// Steps, each a hard precondition for the next: validate the request
    /// shape, check the room, check every attendee, then commit the
    /// booking event (meeting + attendance rows) atomically.
    pub async fn schedule(&self, req: &ScheduleRequest) -> Result<i64, ScheduleError> {
        let (window, attendees) = match validate(req) {
            Ok(parts) => parts,
            Err(e) => {
                metrics::counter!(observability::SCHEDULE_TOTAL, "outcome" => "invalid")
                    .increment(1);
                return Err(e);
            }
        };

        let mut state = self.state.write().await;

        if let Some(meeting_id) = room_conflict(&state, req.room_id, &window) {
            metrics::counter!(observability::SCHEDULE_TOTAL, "outcome" => "room_conflict")
                .increment(1);
            return Err(ScheduleError::RoomConflict(meeting_id));
        }
        if let Err(person_id) = attendees_available(&state, &attendees, &window) {
            metrics::counter!(observability::SCHEDULE_TOTAL, "outcome" => "attendee_unavailable")
                .increment(1);
            return Err(ScheduleError::AttendeeUnavailable(person_id));
        }

        let id = state.next_meeting_id();
        let event = Event::MeetingBooked {
            id,
            name: req.name.clone(),
            window,
            room_id: req.room_id,
            attendees,
        };
        if let Err(e) = self.store.commit(&event).await {
            metrics::counter!(observability::SCHEDULE_TOTAL, "outcome" => "storage_failure")
                .increment(1);
            return Err(ScheduleError::Storage(e.to_string()));
        }
        state.apply(&event);

        metrics::counter!(observability::SCHEDULE_TOTAL, "outcome" => "booked").increment(1);
        info!(meeting = id, room = req.room_id, "meeting booked");
        Ok(id)
    }

    // ── Admin path ───────────────────────────────────────────

    pub async fn add_person(&self, id: i64, name: String) -> Result<(), ScheduleError> {
        if name.is_empty() {
            return Err(ScheduleError::InvalidRequest("person name is empty"));
        }
        let mut state = self.state.write().await;
        if state.persons.contains_key(&id) {
            return Err(ScheduleError::InvalidRequest("person id already exists"));
        }
        let event = Event::PersonAdded { id, name };
        self.store
            .commit(&event)
            .await
            .map_err(|e| ScheduleError::Storage(e.to_string()))?;
        state.apply(&event);
        Ok(())
    }

    pub async fn add_room(&self, id: i64, name: String) -> Result<(), ScheduleError> {
        if name.is_empty() {
            return Err(ScheduleError::InvalidRequest("room name is empty"));
        }
        let mut state = self.state.write().await;
        if state.rooms.contains_key(&id) {
            return Err(ScheduleError::InvalidRequest("room id already exists"));
        }
        let event = Event::RoomAdded { id, name };
        self.store
            .commit(&event)
            .await
            .map_err(|e| ScheduleError::Storage(e.to_string()))?;
        state.apply(&event);
        Ok(())
    }

    // ── Read-only queries ────────────────────────────────────

    /// Is the room already booked for an overlapping window?
    pub async fn room_has_conflict(&self, room_id: i64, window: &Window) -> bool {
        let state = self.state.read().await;
        room_conflict(&state, room_id, window).is_some()
    }

    /// Are all listed persons free during the window?
    pub async fn attendees_free(&self, person_ids: &[i64], window: &Window) -> bool {
        let state = self.state.read().await;
        attendees_available(&state, person_ids, window).is_ok()
    }

    /// All committed meetings, ordered by id, for the dump/export path.
    pub async fn meetings(&self) -> Vec<MeetingRow> {
        let state = self.state.read().await;
        state
            .meetings
            .values()
            .map(|m| MeetingRow {
                id: m.id,
                name: m.name.clone(),
                start: m.window.start,
                end: m.window.end,
                room_id: m.room_id,
                attendees: state.attendees_of(m.id),
            })
            .collect()
    }

    pub async fn persons(&self) -> Vec<Person> {
        let state = self.state.read().await;
        let mut out: Vec<Person> = state.persons.values().cloned().collect();
        out.sort_by_key(|p| p.id);
        out
    }

    pub async fn rooms(&self) -> Vec<Room> {
        let state = self.state.read().await;
        let mut out: Vec<Room> = state.rooms.values().cloned().collect();
        out.sort_by_key(|r| r.id);
        out
    }
}
