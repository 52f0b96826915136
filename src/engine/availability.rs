use crate::model::{CalendarState, Window};

use super::overlap::overlaps;

// ── Availability checks ──────────────────────────────────────────
//
// Pure reads over the calendar relations. Committed meetings play the
// role of interval A in the overlap predicate, the candidate window is
// interval B.

/// Does any committed meeting in `room_id` collide with `candidate`?
/// Returns the first colliding meeting's id.
pub fn room_conflict(state: &CalendarState, room_id: i64, candidate: &Window) -> Option<i64> {
    state
        .meetings_in_room(room_id)
        .find(|m| overlaps(&m.window, candidate))
        .map(|m| m.id)
}

/// Are all `person_ids` free during `candidate`?
///
/// Persons are checked in input order and the scan short-circuits on the
/// first person with a colliding meeting, returning that person's id.
pub fn attendees_available(
    state: &CalendarState,
    person_ids: &[i64],
    candidate: &Window,
) -> Result<(), i64> {
    for &pid in person_ids {
        let busy = state
            .meetings_for_person(pid)
            .any(|m| overlaps(&m.window, candidate));
        if busy {
            return Err(pid);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Event;

    fn state_with_meeting(room_id: i64, start: i64, end: i64, attendees: Vec<i64>) -> CalendarState {
        let mut state = CalendarState::new();
        state.apply(&Event::MeetingBooked {
            id: 1,
            name: "existing".into(),
            window: Window::new(start, end),
            room_id,
            attendees,
        });
        state
    }

    #[test]
    fn room_conflict_detects_collision() {
        let state = state_with_meeting(1, 1000, 2000, vec![]);
        assert_eq!(room_conflict(&state, 1, &Window::new(1500, 1700)), Some(1));
    }

    #[test]
    fn room_conflict_ignores_other_rooms() {
        let state = state_with_meeting(1, 1000, 2000, vec![]);
        assert_eq!(room_conflict(&state, 2, &Window::new(1500, 1700)), None);
    }

    #[test]
    fn room_conflict_clear_window() {
        let state = state_with_meeting(1, 1000, 2000, vec![]);
        assert_eq!(room_conflict(&state, 1, &Window::new(2100, 3000)), None);
    }

    #[test]
    fn attendees_available_when_free() {
        let state = state_with_meeting(1, 1000, 2000, vec![5]);
        assert_eq!(
            attendees_available(&state, &[5, 6], &Window::new(3000, 4000)),
            Ok(())
        );
    }

    #[test]
    fn attendee_busy_in_another_room() {
        let state = state_with_meeting(2, 1000, 2000, vec![5]);
        // Candidate is in a different room; the person is still double-booked.
        assert_eq!(
            attendees_available(&state, &[5], &Window::new(1500, 1700)),
            Err(5)
        );
    }

    #[test]
    fn first_busy_person_in_input_order_wins() {
        let mut state = state_with_meeting(1, 1000, 2000, vec![5]);
        state.apply(&Event::MeetingBooked {
            id: 2,
            name: "other".into(),
            window: Window::new(1000, 2000),
            room_id: 2,
            attendees: vec![3],
        });
        assert_eq!(
            attendees_available(&state, &[3, 5], &Window::new(1500, 1700)),
            Err(3)
        );
        assert_eq!(
            attendees_available(&state, &[5, 3], &Window::new(1500, 1700)),
            Err(5)
        );
    }

    #[test]
    fn empty_attendee_list_is_available() {
        let state = state_with_meeting(1, 1000, 2000, vec![]);
        assert_eq!(attendees_available(&state, &[], &Window::new(0, 9000)), Ok(()));
    }
}
