#[derive(Debug)]
pub enum ScheduleError {
    /// Malformed request — rejected before any store access.
    InvalidRequest(&'static str),
    /// The room already hosts a meeting colliding with the candidate window.
    RoomConflict(i64),
    /// The named person already attends a colliding meeting.
    AttendeeUnavailable(i64),
    /// The store could not complete the commit; no partial state remains.
    Storage(String),
}

impl std::fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleError::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
            ScheduleError::RoomConflict(id) => write!(f, "room conflict with meeting {id}"),
            ScheduleError::AttendeeUnavailable(id) => {
                write!(f, "person {id} is not available")
            }
            ScheduleError::Storage(e) => write!(f, "storage failure: {e}"),
        }
    }
}

impl std::error::Error for ScheduleError {}
