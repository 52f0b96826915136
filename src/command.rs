use crate::engine::ScheduleError;
use crate::model::ScheduleRequest;

/// Parsed command from one line of driver input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Schedule(ScheduleRequest),
    AddPerson { id: i64, name: String },
    AddRoom { id: i64, name: String },
    Meetings,
    Export,
    Persons,
    Rooms,
    Help,
    Exit,
}

pub const HELP: &str = "\
commands:
  schedule <name> <start> <end> <room_id> [person_id ...]   book a meeting
  person <id> <name>                                        register a person
  room <id> <name>                                          register a room
  meetings                                                  list all meetings
  export                                                    dump meetings as JSON lines
  persons | rooms                                           list the registries
  help | exit";

fn parse_id(token: &str, what: &'static str) -> Result<i64, ScheduleError> {
    token
        .parse::<i64>()
        .map_err(|_| ScheduleError::InvalidRequest(what))
}

/// Parse one input line into a `Command`. Blank lines parse to `None`.
/// Anything malformed (missing fields, non-integer ids) is an
/// `InvalidRequest` — it never reaches the scheduler, let alone the store.
pub fn parse_line(line: &str) -> Result<Option<Command>, ScheduleError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&verb, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let cmd = match verb {
        "schedule" => {
            // name, start, end, room id; attendees may be empty.
            if args.len() < 4 {
                return Err(ScheduleError::InvalidRequest("insufficient arguments"));
            }
            let room_id = parse_id(args[3], "room id must be an integer")?;
            let mut person_ids = Vec::with_capacity(args.len() - 4);
            for token in &args[4..] {
                person_ids.push(parse_id(token, "person id must be an integer")?);
            }
            Command::Schedule(ScheduleRequest {
                name: args[0].to_string(),
                start: args[1].to_string(),
                end: args[2].to_string(),
                room_id,
                person_ids,
            })
        }
        "person" | "room" => {
            if args.len() < 2 {
                return Err(ScheduleError::InvalidRequest("insufficient arguments"));
            }
            let id = parse_id(args[0], "id must be an integer")?;
            let name = args[1..].join(" ");
            if verb == "person" {
                Command::AddPerson { id, name }
            } else {
                Command::AddRoom { id, name }
            }
        }
        "meetings" => Command::Meetings,
        "export" => Command::Export,
        "persons" => Command::Persons,
        "rooms" => Command::Rooms,
        "help" => Command::Help,
        "exit" | "quit" => Command::Exit,
        _ => return Err(ScheduleError::InvalidRequest("unknown command")),
    };
    Ok(Some(cmd))
}
