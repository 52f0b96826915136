use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use quorum::command::{self, Command};
use quorum::engine::{Engine, ScheduleError};
use quorum::model::{MeetingRow, Ms};
use quorum::observability;
use quorum::store::WalStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let metrics_port: Option<u16> = std::env::var("QUORUM_METRICS_PORT")
        .ok()
        .and_then(|s| s.parse().ok());
    observability::init(metrics_port);

    let data_dir = std::env::var("QUORUM_DATA_DIR").unwrap_or_else(|_| "./data".into());
    std::fs::create_dir_all(&data_dir)?;
    let wal_path = PathBuf::from(&data_dir).join("calendar.wal");

    let store = Arc::new(WalStore::open(&wal_path)?);
    let engine = Arc::new(Engine::open(store).await?);

    info!("quorum calendar ready");
    info!("  data_dir: {data_dir}");
    info!(
        "  metrics: {}",
        metrics_port.map_or("disabled".to_string(), |p| format!(
            "http://0.0.0.0:{p}/metrics"
        ))
    );
    println!("Welcome to the quorum calendar. Type 'help' to see available commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let line = tokio::select! {
            line = lines.next_line() => match line? {
                Some(l) => l,
                None => break, // stdin closed
            },
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };

        let cmd = match command::parse_line(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        let label = observability::command_label(&cmd);
        let started = std::time::Instant::now();
        let (quit, status) = dispatch(&engine, cmd).await;
        metrics::histogram!(observability::COMMAND_DURATION_SECONDS, "command" => label)
            .record(started.elapsed().as_secs_f64());
        metrics::counter!(observability::COMMANDS_TOTAL, "command" => label, "status" => status)
            .increment(1);
        if quit {
            break;
        }
    }

    info!("quorum stopped");
    Ok(())
}

/// Execute one command and print its human-readable result.
/// Returns (quit, metrics status label).
async fn dispatch(engine: &Engine, cmd: Command) -> (bool, &'static str) {
    match cmd {
        Command::Schedule(req) => match engine.schedule(&req).await {
            Ok(id) => {
                println!("Meeting {id} scheduled successfully.");
                (false, "ok")
            }
            Err(ScheduleError::RoomConflict(_)) => {
                println!("Collision detected. Meeting cannot be scheduled.");
                (false, "error")
            }
            Err(ScheduleError::AttendeeUnavailable(_)) => {
                println!("Some attendees are not available at that time.");
                (false, "error")
            }
            Err(e) => {
                println!("{e}");
                (false, "error")
            }
        },
        Command::AddPerson { id, name } => match engine.add_person(id, name).await {
            Ok(()) => {
                println!("Person {id} added.");
                (false, "ok")
            }
            Err(e) => {
                println!("{e}");
                (false, "error")
            }
        },
        Command::AddRoom { id, name } => match engine.add_room(id, name).await {
            Ok(()) => {
                println!("Room {id} added.");
                (false, "ok")
            }
            Err(e) => {
                println!("{e}");
                (false, "error")
            }
        },
        Command::Meetings => {
            let rows = engine.meetings().await;
            if rows.is_empty() {
                println!("No meetings scheduled.");
            }
            for row in rows {
                println!("{}", render_row(&row));
            }
            (false, "ok")
        }
        Command::Export => {
            let rows = engine.meetings().await;
            for row in rows {
                match serde_json::to_string(&row) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        println!("export failed: {e}");
                        return (false, "error");
                    }
                }
            }
            (false, "ok")
        }
        Command::Persons => {
            for p in engine.persons().await {
                println!("{}  {}", p.id, p.name);
            }
            (false, "ok")
        }
        Command::Rooms => {
            for r in engine.rooms().await {
                println!("{}  {}", r.id, r.name);
            }
            (false, "ok")
        }
        Command::Help => {
            println!("{}", command::HELP);
            (false, "ok")
        }
        Command::Exit => {
            println!("Exiting...");
            (true, "ok")
        }
    }
}

fn render_ts(ms: Ms) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.naive_utc().format("%Y-%m-%dT%H:%M:%S").to_string())
        .unwrap_or_else(|| ms.to_string())
}

fn render_row(row: &MeetingRow) -> String {
    let attendees = row
        .attendees
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "{}  {}  {} .. {}  room {}  attendees [{}]",
        row.id,
        row.name,
        render_ts(row.start),
        render_ts(row.end),
        row.room_id,
        attendees
    )
}
