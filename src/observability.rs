use std::net::SocketAddr;

use crate::command::Command;

/// Counter: schedule attempts. Labels: outcome.
pub const SCHEDULE_TOTAL: &str = "quorum_schedule_total";

/// Counter: driver commands executed. Labels: command, status.
pub const COMMANDS_TOTAL: &str = "quorum_commands_total";

/// Histogram: command latency in seconds. Labels: command.
pub const COMMAND_DURATION_SECONDS: &str = "quorum_command_duration_seconds";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}

/// Map a Command variant to a short label for metrics.
pub fn command_label(cmd: &Command) -> &'static str {
    match cmd {
        Command::Schedule(_) => "schedule",
        Command::AddPerson { .. } => "person",
        Command::AddRoom { .. } => "room",
        Command::Meetings => "meetings",
        Command::Export => "export",
        Command::Persons => "persons",
        Command::Rooms => "rooms",
        Command::Help => "help",
        Command::Exit => "exit",
    }
}
