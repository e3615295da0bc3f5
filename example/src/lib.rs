//! Terminal front end for `tessera-calendar`.
//!
//! Builds a calendar from command line options, replays selections, month
//! navigation and taps, then prints the resulting month grid.
mod cli;
mod terminal_host;

use anyhow::Context as _;
use tessera_calendar::{Calendar, CalendarEvent};
use tracing::info;

pub use cli::{Cli, FirstDay};
pub use terminal_host::{TerminalHost, render};

/// Parses the command line, runs the demo and prints the grid.
pub fn run() -> anyhow::Result<()> {
    use clap::Parser as _;

    init_tracing();
    let cli = Cli::parse();
    print!("{}", run_with(&cli)?);
    Ok(())
}

/// Runs the demo for already parsed options and returns the rendered grid.
pub fn run_with(cli: &Cli) -> anyhow::Result<String> {
    let mut calendar = Calendar::new(cli.config(), TerminalHost::default());
    calendar.on_event(|event, _| {
        if let CalendarEvent::DayTapped(record) = event {
            info!(
                "Tapped {} at {:?}, selected: {}",
                record.date(),
                record.position(),
                record.is_selected()
            );
        }
    });

    if !cli.select.is_empty() {
        calendar
            .set_selected_dates(cli.select.iter().copied())
            .context("failed to apply --select")?;
    }
    for _ in 0..cli.months.unsigned_abs() {
        if cli.months > 0 {
            calendar.next_month();
        } else {
            calendar.previous_month();
        }
    }
    for position in &cli.taps {
        calendar
            .tap(*position)
            .with_context(|| format!("failed to tap {position:?}"))?;
    }

    info!(
        "Rendering {} with {} live widgets",
        calendar.config().displayed_month,
        calendar.host().live_widgets()
    );
    Ok(render(&calendar))
}

fn init_tracing() {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match tracing_subscriber::EnvFilter::try_new("error,tessera_calendar=info") {
            Ok(filter) => filter,
            Err(_) => tracing_subscriber::EnvFilter::new("error"),
        },
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::*;

    fn grid(args: &[&str]) -> Vec<Vec<String>> {
        let argv = std::iter::once("example").chain(args.iter().copied());
        let cli = Cli::try_parse_from(argv).unwrap();
        run_with(&cli)
            .unwrap()
            .lines()
            .map(|line| line.split_whitespace().map(String::from).collect())
            .collect()
    }

    #[test]
    fn renders_june_2023() {
        let lines = grid(&["--month", "2023-06"]);
        assert_eq!(lines[0], vec!["2023-06"]);
        assert_eq!(
            lines[1],
            vec!["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
        );
        assert_eq!(lines[2], vec!["29", "30", "31", "1", "2", "3", "4"]);
        assert_eq!(lines.len(), 2 + 5);
    }

    #[test]
    fn hides_weekends_and_filler() {
        let lines = grid(&["--month=2023-06", "--hide-weekends", "--hide-adjacent"]);
        assert_eq!(lines[1], vec!["Mon", "Tue", "Wed", "Thu", "Fri"]);
        assert_eq!(lines[2], vec!["1", "2"]);
        assert_eq!(lines[6], vec!["26", "27", "28", "29", "30"]);
    }

    #[test]
    fn selection_survives_navigation_and_taps_toggle() {
        let lines = grid(&[
            "--month",
            "2023-07",
            "--multi",
            "--select",
            "2023-06-15",
            "--months=-1",
            "--tap",
            "1,0",
        ]);
        assert!(lines[4].contains(&"15*".to_string()));
        assert!(lines[3].contains(&"5*".to_string()));
    }

    #[test]
    fn single_select_rejects_two_dates() {
        let cli = Cli::try_parse_from([
            "example",
            "--month",
            "2023-06",
            "--select",
            "2023-06-01",
            "--select",
            "2023-06-02",
        ])
        .unwrap();
        assert!(run_with(&cli).is_err());
    }
}
