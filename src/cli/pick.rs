//! Pick command handler
//!
//! Interactive picker on stdin: type to search, select a result or a point,
//! adjust fields, then confirm. Searches run on the debounce timer exactly as
//! they would behind a search box.

use crate::cli::{open_session, print_location};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::location::{Location, LocationPatch};
use crate::geo::GeoBackend;
use crate::picker::search::is_searchable;
use crate::picker::{Phase, PickerSession, PickerSnapshot};
use clap::Args;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

/// How often a pending search is checked for results
const SETTLE_POLL: Duration = Duration::from_millis(50);

/// Pick command arguments
#[derive(Args)]
pub struct PickArgs {
    /// Reopen on a previously confirmed location (JSON file)
    #[arg(long)]
    pub from: Option<PathBuf>,

    /// Write the confirmed location to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// One line of picker input
#[derive(Debug, PartialEq)]
enum Command {
    Query(String),
    Select(usize),
    Point(f64, f64),
    Pincode(String),
    Set(LocationPatch),
    Show,
    Confirm,
    Cancel,
    Help,
    Quit,
}

const HELP: &str = "\
Commands:
  q <text>             type into the search box (empty text clears it);
                       results print when the search comes back
  select <n>           choose search result n
  point <lat> <lng>    select a point on the map
  pincode <code>       look up a pincode
  set <field> <value>  edit place, district, state or pincode
  show                 print the current state
  confirm              confirm the location and exit
  cancel               clear everything
  quit                 exit without confirming";

/// Parse one input line
fn parse_command(line: &str) -> std::result::Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word {
        "q" | "query" => Ok(Command::Query(rest.to_string())),
        "select" | "s" => rest
            .parse()
            .map(Command::Select)
            .map_err(|_| format!("Expected a result number, got '{}'", rest)),
        "point" | "p" => {
            let parts: Vec<&str> = rest
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|p| !p.is_empty())
                .collect();
            match parts.as_slice() {
                [lat, lng] => {
                    let lat = lat.parse().map_err(|_| format!("Invalid latitude '{}'", lat))?;
                    let lng = lng.parse().map_err(|_| format!("Invalid longitude '{}'", lng))?;
                    Ok(Command::Point(lat, lng))
                }
                _ => Err("Usage: point <lat> <lng>".to_string()),
            }
        }
        "pincode" | "pin" => Ok(Command::Pincode(rest.to_string())),
        "set" => parse_set(rest),
        "show" | "" => Ok(Command::Show),
        "confirm" => Ok(Command::Confirm),
        "cancel" | "clear" => Ok(Command::Cancel),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("Unknown command '{}' (try 'help')", other)),
    }
}

fn parse_set(rest: &str) -> std::result::Result<Command, String> {
    let (field, value) = rest
        .split_once(char::is_whitespace)
        .map(|(f, v)| (f, v.trim().to_string()))
        .unwrap_or((rest, String::new()));

    let mut patch = LocationPatch::default();
    match field {
        "place" => patch.place = Some(value),
        "district" => patch.district = Some(value),
        "state" => patch.state = Some(value),
        "pincode" => patch.pincode = Some(value),
        "" => return Err("Usage: set <field> <value>".to_string()),
        other => return Err(format!("Unknown field '{}'", other)),
    }
    Ok(Command::Set(patch))
}

fn print_snapshot(snapshot: &PickerSnapshot) {
    let searching = if snapshot.searching { " (searching)" } else { "" };
    println!("[{}] query: '{}'{}", snapshot.phase, snapshot.query, searching);
    for (i, result) in snapshot.results.iter().enumerate() {
        println!("  {:>2}. {}", i, result.display_name);
    }
    if snapshot.phase != Phase::Empty {
        println!("  location: {}", snapshot.location);
    }
}

/// Run the pick command
pub async fn run(args: PickArgs) -> Result<()> {
    let config = Config::load()?;
    let initial = match &args.from {
        Some(path) => Some(serde_json::from_str::<Location>(&fs::read_to_string(path)?)?),
        None => None,
    };
    let picker = open_session(&config, initial)?;

    println!("{}", HELP);
    print_snapshot(&picker.snapshot().await);

    let mut watcher: Option<JoinHandle<()>> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{}", message);
                continue;
            }
        };

        let outcome = match command {
            Command::Query(text) => {
                let outcome = picker.set_query(&text).await;
                if let Some(previous) = watcher.take() {
                    previous.abort();
                }
                if outcome.is_ok() && is_searchable(&text, picker.settings().min_query_chars) {
                    watcher = Some(tokio::spawn(print_when_settled(picker.clone())));
                }
                outcome
            }
            Command::Select(index) => picker.select_result(index).await.map(|_| ()),
            Command::Point(lat, lng) => match picker.select_point(lat, lng).await {
                Ok(handle) => handle
                    .await
                    .map_err(|e| Error::Server(format!("Reverse geocoding task failed: {}", e))),
                Err(e) => Err(e),
            },
            Command::Pincode(pincode) => match picker.lookup_pincode(&pincode).await {
                Ok(handle) => handle
                    .await
                    .map_err(|e| Error::Server(format!("Pincode lookup task failed: {}", e))),
                Err(e) => Err(e),
            },
            Command::Set(patch) => picker.edit(patch).await.map(|_| ()),
            Command::Show => Ok(()),
            Command::Confirm => match picker.confirm().await {
                Ok(location) => return write_confirmed(&location, args.output.as_ref()),
                Err(e) => Err(e),
            },
            Command::Cancel => {
                picker.cancel().await;
                Ok(())
            }
            Command::Help => {
                println!("{}", HELP);
                continue;
            }
            Command::Quit => break,
        };

        match outcome {
            Ok(()) => print_snapshot(&picker.snapshot().await),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    if let Some(watcher) = watcher {
        watcher.abort();
    }
    picker.close().await;
    Ok(())
}

/// Print the session again once its pending search has come back
async fn print_when_settled<B: GeoBackend>(picker: PickerSession<B>) {
    loop {
        tokio::time::sleep(SETTLE_POLL).await;
        if picker.search_settled().await {
            break;
        }
    }
    print_snapshot(&picker.snapshot().await);
}

fn write_confirmed(location: &Location, output: Option<&PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, serde_json::to_string_pretty(location)?)?;
            eprintln!("Location written to {}", path.display());
            Ok(())
        }
        None => print_location(location, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query() {
        assert_eq!(
            parse_command("q  Navi Mumbai ").unwrap(),
            Command::Query("Navi Mumbai".to_string())
        );
        assert_eq!(parse_command("q").unwrap(), Command::Query(String::new()));
    }

    #[test]
    fn test_parse_point() {
        assert_eq!(
            parse_command("point 18.52 73.85").unwrap(),
            Command::Point(18.52, 73.85)
        );
        assert_eq!(
            parse_command("p -33.86, 151.2").unwrap(),
            Command::Point(-33.86, 151.2)
        );
        assert!(parse_command("point 18.52").is_err());
        assert!(parse_command("point north east").is_err());
    }

    #[test]
    fn test_parse_select() {
        assert_eq!(parse_command("select 2").unwrap(), Command::Select(2));
        assert!(parse_command("select first").is_err());
    }

    #[test]
    fn test_parse_set() {
        let Command::Set(patch) = parse_command("set district Mumbai Suburban").unwrap() else {
            panic!("expected set command");
        };
        assert_eq!(patch.district.as_deref(), Some("Mumbai Suburban"));
        assert!(patch.place.is_none());

        assert!(parse_command("set country India").is_err());
        assert!(parse_command("set").is_err());
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse_command("").unwrap(), Command::Show);
        assert_eq!(parse_command("confirm").unwrap(), Command::Confirm);
        assert_eq!(parse_command("cancel").unwrap(), Command::Cancel);
        assert_eq!(parse_command("quit").unwrap(), Command::Quit);
        assert!(parse_command("teleport").is_err());
    }
}
