use crate::config::Config;
use crate::error::{Error, Result};
use crate::flight::{FlightLeg, FlightRow};
use crate::logging::Verbosity;
use crate::offset::UtcOffset;
use crate::schedule::book::TripBook;
use crate::schedule::calculator::{ScheduleCalculator, format_duration};
use crate::time::ClockTime;
use crate::trip::{Trip, TripRow};
use chrono::NaiveDate;
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;
use tabled::settings::Style;

mod config;
mod duration;
mod error;
mod flight;
mod logging;
mod offset;
mod schedule;
mod time;
mod trip;

#[derive(Parser)]
#[command(
    version,
    about = "Plan the flights of your trips",
    after_help = "A ready-made trip book ships in data/sample.json; try it with --book data/sample.json"
)]
struct Args {
    /// Path to the JSON trip book (defaults to the configured book_path;
    /// data/sample.json holds a sample book)
    #[arg(short, long, value_name = "FILE")]
    book: Option<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: format!("{} ", cmd),
            })
            .collect();

        Ok((0, candidates))
    }
}

fn paginate(content: String) {
    let spawned = Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        // Fallback to 'more' if 'less' isn't available
        .or_else(|_| Command::new("more").stdin(Stdio::piped()).spawn());

    let Ok(mut pager) = spawned else {
        println!("{}", content);
        return;
    };

    if let Some(mut stdin) = pager.stdin.take() {
        if let Err(e) = stdin.write_all(content.as_bytes()) {
            // Broken pipe is common if the user quits the pager early
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                eprintln!("Error writing to pager: {}", e);
            }
        }
    }

    let _ = pager.wait();
}

fn print_table<T: tabled::Tabled>(rows: &[T]) {
    let mut table = tabled::Table::new(rows);
    table.with(Style::rounded());
    table.with(tabled::settings::Alignment::left());
    if rows.len() > 20 {
        paginate(table.to_string());
    } else {
        println!("{}", table);
    }
}

struct Session {
    book: TripBook,
    calculator: ScheduleCalculator,
    book_path: PathBuf,
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| Error::InvalidDate(s.to_string()))
}

fn parse_offset(s: Option<&&str>) -> Result<Option<UtcOffset>> {
    s.map(|s| s.parse::<UtcOffset>()).transpose()
}

/// Splits what follows `add <date> <dep> <arr>` into at most two
/// `UTC`-labelled offsets and the flight number made of the remaining words.
fn split_add_args(rest: &[&str]) -> Result<(Vec<UtcOffset>, Option<String>)> {
    let mut offsets = vec![];
    while offsets.len() < 2 {
        match rest.get(offsets.len()).map(|s| UtcOffset::parse_labelled(s)).transpose()?.flatten() {
            Some(offset) => offsets.push(offset),
            None => break,
        }
    }
    let flight_number = rest[offsets.len()..].join(" ");
    Ok((offsets, (!flight_number.is_empty()).then_some(flight_number)))
}

/// Edits one text field of a trip. Returns false for an unknown field.
fn edit_trip(book: &mut TripBook, id: &str, field: &str, value: String) -> Result<bool> {
    let mut trip = book
        .trip(id)
        .cloned()
        .ok_or_else(|| Error::TripNotFound(Arc::from(id)))?;
    match field {
        "name" => trip.name = value,
        "destination" => trip.destination = value,
        "description" => trip.description = value,
        other => {
            println!("Unknown field: {} (name, destination, description)", other);
            return Ok(false);
        }
    }
    book.update_trip(id, trip)?;
    Ok(true)
}

fn usage(text: &str) -> Result<bool> {
    println!("Usage: {}", text);
    Ok(false)
}

/// Runs one REPL command. Returns whether the trip book changed.
fn run_command(session: &mut Session, parts: &[&str]) -> Result<bool> {
    let calc = session.calculator;
    match parts[0] {
        "trips" => {
            let selected = session.book.selected_id().cloned();
            let rows: Vec<TripRow> = session
                .book
                .trips()
                .iter()
                .map(|t| TripRow::new(t, selected.as_ref() == Some(&t.id)))
                .collect();
            if rows.is_empty() {
                println!("No trips yet. Create one with 'trip add'.");
            } else {
                print_table(&rows);
            }
            Ok(false)
        }
        "trip" => match parts.get(1).copied() {
            Some("add") if parts.len() >= 6 => {
                let trip = Trip::new(
                    parts[2],
                    parts[3],
                    parse_date(parts[4])?,
                    parse_date(parts[5])?,
                    parts[6..].join(" "),
                )?;
                let id = session.book.add_trip(trip);
                println!("{} {} (now selected)", "Created trip".green(), id);
                Ok(true)
            }
            Some("dates") if parts.len() == 5 => {
                let (start, end) = (parse_date(parts[3])?, parse_date(parts[4])?);
                session
                    .book
                    .trip_mut(parts[2])
                    .ok_or_else(|| Error::TripNotFound(Arc::from(parts[2])))?
                    .update_dates(start, end)?;
                println!("{}", "Trip dates updated.".green());
                Ok(true)
            }
            Some("edit") if parts.len() >= 5 => {
                let changed = edit_trip(&mut session.book, parts[2], parts[3], parts[4..].join(" "))?;
                if changed {
                    println!("{}", "Trip updated (now selected).".green());
                }
                Ok(changed)
            }
            Some("rm") if parts.len() == 3 => {
                let trip = session.book.remove_trip(parts[2])?;
                println!("Removed trip {} with {} flights.", trip.name, trip.flights().len());
                Ok(true)
            }
            _ => usage(
                "trip add <name> <destination> <start> <end> [description] | trip dates <id> <start> <end> \
                 | trip edit <id> <name|destination|description> <value> | trip rm <id>",
            ),
        },
        "use" => match parts.get(1) {
            Some(id) => {
                session.book.select(id)?;
                println!("Selected trip {}.", session.book.selected()?.name.bold());
                Ok(true)
            }
            None => usage("use <trip-id>"),
        },
        "ls" => {
            let trip = session.book.selected()?;
            let ordered = trip.flights_in_order();
            if ordered.is_empty() {
                println!("No flights on {} yet.", trip.name);
            } else {
                let rows: Vec<FlightRow> = ordered.iter().map(|f| FlightRow::new(f, &calc)).collect();
                print_table(&rows);
                println!("Total time in the air: {}", trip.total_flight_time());
            }
            Ok(false)
        }
        "add" if parts.len() >= 4 => {
            let date = parse_date(parts[1])?;
            let dep = parts[2].parse::<ClockTime>()?;
            let arr = parts[3].parse::<ClockTime>()?;

            let (offsets, flight_number) = split_add_args(&parts[4..])?;

            let mut leg = FlightLeg::new(date, &calc);
            if let Some(offset) = offsets.first() {
                leg.set_departure_offset(*offset, &calc);
            }
            if let Some(offset) = offsets.get(1) {
                leg.set_arrival_offset(*offset, &calc);
            }
            leg.set_departure_time(dep, &calc);
            leg.set_arrival_time(arr, &calc);
            leg.flight_number = flight_number;

            let trip = session.book.selected_mut()?;
            if date < trip.start_date() || date > trip.end_date() {
                tracing::warn!(%date, trip = %trip.id, "flight date lies outside the trip");
            }
            let duration = leg.duration();
            let id = trip.add_flight(leg);
            match duration {
                Some(d) => println!("{} {} ({})", "Added flight".green(), id, d),
                None => println!("{} {}", "Added flight".green(), id),
            }
            Ok(true)
        }
        "add" => usage("add <YYYY-MM-DD> <HH:MM> <HH:MM> [UTC±H dep-offset] [UTC±H arr-offset] [flight-no]"),
        "edit" if parts.len() >= 4 => {
            let value = parts[3..].join(" ");
            let leg = session.book.selected_mut()?.flight_for_edit(parts[1], &calc)?;
            match parts[2] {
                "date" => leg.date = parse_date(&value)?,
                "dep" => leg.set_departure_time(value.parse()?, &calc),
                "arr" => leg.set_arrival_time(value.parse()?, &calc),
                "dep-offset" => leg.set_departure_offset(value.parse()?, &calc),
                "arr-offset" => leg.set_arrival_offset(value.parse()?, &calc),
                "number" => leg.flight_number = Some(value),
                other => {
                    println!("Unknown field: {} (date, dep, arr, dep-offset, arr-offset, number)", other);
                    return Ok(false);
                }
            }
            match leg.duration() {
                Some(d) => println!("{} Duration: {}", "Flight updated.".green(), d),
                None => println!("{}", "Flight updated.".green()),
            }
            Ok(true)
        }
        "edit" => usage("edit <flight-id> <date|dep|arr|dep-offset|arr-offset|number> <value>"),
        "rm" => match parts.get(1) {
            Some(id) => {
                session.book.selected_mut()?.remove_flight(id)?;
                println!("Removed flight {}.", id);
                Ok(true)
            }
            None => usage("rm <flight-id>"),
        },
        "duration" if parts.len() >= 3 => {
            let dep = parts[1].parse::<ClockTime>()?;
            let arr = parts[2].parse::<ClockTime>()?;
            let dep_offset = parse_offset(parts.get(3))?;
            let arr_offset = parse_offset(parts.get(4))?;
            let d = calc.compute_duration(dep, arr, dep_offset, arr_offset);
            println!(
                "{} ({}) -> {} ({}): {} ({} min)",
                dep,
                dep_offset.unwrap_or(calc.default_offset()),
                arr,
                arr_offset.unwrap_or(calc.default_offset()),
                format_duration(d.total_minutes()).bold(),
                d.total_minutes()
            );
            Ok(false)
        }
        "duration" => usage("duration <HH:MM> <HH:MM> [dep-offset] [arr-offset]"),
        "zones" => {
            let zones = UtcOffset::supported()
                .into_iter()
                .map(|z| {
                    if z == calc.default_offset() {
                        format!("{}", z.to_string().bold())
                    } else {
                        z.to_string()
                    }
                })
                .collect::<Vec<_>>();
            println!("{}", zones.join("  "));
            Ok(false)
        }
        "backfill" => {
            let filled = session.book.backfill_all(&calc);
            println!("Filled in {} missing durations.", filled);
            Ok(filled > 0)
        }
        "save" => {
            session.book.save_to_file(&session.book_path)?;
            println!("Saved to {}", session.book_path.display());
            Ok(false)
        }
        "help" | "?" => {
            println!("\nAvailable Commands:");
            println!("  trips                              - List all trips (* marks the selected one)");
            println!("  trip add <name> <dest> <start> <end> [description]");
            println!("                                     - Create a trip and select it");
            println!("  trip dates <id> <start> <end>      - Change the dates of a trip");
            println!("  trip edit <id> <field> <value>     - Change a trip's name, destination or description");
            println!("  trip rm <id>                       - Delete a trip and its flights");
            println!("  use <id>                           - Select a trip");
            println!("  ls                                 - List the selected trip's flights in departure order");
            println!("  add <date> <dep> <arr> [dep-offset] [arr-offset] [flight-no]");
            println!("                                     - Add a flight, e.g. add 2024-05-01 23:00 06:30 UTC+8 UTC+5.5 BR 95");
            println!("                                       (offsets need the UTC prefix; other words form the flight number)");
            println!("  edit <id> <field> <value>          - Change date, dep, arr, dep-offset, arr-offset or number");
            println!("  rm <id>                            - Delete a flight from the selected trip");
            println!("  duration <dep> <arr> [dep-offset] [arr-offset]");
            println!("                                     - Compute a flight duration without storing it");
            println!("  zones                              - List the supported UTC offsets");
            println!("  backfill                           - Compute durations missing from stored flights");
            println!("  save                               - Write the trip book to disk");
            println!("  help / ?                           - Show this help menu");
            println!("  exit / quit                        - Exit the planner\n");
            Ok(false)
        }
        other => {
            println!("Unknown command: {}", other);
            Ok(false)
        }
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init_logging(Verbosity::from_flags(args.quiet, args.verbose));

    let config = Config::load_from(args.config.as_deref())?;
    let book_path = args.book.unwrap_or_else(|| config.book_path.clone());
    let book = TripBook::load_from_file(&book_path)?;
    println!(
        "Trip planner ready. Loaded {} trips from {}",
        book.trips().len(),
        book_path.display()
    );

    let mut session = Session {
        book,
        calculator: config.calculator(),
        book_path,
    };

    let rl_config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: [
            "trips", "trip", "use", "ls", "add", "edit", "rm", "duration", "zones", "backfill",
            "save", "help", "exit",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    };

    let mut rl = Editor::with_config(rl_config)?;
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() { continue; }

                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                if matches!(parts[0], "exit" | "quit") {
                    break;
                }
                match run_command(&mut session, &parts) {
                    Ok(true) => {
                        if let Err(e) = session.book.save_to_file(&session.book_path) {
                            println!("{} {}", "Could not save trip book:".red(), e);
                        }
                    }
                    Ok(false) => {}
                    Err(e) if e.is_input_error() => println!("{}", e.to_string().yellow()),
                    Err(e) => {
                        tracing::error!(error = %e, "command failed");
                        println!("{} {}", "Error:".red(), e);
                    }
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            },
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            },
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
