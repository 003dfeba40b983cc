use std::path::Path;

use assert_cmd::Command;
use chrono::{Datelike, Local};
use predicates::prelude::*;
use predicates::str::contains;
use regex::Regex;
use tempfile::TempDir;

fn script_command(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("booking_core_cli").expect("binary exists");
    cmd.env("BOOKING_CORE_CLI_SCRIPT", "1")
        .env("BOOKING_CORE_HOME", home)
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "off");
    cmd
}

fn run_script(home: &Path, script: &str) -> assert_cmd::assert::Assert {
    script_command(home).write_stdin(script.to_string()).assert()
}

#[test]
fn booking_flow_reports_receipt_and_clients() {
    let home = TempDir::new().expect("temp home");
    let script = "\
month Julio
book 5 10 Ana --amount 400
book 12 13 \"Beto Diaz\" --property Casa --amount 150
clients
exit
";
    run_script(home.path(), script)
        .success()
        .stdout(contains("Booked Ana in Depto 1: days 5 to 10 (6 nights)."))
        .stdout(contains("Booked Beto Diaz in Casa: days 12 to 13 (2 nights)."))
        .stdout(contains("Clients: 2 | Income: $550.00"));
}

#[test]
fn conflicting_booking_lists_each_taken_day() {
    let home = TempDir::new().expect("temp home");
    let script = "\
month Julio
book 5 10 Ana
book 8 12 Beto
";
    let output = run_script(home.path(), script)
        .success()
        .stdout(contains("Those days are already booked:"))
        .stdout(contains("Booked Beto").not())
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).expect("utf8 stdout");
    let day_line = Regex::new(r"(?m)^\s+Day (\d+) \((\w+)\)$").expect("valid regex");
    let listed: Vec<(String, String)> = day_line
        .captures_iter(&stdout)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect();
    assert_eq!(
        listed,
        vec![
            ("8".to_string(), "Ana".to_string()),
            ("9".to_string(), "Ana".to_string()),
            ("10".to_string(), "Ana".to_string()),
        ]
    );
}

#[test]
fn bookings_survive_between_runs() {
    let home = TempDir::new().expect("temp home");
    run_script(home.path(), "month Julio\nbook 1 3 Ana --amount 90\n").success();

    run_script(home.path(), "month Julio\nclients\nsummary\n")
        .success()
        .stdout(contains("Ana"))
        .stdout(contains("Income   : $90.00"));

    assert!(home.path().join("store/calendarData.json").exists());
}

#[test]
fn move_and_delete_update_the_month() {
    let home = TempDir::new().expect("temp home");
    let script = "\
month Julio
book 1 3 Ana --amount 200
move Ana \"Depto 2\" 2 6
amount Ana 350
delete Ana
delete Nadie
";
    run_script(home.path(), script)
        .success()
        .stdout(contains("Moved Ana in Depto 2: days 2 to 6 (5 nights)."))
        .stdout(contains("Ana paid $350.00 (5 days updated)."))
        .stdout(contains("Removed 5 days booked by Ana."))
        .stdout(contains("Nadie has no bookings in Julio"));
}

#[test]
fn expenses_feed_the_balance() {
    let home = TempDir::new().expect("temp home");
    let script = "\
month Julio
book 1 10 Ana --amount 1000
expense Luz 100
expense pool-service 200
expenses
summary
";
    run_script(home.path(), script)
        .success()
        .stdout(contains("Electricity set to $100.00."))
        .stdout(contains("Pool service set to $200.00."))
        .stdout(contains("Total expenses: $300.00"))
        .stdout(contains("Balance  : $700.00"));
}

#[test]
fn calendar_shows_legend_for_booked_clients() {
    let home = TempDir::new().expect("temp home");
    let script = "\
month Julio
calendar Casa
book 1 2 Ana --property Casa
calendar Casa
";
    run_script(home.path(), script)
        .success()
        .stdout(contains("No bookings."))
        .stdout(contains("   D   L   M   M   J   V   S"))
        .stdout(contains("Ana days 1-2 (2 nights)"));
}

#[test]
fn year_outside_the_window_is_rejected() {
    let home = TempDir::new().expect("temp home");
    let current = Local::now().year();
    let script = format!("year {}\nyear {}\n", current + 1, current + 10);
    run_script(home.path(), &script)
        .success()
        .stdout(contains(format!("Year set to {}.", current + 1)))
        .stdout(contains(format!(
            "year must be between {} and {}",
            current - 2,
            current + 2
        )));
}

#[test]
fn unknown_command_suggests_closest_match() {
    let home = TempDir::new().expect("temp home");
    run_script(home.path(), "# comment lines are skipped\nsumary\n")
        .success()
        .stdout(contains("Unknown command `sumary`"))
        .stdout(contains("Suggestion: `summary`?"));
}

#[test]
fn backups_can_be_listed_and_restored() {
    let home = TempDir::new().expect("temp home");
    let script = "\
month Julio
book 1 2 Ana
book 5 6 Beto
backups
restore 1
clients
";
    run_script(home.path(), script)
        .success()
        .stdout(contains("1. "))
        .stdout(contains("Restored calendarData from"))
        .stdout(contains("Clients: 1 | Income: $0.00"));
}

#[test]
fn status_shows_selection_and_file_locations() {
    let home = TempDir::new().expect("temp home");
    run_script(home.path(), "month Febrero\nproperty casa\nstatus\n")
        .success()
        .stdout(contains("Property : Casa"))
        .stdout(contains("Data dir : "))
        .stdout(contains("Config   : "))
        .stdout(contains("config.json"));
}

#[test]
fn version_prints_build_metadata() {
    let home = TempDir::new().expect("temp home");
    run_script(home.path(), "version\n")
        .success()
        .stdout(contains("Booking Core"));
}
