//! Debug CLI for inspecting the upgrade pipeline without the TUI
//!
//! Usage:
//!   cargo run --bin debug_cli -- <command>
//!
//! Commands:
//!   keep                 Show the keep list path and names
//!   closure              Show the keep list's dependency closure
//!   candidates [--json]  Show the filtered, sorted upgrade candidates

use std::env;
use std::process::ExitCode;

use pacpick::closure::{Closure, compute_closure};
use pacpick::error::Result;
use pacpick::keep::{self, KeepList};
use pacpick::pacman::PacmanDb;
use pacpick::types::size_str;
use pacpick::upgrades::{collect_candidates, sort_candidates};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let cmd = args.get(1).map(String::as_str).unwrap_or("help");

    let result = match cmd {
        "keep" => cmd_keep(),
        "closure" => cmd_closure(),
        "candidates" => cmd_candidates(args.iter().any(|a| a == "--json")),
        _ => {
            print_help();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn print_help() {
    println!("Debug CLI for the pacpick upgrade pipeline");
    println!();
    println!("Commands:");
    println!("  keep                 Show the keep list path and names");
    println!("  closure              Show the keep list's dependency closure");
    println!("  candidates [--json]  Show the filtered, sorted upgrade candidates");
}

fn load_keep() -> Result<KeepList> {
    let path = keep::default_path()?;
    KeepList::load(&path)
}

fn protected_closure(keep_list: &KeepList, db: &PacmanDb) -> Closure {
    compute_closure(keep_list.names(), db)
}

fn cmd_keep() -> Result<()> {
    let keep_list = load_keep()?;
    println!("keep list: {}", keep_list.path().display());
    for name in keep_list.names() {
        println!("  {name}");
    }
    Ok(())
}

fn cmd_closure() -> Result<()> {
    let keep_list = load_keep()?;
    let db = PacmanDb::open()?;
    let closure = protected_closure(&keep_list, &db);

    let mut members: Vec<&String> = closure.members.iter().collect();
    members.sort();
    println!("protected ({}):", members.len());
    for name in members {
        println!("  {name}");
    }

    if !closure.unfound.is_empty() {
        println!();
        println!("not found ({}):", closure.unfound.len());
        for name in &closure.unfound {
            println!("  {name}");
        }
    }
    Ok(())
}

fn cmd_candidates(json: bool) -> Result<()> {
    let keep_list = load_keep()?;
    let db = PacmanDb::open()?;
    let closure = protected_closure(&keep_list, &db);

    let mut candidates = collect_candidates(
        db.installed(),
        |record| db.best_available(record).cloned(),
        &closure.members,
    );
    sort_candidates(&mut candidates);

    if json {
        match serde_json::to_string_pretty(&candidates) {
            Ok(body) => println!("{body}"),
            Err(e) => eprintln!("failed to serialize candidates: {e}"),
        }
        return Ok(());
    }

    println!("candidates ({}):", candidates.len());
    for candidate in &candidates {
        println!(
            "  {:<32} {:>10}",
            candidate.record.name,
            size_str(candidate.record.installed_size)
        );
    }
    Ok(())
}
