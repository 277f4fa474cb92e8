// Minimal integration test that drives the compiled binary through a PTY.
// This exercises the real event loop and crossterm input handling across
// the main boundaries without relying on internal modules.
//
// Notes:
// - Requires a TTY; uses expectrl which allocates a pseudo terminal.
// - Marked Unix-only and ignored by default to avoid CI/platform issues.
// - Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn minimal_session_completes_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("examr");
    let cmd = format!("{} --exam 1 --no-confirm", bin.display());

    let mut p = spawn(cmd)?;

    // Give the app a moment to initialize the terminal/alternate screen
    std::thread::sleep(Duration::from_millis(200));

    // Answer the first question and submit; the rest are unanswered, so
    // the dialog still asks even with --no-confirm
    p.send("1")?;
    p.send("s")?;
    std::thread::sleep(Duration::from_millis(100));
    p.send("y")?;
    std::thread::sleep(Duration::from_millis(200));

    // results -> home, home -> quit
    p.send("h")?;
    std::thread::sleep(Duration::from_millis(100));
    p.send("q")?;

    p.expect(Eof)?;
    Ok(())
}
