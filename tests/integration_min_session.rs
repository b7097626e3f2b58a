// Drives the compiled binary through a PTY: start a game from the menu,
// give up from the pause screen and quit from the results.
//
// Notes:
// - Requires a TTY; uses expectrl which allocates a pseudo terminal.
// - Unix-only and ignored by default.
// - Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn minimal_session_starts_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    let home = tempfile::tempdir()?;
    let bin = assert_cmd::cargo::cargo_bin("wordfall");
    let cmd = format!(
        "env HOME={home} XDG_CONFIG_HOME={home}/config {bin} --mute --seed 1",
        home = home.path().display(),
        bin = bin.display()
    );

    let mut p = spawn(cmd)?;
    std::thread::sleep(Duration::from_millis(200));

    // menu -> playing
    p.send("\r")?;
    std::thread::sleep(Duration::from_millis(200));

    // pause, give up, quit from the results
    p.send("\x1b")?;
    std::thread::sleep(Duration::from_millis(100));
    p.send("q")?;
    std::thread::sleep(Duration::from_millis(100));
    p.send("q")?;

    p.expect(Eof)?;
    Ok(())
}
