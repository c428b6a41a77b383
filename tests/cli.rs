use assert_cmd::prelude::*;
use predicates::str::contains;
use std::process::Command;

#[cfg(target_os = "linux")]
#[test]
fn exits_with_minus_one_without_display() {
    let mut cmd = Command::cargo_bin("kinetic-sculpture").expect("binary exists");
    cmd.env_remove("DISPLAY")
        .env_remove("WAYLAND_DISPLAY")
        .env_remove("WAYLAND_SOCKET");
    cmd.assert()
        .code(255)
        .stderr(contains("failed to initialize event loop"));
}
