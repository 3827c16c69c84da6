//! Stamps the version banner shown by `meinstatic --version`.
//!
//! Release tags print the crate version; every other checkout prints
//! `dev@<short hash>`, or `dev build` outside a git repository.

use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");

    let on_tag = git(&["describe", "--exact-match", "--tags", "HEAD"]).is_some();
    let label = if on_tag {
        std::env::var("CARGO_PKG_VERSION").unwrap_or_default()
    } else {
        match git(&["rev-parse", "--short", "HEAD"]) {
            Some(hash) if !hash.is_empty() => format!("dev@{hash}"),
            _ => "dev build".to_string(),
        }
    };

    println!("cargo:rustc-env=MEINSTATIC_VERSION={label}");
}
