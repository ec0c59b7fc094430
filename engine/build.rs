//! Build metadata for the engine binary.
//!
//! Captures the current git commit so that the UCI `id name` reply can
//! report exactly which revision is running.

use std::process::Command;

fn main() {
    let output = Command::new("git").args(["rev-parse", "HEAD"]).output();
    let git_hash = match output {
        Ok(out) if out.status.success() => {
            String::from_utf8(out.stdout).unwrap_or_else(|_| "unknown".into())
        }
        _ => "unknown".into(),
    };
    println!("cargo:rustc-env=GIT_HASH={git_hash}");
    println!("cargo:rerun-if-changed=../.git/HEAD");
}
