// build.rs
use std::process::Command;

fn git_short_hash() -> String {
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| {
            let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
            hash.chars().take(8).collect::<String>()
        })
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn git_dirty_suffix() -> &'static str {
    Command::new("git")
        .args(["diff", "--quiet"])
        .status()
        .map(|status| if status.success() { "" } else { "-dirty" })
        .unwrap_or("")
}

fn main() {
    let version = std::env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".to_string());
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    let full_version = format!(
        "{} {}{}-{}",
        version,
        git_short_hash(),
        git_dirty_suffix(),
        profile
    );
    println!("cargo:rustc-env=SSPRS_PROFILE_VERSION={}", full_version);
    println!("cargo:rerun-if-changed=.git/HEAD");
}
