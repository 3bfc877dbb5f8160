use std::process::Command;

// Packagers building from a source tarball (no .git) can pin the commit
// through the environment; otherwise ask git.
const GIT_HASH_ENV: &str = "ROOMRELAY_GIT_HASH";

fn main() {
    let git_hash = std::env::var(GIT_HASH_ENV)
        .ok()
        .filter(|hash| !hash.trim().is_empty())
        .or_else(|| stdout_of("git", &["rev-parse", "--short", "HEAD"]))
        .unwrap_or_else(|| "unknown".to_string());
    let build_date =
        stdout_of("date", &["-u", "+%Y-%m-%d"]).unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=ROOMRELAY_GIT_HASH={}", git_hash);
    println!("cargo:rustc-env=ROOMRELAY_BUILD_DATE={}", build_date);

    println!("cargo:rerun-if-env-changed={}", GIT_HASH_ENV);
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
}

/// Trimmed stdout of a successful command, `None` when it fails or prints nothing.
fn stdout_of(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}
