fn main() {
    set_long_version();
}

/// Make the version string shown by `--version` available to the build as
/// the environment variable `CHECK_LIBRESPEED_LONG_VERSION`, including the
/// current git hash when building from a checkout.
fn set_long_version() {
    println!("cargo:rerun-if-changed=.git/HEAD");

    let version = std::env::var("CARGO_PKG_VERSION").unwrap_or_default();
    let long_version = match git_revision_hash() {
        Some(rev) => format!("{} (rev {})", version, rev),
        None => version,
    };
    println!("cargo:rustc-env=CHECK_LIBRESPEED_LONG_VERSION={}", long_version);
}

fn git_revision_hash() -> Option<String> {
    use std::process::Command;

    let args = &["rev-parse", "--short=10", "HEAD"];
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let rev = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if rev.is_empty() {
        return None;
    }
    Some(rev)
}
