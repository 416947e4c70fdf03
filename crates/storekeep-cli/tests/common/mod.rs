use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use storekeep_core::{Cookie, CookieJar};
use wiremock::MockServer;

/// API base for a mock backend.
pub fn api_url(server: &MockServer) -> String {
    format!("{}/api", server.uri())
}

/// Directory the CLI keeps its cookies in, inside a test home.
pub fn data_dir(home: &Path) -> PathBuf {
    home.join("data").join("storekeep")
}

pub fn cookies_path(home: &Path) -> PathBuf {
    data_dir(home).join("cookies.json")
}

/// Write a stored session holding only an HTTP-only refresh cookie.
pub fn seed_refresh_cookie(home: &Path, value: &str) {
    let mut jar = CookieJar::new();
    jar.add(Cookie::new("refresh_token", value, "127.0.0.1").with_http_only(true));

    fs::create_dir_all(data_dir(home)).unwrap();
    fs::write(cookies_path(home), serde_json::to_string(&jar).unwrap()).unwrap();
}

/// Run the CLI with an isolated HOME and data directory.
pub fn run_cli_with_env(args: &[&str], home: &Path, api_url: &str) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_storekeep"));
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env("XDG_DATA_HOME", home.join("data"));
    cmd.env("STOREKEEP_DATA_DIR", data_dir(home));
    cmd.env("STOREKEEP_API_URL", api_url);
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("STOREKEEP_PRODUCTION");
    cmd.env_remove("RUST_LOG");
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI and expect success, returning stdout.
pub fn run_cli_with_env_success(args: &[&str], home: &Path, api_url: &str) -> String {
    let output = run_cli_with_env(args, home, api_url);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI and expect failure, returning stderr.
pub fn run_cli_with_env_failure(args: &[&str], home: &Path, api_url: &str) -> String {
    let output = run_cli_with_env(args, home, api_url);
    if output.status.success() {
        panic!("CLI command should have failed: {:?}", args);
    }
    String::from_utf8_lossy(&output.stderr).to_string()
}
