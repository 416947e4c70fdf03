//! Cookie jar persistence.
//!
//! Only cookies are written to disk. The access token lives in memory and
//! is re-issued from the refresh cookie on the next run.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use storekeep_core::CookieJar;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Overrides the platform data directory.
pub const DATA_DIR_ENV: &str = "STOREKEEP_DATA_DIR";

const COOKIES_FILE: &str = "cookies.json";

fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let dirs =
        ProjectDirs::from("", "", "storekeep").context("Could not determine data directory")?;
    Ok(dirs.data_dir().to_path_buf())
}

/// Get the cookie file path, creating its directory.
fn cookies_path() -> Result<PathBuf> {
    let dir = data_dir()?;
    fs::create_dir_all(&dir).context("Failed to create data directory")?;
    Ok(dir.join(COOKIES_FILE))
}

pub fn load_cookies() -> Result<CookieJar> {
    load_from(&cookies_path()?)
}

pub fn save_cookies(jar: &CookieJar) -> Result<()> {
    save_to(&cookies_path()?, jar)
}

/// Remove the stored cookies.
pub fn clear_cookies() -> Result<()> {
    let path = cookies_path()?;
    if path.exists() {
        fs::remove_file(&path).context("Failed to remove cookie file")?;
    }
    Ok(())
}

fn load_from(path: &Path) -> Result<CookieJar> {
    if !path.exists() {
        return Ok(CookieJar::new());
    }
    let json = fs::read_to_string(path).context("Failed to read cookie file")?;
    let mut jar: CookieJar = serde_json::from_str(&json).context("Invalid cookie file")?;
    jar.cleanup_expired();
    Ok(jar)
}

fn save_to(path: &Path, jar: &CookieJar) -> Result<()> {
    let json = serde_json::to_string_pretty(jar)?;
    fs::write(path, &json).context("Failed to write cookie file")?;

    #[cfg(unix)]
    {
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use storekeep_core::Cookie;

    #[test]
    fn missing_file_is_an_empty_jar() {
        let dir = tempfile::tempdir().unwrap();
        let jar = load_from(&dir.path().join(COOKIES_FILE)).unwrap();
        assert!(jar.is_empty());
    }

    #[test]
    fn cookies_survive_a_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(COOKIES_FILE);

        let mut jar = CookieJar::new();
        jar.add(Cookie::new("refresh_token", "r-1", "admin.example.com").with_http_only(true));
        save_to(&path, &jar).unwrap();

        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        let url = url::Url::parse("https://admin.example.com/api").unwrap();
        assert_eq!(loaded.cookie_header(&url).as_deref(), Some("refresh_token=r-1"));
    }

    #[cfg(unix)]
    #[test]
    fn cookie_file_is_private() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(COOKIES_FILE);
        save_to(&path, &CookieJar::new()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(COOKIES_FILE);
        fs::write(&path, "not json").unwrap();
        assert!(load_from(&path).is_err());
    }
}
