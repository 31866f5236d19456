// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 tmbkoren

//! Release checks against GitHub and staging of downloaded updates.
//!
//! Responsibilities:
//! - Fetch the latest release and compare it with the running version.
//! - Download the release executable next to the current one.
//! - On Windows, hand over to a batch script that swaps the executable once
//!   the application has exited.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use semver::Version;
use serde::Deserialize;

/// Version of the running binary.
pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name the release workflow gives the Windows executable.
pub const RELEASE_ASSET_NAME: &str = "MinecraftCurveGenerator.exe";

/// Global timeout for all HTTP operations.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum accepted size for the release API response.
const MAX_API_RESPONSE_SIZE: u64 = 2 * 1024 * 1024;

/// Maximum accepted size for a downloaded executable.
const MAX_DOWNLOAD_SIZE: u64 = 200 * 1024 * 1024;

/// Hosts update traffic may talk to.
const ALLOWED_HOSTS: &[&str] = &[
    "github.com",
    "api.github.com",
    "objects.githubusercontent.com",
    "release-assets.githubusercontent.com",
    "github-releases.githubusercontent.com",
];

/// Downloadable file attached to a release.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    #[serde(rename = "browser_download_url")]
    pub download_url: String,
}

/// Subset of the GitHub release payload the app cares about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReleaseInfo {
    pub tag: String,
    pub version: Version,
    pub notes: String,
    pub page_url: String,
    pub assets: Vec<ReleaseAsset>,
}

#[derive(Deserialize)]
struct RawRelease {
    tag_name: String,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    html_url: Option<String>,
    #[serde(default)]
    assets: Vec<ReleaseAsset>,
}

/// Release API endpoint for an `owner/name` repository slug.
pub fn release_api_url(repo: &str) -> String {
    format!("https://api.github.com/repos/{repo}/releases/latest")
}

/// Parse a version tag such as `v1.2.3` (leading `v` optional).
pub fn parse_tag(tag: &str) -> Result<Version> {
    let trimmed = tag.trim();
    let raw = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(raw).with_context(|| format!("Release tag '{tag}' is not a semantic version"))
}

/// Parse the JSON body of the "latest release" endpoint.
pub fn parse_release(json: &str, repo: &str) -> Result<ReleaseInfo> {
    let raw: RawRelease = serde_json::from_str(json).context("Failed to parse release JSON")?;
    let version = parse_tag(&raw.tag_name)?;
    Ok(ReleaseInfo {
        version,
        notes: raw.body.unwrap_or_default(),
        page_url: raw
            .html_url
            .unwrap_or_else(|| format!("https://github.com/{repo}/releases/latest")),
        assets: raw.assets,
        tag: raw.tag_name,
    })
}

/// Return the release when it is newer than `current`.
pub fn newer_release(current: &str, release: ReleaseInfo) -> Result<Option<ReleaseInfo>> {
    let current = parse_tag(current)?;
    Ok((release.version > current).then_some(release))
}

/// Check that a URL is HTTPS and points at a GitHub-operated host.
pub fn validate_update_url(url: &str) -> Result<()> {
    let parsed = url::Url::parse(url).with_context(|| format!("Invalid URL '{url}'"))?;
    if parsed.scheme() != "https" {
        bail!(
            "Insecure URL scheme '{}' rejected; only HTTPS is allowed. URL: {url}",
            parsed.scheme()
        );
    }
    let host = parsed.host_str().unwrap_or("");
    if !ALLOWED_HOSTS.contains(&host) {
        bail!("URL host '{host}' is not in the allowed list for update operations. URL: {url}");
    }
    Ok(())
}

fn agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(HTTP_TIMEOUT))
        .build()
        .into()
}

/// Ask GitHub for the latest release of `repo` and return it when newer.
pub fn check_for_update(repo: &str, current: &str) -> Result<Option<ReleaseInfo>> {
    let url = release_api_url(repo);
    validate_update_url(&url)?;
    log::debug!("Checking {url} for updates");

    let body = agent()
        .get(&url)
        .header("User-Agent", "mc-curve-generator")
        .header("Accept", "application/vnd.github+json")
        .call()
        .map_err(|e| anyhow!("Update check failed: {e}"))?
        .into_body()
        .with_config()
        .limit(MAX_API_RESPONSE_SIZE)
        .read_to_string()
        .map_err(|e| anyhow!("Failed to read release info: {e}"))?;

    let release = parse_release(&body, repo)?;
    newer_release(current, release)
}

/// Pick the asset to download: the release executable by name, then any
/// `.exe`, then whatever comes first.
pub fn pick_asset(assets: &[ReleaseAsset]) -> Option<&ReleaseAsset> {
    assets
        .iter()
        .find(|a| a.name.eq_ignore_ascii_case(RELEASE_ASSET_NAME))
        .or_else(|| {
            assets
                .iter()
                .find(|a| a.name.to_ascii_lowercase().ends_with(".exe"))
        })
        .or_else(|| assets.first())
}

/// A downloaded executable waiting to replace the running one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StagedUpdate {
    pub staged: PathBuf,
    pub current_exe: PathBuf,
    /// Whether the swap script was launched; the app should exit when set.
    pub restart_required: bool,
}

/// Download the release executable and place it as `_new_<name>` beside the
/// running binary. On Windows the swap script is launched right away.
pub fn download_and_stage(release: &ReleaseInfo) -> Result<StagedUpdate> {
    let asset = pick_asset(&release.assets)
        .ok_or_else(|| anyhow!("No assets found for the latest release."))?;
    validate_update_url(&asset.download_url)?;

    let current_exe = std::env::current_exe().context("Cannot locate the running executable")?;
    let dir = current_exe
        .parent()
        .ok_or_else(|| anyhow!("Executable has no parent directory"))?;
    let staged = staged_path(dir, &asset.name);

    log::info!("Downloading {} from {}", asset.name, asset.download_url);
    let bytes = agent()
        .get(&asset.download_url)
        .header("User-Agent", "mc-curve-generator")
        .call()
        .map_err(|e| anyhow!("Failed to download update: {e}"))?
        .into_body()
        .with_config()
        .limit(MAX_DOWNLOAD_SIZE)
        .read_to_vec()
        .map_err(|e| anyhow!("Failed to read downloaded update: {e}"))?;

    fs::write(&staged, &bytes)
        .with_context(|| format!("Failed to save update to {}", staged.display()))?;
    log::info!("Staged {} bytes at {}", bytes.len(), staged.display());

    let restart_required = launch_swap(&staged, &current_exe)?;
    Ok(StagedUpdate {
        staged,
        current_exe,
        restart_required,
    })
}

fn staged_path(dir: &Path, asset_name: &str) -> PathBuf {
    let file_name = Path::new(asset_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| RELEASE_ASSET_NAME.to_string());
    dir.join(format!("_new_{file_name}"))
}

/// Batch script that waits for the app to exit, swaps the executable, tells
/// the user to restart and deletes itself.
pub fn updater_script(new_path: &Path, old_path: &Path) -> String {
    let app_dir = old_path.parent().unwrap_or_else(|| Path::new("."));
    let app_name = old_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    format!(
        r#"@echo off
title Application Updated Successfully

:: Wait for the main application to close.
timeout /t 4 /nobreak > nul

:: Forcefully terminate the process if it is still holding the file.
taskkill /f /im "{app_name}" /t > nul 2>&1

cd /d "{app_dir}"

move /y "{new}" "{old}"

if errorlevel 1 (
    echo.
    echo ERROR: Failed to update the application file.
    echo Please close the application manually and try again.
    pause
    exit /b 1
)

echo.
echo Update Successful!
echo.
echo Please start the application again manually.
echo.
pause

(goto) 2>nul & del "%~f0"
"#,
        app_dir = app_dir.display(),
        new = new_path.display(),
        old = old_path.display(),
    )
}

#[cfg(windows)]
fn launch_swap(staged: &Path, current_exe: &Path) -> Result<bool> {
    use std::os::windows::process::CommandExt;

    const CREATE_NEW_CONSOLE: u32 = 0x0000_0010;

    let dir = current_exe
        .parent()
        .ok_or_else(|| anyhow!("Executable has no parent directory"))?;
    let script_path = dir.join("updater.bat");
    fs::write(&script_path, updater_script(staged, current_exe))
        .with_context(|| format!("Failed to write {}", script_path.display()))?;

    std::process::Command::new("cmd")
        .arg("/C")
        .arg(&script_path)
        .creation_flags(CREATE_NEW_CONSOLE)
        .spawn()
        .context("Failed to launch the updater script")?;
    log::info!("Launched updater script {}", script_path.display());
    Ok(true)
}

#[cfg(not(windows))]
fn launch_swap(staged: &Path, _current_exe: &Path) -> Result<bool> {
    log::info!(
        "Automatic replacement is only supported on Windows; update left at {}",
        staged.display()
    );
    Ok(false)
}
