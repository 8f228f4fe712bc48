//! OS-side launch primitives.
//!
//! URIs (Steam, Epic, web) go through the desktop opener; executables are
//! spawned directly, or through PowerShell's `Start-Process -Verb RunAs`
//! when an elevated launch is requested on Windows.

use std::process::{Command, Stdio};

use anyhow::{bail, Context};
use tracing::{info, warn};

use deck_proto::channel::ChannelType;
use deck_proto::launch::{LaunchRequest, Launcher};

#[derive(Debug, Default)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch_app(&self, request: &LaunchRequest) -> anyhow::Result<()> {
        match request.kind {
            ChannelType::Exe => launch_exe(&request.path, request.as_admin),
            ChannelType::Steam | ChannelType::Epic => open_uri(&request.path),
            ChannelType::MicrosoftStore => launch_store_app(&request.path),
            ChannelType::Url => open_uri(&request.path),
        }
    }

    fn open_external(&self, url: &str) -> anyhow::Result<()> {
        open_uri(url)
    }

    fn open_pip_window(&self, url: &str) -> anyhow::Result<()> {
        warn!("no picture-in-picture window in a terminal; opening {} externally", url);
        open_uri(url)
    }
}

fn open_uri(uri: &str) -> anyhow::Result<()> {
    open::that(uri).with_context(|| format!("failed to open {}", uri))
}

/// Split `C:\Program Files\App.exe --flag x` into program and arguments.
/// The program ends at the first `.exe`; a path without one (a bare UNC
/// share) is returned whole with no arguments.
pub fn split_exe_command(raw: &str) -> (String, Vec<String>) {
    let raw = raw.trim();
    if let Some(rest) = raw.strip_prefix('"') {
        if let Some((program, args)) = rest.split_once('"') {
            return (program.to_string(), split_args(args));
        }
    }
    let lower = raw.to_ascii_lowercase();
    match lower.find(".exe") {
        Some(pos) => {
            let end = pos + ".exe".len();
            (raw[..end].to_string(), split_args(&raw[end..]))
        }
        None => (raw.to_string(), Vec::new()),
    }
}

fn split_args(args: &str) -> Vec<String> {
    args.split_whitespace().map(str::to_string).collect()
}

fn launch_exe(path: &str, as_admin: bool) -> anyhow::Result<()> {
    let (program, args) = split_exe_command(path);
    if !program.to_ascii_lowercase().ends_with(".exe") {
        // Network share or folder: hand it to the shell.
        return open_uri(&program);
    }

    if as_admin {
        if cfg!(windows) {
            return launch_elevated(&program, &args);
        }
        warn!("elevated launch is Windows-only; starting {} normally", program);
    }

    let child = Command::new(&program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to start {}", program))?;
    info!("started {} (pid {})", program, child.id());
    Ok(())
}

fn powershell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn launch_elevated(program: &str, args: &[String]) -> anyhow::Result<()> {
    let mut script = format!(
        "Start-Process -FilePath {} -Verb RunAs",
        powershell_quote(program)
    );
    if !args.is_empty() {
        let list: Vec<String> = args.iter().map(|a| powershell_quote(a)).collect();
        script.push_str(&format!(" -ArgumentList {}", list.join(",")));
    }
    let status = Command::new("powershell")
        .args(["-NoProfile", "-WindowStyle", "Hidden", "-Command", &script])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .context("failed to run powershell")?;
    if !status.success() {
        bail!("elevated launch of {} was refused or failed", program);
    }
    info!("started {} elevated", program);
    Ok(())
}

fn launch_store_app(app_id: &str) -> anyhow::Result<()> {
    if !cfg!(windows) {
        bail!("Microsoft Store apps can only be launched on Windows");
    }
    Command::new("explorer.exe")
        .arg(format!("shell:AppsFolder\\{}", app_id))
        .spawn()
        .with_context(|| format!("failed to launch store app {}", app_id))?;
    info!("started store app {}", app_id);
    Ok(())
}
