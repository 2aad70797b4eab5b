//! src/hook.rs

use std::convert::Infallible;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Local};
use log::{debug, warn};

use crate::errors::HookError;
use crate::script::{self, ScriptOptions};

pub const REPO_MARKER: &str = ".git";
pub const HOOKS_DIR: &str = "hooks";
pub const BACKUP_SUFFIX: &str = ".copy";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Git hook the script is written to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HookKind {
    #[default]
    PreCommit,
    PrePush,
    /// Not one of the documented hooks; still accepted.
    Other(String),
}

impl HookKind {
    pub const RECOGNIZED: [&'static str; 2] = ["pre-commit", "pre-push"];

    pub fn file_name(&self) -> &str {
        match self {
            HookKind::PreCommit => "pre-commit",
            HookKind::PrePush => "pre-push",
            HookKind::Other(name) => name,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, HookKind::Other(_))
    }
}

impl FromStr for HookKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "pre-commit" => HookKind::PreCommit,
            "pre-push" => HookKind::PrePush,
            other => HookKind::Other(other.to_string()),
        })
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// How the hook file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Truncate,
    Append,
}

impl WriteMode {
    pub fn from_append(append: bool) -> Self {
        if append {
            WriteMode::Append
        } else {
            WriteMode::Truncate
        }
    }
}

/// Everything needed to install one hook.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    pub hook: HookKind,
    pub backup: bool,
    pub mode: WriteMode,
    pub dir: PathBuf,
    pub script: ScriptOptions,
}

/// Resolved locations inside a validated repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoPaths {
    pub root: PathBuf,
    pub hooks_dir: PathBuf,
}

impl RepoPaths {
    pub fn hook_path(&self, hook: &HookKind) -> PathBuf {
        self.hooks_dir.join(hook.file_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub hook_path: PathBuf,
    pub backup_path: Option<PathBuf>,
    pub mode: WriteMode,
}

/// Check that `dir` is a git repository with a hooks directory.
///
/// Nothing is created here: a missing `.git/hooks` is a configuration error.
pub fn validate_repository(dir: &Path) -> Result<RepoPaths, HookError> {
    let root = fs::canonicalize(dir).map_err(|_| HookError::NotARepository {
        path: dir.to_path_buf(),
    })?;

    let marker = root.join(REPO_MARKER);
    if !marker.exists() {
        return Err(HookError::NotARepository { path: root });
    }

    let hooks_dir = marker.join(HOOKS_DIR);
    if !hooks_dir.is_dir() {
        return Err(HookError::MissingHooksDir { path: hooks_dir });
    }

    debug!("Repository root: {}", root.display());
    debug!("Hooks directory: {}", hooks_dir.display());
    Ok(RepoPaths { root, hooks_dir })
}

/// `<hook_path><YYYYMMDDHHMMSS>.copy`
pub fn backup_path(hook_path: &Path, timestamp: &DateTime<Local>) -> PathBuf {
    let mut name = hook_path.as_os_str().to_os_string();
    name.push(timestamp.format(BACKUP_TIMESTAMP_FORMAT).to_string());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Copy an existing hook aside. Returns the backup location, or `None` when
/// there was nothing to back up.
///
/// An existing file at the backup location is never overwritten.
pub fn create_backup(
    hook_path: &Path,
    timestamp: &DateTime<Local>,
) -> Result<Option<PathBuf>, HookError> {
    if !hook_path.exists() {
        debug!("No existing hook at {}, skipping backup", hook_path.display());
        return Ok(None);
    }

    let target = backup_path(hook_path, timestamp);
    let mut source =
        fs::File::open(hook_path).map_err(|e| HookError::io("read hook", hook_path, e))?;
    let mut copy = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
        .map_err(|e| HookError::io("create backup", &target, e))?;
    io::copy(&mut source, &mut copy).map_err(|e| HookError::io("back up hook to", &target, e))?;
    debug!("Backed up {} to {}", hook_path.display(), target.display());
    Ok(Some(target))
}

/// Rewrite absolute ignore entries that point inside the repository as
/// `./`-relative paths, the form `find .` reports.
pub fn rebase_ignores(root: &Path, ignore: &[String]) -> Vec<String> {
    ignore
        .iter()
        .map(|entry| {
            let path = Path::new(entry.trim());
            if !path.is_absolute() {
                return entry.clone();
            }
            let resolved = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
            match resolved.strip_prefix(root) {
                Ok(relative) if relative.as_os_str().is_empty() => ".".to_string(),
                Ok(relative) => format!("./{}", relative.display()),
                Err(_) => entry.clone(),
            }
        })
        .collect()
}

/// Script options with ignore entries made relative to `repo`.
pub fn prepare_script(repo: &RepoPaths, options: &ScriptOptions) -> ScriptOptions {
    ScriptOptions {
        ignore: rebase_ignores(&repo.root, &options.ignore),
        ..options.clone()
    }
}

/// Write (or append) `body` to the hook file and make it executable.
pub fn write_hook(hook_path: &Path, body: &str, mode: WriteMode) -> Result<(), HookError> {
    let mut options = OpenOptions::new();
    match mode {
        WriteMode::Truncate => options.write(true).create(true).truncate(true),
        WriteMode::Append => options.append(true).create(true),
    };

    debug!("Writing hook {} ({:?})", hook_path.display(), mode);
    let mut file = options
        .open(hook_path)
        .map_err(|e| HookError::io("open hook file", hook_path, e))?;
    file.write_all(body.as_bytes())
        .map_err(|e| HookError::io("write hook file", hook_path, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = file
            .metadata()
            .map_err(|e| HookError::io("read permissions of", hook_path, e))?
            .permissions();
        perms.set_mode(perms.mode() | 0o755);
        fs::set_permissions(hook_path, perms)
            .map_err(|e| HookError::io("set permissions of", hook_path, e))?;
    }

    Ok(())
}

/// Validate, back up, render and write, in that order.
pub fn install(request: &InstallRequest) -> Result<InstallOutcome, HookError> {
    install_at(request, &Local::now())
}

pub fn install_at(
    request: &InstallRequest,
    timestamp: &DateTime<Local>,
) -> Result<InstallOutcome, HookError> {
    let repo = validate_repository(&request.dir)?;
    let hook_path = repo.hook_path(&request.hook);

    if !request.hook.is_recognized() {
        warn!(
            "'{}' is not one of the supported hooks {:?}; installing anyway",
            request.hook,
            HookKind::RECOGNIZED
        );
    }

    let backup_path = if request.backup {
        create_backup(&hook_path, timestamp)?
    } else {
        None
    };

    let body = script::render(&prepare_script(&repo, &request.script));
    write_hook(&hook_path, &body, request.mode)?;

    Ok(InstallOutcome {
        hook_path,
        backup_path,
        mode: request.mode,
    })
}
