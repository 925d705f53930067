use crate::{Attachment, Result, ViewerConfig, ViewerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

/// Copy `attachment` to a temporary file and open it with the system's
/// default application (or `config.opener` when set).
///
/// The temporary file is kept so the external program can read it after this
/// call returns. Its path is returned.
pub fn open_with_system(attachment: &Attachment, config: &ViewerConfig) -> Result<PathBuf> {
    let path = write_temp_copy(attachment, config.temp_dir.as_deref())?;
    let mut command = opener_command(config.opener.as_deref(), &path);
    let program = command.get_program().to_string_lossy().into_owned();

    let child = match command.spawn() {
        Ok(child) => child,
        Err(source) => {
            let _ = std::fs::remove_file(&path);
            return Err(ViewerError::Launch { program, source });
        }
    };
    // the opener runs detached; it is never waited on
    std::mem::drop(child);

    info!(name = %attachment.name, path = %path.display(), %program, "opened attachment");
    Ok(path)
}

fn write_temp_copy(attachment: &Attachment, dir: Option<&Path>) -> Result<PathBuf> {
    let suffix = attachment
        .extension()
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();

    let mut builder = tempfile::Builder::new();
    builder.prefix("goodpdf-").suffix(&suffix);
    let mut file = match dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };

    file.write_all(&attachment.content)?;
    let (_, path) = file.keep().map_err(|e| e.error)?;
    Ok(path)
}

fn opener_command(opener: Option<&str>, path: &Path) -> Command {
    if let Some(program) = opener {
        let mut command = Command::new(program);
        command.arg(path);
        return command;
    }

    #[cfg(target_os = "windows")]
    {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]).arg(path);
        command
    }
    #[cfg(target_os = "macos")]
    {
        let mut command = Command::new("open");
        command.arg(path);
        command
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        let mut command = Command::new("xdg-open");
        command.arg(path);
        command
    }
}
