//! A simple API wrapper around the `git` binary.

use crate::error::Error;
use anyhow::{ensure, Result};
use std::{
    env,
    path::Path,
    process::{Command, Output},
};

/// Returns `true` if `dir` is inside a git work tree.
pub fn is_inside_work_tree(dir: &Path) -> Result<bool> {
    let (command, output) = git(dir, &["rev-parse", "--is-inside-work-tree"])?;
    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).trim() == "true");
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    ensure!(
        stderr.contains("not a git repository"),
        Error::Tool {
            command,
            status: output.status,
            stderr: stderr.into_owned(),
        },
    );

    Ok(false)
}

/// Initializes a new repository in `dir`.
pub fn init(dir: &Path) -> Result<()> {
    let (command, output) = git(dir, &["init"])?;
    ensure!(
        output.status.success(),
        Error::Tool {
            command,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        },
    );

    Ok(())
}

fn git(dir: &Path, args: &[&str]) -> Result<(String, Output)> {
    let mut git = Command::new(env::var_os("GIT").unwrap_or_else(|| "git".into()));
    git.current_dir(dir).args(args);
    log::debug!("running {:?} in {}", git, dir.display());

    let output = git.output()?;
    Ok((format!("{:?}", git), output))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore]
    fn init_repository() {
        let dir = tempfile::tempdir().unwrap();

        assert!(!is_inside_work_tree(dir.path()).unwrap());
        init(dir.path()).unwrap();
        assert!(is_inside_work_tree(dir.path()).unwrap());
    }
}
