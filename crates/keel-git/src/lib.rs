//! Git collaborators around the rewrite engine: template acquisition before
//! the rewrite and repository finalization after it.
//!
//! All git work goes through a [`CommandRunner`] so tests can substitute a
//! fake instead of spawning processes.

mod command;

pub use command::{CommandOutput, CommandRunner, DefaultCommandRunner};

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use command::format_command;

#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("git command `{command}` failed with exit code {code:?}\nstdout:\n{stdout}\nstderr:\n{stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

#[derive(Debug, Clone)]
pub struct GitConfig {
    /// Path to the git executable (defaults to `git` in `PATH`).
    pub git_path: PathBuf,
    /// Depth passed to `git clone`; template history is never wanted.
    pub clone_depth: u32,
    /// Message for the single commit made by [`GitClient::finalize`].
    pub commit_message: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            git_path: PathBuf::from("git"),
            clone_depth: 1,
            commit_message: "Initial commit".into(),
        }
    }
}

#[derive(Debug)]
pub struct GitClient {
    config: GitConfig,
    runner: Arc<dyn CommandRunner>,
}

impl GitClient {
    pub fn new(config: GitConfig) -> Self {
        Self::with_runner(config, Arc::new(DefaultCommandRunner))
    }

    pub fn with_runner(config: GitConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    /// Clones `template_url` into `dest` and strips the clone's own history,
    /// leaving a plain tree for the rewrite. `dest` must not already contain
    /// a checkout; git reports that as a failure.
    pub fn fetch_template(&self, template_url: &str, dest: &Path) -> Result<(), GitError> {
        tracing::debug!(
            target = "keel.git",
            url = template_url,
            dest = %dest.display(),
            "fetching template"
        );
        self.run(
            Path::new("."),
            &[
                "clone".into(),
                "--depth".into(),
                self.config.clone_depth.to_string(),
                template_url.into(),
                dest.to_string_lossy().into_owned(),
            ],
        )?;

        let git_dir = dest.join(".git");
        match std::fs::remove_dir_all(&git_dir) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(GitError::Io(err)),
        }
    }

    /// Initializes a fresh repository at `root`, stages the whole tree and
    /// commits it once.
    pub fn finalize(&self, root: &Path) -> Result<(), GitError> {
        tracing::debug!(target = "keel.git", root = %root.display(), "finalizing repository");
        self.run(root, &["init".into()])?;
        self.run(root, &["add".into(), "-A".into()])?;
        self.run(
            root,
            &[
                "commit".into(),
                "-m".into(),
                self.config.commit_message.clone(),
            ],
        )?;
        Ok(())
    }

    fn run(&self, cwd: &Path, args: &[String]) -> Result<CommandOutput, GitError> {
        let output = self.runner.run(cwd, &self.config.git_path, args)?;
        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: format_command(&self.config.git_path, args),
                code: output.status.code(),
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }
        Ok(output)
    }
}
