use keel_git::{CommandOutput, CommandRunner, GitClient, GitConfig, GitError};
use std::{
    path::{Path, PathBuf},
    process::ExitStatus,
    sync::{Arc, Mutex},
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Invocation {
    cwd: PathBuf,
    program: PathBuf,
    args: Vec<String>,
}

#[derive(Debug)]
struct FakeCommandRunner {
    invocations: Mutex<Vec<Invocation>>,
    output: CommandOutput,
}

impl FakeCommandRunner {
    fn new(output: CommandOutput) -> Self {
        Self {
            invocations: Mutex::new(Vec::new()),
            output,
        }
    }

    fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }
}

impl CommandRunner for FakeCommandRunner {
    fn run(&self, cwd: &Path, program: &Path, args: &[String]) -> std::io::Result<CommandOutput> {
        self.invocations.lock().unwrap().push(Invocation {
            cwd: cwd.to_path_buf(),
            program: program.to_path_buf(),
            args: args.to_vec(),
        });
        Ok(self.output.clone())
    }
}

/// Simulates `git clone` by materializing the destination tree, `.git`
/// included, the way a real clone would.
#[derive(Debug)]
struct CloningCommandRunner {
    invocations: Mutex<Vec<Invocation>>,
}

impl CloningCommandRunner {
    fn new() -> Self {
        Self {
            invocations: Mutex::new(Vec::new()),
        }
    }

    fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }
}

impl CommandRunner for CloningCommandRunner {
    fn run(&self, cwd: &Path, program: &Path, args: &[String]) -> std::io::Result<CommandOutput> {
        self.invocations.lock().unwrap().push(Invocation {
            cwd: cwd.to_path_buf(),
            program: program.to_path_buf(),
            args: args.to_vec(),
        });

        let dest = PathBuf::from(args.last().expect("clone target"));
        std::fs::create_dir_all(dest.join(".git"))?;
        std::fs::write(dest.join(".git/HEAD"), "ref: refs/heads/main\n")?;
        std::fs::write(dest.join("pom.xml"), "<project/>")?;

        Ok(CommandOutput {
            status: success_status(),
            stdout: String::new(),
            stderr: format!("Cloning into '{}'...\n", dest.display()),
        })
    }
}

fn success_status() -> ExitStatus {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        ExitStatus::from_raw(0)
    }
    #[cfg(windows)]
    {
        use std::os::windows::process::ExitStatusExt;
        ExitStatus::from_raw(0)
    }
}

fn failure_status() -> ExitStatus {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        ExitStatus::from_raw(1 << 8)
    }
    #[cfg(windows)]
    {
        use std::os::windows::process::ExitStatusExt;
        ExitStatus::from_raw(1)
    }
}

fn success_output() -> CommandOutput {
    CommandOutput {
        status: success_status(),
        stdout: String::new(),
        stderr: String::new(),
    }
}

#[test]
fn fetch_template_clones_shallow_and_strips_history() {
    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("order-svc");

    let runner = Arc::new(CloningCommandRunner::new());
    let client = GitClient::with_runner(GitConfig::default(), runner.clone());
    client
        .fetch_template("https://example.com/template.git", &dest)
        .unwrap();

    // The simulated checkout is there, its history is not.
    assert!(dest.join("pom.xml").is_file());
    assert!(!dest.join(".git").exists());

    let invocations = runner.invocations();
    assert_eq!(invocations.len(), 1);
    assert_eq!(invocations[0].program, PathBuf::from("git"));
    assert_eq!(
        invocations[0].args,
        vec![
            "clone".to_string(),
            "--depth".to_string(),
            "1".to_string(),
            "https://example.com/template.git".to_string(),
            dest.to_string_lossy().into_owned(),
        ]
    );
}

#[test]
fn finalize_runs_init_add_commit_in_order() {
    let tmp = tempfile::tempdir().unwrap();
    let runner = Arc::new(FakeCommandRunner::new(success_output()));
    let client = GitClient::with_runner(GitConfig::default(), runner.clone());

    client.finalize(tmp.path()).unwrap();

    let invocations = runner.invocations();
    let args: Vec<Vec<String>> = invocations.iter().map(|i| i.args.clone()).collect();
    assert_eq!(
        args,
        vec![
            vec!["init".to_string()],
            vec!["add".to_string(), "-A".to_string()],
            vec![
                "commit".to_string(),
                "-m".to_string(),
                "Initial commit".to_string()
            ],
        ]
    );
    assert!(invocations.iter().all(|i| i.cwd == tmp.path()));
}

#[test]
fn failed_command_surfaces_git_output() {
    let tmp = tempfile::tempdir().unwrap();
    let runner = Arc::new(FakeCommandRunner::new(CommandOutput {
        status: failure_status(),
        stdout: String::new(),
        stderr: "fatal: repository 'https://example.com/missing.git' not found\n".to_string(),
    }));
    let client = GitClient::with_runner(GitConfig::default(), runner);

    let err = client
        .fetch_template("https://example.com/missing.git", &tmp.path().join("dest"))
        .unwrap_err();
    match err {
        GitError::CommandFailed {
            command,
            code,
            stderr,
            ..
        } => {
            assert!(command.starts_with("git clone --depth 1"));
            assert_eq!(code, Some(1));
            assert!(stderr.contains("not found"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn custom_commit_message_is_used() {
    let tmp = tempfile::tempdir().unwrap();
    let runner = Arc::new(FakeCommandRunner::new(success_output()));
    let config = GitConfig {
        commit_message: "Scaffold order-svc".into(),
        ..GitConfig::default()
    };
    let client = GitClient::with_runner(config, runner.clone());

    client.finalize(tmp.path()).unwrap();

    let last = runner.invocations().pop().unwrap();
    assert_eq!(last.args.last().map(String::as_str), Some("Scaffold order-svc"));
}
