//! deploy-keychain - SSH wrapper that picks a deploy key per repository
//!
//! Usage (Git runs it in place of ssh):
//!   git config core.sshCommand deploy-keychain
//!   GIT_SSH=deploy-keychain git clone git@github.com:acct/repo.git
//!
//! Every argument is forwarded to the real SSH client unchanged, with
//! `-i <key>` prepended. Set DEPLOY_KEYCHAIN_DEBUG=1 to trace decisions.

use anyhow::{Context, Result};
use deploy_keychain::{identify, resolve, Config, Settings};
use keychain_core::{Paths, SshLauncher};
use std::ffi::OsString;
use tracing_subscriber::EnvFilter;

fn main() {
    let settings = Settings::from_env();
    init_logging(&settings);

    let forwarded: Vec<OsString> = std::env::args_os().skip(1).collect();
    let code = exit_code(run(forwarded, &Paths::new()));
    std::process::exit(code);
}

/// Stdout carries the SSH session, so diagnostics go to stderr and only in debug mode
fn init_logging(settings: &Settings) {
    let level = if settings.debug { "debug" } else { "off" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Report a failed run on stderr; otherwise pass SSH's exit code through
fn exit_code(result: Result<i32>) -> i32 {
    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            1
        }
    }
}

/// Pick a key for the repository in `forwarded` and run SSH with it
fn run(forwarded: Vec<OsString>, paths: &Paths) -> Result<i32> {
    let config = Config::load_with(paths).unwrap_or_else(|err| {
        eprintln!("Error loading config: {}", err);
        Config::with_defaults(paths)
    });

    let args: Vec<String> = forwarded
        .iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    tracing::debug!(?args, "Args");

    let repo = identify(&args).context("Unable to determine what repository is being used")?;
    let key = resolve(&config, &repo).context("Unable to determine key")?;

    let launcher = SshLauncher::new(&config.ssh_command);
    let code = launcher
        .run(&key, &forwarded)
        .context("Error running SSH")?;

    Ok(code)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use tempfile::{tempdir, TempDir};

    // Writing an executable while another test forks can fail with ETXTBSY
    static SPAWN_LOCK: Mutex<()> = Mutex::new(());

    /// A home directory with a config pointing at a fake ssh that records its arguments
    struct Fixture {
        home: TempDir,
        working: TempDir,
    }

    impl Fixture {
        fn new(ssh_command: Option<&str>) -> Self {
            let fx = Self {
                home: tempdir().unwrap(),
                working: tempdir().unwrap(),
            };

            let ssh = fx.home.path().join("fake-ssh");
            let body = format!(
                "#!/bin/sh\nprintf '%s\\n' \"$@\" > '{}'\nexit 5\n",
                fx.ssh_log().display()
            );
            fs::write(&ssh, body).unwrap();
            fs::set_permissions(&ssh, fs::Permissions::from_mode(0o755)).unwrap();

            let command = ssh_command
                .map(str::to_string)
                .unwrap_or_else(|| ssh.display().to_string());
            let config_dir = fx.home.path().join(".deploy-keychain");
            fs::create_dir_all(&config_dir).unwrap();
            fs::create_dir_all(fx.key_dir()).unwrap();
            fs::write(
                config_dir.join("deploy-keychain.yaml"),
                format!(
                    "ssh_command: '{}'\nkey_path: '{}'\n",
                    command,
                    fx.key_dir().display()
                ),
            )
            .unwrap();
            fx
        }

        fn paths(&self) -> Paths {
            Paths::with_dirs(
                Some(self.home.path().to_path_buf()),
                self.working.path().to_path_buf(),
            )
        }

        fn key_dir(&self) -> PathBuf {
            self.home.path().join("keys")
        }

        fn ssh_log(&self) -> PathBuf {
            self.home.path().join("ssh-args.txt")
        }

        fn add_key(&self, name: &str) -> PathBuf {
            let key = self.key_dir().join(name);
            fs::write(&key, "key").unwrap();
            key
        }

        fn run(&self, args: &[&str]) -> Result<i32> {
            let forwarded = args.iter().map(OsString::from).collect();
            run(forwarded, &self.paths())
        }
    }

    fn ssh_was_run(log: &Path) -> bool {
        log.exists()
    }

    #[test]
    fn test_runs_ssh_with_key_and_passes_exit_code() {
        let _guard = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let fx = Fixture::new(None);
        let key = fx.add_key("acct-repo.pem");

        let result = fx.run(&["git@github.com", "git-upload-pack 'acct/repo.git'"]);
        assert_eq!(exit_code(result), 5);

        let logged = fs::read_to_string(fx.ssh_log()).unwrap();
        let key = key.display().to_string();
        assert_eq!(
            logged.lines().collect::<Vec<_>>(),
            vec![
                "-i",
                key.as_str(),
                "git@github.com",
                "git-upload-pack 'acct/repo.git'"
            ]
        );
    }

    #[test]
    fn test_unidentified_repository_never_runs_ssh() {
        let _guard = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let fx = Fixture::new(None);
        fx.add_key("acct-repo.pem");

        let err = fx.run(&["git@github.com", "hello world"]).unwrap_err();
        assert!(format!("{:#}", err).contains("Unable to determine what repository is being used"));
        assert_eq!(exit_code(Err(err)), 1);
        assert!(!ssh_was_run(&fx.ssh_log()));
    }

    #[test]
    fn test_missing_key_never_runs_ssh() {
        let _guard = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let fx = Fixture::new(None);

        let err = fx
            .run(&["git@github.com", "git-upload-pack 'acct/repo.git'"])
            .unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("Unable to determine key"));
        assert!(message.contains("no key available for this repository"));
        assert_eq!(exit_code(Err(err)), 1);
        assert!(!ssh_was_run(&fx.ssh_log()));
    }

    #[test]
    fn test_unstartable_ssh_is_reported() {
        let _guard = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let fx = Fixture::new(Some("deploy-keychain-test-no-such-ssh"));
        fx.add_key("acct-repo.pem");

        let err = fx
            .run(&["git@github.com", "git-upload-pack 'acct/repo.git'"])
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Error running SSH"));
        assert_eq!(exit_code(Err(err)), 1);
    }
}
