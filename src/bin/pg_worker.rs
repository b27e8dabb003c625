//! Runs one embedded `PostgreSQL` lifecycle step on behalf of a root test runner.
//!
//! ```text
//! pg_worker <setup|start|stop> <config-path>
//! ```
//!
//! The file at `config-path` holds a JSON `WorkerPayload` with the cluster
//! settings and the environment overrides to apply. When started as root the
//! worker re-executes itself as `nobody` and drops its groups before touching
//! the data directory. A started cluster keeps running after the worker exits.

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[cfg(unix)]
fn main() -> Result<(), BoxError> {
    lifecycle::run().map_err(Into::into)
}

#[cfg(not(unix))]
fn main() -> Result<(), BoxError> {
    Err("pg_worker needs a Unix host".into())
}

#[cfg(unix)]
mod lifecycle {
    use super::BoxError;
    use camino::{Utf8Path, Utf8PathBuf};
    use nix::unistd::{Uid, User, initgroups, setgid, setuid};
    use pg_embedded_setup_unpriv::ambient_dir_and_path;
    use pg_embedded_setup_unpriv::worker::{PlainSecret, WorkerPayload};
    use postgresql_embedded::{PostgreSQL, Status};
    use std::env;
    use std::ffi::CString;
    use std::io::{self, Read};
    use std::mem::ManuallyDrop;
    use std::process::{Command, ExitStatus};
    use thiserror::Error;
    use tokio::runtime::Builder;

    const REEXEC_MARKER: &str = "TASKTRACK_PG_WORKER_REEXEC";
    const TRUSTED_PATH: &str = "/usr/sbin:/usr/bin:/sbin:/bin";
    const SERVICE_USER: &str = "nobody";

    /// Failures of a worker invocation.
    #[derive(Debug, Error)]
    pub enum WorkerError {
        /// The command line did not name an operation and a config file.
        #[error("usage: pg_worker <setup|start|stop> <config-path>: {0}")]
        Usage(String),
        /// The payload file could not be read.
        #[error("cannot read worker payload: {0}")]
        PayloadRead(#[source] BoxError),
        /// The payload file is not a valid `WorkerPayload`.
        #[error("cannot parse worker payload: {0}")]
        PayloadParse(#[source] serde_json::Error),
        /// The payload settings could not be turned into cluster settings.
        #[error("invalid cluster settings: {0}")]
        Settings(String),
        /// The async runtime or the re-exec could not be set up.
        #[error("worker start-up failed: {0}")]
        Startup(#[source] io::Error),
        /// Switching to the service user failed.
        #[error("cannot drop privileges: {0}")]
        Privileges(String),
        /// The cluster rejected the requested step.
        #[error("cluster {step} failed: {message}")]
        Cluster {
            /// Lifecycle step that failed.
            step: &'static str,
            /// Message reported by `postgresql_embedded`.
            message: String,
        },
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Step {
        Setup,
        Start,
        Stop,
    }

    impl Step {
        fn parse(raw: &str) -> Result<Self, WorkerError> {
            match raw {
                "setup" => Ok(Self::Setup),
                "start" => Ok(Self::Start),
                "stop" => Ok(Self::Stop),
                other => Err(WorkerError::Usage(format!("unknown step '{other}'"))),
            }
        }

        const fn name(self) -> &'static str {
            match self {
                Self::Setup => "setup",
                Self::Start => "start",
                Self::Stop => "stop",
            }
        }
    }

    /// Parses the command line, demotes itself and runs the requested step.
    pub fn run() -> Result<(), WorkerError> {
        let args = utf8_args()?;
        let (step, config_path) = parse_args(&args)?;
        if Uid::effective().is_root() && env::var_os(REEXEC_MARKER).is_none() {
            let status = reexec_as_service_user(&args)?;
            std::process::exit(status.code().unwrap_or(1));
        }
        let payload = load_payload(config_path)?;
        drop_privileges(SERVICE_USER)?;
        let settings = payload
            .settings
            .into_settings()
            .map_err(|err| WorkerError::Settings(err.to_string()))?;
        apply_environment(&payload.environment);
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(WorkerError::Startup)?;
        runtime.block_on(perform(step, PostgreSQL::new(settings)))
    }

    fn utf8_args() -> Result<Vec<Utf8PathBuf>, WorkerError> {
        env::args_os()
            .map(|arg| {
                arg.into_string()
                    .map(Utf8PathBuf::from)
                    .map_err(|_| WorkerError::Usage("arguments must be UTF-8".to_owned()))
            })
            .collect()
    }

    fn parse_args(args: &[Utf8PathBuf]) -> Result<(Step, &Utf8Path), WorkerError> {
        match args {
            [_, step, config] => Ok((Step::parse(step.as_str())?, config.as_path())),
            [_] | [] => Err(WorkerError::Usage("missing arguments".to_owned())),
            [_, _] => Err(WorkerError::Usage("missing config path".to_owned())),
            [_, _, _, extra, ..] => {
                Err(WorkerError::Usage(format!("unexpected argument {extra}")))
            }
        }
    }

    fn reexec_as_service_user(args: &[Utf8PathBuf]) -> Result<ExitStatus, WorkerError> {
        let current = env::current_exe().map_err(WorkerError::Startup)?;
        let exe = Utf8PathBuf::from_path_buf(current).map_err(|_| {
            WorkerError::Startup(io::Error::other("worker path is not valid UTF-8"))
        })?;
        let forwarded = args.get(1..).unwrap_or_default();
        let launched = Command::new("runuser")
            .args(["-u", SERVICE_USER, "--"])
            .arg(&exe)
            .args(forwarded)
            .env(REEXEC_MARKER, "1")
            .env("PATH", TRUSTED_PATH)
            .status();
        match launched {
            Ok(status) => Ok(status),
            Err(err) if err.kind() == io::ErrorKind::NotFound => reexec_via_su(&exe, forwarded),
            Err(err) => Err(WorkerError::Privileges(err.to_string())),
        }
    }

    fn reexec_via_su(exe: &Utf8Path, forwarded: &[Utf8PathBuf]) -> Result<ExitStatus, WorkerError> {
        let script = std::iter::once(exe)
            .chain(forwarded.iter().map(Utf8PathBuf::as_path))
            .map(|part| quote_for_shell(part.as_str()))
            .fold(format!("{REEXEC_MARKER}=1 exec"), |mut command, part| {
                command.push(' ');
                command.push_str(&part);
                command
            });
        Command::new("/bin/su")
            .args(["-s", "/bin/sh", SERVICE_USER, "-c"])
            .arg(script)
            .env("PATH", TRUSTED_PATH)
            .status()
            .map_err(|err| WorkerError::Privileges(err.to_string()))
    }

    /// Wraps `value` in single quotes for `/bin/sh`.
    fn quote_for_shell(value: &str) -> String {
        let mut quoted = String::with_capacity(value.len() + 2);
        quoted.push('\'');
        for ch in value.chars() {
            if ch == '\'' {
                quoted.push_str("'\\''");
            } else {
                quoted.push(ch);
            }
        }
        quoted.push('\'');
        quoted
    }

    fn load_payload(path: &Utf8Path) -> Result<WorkerPayload, WorkerError> {
        let bytes = read_file(path).map_err(WorkerError::PayloadRead)?;
        serde_json::from_slice(&bytes).map_err(WorkerError::PayloadParse)
    }

    fn read_file(path: &Utf8Path) -> Result<Vec<u8>, BoxError> {
        let (dir, relative) = ambient_dir_and_path(path)?;
        let mut bytes = Vec::new();
        dir.open(relative.as_std_path())?.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    fn drop_privileges(username: &str) -> Result<(), WorkerError> {
        if !Uid::effective().is_root() {
            return Ok(());
        }
        let denied = |err: nix::Error| WorkerError::Privileges(err.to_string());
        let user = User::from_name(username)
            .map_err(denied)?
            .ok_or_else(|| WorkerError::Privileges(format!("no user named {username}")))?;
        let name = CString::new(user.name.as_str())
            .map_err(|err| WorkerError::Privileges(err.to_string()))?;
        initgroups(&name, user.gid).map_err(denied)?;
        setgid(user.gid).map_err(denied)?;
        setuid(user.uid).map_err(denied)?;
        // SAFETY: the worker is single-threaded until the runtime is built.
        unsafe {
            env::set_var("HOME", &user.dir);
            env::set_var("USER", &user.name);
            env::set_var("LOGNAME", &user.name);
        }
        Ok(())
    }

    fn apply_environment(environment: &[(String, Option<PlainSecret>)]) {
        for (key, value) in environment {
            // SAFETY: the worker is single-threaded until the runtime is built.
            unsafe {
                match value {
                    Some(secret) => env::set_var(key, secret.expose()),
                    None => env::remove_var(key),
                }
            }
        }
    }

    async fn perform(step: Step, mut postgres: PostgreSQL) -> Result<(), WorkerError> {
        let failed = |err: postgresql_embedded::Error| WorkerError::Cluster {
            step: step.name(),
            message: err.to_string(),
        };
        match step {
            Step::Setup => {
                postgres.setup().await.map_err(failed)?;
                start_unless_running(&mut postgres).await.map_err(failed)
            }
            Step::Start => {
                start_unless_running(&mut postgres).await.map_err(failed)?;
                // The handle would stop the server on drop.
                let _running = ManuallyDrop::new(postgres);
                Ok(())
            }
            Step::Stop => postgres.stop().await.map_err(failed),
        }
    }

    async fn start_unless_running(
        postgres: &mut PostgreSQL,
    ) -> Result<(), postgresql_embedded::Error> {
        if matches!(postgres.status(), Status::Started) {
            return Ok(());
        }
        postgres.start().await
    }

}
