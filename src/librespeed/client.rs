use crate::errors::PluginError;
use crate::librespeed::requests::Request;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Directory next to the plugin that holds the speed test binary.
pub const BINARY_DIR: &str = "Librespeed-cli";

/// File name of the speed test binary.
pub const BINARY_NAME: &str = "librespeed-cli";

/// Longest stderr excerpt carried into an error message.
const STDERR_EXCERPT: usize = 512;

/// Where librespeed-cli is looked up when no path is configured.
///
/// This is `Librespeed-cli/librespeed-cli` next to the running plugin,
/// falling back to a `PATH` lookup when the plugin location is unknown.
pub fn default_binary() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .map(|dir| dir.join(BINARY_DIR).join(BINARY_NAME))
        .unwrap_or_else(|| PathBuf::from(BINARY_NAME))
}

#[derive(Debug, Clone)]
pub struct Client {
    binary: PathBuf,
    timeout: Option<Duration>,
}

impl Client {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Client { binary: binary.into(), timeout: None }
    }

    /// Kill the speed test and fail if it runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub async fn send<R: Request>(
        &self,
        request: R,
    ) -> Result<R::Response, PluginError> {
        let args = request.args();
        debug!("Running {} {}", self.binary.display(), args.join(" "));

        let mut command = Command::new(&self.binary);
        command
            .args(args.iter().map(|arg| arg.as_ref()))
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, command.output())
                .await
                .map_err(|_| {
                    PluginError::timeout(format!(
                        "{} did not finish within {:?}",
                        self.binary.display(),
                        timeout
                    ))
                })??,
            None => command.output().await?,
        };

        debug!("{} exited with {}", self.binary.display(), output.status);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let excerpt: String =
                stderr.trim().chars().take(STDERR_EXCERPT).collect();
            return Err(PluginError::execution(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                excerpt
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout);

        parse_response(&text)
    }
}

/// Deserialize process output.
///
/// librespeed-cli prints JSON for results but plain text for listings,
/// so JSON is tried first and plain text second. When both fail the JSON
/// error is reported since it is the one that explains what went wrong.
pub(crate) fn parse_response<T>(text: &str) -> Result<T, PluginError>
where
    T: for<'de> Deserialize<'de>,
{
    match serde_json::from_str::<T>(text) {
        Ok(parsed) => Ok(parsed),
        Err(json_error) => {
            serde_plain::from_str(text).map_err(|_| json_error.into())
        }
    }
}
