use crate::librespeed::requests::Request;
use crate::results::MeasurementResponse;
use std::borrow::Cow;

/// Run a speed test over HTTPS and report the result as JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Measure {
    /// Server id from `--list`, a random server when `None`
    pub server: Option<u32>,
    /// Use 1024 instead of 1000 bytes per kilobyte
    pub mebibytes: bool,
}

impl Request for Measure {
    type Response = MeasurementResponse;

    fn args(&self) -> Vec<Cow<'_, str>> {
        let mut args: Vec<Cow<str>> = vec!["--secure".into(), "--json".into()];

        if let Some(server) = self.server {
            args.push("--server".into());
            args.push(server.to_string().into());
        }

        if self.mebibytes {
            args.push("--mebibytes".into());
        }

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        assert_eq!(Measure::default().args(), vec!["--secure", "--json"]);
    }

    #[test]
    fn test_server_and_mebibytes_args() {
        let request = Measure { server: Some(42), mebibytes: true };
        assert_eq!(
            request.args(),
            vec!["--secure", "--json", "--server", "42", "--mebibytes"]
        );
    }

    #[test]
    fn test_request_by_reference() {
        let request = Measure { server: Some(7), mebibytes: false };
        assert_eq!((&request).args(), request.args());
    }
}
