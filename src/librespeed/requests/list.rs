use crate::librespeed::requests::Request;
use std::borrow::Cow;

/// List the speed test servers librespeed-cli knows about.
///
/// The listing is plain text and passed through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListServers;

impl Request for ListServers {
    type Response = String;

    fn args(&self) -> Vec<Cow<'_, str>> {
        vec!["--list".into()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_args() {
        assert_eq!(ListServers.args(), vec!["--list"]);
    }
}
