pub mod list;
pub mod measure;

use serde::Deserialize;
use std::borrow::Cow;

/// An invocation of librespeed-cli.
///
/// The command line arguments are built from the request and the
/// process output is deserialized into `Response`.
pub trait Request {
    type Response: for<'de> Deserialize<'de>;

    fn args(&self) -> Vec<Cow<'_, str>>;
}

impl<R: Request> Request for &R {
    type Response = R::Response;

    fn args(&self) -> Vec<Cow<'_, str>> {
        (**self).args()
    }
}

impl<R: Request> Request for &mut R {
    type Response = R::Response;

    fn args(&self) -> Vec<Cow<'_, str>> {
        (**self).args()
    }
}
