use crate::{AuthApi, TableApi};

/// Everything the application layer needs from the hosted backend.
pub trait BackendGateway: AuthApi + TableApi {}

impl<T: AuthApi + TableApi> BackendGateway for T {}
