pub mod caller;

pub use caller::{Caller, PRINCIPAL_HEADER, parse_param};
