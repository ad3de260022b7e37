pub mod option;
pub mod result;
pub mod str;

pub mod prelude {
    pub use crate::{assert_err, assert_err_kind, assert_none, assert_ok, assert_some};
}
