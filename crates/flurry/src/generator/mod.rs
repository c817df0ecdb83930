mod flake;
mod iter;
#[cfg(feature = "lock")]
mod lock;
#[cfg(feature = "lock")]
mod mutex;
mod options;

pub use flake::*;
pub use iter::*;
#[cfg_attr(docsrs, doc(cfg(feature = "lock")))]
#[cfg(feature = "lock")]
pub use lock::*;
#[cfg(feature = "lock")]
pub(crate) use mutex::*;
pub use options::*;
