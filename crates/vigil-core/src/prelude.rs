pub use crate::dispose::Dispose;
pub use crate::watch::Watch;
pub use crate::whenever::{ChildFactory, Unsubscribe, whenever};
