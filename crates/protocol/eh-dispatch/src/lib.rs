//! Admission control, the dispatch coordinator, and the publisher (spec §4.7-§4.9).

mod admission;
mod coordinator;
mod error;
mod publisher;

pub use admission::{Admission, DispatchState};
pub use coordinator::{Coordinator, DispatchAction};
pub use error::{DispatchError, DispatchResult};
pub use publisher::Publisher;
