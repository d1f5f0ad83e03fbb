//! Filter engine: retrievers, matchers, and the conjunctive battery
//! that admits or drops an envelope (spec §4.3-§4.5).

mod battery;
mod error;
mod matcher;
mod retriever;
mod spec;

pub use battery::FilterBattery;
pub use error::{FilterError, FilterResult, RetrievalError};
pub use matcher::Matcher;
pub use retriever::{EnvelopeField, Retrieved, Retriever};
pub use spec::{Context, FilterSpec, MatcherKind};
