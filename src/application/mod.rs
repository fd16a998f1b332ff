pub mod use_cases;

pub use use_cases::aggregator::AggregateUseCase;
pub use use_cases::loader::{LoadOutcome, LoadUseCase};
pub use use_cases::narrator::{build_prompt, NarrateUseCase};
pub use use_cases::session::DigestSession;
