pub mod counter;
pub mod melds;

pub use counter::{AuditError, CardCounter, CounterError, CounterSnapshot};
pub use melds::{best_melds, cards_in_melds, is_gin};
