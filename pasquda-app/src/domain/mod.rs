mod grade;
mod roast_input;
mod roast_payload;
mod verdict;

pub use grade::Grade;
pub use roast_input::RoastInput;
pub use roast_payload::RoastPayload;
pub use verdict::{BattleVerdict, RoastSnapshot, Winner};
