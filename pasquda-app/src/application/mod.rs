mod process_battle;
mod process_roast;

pub use process_battle::BattlePipeline;
pub use process_roast::{db_err, RoastPipeline, WebsiteSubmission};
