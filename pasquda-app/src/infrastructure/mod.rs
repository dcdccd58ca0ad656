pub mod anthropic;
pub mod db;
pub mod report_card;
pub mod screenshot;
pub mod security;
pub mod storage;
