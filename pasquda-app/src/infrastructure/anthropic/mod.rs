mod client;
mod parse;
mod prompt;
mod types;

pub use client::AnthropicClient;
pub use parse::{parse_battle_verdict, parse_roast_payload};
