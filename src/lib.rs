pub mod demo_feed;
pub mod export;
pub mod http_client;
pub mod lineup_fetch;
pub mod provider;
pub mod schedule_fetch;
pub mod state;
pub mod stints;
