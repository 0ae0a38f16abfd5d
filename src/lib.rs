pub mod elapsed;
pub mod feed;
pub mod http_client;
pub mod player_fetch;
pub mod roster_fetch;
pub mod state;
