pub mod args;
pub mod error;
pub mod model;
pub mod score;
pub mod storage;
pub mod controller {
    pub mod db_prefill;
}
pub mod view {
    pub mod leaderboard;
    pub mod match_card;
    pub mod players;
}
