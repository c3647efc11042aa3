pub mod game_detail;
pub mod probe_result;

pub use game_detail::{DlcInfo, GameDetail, GameMedia, Screenshot, Video};
pub use probe_result::ProbeResult;
