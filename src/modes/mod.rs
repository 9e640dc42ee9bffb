pub mod play;
pub mod report;

pub use play::PlayMode;
pub use report::ReportMode;
