pub mod config;
pub mod engine;
pub mod orchestrator;
pub mod result;
pub mod writer;

pub use config::SimConfig;
pub use engine::PropagationEngine;
pub use orchestrator::CampaignOrchestrator;
pub use result::{Chain, Feedback, NewsResult, Summary};
pub use writer::ResultWriter;
