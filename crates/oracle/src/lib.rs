pub mod client;
pub mod parser;
pub mod prompt;
pub mod retry;
pub mod traits;

pub use client::{LlmOracle, OracleConfig, TransportError};
pub use parser::{ParseError, SharingDecision, parse_sharing_response};
pub use prompt::{NeighborInfo, NeighborInfos, PromptTemplates, SurveyTemplates};
pub use retry::{RetryConfig, RetryPolicy};
pub use traits::{DecisionOracle, SENTINEL_RESPONSE, Stage};
