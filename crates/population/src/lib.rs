pub mod directory;
pub mod matcher;
pub mod sampler;
pub mod schema;

pub use directory::{UserDirectory, load_news};
pub use sampler::{RelationSampler, SamplingConfig};
pub use schema::{DiseaseInfo, NewsItem, Profile, Relations, User};
