pub mod completions;
pub mod file_store;
pub mod fitness_llm;
pub mod recommendation_llm;

pub use file_store::FileStore;
pub use fitness_llm::OpenAiFitnessAdapter;
pub use recommendation_llm::OpenAiRecommendationAdapter;
