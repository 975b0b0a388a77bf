pub mod intent;
pub mod processor;
pub mod report;
pub mod result;
pub mod wiql;

pub use intent::{
    EnrichedClassifier, IntentClassifier, IntentEnricher, IntentTag, KeywordClassifier,
};
pub use processor::{QueryProcessor, answer_query};
pub use result::QueryResult;
