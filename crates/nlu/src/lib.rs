pub mod error;
pub mod expertai;
pub mod google;
pub mod meaning;
pub mod normalize;
pub mod providers;

pub use error::{NluError, Result};
pub use expertai::{render_relations, Relation};
pub use google::AnalyzeResponse;
pub use meaning::{Entity, Intent, Meaning};
pub use normalize::{facts, Fact};
pub use providers::{ExpertAiClient, GoogleNluClient, WitClient};
