//! Language-model advisory features.
//!
//! Four operations sit behind the [`Advisor`] trait: project cost estimates,
//! product recommendations, a storefront chat assistant, and deposit plan
//! suggestions. Production uses [`OpenAiAdvisor`]; tests substitute a stub.

use async_trait::async_trait;

pub mod error;
pub mod openai;
pub mod types;

pub use error::AiError;
pub use openai::OpenAiAdvisor;
pub use types::{
    ChatTurn, CostLine, DepositCalcRequest, DepositPlan, EstimateRequest, ProductRecommendations,
    ProductSuggestion, ProjectEstimate, RecommendationRequest, ScheduleEntry,
};

/// Language-model advisory operations.
#[async_trait]
pub trait Advisor: Send + Sync {
    /// Estimate the cost of a construction project.
    async fn project_estimate(&self, request: EstimateRequest)
    -> Result<ProjectEstimate, AiError>;

    /// Recommend catalog products for a project.
    async fn product_recommendations(
        &self,
        request: RecommendationRequest,
    ) -> Result<ProductRecommendations, AiError>;

    /// Reply to a chat message, given the prior turns of the session.
    async fn chat_reply(&self, message: &str, history: &[ChatTurn]) -> Result<String, AiError>;

    /// Suggest a deposit plan for a project budget.
    async fn deposit_plan(&self, request: DepositCalcRequest) -> Result<DepositPlan, AiError>;
}
