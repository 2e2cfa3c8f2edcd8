use crate::common::context::Context;
use crate::common::error::ServiceResult;
use crate::models::performance::RecalculationSummary;
use crate::usecases::performance;

pub async fn recalculate_performance<C: Context>(ctx: &C) -> ServiceResult<RecalculationSummary> {
    performance::recalculate_all(ctx).await
}
