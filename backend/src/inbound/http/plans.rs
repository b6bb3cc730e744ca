//! Plan catalogue endpoints feeding the purchase form.

use actix_web::{HttpResponse, get, web};
use uuid::Uuid;

use crate::domain::ports::PlanRepositoryError;
use crate::domain::{Error, Plan, PlanId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

fn map_plan_error(err: PlanRepositoryError) -> Error {
    match err {
        PlanRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("plan catalogue unavailable: {message}"))
        }
        PlanRepositoryError::Query { message } => {
            Error::internal(format!("plan catalogue query failed: {message}"))
        }
    }
}

/// List plans currently offered for purchase.
#[utoipa::path(
    get,
    path = "/api/v1/plans",
    responses(
        (status = 200, description = "Active plans", body = [Plan]),
        (status = 503, description = "Plan catalogue unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["plans"],
    operation_id = "listPlans"
)]
#[get("/plans")]
pub async fn list_plans(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Plan>>> {
    let plans = state.plans.list_active().await.map_err(map_plan_error)?;
    Ok(web::Json(plans))
}

/// Fetch one purchasable plan for the purchase form.
///
/// Inactive plans are hidden: the purchase form must not be reachable for a
/// tier that can no longer be bought.
#[utoipa::path(
    get,
    path = "/api/v1/plans/{plan_id}",
    params(("plan_id" = Uuid, Path, description = "Plan identifier")),
    responses(
        (status = 200, description = "Plan", body = Plan),
        (status = 404, description = "Unknown or inactive plan", body = Error),
        (status = 503, description = "Plan catalogue unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["plans"],
    operation_id = "getPlan"
)]
#[get("/plans/{plan_id}")]
pub async fn get_plan(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let plan_id = PlanId::from_uuid(path.into_inner());
    let plan = state
        .plans
        .find_by_id(plan_id)
        .await
        .map_err(map_plan_error)?
        .filter(|plan| plan.is_active)
        .ok_or_else(|| Error::not_found("no such plan"))?;
    Ok(HttpResponse::Ok().json(plan))
}
