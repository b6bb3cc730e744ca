//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the purchase workflow endpoints and health probes. The generated
//! document backs Swagger UI in debug builds.

use utoipa::OpenApi;

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Syndica backend API",
        description = "HTTP interface for subscription plan purchase and provisioning."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::plans::list_plans,
        crate::inbound::http::plans::get_plan,
        crate::inbound::http::signup::purchase_form,
        crate::inbound::http::signup::submit_purchase,
        crate::inbound::http::signup::purchase_success,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::domain::Error,
        crate::domain::ErrorCode,
        crate::domain::Plan,
        crate::domain::PlanId,
        crate::domain::AccountId,
        crate::domain::signup::FieldMessage,
        crate::inbound::http::signup::PurchaseFormData,
        crate::inbound::http::signup::PurchaseConfirmation,
    )),
    tags(
        (name = "plans", description = "Plan catalogue"),
        (name = "purchase", description = "Purchase submission workflow"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_includes_the_purchase_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();

        assert!(paths.iter().any(|p| p == "/api/v1/plans"));
        assert!(paths.iter().any(|p| p == "/plans/{plan_id}/purchase"));
        assert!(paths.iter().any(|p| p == "/purchase/success"));
    }
}
