//! Purchase submission endpoints.
//!
//! The browser flow is redirect-driven: the POST below never renders a
//! body. Blocking errors redirect back to the form with flash messages;
//! success redirects to the confirmation page carrying the new account id.
//! Post-commit delivery failures soften the confirmation rather than
//! blocking it — by then the account exists and must stay reachable.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::signup::{FieldMessage, SignupForm};
use crate::domain::{AccountId, CredentialDelivery, Error, Plan, PlanId, SignupRejection};
use crate::inbound::http::flash::FlashSession;
use crate::inbound::http::host_env::delivery_channel_for;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Terminal message flashed when the email is already registered.
pub const DUPLICATE_EMAIL_MESSAGE: &str = "an account with this email already exists";
/// Generic message flashed when the provisioning transaction fails.
pub const PURCHASE_FAILED_MESSAGE: &str = "purchase failed, please try again";
/// Softened notice shown when post-commit delivery fails.
pub const CREDENTIALS_PENDING_NOTICE: &str = "your credentials will arrive shortly";

/// Browser path of the plan selection page.
pub const PLAN_LISTING_PATH: &str = "/plans";

fn see_other(location: String) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

fn purchase_form_path(plan_id: PlanId) -> String {
    format!("/plans/{plan_id}/purchase")
}

/// Data backing the purchase form: the plan plus any flashed messages from
/// a rejected submission.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseFormData {
    /// Plan being purchased.
    pub plan: Plan,
    /// Per-field validation messages from the previous submission.
    pub field_errors: Vec<FieldMessage>,
    /// Form-level message (duplicate email, purchase failed), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_error: Option<String>,
}

/// Purchase form data producer.
///
/// An unknown or inactive plan redirects to the plan listing: reaching the
/// form with a dead plan id is a navigation error, not a fault.
#[utoipa::path(
    get,
    path = "/plans/{plan_id}/purchase",
    params(("plan_id" = Uuid, Path, description = "Plan identifier")),
    responses(
        (status = 200, description = "Form data", body = PurchaseFormData),
        (status = 303, description = "Unknown plan; redirect to plan listing"),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["purchase"],
    operation_id = "purchaseForm"
)]
#[get("/plans/{plan_id}/purchase")]
pub async fn purchase_form(
    state: web::Data<HttpState>,
    flash: FlashSession,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let plan_id = PlanId::from_uuid(path.into_inner());
    let Some(plan) = state
        .plans
        .find_by_id(plan_id)
        .await
        .map_err(|err| Error::internal(format!("plan lookup failed: {err}")))?
        .filter(|plan| plan.is_active)
    else {
        return Ok(see_other(PLAN_LISTING_PATH.to_owned()));
    };

    Ok(HttpResponse::Ok().json(PurchaseFormData {
        plan,
        field_errors: flash.take_field_errors()?,
        form_error: flash.take_form_error()?,
    }))
}

/// Purchase submission endpoint.
///
/// Sequence: validate → provision → deliver credentials, with every outcome
/// mapped to a redirect. The notification channel follows the request's
/// `Host` header: local hosts capture the message to an artifact, anything
/// else uses the mail transport.
#[utoipa::path(
    post,
    path = "/plans/{plan_id}/purchase",
    params(("plan_id" = Uuid, Path, description = "Plan identifier")),
    responses(
        (status = 303, description = "Redirect to the confirmation page or back to the form"),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["purchase"],
    operation_id = "submitPurchase"
)]
#[post("/plans/{plan_id}/purchase")]
pub async fn submit_purchase(
    req: HttpRequest,
    state: web::Data<HttpState>,
    flash: FlashSession,
    path: web::Path<Uuid>,
    form: web::Form<SignupForm>,
) -> ApiResult<HttpResponse> {
    let plan_id = PlanId::from_uuid(path.into_inner());
    let channel = delivery_channel_for(&req);

    match state.signup.handle_submission(plan_id, &form, channel).await {
        Ok(outcome) => {
            if outcome.delivery == CredentialDelivery::Deferred {
                flash.push_notice(CREDENTIALS_PENDING_NOTICE)?;
            }
            Ok(see_other(format!(
                "/purchase/success?account={}",
                outcome.account_id
            )))
        }
        Err(SignupRejection::Invalid(messages)) => {
            flash.push_field_errors(&messages)?;
            Ok(see_other(purchase_form_path(plan_id)))
        }
        Err(SignupRejection::DuplicateEmail) => {
            flash.push_form_error(DUPLICATE_EMAIL_MESSAGE)?;
            Ok(see_other(purchase_form_path(plan_id)))
        }
        Err(SignupRejection::PlanNotFound) => Ok(see_other(PLAN_LISTING_PATH.to_owned())),
        Err(SignupRejection::Failed) => {
            flash.push_form_error(PURCHASE_FAILED_MESSAGE)?;
            Ok(see_other(purchase_form_path(plan_id)))
        }
    }
}

/// Query parameters carried by the success redirect.
#[derive(Debug, Deserialize)]
pub struct SuccessQuery {
    account: AccountId,
}

/// Purchase confirmation payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseConfirmation {
    /// The freshly provisioned account.
    pub account: AccountId,
    /// Softened delivery notice, when credentials are still on their way.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Confirmation page data: echoes the account id and consumes any softened
/// delivery notice.
#[utoipa::path(
    get,
    path = "/purchase/success",
    params(("account" = Uuid, Query, description = "Provisioned account identifier")),
    responses(
        (status = 200, description = "Confirmation", body = PurchaseConfirmation),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["purchase"],
    operation_id = "purchaseSuccess"
)]
#[get("/purchase/success")]
pub async fn purchase_success(
    flash: FlashSession,
    query: web::Query<SuccessQuery>,
) -> ApiResult<web::Json<PurchaseConfirmation>> {
    Ok(web::Json(PurchaseConfirmation {
        account: query.into_inner().account,
        notice: flash.take_notice()?,
    }))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::NotificationError;
    use crate::inbound::http::test_utils::{TestState, test_state, test_session_middleware};
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use chrono::Utc;
    use serde_json::Value;

    fn sample_plan() -> Plan {
        Plan {
            id: PlanId::random(),
            name: "Essential".into(),
            price_cents: 100,
            duration_months: 12,
            max_residents: 100,
            max_apartments: 40,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn form_body() -> Vec<(&'static str, &'static str)> {
        vec![
            ("syndic_name", "Jane Doe"),
            ("syndic_email", "jane@example.com"),
            ("syndic_phone", "0600000000"),
            ("company_name", "Sunset Towers"),
            ("company_city", "Casablanca"),
            ("company_address", ""),
        ]
    }

    async fn test_app(
        state: &TestState,
    ) -> impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    > {
        test::init_service(
            App::new()
                .app_data(web::Data::new(state.state.clone()))
                .wrap(test_session_middleware())
                .service(purchase_form)
                .service(submit_purchase)
                .service(purchase_success),
        )
        .await
    }

    fn location(res: &actix_web::dev::ServiceResponse) -> String {
        res.headers()
            .get(header::LOCATION)
            .expect("location header")
            .to_str()
            .expect("ascii location")
            .to_owned()
    }

    fn session_cookie(res: &actix_web::dev::ServiceResponse) -> Option<Cookie<'static>> {
        res.response()
            .cookies()
            .find(|c| c.name() == "session")
            .map(Cookie::into_owned)
    }

    #[actix_web::test]
    async fn valid_submission_redirects_to_success_with_account_id() {
        let plan = sample_plan();
        let fixture = test_state(vec![plan.clone()]);
        let app = test_app(&fixture).await;

        let req = test::TestRequest::post()
            .uri(&format!("/plans/{}/purchase", plan.id))
            .insert_header(("Host", "app.syndica.example"))
            .set_form(form_body())
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let target = location(&res);
        let account_id = fixture.repo.records()[0].account.id;
        assert_eq!(target, format!("/purchase/success?account={account_id}"));
        assert_eq!(fixture.transport.deliveries().len(), 1);
        assert!(fixture.capture.deliveries().is_empty());
    }

    #[actix_web::test]
    async fn localhost_submission_uses_the_capture_channel() {
        let plan = sample_plan();
        let fixture = test_state(vec![plan.clone()]);
        let app = test_app(&fixture).await;

        let req = test::TestRequest::post()
            .uri(&format!("/plans/{}/purchase", plan.id))
            .insert_header(("Host", "localhost:8080"))
            .set_form(form_body())
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert!(fixture.transport.deliveries().is_empty());
        assert_eq!(fixture.capture.deliveries().len(), 1);
    }

    #[actix_web::test]
    async fn invalid_submission_flashes_field_errors_back_to_the_form() {
        let plan = sample_plan();
        let fixture = test_state(vec![plan.clone()]);
        let app = test_app(&fixture).await;

        let req = test::TestRequest::post()
            .uri(&format!("/plans/{}/purchase", plan.id))
            .insert_header(("Host", "app.syndica.example"))
            .set_form(vec![
                ("syndic_name", "Jane Doe"),
                ("syndic_email", "not-an-email"),
                ("company_name", "Sunset Towers"),
                ("company_city", "Casablanca"),
            ])
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), format!("/plans/{}/purchase", plan.id));
        assert!(fixture.repo.records().is_empty());
        let cookie = session_cookie(&res).expect("flash cookie");

        let form_req = test::TestRequest::get()
            .uri(&format!("/plans/{}/purchase", plan.id))
            .cookie(cookie)
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, form_req).await).await;
        let errors = body
            .get("fieldErrors")
            .and_then(Value::as_array)
            .expect("field errors");
        assert_eq!(errors.len(), 2);
    }

    #[actix_web::test]
    async fn duplicate_email_flashes_a_single_terminal_message() {
        let plan = sample_plan();
        let fixture = test_state(vec![plan.clone()]);
        let app = test_app(&fixture).await;

        let first = test::TestRequest::post()
            .uri(&format!("/plans/{}/purchase", plan.id))
            .insert_header(("Host", "app.syndica.example"))
            .set_form(form_body())
            .to_request();
        assert_eq!(
            test::call_service(&app, first).await.status(),
            StatusCode::SEE_OTHER
        );

        let second = test::TestRequest::post()
            .uri(&format!("/plans/{}/purchase", plan.id))
            .insert_header(("Host", "app.syndica.example"))
            .set_form(form_body())
            .to_request();
        let res = test::call_service(&app, second).await;
        assert_eq!(location(&res), format!("/plans/{}/purchase", plan.id));
        assert_eq!(fixture.repo.records().len(), 1);
        let cookie = session_cookie(&res).expect("flash cookie");

        let form_req = test::TestRequest::get()
            .uri(&format!("/plans/{}/purchase", plan.id))
            .cookie(cookie)
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, form_req).await).await;
        assert_eq!(
            body.get("formError").and_then(Value::as_str),
            Some(DUPLICATE_EMAIL_MESSAGE)
        );
    }

    #[actix_web::test]
    async fn unknown_plan_redirects_to_the_plan_listing() {
        let fixture = test_state(vec![]);
        let app = test_app(&fixture).await;

        let req = test::TestRequest::post()
            .uri(&format!("/plans/{}/purchase", PlanId::random()))
            .insert_header(("Host", "app.syndica.example"))
            .set_form(form_body())
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), PLAN_LISTING_PATH);
    }

    #[actix_web::test]
    async fn delivery_failure_still_reaches_success_with_a_notice() {
        let plan = sample_plan();
        let fixture = test_state(vec![plan.clone()]);
        fixture
            .transport
            .fail_with(NotificationError::transport("relay unreachable"));
        let app = test_app(&fixture).await;

        let req = test::TestRequest::post()
            .uri(&format!("/plans/{}/purchase", plan.id))
            .insert_header(("Host", "app.syndica.example"))
            .set_form(form_body())
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let target = location(&res);
        assert!(target.starts_with("/purchase/success?account="));
        assert_eq!(fixture.repo.records().len(), 1);
        let cookie = session_cookie(&res).expect("flash cookie");

        let success_req = test::TestRequest::get()
            .uri(&target)
            .cookie(cookie)
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, success_req).await).await;
        assert_eq!(
            body.get("notice").and_then(Value::as_str),
            Some(CREDENTIALS_PENDING_NOTICE)
        );
    }
}
