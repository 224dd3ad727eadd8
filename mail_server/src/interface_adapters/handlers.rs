use crate::domain::entities::MailRequest;
use crate::interface_adapters::protocol::{IndexPage, MailForm};
use crate::interface_adapters::state::AppState;
use crate::use_cases::{DispatchMailUseCase, DispatchOutcome};
use askama::Template;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::Html;
use tracing::{error, info};

// Handler for the empty mail form.
pub async fn index() -> Result<Html<String>, StatusCode> {
    render(IndexPage { outcome: None })
}

// Handler for a submitted batch; the outcome is rendered back into the page.
pub async fn send_mail(
    State(state): State<AppState>,
    Form(form): Form<MailForm>,
) -> Result<Html<String>, StatusCode> {
    let request = MailRequest::from(form);
    let use_case = DispatchMailUseCase {
        clock: state.clock.clone(),
        shards: state.shards.clone(),
        allocators: state.allocators.as_ref(),
        timeouts: state.config.timeouts(),
    };

    let outcome = use_case.execute(&request).await;
    match &outcome {
        DispatchOutcome::Sent(count) => info!(
            server_id = %request.server_id,
            db_name = %request.db_name,
            sent = count,
            "mail dispatch finished"
        ),
        DispatchOutcome::Failed(err) => info!(
            server_id = %request.server_id,
            db_name = %request.db_name,
            error = %err,
            "mail dispatch rejected"
        ),
    }

    render(IndexPage {
        outcome: Some(outcome.to_string()),
    })
}

fn render(page: IndexPage) -> Result<Html<String>, StatusCode> {
    page.render().map(Html).map_err(|err| {
        error!(error = %err, "failed to render page");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}
