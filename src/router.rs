//! HTTP routing and OpenAPI documentation configuration.
//!
//! All API endpoints are registered here with their utoipa annotations,
//! and Swagger UI serves the generated document at `/api/docs`.

use axum::Router;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::{controller, model::app::AppState};

/// Builds the application's HTTP router with all API endpoints and
/// Swagger UI documentation.
pub fn routes() -> Router<AppState> {
    #[derive(OpenApi)]
    #[openapi(info(title = "ScoutSync", description = "ScoutSync API"), tags(
        (name = controller::alliance::ALLIANCE_TAG, description = "Alliance registry and membership routes"),
        (name = controller::records::RECORDS_TAG, description = "Scouting record routes"),
        (name = controller::sync::SYNC_TAG, description = "Outbox poll and acknowledgment routes"),
        (name = controller::migrate::MIGRATE_TAG, description = "Portable dataset import/export routes"),
        (name = controller::jobs::JOBS_TAG, description = "Background job status routes"),
        (name = controller::push::PUSH_TAG, description = "Push notification routes"),
    ))]
    struct ApiDoc;

    let (routes, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(controller::alliance::create_alliance))
        .routes(routes!(controller::alliance::invite_member))
        .routes(routes!(controller::alliance::respond_to_invite))
        .routes(routes!(controller::alliance::activate))
        .routes(routes!(controller::alliance::deactivate))
        .routes(routes!(
            controller::alliance::get_shared_events,
            controller::alliance::put_shared_events
        ))
        .routes(routes!(controller::alliance::put_share_data))
        .routes(routes!(controller::alliance::get_status))
        .routes(routes!(controller::alliance::remove_member))
        .routes(routes!(
            controller::records::submit_record,
            controller::records::list_records
        ))
        .routes(routes!(controller::records::remove_shared_record))
        .routes(routes!(controller::sync::poll))
        .routes(routes!(controller::sync::ack))
        .routes(routes!(controller::migrate::import))
        .routes(routes!(controller::migrate::export))
        .routes(routes!(controller::migrate::reconcile))
        .routes(routes!(controller::jobs::get_job))
        .routes(routes!(controller::push::events))
        .split_for_parts();

    routes.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
}
