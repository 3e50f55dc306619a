use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    AppState,
    middleware::{auth_middleware, log_errors},
    routes,
    utils::upload::PUBLIC_PREFIX,
};

/// Slack on top of the per-file limit for text fields and multipart framing.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route(
            "/accounts/register/candidate",
            post(routes::account::register_candidate),
        )
        .route(
            "/accounts/register/employer",
            post(routes::account::register_employer),
        )
        .route("/accounts/login", post(routes::account::login))
        .route("/jobs", get(routes::job::list_jobs))
        .route("/jobs/{id}", get(routes::job::get_job))
        .route("/employers", get(routes::employer::list_employers))
        .route("/employers/{id}", get(routes::employer::get_employer))
        .route("/employers/{id}/jobs", get(routes::employer::list_employer_jobs))
        .route("/sample-cvs", get(routes::sample_cv::list_sample_cvs))
        .route("/policies", get(routes::policy::list_policies))
        .route("/policies/{id}", get(routes::policy::get_policy))
        .route("/contacts", post(routes::contact::create_contact));

    let protected_routes = Router::new()
        // accounts
        .route("/accounts/me", get(routes::account::me))
        .route("/admin/accounts", get(routes::account::list_accounts))
        .route("/admin/accounts/{id}", delete(routes::account::delete_account))
        // candidates
        .route(
            "/candidates/me",
            get(routes::candidate::get_my_profile).put(routes::candidate::update_my_profile),
        )
        .route("/candidates/me/avatar", post(routes::candidate::upload_avatar))
        .route("/candidates/me/cv", post(routes::candidate::upload_cv))
        .route(
            "/candidates/me/applications",
            get(routes::candidate::list_my_applications),
        )
        .route("/candidates/{id}", get(routes::candidate::get_candidate))
        // employers
        .route(
            "/employers/me",
            get(routes::employer::get_my_profile).put(routes::employer::update_my_profile),
        )
        .route("/employers/me/avatar", post(routes::employer::upload_avatar))
        .route("/employers/me/jobs", get(routes::employer::list_my_jobs))
        // jobs and applications
        .route("/jobs", post(routes::job::create_job))
        .route("/jobs/{id}", put(routes::job::update_job))
        .route("/jobs/{id}/expire", post(routes::job::expire_job))
        .route(
            "/jobs/{id}/apply",
            post(routes::application::apply).delete(routes::application::withdraw),
        )
        .route(
            "/jobs/{id}/applications",
            get(routes::application::list_job_applications),
        )
        .route(
            "/jobs/{id}/applications/{candidate_id}",
            put(routes::application::review),
        )
        .route("/admin/jobs", get(routes::job::admin_list_jobs))
        .route("/admin/jobs/{id}", delete(routes::job::delete_job))
        .route("/admin/jobs/{id}/lock", put(routes::job::set_lock))
        .route("/admin/jobs/purge-expired", post(routes::job::purge_expired))
        // site content
        .route("/sample-cvs", post(routes::sample_cv::create_sample_cv))
        .route("/sample-cvs/{id}", delete(routes::sample_cv::delete_sample_cv))
        .route("/policies", post(routes::policy::create_policy))
        .route(
            "/policies/{id}",
            put(routes::policy::update_policy).delete(routes::policy::delete_policy),
        )
        .route("/contacts", get(routes::contact::list_contacts))
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    let router = Router::new()
        .nest(
            &state.config.api_base_uri,
            Router::new().merge(public_routes).merge(protected_routes),
        )
        .nest_service(PUBLIC_PREFIX, ServeDir::new(&state.config.upload_dir))
        .layer(from_fn(log_errors))
        .layer(DefaultBodyLimit::max(
            2 * state.config.max_upload_bytes + FORM_OVERHEAD_BYTES,
        ))
        .layer(TraceLayer::new_for_http());

    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(tower_http::cors::CorsLayer::permissive())
    };

    router.with_state(state)
}
