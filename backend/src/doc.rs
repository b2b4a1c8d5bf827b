//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint; request and response bodies are
//! collected from the handler annotations. Domain types stay free of utoipa
//! derives, so [`ErrorSchema`] and [`ErrorCodeSchema`] stand in for them.
//!
//! The document is served by Swagger UI in debug builds and exported via
//! `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Register the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                Http::builder()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token returned by POST /auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Stable Manager API",
        description = "Horses, stalls, stables, staff, finances and the training schedule."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::health::index,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::me,
        crate::inbound::http::oauth::google_start,
        crate::inbound::http::oauth::google_callback,
        crate::inbound::http::horses::list_horses,
        crate::inbound::http::horses::get_horse,
        crate::inbound::http::horses::create_horse,
        crate::inbound::http::horses::update_horse,
        crate::inbound::http::horses::delete_horse,
        crate::inbound::http::stalls::list_stalls,
        crate::inbound::http::stalls::get_stall,
        crate::inbound::http::stalls::create_stall,
        crate::inbound::http::stalls::update_stall,
        crate::inbound::http::stalls::delete_stall,
        crate::inbound::http::stalls::assign_stall,
        crate::inbound::http::stalls::release_stall,
        crate::inbound::http::stables::list_stables,
        crate::inbound::http::stables::get_stable,
        crate::inbound::http::stables::create_stable,
        crate::inbound::http::stables::update_stable,
        crate::inbound::http::stables::delete_stable,
        crate::inbound::http::staff::list_staff,
        crate::inbound::http::staff::get_staff,
        crate::inbound::http::staff::create_staff,
        crate::inbound::http::staff::update_staff,
        crate::inbound::http::staff::delete_staff,
        crate::inbound::http::expenses::list_expenses,
        crate::inbound::http::expenses::expense_summary,
        crate::inbound::http::expenses::get_expense,
        crate::inbound::http::expenses::create_expense,
        crate::inbound::http::expenses::update_expense,
        crate::inbound::http::expenses::delete_expense,
        crate::inbound::http::horse_activities::list_activities,
        crate::inbound::http::horse_activities::get_activity,
        crate::inbound::http::horse_activities::create_activity,
        crate::inbound::http::horse_activities::update_activity,
        crate::inbound::http::horse_activities::delete_activity,
        crate::inbound::http::events::events_between,
        crate::inbound::http::events::events_on_date,
        crate::inbound::http::events::create_event,
        crate::inbound::http::events::delete_event,
        crate::inbound::http::events::event_weather,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "health", description = "Banner and health probes"),
        (name = "auth", description = "Registration, login and the current user"),
        (name = "oauth", description = "Google sign-in popup flow"),
        (name = "horses", description = "Horse records"),
        (name = "stalls", description = "Stalls and horse assignment"),
        (name = "stables", description = "Stable buildings"),
        (name = "staff", description = "Staff members"),
        (name = "expenses", description = "Expenses, income and the summary"),
        (name = "horseActivities", description = "Per-horse activity log"),
        (name = "events", description = "Schedule and event weather")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    #[rstest]
    fn error_schema_has_wire_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let RefOr::T(Schema::Object(error)) = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema")
        else {
            panic!("expected object schema");
        };
        for field in ["code", "message", "traceId", "details"] {
            assert!(error.properties.contains_key(field), "missing {field}");
        }
    }

    #[rstest]
    #[case("/auth/login")]
    #[case("/stalls/{id}/assign")]
    #[case("/expenses/summary")]
    #[case("/events/{id}/weather")]
    #[case("/horseActivities/{id}")]
    fn registers_paths(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn request_bodies_are_collected() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        for name in ["HorseRequest", "StallRequest", "EventRequest", "WeatherResponse"] {
            assert!(schemas.contains_key(name), "missing schema {name}");
        }
    }

    #[rstest]
    fn declares_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.as_ref().expect("components");
        assert!(components.security_schemes.contains_key("BearerAuth"));
    }
}
