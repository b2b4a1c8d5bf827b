//! HTTP inbound adapter exposing REST endpoints.
//!
//! [`configure`] registers every resource scope together with the extractor
//! configs that turn malformed bodies, queries and paths into `400`
//! responses. The server and the integration tests share it.

pub mod accounts;
pub mod auth;
pub mod error;
pub mod events;
pub mod expenses;
pub mod health;
pub mod horse_activities;
pub mod horses;
pub mod oauth;
pub mod schemas;
pub mod session;
pub mod stables;
pub mod staff;
pub mod stalls;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register the API scopes and extractor configs on an app.
///
/// `HttpState` and `HealthState` must be provided as app data, and the
/// OAuth endpoints need a session middleware wrapping the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config())
        .app_data(validation::query_config())
        .app_data(validation::path_config())
        .service(health::index)
        .service(health::ready)
        .service(health::live)
        .service(
            web::scope("/auth")
                .service(accounts::register)
                .service(accounts::login)
                .service(accounts::me),
        )
        .service(
            web::scope("/oauth")
                .service(oauth::google_start)
                .service(oauth::google_callback),
        )
        .service(
            web::scope("/horses")
                .service(horses::list_horses)
                .service(horses::create_horse)
                .service(horses::get_horse)
                .service(horses::update_horse)
                .service(horses::delete_horse),
        )
        .service(
            web::scope("/stalls")
                .service(stalls::list_stalls)
                .service(stalls::create_stall)
                .service(stalls::assign_stall)
                .service(stalls::release_stall)
                .service(stalls::get_stall)
                .service(stalls::update_stall)
                .service(stalls::delete_stall),
        )
        .service(
            web::scope("/stables")
                .service(stables::list_stables)
                .service(stables::create_stable)
                .service(stables::get_stable)
                .service(stables::update_stable)
                .service(stables::delete_stable),
        )
        .service(
            web::scope("/staff")
                .service(staff::list_staff)
                .service(staff::create_staff)
                .service(staff::get_staff)
                .service(staff::update_staff)
                .service(staff::delete_staff),
        )
        .service(
            web::scope("/expenses")
                .service(expenses::list_expenses)
                .service(expenses::expense_summary)
                .service(expenses::create_expense)
                .service(expenses::get_expense)
                .service(expenses::update_expense)
                .service(expenses::delete_expense),
        )
        .service(
            web::scope("/horseActivities")
                .service(horse_activities::list_activities)
                .service(horse_activities::create_activity)
                .service(horse_activities::get_activity)
                .service(horse_activities::update_activity)
                .service(horse_activities::delete_activity),
        )
        .service(
            web::scope("/events")
                .service(events::events_between)
                .service(events::create_event)
                .service(events::event_weather)
                .service(events::events_on_date)
                .service(events::delete_event),
        );
}
