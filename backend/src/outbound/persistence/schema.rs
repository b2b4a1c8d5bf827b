//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` whenever the migrations change.

diesel::table! {
    /// Accounts. `password_hash` is absent for Google-only accounts.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        username -> Varchar,
        role -> Varchar,
        password_hash -> Nullable<Text>,
        google_id -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    stables (id) {
        id -> Uuid,
        full_name -> Varchar,
        location -> Nullable<Varchar>,
        capacity -> Int4,
        description -> Nullable<Text>,
        stall_size -> Nullable<Varchar>,
        managed_by -> Nullable<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    horses (id) {
        id -> Uuid,
        name -> Varchar,
        age -> Nullable<Int2>,
        breed -> Nullable<Varchar>,
        owner -> Nullable<Varchar>,
        owner_email -> Varchar,
        birth_date -> Nullable<Date>,
        notes -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Stalls own the horse assignment; `status = 'occupied'` exactly when
    /// `horse_id` is set.
    stalls (id) {
        id -> Uuid,
        number -> Varchar,
        name -> Nullable<Varchar>,
        size -> Varchar,
        stable_id -> Nullable<Uuid>,
        status -> Varchar,
        horse_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    staff (id) {
        id -> Uuid,
        name -> Varchar,
        phone -> Varchar,
        email -> Varchar,
        role -> Varchar,
        specialities -> Array<Text>,
        schedule -> Array<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    expenses (id) {
        id -> Uuid,
        date -> Date,
        kind -> Varchar,
        category -> Varchar,
        related_model -> Nullable<Varchar>,
        related_id -> Nullable<Uuid>,
        amount_cents -> Int8,
        settled -> Bool,
        description -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    events (id) {
        id -> Uuid,
        title -> Varchar,
        date -> Date,
        hour -> Nullable<Time>,
        duration_minutes -> Nullable<Int4>,
        location -> Nullable<Varchar>,
        horse_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    horse_activities (id) {
        id -> Uuid,
        horse_id -> Uuid,
        date -> Nullable<Timestamptz>,
        duration_minutes -> Nullable<Int4>,
        all_day -> Bool,
        kind -> Nullable<Varchar>,
        notes -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(stables -> users (managed_by));
diesel::joinable!(stalls -> stables (stable_id));
diesel::joinable!(stalls -> horses (horse_id));
diesel::joinable!(events -> horses (horse_id));
diesel::joinable!(horse_activities -> horses (horse_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    stables,
    horses,
    stalls,
    staff,
    expenses,
    events,
    horse_activities,
);
