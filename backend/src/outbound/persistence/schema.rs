//! Diesel schema definitions for the gateway's tables.

diesel::table! {
    /// Per-user profile carrying the credit balance.
    profiles (user_id) {
        /// Identity the profile belongs to.
        user_id -> Uuid,
        /// Remaining credit balance.
        credits -> Int8,
        /// Row creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only history of successful generations.
    generations (id) {
        /// Surrogate record identifier.
        id -> Uuid,
        /// Identity the generation ran for.
        user_id -> Uuid,
        /// Public URL of the stored artifact.
        image_url -> Text,
        /// Human-readable operation label.
        label -> Text,
        /// Settlement timestamp.
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(profiles, generations);
