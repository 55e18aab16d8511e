//! Diesel schema for user registry persistence.

diesel::table! {
    /// Registered users keyed by external principal.
    users (principal) {
        /// External principal text.
        #[max_length = 63]
        principal -> Varchar,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Optional contact email.
        #[max_length = 255]
        email -> Nullable<Varchar>,
        /// Optional contact phone.
        #[max_length = 63]
        phone -> Nullable<Varchar>,
        /// Optional business/company name.
        #[max_length = 255]
        company -> Nullable<Varchar>,
        /// Optional city of residence.
        #[max_length = 255]
        kota -> Nullable<Varchar>,
        /// Platform role.
        #[max_length = 50]
        role -> Varchar,
        /// Registration status.
        #[max_length = 50]
        status -> Varchar,
        /// Approval decision payload, if decided.
        decision -> Nullable<Jsonb>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
