//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Task records with lifecycle status and delegation data.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning client principal.
        #[max_length = 63]
        client -> Varchar,
        /// Layanan the task draws hours from.
        layanan_id -> Uuid,
        /// Task title.
        #[max_length = 255]
        judul -> Varchar,
        /// Request detail.
        detail_permintaan -> Text,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Recorded estimate, if any.
        estimasi_jam -> Nullable<Int8>,
        /// Whether the client approved the estimate.
        estimasi_disetujui -> Bool,
        /// Hours held against the layanan.
        jam_reserved -> Int8,
        /// Delegation payload, if a partner is assigned.
        internal_data -> Nullable<Jsonb>,
        /// Client-facing drive link, if any.
        #[max_length = 255]
        link_drive_client -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
