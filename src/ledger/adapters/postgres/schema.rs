//! Diesel schema for layanan ledger persistence.

diesel::table! {
    /// Layanan records with hour balance and hold accounting.
    layanan (id) {
        /// Layanan identifier.
        id -> Uuid,
        /// Owning client principal.
        #[max_length = 63]
        client -> Varchar,
        /// Assigned account manager principal.
        #[max_length = 63]
        asistenmu -> Varchar,
        /// Service type.
        #[max_length = 50]
        jenis -> Varchar,
        /// Staffing model.
        #[max_length = 50]
        resource_type -> Varchar,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Sale price per unit.
        harga_per_unit -> Int8,
        /// Hourly tariff used for settlement.
        tarif_per_jam -> Int8,
        /// Hour balance at activation.
        saldo_original -> Int8,
        /// Spendable hour balance.
        saldo_jam_efektif -> Int8,
        /// Hours reserved against in-flight tasks.
        jam_on_hold -> Int8,
        /// Optional service deadline.
        deadline -> Nullable<Timestamptz>,
        /// Optional scope description.
        scope -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
