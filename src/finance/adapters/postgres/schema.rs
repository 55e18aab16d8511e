//! Diesel schema for finance persistence.

diesel::table! {
    /// Settlement records, one per completed task.
    settlements (task_id) {
        /// Settled task identifier.
        task_id -> Uuid,
        /// Task status recorded at settlement.
        #[max_length = 50]
        task_status -> Varchar,
        /// Hours burned from the service balance.
        jam_dibakar -> Int8,
        /// Settlement value.
        nilai_tugas -> Int8,
        /// Platform fee share.
        platform_fee -> Int8,
        /// Partner fee share.
        partner_fee -> Int8,
        /// Referral fee share.
        partner_referral_fee -> Int8,
        /// Amount payable to the partner.
        jumlah_bayar -> Int8,
        /// Settlement timestamp.
        settled_at -> Timestamptz,
    }
}

diesel::table! {
    /// Accrued, unwithdrawn balances per partner.
    partner_balances (partner) {
        /// Partner principal.
        #[max_length = 63]
        partner -> Varchar,
        /// Current balance.
        saldo -> Int8,
    }
}

diesel::table! {
    /// Partner withdrawal requests.
    withdraws (id) {
        /// Withdrawal identifier.
        id -> Uuid,
        /// Requesting partner principal.
        #[max_length = 63]
        partner -> Varchar,
        /// Requested amount.
        amount -> Int8,
        /// Request status.
        #[max_length = 50]
        status -> Varchar,
        /// Resolving finance principal, if resolved.
        #[max_length = 63]
        resolved_by -> Nullable<Varchar>,
        /// Resolution timestamp, if resolved.
        resolved_at -> Nullable<Timestamptz>,
        /// Request timestamp.
        requested_at -> Timestamptz,
    }
}
