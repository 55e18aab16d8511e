//! User aggregate root, roles and approval status.

use super::error::{ParseRoleError, ParseUserStatusError, RegistryDomainError};
use super::ids::Principal;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform role held by a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    /// Client who purchases services and raises tasks.
    Client,
    /// External worker who executes delegated tasks.
    Partner,
    /// Internal administrator.
    Admin,
    /// Internal finance staff.
    Finance,
    /// Internal concierge staff.
    Concierge,
    /// Internal account manager mediating between client and partner.
    Asistenmu,
    /// Internal strategic partner liaison.
    StrategicPartner,
    /// The single first-claimed top-level administrative role.
    Superadmin,
}

impl Role {
    /// Roles that may be requested through internal self-registration.
    ///
    /// `Superadmin` is deliberately absent: it is only reachable through the
    /// one-time claim.
    pub const REGISTRABLE_INTERNAL: [Self; 5] = [
        Self::Admin,
        Self::Finance,
        Self::Concierge,
        Self::Asistenmu,
        Self::StrategicPartner,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Partner => "partner",
            Self::Admin => "admin",
            Self::Finance => "finance",
            Self::Concierge => "concierge",
            Self::Asistenmu => "asistenmu",
            Self::StrategicPartner => "strategicPartner",
            Self::Superadmin => "superadmin",
        }
    }

    /// Returns true for roles held by internal staff accounts.
    #[must_use]
    pub const fn is_internal(self) -> bool {
        matches!(
            self,
            Self::Admin
                | Self::Finance
                | Self::Concierge
                | Self::Asistenmu
                | Self::StrategicPartner
                | Self::Superadmin
        )
    }

    /// Returns true for roles with administrative authority.
    #[must_use]
    pub const fn is_admin_level(self) -> bool {
        matches!(self, Self::Admin | Self::Superadmin)
    }

    /// Parses a registrable internal role from caller-supplied text.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError::NotInternalRole`] when the text does
    /// not name a member of [`Role::REGISTRABLE_INTERNAL`].
    pub fn parse_internal(value: &str) -> Result<Self, RegistryDomainError> {
        let role = Self::try_from(value)
            .map_err(|_| RegistryDomainError::NotInternalRole(value.to_owned()))?;
        if Self::REGISTRABLE_INTERNAL.contains(&role) {
            Ok(role)
        } else {
            Err(RegistryDomainError::NotInternalRole(value.to_owned()))
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "client" => Ok(Self::Client),
            "partner" => Ok(Self::Partner),
            "admin" => Ok(Self::Admin),
            "finance" => Ok(Self::Finance),
            "concierge" => Ok(Self::Concierge),
            "asistenmu" => Ok(Self::Asistenmu),
            "strategicPartner" => Ok(Self::StrategicPartner),
            "superadmin" => Ok(Self::Superadmin),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Registration lifecycle status of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Registered and awaiting an approval decision.
    Pending,
    /// Approved and allowed to operate.
    Active,
    /// Rejected; terminal for this principal.
    Rejected,
}

impl UserStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Rejected => "rejected",
        }
    }
}

impl TryFrom<&str> for UserStatus {
    type Error = ParseUserStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseUserStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Approval decision recorded against a registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ApprovalDecision {
    /// The registration was approved.
    Approved {
        /// Principal of the deciding administrator.
        by: Principal,
        /// Decision timestamp.
        at: DateTime<Utc>,
    },
    /// The registration was rejected.
    Rejected {
        /// Principal of the deciding administrator.
        by: Principal,
        /// Decision timestamp.
        at: DateTime<Utc>,
        /// Optional rejection reason shown to the registrant.
        reason: Option<String>,
    },
}

/// Profile fields captured at registration time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    name: String,
    email: Option<String>,
    phone: Option<String>,
    company: Option<String>,
    kota: Option<String>,
}

impl UserProfile {
    /// Creates a profile with the required display name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError::EmptyName`] when the name is empty
    /// after trimming.
    pub fn new(name: impl Into<String>) -> Result<Self, RegistryDomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(RegistryDomainError::EmptyName);
        }
        Ok(Self {
            name: trimmed.to_owned(),
            email: None,
            phone: None,
            company: None,
            kota: None,
        })
    }

    /// Sets the contact email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the contact phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Sets the business/company name.
    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Sets the city of residence.
    #[must_use]
    pub fn with_kota(mut self, kota: impl Into<String>) -> Self {
        self.kota = Some(kota.into());
        self
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the contact email, if any.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the contact phone, if any.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Returns the company name, if any.
    #[must_use]
    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    /// Returns the city of residence, if any.
    #[must_use]
    pub fn kota(&self) -> Option<&str> {
        self.kota.as_deref()
    }
}

/// User aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    principal: Principal,
    profile: UserProfile,
    role: Role,
    status: UserStatus,
    decision: Option<ApprovalDecision>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted principal.
    pub principal: Principal,
    /// Persisted profile fields.
    pub profile: UserProfile,
    /// Persisted role.
    pub role: Role,
    /// Persisted status.
    pub status: UserStatus,
    /// Persisted approval decision, if any.
    pub decision: Option<ApprovalDecision>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a pending registration for the given role.
    #[must_use]
    pub fn register(principal: Principal, profile: UserProfile, role: Role, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            principal,
            profile,
            role,
            status: UserStatus::Pending,
            decision: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Creates an already-active user, stamped as approved by `registrar`.
    ///
    /// Used for the admin-registration path where no separate approval step
    /// follows.
    #[must_use]
    pub fn register_approved(
        principal: Principal,
        profile: UserProfile,
        role: Role,
        registrar: Principal,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            principal,
            profile,
            role,
            status: UserStatus::Active,
            decision: Some(ApprovalDecision::Approved {
                by: registrar,
                at: timestamp,
            }),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            principal: data.principal,
            profile: data.profile,
            role: data.role,
            status: data.status,
            decision: data.decision,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the principal.
    #[must_use]
    pub const fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Returns the profile fields.
    #[must_use]
    pub const fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the registration status.
    #[must_use]
    pub const fn status(&self) -> UserStatus {
        self.status
    }

    /// Returns the approval decision, if one has been made.
    #[must_use]
    pub const fn decision(&self) -> Option<&ApprovalDecision> {
        self.decision.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns true when the user may operate on the platform.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, UserStatus::Active)
    }

    /// Approves a pending registration.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError::InvalidStatusTransition`] when the
    /// user is not pending.
    pub fn approve(&mut self, by: Principal, clock: &impl Clock) -> Result<(), RegistryDomainError> {
        self.require_pending()?;
        let at = clock.utc();
        self.status = UserStatus::Active;
        self.decision = Some(ApprovalDecision::Approved { by, at });
        self.updated_at = at;
        Ok(())
    }

    /// Rejects a pending registration. Rejection is terminal.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError::InvalidStatusTransition`] when the
    /// user is not pending.
    pub fn reject(
        &mut self,
        by: Principal,
        reason: Option<String>,
        clock: &impl Clock,
    ) -> Result<(), RegistryDomainError> {
        self.require_pending()?;
        let at = clock.utc();
        self.status = UserStatus::Rejected;
        self.decision = Some(ApprovalDecision::Rejected { by, at, reason });
        self.updated_at = at;
        Ok(())
    }

    /// Replaces the user's role.
    ///
    /// Authorization is the facade's concern; the domain only records the
    /// change.
    pub fn change_role(&mut self, role: Role, clock: &impl Clock) {
        self.role = role;
        self.updated_at = clock.utc();
    }

    /// Promotes this user to the active superadmin.
    ///
    /// Only the repository claim operation should call this; uniqueness of
    /// the superadmin is enforced there. The timestamp is passed in so the
    /// promotion can run inside the repository's atomic section without a
    /// clock dependency.
    pub const fn promote_to_superadmin(&mut self, at: DateTime<Utc>) {
        self.role = Role::Superadmin;
        self.status = UserStatus::Active;
        self.updated_at = at;
    }

    fn require_pending(&self) -> Result<(), RegistryDomainError> {
        if self.status == UserStatus::Pending {
            Ok(())
        } else {
            Err(RegistryDomainError::InvalidStatusTransition {
                principal: self.principal.clone(),
                status: self.status,
            })
        }
    }
}
