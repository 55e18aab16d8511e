//! Service layer for user registration paths.

use crate::registry::{
    domain::{Principal, RegistryDomainError, Role, User, UserProfile},
    ports::{UserRepository, UserRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for client self-registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRegistrationRequest {
    name: String,
    company: Option<String>,
    phone: Option<String>,
    email: Option<String>,
}

impl ClientRegistrationRequest {
    /// Creates a request with the required display name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            company: None,
            phone: None,
            email: None,
        }
    }

    /// Sets the business/company name.
    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Sets the contact phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Sets the contact email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    fn into_profile(self) -> Result<UserProfile, RegistryDomainError> {
        let mut profile = UserProfile::new(self.name)?;
        if let Some(company) = self.company {
            profile = profile.with_company(company);
        }
        if let Some(phone) = self.phone {
            profile = profile.with_phone(phone);
        }
        if let Some(email) = self.email {
            profile = profile.with_email(email);
        }
        Ok(profile)
    }
}

/// Service-level errors for registration operations.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] RegistryDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
}

/// Result type for registration service operations.
pub type RegistrationResult<T> = Result<T, RegistrationError>;

/// Registration orchestration service.
#[derive(Clone)]
pub struct RegistrationService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> RegistrationService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new registration service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Registers a pending client.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError`] when the profile is invalid or the
    /// principal is already registered.
    pub async fn self_register_client(
        &self,
        principal: Principal,
        request: ClientRegistrationRequest,
    ) -> RegistrationResult<User> {
        let profile = request.into_profile()?;
        self.register_pending(principal, profile, Role::Client).await
    }

    /// Registers a pending partner with their city of residence.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError`] when the profile is invalid or the
    /// principal is already registered.
    pub async fn self_register_partner(
        &self,
        principal: Principal,
        name: impl Into<String> + Send,
        kota: impl Into<String> + Send,
    ) -> RegistrationResult<User> {
        let profile = UserProfile::new(name)?.with_kota(kota);
        self.register_pending(principal, profile, Role::Partner).await
    }

    /// Registers a pending internal staff member.
    ///
    /// The requested role text is validated against the fixed registrable
    /// internal-role set.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError`] when the role text is not a
    /// registrable internal role, the profile is invalid, or the principal
    /// is already registered.
    pub async fn self_register_internal(
        &self,
        principal: Principal,
        name: impl Into<String> + Send,
        requested_role: &str,
    ) -> RegistrationResult<User> {
        let role = Role::parse_internal(requested_role)?;
        let profile = UserProfile::new(name)?;
        self.register_pending(principal, profile, role).await
    }

    /// Registers internal staff on behalf of an administrator.
    ///
    /// The created user is active immediately and stamped as approved by
    /// the registrar; no separate approval step follows.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError`] when the role text is not a
    /// registrable internal role, the profile is invalid, or the principal
    /// is already registered.
    pub async fn register_internal_staff(
        &self,
        registrar: Principal,
        principal: Principal,
        name: impl Into<String> + Send,
        requested_role: &str,
    ) -> RegistrationResult<User> {
        let role = Role::parse_internal(requested_role)?;
        let profile = UserProfile::new(name)?;
        let user =
            User::register_approved(principal, profile, role, registrar, &*self.clock);
        self.repository.store(&user).await?;
        info!(
            principal = %user.principal(),
            role = %user.role(),
            "internal staff registered by administrator"
        );
        Ok(user)
    }

    async fn register_pending(
        &self,
        principal: Principal,
        profile: UserProfile,
        role: Role,
    ) -> RegistrationResult<User> {
        let user = User::register(principal, profile, role, &*self.clock);
        self.repository.store(&user).await?;
        info!(
            principal = %user.principal(),
            role = %user.role(),
            "registration received, awaiting approval"
        );
        Ok(user)
    }
}
