//! Account services - customers and administrators
//!
//! Role stamping happens in plain decoration functions called by the
//! services: new customers are always REGULAR, administrator responses are
//! always ADMIN, and login responses carry the account type.

use crate::auth::{JwtService, PasswordService};
use crate::config::AdminConfig;
use crate::error::ApiError;
use crate::repositories::{
    AdministratorRecord, AdministratorRepository, CustomerRecord, CustomerRepository,
    NewAdministrator, NewCustomer,
};
use diet_tracker_shared::types::{
    AdministratorProfile, AuthTokens, CreateCustomerRequest, CustomerProfile, LoginResponse,
};
use diet_tracker_shared::UserType;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

const EMAIL_TAKEN: &str = "Email already registered";

/// Force the sign-up type to REGULAR whatever the client sent
pub fn stamp_regular(request: &mut CreateCustomerRequest) {
    request.user_type = Some(UserType::Regular);
}

/// Decorate issued tokens with the account id and type
pub fn login_response(tokens: AuthTokens, user_id: Uuid, user_type: UserType) -> LoginResponse {
    LoginResponse {
        tokens,
        user_id: user_id.to_string(),
        user_type,
    }
}

pub fn customer_profile(record: CustomerRecord) -> Result<CustomerProfile, ApiError> {
    let user_type = record.role().map_err(ApiError::Internal)?;
    Ok(CustomerProfile {
        id: record.id.to_string(),
        email: record.email,
        name: record.name,
        last_name: record.last_name,
        username: record.username,
        user_type,
        created_at: record.created_at,
    })
}

/// Administrator profiles are stamped ADMIN
pub fn administrator_profile(record: AdministratorRecord) -> AdministratorProfile {
    AdministratorProfile {
        id: record.id.to_string(),
        email: record.email,
        name: record.name,
        last_name: record.last_name,
        username: record.username,
        user_type: UserType::Admin,
        created_at: record.created_at,
    }
}

async fn verify_password(password: &str, hash: &str) -> Result<(), ApiError> {
    let valid = PasswordService::verify_async(password.to_string(), hash.to_string())
        .await
        .map_err(ApiError::Internal)?;

    if valid {
        Ok(())
    } else {
        Err(ApiError::Unauthorized("Invalid credentials".to_string()))
    }
}

/// Customer account service
pub struct CustomerService;

impl CustomerService {
    /// Register a customer; the stored type is always REGULAR
    pub async fn sign_up(
        db: &PgPool,
        mut request: CreateCustomerRequest,
    ) -> Result<CustomerProfile, ApiError> {
        request.validate()?;
        stamp_regular(&mut request);

        if CustomerRepository::email_exists(db, &request.email)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Conflict(EMAIL_TAKEN.to_string()));
        }

        let password_hash = PasswordService::hash_async(request.password)
            .await
            .map_err(ApiError::Internal)?;

        let record = CustomerRepository::create(
            db,
            NewCustomer {
                email: request.email,
                password_hash,
                name: request.name,
                last_name: request.last_name,
                username: request.username,
                user_type: request.user_type.unwrap_or(UserType::Regular),
            },
        )
        .await
        .map_err(|e| ApiError::from_insert(e, EMAIL_TAKEN))?;

        info!(customer_id = %record.id, "Customer registered");
        customer_profile(record)
    }

    pub async fn login(
        db: &PgPool,
        jwt: &JwtService,
        email: &str,
        password: &str,
    ) -> Result<LoginResponse, ApiError> {
        let customer = CustomerRepository::find_by_email(db, email)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

        verify_password(password, &customer.password_hash).await?;

        let user_type = customer.role().map_err(ApiError::Internal)?;
        let tokens = jwt
            .issue_tokens(customer.id, user_type)
            .map_err(ApiError::Internal)?;

        Ok(login_response(tokens, customer.id, user_type))
    }

    pub async fn get(db: &PgPool, customer_id: Uuid) -> Result<CustomerProfile, ApiError> {
        let record = CustomerRepository::find_by_id(db, customer_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Customer not found".to_string()))?;

        customer_profile(record)
    }

    /// Move a customer between REGULAR and PREMIUM
    pub async fn update_type(
        db: &PgPool,
        customer_id: Uuid,
        user_type: UserType,
    ) -> Result<CustomerProfile, ApiError> {
        if !user_type.is_customer() {
            return Err(ApiError::Validation(
                "Customer type must be REGULAR or PREMIUM".to_string(),
            ));
        }

        let record = CustomerRepository::update_type(db, customer_id, user_type)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Customer not found".to_string()))?;

        info!(customer_id = %customer_id, user_type = %user_type, "Customer type changed");
        customer_profile(record)
    }
}

/// Administrator account service
pub struct AdministratorService;

impl AdministratorService {
    pub async fn login(
        db: &PgPool,
        jwt: &JwtService,
        email: &str,
        password: &str,
    ) -> Result<LoginResponse, ApiError> {
        let admin = AdministratorRepository::find_by_email(db, email)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

        verify_password(password, &admin.password_hash).await?;

        let tokens = jwt
            .issue_tokens(admin.id, UserType::Admin)
            .map_err(ApiError::Internal)?;

        Ok(login_response(tokens, admin.id, UserType::Admin))
    }

    pub async fn get(db: &PgPool, admin_id: Uuid) -> Result<AdministratorProfile, ApiError> {
        let record = AdministratorRepository::find_by_id(db, admin_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Administrator not found".to_string()))?;

        Ok(administrator_profile(record))
    }

    /// Create the configured administrator unless the email already exists
    ///
    /// Returns `true` when an account was created.
    pub async fn bootstrap(db: &PgPool, admin: &AdminConfig) -> anyhow::Result<bool> {
        if AdministratorRepository::find_by_email(db, &admin.email)
            .await?
            .is_some()
        {
            info!(email = %admin.email, "Administrator already present");
            return Ok(false);
        }

        let password_hash = PasswordService::hash_async(admin.password.clone()).await?;
        let record = AdministratorRepository::create(
            db,
            NewAdministrator {
                email: admin.email.clone(),
                password_hash,
                name: admin.name.clone(),
                last_name: Some(admin.last_name.clone()),
                username: Some(admin.username.clone()),
            },
        )
        .await?;

        info!(admin_id = %record.id, email = %record.email, "Administrator created");
        Ok(true)
    }
}

/// Exchange a refresh token for a new token pair
///
/// The role decides which account table must still contain the subject.
pub async fn refresh_tokens(
    db: &PgPool,
    jwt: &JwtService,
    refresh_token: &str,
) -> Result<LoginResponse, ApiError> {
    let claims = jwt
        .validate_refresh_token(refresh_token)
        .map_err(|e| ApiError::Unauthorized(format!("Invalid refresh token: {}", e)))?;
    let user_id = claims
        .user_id()
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    let current_type = if claims.role == UserType::Admin {
        AdministratorRepository::find_by_id(db, user_id)
            .await
            .map_err(ApiError::Internal)?
            .map(|_| UserType::Admin)
    } else {
        CustomerRepository::find_type(db, user_id)
            .await
            .map_err(ApiError::Internal)?
    };
    let user_type =
        current_type.ok_or_else(|| ApiError::Unauthorized("Account not found".to_string()))?;

    let tokens = jwt
        .issue_tokens(user_id, user_type)
        .map_err(ApiError::Internal)?;

    Ok(login_response(tokens, user_id, user_type))
}
