//! CreateCheckoutSessionHandler - Starts a hosted checkout for an application's processing fee.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::foundation::{to_minor_units, ApplicationId, ValidationError};
use crate::domain::LendingError;
use crate::ports::{ApplicationRepository, CheckoutSessionRequest, PaymentProvider};

/// Where the processor sends the payer back, and what it charges in.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    /// Frontend origin, without trailing slash.
    pub site_domain: String,
    /// Lowercase ISO 4217 code.
    pub currency: String,
}

impl CheckoutSettings {
    pub fn new(site_domain: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            site_domain: site_domain.into(),
            currency: currency.into(),
        }
    }

    /// `{CHECKOUT_SESSION_ID}` is filled in by the processor.
    pub fn success_url(&self) -> String {
        format!(
            "{}/dashboard/payment-success?session_id={{CHECKOUT_SESSION_ID}}",
            self.site_domain
        )
    }

    pub fn cancel_url(&self) -> String {
        format!("{}/dashboard/payment-cancelled", self.site_domain)
    }
}

#[derive(Debug, Clone)]
pub struct CreateCheckoutSessionCommand {
    pub application_id: String,
    pub loan_title: String,
    /// Fee in major units.
    pub cost: Decimal,
    pub user_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCheckoutSessionResult {
    pub url: String,
    pub session_id: String,
}

pub struct CreateCheckoutSessionHandler {
    applications: Arc<dyn ApplicationRepository>,
    payment_provider: Arc<dyn PaymentProvider>,
    settings: CheckoutSettings,
}

impl CreateCheckoutSessionHandler {
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        payment_provider: Arc<dyn PaymentProvider>,
        settings: CheckoutSettings,
    ) -> Self {
        Self {
            applications,
            payment_provider,
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateCheckoutSessionCommand,
    ) -> Result<CreateCheckoutSessionResult, LendingError> {
        // 1. Validate input
        let application_id = ApplicationId::parse(cmd.application_id)?;
        let loan_title = cmd.loan_title.trim().to_string();
        if loan_title.is_empty() {
            return Err(ValidationError::empty_field("loanTitle").into());
        }
        let user_email = cmd.user_email.trim().to_string();
        if !user_email.contains('@') {
            return Err(ValidationError::invalid_format("userEmail", "missing @").into());
        }
        let unit_amount = to_minor_units(cmd.cost)?;

        // 2. The fee must belong to a real application
        if self.applications.find_by_id(&application_id).await?.is_none() {
            return Err(LendingError::not_found("application", application_id.as_str()));
        }

        // 3. Ask the processor for a hosted page
        let session = self
            .payment_provider
            .create_checkout_session(CheckoutSessionRequest {
                application_id: application_id.to_string(),
                loan_title,
                unit_amount,
                currency: self.settings.currency.clone(),
                customer_email: user_email,
                success_url: self.settings.success_url(),
                cancel_url: self.settings.cancel_url(),
            })
            .await?;

        tracing::info!(
            application_id = %application_id,
            session_id = %session.id,
            unit_amount,
            "Checkout session created"
        );

        Ok(CreateCheckoutSessionResult {
            url: session.url,
            session_id: session.id,
        })
    }
}
