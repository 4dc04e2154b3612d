//! Notification sent once a subscription is recorded.

use async_trait::async_trait;

use eusko_shared::{EmailError, EmailService};

/// Sends the subscription notification to the management inbox.
#[async_trait]
pub trait SubscriptionNotifier: Send + Sync {
    /// Reports a recorded subscription.
    async fn subscription_paid(
        &self,
        member_login: &str,
        member_name: &str,
        amount: &str,
        payment_mode: &str,
    ) -> Result<(), EmailError>;
}

#[async_trait]
impl SubscriptionNotifier for EmailService {
    async fn subscription_paid(
        &self,
        member_login: &str,
        member_name: &str,
        amount: &str,
        payment_mode: &str,
    ) -> Result<(), EmailError> {
        let (subject, body) =
            Self::subscription_notification(member_login, member_name, amount, payment_mode);
        self.notify_management(&subject, &body).await
    }
}
