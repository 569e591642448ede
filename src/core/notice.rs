use crate::domain::model::PaymentStatus;
use std::fmt;

/// Text shown in blocking dialogs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    RegistrationClosed,
    UnknownPackage,
    ConfirmPurchase {
        name: String,
        currency: String,
        price: String,
        description: String,
    },
    GatewayNotConfigured {
        name: String,
        currency: String,
        amount: String,
    },
    PaymentPrepared {
        name: String,
        currency: String,
        amount: String,
        reference: String,
    },
    Returned(PaymentStatus),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::RegistrationClosed => write!(
                f,
                "Registration is now closed. We are no longer accepting new registrations for this period."
            ),
            Notice::UnknownPackage => write!(f, "Invalid package selected. Please try again."),
            Notice::ConfirmPurchase {
                name,
                currency,
                price,
                description,
            } => write!(
                f,
                "You are about to purchase the {name} for {currency} {price}.\n\n\
                 {description}\n\n\
                 You will be redirected to the payment gateway to complete your payment securely.\n\n\
                 Click OK to continue or Cancel to go back."
            ),
            Notice::GatewayNotConfigured {
                name,
                currency,
                amount,
            } => write!(
                f,
                "Payment Not Configured\n\n\
                 To enable payments, set the gateway site code and private key \
                 in the site configuration.\n\n\
                 Selected: {name} - {currency} {amount}"
            ),
            Notice::PaymentPrepared {
                name,
                currency,
                amount,
                reference,
            } => write!(
                f,
                "Payment request ready\n\n\
                 Package: {name}\n\
                 Amount: {currency} {amount}\n\
                 Reference: {reference}"
            ),
            Notice::Returned(PaymentStatus::Success) => write!(
                f,
                "Payment successful! Thank you for your purchase. We will contact you shortly with further details."
            ),
            Notice::Returned(PaymentStatus::Cancelled) => write!(
                f,
                "Payment was cancelled. If you need assistance, please contact us."
            ),
            Notice::Returned(PaymentStatus::Error) => write!(
                f,
                "There was an error processing your payment. Please try again or contact us for assistance."
            ),
        }
    }
}
