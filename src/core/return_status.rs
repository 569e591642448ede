use crate::core::notice::Notice;
use crate::domain::model::PaymentStatus;
use crate::domain::ports::Dialog;
use url::Url;

/// Reports the outcome carried by `?payment=...` and strips it from `location`.
///
/// Other query parameters survive. Unknown values are ignored and leave the
/// location as it was, so a second call on the same location reports nothing.
pub fn handle_return_status<D: Dialog>(location: &mut Url, dialog: &mut D) -> Option<PaymentStatus> {
    let raw = location
        .query_pairs()
        .find(|(key, _)| key == PaymentStatus::QUERY_KEY)
        .map(|(_, value)| value.into_owned())?;

    let Some(status) = PaymentStatus::from_query_value(&raw) else {
        tracing::debug!("Ignoring unrecognised payment status: {:?}", raw);
        return None;
    };

    tracing::info!("↩️ Returned from gateway with status: {:?}", status);
    dialog.notify(&Notice::Returned(status).to_string());
    clear_status(location);
    Some(status)
}

fn clear_status(location: &mut Url) {
    let remaining: Vec<(String, String)> = location
        .query_pairs()
        .filter(|(key, _)| key != PaymentStatus::QUERY_KEY)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if remaining.is_empty() {
        location.set_query(None);
    } else {
        location.query_pairs_mut().clear().extend_pairs(remaining);
    }
}
