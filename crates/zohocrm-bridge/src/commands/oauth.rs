//! OAuth commands.

use tracing::warn;

use crate::adapter::{OAuthCallback, ZohoAdapter};
use crate::error::BridgeResult;

use super::print_json;

/// Prints the consent page URL, optionally opening it in the browser.
pub fn url(adapter: &ZohoAdapter, open: bool) -> BridgeResult<()> {
    let url = adapter.oauth2_redirect_url()?;
    println!("{}", url);

    if open && let Err(e) = open::that(&url) {
        warn!("failed to open browser: {}", e);
        eprintln!("\nPlease open the URL above in your browser.");
    }

    Ok(())
}

/// Completes the flow and prints the `{apiKey, apiUrl}` pair to store.
pub async fn callback(adapter: &ZohoAdapter, callback: &OAuthCallback) -> BridgeResult<()> {
    let account = adapter.handle_oauth2_callback(callback).await?;
    print_json(&account)
}
