use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use mmscfg_overrides::{
	BoxError, DeliveryStatus, DownloadRequest, IdentityKey, MessageTransport, OverrideMap,
	SendRequest,
};
use serde::Serialize;
use tracing::info;

/// Transport that prints each dispatch as a JSON line instead of sending it.
pub struct DryRunTransport;

#[derive(Serialize)]
struct Dispatched<'a> {
	action: &'static str,
	identity: IdentityKey,
	content_uri: &'a str,
	location_url: Option<&'a str>,
	overrides: &'a OverrideMap,
}

impl DryRunTransport {
	fn emit(&self, record: &Dispatched<'_>) -> Result<(), BoxError> {
		let mut stdout = std::io::stdout().lock();
		serde_json::to_writer(&mut stdout, record)?;
		writeln!(stdout)?;
		Ok(())
	}
}

#[async_trait]
impl MessageTransport for DryRunTransport {
	async fn send(
		&self,
		identity: IdentityKey,
		request: SendRequest,
		overrides: Arc<OverrideMap>,
	) -> Result<(), BoxError> {
		info!(%identity, uri = %request.content_uri, "dry-run send");
		self.emit(&Dispatched {
			action: "send",
			identity,
			content_uri: &request.content_uri,
			location_url: request.location_url.as_deref(),
			overrides: &overrides,
		})?;
		if let Some(completion) = request.completion {
			completion.complete(DeliveryStatus::Delivered);
		}
		Ok(())
	}

	async fn download(
		&self,
		identity: IdentityKey,
		request: DownloadRequest,
		overrides: Arc<OverrideMap>,
	) -> Result<(), BoxError> {
		info!(%identity, url = %request.location_url, "dry-run download");
		self.emit(&Dispatched {
			action: "download",
			identity,
			content_uri: &request.content_uri,
			location_url: Some(&request.location_url),
			overrides: &overrides,
		})?;
		if let Some(completion) = request.completion {
			completion.complete(DeliveryStatus::Delivered);
		}
		Ok(())
	}
}
