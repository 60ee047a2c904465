//! Backend calls of the viewer: the predicted network and the prediction job.

use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::components::network::Graph;
use crate::components::prediction::{PredictionCommand, PredictionStatus};
use crate::{Error, Result};

fn project_url(api_base: &str, project_id: &str, tail: &str) -> String {
	format!(
		"{}/projects/{}/{}",
		api_base.trim_end_matches('/'),
		project_id,
		tail
	)
}

fn predicted_network_url(api_base: &str, project_id: &str) -> String {
	project_url(api_base, project_id, "predicted-network")
}

fn prediction_url(api_base: &str, project_id: &str) -> String {
	project_url(api_base, project_id, "prediction")
}

/// Sends `opts` to `url` and fails on a non-success status.
async fn send(url: &str, opts: &RequestInit) -> Result<Response> {
	let window = web_sys::window().ok_or(Error::MissingElement("window"))?;
	opts.set_mode(RequestMode::Cors);
	let request = Request::new_with_str_and_init(url, opts)?;
	request.headers().set("Accept", "application/json")?;

	let response: Response = JsFuture::from(window.fetch_with_request(&request))
		.await?
		.dyn_into()?;
	if !response.ok() {
		return Err(Error::Fetch {
			url: url.to_owned(),
			status: response.status(),
		});
	}
	Ok(response)
}

/// GETs `url` and decodes the JSON body.
async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T> {
	let opts = RequestInit::new();
	opts.set_method("GET");
	let response = send(url, &opts).await?;
	let body = JsFuture::from(response.text()?)
		.await?
		.as_string()
		.unwrap_or_default();
	Ok(serde_json::from_str(&body)?)
}

/// PUTs `body` as JSON to `url`; the response body is not read.
async fn put_json<B: Serialize>(url: &str, body: &B) -> Result<()> {
	let opts = RequestInit::new();
	opts.set_method("PUT");
	opts.set_body(&JsValue::from_str(&serde_json::to_string(body)?));
	let headers = web_sys::Headers::new()?;
	headers.set("Content-Type", "application/json")?;
	opts.set_headers(&headers);
	send(url, &opts).await?;
	Ok(())
}

fn encode(project_id: &str) -> String {
	String::from(js_sys::encode_uri_component(project_id))
}

pub async fn fetch_predicted_network(api_base: &str, project_id: &str) -> Result<Graph> {
	get_json(&predicted_network_url(api_base, &encode(project_id))).await
}

pub async fn fetch_prediction_status(api_base: &str, project_id: &str) -> Result<PredictionStatus> {
	get_json(&prediction_url(api_base, &encode(project_id))).await
}

/// Starts or aborts the prediction job of `project_id`.
pub async fn set_prediction_state(
	api_base: &str,
	project_id: &str,
	command: PredictionCommand,
) -> Result<()> {
	put_json(&prediction_url(api_base, &encode(project_id)), &command).await
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn builds_project_urls() {
		assert_eq!(
			predicted_network_url("http://localhost:8080/api/", "p1"),
			"http://localhost:8080/api/projects/p1/predicted-network"
		);
		assert_eq!(
			prediction_url("http://localhost:8080/api", "p1"),
			"http://localhost:8080/api/projects/p1/prediction"
		);
	}
}
