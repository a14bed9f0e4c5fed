use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::Deserialize;

use propinas_core::{DataDocument, Employee, NewTicket, Ticket};

use crate::error::{AppError, Result};
use crate::gateway::Gateway;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Talks to a running `propinas serve` instance over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteGateway {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl RemoteGateway {
    /// Accepts either the server root or its `/api` prefix.
    pub fn new(base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let root = trimmed.strip_suffix("/api").unwrap_or(trimmed);
        if root.is_empty() {
            return Err(AppError::InvalidInput("remote url is empty".to_string()));
        }
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: root.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }
}

fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|parsed| parsed.message)
        .unwrap_or_else(|_| match body.trim() {
            "" => status.canonical_reason().unwrap_or("request failed").to_string(),
            text => text.to_string(),
        });
    Err(AppError::Remote {
        status: status.as_u16(),
        message,
    })
}

impl Gateway for RemoteGateway {
    fn fetch(&mut self) -> Result<DataDocument> {
        let response = self.client.get(self.url("/data")).send()?;
        Ok(check(response)?.json()?)
    }

    fn create_ticket(&mut self, ticket: &NewTicket) -> Result<Ticket> {
        let response = self
            .client
            .post(self.url("/tickets"))
            .json(ticket)
            .send()?;
        Ok(check(response)?.json()?)
    }

    fn delete_ticket(&mut self, id: i64) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/tickets/{id}")))
            .send()?;
        check(response)?;
        Ok(())
    }

    fn replace_employees(&mut self, employees: &[Employee]) -> Result<Vec<Employee>> {
        let response = self
            .client
            .put(self.url("/employees"))
            .json(employees)
            .send()?;
        Ok(check(response)?.json()?)
    }
}
