//! Collects application errors and optionally surfaces them as
//! error notifications.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::notification::NotificationManager;

pub const DEFAULT_API_ERROR_MESSAGE: &str = "API 요청 중 오류가 발생했습니다.";
pub const NETWORK_ERROR_MESSAGE: &str = "네트워크 연결을 확인해주세요.";
const NOTIFICATION_TITLE: &str = "오류가 발생했습니다";

/// A recorded application error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppError {
    pub id: Uuid,
    pub context: Option<String>,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

/// A failed API call as reported by an HTTP layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiFailure {
    /// `message` field of the response body, if the server sent one
    pub response_message: Option<String>,
    /// Transport or client-side error description
    pub error_message: Option<String>,
}

#[derive(Debug, Default)]
pub struct ErrorHandler {
    errors: Vec<AppError>,
    notifier: Option<NotificationManager>,
}

impl ErrorHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also raise every handled error as an error notification
    pub fn with_notifier(notifier: NotificationManager) -> Self {
        Self {
            errors: Vec::new(),
            notifier: Some(notifier),
        }
    }

    pub fn handle_error(&mut self, message: impl Into<String>, context: Option<&str>) -> &AppError {
        let message = message.into();
        match context {
            Some(context) => error!(context, "{}", message),
            None => error!("{}", message),
        }

        if let Some(notifier) = &self.notifier {
            notifier.error(message.clone(), Some(NOTIFICATION_TITLE), None);
        }

        let index = self.errors.len();
        self.errors.push(AppError {
            id: Uuid::new_v4(),
            context: context.map(str::to_string),
            message,
            occurred_at: Utc::now(),
        });
        &self.errors[index]
    }

    /// Prefer the server's message, then the client error, then `fallback`
    pub fn handle_api_error(&mut self, failure: &ApiFailure, fallback: Option<&str>) -> &AppError {
        let message = failure
            .response_message
            .clone()
            .or_else(|| failure.error_message.clone())
            .unwrap_or_else(|| fallback.unwrap_or(DEFAULT_API_ERROR_MESSAGE).to_string());
        self.handle_error(message, Some("API"))
    }

    pub fn handle_network_error(&mut self) -> &AppError {
        self.handle_error(NETWORK_ERROR_MESSAGE, Some("Network"))
    }

    /// Fold all field messages into one error, joined by `, `
    pub fn handle_validation_error(&mut self, errors: &BTreeMap<String, Vec<String>>) -> &AppError {
        let message = errors.values().flatten().cloned().collect::<Vec<_>>().join(", ");
        self.handle_error(message, Some("Validation"))
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    pub fn last_error(&self) -> Option<&AppError> {
        self.errors.last()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[AppError] {
        &self.errors
    }
}
