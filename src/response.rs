use serde::Serialize;

/// Success envelope shared by every JSON endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self { success: true, message: None, data: Some(data) }
    }

    pub fn with_message(message: &'static str, data: T) -> Self {
        Self { success: true, message: Some(message), data: Some(data) }
    }
}

impl ApiResponse<()> {
    pub fn message(message: &'static str) -> Self {
        Self { success: true, message: Some(message), data: None }
    }
}
