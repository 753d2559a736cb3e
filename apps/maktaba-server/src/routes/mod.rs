//! Route modules for Maktaba Server

pub mod epub;
pub mod health;

use serde::Serialize;

/// Success envelope shared by the JSON endpoints
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
