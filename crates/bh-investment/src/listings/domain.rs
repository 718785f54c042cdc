use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::records::deserialize_timestamp;

pub const PROPERTIES: &str = "properties";
pub const CONTACT_MESSAGES: &str = "contact_messages";

/// Upper bound on records returned by any list operation.
pub const LIST_LIMIT: i64 = 1000;

/// Identifier wrapper for property listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(pub String);

impl PropertyId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier wrapper for contact inquiries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactMessageId(pub String);

impl ContactMessageId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// Market status accepted when a listing is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PropertyStatus {
    #[default]
    Available,
    Pending,
    Sold,
}

impl PropertyStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PropertyStatus::Available => "Available",
            PropertyStatus::Pending => "Pending",
            PropertyStatus::Sold => "Sold",
        }
    }
}

fn default_status() -> String {
    PropertyStatus::default().label().to_string()
}

/// A property listing as stored and returned to clients. `status` stays free
/// text here so rows written before the closed set existed still read back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub title: String,
    pub address: String,
    pub price: String,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub sqft: i64,
    pub image: String,
    pub description: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied listing fields. `id` and `created_at` are not part of the
/// shape, so any values sent for them are dropped during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyCreate {
    pub title: String,
    pub address: String,
    pub price: String,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub sqft: i64,
    pub image: String,
    pub description: String,
    #[serde(default)]
    pub status: PropertyStatus,
}

impl Property {
    pub fn from_create(create: PropertyCreate, created_at: DateTime<Utc>) -> Self {
        let PropertyCreate {
            title,
            address,
            price,
            bedrooms,
            bathrooms,
            sqft,
            image,
            description,
            status,
        } = create;

        Self {
            id: PropertyId::generate(),
            title,
            address,
            price,
            bedrooms,
            bathrooms,
            sqft,
            image,
            description,
            status: status.label().to_string(),
            created_at,
        }
    }
}

/// An inquiry submitted through the contact or offer forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: ContactMessageId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessageCreate {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl ContactMessage {
    pub fn from_create(create: ContactMessageCreate, created_at: DateTime<Utc>) -> Self {
        Self {
            id: ContactMessageId::generate(),
            name: create.name,
            email: create.email,
            phone: create.phone,
            message: create.message,
            created_at,
        }
    }
}
