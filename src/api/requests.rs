//! Request body types and their validation.
//!
//! Each endpoint that accepts a body has a tagged request type with an
//! explicit field-by-field `validate()` that returns either the normalized
//! values or a 400 carrying every violated field at once.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::ApiError;

const TITLE_MIN: usize = 3;
const TITLE_MAX: usize = 200;
const DESCRIPTION_MIN: usize = 10;

/// POST /register body
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /login body
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Normalized credentials from either auth request
#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// POST /advertisements body
#[derive(Debug, Default, Deserialize)]
pub struct CreateAdvertisement {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Normalized create payload
#[derive(Debug)]
pub struct NewAdvertisement {
    pub title: String,
    pub description: String,
}

/// PATCH /advertisements/{id} body. Unknown fields (notably `created_at`)
/// are ignored: creation timestamps are server-assigned and immutable.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAdvertisement {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Normalized partial-update payload; `None` keeps the stored value.
#[derive(Debug)]
pub struct AdvertisementChanges {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl AdvertisementChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

impl RegisterRequest {
    pub fn validate(self) -> Result<Credentials, ApiError> {
        validate_credentials(self.email, self.password)
    }
}

impl LoginRequest {
    pub fn validate(self) -> Result<Credentials, ApiError> {
        validate_credentials(self.email, self.password)
    }
}

impl CreateAdvertisement {
    pub fn validate(self) -> Result<NewAdvertisement, ApiError> {
        let mut errors = BTreeMap::new();

        match &self.title {
            Some(t) => check_title(t, &mut errors),
            None => {
                errors.insert("title".to_string(), REQUIRED.to_string());
            }
        }
        match &self.description {
            Some(d) => check_description(d, &mut errors),
            None => {
                errors.insert("description".to_string(), REQUIRED.to_string());
            }
        }

        if !errors.is_empty() {
            return Err(ApiError::validation("validation failed", errors));
        }

        // Both present and checked above
        Ok(NewAdvertisement {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
        })
    }
}

impl UpdateAdvertisement {
    pub fn validate(self) -> Result<AdvertisementChanges, ApiError> {
        let mut errors = BTreeMap::new();

        if let Some(ref t) = self.title {
            check_title(t, &mut errors);
        }
        if let Some(ref d) = self.description {
            check_description(d, &mut errors);
        }

        if !errors.is_empty() {
            return Err(ApiError::validation("validation failed", errors));
        }

        Ok(AdvertisementChanges {
            title: self.title,
            description: self.description,
        })
    }
}

const REQUIRED: &str = "this field is required";

fn validate_credentials(
    email: Option<String>,
    password: Option<String>,
) -> Result<Credentials, ApiError> {
    let mut errors = BTreeMap::new();

    match &email {
        Some(e) if !e.trim().is_empty() => {}
        Some(_) => {
            errors.insert("email".to_string(), "email must not be empty".to_string());
        }
        None => {
            errors.insert("email".to_string(), REQUIRED.to_string());
        }
    }
    match &password {
        Some(p) if !p.is_empty() => {}
        Some(_) => {
            errors.insert("password".to_string(), "password must not be empty".to_string());
        }
        None => {
            errors.insert("password".to_string(), REQUIRED.to_string());
        }
    }

    if !errors.is_empty() {
        return Err(ApiError::validation("validation failed", errors));
    }

    Ok(Credentials {
        email: email.unwrap_or_default(),
        password: password.unwrap_or_default(),
    })
}

fn check_title(title: &str, errors: &mut BTreeMap<String, String>) {
    let len = title.chars().count();
    if len < TITLE_MIN {
        errors.insert(
            "title".to_string(),
            format!("title must be at least {TITLE_MIN} characters long"),
        );
    } else if len > TITLE_MAX {
        errors.insert(
            "title".to_string(),
            format!("title must be at most {TITLE_MAX} characters long"),
        );
    }
}

fn check_description(description: &str, errors: &mut BTreeMap<String, String>) {
    if description.chars().count() < DESCRIPTION_MIN {
        errors.insert(
            "description".to_string(),
            format!("description must be at least {DESCRIPTION_MIN} characters long"),
        );
    }
}
