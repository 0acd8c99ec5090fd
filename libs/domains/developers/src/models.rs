use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Developer roles recognized by the directory
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
)]
pub enum Role {
    Frontend,
    Backend,
    #[serde(rename = "Full-Stack")]
    #[strum(serialize = "Full-Stack")]
    FullStack,
}

/// Developer entity - one directory record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Developer {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Contact email (unique across the directory, case-insensitive)
    pub email: String,
    /// Role in the directory taxonomy
    pub role: Role,
    /// Technologies the developer works with (never empty)
    pub tech_stack: Vec<String>,
    /// Years of experience
    pub experience: f64,
    /// Free-form bio
    pub description: String,
    /// When the developer joined their current position
    pub joining_date: Option<DateTime<Utc>>,
    /// Photo reference (URL or local upload path)
    pub photo: Option<String>,
    /// Identity that created this record (owner)
    pub created_by: Uuid,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new developer record
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeveloper {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub role: Role,
    #[validate(length(min = 1))]
    pub tech_stack: Vec<String>,
    #[validate(range(min = 0.0, max = 70.0))]
    pub experience: f64,
    #[validate(length(min = 10, max = 1000))]
    pub description: String,
    pub joining_date: Option<DateTime<Utc>>,
    pub photo: Option<String>,
}

/// DTO for replacing an existing developer record.
///
/// Updates carry the full payload (PUT semantics), so the shape and
/// bounds match [`CreateDeveloper`].
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeveloper {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub role: Role,
    #[validate(length(min = 1))]
    pub tech_stack: Vec<String>,
    #[validate(range(min = 0.0, max = 70.0))]
    pub experience: f64,
    #[validate(length(min = 10, max = 1000))]
    pub description: String,
    pub joining_date: Option<DateTime<Utc>>,
    pub photo: Option<String>,
}

/// Query parameters for listing the directory
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct DirectoryQuery {
    /// Case-insensitive term matched against name and tech stack
    pub search: Option<String>,
    /// Exact role display form ("Frontend", "Backend", "Full-Stack")
    pub role: Option<String>,
    /// "experience-asc" or "experience-desc"; anything else means newest first
    pub sort_by: Option<String>,
    /// 1-based page number
    #[serde(default = "default_page")]
    pub page: usize,
    /// Page size
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for DirectoryQuery {
    fn default() -> Self {
        Self {
            search: None,
            role: None,
            sort_by: None,
            page: default_page(),
            limit: default_limit(),
        }
    }
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    10
}

/// Count of developers holding one role
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoleCount {
    pub role: String,
    pub count: usize,
}

/// Count of developers listing one technology
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TechCount {
    pub tech: String,
    pub count: usize,
}

/// Aggregated directory statistics
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryAnalytics {
    pub total_developers: usize,
    pub by_role: Vec<RoleCount>,
    /// Ten most-listed technologies, most popular first
    pub popular_tech_stacks: Vec<TechCount>,
}

impl Developer {
    /// Create a new record owned by `created_by`
    pub fn new(input: CreateDeveloper, created_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            email: input.email,
            role: input.role,
            tech_stack: input.tech_stack,
            experience: input.experience,
            description: input.description,
            joining_date: input.joining_date,
            photo: input.photo,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the mutable fields with the update payload.
    ///
    /// Ownership and timestamps are preserved; `updated_at` is refreshed.
    pub fn apply_update(&mut self, update: UpdateDeveloper) {
        self.name = update.name;
        self.email = update.email;
        self.role = update.role;
        self.tech_stack = update.tech_stack;
        self.experience = update.experience;
        self.description = update.description;
        self.joining_date = update.joining_date;
        self.photo = update.photo;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn valid_input() -> CreateDeveloper {
        CreateDeveloper {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            role: Role::Backend,
            tech_stack: vec!["Rust".to_string(), "PostgreSQL".to_string()],
            experience: 7.5,
            description: "Writes analytical engines.".to_string(),
            joining_date: None,
            photo: None,
        }
    }

    #[test]
    fn test_role_display_forms() {
        assert_eq!(Role::Frontend.to_string(), "Frontend");
        assert_eq!(Role::Backend.to_string(), "Backend");
        assert_eq!(Role::FullStack.to_string(), "Full-Stack");
    }

    #[test]
    fn test_role_serde_full_stack() {
        let json = serde_json::to_string(&Role::FullStack).unwrap();
        assert_eq!(json, "\"Full-Stack\"");
        let role: Role = serde_json::from_str("\"Full-Stack\"").unwrap();
        assert_eq!(role, Role::FullStack);
    }

    #[test]
    fn test_create_developer_validates_bounds() {
        let mut input = valid_input();
        assert!(input.validate().is_ok());

        input.name = "a".to_string();
        assert!(input.validate().is_err());

        let mut input = valid_input();
        input.experience = 71.0;
        assert!(input.validate().is_err());

        let mut input = valid_input();
        input.tech_stack = vec![];
        assert!(input.validate().is_err());

        let mut input = valid_input();
        input.description = "too short".to_string();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_new_sets_owner_and_timestamps() {
        let owner = Uuid::new_v4();
        let dev = Developer::new(valid_input(), owner);
        assert_eq!(dev.created_by, owner);
        assert_eq!(dev.created_at, dev.updated_at);
    }

    #[test]
    fn test_apply_update_preserves_owner() {
        let owner = Uuid::new_v4();
        let mut dev = Developer::new(valid_input(), owner);
        let original_id = dev.id;

        dev.apply_update(UpdateDeveloper {
            name: "Grace Hopper".to_string(),
            email: "grace@example.com".to_string(),
            role: Role::FullStack,
            tech_stack: vec!["COBOL".to_string()],
            experience: 40.0,
            description: "Compiler pioneer and admiral.".to_string(),
            joining_date: None,
            photo: None,
        });

        assert_eq!(dev.id, original_id);
        assert_eq!(dev.created_by, owner);
        assert_eq!(dev.name, "Grace Hopper");
        assert!(dev.updated_at >= dev.created_at);
    }

    #[test]
    fn test_developer_serializes_camel_case() {
        let dev = Developer::new(valid_input(), Uuid::new_v4());
        let v = serde_json::to_value(&dev).unwrap();
        assert!(v.get("techStack").is_some());
        assert!(v.get("createdBy").is_some());
        assert!(v.get("createdAt").is_some());
        assert!(v.get("tech_stack").is_none());
    }
}
