//! Services layer - Business logic
//!
//! Services sit between the web handlers and the repositories:
//! - Implementing business rules (slugs, defaults, uniqueness)
//! - Coordinating between repositories and cache
//! - Handling validation and error cases

pub mod blog;
pub mod content;
pub mod markdown;
pub mod password;
pub mod seed;
pub mod settings;
pub mod slug;
pub mod user;

pub use blog::{BlogService, BlogServiceError, CategoryInput, PostInput};
pub use content::{
    ContentService, ContentServiceError, FeatureInput, HeroInput, SectionInput, StatisticInput,
    TeamMemberInput, TestimonialInput,
};
pub use markdown::MarkdownRenderer;
pub use password::{hash_password, verify_password};
pub use seed::{seed_defaults, SeedReport};
pub use settings::{SettingsService, SettingsServiceError, SiteSettings};
pub use slug::create_slug;
pub use user::{UserService, UserServiceError};
