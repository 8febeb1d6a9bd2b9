//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles CRUD operations for one table.

pub mod blog_category;
pub mod blog_post;
pub mod feature;
pub mod page_section;
pub mod settings;
pub mod statistic;
pub mod team_member;
pub mod testimonial;
pub mod user;

pub use blog_category::{BlogCategoryRepository, SqlxBlogCategoryRepository};
pub use blog_post::{BlogPostRepository, SqlxBlogPostRepository};
pub use feature::{FeatureRepository, SqlxFeatureRepository};
pub use page_section::{PageSectionRepository, SqlxPageSectionRepository};
pub use settings::{SettingsRepository, SqlxSettingsRepository};
pub use statistic::{SqlxStatisticRepository, StatisticRepository};
pub use team_member::{SqlxTeamMemberRepository, TeamMemberRepository};
pub use testimonial::{SqlxTestimonialRepository, TestimonialRepository};
pub use user::{SqlxUserRepository, UserRepository};
