//! Data models
//!
//! This module contains the data structures used throughout the CMS:
//! - Database entities (User, PageSection, BlogCategory, BlogPost,
//!   Testimonial, TeamMember, Statistic, Setting, Feature)
//! - Pagination and search result types

mod blog;
mod feature;
pub mod page_section;
mod pagination;
mod setting;
mod statistic;
mod team_member;
mod testimonial;
mod user;

pub use blog::{BlogCategory, BlogPost, SearchResult, DEFAULT_AUTHOR, DEFAULT_READ_TIME};
pub use feature::Feature;
pub use page_section::PageSection;
pub use pagination::{ListParams, PagedResult};
pub use setting::Setting;
pub use statistic::Statistic;
pub use team_member::TeamMember;
pub use testimonial::{clamp_rating, Testimonial, DEFAULT_RATING};
pub use user::User;
