//! Content service
//!
//! Page sections, features, statistics, testimonials and team members: the
//! data behind the home, about and testimonials pages and their admin
//! screens.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::repositories::{
    FeatureRepository, PageSectionRepository, StatisticRepository, TeamMemberRepository,
    TestimonialRepository,
};
use crate::models::page_section::names;
use crate::models::{
    clamp_rating, Feature, PageSection, Statistic, TeamMember, Testimonial, DEFAULT_RATING,
};

/// Entries in the dashboard "recent testimonials" list
pub const RECENT_TESTIMONIALS: i64 = 5;

/// Content service errors
#[derive(Debug, thiserror::Error)]
pub enum ContentServiceError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

fn required(value: &str, field: &str) -> Result<(), ContentServiceError> {
    if value.trim().is_empty() {
        return Err(ContentServiceError::Validation(format!(
            "{} is required",
            field
        )));
    }
    Ok(())
}

/// Home page hero fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeroInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub button_text: Option<String>,
    pub button_link: Option<String>,
}

impl HeroInput {
    pub fn apply_to(&self, section: &mut PageSection) {
        section.title = self.title.clone();
        section.content = self.content.clone();
        section.image_url = self.image_url.clone();
        section.button_text = self.button_text.clone();
        section.button_link = self.button_link.clone();
    }
}

/// About page section fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectionInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
}

impl SectionInput {
    pub fn apply_to(&self, section: &mut PageSection) {
        section.title = self.title.clone();
        section.content = self.content.clone();
        section.image_url = self.image_url.clone();
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureInput {
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub image_url: Option<String>,
    pub order_index: i64,
    pub is_active: bool,
}

impl FeatureInput {
    pub fn apply_to(&self, feature: &mut Feature) {
        feature.title = self.title.clone();
        feature.description = self.description.clone();
        feature.icon = self.icon.clone();
        feature.image_url = self.image_url.clone();
        feature.order_index = self.order_index;
        feature.is_active = self.is_active;
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatisticInput {
    pub label: String,
    pub value: String,
    pub suffix: Option<String>,
    pub icon: Option<String>,
    pub order_index: i64,
    pub is_active: bool,
}

impl StatisticInput {
    pub fn apply_to(&self, stat: &mut Statistic) {
        stat.label = self.label.clone();
        stat.value = self.value.clone();
        stat.suffix = self.suffix.clone();
        stat.icon = self.icon.clone();
        stat.order_index = self.order_index;
        stat.is_active = self.is_active;
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestimonialInput {
    pub name: String,
    pub location: Option<String>,
    pub role: Option<String>,
    pub avatar_url: Option<String>,
    pub testimonial: String,
    pub rating: Option<i64>,
    pub yield_increase: Option<String>,
    pub water_saved: Option<String>,
    pub income_increase: Option<String>,
    pub video_url: Option<String>,
    pub is_featured: bool,
    pub is_active: bool,
    pub order_index: i64,
}

impl TestimonialInput {
    pub fn apply_to(&self, t: &mut Testimonial) {
        t.name = self.name.clone();
        t.location = self.location.clone();
        t.role = self.role.clone();
        t.avatar_url = self.avatar_url.clone();
        t.testimonial = self.testimonial.clone();
        t.rating = clamp_rating(self.rating.unwrap_or(DEFAULT_RATING));
        t.yield_increase = self.yield_increase.clone();
        t.water_saved = self.water_saved.clone();
        t.income_increase = self.income_increase.clone();
        t.video_url = self.video_url.clone();
        t.is_featured = self.is_featured;
        t.is_active = self.is_active;
        t.order_index = self.order_index;
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamMemberInput {
    pub name: String,
    pub position: String,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub email: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub order_index: i64,
    pub is_leadership: bool,
    pub is_active: bool,
}

impl TeamMemberInput {
    pub fn apply_to(&self, m: &mut TeamMember) {
        m.name = self.name.clone();
        m.position = self.position.clone();
        m.bio = self.bio.clone();
        m.photo_url = self.photo_url.clone();
        m.email = self.email.clone();
        m.linkedin = self.linkedin.clone();
        m.twitter = self.twitter.clone();
        m.order_index = self.order_index;
        m.is_leadership = self.is_leadership;
        m.is_active = self.is_active;
    }
}

/// Public home page data
#[derive(Debug, Clone, Default, Serialize)]
pub struct HomePage {
    pub hero: Option<PageSection>,
    pub about_cards: Vec<PageSection>,
    pub features: Vec<Feature>,
    pub stats: Vec<Statistic>,
}

/// Public about page data
#[derive(Debug, Clone, Default, Serialize)]
pub struct AboutPage {
    pub story: Option<PageSection>,
    pub mission: Option<PageSection>,
    pub vision: Option<PageSection>,
    pub values: Vec<PageSection>,
    pub leadership: Vec<TeamMember>,
    pub team: Vec<TeamMember>,
}

/// Public testimonials page data
#[derive(Debug, Clone, Default, Serialize)]
pub struct TestimonialsPage {
    pub testimonials: Vec<Testimonial>,
    pub featured: Option<Testimonial>,
    pub stats: Vec<Statistic>,
}

/// Admin home editor data (inactive rows included)
#[derive(Debug, Clone, Default, Serialize)]
pub struct HomeEditor {
    pub hero: Option<PageSection>,
    pub about_cards: Vec<PageSection>,
    pub features: Vec<Feature>,
}

/// Admin about editor data (inactive rows included)
#[derive(Debug, Clone, Default, Serialize)]
pub struct AboutEditor {
    pub story: Option<PageSection>,
    pub mission: Option<PageSection>,
    pub vision: Option<PageSection>,
    pub values: Vec<PageSection>,
}

/// Content service
pub struct ContentService {
    sections: Arc<dyn PageSectionRepository>,
    features: Arc<dyn FeatureRepository>,
    stats: Arc<dyn StatisticRepository>,
    testimonials: Arc<dyn TestimonialRepository>,
    team: Arc<dyn TeamMemberRepository>,
}

impl ContentService {
    pub fn new(
        sections: Arc<dyn PageSectionRepository>,
        features: Arc<dyn FeatureRepository>,
        stats: Arc<dyn StatisticRepository>,
        testimonials: Arc<dyn TestimonialRepository>,
        team: Arc<dyn TeamMemberRepository>,
    ) -> Self {
        Self {
            sections,
            features,
            stats,
            testimonials,
            team,
        }
    }

    // Public pages

    pub async fn home_page(&self) -> Result<HomePage, ContentServiceError> {
        Ok(HomePage {
            hero: self.sections.get_active(names::HOME, names::HERO).await?,
            about_cards: self
                .sections
                .list_active(names::HOME, names::ABOUT_CARD)
                .await?,
            features: self.features.list_active().await?,
            stats: self.stats.list_active().await?,
        })
    }

    pub async fn about_page(&self) -> Result<AboutPage, ContentServiceError> {
        Ok(AboutPage {
            story: self.sections.get_active(names::ABOUT, names::STORY).await?,
            mission: self.sections.get_active(names::ABOUT, names::MISSION).await?,
            vision: self.sections.get_active(names::ABOUT, names::VISION).await?,
            values: self.sections.list_active(names::ABOUT, names::VALUE).await?,
            leadership: self.team.list_active(true).await?,
            team: self.team.list_active(false).await?,
        })
    }

    pub async fn testimonials_page(&self) -> Result<TestimonialsPage, ContentServiceError> {
        Ok(TestimonialsPage {
            testimonials: self.testimonials.list_active().await?,
            featured: self.testimonials.first_featured_active().await?,
            stats: self.stats.list_active().await?,
        })
    }

    // Page sections

    pub async fn home_editor(&self) -> Result<HomeEditor, ContentServiceError> {
        Ok(HomeEditor {
            hero: self.sections.get(names::HOME, names::HERO).await?,
            about_cards: self.sections.list(names::HOME, names::ABOUT_CARD).await?,
            features: self.features.list().await?,
        })
    }

    pub async fn about_editor(&self) -> Result<AboutEditor, ContentServiceError> {
        Ok(AboutEditor {
            story: self.sections.get(names::ABOUT, names::STORY).await?,
            mission: self.sections.get(names::ABOUT, names::MISSION).await?,
            vision: self.sections.get(names::ABOUT, names::VISION).await?,
            values: self.sections.list(names::ABOUT, names::VALUE).await?,
        })
    }

    /// Update the home hero, creating it on first save
    pub async fn update_hero(&self, input: &HeroInput) -> Result<PageSection, ContentServiceError> {
        self.upsert_section(names::HOME, names::HERO, |section| input.apply_to(section))
            .await
    }

    /// Update a named about section, creating it on first save
    pub async fn update_about_section(
        &self,
        section_name: &str,
        input: &SectionInput,
    ) -> Result<PageSection, ContentServiceError> {
        required(section_name, "Section")?;
        self.upsert_section(names::ABOUT, section_name.trim(), |section| {
            input.apply_to(section)
        })
        .await
    }

    async fn upsert_section<F>(
        &self,
        page: &str,
        section_name: &str,
        apply: F,
    ) -> Result<PageSection, ContentServiceError>
    where
        F: FnOnce(&mut PageSection) + Send,
    {
        let mut section = self
            .sections
            .get(page, section_name)
            .await?
            .unwrap_or_else(|| PageSection::new(page, section_name));

        apply(&mut section);
        Ok(self.sections.save(&section).await?)
    }

    // Features

    pub async fn list_features(&self) -> Result<Vec<Feature>, ContentServiceError> {
        Ok(self.features.list().await?)
    }

    pub async fn get_feature(&self, id: i64) -> Result<Feature, ContentServiceError> {
        self.features
            .get_by_id(id)
            .await?
            .ok_or_else(|| ContentServiceError::NotFound(format!("Feature {}", id)))
    }

    pub async fn save_feature(
        &self,
        id: Option<i64>,
        input: &FeatureInput,
    ) -> Result<Feature, ContentServiceError> {
        let mut feature = match id {
            Some(id) => self.get_feature(id).await?,
            None => Feature::new(String::new()),
        };
        required(&input.title, "Title")?;
        input.apply_to(&mut feature);

        Ok(match id {
            Some(_) => self.features.update(&feature).await?,
            None => self.features.create(&feature).await?,
        })
    }

    pub async fn delete_feature(&self, id: i64) -> Result<(), ContentServiceError> {
        if !self.features.delete(id).await? {
            return Err(ContentServiceError::NotFound(format!("Feature {}", id)));
        }
        Ok(())
    }

    // Statistics

    pub async fn list_stats(&self) -> Result<Vec<Statistic>, ContentServiceError> {
        Ok(self.stats.list().await?)
    }

    pub async fn save_stat(
        &self,
        id: Option<i64>,
        input: &StatisticInput,
    ) -> Result<Statistic, ContentServiceError> {
        let mut stat = match id {
            Some(id) => self
                .stats
                .get_by_id(id)
                .await?
                .ok_or_else(|| ContentServiceError::NotFound(format!("Statistic {}", id)))?,
            None => Statistic::new(String::new(), String::new()),
        };
        required(&input.label, "Label")?;
        required(&input.value, "Value")?;
        input.apply_to(&mut stat);

        Ok(match id {
            Some(_) => self.stats.update(&stat).await?,
            None => self.stats.create(&stat).await?,
        })
    }

    pub async fn delete_stat(&self, id: i64) -> Result<(), ContentServiceError> {
        if !self.stats.delete(id).await? {
            return Err(ContentServiceError::NotFound(format!("Statistic {}", id)));
        }
        Ok(())
    }

    // Testimonials

    pub async fn list_testimonials(&self) -> Result<Vec<Testimonial>, ContentServiceError> {
        Ok(self.testimonials.list().await?)
    }

    pub async fn get_testimonial(&self, id: i64) -> Result<Testimonial, ContentServiceError> {
        self.testimonials
            .get_by_id(id)
            .await?
            .ok_or_else(|| ContentServiceError::NotFound(format!("Testimonial {}", id)))
    }

    pub async fn save_testimonial(
        &self,
        id: Option<i64>,
        input: &TestimonialInput,
    ) -> Result<Testimonial, ContentServiceError> {
        let mut testimonial = match id {
            Some(id) => self.get_testimonial(id).await?,
            None => Testimonial::new(String::new(), String::new()),
        };
        required(&input.name, "Name")?;
        required(&input.testimonial, "Testimonial")?;
        input.apply_to(&mut testimonial);

        Ok(match id {
            Some(_) => self.testimonials.update(&testimonial).await?,
            None => self.testimonials.create(&testimonial).await?,
        })
    }

    pub async fn delete_testimonial(&self, id: i64) -> Result<(), ContentServiceError> {
        if !self.testimonials.delete(id).await? {
            return Err(ContentServiceError::NotFound(format!("Testimonial {}", id)));
        }
        Ok(())
    }

    pub async fn recent_testimonials(&self) -> Result<Vec<Testimonial>, ContentServiceError> {
        Ok(self.testimonials.recent(RECENT_TESTIMONIALS).await?)
    }

    // Team

    pub async fn list_team(&self) -> Result<Vec<TeamMember>, ContentServiceError> {
        Ok(self.team.list().await?)
    }

    pub async fn get_team_member(&self, id: i64) -> Result<TeamMember, ContentServiceError> {
        self.team
            .get_by_id(id)
            .await?
            .ok_or_else(|| ContentServiceError::NotFound(format!("Team member {}", id)))
    }

    pub async fn save_team_member(
        &self,
        id: Option<i64>,
        input: &TeamMemberInput,
    ) -> Result<TeamMember, ContentServiceError> {
        let mut member = match id {
            Some(id) => self.get_team_member(id).await?,
            None => TeamMember::new(String::new(), String::new()),
        };
        required(&input.name, "Name")?;
        required(&input.position, "Position")?;
        input.apply_to(&mut member);

        Ok(match id {
            Some(_) => self.team.update(&member).await?,
            None => self.team.create(&member).await?,
        })
    }

    pub async fn delete_team_member(&self, id: i64) -> Result<(), ContentServiceError> {
        if !self.team.delete(id).await? {
            return Err(ContentServiceError::NotFound(format!("Team member {}", id)));
        }
        Ok(())
    }

    /// `(active testimonials, active team members)` for the dashboard
    pub async fn dashboard_counts(&self) -> Result<(i64, i64), ContentServiceError> {
        Ok((
            self.testimonials.count_active().await?,
            self.team.count_active().await?,
        ))
    }
}
