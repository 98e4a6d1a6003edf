use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    Default,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "completed")]
    Completed,
}

/// The five visual themes a customer can pick. Affects rendering and the
/// generation tone only, never the data shape.
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    EnumString,
    Display,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Template {
    #[sea_orm(string_value = "sage_green")]
    SageGreen,
    #[sea_orm(string_value = "old_money")]
    OldMoney,
    #[sea_orm(string_value = "minimalist")]
    Minimalist,
    #[sea_orm(string_value = "luxury_gold")]
    LuxuryGold,
    #[sea_orm(string_value = "botanical")]
    Botanical,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaItem {
    pub time: String,
    pub event: String,
}

/// User-entered wedding facts, accumulated incrementally by the wizard.
/// Every field is optional in storage; the generation precondition, not the
/// update path, requires couple names, date and venue to be filled in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(rename_all = "camelCase", default)]
pub struct WeddingDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub couple_names: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wedding_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wedding_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_maps_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dress_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub love_story: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_links: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transportation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accommodation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsvp_deadline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_meal_options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agenda: Option<Vec<AgendaItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gallery_images: Option<Vec<String>>,
}

impl WeddingDetails {
    /// Whether the fields generation cannot proceed without are filled in.
    pub fn has_required_fields(&self) -> bool {
        [&self.couple_names, &self.wedding_date, &self.venue]
            .into_iter()
            .all(|field| field.as_deref().is_some_and(|value| !value.trim().is_empty()))
    }
}

/// Copy produced by the generation pipeline. Cache-like: absent until the
/// first successful generation, fully replaced on each regeneration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub welcome_message: String,
    pub our_story: String,
    pub venue_details: String,
    pub rsvp_message: String,
    pub seo_title: String,
    pub seo_description: String,
    pub schema_markup: String,
    pub agenda_intro: String,
    pub details_intro: String,
    pub closing_message: String,
}
