//! Editable content documents.
//!
//! Each page's text lives in one JSON document served from
//! `/content/<name>.json`. The shapes below bind each document to its file
//! at compile time through [`ContentDocument::KIND`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::product::Product;
use super::category::ProductCategory;

/// The well-known content documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Site,
    B2b,
    Contact,
    Products,
    Reviews,
    Promos,
}

impl ContentKind {
    pub const ALL: [Self; 6] = [
        Self::Site,
        Self::B2b,
        Self::Contact,
        Self::Products,
        Self::Reviews,
        Self::Promos,
    ];

    /// Document name, used for storage keys and URLs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::B2b => "b2b",
            Self::Contact => "contact",
            Self::Products => "products",
            Self::Reviews => "reviews",
            Self::Promos => "promos",
        }
    }

    /// File name under `/content`.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{}.json", self.name())
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_suffix(".json").unwrap_or(s);
        Self::ALL
            .into_iter()
            .find(|k| k.name() == name)
            .ok_or_else(|| format!("unknown content document: {s}"))
    }
}

/// A JSON document shape tied to one content file.
pub trait ContentDocument:
    Serialize + DeserializeOwned + Clone + Send + Sync + std::fmt::Debug + 'static
{
    const KIND: ContentKind;
}

// =============================================================================
// Shared pieces
// =============================================================================

/// Title/description pair used by feature lists and values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    pub title: String,
    pub description: String,
}

// =============================================================================
// site.json
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteContent {
    pub meta: SiteMeta,
    pub hero: SiteHero,
    pub features: Vec<TextBlock>,
    pub about: AboutSection,
    pub cta: SiteCta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteMeta {
    pub site_title: String,
    pub site_description: String,
    pub og_image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteHero {
    pub badge: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub cta_primary: String,
    pub cta_secondary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutSection {
    pub title: String,
    pub subtitle: String,
    pub intro: String,
    pub story: Vec<String>,
    pub values: Vec<TextBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteCta {
    pub title: String,
    pub description: String,
    pub button_whatsapp: String,
    pub button_contact: String,
}

impl ContentDocument for SiteContent {
    const KIND: ContentKind = ContentKind::Site;
}

// =============================================================================
// b2b.json
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct B2bContent {
    pub hero: B2bHero,
    pub benefits: Vec<Benefit>,
    pub advantages: Vec<String>,
    pub cta: B2bCta,
    pub testimonials: Vec<Testimonial>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct B2bHero {
    pub badge: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Benefit {
    pub title: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct B2bCta {
    pub title: String,
    pub description: String,
    pub button_whatsapp: String,
    pub button_phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub quote: String,
    pub author: String,
    pub business: String,
}

impl ContentDocument for B2bContent {
    const KIND: ContentKind = ContentKind::B2b;
}

// =============================================================================
// contact.json
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactContent {
    pub hero: ContactHero,
    pub info: ContactInfo,
    pub links: ContactLinks,
    pub form: ContactForm,
    pub map_embed: MapEmbed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactHero {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub address: Address,
    pub phone: String,
    pub email: String,
    pub whatsapp: String,
    pub hours: OpeningHours,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub cap: String,
    pub city: String,
    pub zone: String,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHours {
    pub store: String,
    pub deliveries: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactLinks {
    pub google_maps: String,
    pub google_business: String,
    pub google_reviews: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub title: String,
    pub submit_button: String,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapEmbed {
    pub lat: f64,
    pub lng: f64,
}

impl ContentDocument for ContactContent {
    const KIND: ContentKind = ContentKind::Contact;
}

// =============================================================================
// products.json
// =============================================================================

/// Canonical catalog: category labels plus the default product list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsContent {
    #[serde(default)]
    pub categories: Vec<CategoryLabel>,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryLabel {
    pub id: ProductCategory,
    pub name: String,
    pub description: String,
}

impl ContentDocument for ProductsContent {
    const KIND: ContentKind = ContentKind::Products;
}

// =============================================================================
// reviews.json
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsContent {
    pub google_rating: f64,
    pub google_review_count: u32,
    pub google_link: String,
    pub featured: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub author: String,
    pub rating: u8,
    pub date: String,
    pub text: String,
    pub highlight: bool,
}

impl ContentDocument for ReviewsContent {
    const KIND: ContentKind = ContentKind::Reviews;
}

// =============================================================================
// promos.json
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromosContent {
    pub active_banner: PromoBanner,
    pub home_promo: HomePromo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoBanner {
    pub enabled: bool,
    pub text: String,
    pub link: Option<String>,
    pub bg_color: String,
    pub text_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePromo {
    pub enabled: bool,
    pub title: String,
    pub description: String,
    pub valid_until: String,
    pub cta_text: String,
    pub cta_link: String,
}

impl ContentDocument for PromosContent {
    const KIND: ContentKind = ContentKind::Promos;
}
