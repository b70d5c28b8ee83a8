//! Product categories.
//!
//! Categories are a closed set of static reference data. Products only
//! store the identifier; display data comes from [`ProductCategory::info`].

use serde::{Deserialize, Serialize};

/// Product category identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductCategory {
    PaniClassici,
    PaniSpeciali,
    FormatiRistorazione,
    SuRichiesta,
}

/// Display data for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    pub id: ProductCategory,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

impl ProductCategory {
    /// Every category, in display order.
    pub const ALL: [Self; 4] = [
        Self::PaniClassici,
        Self::PaniSpeciali,
        Self::FormatiRistorazione,
        Self::SuRichiesta,
    ];

    /// Wire identifier (e.g. `pani-classici`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PaniClassici => "pani-classici",
            Self::PaniSpeciali => "pani-speciali",
            Self::FormatiRistorazione => "formati-ristorazione",
            Self::SuRichiesta => "su-richiesta",
        }
    }

    /// Static display data for this category.
    #[must_use]
    pub const fn info(self) -> CategoryInfo {
        match self {
            Self::PaniClassici => CategoryInfo {
                id: self,
                name: "Pani Classici",
                description: "I grandi classici della tradizione, perfetti per ogni tavola",
                icon: "🍞",
            },
            Self::PaniSpeciali => CategoryInfo {
                id: self,
                name: "Pani Speciali",
                description: "Varietà arricchite con cereali, semi e ingredienti selezionati",
                icon: "🌾",
            },
            Self::FormatiRistorazione => CategoryInfo {
                id: self,
                name: "Formati Ristorazione",
                description: "Formati pensati per ristoranti, bar e locali",
                icon: "🍔",
            },
            Self::SuRichiesta => CategoryInfo {
                id: self,
                name: "Su Richiesta",
                description: "Produzioni speciali su ordinazione",
                icon: "⭐",
            },
        }
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("invalid product category: {s}"))
    }
}
