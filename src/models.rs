use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One scraped property card.
///
/// Field order is the JSON key order and the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub location: String,
    pub title: String,
    pub price: u64,
    pub area: Option<u32>,
    pub rooms: Option<u32>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
}

/// Numeric attributes carried by the icon blocks of a listing card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    Area,
    Rooms,
    Bedrooms,
    Bathrooms,
}

impl Feature {
    /// Maps an icon class such as `icon-bed` to the feature it stands for.
    pub fn from_icon_class(class: &str) -> Option<Self> {
        match class {
            "icon-triangle" => Some(Feature::Area),
            "icon-house" => Some(Feature::Rooms),
            "icon-bed" => Some(Feature::Bedrooms),
            "icon-bath" => Some(Feature::Bathrooms),
            _ => None,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Feature::Area => "area",
            Feature::Rooms => "rooms",
            Feature::Bedrooms => "bedrooms",
            Feature::Bathrooms => "bathrooms",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Language {
    #[value(name = "fr")]
    French,
    #[value(name = "en")]
    English,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::French, Language::English];

    /// Two-letter tag used in the portal's URL paths.
    pub fn code(&self) -> &'static str {
        match self {
            Language::French => "fr",
            Language::English => "en",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Language::French => "French",
            Language::English => "English",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum City {
    Rabat,
    Tanger,
    Marrakech,
    Casablanca,
    Agadir,
}

impl City {
    pub const ALL: [City; 5] = [
        City::Rabat,
        City::Tanger,
        City::Marrakech,
        City::Casablanca,
        City::Agadir,
    ];

    /// Lowercase identifier used in URLs and output filenames.
    pub fn slug(&self) -> &'static str {
        match self {
            City::Rabat => "rabat",
            City::Tanger => "tanger",
            City::Marrakech => "marrakech",
            City::Casablanca => "casablanca",
            City::Agadir => "agadir",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slug = self.slug();
        let mut chars = slug.chars();
        match chars.next() {
            Some(first) => write!(f, "{}{}", first.to_uppercase(), chars.as_str()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_classes_map_to_features() {
        assert_eq!(Feature::from_icon_class("icon-triangle"), Some(Feature::Area));
        assert_eq!(Feature::from_icon_class("icon-house"), Some(Feature::Rooms));
        assert_eq!(Feature::from_icon_class("icon-bed"), Some(Feature::Bedrooms));
        assert_eq!(Feature::from_icon_class("icon-bath"), Some(Feature::Bathrooms));
        assert_eq!(Feature::from_icon_class("icon-pool"), None);
    }

    #[test]
    fn city_display_is_capitalized() {
        assert_eq!(City::Casablanca.to_string(), "Casablanca");
        assert_eq!(City::Agadir.slug(), "agadir");
    }

    #[test]
    fn listing_serializes_nulls_for_missing_features() {
        let listing = Listing {
            location: "Maarif, Casablanca".to_string(),
            title: "Appartement à vendre".to_string(),
            price: 1_250_000,
            area: Some(95),
            rooms: None,
            bedrooms: Some(2),
            bathrooms: None,
        };

        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["price"], 1_250_000);
        assert_eq!(json["area"], 95);
        assert!(json["rooms"].is_null());
        assert!(json["bathrooms"].is_null());
    }
}
