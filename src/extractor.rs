use crate::models::{Feature, Listing};
use crate::parser::{element_text, parse_features, parse_price};
use crate::selectors::{SelectorChain, LOCATION, PRICE, TITLE};
use scraper::ElementRef;
use thiserror::Error;

/// Why a listing card did not produce a [`Listing`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("incomplete listing, missing {}", .missing.join(", "))]
    Incomplete {
        missing: Vec<&'static str>,
        title: Option<String>,
        price: Option<String>,
        location: Option<String>,
    },
    #[error("price {raw:?} contains no digits")]
    UnparseablePrice { raw: String },
}

/// Builds a listing from one container, or explains why it was skipped.
pub fn extract_listing(container: ElementRef<'_>) -> Result<Listing, Rejection> {
    // A match whose text normalizes to nothing counts as a miss
    let lookup = |chain: &SelectorChain| {
        chain
            .first_match(container)
            .map(element_text)
            .filter(|text| !text.is_empty())
    };

    let title = lookup(&TITLE);
    let price = lookup(&PRICE);
    let location = lookup(&LOCATION);

    let (title, price_text, location) = match (title, price, location) {
        (Some(title), Some(price), Some(location)) => (title, price, location),
        (title, price, location) => {
            let missing = [
                ("title", title.is_none()),
                ("price", price.is_none()),
                ("location", location.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, absent)| absent.then_some(name))
            .collect();

            return Err(Rejection::Incomplete {
                missing,
                title,
                price,
                location,
            });
        }
    };

    let price = parse_price(&price_text).ok_or(Rejection::UnparseablePrice { raw: price_text })?;

    let features = parse_features(container);
    let feature = |key: Feature| features.get(&key).copied().flatten();

    Ok(Listing {
        location,
        title,
        price,
        area: feature(Feature::Area),
        rooms: feature(Feature::Rooms),
        bedrooms: feature(Feature::Bedrooms),
        bathrooms: feature(Feature::Bathrooms),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn extract(html: &str) -> Result<Listing, Rejection> {
        let document = Html::parse_fragment(html);
        extract_listing(document.root_element())
    }

    #[test]
    fn full_card_produces_listing() {
        let listing = extract(
            r#"
            <h2 class="listingTit col-11"> Appartement  à vendre </h2>
            <span class="priceTag hardShadow float-left">1&nbsp;250&nbsp;000 DH</span>
            <span class="listingH3">Maarif,
                Casablanca</span>
            <div class="adDetails">
                <div class="adDetailFeature"><i class="icon-triangle"></i><span>95 m²</span></div>
                <div class="adDetailFeature"><i class="icon-bed"></i><span>2 Chambres</span></div>
            </div>
            "#,
        )
        .unwrap();

        assert_eq!(
            listing,
            Listing {
                location: "Maarif, Casablanca".to_string(),
                title: "Appartement à vendre".to_string(),
                price: 1_250_000,
                area: Some(95),
                rooms: None,
                bedrooms: Some(2),
                bathrooms: None,
            }
        );
    }

    #[test]
    fn fallback_patterns_are_used_when_precise_ones_miss() {
        let listing = extract(
            r#"
            <h3>Riad rénové</h3>
            <div class="prixBox">3 400 000 DH</div>
            <p class="lieu">Médina, Marrakech</p>
            "#,
        )
        .unwrap();

        assert_eq!(listing.title, "Riad rénové");
        assert_eq!(listing.price, 3_400_000);
        assert_eq!(listing.location, "Médina, Marrakech");
    }

    #[test]
    fn missing_location_rejects_card() {
        let rejection = extract(
            r#"
            <h2>Villa</h2>
            <span class="price">5 000 000 DH</span>
            "#,
        )
        .unwrap_err();

        match rejection {
            Rejection::Incomplete { missing, title, price, location } => {
                assert_eq!(missing, vec!["location"]);
                assert_eq!(title.as_deref(), Some("Villa"));
                assert_eq!(price.as_deref(), Some("5 000 000 DH"));
                assert_eq!(location, None);
            }
            other => panic!("unexpected rejection: {:?}", other),
        }
    }

    #[test]
    fn empty_card_reports_every_missing_field() {
        let rejection = extract("<p>Publicité</p>").unwrap_err();
        assert_eq!(
            rejection.to_string(),
            "incomplete listing, missing title, price, location"
        );
    }

    #[test]
    fn blank_title_rejects_card() {
        let rejection = extract(
            r#"
            <h2 class="listingTit col-11">  &nbsp; </h2>
            <span class="priceTag hardShadow float-left">900 000 DH</span>
            <span class="listingH3">Hay Hassani, Casablanca</span>
            "#,
        )
        .unwrap_err();

        match rejection {
            Rejection::Incomplete { missing, title, location, .. } => {
                assert_eq!(missing, vec!["title"]);
                assert_eq!(title, None);
                assert_eq!(location.as_deref(), Some("Hay Hassani, Casablanca"));
            }
            other => panic!("unexpected rejection: {:?}", other),
        }
    }

    #[test]
    fn empty_location_rejects_card() {
        let rejection = extract(
            r#"
            <h2 class="listingTit col-11">Appartement lumineux</h2>
            <span class="priceTag hardShadow float-left">900 000 DH</span>
            <span class="listingH3"></span>
            "#,
        )
        .unwrap_err();

        match rejection {
            Rejection::Incomplete { missing, .. } => assert_eq!(missing, vec!["location"]),
            other => panic!("unexpected rejection: {:?}", other),
        }
    }

    #[test]
    fn blank_title_and_location_never_produce_a_listing() {
        let result = extract(
            r#"
            <h2 class="listingTit col-11">  </h2>
            <span class="priceTag hardShadow float-left">900 000 DH</span>
            <span class="listingH3"></span>
            "#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn digitless_price_rejects_card() {
        let rejection = extract(
            r#"
            <h2>Terrain</h2>
            <span class="price">Prix non communiqué</span>
            <span class="location">Agadir</span>
            "#,
        )
        .unwrap_err();

        assert_eq!(
            rejection,
            Rejection::UnparseablePrice {
                raw: "Prix non communiqué".to_string()
            }
        );
    }

    #[test]
    fn feature_without_digits_becomes_none() {
        let listing = extract(
            r#"
            <h2>Studio</h2>
            <span class="price">450 000 DH</span>
            <span class="location">Rabat</span>
            <div class="adDetailFeature"><i class="icon-triangle"></i><span>NC</span></div>
            "#,
        )
        .unwrap();

        assert_eq!(listing.area, None);
        assert_eq!(listing.price, 450_000);
    }
}
