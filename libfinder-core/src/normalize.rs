//! Extraction of postal code, city and region from raw address components.

use crate::model::AddressComponent;

pub const POSTAL_CODE_TAG: &str = "postal_code";
pub const LOCALITY_TAG: &str = "locality";
pub const POSTAL_TOWN_TAG: &str = "postal_town";
pub const ADMIN_AREA_LEVEL_1_TAG: &str = "administrative_area_level_1";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedAddress {
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// Walk every tag of every component and pick out the fields we display.
///
/// A later component carrying the same tag overwrites an earlier one. Upstream
/// data sometimes repeats tags and callers rely on the last value winning.
pub fn normalize(components: &[AddressComponent]) -> NormalizedAddress {
    let mut address = NormalizedAddress::default();

    for component in components {
        for tag in &component.types {
            match tag.as_str() {
                POSTAL_CODE_TAG => address.postal_code = Some(component.long_name.clone()),
                LOCALITY_TAG | POSTAL_TOWN_TAG => address.city = Some(component.long_name.clone()),
                ADMIN_AREA_LEVEL_1_TAG => address.state = Some(component.short_name.clone()),
                _ => {}
            }
        }
    }

    address
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(long_name: &str, short_name: &str, types: &[&str]) -> AddressComponent {
        AddressComponent {
            long_name: long_name.to_string(),
            short_name: short_name.to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn extracts_all_known_fields() {
        let components = vec![
            component("1600", "1600", &["street_number"]),
            component("Beverly Hills", "Beverly Hills", &["locality", "political"]),
            component("California", "CA", &["administrative_area_level_1", "political"]),
            component("United States", "US", &["country", "political"]),
            component("90210", "90210", &["postal_code"]),
        ];

        let address = normalize(&components);

        assert_eq!(address.postal_code.as_deref(), Some("90210"));
        assert_eq!(address.city.as_deref(), Some("Beverly Hills"));
        assert_eq!(address.state.as_deref(), Some("CA"));
    }

    #[test]
    fn last_component_with_same_tag_wins() {
        let components = vec![
            component("A", "A", &["postal_code"]),
            component("B", "B", &["postal_code"]),
        ];

        let address = normalize(&components);
        assert_eq!(address.postal_code.as_deref(), Some("B"));
    }

    #[test]
    fn postal_town_counts_as_city() {
        let components = vec![
            component("Camden", "Camden", &["locality"]),
            component("London", "London", &["postal_town"]),
        ];

        assert_eq!(normalize(&components).city.as_deref(), Some("London"));
    }

    #[test]
    fn missing_tags_stay_absent() {
        let components = vec![component("Route 66", "Rte 66", &["route"])];
        assert_eq!(normalize(&components), NormalizedAddress::default());
        assert_eq!(normalize(&[]), NormalizedAddress::default());
    }

    #[test]
    fn one_component_can_fill_several_fields() {
        let components = vec![component("Singapore", "SG", &["locality", "administrative_area_level_1"])];

        let address = normalize(&components);
        assert_eq!(address.city.as_deref(), Some("Singapore"));
        assert_eq!(address.state.as_deref(), Some("SG"));
    }

    #[test]
    fn normalizing_twice_gives_same_result() {
        let components = vec![
            component("Paris", "Paris", &["locality"]),
            component("75001", "75001", &["postal_code"]),
        ];
        assert_eq!(normalize(&components), normalize(&components));
    }
}
