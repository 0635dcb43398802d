//! Translation of recorded selector strategies into page queries

use action_primitives::ElementQuery;
use waymark_core_types::{SelectorStrategy, SelectorType};

use crate::errors::LocatorError;

const DEFAULT_DATA_ATTRIBUTE: &str = "data-testid";

/// Page query for one strategy.
///
/// `coordinates` strategies and strategies missing required metadata are
/// rejected with [`LocatorError::InvalidStrategy`].
pub fn query_for(strategy: &SelectorStrategy) -> Result<ElementQuery, LocatorError> {
    let value = strategy.value.clone();
    let query = match strategy.kind {
        SelectorType::Id => ElementQuery::Id { id: value },
        SelectorType::Name => ElementQuery::Attribute {
            name: "name".to_string(),
            value,
        },
        SelectorType::DataAttr => ElementQuery::Attribute {
            name: strategy
                .metadata_str("attribute")
                .unwrap_or(DEFAULT_DATA_ATTRIBUTE)
                .to_string(),
            value,
        },
        SelectorType::TestId => match strategy.metadata_str("attribute") {
            Some(attribute) => ElementQuery::Attribute {
                name: attribute.to_string(),
                value,
            },
            None => ElementQuery::TestId { value },
        },
        SelectorType::TextExact | SelectorType::TextFuzzy => ElementQuery::Text {
            value,
            exact: strategy.kind == SelectorType::TextExact,
            tag: strategy.metadata_str("tag").map(str::to_string),
        },
        SelectorType::RoleText => {
            let role = strategy.metadata_str("role").ok_or_else(|| {
                LocatorError::InvalidStrategy(format!(
                    "{} is missing its role",
                    strategy.describe()
                ))
            })?;
            ElementQuery::Role {
                role: role.to_string(),
                name: value,
            }
        }
        SelectorType::AriaLabel => ElementQuery::Label { label: value },
        SelectorType::Placeholder => ElementQuery::Placeholder { value },
        SelectorType::Title => ElementQuery::Title { value },
        SelectorType::AltText => ElementQuery::AltText { value },
        SelectorType::Css => ElementQuery::Css { selector: value },
        SelectorType::Xpath => ElementQuery::XPath { expression: value },
        SelectorType::Coordinates => {
            return Err(LocatorError::InvalidStrategy(
                "coordinates are handled by the coordinate fallback".to_string(),
            ))
        }
    };
    Ok(query)
}
