//! Comparisons: curated, ranked summaries of the top tools in one sector.

use serde::{Deserialize, Serialize};

use crate::{Collection, Record};

/// A curated ranking for one sector.
///
/// At most one comparison per sector is intended; readers take the first in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sectorguide_derive::JsonSchema)]
pub struct Comparison {
    /// Slug of the sector being compared.
    #[schema(description = "Sector slug for this comparison", min_length = 1)]
    pub sector_slug: String,
    /// Title of the comparison.
    #[schema(description = "Comparison headline", min_length = 1)]
    pub headline: String,
    /// Optional intro paragraph.
    #[schema(description = "Intro paragraph")]
    pub intro: Option<String>,
    /// Tool names, best first.
    #[serde(default)]
    #[schema(description = "List of tool names in ranked order")]
    pub top_tools: Vec<String>,
}

impl Record for Comparison {
    const COLLECTION: Collection = Collection::Comparison;
}

/// A comparison as it appears inside `GET /sectors/{slug}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonDetail {
    /// Title of the comparison.
    pub headline: String,
    /// Optional intro paragraph.
    pub intro: Option<String>,
    /// Tool names, best first.
    pub top_tools: Vec<String>,
}

impl From<Comparison> for ComparisonDetail {
    fn from(comparison: Comparison) -> Self {
        Self {
            headline: comparison.headline,
            intro: comparison.intro,
            top_tools: comparison.top_tools,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JsonSchema;
    use serde_json::json;

    #[test]
    fn schema_shape() {
        let schema = Comparison::json_schema();
        assert_eq!(schema["title"], "Comparison");
        assert_eq!(schema["required"], json!(["sector_slug", "headline"]));
        assert_eq!(schema["properties"]["top_tools"]["default"], json!([]));
        assert_eq!(schema["properties"]["top_tools"]["type"], "array");
    }

    #[test]
    fn top_tools_defaults_to_empty() {
        let comparison = Comparison::from_value(json!({
            "sector_slug": "design",
            "headline": "AI for Designers"
        }))
        .unwrap();
        assert!(comparison.top_tools.is_empty());
        assert_eq!(comparison.intro, None);
    }

    #[test]
    fn rejects_non_string_tool_names() {
        let err = Comparison::from_value(json!({
            "sector_slug": "design",
            "headline": "AI for Designers",
            "top_tools": ["Midjourney", 7]
        }))
        .unwrap_err();
        assert_eq!(err.field_path(), Some("top_tools.1".to_string()));
    }

    #[test]
    fn detail_drops_sector_slug() {
        let comparison = Comparison {
            sector_slug: "design".to_string(),
            headline: "AI for Designers".to_string(),
            intro: Some("From ideas to assets.".to_string()),
            top_tools: vec!["Midjourney".to_string()],
        };
        assert_eq!(
            serde_json::to_value(ComparisonDetail::from(comparison)).unwrap(),
            json!({
                "headline": "AI for Designers",
                "intro": "From ideas to assets.",
                "top_tools": ["Midjourney"]
            })
        );
    }
}
