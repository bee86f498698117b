//! Search queries.
//!
//! A [`SearchQuery`] is either a free-text query, split into lower-cased
//! terms on whitespace, or an image-derived tag set built from an
//! [`ImageAnalysis`]. The two differ in how the matcher scores them: text
//! queries keep duplicate terms in the denominator, image queries are
//! deduplicated.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::VidsiftError;

/// Which kind of query produced the search terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Free-text query.
    Text,
    /// Tags derived from an analysed image.
    Image,
}

/// Normalized search terms plus the mode that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    mode: SearchMode,
    terms: Vec<String>,
}

impl SearchQuery {
    /// Build a text query by lower-casing and splitting on whitespace.
    ///
    /// ```
    /// use vidsift::SearchQuery;
    ///
    /// let query = SearchQuery::text("Black  CAT cat");
    /// assert_eq!(query.terms(), ["black", "cat", "cat"]);
    /// ```
    pub fn text(query: &str) -> Self {
        Self {
            mode: SearchMode::Text,
            terms: query.to_lowercase().split_whitespace().map(str::to_string).collect(),
        }
    }

    /// Build an image query from raw tags.
    ///
    /// Tags are trimmed, lower-cased and deduplicated, keeping first-seen
    /// order. Blank tags are dropped.
    pub fn image<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let terms = tags
            .into_iter()
            .map(|tag| tag.as_ref().trim().to_lowercase())
            .filter(|tag| !tag.is_empty() && seen.insert(tag.clone()))
            .collect();
        Self {
            mode: SearchMode::Image,
            terms,
        }
    }

    /// Build an image query from an analysis: description tags first, then
    /// classification tags.
    pub fn from_image_analysis(analysis: &ImageAnalysis) -> Self {
        let description_tags = analysis.description.tags.iter().map(String::as_str);
        let classification_tags = analysis.tags.iter().map(|tag| tag.name.as_str());
        Self::image(description_tags.chain(classification_tags))
    }

    /// The query mode.
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// The normalized terms, in query order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// `true` when the query has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Result of analysing a query image with the vision service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    #[serde(default)]
    pub description: ImageDescription,
    /// Classification tags.
    #[serde(default)]
    pub tags: Vec<ImageTag>,
}

/// The `description` block of an image analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageDescription {
    /// Free-form description tags.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub captions: Vec<ImageCaption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageCaption {
    pub text: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageTag {
    pub name: String,
    pub confidence: f64,
}

impl ImageAnalysis {
    /// Decode an analysis from a JSON string.
    ///
    /// # Errors
    ///
    /// [`VidsiftError::InvalidInsights`] if the JSON does not match.
    pub fn from_json(json: &str) -> Result<Self, VidsiftError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The first caption, used as the image's description.
    pub fn caption(&self) -> Option<&str> {
        self.description.captions.first().map(|caption| caption.text.as_str())
    }
}
