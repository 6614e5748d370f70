//! Fuzzy search over the loaded images.
//!
//! Matching uses the Skim v2 algorithm from `fuzzy-matcher`. Each record is
//! indexed by its path and, depending on [`SearchOptions`], its file name and
//! extension; a record scores as its best field. The field index is cached
//! per browser revision and rebuilt when the list or the options change.

use std::fmt;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::{Deserialize, Serialize};

use crate::constants::MIN_SCORE_PER_QUERY_CHAR;
use crate::model::ImageRecord;

/// Which record fields take part in matching. The path always does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchOptions {
    pub include_file_name: bool,
    pub include_extension: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            include_file_name: true,
            include_extension: true,
        }
    }
}

/// Partial update of [`SearchOptions`]; absent fields are left unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchOptionsUpdate {
    pub include_file_name: Option<bool>,
    pub include_extension: Option<bool>,
}

/// Result counts for the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    pub total: usize,
    pub filtered: usize,
    pub is_searching: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CacheKey {
    revision: u64,
    options: SearchOptions,
    len: usize,
}

/// Query state plus the cached field index.
pub struct SearchIndex {
    query: String,
    options: SearchOptions,
    matcher: SkimMatcherV2,
    cache_key: Option<CacheKey>,
    /// Searchable fields per record, in list order
    fields: Vec<Vec<String>>,
}

impl fmt::Debug for SearchIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchIndex")
            .field("query", &self.query)
            .field("options", &self.options)
            .field("cache_key", &self.cache_key)
            .finish_non_exhaustive()
    }
}

impl Default for SearchIndex {
    fn default() -> Self {
        Self::new(SearchOptions::default())
    }
}

impl SearchIndex {
    pub fn new(options: SearchOptions) -> Self {
        Self {
            query: String::new(),
            options,
            matcher: SkimMatcherV2::default().ignore_case(),
            cache_key: None,
            fields: Vec::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Whether the query filters anything.
    pub fn is_searching(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        log::debug!("Search query set to {:?}", self.query);
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    /// Merge a partial options update. The index is rebuilt lazily.
    pub fn update_options(&mut self, update: SearchOptionsUpdate) {
        if let Some(include) = update.include_file_name {
            self.options.include_file_name = include;
        }
        if let Some(include) = update.include_extension {
            self.options.include_extension = include;
        }
    }

    /// Images matching the current query, best match first.
    ///
    /// An empty or whitespace-only query returns every image in list order.
    /// `revision` must change whenever `images` does.
    pub fn filter<'a>(&mut self, images: &'a [ImageRecord], revision: u64) -> Vec<&'a ImageRecord> {
        if !self.is_searching() {
            return images.iter().collect();
        }

        self.refresh(images, revision);

        let query = self.query.trim();
        let min_score = MIN_SCORE_PER_QUERY_CHAR * query.chars().count() as i64;
        let mut hits: Vec<(i64, &ImageRecord)> = images
            .iter()
            .zip(&self.fields)
            .filter_map(|(image, fields)| {
                fields
                    .iter()
                    .filter_map(|field| self.matcher.fuzzy_match(field, query))
                    .max()
                    .filter(|score| *score >= min_score)
                    .map(|score| (score, image))
            })
            .collect();

        // Stable sort keeps list order among equal scores.
        hits.sort_by(|a, b| b.0.cmp(&a.0));
        hits.into_iter().map(|(_, image)| image).collect()
    }

    /// Counts for the current query over `images`.
    pub fn stats(&mut self, images: &[ImageRecord], revision: u64) -> SearchStats {
        let filtered = self.filter(images, revision).len();
        SearchStats {
            total: images.len(),
            filtered,
            is_searching: self.is_searching(),
        }
    }

    fn refresh(&mut self, images: &[ImageRecord], revision: u64) {
        let key = CacheKey {
            revision,
            options: self.options,
            len: images.len(),
        };
        if self.cache_key == Some(key) {
            return;
        }

        self.fields = images
            .iter()
            .map(|image| {
                let mut fields = Vec::with_capacity(3);
                if self.options.include_file_name {
                    fields.push(image.name().to_string());
                }
                if self.options.include_extension && !image.extension().is_empty() {
                    fields.push(image.extension().to_string());
                }
                fields.push(image.path().to_string());
                fields
            })
            .collect();
        self.cache_key = Some(key);
        log::trace!("Rebuilt search index for {} image(s)", images.len());
    }
}
