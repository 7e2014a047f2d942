//! Static registry of wizard steps.
//!
//! Registry order is navigation order: it numbers the step indicator, drives
//! the progress scan, and decides how skeleton fragments are merged.

pub mod steps;

use serde_json::Value;
use thiserror::Error;

use crate::claim::{Claim, Snapshot};
use crate::reconcile::merge_values;
use crate::segment::Segment;
use crate::validation::{Schema, SchemaContext};

/// Slug of the path reached once every step validates
pub const FINAL_SLUG: &str = "success";

/// A route referenced a slug that is not registered
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no page registered for slug '{0}'")]
pub struct PageNotFound(pub String);

pub type SchemaFactory = fn(&SchemaContext) -> Schema;
pub type SegmentSchemaFactory = fn(&SchemaContext, usize) -> Schema;
pub type SkeletonFactory = fn() -> Value;

/// Extra behaviour for a step that repeats once per collection entry
pub struct RepeatSpec {
    /// Claim array holding one entry per repetition
    pub collection: &'static str,
    pub segment_schema: SegmentSchemaFactory,
    /// Whether another entry follows the given segment
    pub repeatable: fn(Segment, &Snapshot) -> bool,
    pub next_segment: fn(Segment) -> Segment,
    pub previous_segment: fn(Segment) -> Option<Segment>,
}

/// One step of the wizard
pub struct PageDefinition {
    pub slug: &'static str,
    /// Translation key for the step heading
    pub heading: &'static str,
    pub schema: SchemaFactory,
    /// Default values for the claim fields this step owns
    pub skeleton: SkeletonFactory,
    pub repeat: Option<RepeatSpec>,
}

impl PageDefinition {
    pub fn is_repeatable(&self) -> bool {
        self.repeat.is_some()
    }

    /// Schema for the whole step
    pub fn base_schema(&self, ctx: &SchemaContext) -> Schema {
        (self.schema)(ctx)
    }

    /// Schema scoped to one entry of a repeatable step
    pub fn segment_schema(&self, ctx: &SchemaContext, index: usize) -> Option<Schema> {
        self.repeat
            .as_ref()
            .map(|repeat| (repeat.segment_schema)(ctx, index))
    }

    /// Schema for a route: segment-scoped on repeatable steps, whole-step otherwise
    pub fn schema_for(&self, ctx: &SchemaContext, segment: Segment) -> Schema {
        self.segment_schema(ctx, segment.index())
            .unwrap_or_else(|| self.base_schema(ctx))
    }
}

impl std::fmt::Debug for PageDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageDefinition")
            .field("slug", &self.slug)
            .field("heading", &self.heading)
            .field("repeatable", &self.is_repeatable())
            .finish_non_exhaustive()
    }
}

/// Ordered, immutable list of steps
#[derive(Debug, Clone, Copy)]
pub struct PageRegistry {
    pages: &'static [PageDefinition],
}

impl PageRegistry {
    pub const fn new(pages: &'static [PageDefinition]) -> Self {
        Self { pages }
    }

    /// The claim form's built-in steps
    pub fn standard() -> Self {
        Self::new(steps::STANDARD_PAGES)
    }

    pub fn pages(&self) -> &'static [PageDefinition] {
        self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'static PageDefinition> {
        self.pages.get(index)
    }

    pub fn first(&self) -> Option<&'static PageDefinition> {
        self.pages.first()
    }

    /// Look up a step by slug along with its position
    pub fn find(&self, slug: &str) -> Result<(usize, &'static PageDefinition), PageNotFound> {
        self.pages
            .iter()
            .enumerate()
            .find(|(_, page)| page.slug == slug)
            .ok_or_else(|| PageNotFound(slug.to_string()))
    }

    /// Every step's default fragment merged in registry order
    pub fn skeleton(&self) -> Claim {
        let merged = self
            .pages
            .iter()
            .fold(Value::Object(serde_json::Map::new()), |acc, page| {
                merge_values(&acc, &(page.skeleton)())
            });
        Claim::from_value(merged).unwrap_or_default()
    }

    /// `<base>/<slug>/` or `<base>/<slug>/<segment>/`
    pub fn path_for(&self, base: &str, index: usize, segment: Option<Segment>) -> String {
        let base = base.trim_end_matches('/');
        let slug = self.pages.get(index).map_or(FINAL_SLUG, |p| p.slug);
        match segment.and_then(Segment::token) {
            Some(token) => format!("{}/{}/{}/", base, slug, token),
            None => format!("{}/{}/", base, slug),
        }
    }

    /// Path reached once every step validates
    pub fn final_path(&self, base: &str) -> String {
        format!("{}/{}/", base.trim_end_matches('/'), FINAL_SLUG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_standard_order() {
        let slugs: Vec<&str> = PageRegistry::standard()
            .pages()
            .iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(
            slugs,
            vec![
                "personal",
                "contact",
                "demographic",
                "identity",
                "employer",
                "self-employment",
                "other-pay",
                "occupation",
                "education-vr",
                "union",
                "disability",
                "payment",
            ]
        );
    }

    #[test]
    fn test_find() {
        let registry = PageRegistry::standard();
        let (index, page) = registry.find("employer").unwrap();
        assert_eq!(index, 4);
        assert!(page.is_repeatable());
        assert_eq!(
            registry.find("nope").unwrap_err(),
            PageNotFound("nope".to_string())
        );
    }

    #[test]
    fn test_only_employer_repeats() {
        let repeatable: Vec<&str> = PageRegistry::standard()
            .pages()
            .iter()
            .filter(|p| p.is_repeatable())
            .map(|p| p.slug)
            .collect();
        assert_eq!(repeatable, vec!["employer"]);
    }

    #[test]
    fn test_fragments_do_not_collide() {
        let mut owners: HashMap<String, (&str, Value)> = HashMap::new();
        for page in PageRegistry::standard().pages() {
            let fragment = (page.skeleton)();
            let object = fragment.as_object().expect("skeleton fragment must be an object");
            for (key, value) in object {
                if let Some((owner, existing)) = owners.get(key) {
                    assert_eq!(
                        existing, value,
                        "'{}' defaults diverge between '{}' and '{}'",
                        key, owner, page.slug
                    );
                }
                owners.insert(key.clone(), (page.slug, value.clone()));
            }
        }
        assert!(owners.contains_key("employers"));
        assert!(owners.contains_key("ssn"));
    }

    #[test]
    fn test_paths() {
        let registry = PageRegistry::standard();
        assert_eq!(registry.path_for("/claim", 0, None), "/claim/personal/");
        assert_eq!(
            registry.path_for("/claim/", 4, Some(Segment::Index(2))),
            "/claim/employer/2/"
        );
        assert_eq!(
            registry.path_for("/claim", 4, Some(Segment::NotStarted)),
            "/claim/employer/"
        );
        assert_eq!(registry.final_path("/claim"), "/claim/success/");
    }

    #[test]
    fn test_schema_for_employer_is_segment_scoped() {
        let ctx = SchemaContext::english(chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        let (_, page) = PageRegistry::standard().find("employer").unwrap();
        let schema = page.schema_for(&ctx, Segment::Index(1));
        assert!(schema
            .rule_list()
            .iter()
            .any(|r| r.target == crate::validation::Target::Field("employers.1.name".to_string())));
    }
}
