//! SEO scoring of content items and generation of missing meta tags.

use std::ops::RangeInclusive;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::Content;
use crate::prelude::*;
use crate::store::{ContentRepository, StoreError};

pub use generate::{generate_meta_description, generate_meta_title};

mod generate;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

static MARKDOWN_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#{1,6}\s+.+$").expect("markdown heading pattern is valid"));

static HTML_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<h[1-6][^>]*>.*?</h[1-6]>").expect("html heading pattern is valid")
});

const TITLE_LENGTH: RangeInclusive<usize> = 50..=60;
const DESCRIPTION_LENGTH: RangeInclusive<usize> = 150..=160;
const MIN_WORDS: usize = 300;

/// Replaces every HTML tag with a space.
pub(crate) fn strip_tags(text: &str) -> String {
    TAG.replace_all(text, " ").into_owned()
}

pub fn word_count(body: &str) -> usize {
    strip_tags(body).split_whitespace().count()
}

/// Whether the body has a Markdown ATX heading or an HTML heading element.
pub fn has_heading(body: &str) -> bool {
    MARKDOWN_HEADING.is_match(body) || HTML_HEADING.is_match(body)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeoCheck {
    pub name: &'static str,
    pub passed: bool,
    pub message: String,
}

impl SeoCheck {
    fn pass(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            passed: true,
            message: message.into(),
        }
    }

    fn fail(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            passed: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeoReport {
    pub score: u8,
    pub checks: Vec<SeoCheck>,
}

impl SeoReport {
    pub fn passed(&self) -> usize {
        self.checks.iter().filter(|check| check.passed).count()
    }
}

type Check = fn(&Content) -> SeoCheck;

/// The checks in report order.
const CHECKS: [Check; 5] = [
    check_meta_title,
    check_meta_description,
    check_content_length,
    check_headings,
    check_image_alt,
];

fn check_length(
    name: &'static str,
    label: &str,
    value: Option<&str>,
    range: RangeInclusive<usize>,
) -> SeoCheck {
    let Some(value) = value.filter(|value| !value.is_empty()) else {
        return SeoCheck::fail(name, format!("{label} is missing"));
    };

    let length = value.chars().count();
    let (min, max) = (*range.start(), *range.end());

    if length < min {
        SeoCheck::fail(
            name,
            format!("{label} is too short ({length} characters, aim for {min}-{max})"),
        )
    } else if length > max {
        SeoCheck::fail(
            name,
            format!("{label} is too long ({length} characters, aim for {min}-{max})"),
        )
    } else {
        SeoCheck::pass(name, format!("{label} length is optimal ({length} characters)"))
    }
}

fn check_meta_title(content: &Content) -> SeoCheck {
    check_length(
        "meta_title",
        "Meta title",
        content.meta_title.as_deref(),
        TITLE_LENGTH,
    )
}

fn check_meta_description(content: &Content) -> SeoCheck {
    check_length(
        "meta_description",
        "Meta description",
        content.meta_description.as_deref(),
        DESCRIPTION_LENGTH,
    )
}

fn check_content_length(content: &Content) -> SeoCheck {
    let words = word_count(&content.body);

    if words >= MIN_WORDS {
        SeoCheck::pass("content_length", format!("Content length is good ({words} words)"))
    } else {
        SeoCheck::fail(
            "content_length",
            format!("Content is too short ({words} words, aim for at least {MIN_WORDS})"),
        )
    }
}

fn check_headings(content: &Content) -> SeoCheck {
    if has_heading(&content.body) {
        SeoCheck::pass("headings", "Content uses headings")
    } else {
        SeoCheck::fail("headings", "Content has no headings")
    }
}

fn check_image_alt(content: &Content) -> SeoCheck {
    match &content.featured_image {
        None => SeoCheck::fail("image_alt", "No featured image"),
        Some(image) => match image.alt_text.as_deref().map(str::trim) {
            Some(alt) if !alt.is_empty() => SeoCheck::pass("image_alt", "Featured image has alt text"),
            _ => SeoCheck::fail("image_alt", "Featured image is missing alt text"),
        },
    }
}

/// Runs every check over the content. The score is the rounded percentage of passed checks.
pub fn analyze(content: &Content) -> SeoReport {
    let checks: Vec<SeoCheck> = CHECKS.iter().map(|check| check(content)).collect();
    let passed = checks.iter().filter(|check| check.passed).count();
    let score = (100.0 * passed as f64 / checks.len() as f64).round() as u8;

    SeoReport { score, checks }
}

/// Meta tags of a content item, falling back to generated ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoMetadata {
    pub meta_title: String,
    pub meta_description: String,
    pub generated_title: bool,
    pub generated_description: bool,
}

impl SeoMetadata {
    pub fn of(content: &Content) -> Self {
        let explicit = |value: &Option<String>| value.clone().filter(|value| !value.trim().is_empty());

        let (meta_title, generated_title) = match explicit(&content.meta_title) {
            Some(title) => (title, false),
            None => (generate_meta_title(&content.title), true),
        };

        let (meta_description, generated_description) = match explicit(&content.meta_description) {
            Some(description) => (description, false),
            None => {
                let source = content.excerpt.as_deref().unwrap_or(&content.body);
                (generate_meta_description(source), true)
            }
        };

        Self {
            meta_title,
            meta_description,
            generated_title,
            generated_description,
        }
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SeoError {
    #[snafu(display("content `{content_id}` does not exist"))]
    NotFound {
        content_id: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to load content `{content_id}`: {source}"))]
    LoadContent {
        content_id: String,
        source: StoreError,
        #[snafu(implicit)]
        location: Location,
    },
}

/// Looks up content items and scores them.
#[derive(Debug, new)]
pub struct SeoService<S> {
    store: S,
    logger: Logger,
}

impl<S: ContentRepository> SeoService<S> {
    async fn load(&self, content_id: &str) -> Result<Content, SeoError> {
        self.store
            .content(content_id)
            .await
            .context(LoadContentSnafu { content_id })?
            .context(NotFoundSnafu { content_id })
    }

    pub async fn analyze_seo(&self, content_id: &str) -> Result<SeoReport, SeoError> {
        let content = self.load(content_id).await?;
        let report = analyze(&content);

        self.logger.seo_analyzed(content_id, &report);
        Ok(report)
    }

    pub async fn seo_metadata(&self, content_id: &str) -> Result<SeoMetadata, SeoError> {
        let content = self.load(content_id).await?;
        Ok(SeoMetadata::of(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentStatus, FeaturedImage};
    use crate::store::MemoryStore;

    fn content(body: &str) -> Content {
        Content::new(
            "c1".into(),
            "A title".into(),
            "a-title".into(),
            ContentStatus::Published,
            "a1".into(),
            body.into(),
        )
    }

    fn optimized() -> Content {
        let mut content = content(&format!("# Introduction\n\n{}", "word ".repeat(300)));
        content.meta_title = Some("t".repeat(55));
        content.meta_description = Some("d".repeat(155));
        content.featured_image = Some(FeaturedImage::new("/cover.png".into(), Some("A cover".into())));
        content
    }

    fn check<'a>(report: &'a SeoReport, name: &str) -> &'a SeoCheck {
        report
            .checks
            .iter()
            .find(|check| check.name == name)
            .unwrap()
    }

    #[test]
    fn optimized_content_scores_100() {
        let report = analyze(&optimized());

        assert_eq!(report.score, 100);
        assert!(report.checks.iter().all(|check| check.passed));
    }

    #[test]
    fn checks_have_a_fixed_order() {
        let report = analyze(&content(""));
        let names: Vec<&str> = report.checks.iter().map(|check| check.name).collect();

        assert_eq!(
            names,
            vec!["meta_title", "meta_description", "content_length", "headings", "image_alt"]
        );
    }

    #[test]
    fn score_is_the_rounded_share_of_passed_checks() {
        let mut content = optimized();
        content.featured_image = None;
        content.meta_title = None;

        let report = analyze(&content);
        assert_eq!(report.passed(), 3);
        assert_eq!(report.score, 60);

        let report = analyze(&self::content("Short content without headings."));
        assert_eq!(report.passed(), 0);
        assert_eq!(report.score, 0);
    }

    #[test]
    fn meta_title_messages_carry_the_length() {
        let mut content = optimized();

        content.meta_title = None;
        let report = analyze(&content);
        assert_eq!(check(&report, "meta_title").message, "Meta title is missing");

        content.meta_title = Some("x".repeat(49));
        let report = analyze(&content);
        assert!(!check(&report, "meta_title").passed);
        assert!(check(&report, "meta_title").message.contains("too short (49 characters"));

        content.meta_title = Some("x".repeat(61));
        let report = analyze(&content);
        assert!(check(&report, "meta_title").message.contains("too long (61 characters"));

        for length in [50, 60] {
            content.meta_title = Some("x".repeat(length));
            let report = analyze(&content);
            assert!(check(&report, "meta_title").passed, "{length} characters is optimal");
            assert!(check(&report, "meta_title").message.contains("optimal"));
        }
    }

    #[test]
    fn meta_description_uses_its_own_range() {
        let mut content = optimized();

        content.meta_description = Some("x".repeat(149));
        assert!(!check(&analyze(&content), "meta_description").passed);

        content.meta_description = Some("x".repeat(160));
        assert!(check(&analyze(&content), "meta_description").passed);

        content.meta_description = Some(String::new());
        assert_eq!(
            check(&analyze(&content), "meta_description").message,
            "Meta description is missing"
        );
    }

    #[test]
    fn word_count_ignores_markup() {
        assert_eq!(word_count(&"word ".repeat(350)), 350);
        assert_eq!(word_count("<p>one</p><p>two</p>"), 2);
        assert_eq!(word_count("  \n\t "), 0);

        let report = analyze(&content(&"word ".repeat(350)));
        assert!(check(&report, "content_length").passed);

        let report = analyze(&content("Short content without headings."));
        assert!(!check(&report, "content_length").passed);
        assert!(!check(&report, "headings").passed);
    }

    #[test]
    fn headings_in_markdown_or_html() {
        assert!(has_heading("intro\n## Section\ntext"));
        assert!(has_heading("<H2 class=\"title\">Section</H2>"));
        assert!(has_heading("<p>a</p><h3>b</h3>"));
        assert!(!has_heading("#hashtag without space"));
        assert!(!has_heading("####### seven is too many"));
        assert!(!has_heading("<header>not a heading</header>"));
    }

    #[test]
    fn featured_image_needs_alt_text() {
        let mut content = optimized();

        content.featured_image = None;
        assert_eq!(check(&analyze(&content), "image_alt").message, "No featured image");

        content.featured_image = Some(FeaturedImage::new("/a.png".into(), Some("   ".into())));
        let report = analyze(&content);
        assert!(!check(&report, "image_alt").passed);
        assert!(check(&report, "image_alt").message.contains("missing alt text"));

        content.featured_image = Some(FeaturedImage::new("/a.png".into(), None));
        assert!(!check(&analyze(&content), "image_alt").passed);
    }

    #[test]
    fn metadata_falls_back_to_generated_tags() {
        let mut content = content("<p>Body text</p>");
        content.title = "t".repeat(70);

        let metadata = SeoMetadata::of(&content);
        assert!(metadata.generated_title && metadata.generated_description);
        assert_eq!(metadata.meta_title.chars().count(), 60);
        assert_eq!(metadata.meta_description, "Body text");

        content.excerpt = Some("An excerpt".into());
        content.meta_title = Some("Explicit".into());
        let metadata = SeoMetadata::of(&content);
        assert_eq!(metadata.meta_title, "Explicit");
        assert!(!metadata.generated_title);
        assert_eq!(metadata.meta_description, "An excerpt");
    }

    #[tokio::test]
    async fn service_reports_missing_content() {
        let store = MemoryStore::default();
        store.save_content(optimized());
        let service = SeoService::new(store, Logger::new("seo"));

        let report = service.analyze_seo("c1").await.unwrap();
        assert_eq!(report.score, 100);

        let missing = service.analyze_seo("nope").await;
        assert!(matches!(missing, Err(SeoError::NotFound { content_id, .. }) if content_id == "nope"));
    }
}
