//! Recipe aggregate entity and write payloads.
//!
//! Inbound adapters hand the domain *unvalidated* payloads ([`RecipeDraft`],
//! [`RecipeChanges`]) with raw strings for price and tag names. Validation
//! collects every violation before reporting, so a client fixing a payload
//! sees all problems at once rather than one per round trip.

use serde_json::json;

use crate::domain::tag::tag_name_violation;
use crate::domain::{Error, Price, PriceParseError, Tag, UserId};

/// Maximum length of a recipe title in characters.
pub const TITLE_MAX: usize = 255;
/// Maximum length of a recipe link in characters.
pub const LINK_MAX: usize = 255;
/// Largest accepted preparation time, bounded by the storage column.
pub const TIME_MINUTES_MAX: i64 = i32::MAX as i64;

/// A recipe owned by a single user.
///
/// ## Invariants
/// - `owner_id` is immutable after creation. Update payloads carrying an
///   owner are stripped at the adapter boundary and never reach persistence.
/// - Every tag in `tags` shares the recipe's `owner_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub id: i64,
    pub owner_id: UserId,
    pub title: String,
    pub time_minutes: u32,
    pub price: Price,
    pub link: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub tags: Vec<Tag>,
}

/// Unvalidated create payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeDraft {
    pub title: String,
    pub time_minutes: i64,
    pub price: String,
    pub link: Option<String>,
    pub description: Option<String>,
    /// Embedded tag references, as bare names in payload order.
    pub tags: Vec<String>,
}

/// Unvalidated partial-update payload. `None` means "leave untouched".
///
/// `tags: Some(vec![])` detaches every tag, which is distinct from
/// `tags: None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeChanges {
    pub title: Option<String>,
    pub time_minutes: Option<i64>,
    pub price: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Validated fields ready for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeFields {
    pub title: String,
    pub time_minutes: u32,
    pub price: Price,
    pub link: Option<String>,
    pub description: Option<String>,
}

/// Validated partial field changes. Absent fields are not written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeFieldChanges {
    pub title: Option<String>,
    pub time_minutes: Option<u32>,
    pub price: Option<Price>,
    pub link: Option<String>,
    pub description: Option<String>,
}

impl RecipeFieldChanges {
    /// True when no column would be written.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.time_minutes.is_none()
            && self.price.is_none()
            && self.link.is_none()
            && self.description.is_none()
    }
}

/// One field-level validation failure.
struct Violation {
    field: String,
    code: &'static str,
    message: String,
}

impl Violation {
    fn new(field: impl Into<String>, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }
}

fn violations_to_error(violations: Vec<Violation>) -> Error {
    let fields: Vec<_> = violations
        .iter()
        .map(|v| {
            json!({
                "field": v.field,
                "code": v.code,
                "message": v.message,
            })
        })
        .collect();
    Error::invalid_request("recipe validation failed").with_details(json!({ "fields": fields }))
}

fn check_title(title: &str, out: &mut Vec<Violation>) {
    if title.trim().is_empty() {
        out.push(Violation::new("title", "empty", "title must not be empty"));
    } else if title.chars().count() > TITLE_MAX {
        out.push(Violation::new(
            "title",
            "too_long",
            format!("title must be at most {TITLE_MAX} characters"),
        ));
    }
}

fn check_time_minutes(minutes: i64, out: &mut Vec<Violation>) {
    if minutes < 0 {
        out.push(Violation::new(
            "time_minutes",
            "negative",
            "time_minutes must not be negative",
        ));
    } else if minutes > TIME_MINUTES_MAX {
        out.push(Violation::new(
            "time_minutes",
            "out_of_range",
            "time_minutes is out of range",
        ));
    }
}

fn check_price(raw: &str, out: &mut Vec<Violation>) -> Option<Price> {
    match Price::parse(raw) {
        Ok(price) => Some(price),
        Err(err) => {
            let code = match err {
                PriceParseError::Empty => "empty",
                PriceParseError::Negative => "negative",
                PriceParseError::TooPrecise => "too_precise",
                PriceParseError::Malformed | PriceParseError::OutOfRange => "malformed",
            };
            out.push(Violation::new("price", code, err.to_string()));
            None
        }
    }
}

fn check_link(link: &str, out: &mut Vec<Violation>) {
    if link.chars().count() > LINK_MAX {
        out.push(Violation::new(
            "link",
            "too_long",
            format!("link must be at most {LINK_MAX} characters"),
        ));
    } else if url::Url::parse(link).is_err() {
        out.push(Violation::new("link", "invalid_url", "link must be a valid URL"));
    }
}

fn check_tags(names: &[String], out: &mut Vec<Violation>) {
    for (index, name) in names.iter().enumerate() {
        if let Some(code) = tag_name_violation(name) {
            out.push(Violation::new(
                format!("tags[{index}].name"),
                code,
                "tag names must be non-empty and at most 255 characters",
            ));
        }
    }
}

impl RecipeDraft {
    /// Validate every field, reporting all violations together.
    ///
    /// Returns the persistable fields and the embedded tag names (still in
    /// payload order, duplicates included; the aggregate de-duplicates during
    /// resolution).
    pub fn validate(self) -> Result<(RecipeFields, Vec<String>), Error> {
        let mut violations = Vec::new();

        check_title(&self.title, &mut violations);
        check_time_minutes(self.time_minutes, &mut violations);
        let price = check_price(&self.price, &mut violations);
        if let Some(link) = self.link.as_deref() {
            check_link(link, &mut violations);
        }
        check_tags(&self.tags, &mut violations);

        if !violations.is_empty() {
            return Err(violations_to_error(violations));
        }
        let price = price.ok_or_else(|| Error::internal("price validated but absent"))?;

        Ok((
            RecipeFields {
                title: self.title,
                #[expect(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    reason = "range checked against TIME_MINUTES_MAX above"
                )]
                time_minutes: self.time_minutes as u32,
                price,
                link: self.link,
                description: self.description,
            },
            self.tags,
        ))
    }
}

impl RecipeChanges {
    /// Validate the fields that are present, reporting all violations
    /// together.
    ///
    /// Returns the persistable field changes and the optional embedded tag
    /// names (`None` leaves existing attachments untouched).
    pub fn validate(self) -> Result<(RecipeFieldChanges, Option<Vec<String>>), Error> {
        let mut violations = Vec::new();

        if let Some(title) = self.title.as_deref() {
            check_title(title, &mut violations);
        }
        if let Some(minutes) = self.time_minutes {
            check_time_minutes(minutes, &mut violations);
        }
        let price = self
            .price
            .as_deref()
            .and_then(|raw| check_price(raw, &mut violations));
        if let Some(link) = self.link.as_deref() {
            check_link(link, &mut violations);
        }
        if let Some(names) = self.tags.as_deref() {
            check_tags(names, &mut violations);
        }

        if !violations.is_empty() {
            return Err(violations_to_error(violations));
        }

        Ok((
            RecipeFieldChanges {
                title: self.title,
                #[expect(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    reason = "range checked against TIME_MINUTES_MAX above"
                )]
                time_minutes: self.time_minutes.map(|m| m as u32),
                price,
                link: self.link,
                description: self.description,
            },
            self.tags,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn draft() -> RecipeDraft {
        RecipeDraft {
            title: "Sample recipe".to_owned(),
            time_minutes: 22,
            price: "5.25".to_owned(),
            link: Some("http://example.com/recipe.pdf".to_owned()),
            description: Some("Sample description".to_owned()),
            tags: Vec::new(),
        }
    }

    #[rstest]
    fn valid_draft_produces_fields() {
        let (fields, tags) = draft().validate().expect("valid draft");
        assert_eq!(fields.title, "Sample recipe");
        assert_eq!(fields.time_minutes, 22);
        assert_eq!(fields.price.minor_units(), 525);
        assert!(tags.is_empty());
    }

    #[rstest]
    fn zero_minutes_is_a_valid_preparation_time() {
        let zero = RecipeDraft {
            time_minutes: 0,
            ..draft()
        };
        let (fields, _) = zero.validate().expect("instant recipes are allowed");
        assert_eq!(fields.time_minutes, 0);
    }

    #[rstest]
    fn all_violations_are_reported_together() {
        let bad = RecipeDraft {
            title: "  ".to_owned(),
            time_minutes: -3,
            price: "-1.00".to_owned(),
            link: Some("not a url".to_owned()),
            description: None,
            tags: vec!["Thai".to_owned(), "".to_owned()],
        };

        let err = bad.validate().expect_err("invalid draft");
        assert_eq!(err.code(), crate::domain::ErrorCode::InvalidRequest);
        let fields = err
            .details()
            .and_then(|d| d.get("fields"))
            .and_then(|f| f.as_array())
            .expect("violation list");
        let names: Vec<_> = fields
            .iter()
            .filter_map(|v| v.get("field").and_then(|f| f.as_str()))
            .collect();
        assert_eq!(names, vec!["title", "time_minutes", "price", "link", "tags[1].name"]);
    }

    #[rstest]
    fn changes_with_no_fields_validate_to_empty() {
        let (changes, tags) = RecipeChanges::default().validate().expect("empty changes");
        assert!(changes.is_empty());
        assert!(tags.is_none());
    }

    #[rstest]
    fn empty_tag_list_is_distinct_from_absent() {
        let with_empty = RecipeChanges {
            tags: Some(Vec::new()),
            ..RecipeChanges::default()
        };
        let (_, tags) = with_empty.validate().expect("valid changes");
        assert_eq!(tags, Some(Vec::new()));
    }

    #[rstest]
    fn partial_changes_validate_present_fields_only() {
        let changes = RecipeChanges {
            price: Some("oops".to_owned()),
            ..RecipeChanges::default()
        };

        let err = changes.validate().expect_err("bad price");
        let fields = err
            .details()
            .and_then(|d| d.get("fields"))
            .and_then(|f| f.as_array())
            .expect("violation list");
        assert_eq!(fields.len(), 1);
        assert_eq!(
            fields[0].get("field").and_then(|f| f.as_str()),
            Some("price")
        );
    }
}
